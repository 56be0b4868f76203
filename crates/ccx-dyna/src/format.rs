//! Constants of the LS-DYNA fixed-column deck family.
//!
//! Encoder and decoder both read their widths and markers from here, so the
//! two directions cannot drift apart.

/// Width of an integer field (`%8d`).
pub const INT_WIDTH: usize = 8;
/// Width of a floating-point field (`%16.3f`).
pub const FLOAT_WIDTH: usize = 16;
/// Decimal digits of a floating-point field.
pub const FLOAT_PRECISION: usize = 3;

/// Node identifiers per continuation line of a multi-line element record.
pub const NODES_PER_LINE: usize = 10;

pub const NODE_SECTION: &str = "*NODE";
pub const ELEMENT_SECTION: &str = "*ELEMENT_SOLID";

/// Comment prefix; LS-DYNA ignores lines starting with `$`.
pub const COMMENT_PREFIX: char = '$';
/// Type marker preceding records that cannot be told apart by shape alone.
/// Followed by the element type code in one integer field.
pub const TYPE_MARKER: &str = "$TYPE";

/// Extension appended to the output stem.
pub const FILE_SUFFIX: &str = "dyn";
