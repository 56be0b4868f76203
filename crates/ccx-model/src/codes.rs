//! Element type codes used by the pre-processor's mesh store.
//!
//! Codes are the raw integers stored on every [`Element`](crate::Element).
//! Exporters decide which codes they can express; the store itself accepts any
//! code so that unknown shapes survive loading and can be reported later.

/// 8-node hexahedron
pub const HE8: i32 = 1;
/// 6-node pentahedron (wedge)
pub const PE6: i32 = 2;
/// 4-node tetrahedron
pub const TE4: i32 = 3;
/// 20-node hexahedron
pub const HE20: i32 = 4;
/// 15-node pentahedron (wedge)
pub const PE15: i32 = 5;
/// 10-node tetrahedron
pub const TE10: i32 = 6;
/// 3-node triangle
pub const TR3: i32 = 7;
/// 6-node triangle
pub const TR6: i32 = 8;
/// 4-node quadrilateral
pub const QU4: i32 = 9;
/// 8-node quadrilateral
pub const QU8: i32 = 10;
/// 2-node beam
pub const BE2: i32 = 11;
/// 3-node beam
pub const BE3: i32 = 12;

/// Short name of a known element code.
pub fn name(code: i32) -> Option<&'static str> {
    let name = match code {
        HE8 => "HE8",
        PE6 => "PE6",
        TE4 => "TE4",
        HE20 => "HE20",
        PE15 => "PE15",
        TE10 => "TE10",
        TR3 => "TR3",
        TR6 => "TR6",
        QU4 => "QU4",
        QU8 => "QU8",
        BE2 => "BE2",
        BE3 => "BE3",
        _ => return None,
    };
    Some(name)
}

/// Number of nodes an element of this code carries in the store.
pub fn nominal_node_count(code: i32) -> Option<usize> {
    let count = match code {
        HE8 => 8,
        PE6 => 6,
        TE4 => 4,
        HE20 => 20,
        PE15 => 15,
        TE10 => 10,
        TR3 => 3,
        TR6 => 6,
        QU4 => 4,
        QU8 => 8,
        BE2 => 2,
        BE3 => 3,
        _ => return None,
    };
    Some(count)
}

/// Map a CalculiX/Abaqus element type name to a store code.
///
/// Reduced/incompatible-mode variants share the code of their base shape.
pub fn from_calculix_type(type_str: &str) -> Option<i32> {
    let code = match type_str.trim().to_ascii_uppercase().as_str() {
        "C3D8" | "C3D8R" | "C3D8I" => HE8,
        "C3D6" => PE6,
        "C3D4" => TE4,
        "C3D20" | "C3D20R" => HE20,
        "C3D15" => PE15,
        "C3D10" | "C3D10T" => TE10,
        "S3" | "CPS3" | "CPE3" | "M3D3" => TR3,
        "S6" | "CPS6" | "CPE6" | "M3D6" => TR6,
        "S4" | "S4R" | "CPS4" | "CPE4" | "M3D4" | "M3D4R" => QU4,
        "S8" | "S8R" | "CPS8" | "CPE8" | "M3D8" | "M3D8R" => QU8,
        "B31" | "B31R" | "T3D2" => BE2,
        "B32" | "B32R" | "T3D3" => BE3,
        _ => return None,
    };
    Some(code)
}
