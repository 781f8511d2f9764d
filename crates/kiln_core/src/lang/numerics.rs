//! Numeric type vocabulary and literal suffixes.
//!
//! Every numeric literal resolves to a *canonical* numeric type before the backend maps it to a concrete target type.
//! The canonical type comes from the literal's explicit suffix when present, or from its syntactic form otherwise.
//!
//! ## Notes
//! - The suffix table intentionally maps `i`/`isize` onto [`NumericTypeId::Int`] and `u`/`usize` onto
//!   [`NumericTypeId::Uint`]; a suffixed `usize` literal is therefore indistinguishable from a `u` literal.
//! - Suffix lookup is **case-sensitive**.
//!
//! ## Examples
//! ```rust
//! use kiln_core::lang::numerics::{self, NumericTypeId};
//!
//! assert_eq!(numerics::from_suffix("u8"), Some(NumericTypeId::Uint8));
//! assert_eq!(numerics::from_suffix("usize"), Some(NumericTypeId::Uint));
//! assert_eq!(numerics::as_str(NumericTypeId::Float32), "float32");
//! ```

/// Stable identifier for canonical numeric types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericTypeId {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Float32,
    Float64,
}

/// Metadata for a canonical numeric type.
#[derive(Debug, Clone, Copy)]
pub struct NumericTypeInfo {
    pub id: NumericTypeId,
    /// Source-level type name, as accepted in type annotations.
    pub canonical: &'static str,
    pub signed: bool,
    pub float: bool,
}

/// Registry of canonical numeric types.
pub const NUMERIC_TYPES: &[NumericTypeInfo] = &[
    info(NumericTypeId::Int, "int", true, false),
    info(NumericTypeId::Int8, "int8", true, false),
    info(NumericTypeId::Int16, "int16", true, false),
    info(NumericTypeId::Int32, "int32", true, false),
    info(NumericTypeId::Int64, "int64", true, false),
    info(NumericTypeId::Uint, "uint", false, false),
    info(NumericTypeId::Uint8, "uint8", false, false),
    info(NumericTypeId::Uint16, "uint16", false, false),
    info(NumericTypeId::Uint32, "uint32", false, false),
    info(NumericTypeId::Uint64, "uint64", false, false),
    info(NumericTypeId::Float, "float", true, true),
    info(NumericTypeId::Float32, "float32", true, true),
    info(NumericTypeId::Float64, "float64", true, true),
];

/// Literal suffix table.
pub const LITERAL_SUFFIXES: &[(&str, NumericTypeId)] = &[
    ("i", NumericTypeId::Int),
    ("isize", NumericTypeId::Int),
    ("i8", NumericTypeId::Int8),
    ("i16", NumericTypeId::Int16),
    ("i32", NumericTypeId::Int32),
    ("i64", NumericTypeId::Int64),
    ("u", NumericTypeId::Uint),
    ("usize", NumericTypeId::Uint),
    ("u8", NumericTypeId::Uint8),
    ("u16", NumericTypeId::Uint16),
    ("u32", NumericTypeId::Uint32),
    ("u64", NumericTypeId::Uint64),
    ("f32", NumericTypeId::Float32),
    ("f64", NumericTypeId::Float64),
];

/// Resolve a literal suffix (without any leading `_`) to its canonical type.
pub fn from_suffix(suffix: &str) -> Option<NumericTypeId> {
    LITERAL_SUFFIXES.iter().find(|(s, _)| *s == suffix).map(|(_, id)| *id)
}

/// Resolve a source type name to a canonical numeric type.
pub fn from_str(name: &str) -> Option<NumericTypeId> {
    NUMERIC_TYPES.iter().find(|t| t.canonical == name).map(|t| t.id)
}

/// Return the canonical source spelling for a numeric type.
pub fn as_str(id: NumericTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a numeric type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: NumericTypeId) -> &'static NumericTypeInfo {
    NUMERIC_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("numeric type info missing")
}

const fn info(id: NumericTypeId, canonical: &'static str, signed: bool, float: bool) -> NumericTypeInfo {
    NumericTypeInfo {
        id,
        canonical,
        signed,
        float,
    }
}
