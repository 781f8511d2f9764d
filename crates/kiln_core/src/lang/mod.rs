//! Kiln language vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. [`operators::BinaryOpId`], [`numerics::NumericTypeId`]) and look up
//! spellings/metadata via registry tables instead of scattering string comparisons through the compiler.
//!
//! ## Examples
//! ```rust
//! use kiln_core::lang::operators::{self, BinaryOpId};
//!
//! assert_eq!(operators::binary_from_str("add"), Some(BinaryOpId::Add));
//! assert_eq!(operators::binary_from_str("plus"), None);
//! ```

pub mod builtins;
pub mod c_keywords;
pub mod numerics;
pub mod operators;
