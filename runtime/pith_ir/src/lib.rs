//! Pith IR - identifiers shared by every layer of the Pith runtime.
//!
//! This crate provides:
//! - `Name`: compact interned identifier for attribute, parameter and type names
//! - `StringInterner` / `SharedInterner`: the interning table behind `Name`
//! - `TypeId`: handle into the runtime's type registry, with fixed ids for
//!   the built-in types

mod interner;
mod name;
mod type_id;

pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use type_id::TypeId;
