//! Pre-interned names for attribute and method dispatch.
//!
//! Interned once at `Runtime` construction so that protocol lookups compare
//! `Name`s instead of hashing strings.

use pith_ir::{Name, StringInterner};

/// Protocol names consulted by the runtime itself.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProtocolNames {
    pub(crate) name: Name,
    pub(crate) base: Name,
    pub(crate) doc: Name,
    pub(crate) init: Name,
    pub(crate) class: Name,
    pub(crate) add: Name,
    pub(crate) len: Name,
}

impl ProtocolNames {
    pub(crate) fn new(interner: &StringInterner) -> Self {
        Self {
            name: interner.intern("__name__"),
            base: interner.intern("__base__"),
            doc: interner.intern("__doc__"),
            init: interner.intern("__init__"),
            class: interner.intern("__class__"),
            add: interner.intern("__add__"),
            len: interner.intern("__len__"),
        }
    }
}
