//! Type identifier.
//!
//! `TypeId(u32)` indexes the runtime's type registry. Built-in types are
//! registered first, in the order of the constants below, so their ids are
//! known at compile time and value-level code can name them without a
//! registry in hand.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Handle into the type registry.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // Core object model
    pub const OBJECT: TypeId = TypeId(0);
    /// The type of types; its own type is itself.
    pub const TYPE: TypeId = TypeId(1);
    pub const NONE: TypeId = TypeId(2);

    // Scalars
    pub const BOOL: TypeId = TypeId(3);
    pub const INT: TypeId = TypeId(4);
    pub const FLOAT: TypeId = TypeId(5);
    pub const STR: TypeId = TypeId(6);

    // Containers
    pub const TUPLE: TypeId = TypeId(7);
    pub const LIST: TypeId = TypeId(8);
    pub const DICT: TypeId = TypeId(9);

    // Callables
    pub const FUNCTION: TypeId = TypeId(10);
    pub const NATIVE_FUNCTION: TypeId = TypeId(11);
    pub const BOUND_METHOD: TypeId = TypeId(12);

    // Error hierarchy
    pub const EXCEPTION: TypeId = TypeId(13);
    pub const TYPE_ERROR: TypeId = TypeId(14);
    pub const ATTRIBUTE_ERROR: TypeId = TypeId(15);
    pub const LOOKUP_ERROR: TypeId = TypeId(16);
    pub const KEY_ERROR: TypeId = TypeId(17);
    pub const INDEX_ERROR: TypeId = TypeId(18);
    pub const ASSERTION_ERROR: TypeId = TypeId(19);
    pub const NAME_ERROR: TypeId = TypeId(20);
    pub const RECURSION_ERROR: TypeId = TypeId(21);
    pub const RUNTIME_ERROR: TypeId = TypeId(22);
    pub const IO_ERROR: TypeId = TypeId(23);
    pub const VALUE_ERROR: TypeId = TypeId(24);

    /// First id handed out to types registered after the built-ins.
    pub const FIRST_USER: u32 = 25;

    /// Built-in types in registration order: id, name, parent.
    ///
    /// `object` is the only type without a parent.
    pub const BUILTINS: [(TypeId, &'static str, Option<TypeId>); 25] = [
        (Self::OBJECT, "object", None),
        (Self::TYPE, "type", Some(Self::OBJECT)),
        (Self::NONE, "NoneType", Some(Self::OBJECT)),
        (Self::BOOL, "bool", Some(Self::OBJECT)),
        (Self::INT, "int", Some(Self::OBJECT)),
        (Self::FLOAT, "float", Some(Self::OBJECT)),
        (Self::STR, "str", Some(Self::OBJECT)),
        (Self::TUPLE, "tuple", Some(Self::OBJECT)),
        (Self::LIST, "list", Some(Self::OBJECT)),
        (Self::DICT, "dict", Some(Self::OBJECT)),
        (Self::FUNCTION, "function", Some(Self::OBJECT)),
        (Self::NATIVE_FUNCTION, "native_function", Some(Self::OBJECT)),
        (Self::BOUND_METHOD, "bound_method", Some(Self::OBJECT)),
        (Self::EXCEPTION, "Exception", Some(Self::OBJECT)),
        (Self::TYPE_ERROR, "TypeError", Some(Self::EXCEPTION)),
        (Self::ATTRIBUTE_ERROR, "AttributeError", Some(Self::EXCEPTION)),
        (Self::LOOKUP_ERROR, "LookupError", Some(Self::EXCEPTION)),
        (Self::KEY_ERROR, "KeyError", Some(Self::LOOKUP_ERROR)),
        (Self::INDEX_ERROR, "IndexError", Some(Self::LOOKUP_ERROR)),
        (Self::ASSERTION_ERROR, "AssertionError", Some(Self::EXCEPTION)),
        (Self::NAME_ERROR, "NameError", Some(Self::EXCEPTION)),
        (Self::RECURSION_ERROR, "RecursionError", Some(Self::EXCEPTION)),
        (Self::RUNTIME_ERROR, "RuntimeError", Some(Self::EXCEPTION)),
        (Self::IO_ERROR, "IOError", Some(Self::EXCEPTION)),
        (Self::VALUE_ERROR, "ValueError", Some(Self::EXCEPTION)),
    ];

    /// Create a `TypeId` from a raw registry index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        TypeId(index)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Registry slot for this id.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-assigned built-in ids.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    /// Name of a built-in type, or `None` for user types.
    pub fn builtin_name(self) -> Option<&'static str> {
        Self::BUILTINS.get(self.index()).map(|(_, name, _)| *name)
    }
}

impl Hash for TypeId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.builtin_name() {
            Some(name) => write!(f, "TypeId::{name}"),
            None => write!(f, "TypeId({})", self.0),
        }
    }
}
