//! Class identity.
//!
//! A class is a Rust type. Two keys are equal exactly when they were built
//! from the same type; a wrapper or "subclass" type always has its own key.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

// ═══════════════════════════════════════════════════════════════════════════════
// CLASS KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Identity key of a class.
///
/// Equality and hashing use the `TypeId` only. The type name is carried for
/// logs and error messages.
#[derive(Clone, Copy)]
pub struct ClassKey {
    id: TypeId,
    name: &'static str,
}

impl ClassKey {
    /// Returns the key of type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the key of the concrete type of `value`.
    ///
    /// Lets a property be read through an instance and land on the same
    /// entry as reading it through the type.
    pub fn of_val<T: ?Sized + 'static>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Returns the `TypeId` behind this key.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type name, e.g. `my_app::models::User`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type name without its module path, e.g. `User`.
    ///
    /// Generic arguments are kept as written by the compiler.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }

    /// Returns true if this is the key of type `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

pub(crate) fn short_type_name(name: &str) -> &str {
    let base_end = name.find('<').unwrap_or(name.len());
    let start = name[..base_end].rfind("::").map_or(0, |i| i + 2);
    &name[start..]
}

impl PartialEq for ClassKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassKey {}

impl Hash for ClassKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassKey").field(&self.name).finish()
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
