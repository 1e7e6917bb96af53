//! Type identifiers used by parameter declarations
//!
//! A declared parameter accepts one or more types. At dispatch time the
//! manager compares the runtime type of each available object against these
//! identifiers, so they carry a [`TypeId`] for matching and a readable name
//! for diagnostics.
//!
//! Types belonging to the "concrete data object" category additionally carry
//! the class discriminator their instances report at runtime. Registering a
//! parameter of such a type feeds the registry's type map.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime identity of a Rust type
///
/// Equality and hashing only consider the [`TypeId`]; the name is kept for
/// log output.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Identity of `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Marker for concrete data-object types
///
/// `CLASS_NAME` is the discriminator instances of the type report through
/// their `concrete_class()` accessor. The two must agree, otherwise the type
/// map never matches the type.
pub trait ConcreteClass: 'static {
    const CLASS_NAME: &'static str;
}

/// One acceptable type of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamType {
    key: TypeKey,
    concrete_class: Option<&'static str>,
}

impl ParamType {
    /// A type outside the concrete data-object category
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            concrete_class: None,
        }
    }

    /// A concrete data-object type; registers in the type map
    pub fn concrete<T: ConcreteClass>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            concrete_class: Some(T::CLASS_NAME),
        }
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Class discriminator when the type is a concrete data object
    pub fn concrete_class(&self) -> Option<&'static str> {
        self.concrete_class
    }
}

/// A named parameter of a subscriber method
///
/// The order of `types` is the order in which the dispatcher tries them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub types: Vec<ParamType>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, types: Vec<ParamType>) -> Self {
        Self {
            name: name.into(),
            types,
        }
    }

    /// Parameter accepting a single non-concrete type
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, vec![ParamType::of::<T>()])
    }

    /// Parameter accepting a single concrete data-object type
    pub fn concrete<T: ConcreteClass>(name: impl Into<String>) -> Self {
        Self::new(name, vec![ParamType::concrete::<T>()])
    }

    /// Adds another acceptable type (union parameter)
    pub fn or(mut self, ty: ParamType) -> Self {
        self.types.push(ty);
        self
    }

    /// Concrete class discriminators among the accepted types
    pub fn concrete_classes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.iter().filter_map(ParamType::concrete_class)
    }
}
