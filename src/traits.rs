// Validation traits

use crate::value::Value;
use std::any::{Any, TypeId};

/// Static description of one validated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Name used in error paths
    pub name: &'static str,
    /// Rust identifier of the field; cross-field rules may use either name
    pub ident: &'static str,
    /// Raw rule string
    pub rules: &'static str,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, rules: &'static str) -> Self {
        Self {
            name,
            ident: name,
            rules,
        }
    }
}

/// Trait for validatable types.
///
/// Usually derived with `#[derive(Validate)]`. A hand-written impl must keep
/// `fields()` and `field()` in agreement: `field(i)` returns the value of
/// `fields()[i]`.
pub trait Validate: Any {
    /// Type name used as the root of error namespaces
    fn type_name(&self) -> &'static str;

    /// Field descriptor table, in declaration order
    fn fields(&self) -> &'static [FieldDescriptor];

    /// Value of the field at `index`
    fn field(&self, index: usize) -> Value<'_>;
}

impl dyn Validate {
    /// Find a field by reported name or Rust identifier.
    pub fn lookup(&self, name: &str) -> Option<(&'static FieldDescriptor, Value<'_>)> {
        self.fields()
            .iter()
            .position(|field| field.ident == name || field.name == name)
            .map(|index| (&self.fields()[index], self.field(index)))
    }

    pub(crate) fn key(&self) -> TypeId {
        let any: &dyn Any = self;
        any.type_id()
    }

    pub(crate) fn downcast_ref<T: Validate>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }
}
