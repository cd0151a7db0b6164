//! Field access on the process-wide registry set.

use crate::{Error, FieldInfo, Reflect, Registries, Value};

/// Extension trait for by-name field access through [`Registries::global`].
///
/// This trait is automatically implemented for all [`Reflect`] types.
///
/// # Example
///
/// ```rust
/// use structprop_core::{reflect, Reflected};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// reflect!(Point { x: direct, y: direct });
///
/// let mut p = Point { x: 0, y: 0 };
/// p.set_field("y", 4).unwrap();
/// assert_eq!(p.get_field("y").unwrap().to_string(), "4");
/// assert!(p.set_field("z", 1).is_err());
/// ```
pub trait Reflected: Reflect {
    fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        Registries::global().set(self, name, value)
    }

    fn get_field(&self, name: &str) -> Result<Value, Error> {
        Registries::global().get(self, name)
    }

    fn visit_fields<F: FnMut(&str, &Value)>(&self, f: F) -> Result<(), Error> {
        Registries::global().visit(self, f)
    }

    fn field_snapshot(&self) -> Result<Vec<(&'static str, Value)>, Error> {
        Registries::global().snapshot(self)
    }

    fn field_infos() -> Result<Vec<FieldInfo>, Error> {
        Registries::global().fields::<Self>()
    }
}

// Blanket implementation for all Reflect types
impl<R: Reflect> Reflected for R {}

/// Assign `value` to the field `name` on `record`, using the global set.
pub fn set<R: Reflect>(record: &mut R, name: &str, value: impl Into<Value>) -> Result<(), Error> {
    Registries::global().set(record, name, value)
}

/// Read the field `name` on `record`, using the global set.
pub fn get<R: Reflect>(record: &R, name: &str) -> Result<Value, Error> {
    Registries::global().get(record, name)
}

/// Visit every field of `record`, using the global set.
pub fn visit<R: Reflect, F: FnMut(&str, &Value)>(record: &R, f: F) -> Result<(), Error> {
    Registries::global().visit(record, f)
}
