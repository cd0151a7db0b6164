//! The registration entry point a record type implements once.

use crate::table::Registrar;

/// A record type whose fields can be set and visited by name.
///
/// `register_fields` runs at most once per [`Registries`](crate::Registries)
/// set, the first time any operation touches the type. It must not call back
/// into the registry for `Self`.
///
/// # Example
///
/// ```rust
/// use structprop_core::{Reflect, Registrar, Registries, Shared};
///
/// struct Subject {
///     num: i32,
///     value: Shared<f64>,
///     opt_value: Option<f64>,
/// }
///
/// impl Reflect for Subject {
///     fn register_fields(fields: &mut Registrar<Self>) {
///         fields
///             .direct("num", |s| &s.num, |s| &mut s.num)
///             .shared("value", |s| &s.value)
///             .optional("optValue", |s| &s.opt_value, |s| &mut s.opt_value);
///     }
/// }
///
/// let registries = Registries::new();
/// let mut s = Subject { num: 1, value: Shared::default(), opt_value: None };
/// registries.set(&mut s, "optValue", 8.88).unwrap();
/// assert_eq!(s.opt_value, Some(8.88));
/// ```
pub trait Reflect: Sized + 'static {
    /// Declare every exposed field.
    fn register_fields(fields: &mut Registrar<Self>);

    /// Name used in error messages and logs.
    fn record_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Implement [`Reflect`] from a field list.
///
/// Each entry is `field: kind` or `"name" => field: kind`, where `kind` is
/// `direct`, `optional` or `shared`. The first form registers the field under
/// its own identifier.
///
/// # Example
///
/// ```rust
/// use structprop_core::{reflect, Registries, Shared, Value};
///
/// struct Subject {
///     num: i32,
///     value: Shared<f64>,
///     opt_value: Option<f64>,
/// }
///
/// reflect!(Subject {
///     num: direct,
///     value: shared,
///     "optValue" => opt_value: optional,
/// });
///
/// let registries = Registries::new();
/// let s = Subject { num: 1, value: Shared::default(), opt_value: None };
/// assert_eq!(registries.get(&s, "optValue").unwrap(), Value::Null);
/// ```
#[macro_export]
macro_rules! reflect {
    ($record:ty { $($body:tt)* }) => {
        impl $crate::Reflect for $record {
            fn register_fields(fields: &mut $crate::Registrar<Self>) {
                $crate::__reflect_fields!(fields; $($body)*);
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_fields {
    ($fields:ident;) => {};
    ($fields:ident; $field:ident : $kind:ident $(, $($rest:tt)*)?) => {
        $crate::__reflect_field!($fields, ::core::stringify!($field), $field, $kind);
        $crate::__reflect_fields!($fields; $($($rest)*)?);
    };
    ($fields:ident; $name:literal => $field:ident : $kind:ident $(, $($rest:tt)*)?) => {
        $crate::__reflect_field!($fields, $name, $field, $kind);
        $crate::__reflect_fields!($fields; $($($rest)*)?);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_field {
    ($fields:ident, $name:expr, $field:ident, direct) => {
        $fields.direct($name, |r| &r.$field, |r| &mut r.$field);
    };
    ($fields:ident, $name:expr, $field:ident, optional) => {
        $fields.optional($name, |r| &r.$field, |r| &mut r.$field);
    };
    ($fields:ident, $name:expr, $field:ident, shared) => {
        $fields.shared($name, |r| &r.$field);
    };
}

#[cfg(test)]
mod tests {
    use crate::{DuplicatePolicy, FieldInfo, Registries, RegistryOptions, ScalarKind, Shared};
    use crate::{Error, StorageKind};

    struct Beacon {
        channel: u32,
        name: String,
        gain: Option<f64>,
        shared_gain: Shared<f64>,
    }

    reflect!(Beacon {
        channel: direct,
        name: direct,
        "gainDb" => gain: optional,
        "sharedGain" => shared_gain: shared,
    });

    struct Twice {
        a: i32,
    }

    reflect!(Twice { a: direct, a: direct });

    #[test]
    fn macro_registers_in_order_with_names() {
        let registries = Registries::new();
        let fields = registries.fields::<Beacon>().unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["channel", "name", "gainDb", "sharedGain"]);
        assert_eq!(
            fields[2],
            FieldInfo {
                name: "gainDb",
                scalar: ScalarKind::F64,
                storage: StorageKind::Optional
            }
        );
        assert_eq!(fields[3].storage, StorageKind::Shared);
        assert_eq!(fields[1].scalar, ScalarKind::String);
    }

    #[test]
    fn macro_duplicate_follows_policy() {
        let strict = Registries::new();
        assert!(matches!(
            strict.fields::<Twice>(),
            Err(Error::DuplicateField { .. })
        ));

        let lenient = Registries::with_options(
            RegistryOptions::default().duplicates(DuplicatePolicy::Overwrite),
        );
        let mut t = Twice { a: 0 };
        lenient.set(&mut t, "a", 5).unwrap();
        assert_eq!(t.a, 5);
        assert_eq!(lenient.fields::<Twice>().unwrap().len(), 1);
    }

    #[test]
    fn record_name_defaults_to_type_name() {
        use crate::Reflect;
        assert!(Beacon::record_name().ends_with("Beacon"));
    }
}
