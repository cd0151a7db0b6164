//! Scalar types a field may hold, and their conversions to and from `Value`.

use std::fmt;

use crate::accessor::{Accessor, Storage};
use crate::value::widen_f32;
use crate::Value;

/// The closed set of scalar types a registered field can hold.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
    String,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::String => "string",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A type that can back a registered field.
///
/// Sealed: every implementor has a matching [`Accessor`] variant, and
/// adding one means adding that variant too.
pub trait Scalar: sealed::Sealed + Sized + 'static {
    const KIND: ScalarKind;

    /// Convert an incoming value, or `None` if it has no conversion to `Self`.
    ///
    /// Numeric conversions are plain `as` casts: no range check, floats
    /// truncate toward zero and saturate at the target bounds.
    fn from_value(value: &Value) -> Option<Self>;

    fn to_value(&self) -> Value;

    /// Wrap a storage descriptor in the accessor variant for `Self`.
    fn tag<R>(storage: Storage<R, Self>) -> Accessor<R>;
}

macro_rules! numeric_scalar {
    ($ty:ty, $kind:ident, $wrap:expr) => {
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Integer(v) => Some(*v as $ty),
                    Value::Unsigned(v) => Some(*v as $ty),
                    Value::Float(v) => Some(*v as $ty),
                    Value::Bool(v) => Some(*v as u8 as $ty),
                    Value::Null | Value::String(_) => None,
                }
            }

            fn to_value(&self) -> Value {
                $wrap(*self)
            }

            fn tag<R>(storage: Storage<R, Self>) -> Accessor<R> {
                Accessor::$kind(storage)
            }
        }
    };
}

numeric_scalar!(i32, I32, |v: i32| Value::Integer(v as i64));
numeric_scalar!(i64, I64, Value::Integer);
numeric_scalar!(u32, U32, |v: u32| Value::Integer(v as i64));
numeric_scalar!(u64, U64, Value::Unsigned);
numeric_scalar!(f32, F32, |v: f32| Value::Float(widen_f32(v)));
numeric_scalar!(f64, F64, Value::Float);

impl sealed::Sealed for bool {}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn tag<R>(storage: Storage<R, Self>) -> Accessor<R> {
        Accessor::Bool(storage)
    }
}

impl sealed::Sealed for String {}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn tag<R>(storage: Storage<R, Self>) -> Accessor<R> {
        Accessor::String(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_casts_follow_as_semantics() {
        assert_eq!(i32::from_value(&Value::Float(3.99)), Some(3));
        assert_eq!(i32::from_value(&Value::Float(-3.99)), Some(-3));
        assert_eq!(i32::from_value(&Value::Integer(1 << 40)), Some(0));
        assert_eq!(u32::from_value(&Value::Integer(-1)), Some(u32::MAX));
        assert_eq!(u64::from_value(&Value::Float(-2.5)), Some(0));
        assert_eq!(f64::from_value(&Value::Integer(2)), Some(2.0));
        assert_eq!(f32::from_value(&Value::Float(0.5)), Some(0.5));
        assert_eq!(i64::from_value(&Value::Bool(true)), Some(1));
        assert_eq!(u64::from_value(&Value::Unsigned(u64::MAX)), Some(u64::MAX));
        assert_eq!(i64::from_value(&Value::Unsigned(u64::MAX)), Some(-1));
    }

    #[test]
    fn non_numeric_values_do_not_convert_to_numbers() {
        assert_eq!(i32::from_value(&Value::from("1")), None);
        assert_eq!(f64::from_value(&Value::Null), None);
    }

    #[test]
    fn bool_and_string_are_strict() {
        assert_eq!(bool::from_value(&Value::Bool(true)), Some(true));
        assert_eq!(bool::from_value(&Value::Integer(1)), None);
        assert_eq!(String::from_value(&Value::from("hi")), Some("hi".to_string()));
        assert_eq!(String::from_value(&Value::Float(1.0)), None);
    }

    #[test]
    fn to_value_widens() {
        assert_eq!(7i32.to_value(), Value::Integer(7));
        assert_eq!(7u32.to_value(), Value::Integer(7));
        assert_eq!(0.25f32.to_value(), Value::Float(0.25));
        assert_eq!(u64::MAX.to_value(), Value::Unsigned(u64::MAX));
        assert_eq!(0.1f32.to_value(), Value::Float(0.1));
        assert_eq!(0.1f32.to_value().to_string(), "0.1");
        assert_eq!("s".to_string().to_value(), Value::from("s"));
    }

    #[test]
    fn kind_names() {
        assert_eq!(<f64 as Scalar>::KIND.to_string(), "f64");
        assert_eq!(<String as Scalar>::KIND.to_string(), "string");
    }
}
