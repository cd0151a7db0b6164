//! Assignment and read strategies for each storage kind.
//!
//! Dispatch is two exhaustive matches: the accessor tag picks the scalar type,
//! the storage tag picks how the value is held.

use crate::accessor::{Accessor, Storage};
use crate::error::AccessError;
use crate::scalar::Scalar;
use crate::Value;

impl<R, T: Scalar> Storage<R, T> {
    /// Convert `value` and write it into the field on `record`.
    ///
    /// The conversion happens before anything is written, so a mismatch
    /// leaves the record untouched.
    pub fn assign(&self, record: &mut R, value: &Value) -> Result<(), AccessError> {
        let converted = T::from_value(value).ok_or(AccessError::TypeMismatch {
            expected: T::KIND,
            got: value.type_name(),
        })?;

        match *self {
            Storage::Direct { get_mut, .. } => *get_mut(record) = converted,
            Storage::Optional { get_mut, .. } => *get_mut(record) = Some(converted),
            Storage::Shared { get } => {
                let mut target = get(&*record)
                    .try_borrow_mut()
                    .map_err(|_| AccessError::SharedBorrowed)?;
                *target = converted;
            }
        }
        Ok(())
    }

    /// Read the current value. An empty optional reads as `Value::Null`.
    pub fn read(&self, record: &R) -> Result<Value, AccessError> {
        match *self {
            Storage::Direct { get, .. } => Ok(get(record).to_value()),
            Storage::Optional { get, .. } => Ok(get(record)
                .as_ref()
                .map_or(Value::Null, T::to_value)),
            Storage::Shared { get } => get(record)
                .try_borrow()
                .map(|v| v.to_value())
                .map_err(|_| AccessError::SharedBorrowed),
        }
    }
}

macro_rules! each_scalar {
    ($accessor:expr, $storage:ident => $body:expr) => {
        match $accessor {
            Accessor::Bool($storage) => $body,
            Accessor::I32($storage) => $body,
            Accessor::I64($storage) => $body,
            Accessor::U32($storage) => $body,
            Accessor::U64($storage) => $body,
            Accessor::F32($storage) => $body,
            Accessor::F64($storage) => $body,
            Accessor::String($storage) => $body,
        }
    };
}

impl<R> Accessor<R> {
    /// Write `value` into this field on `record`.
    pub fn assign(&self, record: &mut R, value: &Value) -> Result<(), AccessError> {
        each_scalar!(self, storage => storage.assign(record, value))
    }

    /// Read this field's current value from `record`.
    pub fn read(&self, record: &R) -> Result<Value, AccessError> {
        each_scalar!(self, storage => storage.read(record))
    }
}
