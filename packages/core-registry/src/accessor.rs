//! Accessor descriptors - how to reach one field on any instance of a record.
//!
//! A descriptor is plain data: a pair of tags (scalar type, storage kind) and
//! the function pointers that project a record onto the field. It never points
//! into a particular instance, so one descriptor serves every instance.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::scalar::ScalarKind;

/// Handle to a value owned outside the record.
///
/// Cloning the handle aliases the same value; a write through any clone is
/// visible through all of them.
pub type Shared<T> = Rc<RefCell<T>>;

/// How a field holds its value.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum StorageKind {
    /// The value lives directly in the record.
    Direct,
    /// The value lives in the record as an `Option`.
    Optional,
    /// The record holds a [`Shared`] handle to a value it does not own.
    Shared,
}

impl StorageKind {
    pub fn name(self) -> &'static str {
        match self {
            StorageKind::Direct => "direct",
            StorageKind::Optional => "optional",
            StorageKind::Shared => "shared",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Projection of a record `R` onto a field holding `T`, one variant per
/// storage kind.
pub enum Storage<R, T> {
    Direct {
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    },
    Optional {
        get: fn(&R) -> &Option<T>,
        get_mut: fn(&mut R) -> &mut Option<T>,
    },
    /// Shared fields are only ever written through the handle, so a shared
    /// projection is all that's needed.
    Shared { get: fn(&R) -> &Shared<T> },
}

impl<R, T> Storage<R, T> {
    pub fn direct(get: fn(&R) -> &T, get_mut: fn(&mut R) -> &mut T) -> Self {
        Storage::Direct { get, get_mut }
    }

    pub fn optional(get: fn(&R) -> &Option<T>, get_mut: fn(&mut R) -> &mut Option<T>) -> Self {
        Storage::Optional { get, get_mut }
    }

    pub fn shared(get: fn(&R) -> &Shared<T>) -> Self {
        Storage::Shared { get }
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Storage::Direct { .. } => StorageKind::Direct,
            Storage::Optional { .. } => StorageKind::Optional,
            Storage::Shared { .. } => StorageKind::Shared,
        }
    }
}

// Manual impls: function pointers are `Copy` whatever `R` and `T` are.
impl<R, T> Clone for Storage<R, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, T> Copy for Storage<R, T> {}

impl<R, T> fmt::Debug for Storage<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Storage").field(&self.kind()).finish()
    }
}

/// Descriptor for one registered field of record type `R`.
///
/// Closed over the supported scalar types; each variant carries the
/// [`Storage`] projection for that type. Built through
/// [`Registrar`](crate::Registrar), never by hand in normal use.
pub enum Accessor<R> {
    Bool(Storage<R, bool>),
    I32(Storage<R, i32>),
    I64(Storage<R, i64>),
    U32(Storage<R, u32>),
    U64(Storage<R, u64>),
    F32(Storage<R, f32>),
    F64(Storage<R, f64>),
    String(Storage<R, String>),
}

impl<R> Accessor<R> {
    pub fn scalar_kind(&self) -> ScalarKind {
        match self {
            Accessor::Bool(_) => ScalarKind::Bool,
            Accessor::I32(_) => ScalarKind::I32,
            Accessor::I64(_) => ScalarKind::I64,
            Accessor::U32(_) => ScalarKind::U32,
            Accessor::U64(_) => ScalarKind::U64,
            Accessor::F32(_) => ScalarKind::F32,
            Accessor::F64(_) => ScalarKind::F64,
            Accessor::String(_) => ScalarKind::String,
        }
    }

    pub fn storage_kind(&self) -> StorageKind {
        match self {
            Accessor::Bool(s) => s.kind(),
            Accessor::I32(s) => s.kind(),
            Accessor::I64(s) => s.kind(),
            Accessor::U32(s) => s.kind(),
            Accessor::U64(s) => s.kind(),
            Accessor::F32(s) => s.kind(),
            Accessor::F64(s) => s.kind(),
            Accessor::String(s) => s.kind(),
        }
    }
}

impl<R> Clone for Accessor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Accessor<R> {}

impl<R> fmt::Debug for Accessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("scalar", &self.scalar_kind())
            .field("storage", &self.storage_kind())
            .finish()
    }
}
