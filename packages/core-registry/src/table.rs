//! FieldTable - the per-record-type map from field name to accessor.
//!
//! A table is built once by a [`Registrar`] while the record type's
//! registration routine runs, then frozen. Lookups go through a name index;
//! iteration follows registration order.

use std::collections::HashMap;

use crate::accessor::{Accessor, Shared, Storage, StorageKind};
use crate::name::validate_field_name;
use crate::options::DuplicatePolicy;
use crate::scalar::{Scalar, ScalarKind};
use crate::{Error, Value};

/// One registered field.
pub struct FieldEntry<R> {
    name: &'static str,
    accessor: Accessor<R>,
}

impl<R> FieldEntry<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn accessor(&self) -> &Accessor<R> {
        &self.accessor
    }

    pub fn info(&self) -> FieldInfo {
        FieldInfo {
            name: self.name,
            scalar: self.accessor.scalar_kind(),
            storage: self.accessor.storage_kind(),
        }
    }
}

/// Shape of a registered field, without the means to reach it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub scalar: ScalarKind,
    pub storage: StorageKind,
}

/// The populated field table of record type `R`.
pub struct FieldTable<R> {
    record: &'static str,
    entries: Vec<FieldEntry<R>>,
    index: HashMap<&'static str, usize>,
}

impl<R> FieldTable<R> {
    /// Name of the record type this table describes.
    pub fn record_name(&self) -> &'static str {
        self.record
    }

    /// Find the accessor registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if `name` was never registered.
    pub fn lookup(&self, name: &str) -> Result<&Accessor<R>, Error> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i].accessor)
            .ok_or_else(|| Error::UnknownField {
                record: self.record,
                field: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All entries, in registration order.
    pub fn entries(&self) -> &[FieldEntry<R>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fields(&self) -> Vec<FieldInfo> {
        self.entries.iter().map(FieldEntry::info).collect()
    }

    /// Read every field of `record`, in registration order.
    ///
    /// Either every field is read or an error is returned; there is no
    /// partial result.
    pub fn snapshot(&self, record: &R) -> Result<Vec<(&'static str, Value)>, Error> {
        self.entries
            .iter()
            .map(|entry| {
                entry
                    .accessor
                    .read(record)
                    .map(|value| (entry.name, value))
                    .map_err(|e| e.at(self.record, entry.name))
            })
            .collect()
    }
}

/// Collects the fields of record type `R` while its registration routine runs.
///
/// Handed to [`Reflect::register_fields`](crate::Reflect::register_fields).
/// The first invalid or rejected registration is remembered and fails the
/// whole population; later calls are ignored.
pub struct Registrar<R> {
    record: &'static str,
    policy: DuplicatePolicy,
    entries: Vec<FieldEntry<R>>,
    index: HashMap<&'static str, usize>,
    error: Option<Error>,
}

impl<R> Registrar<R> {
    pub(crate) fn new(record: &'static str, policy: DuplicatePolicy) -> Self {
        Self {
            record,
            policy,
            entries: Vec::new(),
            index: HashMap::new(),
            error: None,
        }
    }

    /// Register a field holding `T` directly.
    pub fn direct<T: Scalar>(
        &mut self,
        name: &'static str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> &mut Self {
        self.field(name, Storage::direct(get, get_mut))
    }

    /// Register a field holding `Option<T>`.
    pub fn optional<T: Scalar>(
        &mut self,
        name: &'static str,
        get: fn(&R) -> &Option<T>,
        get_mut: fn(&mut R) -> &mut Option<T>,
    ) -> &mut Self {
        self.field(name, Storage::optional(get, get_mut))
    }

    /// Register a field holding a [`Shared`] handle to an external `T`.
    pub fn shared<T: Scalar>(
        &mut self,
        name: &'static str,
        get: fn(&R) -> &Shared<T>,
    ) -> &mut Self {
        self.field(name, Storage::shared(get))
    }

    pub fn field<T: Scalar>(&mut self, name: &'static str, storage: Storage<R, T>) -> &mut Self {
        self.register(name, T::tag(storage))
    }

    /// Register `accessor` under `name`.
    ///
    /// Naming the same field twice is a mistake in the registration routine.
    /// It fails population under [`DuplicatePolicy::Reject`] and replaces the
    /// earlier accessor under [`DuplicatePolicy::Overwrite`].
    pub fn register(&mut self, name: &'static str, accessor: Accessor<R>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }

        if let Err(message) = validate_field_name(name) {
            self.error = Some(Error::InvalidFieldName {
                record: self.record,
                field: name.to_string(),
                message,
            });
            return self;
        }

        match self.index.get(name) {
            Some(&i) => match self.policy {
                DuplicatePolicy::Reject => {
                    self.error = Some(Error::DuplicateField {
                        record: self.record,
                        field: name.to_string(),
                    });
                }
                DuplicatePolicy::Overwrite => {
                    log::warn!("field '{}' on {} registered twice, overwriting", name, self.record);
                    self.entries[i].accessor = accessor;
                }
            },
            None => {
                self.index.insert(name, self.entries.len());
                self.entries.push(FieldEntry { name, accessor });
            }
        }
        self
    }

    pub(crate) fn finish(self) -> Result<FieldTable<R>, Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(FieldTable {
            record: self.record,
            entries: self.entries,
            index: self.index,
        })
    }
}
