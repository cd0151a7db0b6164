//! Registries - one lazily populated field table per record type.
//!
//! A `Registries` set maps each record type (by `TypeId`) to a slot holding
//! its [`FieldTable`]. The slot is created on first reference and populated
//! exactly once by running the type's [`Reflect::register_fields`]. The
//! process-wide set is [`Registries::global`]; tests build their own.
//!
//! # Thread Safety
//!
//! `Registries` is `Send + Sync`. Concurrent first callers for the same
//! record type race to populate it; one runs the registration routine and
//! the others wait and get the finished table. No caller ever sees a partly
//! populated table.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::accessor::Accessor;
use crate::options::RegistryOptions;
use crate::reflect::Reflect;
use crate::table::{FieldInfo, FieldTable, Registrar};
use crate::{Error, Value};

/// Population state of one record type: empty until populated, then final.
///
/// A failed population is final too; every later caller gets the same error.
struct Slot<R> {
    table: OnceLock<Result<Arc<FieldTable<R>>, Error>>,
}

impl<R> Slot<R> {
    fn new() -> Self {
        Self {
            table: OnceLock::new(),
        }
    }
}

type AnySlot = Arc<dyn Any + Send + Sync>;

fn new_slot<R: Reflect>() -> AnySlot {
    Arc::new(Slot::<R>::new())
}

lazy_static::lazy_static! {
    static ref GLOBAL: Registries = Registries::new();
}

/// A set of per-record-type field tables.
pub struct Registries {
    options: RegistryOptions,
    slots: RwLock<HashMap<TypeId, AnySlot>>,
}

impl Registries {
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            options,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide set, created on first use with default options.
    pub fn global() -> &'static Registries {
        &GLOBAL
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// Whether `R` has been populated (successfully or not) in this set.
    pub fn is_populated<R: Reflect>(&self) -> bool {
        self.read_slots()
            .get(&TypeId::of::<R>())
            .and_then(|slot| slot.downcast_ref::<Slot<R>>())
            .is_some_and(|slot| slot.table.get().is_some())
    }

    /// Get the field table for `R`, populating it on first use.
    ///
    /// # Errors
    ///
    /// Returns the registration error if `R`'s registration routine named an
    /// invalid field, or a duplicate one under
    /// [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
    pub fn ensure_populated<R: Reflect>(&self) -> Result<Arc<FieldTable<R>>, Error> {
        let slot = self.slot::<R>()?;
        slot.table.get_or_init(|| self.populate::<R>()).clone()
    }

    /// Find the accessor registered for `name` on `R`.
    pub fn lookup<R: Reflect>(&self, name: &str) -> Result<Accessor<R>, Error> {
        self.ensure_populated::<R>()?.lookup(name).copied()
    }

    /// Shape of every field of `R`, in registration order.
    pub fn fields<R: Reflect>(&self) -> Result<Vec<FieldInfo>, Error> {
        Ok(self.ensure_populated::<R>()?.fields())
    }

    /// Assign `value` to the field `name` on `record`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownField`] if `name` is not registered for `R`
    /// - [`Error::TypeMismatch`] if `value` has no conversion to the field's type
    /// - [`Error::SharedBorrowed`] if a shared field's value is borrowed elsewhere
    ///
    /// On error, `record` and any shared value it refers to are unchanged.
    pub fn set<R: Reflect>(
        &self,
        record: &mut R,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), Error> {
        let table = self.ensure_populated::<R>()?;
        let accessor = table.lookup(name)?;
        let value = value.into();
        log::trace!(
            "set {}.{} ({} {}) = {}",
            table.record_name(),
            name,
            accessor.storage_kind(),
            accessor.scalar_kind(),
            value
        );
        accessor
            .assign(record, &value)
            .map_err(|e| e.at(table.record_name(), name))
    }

    /// Read the field `name` on `record`.
    pub fn get<R: Reflect>(&self, record: &R, name: &str) -> Result<Value, Error> {
        let table = self.ensure_populated::<R>()?;
        table
            .lookup(name)?
            .read(record)
            .map_err(|e| e.at(table.record_name(), name))
    }

    /// Every field of `record` with its current value, in registration order.
    pub fn snapshot<R: Reflect>(&self, record: &R) -> Result<Vec<(&'static str, Value)>, Error> {
        self.ensure_populated::<R>()?.snapshot(record)
    }

    /// Call `f` with the name and current value of every field of `record`,
    /// in registration order.
    ///
    /// All fields are read before the first call, so `f` is either called
    /// for every field or not at all.
    pub fn visit<R, F>(&self, record: &R, mut f: F) -> Result<(), Error>
    where
        R: Reflect,
        F: FnMut(&str, &Value),
    {
        for (name, value) in self.snapshot(record)? {
            f(name, &value);
        }
        Ok(())
    }

    fn populate<R: Reflect>(&self) -> Result<Arc<FieldTable<R>>, Error> {
        let mut registrar = Registrar::new(R::record_name(), self.options.duplicates);
        R::register_fields(&mut registrar);
        match registrar.finish() {
            Ok(table) => {
                log::debug!(
                    "populated field table for {} ({} fields)",
                    table.record_name(),
                    table.len()
                );
                Ok(Arc::new(table))
            }
            Err(error) => {
                log::debug!("population failed for {}: {}", R::record_name(), error);
                Err(error)
            }
        }
    }

    fn slot<R: Reflect>(&self) -> Result<Arc<Slot<R>>, Error> {
        let id = TypeId::of::<R>();

        let existing = self.read_slots().get(&id).cloned();
        let slot = match existing {
            Some(slot) => slot,
            None => Arc::clone(self.write_slots().entry(id).or_insert_with(new_slot::<R>)),
        };

        // Unreachable: every slot under `TypeId::of::<R>()` is made by
        // `new_slot::<R>`.
        slot.downcast::<Slot<R>>().map_err(|_| Error::Corrupted {
            record: R::record_name(),
        })
    }

    // Slots are only ever inserted, never mutated in place, so a poisoned
    // lock still guards a consistent map.
    fn read_slots(&self) -> RwLockReadGuard<'_, HashMap<TypeId, AnySlot>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slots(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, AnySlot>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Registrar, Shared, StorageKind};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    struct Subject {
        num: i32,
        value: Shared<f64>,
        opt_value: Option<f64>,
    }

    impl Reflect for Subject {
        fn register_fields(fields: &mut Registrar<Self>) {
            fields
                .direct("num", |s| &s.num, |s| &mut s.num)
                .shared("value", |s| &s.value)
                .optional("optValue", |s| &s.opt_value, |s| &mut s.opt_value);
        }

        fn record_name() -> &'static str {
            "Subject"
        }
    }

    fn subject(external: &Shared<f64>) -> Subject {
        Subject {
            num: 1,
            value: Rc::clone(external),
            opt_value: None,
        }
    }

    static COUNTED_RUNS: AtomicUsize = AtomicUsize::new(0);

    struct Counted {
        level: u32,
    }

    impl Reflect for Counted {
        fn register_fields(fields: &mut Registrar<Self>) {
            COUNTED_RUNS.fetch_add(1, Ordering::SeqCst);
            fields.direct("level", |c| &c.level, |c| &mut c.level);
        }
    }

    static RACED_RUNS: AtomicUsize = AtomicUsize::new(0);

    struct Raced {
        a: i64,
        b: i64,
        c: i64,
    }

    impl Reflect for Raced {
        fn register_fields(fields: &mut Registrar<Self>) {
            RACED_RUNS.fetch_add(1, Ordering::SeqCst);
            fields
                .direct("a", |r| &r.a, |r| &mut r.a)
                .direct("b", |r| &r.b, |r| &mut r.b);
            std::thread::yield_now();
            fields.direct("c", |r| &r.c, |r| &mut r.c);
        }
    }

    struct Broken {
        x: i32,
    }

    impl Reflect for Broken {
        fn register_fields(fields: &mut Registrar<Self>) {
            fields.direct("x y", |b| &b.x, |b| &mut b.x);
        }
    }

    #[test]
    fn subject_scenario() {
        let registries = Registries::new();
        let external = Rc::new(RefCell::new(5.0));
        let mut s = subject(&external);

        registries.set(&mut s, "value", 3.15).unwrap();
        registries.set(&mut s, "optValue", 8.88).unwrap();

        let mut lines = Vec::new();
        registries
            .visit(&s, |name, value| lines.push(format!("{}: {}", name, value)))
            .unwrap();
        assert_eq!(lines, ["num: 1", "value: 3.15", "optValue: 8.88"]);
        assert_eq!(*external.borrow(), 3.15);

        let err = registries.set(&mut s, "nonexistent", 1).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownField {
                record: "Subject",
                field: "nonexistent".to_string()
            }
        );
        assert_eq!(s.num, 1);
        assert_eq!(*external.borrow(), 3.15);
        assert_eq!(s.opt_value, Some(8.88));
    }

    #[test]
    fn never_set_optional_visits_as_placeholder() {
        let registries = Registries::new();
        let external = Rc::new(RefCell::new(5.0));
        let s = subject(&external);

        let mut seen = Vec::new();
        registries
            .visit(&s, |name, value| seen.push((name.to_string(), value.to_string())))
            .unwrap();
        assert_eq!(seen[2], ("optValue".to_string(), "--".to_string()));
        assert_eq!(seen[1].1, "5");
    }

    #[test]
    fn get_and_lookup() {
        let registries = Registries::new();
        let external = Rc::new(RefCell::new(5.0));
        let s = subject(&external);

        assert_eq!(registries.get(&s, "num").unwrap(), Value::Integer(1));
        assert_eq!(registries.get(&s, "value").unwrap(), Value::Float(5.0));
        assert!(matches!(
            registries.get(&s, "numb"),
            Err(Error::UnknownField { .. })
        ));

        let accessor = registries.lookup::<Subject>("value").unwrap();
        assert_eq!(accessor.storage_kind(), StorageKind::Shared);
        assert!(registries.lookup::<Subject>("missing").is_err());
    }

    #[test]
    fn type_mismatch_is_reported_at_assignment() {
        let registries = Registries::new();
        let external = Rc::new(RefCell::new(5.0));
        let mut s = subject(&external);

        let err = registries.set(&mut s, "value", "three").unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { ref field, got: "string", .. } if field == "value"
        ));
        assert_eq!(*external.borrow(), 5.0);
    }

    #[test]
    fn population_runs_once_per_set() {
        let first = Registries::new();
        assert!(!first.is_populated::<Counted>());

        let mut c = Counted { level: 0 };
        let before = COUNTED_RUNS.load(Ordering::SeqCst);
        for i in 0..5u32 {
            first.set(&mut c, "level", i).unwrap();
            first.fields::<Counted>().unwrap();
        }
        assert_eq!(COUNTED_RUNS.load(Ordering::SeqCst) - before, 1);
        assert!(first.is_populated::<Counted>());
        assert_eq!(c.level, 4);

        // An independent set populates independently.
        let second = Registries::new();
        second.fields::<Counted>().unwrap();
        assert_eq!(COUNTED_RUNS.load(Ordering::SeqCst) - before, 2);
    }

    #[test]
    fn concurrent_first_use_populates_once() {
        const THREADS: usize = 8;
        let registries = Registries::new();
        let barrier = Barrier::new(THREADS);

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    barrier.wait();
                    let table = registries.ensure_populated::<Raced>().unwrap();
                    let names: Vec<_> = table.entries().iter().map(|e| e.name()).collect();
                    assert_eq!(names, ["a", "b", "c"]);
                });
            }
        });

        assert_eq!(RACED_RUNS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_population_is_sticky() {
        let registries = Registries::new();
        let mut b = Broken { x: 0 };

        let first = registries.set(&mut b, "x", 1).unwrap_err();
        assert!(matches!(first, Error::InvalidFieldName { .. }));
        assert!(registries.is_populated::<Broken>());
        assert_eq!(registries.fields::<Broken>().unwrap_err(), first);
        assert_eq!(b.x, 0);
    }

    #[test]
    fn global_is_shared() {
        assert!(std::ptr::eq(Registries::global(), Registries::global()));
        assert_eq!(Registries::global().options(), &RegistryOptions::default());
    }
}
