//! Core structprop: by-name field access for plain Rust structs
//!
//! A record type declares its fields once; afterwards any field can be set
//! or read by name with a dynamically-typed [`Value`], and all fields can be
//! enumerated without knowing their order or types:
//! - `Value`: the dynamic scalar form values travel in
//! - `Accessor`: how to reach one field (scalar type + storage kind)
//! - `FieldTable`: the per-type map from field name to accessor
//! - `Registries`: lazily populated tables for many record types
//! - `Reflect`: the registration entry point a record type implements
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use structprop_core::{reflect, Registries, Shared};
//!
//! struct Subject {
//!     num: i32,
//!     value: Shared<f64>,
//!     opt_value: Option<f64>,
//! }
//!
//! reflect!(Subject {
//!     num: direct,
//!     value: shared,
//!     "optValue" => opt_value: optional,
//! });
//!
//! let a = Rc::new(RefCell::new(5.0));
//! let mut s = Subject { num: 1, value: Rc::clone(&a), opt_value: None };
//!
//! let registries = Registries::new();
//! registries.set(&mut s, "value", 3.15).unwrap();
//! registries.set(&mut s, "optValue", 8.88).unwrap();
//! assert_eq!(*a.borrow(), 3.15);
//!
//! let mut out = String::new();
//! registries
//!     .visit(&s, |name, value| out.push_str(&format!("{name}: {value}\n")))
//!     .unwrap();
//! assert_eq!(out, "num: 1\nvalue: 3.15\noptValue: 8.88\n");
//! ```

mod accessor;
mod error;
mod ext;
mod name;
mod options;
mod reflect;
mod registries;
mod scalar;
mod strategy;
mod table;
mod value;

pub use accessor::{Accessor, Shared, Storage, StorageKind};
pub use error::{AccessError, Error};
pub use ext::{get, set, visit, Reflected};
pub use options::{DuplicatePolicy, RegistryOptions};
pub use reflect::Reflect;
pub use registries::Registries;
pub use scalar::{Scalar, ScalarKind};
pub use table::{FieldEntry, FieldInfo, FieldTable, Registrar};
pub use value::{Value, ABSENT};
