//! structprop: set, get and enumerate struct fields by name at runtime.
//!
//! A record type lists its fields once (with [`reflect!`] or a hand-written
//! [`Reflect`] impl). From then on any field can be written or read by name
//! through a dynamically-typed [`Value`], and every field can be visited
//! generically. See [`structprop_core`] for the layer this re-exports.

pub use structprop_core::*;

/// The names most callers need.
pub mod prelude {
    pub use structprop_core::{reflect, Reflect, Reflected, Registrar, Registries, Shared, Value};
}
