//! Registry configuration.

/// What to do when a registration routine names the same field twice.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail population with [`Error::DuplicateField`](crate::Error::DuplicateField).
    #[default]
    Reject,
    /// Replace the earlier descriptor; the field keeps its original position
    /// in visitation order.
    Overwrite,
}

/// Options for a [`Registries`](crate::Registries) set.
///
/// ```rust
/// use structprop_core::{DuplicatePolicy, Registries, RegistryOptions};
///
/// let registries = Registries::with_options(
///     RegistryOptions::default().duplicates(DuplicatePolicy::Overwrite),
/// );
/// assert_eq!(registries.options().duplicates, DuplicatePolicy::Overwrite);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    pub duplicates: DuplicatePolicy,
}

impl RegistryOptions {
    #[must_use]
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}
