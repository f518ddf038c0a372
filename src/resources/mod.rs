//! Idempotent resource primitives (check + apply pattern).
pub mod fs;
pub mod profile_entry;
pub mod tool;

use anyhow::Result;

/// State of a resource (installed tool, profile line, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
}

/// Unified interface for resources that can be checked and applied.
///
/// All resources follow the same check-then-apply pattern: callers inspect
/// [`Resource::current_state`] and only call [`Resource::apply`] when a
/// change is needed (or unconditionally, since `apply` is itself
/// idempotent).
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined due to I/O
    /// failures or other system errors.
    fn current_state(&self) -> Result<ResourceState>;

    /// Bring the resource to the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O
    /// failures, permission issues, or a failing external command.
    fn apply(&self) -> Result<ResourceChange>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Resource::current_state`].
    fn needs_change(&self) -> Result<bool> {
        Ok(!matches!(self.current_state()?, ResourceState::Correct))
    }
}
