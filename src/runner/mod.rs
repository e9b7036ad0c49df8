//! Host runner layer.
//!
//! This module provides types and traits for:
//! - A frozen snapshot of the process environment ([`Environment`])
//! - The host command channel for secrets, warnings, outputs and
//!   failures ([`Runner`], [`ActionsRunner`])
//! - The event that triggered the job ([`TriggerContext`])

mod actions;
mod context;
mod environment;

#[cfg(test)]
pub(crate) mod testing;


pub use actions::{ActionsRunner, escape_data};
pub use context::{RepoRef, TriggerContext};
pub use environment::Environment;

/// Command channel to the host that runs the job.
///
/// Implementations report everything that has to leave the process other
/// than logs: redaction requests, user-visible warnings, step outputs and
/// the failure signal.
pub trait Runner: Send + Sync {
    /// Registers a value the host must redact from all later logs.
    fn mask(&self, secret: &str);

    /// Surfaces a non-fatal warning to the user.
    fn warning(&self, message: &str);

    /// Records a step output.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the output channel cannot be written.
    fn set_output(&self, name: &str, value: &str) -> std::io::Result<()>;

    /// Marks the step as failed with the given message.
    fn set_failed(&self, message: &str);

    /// Returns true when the host run has debug logging enabled.
    fn is_debug(&self) -> bool;
}
