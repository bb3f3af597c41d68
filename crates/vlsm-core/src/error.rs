// ── Core error types ──
//
// Errors surfaced by the arithmetic layer and the allocator. Both are
// deterministic outcomes of the inputs: nothing here is transient, so
// callers never retry.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// Malformed address or CIDR text reached the arithmetic layer.
    ///
    /// Callers that gate input through [`validate_cidr`](crate::validate_cidr)
    /// never see this; seeing it means that gate was skipped.
    #[error("malformed address '{input}': {reason}")]
    Format { input: String, reason: String },

    // ── Allocation errors ────────────────────────────────────────────
    /// The sorted requirements ran past the parent's broadcast address.
    #[error(
        "insufficient address space in {parent}; cannot allocate subnet '{name}' needing {hosts} hosts"
    )]
    CapacityExceeded {
        /// Parent CIDR exactly as the caller supplied it.
        parent: String,
        /// Name of the first requirement that did not fit.
        name: String,
        hosts: u32,
    },
}

impl CoreError {
    pub(crate) fn format(input: &str, reason: impl Into<String>) -> Self {
        Self::Format {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }
}
