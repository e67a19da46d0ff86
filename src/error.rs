//! Precondition violations reported by the checked kernels.
//!
//! Every variant describes a caller bug rather than a recoverable runtime
//! state: the call is rejected before anything is written to the output.

/// Errors returned by the checked kernel entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// A class label lies outside `[0, n_classes)`.
    #[error("label {label} at position {position} is outside [0, {n_classes})")]
    InvalidLabel {
        /// Position of the offending label in the label vector.
        position: usize,
        /// The label value, widened for display.
        label: i128,
        /// Number of classes the encoder was asked for.
        n_classes: usize,
    },

    /// A row index does not address a row of the matrix it refers to.
    #[error("row index {index} at position {position} is out of range for {rows} rows")]
    IndexOutOfRange {
        /// Position of the offending entry in `rowids`.
        position: usize,
        /// The index value, widened for display.
        index: i128,
        /// Row count of the addressed matrix.
        rows: usize,
    },

    /// A buffer or shape disagrees with the declared dimensions.
    #[error("size mismatch for {what}: expected {expected}, got {got}")]
    SizeMismatch {
        /// Which buffer or dimension was inconsistent.
        what: &'static str,
        /// The length implied by the other arguments.
        expected: usize,
        /// The length actually supplied.
        got: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, KernelError>;

impl KernelError {
    pub(crate) fn size(what: &'static str, expected: usize, got: usize) -> Self {
        Self::SizeMismatch {
            what,
            expected,
            got,
        }
    }
}
