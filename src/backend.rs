//! Runtime configuration of the kernels.
//!
//! Two process-wide switches control how the facade functions in
//! [`crate::nnet`] run:
//!
//! - [`Backend`] selects whether row-parallel kernels run on the `rayon` pool
//!   (`Parallel`, the default) or on the calling thread (`Serial`).
//! - [`Verification`] selects the checked path, which validates every
//!   precondition before writing, or the unchecked fast path.
//!
//! Both are stored globally in `AtomicU8`s so they can be flipped at runtime,
//! e.g. to turn validation on while debugging a production pipeline.

use core::convert::TryFrom;
use core::sync::atomic::{AtomicU8, Ordering};

/// Where row-parallel work is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Backend {
    /// Rows are distributed over the global `rayon` thread pool.
    #[default]
    Parallel = 0,
    /// Rows are processed in order on the calling thread.
    Serial,
}

impl TryFrom<u8> for Backend {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Parallel),
            1 => Ok(Self::Serial),
            _ => Err(()),
        }
    }
}

/// Whether the facade validates preconditions before running a kernel.
///
/// Defaults to `Checked` in debug builds and `Unchecked` in release builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Verification {
    /// Validate every precondition and report [`crate::KernelError`]s.
    Checked = 0,
    /// Assume the preconditions hold. Violations panic on slice indexing.
    Unchecked,
}

impl Default for Verification {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

impl TryFrom<u8> for Verification {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Checked),
            1 => Ok(Self::Unchecked),
            _ => Err(()),
        }
    }
}

/// Sentinel meaning "never set, use the build default".
const UNSET: u8 = u8::MAX;

/// Global state. Expected to change rarely and never while a kernel runs.
static GLOBAL_BACKEND: AtomicU8 = AtomicU8::new(Backend::Parallel as u8);
/// Starts [`UNSET`] so the build profile decides.
static GLOBAL_VERIFICATION: AtomicU8 = AtomicU8::new(UNSET);

/// Sets where row-parallel kernels run.
///
/// # Example
///
/// ```
/// use briny_nnet::backend::{get_backend, set_backend, Backend};
/// set_backend(Backend::Serial);
/// assert_eq!(get_backend(), Backend::Serial);
/// set_backend(Backend::Parallel);
/// ```
pub fn set_backend(b: Backend) {
    tracing::debug!(backend = ?b, "kernel backend changed");
    GLOBAL_BACKEND.store(b as u8, Ordering::Release);
}

/// Returns the active backend, falling back to [`Backend::Parallel`] on an
/// invalid stored value.
pub fn get_backend() -> Backend {
    Backend::try_from(GLOBAL_BACKEND.load(Ordering::Acquire)).unwrap_or_default()
}

/// Sets whether the facade runs the checked or the unchecked kernels.
pub fn set_verification(v: Verification) {
    tracing::debug!(verification = ?v, "kernel verification changed");
    GLOBAL_VERIFICATION.store(v as u8, Ordering::Release);
}

/// Returns the active verification mode.
///
/// Until [`set_verification`] is called this is [`Verification::default`].
pub fn get_verification() -> Verification {
    Verification::try_from(GLOBAL_VERIFICATION.load(Ordering::Acquire)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_are_rejected() {
        assert_eq!(Backend::try_from(1), Ok(Backend::Serial));
        assert!(Backend::try_from(7).is_err());
        assert!(Verification::try_from(UNSET).is_err());
    }

    #[test]
    fn default_verification_follows_build_profile() {
        let expected = if cfg!(debug_assertions) {
            Verification::Checked
        } else {
            Verification::Unchecked
        };
        assert_eq!(Verification::default(), expected);
    }
}
