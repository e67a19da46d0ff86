//! # Operation Layer
//!
//! Kernels and the layer that dispatches to them.
//!
//! ## Submodules
//!
//! - [`cpu`]: the kernels themselves, each in a checked and an `_unchecked` form
//! - [`dispatch`]: picks the variant and backend from [`crate::backend`] and logs
//! - `checks`: precondition validation shared by the checked kernels
//!
//! ## Adding an operation
//!
//! 1. Implement the unchecked kernel in `cpu`
//! 2. Add its preconditions to `checks` and a checked wrapper next to the kernel
//! 3. Route it through `dispatch` and expose it in [`crate::nnet`]
//!
//! ## Notes
//!
//! - Kernels never allocate; every buffer is supplied by the caller
//! - A checked kernel validates everything before its first write

pub mod cpu;
pub mod dispatch;

mod checks;

/// Direction of a row copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mapping {
    /// `to[i] = from[rowids[i]]`: output row `i` pulls from the addressed row.
    #[default]
    Gather,
    /// `to[rowids[i]] = from[i]`: source row `i` is pushed to the addressed row.
    Scatter,
}
