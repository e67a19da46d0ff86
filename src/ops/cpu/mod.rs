//! Parallel CPU kernels
//!
//! # CPU Backend
//!
//! Every kernel comes in two forms with identical semantics:
//!
//! - `name(..) -> Result<()>` validates all preconditions, then runs.
//! - `name_unchecked(..)` assumes they hold. It contains no `unsafe`, so a
//!   violated precondition panics on slice indexing instead of corrupting memory.
//!
//! ## Features
//!
//! - Output rows are written by independent tasks via [`rayon`](https://docs.rs/rayon)
//!   when the backend is [`Backend::Parallel`]
//! - No allocation: inputs, outputs, indices and coefficients are borrowed
//!
//! ## Implemented Ops
//!
//! - `one_hot_encode` / `one_hot_decode`
//! - `copy_rows`: gather or scatter rows by index
//! - `copy_sum_rows`: weighted, scaled and biased multi-row sums
//! - `softmax`, `categorical_cross_entropy`

use crate::backend::Backend;
use rayon::prelude::*;

mod copy_rows;
pub use self::copy_rows::{copy_rows, copy_rows_unchecked};

mod copy_sum_rows;
pub use self::copy_sum_rows::{
    copy_sum_rows, copy_sum_rows_unchecked, fill_geometric_coefficients,
    fill_geometric_coefficients_unchecked,
};

mod cross_entropy;
pub use self::cross_entropy::{categorical_cross_entropy, categorical_cross_entropy_unchecked};

mod one_hot;
pub use self::one_hot::{
    one_hot_decode, one_hot_decode_unchecked, one_hot_encode, one_hot_encode_unchecked,
};

mod softmax;
pub use self::softmax::{softmax, softmax_unchecked};

/// Runs `f(i, row)` for every `rowsize`-long row of `out`.
///
/// A zero `rowsize` means there is nothing to write.
pub(crate) fn for_each_row<T, F>(out: &mut [T], rowsize: usize, backend: Backend, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if rowsize == 0 {
        return;
    }
    match backend {
        Backend::Parallel => out
            .par_chunks_mut(rowsize)
            .enumerate()
            .for_each(|(i, row)| f(i, row)),
        Backend::Serial => out
            .chunks_mut(rowsize)
            .enumerate()
            .for_each(|(i, row)| f(i, row)),
    }
}

/// Row addressed by `index`, or an impossible row if it has none.
///
/// Used by the unchecked kernels: an impossible row panics on indexing.
#[inline]
pub(crate) fn row_of<I: crate::element::RowIndex>(index: I) -> usize {
    index.to_row().unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_and_parallel_visit_the_same_rows() {
        for backend in [Backend::Parallel, Backend::Serial] {
            let mut out = [0usize; 12];
            for_each_row(&mut out, 3, backend, |i, row| row.fill(i));
            assert_eq!(out, [0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
        }
    }

    #[test]
    fn zero_rowsize_is_a_no_op() {
        let mut out: [f32; 0] = [];
        for_each_row(&mut out, 0, Backend::Parallel, |_, _| unreachable!());
    }
}
