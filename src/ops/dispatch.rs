//! Operation Dispatch Layer
//!
//! Selects the checked or unchecked kernel from the global [`Verification`] and
//! hands the global [`Backend`] to it.
//!
//! # Design Highlights
//! - **Uniform result**: every entry point returns [`Result`]; on the unchecked
//!   path it is always `Ok`
//! - **Observable**: each call emits a `trace` event with its shape, and a
//!   rejected call emits a `debug` event with the violation

use super::{Mapping, cpu};
use crate::backend::{Backend, Verification, get_backend, get_verification};
use crate::element::{Accumulate, Element, Real, RowIndex};
use crate::error::{KernelError, Result};
use crate::tensors::{MatrixMut, MatrixRef};

fn mode() -> (Verification, Backend) {
    (get_verification(), get_backend())
}

fn rejected(op: &'static str, err: &KernelError) {
    tracing::debug!(op, %err, "kernel call rejected");
}

/// Dispatches one-hot encoding.
pub fn one_hot_encode<L: RowIndex, T: Element>(
    labels: &[L],
    n_classes: usize,
    out: MatrixMut<'_, T>,
) -> Result<()> {
    let (verification, backend) = mode();
    tracing::trace!(n = labels.len(), n_classes, ?verification, ?backend, "one_hot_encode");
    match verification {
        Verification::Checked => cpu::one_hot_encode(labels, n_classes, out, backend)
            .inspect_err(|err| rejected("one_hot_encode", err)),
        Verification::Unchecked => {
            cpu::one_hot_encode_unchecked(labels, n_classes, out, backend);
            Ok(())
        }
    }
}

/// Dispatches one-hot decoding.
pub fn one_hot_decode<T: Element>(one_hot: MatrixRef<'_, T>, out: &mut [usize]) -> Result<()> {
    let (verification, backend) = mode();
    tracing::trace!(
        rows = one_hot.rows(),
        n_classes = one_hot.rowsize(),
        ?verification,
        ?backend,
        "one_hot_decode"
    );
    match verification {
        Verification::Checked => cpu::one_hot_decode(one_hot, out, backend)
            .inspect_err(|err| rejected("one_hot_decode", err)),
        Verification::Unchecked => {
            cpu::one_hot_decode_unchecked(one_hot, out, backend);
            Ok(())
        }
    }
}

/// Dispatches a row gather or scatter.
pub fn copy_rows<I: RowIndex, T: Element>(
    rowids: &[I],
    from: MatrixRef<'_, T>,
    to: MatrixMut<'_, T>,
    mapping: Mapping,
) -> Result<()> {
    let (verification, backend) = mode();
    tracing::trace!(
        numrows = rowids.len(),
        rowsize = from.rowsize(),
        ?mapping,
        ?verification,
        ?backend,
        "copy_rows"
    );
    match verification {
        Verification::Checked => cpu::copy_rows(rowids, from, to, mapping, backend)
            .inspect_err(|err| rejected("copy_rows", err)),
        Verification::Unchecked => {
            cpu::copy_rows_unchecked(rowids, from, to, mapping, backend);
            Ok(())
        }
    }
}

/// Dispatches a weighted multi-row sum.
#[allow(clippy::too_many_arguments)]
pub fn copy_sum_rows<I: RowIndex, T: Accumulate>(
    rowids: &[I],
    numrows: usize,
    from: MatrixRef<'_, T>,
    to: MatrixMut<'_, T>,
    mapping: Mapping,
    coefficients: &[T],
    constant: T,
    var: T,
) -> Result<()> {
    let (verification, backend) = mode();
    tracing::trace!(
        numsums = to.rows(),
        numrows,
        rowsize = to.rowsize(),
        ?mapping,
        ?verification,
        ?backend,
        "copy_sum_rows"
    );
    match verification {
        Verification::Checked => {
            cpu::copy_sum_rows(rowids, numrows, from, to, coefficients, constant, var, backend)
                .inspect_err(|err| rejected("copy_sum_rows", err))
        }
        Verification::Unchecked => {
            cpu::copy_sum_rows_unchecked(
                rowids,
                numrows,
                from,
                to,
                coefficients,
                constant,
                var,
                backend,
            );
            Ok(())
        }
    }
}

/// Dispatches geometric coefficient generation.
pub fn fill_geometric_coefficients<T: Accumulate>(
    out: &mut [T],
    numrows: usize,
    scale: T,
    ratio: T,
) -> Result<()> {
    let verification = get_verification();
    tracing::trace!(len = out.len(), numrows, ?verification, "fill_geometric_coefficients");
    match verification {
        Verification::Checked => cpu::fill_geometric_coefficients(out, numrows, scale, ratio)
            .inspect_err(|err| rejected("fill_geometric_coefficients", err)),
        Verification::Unchecked => {
            cpu::fill_geometric_coefficients_unchecked(out, numrows, scale, ratio);
            Ok(())
        }
    }
}

/// Dispatches row-wise softmax.
pub fn softmax<T: Real>(x: MatrixRef<'_, T>, out: MatrixMut<'_, T>) -> Result<()> {
    let (verification, backend) = mode();
    tracing::trace!(rows = x.rows(), rowsize = x.rowsize(), ?verification, ?backend, "softmax");
    match verification {
        Verification::Checked => {
            cpu::softmax(x, out, backend).inspect_err(|err| rejected("softmax", err))
        }
        Verification::Unchecked => {
            cpu::softmax_unchecked(x, out, backend);
            Ok(())
        }
    }
}

/// Dispatches categorical cross-entropy.
pub fn categorical_cross_entropy<T: Real>(
    y_pred: MatrixRef<'_, T>,
    y_true: MatrixRef<'_, T>,
    eps: T,
    out: &mut [T],
) -> Result<()> {
    let (verification, backend) = mode();
    tracing::trace!(
        rows = y_pred.rows(),
        n_classes = y_pred.rowsize(),
        ?verification,
        ?backend,
        "categorical_cross_entropy"
    );
    match verification {
        Verification::Checked => {
            cpu::categorical_cross_entropy(y_pred, y_true, eps, out, backend)
                .inspect_err(|err| rejected("categorical_cross_entropy", err))
        }
        Verification::Unchecked => {
            cpu::categorical_cross_entropy_unchecked(y_pred, y_true, eps, out, backend);
            Ok(())
        }
    }
}
