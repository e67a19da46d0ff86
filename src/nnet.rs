//! Neural-network helper kernels.
//!
//! # One-hot, row gather/scatter and embedding-bag pooling
//!
//! Entry points come in two flavours:
//!
//! - **Into caller buffers** (`one_hot_encode`, `copy_rows`, `copy_sum_rows`, ...):
//!   write into a [`MatrixMut`] the caller allocated. These never allocate.
//! - **Allocating** (`one_hot`, `gather_rows`, `sum_rows`, ...): size and
//!   allocate the output, then run the same kernel.
//!
//! All of them dispatch through [`crate::ops::dispatch`], so the global
//! [`Verification`](crate::backend::Verification) decides whether preconditions
//! are validated and the global [`Backend`](crate::backend::Backend) decides
//! whether rows run on the `rayon` pool.
//!
//! ## Usage Guidelines
//!
//! - Shapes travel with the views; nothing is inferred or broadcast.
//! - On the checked path a returned error means the output was not touched.
//! - Scatter with repeated destination ids is last-writer-wins. Keep ids unique
//!   unless that is what you want.
//!
//! # Example
//! ```rust
//! use briny_nnet::{matrix, nnet};
//!
//! let targets: briny_nnet::Matrix<f32> = nnet::one_hot(&[0i32, 2, 1], 3)?;
//! assert_eq!(targets, matrix![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]]);
//! assert_eq!(nnet::decode_labels(targets.view())?, vec![0, 2, 1]);
//! # Ok::<(), briny_nnet::KernelError>(())
//! ```

use crate::element::{Accumulate, Element, Real, RowIndex};
use crate::error::Result;
use crate::ops::{Mapping, dispatch};
use crate::tensors::{Matrix, MatrixMut, MatrixRef};

/// Clipping bound used by [`cross_entropy_losses`].
pub const DEFAULT_EPS: f64 = 1e-15;

/// One-hot encodes `labels` into `out`, which must be `labels.len() x n_classes`.
///
/// # Errors
/// `SizeMismatch` for a wrongly shaped `out`, `InvalidLabel` for a label
/// outside `[0, n_classes)`.
pub fn one_hot_encode<L: RowIndex, T: Element>(
    labels: &[L],
    n_classes: usize,
    out: MatrixMut<'_, T>,
) -> Result<()> {
    dispatch::one_hot_encode(labels, n_classes, out)
}

/// Allocating form of [`one_hot_encode`].
///
/// # Errors
/// `InvalidLabel` for a label outside `[0, n_classes)`.
pub fn one_hot<L: RowIndex, T: Element>(labels: &[L], n_classes: usize) -> Result<Matrix<T>> {
    let mut out = Matrix::zeros(labels.len(), n_classes);
    dispatch::one_hot_encode(labels, n_classes, out.view_mut())?;
    Ok(out)
}

/// Writes the argmax column of every row of `one_hot` into `out`.
///
/// # Errors
/// `SizeMismatch` if `out.len()` differs from the row count or rows are empty.
pub fn one_hot_decode<T: Element>(one_hot: MatrixRef<'_, T>, out: &mut [usize]) -> Result<()> {
    dispatch::one_hot_decode(one_hot, out)
}

/// Allocating form of [`one_hot_decode`].
///
/// # Errors
/// `SizeMismatch` if rows are empty.
pub fn decode_labels<T: Element>(one_hot: MatrixRef<'_, T>) -> Result<Vec<usize>> {
    let mut out = vec![0; one_hot.rows()];
    dispatch::one_hot_decode(one_hot, &mut out)?;
    Ok(out)
}

/// Copies rows by index: `to[i] = from[rowids[i]]` for [`Mapping::Gather`],
/// `to[rowids[i]] = from[i]` for [`Mapping::Scatter`].
///
/// Scatter runs sequentially in index order, so repeated ids resolve to the
/// last source row naming them.
///
/// # Errors
/// `SizeMismatch` for inconsistent shapes, `IndexOutOfRange` for an id outside
/// the addressed matrix.
pub fn copy_rows<I: RowIndex, T: Element>(
    rowids: &[I],
    from: MatrixRef<'_, T>,
    to: MatrixMut<'_, T>,
    mapping: Mapping,
) -> Result<()> {
    dispatch::copy_rows(rowids, from, to, mapping)
}

/// Allocating gather: returns a `rowids.len() x from.rowsize()` matrix with
/// row `i` equal to `from[rowids[i]]`.
///
/// # Errors
/// `IndexOutOfRange` for an id outside `from`.
pub fn gather_rows<I: RowIndex, T: Element>(
    rowids: &[I],
    from: MatrixRef<'_, T>,
) -> Result<Matrix<T>> {
    let mut out = Matrix::zeros(rowids.len(), from.rowsize());
    dispatch::copy_rows(rowids, from, out.view_mut(), Mapping::Gather)?;
    Ok(out)
}

/// Allocating scatter: returns a zeroed `rows x from.rowsize()` matrix with
/// row `rowids[i]` set to `from[i]`.
///
/// # Errors
/// `SizeMismatch` if `from` does not have `rowids.len()` rows,
/// `IndexOutOfRange` for an id `>= rows`.
pub fn scatter_rows<I: RowIndex, T: Element>(
    rowids: &[I],
    from: MatrixRef<'_, T>,
    rows: usize,
) -> Result<Matrix<T>> {
    let mut out = Matrix::zeros(rows, from.rowsize());
    dispatch::copy_rows(rowids, from, out.view_mut(), Mapping::Scatter)?;
    Ok(out)
}

/// Weighted multi-row sums (embedding-bag pooling).
///
/// For every output row `s` of `to` and every column:
///
/// `$$ to_s = constant + var \cdot \sum_{k < numrows} coefficients_{s,k} \cdot from_{rowids_{s,k}} $$`
///
/// where `(s, k)` is entry `s * numrows + k` of `rowids` and `coefficients`.
///
/// `mapping` is accepted for parity with [`copy_rows`]. The reduction always
/// reads `from` at `rowids` and writes output row `s`, whichever mode is given.
///
/// # Errors
/// `SizeMismatch` if `rowids` or `coefficients` do not hold
/// `to.rows() * numrows` entries or the row lengths differ, `IndexOutOfRange`
/// for an id outside `from`.
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
    dispatch::copy_sum_rows(rowids, numrows, from, to, mapping, coefficients, constant, var)
}

/// Allocating form of [`copy_sum_rows`] producing `numsums` rows.
///
/// Without `coefficients` every contributing row has weight one.
///
/// # Errors
/// As [`copy_sum_rows`].
pub fn sum_rows<I: RowIndex, T: Accumulate>(
    rowids: &[I],
    numsums: usize,
    numrows: usize,
    from: MatrixRef<'_, T>,
    coefficients: Option<&[T]>,
    constant: T,
    var: T,
) -> Result<Matrix<T>> {
    let ones;
    let coefficients: &[T] = match coefficients {
        Some(c) => c,
        None => {
            ones = vec![T::ONE; rowids.len()];
            ones.as_slice()
        }
    };
    let mut out = Matrix::zeros(numsums, from.rowsize());
    dispatch::copy_sum_rows(
        rowids,
        numrows,
        from,
        out.view_mut(),
        Mapping::Gather,
        coefficients,
        constant,
        var,
    )?;
    Ok(out)
}

/// Fills `out` with `scale * ratio^k` for slot `k` of each group of `numrows`.
///
/// # Errors
/// `SizeMismatch` if `out.len()` is not a whole number of groups.
pub fn fill_geometric_coefficients<T: Accumulate>(
    out: &mut [T],
    numrows: usize,
    scale: T,
    ratio: T,
) -> Result<()> {
    dispatch::fill_geometric_coefficients(out, numrows, scale, ratio)
}

/// Row-wise softmax of `x` into `out`.
///
/// # Errors
/// `SizeMismatch` if the shapes differ.
pub fn softmax<T: Real>(x: MatrixRef<'_, T>, out: MatrixMut<'_, T>) -> Result<()> {
    dispatch::softmax(x, out)
}

/// Allocating form of [`softmax`].
///
/// # Errors
/// Propagates kernel errors. The output is always sized to match `x`.
pub fn softmaxed<T: Real>(x: MatrixRef<'_, T>) -> Result<Matrix<T>> {
    let mut out = Matrix::zeros(x.rows(), x.rowsize());
    dispatch::softmax(x, out.view_mut())?;
    Ok(out)
}

/// Per-row categorical cross-entropy of `y_pred` against `y_true`, with
/// predictions clipped to `[eps, 1 - eps]` and renormalized.
///
/// # Errors
/// `SizeMismatch` if the matrices differ in shape or `out` has the wrong length.
pub fn categorical_cross_entropy<T: Real>(
    y_pred: MatrixRef<'_, T>,
    y_true: MatrixRef<'_, T>,
    eps: T,
    out: &mut [T],
) -> Result<()> {
    dispatch::categorical_cross_entropy(y_pred, y_true, eps, out)
}

/// Allocating form of [`categorical_cross_entropy`] using [`DEFAULT_EPS`].
///
/// # Errors
/// `SizeMismatch` if the matrices differ in shape.
pub fn cross_entropy_losses<T: Real>(
    y_pred: MatrixRef<'_, T>,
    y_true: MatrixRef<'_, T>,
) -> Result<Vec<T>> {
    let mut out = vec![T::ZERO; y_pred.rows()];
    dispatch::categorical_cross_entropy(y_pred, y_true, T::from_f64(DEFAULT_EPS), &mut out)?;
    Ok(out)
}
