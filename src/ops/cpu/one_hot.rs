use super::{for_each_row, row_of};
use crate::backend::Backend;
use crate::element::{Element, RowIndex};
use crate::error::{KernelError, Result};
use crate::ops::checks;
use crate::tensors::{MatrixMut, MatrixRef};

/// One-hot encodes `labels` into `out` (`labels.len() x n_classes`).
///
/// Row `i` becomes all zeros except a one at column `labels[i]`. Every element
/// of `out` is written, so it does not need to be zeroed beforehand.
///
/// # Errors
/// - [`KernelError::SizeMismatch`](crate::KernelError::SizeMismatch) if `out`
///   is not `labels.len() x n_classes`
/// - [`KernelError::InvalidLabel`](crate::KernelError::InvalidLabel) for the
///   first label outside `[0, n_classes)`
///
/// Nothing is written when an error is returned.
pub fn one_hot_encode<L: RowIndex, T: Element>(
    labels: &[L],
    n_classes: usize,
    out: MatrixMut<'_, T>,
    backend: Backend,
) -> Result<()> {
    checks::one_hot(labels, n_classes, &out)?;
    one_hot_encode_unchecked(labels, n_classes, out, backend);
    Ok(())
}

/// [`one_hot_encode`] without validation.
///
/// # Panics
/// Panics if a label is not a column of `out`, or if `out` has more rows than
/// there are labels.
pub fn one_hot_encode_unchecked<L: RowIndex, T: Element>(
    labels: &[L],
    n_classes: usize,
    mut out: MatrixMut<'_, T>,
    backend: Backend,
) {
    for_each_row(out.as_mut_slice(), n_classes, backend, |i, row| {
        row.fill(T::ZERO);
        row[row_of(labels[i])] = T::ONE;
    });
}

/// Decodes a one-hot (or score) matrix into labels: `out[i]` is the column of
/// the largest element of row `i`. Ties go to the lowest column.
///
/// # Errors
/// [`KernelError::SizeMismatch`](crate::KernelError::SizeMismatch) if `out`
/// does not have one slot per row, or if rows are empty while there is at least
/// one row to decode.
pub fn one_hot_decode<T: Element>(
    one_hot: MatrixRef<'_, T>,
    out: &mut [usize],
    backend: Backend,
) -> Result<()> {
    checks::equal("decoded labels", one_hot.rows(), out.len())?;
    if one_hot.rows() > 0 && one_hot.rowsize() == 0 {
        return Err(KernelError::size("one-hot row length", 1, 0));
    }
    one_hot_decode_unchecked(one_hot, out, backend);
    Ok(())
}

/// [`one_hot_decode`] without validation.
///
/// # Panics
/// Panics if `out` is longer than the number of rows, or if rows are empty.
pub fn one_hot_decode_unchecked<T: Element>(
    one_hot: MatrixRef<'_, T>,
    out: &mut [usize],
    backend: Backend,
) {
    for_each_row(out, 1, backend, |i, label| {
        let row = one_hot.row(i);
        let mut best = 0;
        for (j, &x) in row.iter().enumerate().skip(1) {
            if x > row[best] {
                best = j;
            }
        }
        label[0] = best;
    });
}
