use super::{for_each_row, row_of};
use crate::backend::Backend;
use crate::element::{Accumulate, RowIndex};
use crate::error::{KernelError, Result};
use crate::ops::checks;
use crate::tensors::{MatrixMut, MatrixRef};

/// Columns accumulated at once. Keeps the accumulators on the stack and the
/// reads from each source row contiguous.
const TILE: usize = 32;

/// Weighted multi-row sums (embedding-bag pooling).
///
/// `to` has `numsums` rows. `rowids` and `coefficients` are split into
/// `numsums` groups of `numrows` entries, and for every group `s` and column `c`:
///
/// `$$ to[s][c] = constant + var \cdot \sum_{k} coefficients[s \cdot numrows + k] \cdot from[rowids[s \cdot numrows + k]][c] $$`
///
/// # Numerics
///
/// - Products and sums are accumulated in [`Accumulate::Acc`] and narrowed once
///   per element, so long groups of `f16`/`f32` rows do not drift
/// - Integer sums saturate at the accumulator bounds instead of wrapping
/// - `numrows == 0` writes `constant` into every element without reading `from`
///
/// # Errors
/// - [`KernelError::SizeMismatch`] if the row lengths differ, or if `rowids` or
///   `coefficients` do not hold exactly `to.rows() * numrows` entries
/// - [`KernelError::IndexOutOfRange`] for the first id that is not a row of `from`
///
/// Nothing is written when an error is returned.
#[allow(clippy::too_many_arguments)]
pub fn copy_sum_rows<I: RowIndex, T: Accumulate>(
    rowids: &[I],
    numrows: usize,
    from: MatrixRef<'_, T>,
    to: MatrixMut<'_, T>,
    coefficients: &[T],
    constant: T,
    var: T,
    backend: Backend,
) -> Result<()> {
    checks::copy_sum_rows(rowids, numrows, &from, &to, coefficients)?;
    copy_sum_rows_unchecked(rowids, numrows, from, to, coefficients, constant, var, backend);
    Ok(())
}

/// [`copy_sum_rows`] without validation.
///
/// # Panics
/// Panics if an id is not a row of `from`, or if `rowids`/`coefficients` are
/// shorter than `to.rows() * numrows`.
#[allow(clippy::too_many_arguments)]
pub fn copy_sum_rows_unchecked<I: RowIndex, T: Accumulate>(
    rowids: &[I],
    numrows: usize,
    from: MatrixRef<'_, T>,
    mut to: MatrixMut<'_, T>,
    coefficients: &[T],
    constant: T,
    var: T,
    backend: Backend,
) {
    let rowsize = to.rowsize();

    if numrows == 0 {
        for_each_row(to.as_mut_slice(), rowsize, backend, |_, row| row.fill(constant));
        return;
    }

    let constant = constant.widen();
    let var = var.widen();

    for_each_row(to.as_mut_slice(), rowsize, backend, |s, out| {
        let group = s * numrows..(s + 1) * numrows;
        let ids = &rowids[group.clone()];
        let weights = &coefficients[group];

        for (t, out_tile) in out.chunks_mut(TILE).enumerate() {
            let cols = t * TILE..t * TILE + out_tile.len();
            let mut acc = [T::ACC_ZERO; TILE];

            for (&id, &w) in ids.iter().zip(weights) {
                let w = w.widen();
                let src = &from.row(row_of(id))[cols.clone()];
                for (a, &x) in acc.iter_mut().zip(src) {
                    *a = T::mul_add(*a, w, x.widen());
                }
            }

            for (o, &a) in out_tile.iter_mut().zip(&acc) {
                *o = T::narrow(T::affine(constant, var, a));
            }
        }
    });
}

/// Fills `out` with geometric weights: slot `k` of every group of `numrows`
/// entries gets `scale * ratio^k`.
///
/// With `scale = ratio = 1` this is a plain sum; with `ratio < 1` later rows of a
/// group are discounted. The result is meant as the `coefficients` argument of
/// [`copy_sum_rows`].
///
/// # Errors
/// [`KernelError::SizeMismatch`] if `out.len()` is not a multiple of `numrows`
/// (or not empty when `numrows == 0`).
pub fn fill_geometric_coefficients<T: Accumulate>(
    out: &mut [T],
    numrows: usize,
    scale: T,
    ratio: T,
) -> Result<()> {
    let whole = match numrows {
        0 => out.is_empty(),
        n => out.len() % n == 0,
    };
    if !whole {
        let expected = match numrows {
            0 => 0,
            n => out.len().checked_next_multiple_of(n).unwrap_or(0),
        };
        return Err(KernelError::size("coefficients", expected, out.len()));
    }
    fill_geometric_coefficients_unchecked(out, numrows, scale, ratio);
    Ok(())
}

/// [`fill_geometric_coefficients`] without validation. A trailing partial
/// group is filled like the start of a full one.
pub fn fill_geometric_coefficients_unchecked<T: Accumulate>(
    out: &mut [T],
    numrows: usize,
    scale: T,
    ratio: T,
) {
    if numrows == 0 {
        return;
    }
    let scale = scale.widen();
    let ratio = ratio.widen();
    for group in out.chunks_mut(numrows) {
        let mut power = T::ONE.widen();
        for w in group {
            *w = T::narrow(T::mul_add(T::ACC_ZERO, scale, power));
            power = T::mul_add(T::ACC_ZERO, power, ratio);
        }
    }
}
