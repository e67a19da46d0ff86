//! Preconditions of the checked kernels.
//!
//! Everything here is read-only: a kernel runs these first and only starts
//! writing once all of them pass.

use super::Mapping;
use crate::element::RowIndex;
use crate::error::{KernelError, Result};
use crate::tensors::{MatrixMut, MatrixRef};

pub(crate) fn equal(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(KernelError::size(what, expected, got))
    }
}

pub(crate) fn labels<L: RowIndex>(labels: &[L], n_classes: usize) -> Result<()> {
    for (position, &label) in labels.iter().enumerate() {
        match label.to_row() {
            Some(class) if class < n_classes => {}
            _ => {
                return Err(KernelError::InvalidLabel {
                    position,
                    label: label.wide(),
                    n_classes,
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn rowids<I: RowIndex>(rowids: &[I], rows: usize) -> Result<()> {
    for (position, &index) in rowids.iter().enumerate() {
        match index.to_row() {
            Some(row) if row < rows => {}
            _ => {
                return Err(KernelError::IndexOutOfRange {
                    position,
                    index: index.wide(),
                    rows,
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn one_hot<L: RowIndex, T>(
    labels: &[L],
    n_classes: usize,
    out: &MatrixMut<'_, T>,
) -> Result<()> {
    equal("one-hot output rows", labels.len(), out.rows())?;
    equal("one-hot output row length", n_classes, out.rowsize())?;
    self::labels(labels, n_classes)
}

pub(crate) fn copy_rows<I: RowIndex, T>(
    rowids: &[I],
    from: &MatrixRef<'_, T>,
    to: &MatrixMut<'_, T>,
    mapping: Mapping,
) -> Result<()> {
    equal("row length of `to`", from.rowsize(), to.rowsize())?;
    match mapping {
        Mapping::Gather => {
            equal("rows of `to`", rowids.len(), to.rows())?;
            self::rowids(rowids, from.rows())
        }
        Mapping::Scatter => {
            equal("rows of `from`", rowids.len(), from.rows())?;
            self::rowids(rowids, to.rows())
        }
    }
}

pub(crate) fn copy_sum_rows<I: RowIndex, T>(
    rowids: &[I],
    numrows: usize,
    from: &MatrixRef<'_, T>,
    to: &MatrixMut<'_, T>,
    coefficients: &[T],
) -> Result<()> {
    equal("row length of `to`", from.rowsize(), to.rowsize())?;
    let numsums = to.rows();
    let entries = numsums
        .checked_mul(numrows)
        .ok_or_else(|| KernelError::size("numsums * numrows", usize::MAX, rowids.len()))?;
    equal("rowids", entries, rowids.len())?;
    equal("coefficients", entries, coefficients.len())?;
    self::rowids(rowids, from.rows())
}

pub(crate) fn same_shape<T>(
    what: &'static str,
    input: &MatrixRef<'_, T>,
    out: &MatrixMut<'_, T>,
) -> Result<()> {
    equal(what, input.rows(), out.rows())?;
    equal(what, input.rowsize(), out.rowsize())
}
