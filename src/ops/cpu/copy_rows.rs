use super::{for_each_row, row_of};
use crate::backend::Backend;
use crate::element::{Element, RowIndex};
use crate::error::Result;
use crate::ops::{Mapping, checks};
use crate::tensors::{MatrixMut, MatrixRef};

/// Copies whole rows between `from` and `to` as directed by `rowids`.
///
/// - [`Mapping::Gather`]: `to[i] = from[rowids[i]]`. `to` has `rowids.len()` rows.
/// - [`Mapping::Scatter`]: `to[rowids[i]] = from[i]`. `from` has `rowids.len()` rows.
///
/// Rows are copied verbatim. In gather mode every output row is an independent
/// task. Scatter mode runs in index order on the calling thread: when `rowids`
/// repeats a destination, the last source row naming it wins. Duplicates are
/// not detected; callers relying on scatter should keep `rowids` unique.
///
/// # Errors
/// - [`KernelError::SizeMismatch`](crate::KernelError::SizeMismatch) if the
///   row lengths differ or the non-addressed matrix does not have
///   `rowids.len()` rows
/// - [`KernelError::IndexOutOfRange`](crate::KernelError::IndexOutOfRange) for
///   the first id that is not a row of the addressed matrix
///
/// # Example
/// ```
/// use briny_nnet::{backend::Backend, matrix, ops::{cpu, Mapping}, tensors::Matrix};
///
/// let from = matrix![[1, 2], [3, 4], [5, 6]];
/// let mut to = Matrix::zeros(2, 2);
/// cpu::copy_rows(&[2i32, 0], from.view(), to.view_mut(), Mapping::Gather, Backend::Serial)?;
/// assert_eq!(to, matrix![[5, 6], [1, 2]]);
/// # Ok::<(), briny_nnet::KernelError>(())
/// ```
pub fn copy_rows<I: RowIndex, T: Element>(
    rowids: &[I],
    from: MatrixRef<'_, T>,
    to: MatrixMut<'_, T>,
    mapping: Mapping,
    backend: Backend,
) -> Result<()> {
    checks::copy_rows(rowids, &from, &to, mapping)?;
    copy_rows_unchecked(rowids, from, to, mapping, backend);
    Ok(())
}

/// [`copy_rows`] without validation.
///
/// # Panics
/// Panics if an id is not a row of the addressed matrix or if the row lengths
/// differ. Row count mismatches are not diagnosed.
pub fn copy_rows_unchecked<I: RowIndex, T: Element>(
    rowids: &[I],
    from: MatrixRef<'_, T>,
    mut to: MatrixMut<'_, T>,
    mapping: Mapping,
    backend: Backend,
) {
    match mapping {
        Mapping::Gather => {
            let rowsize = to.rowsize();
            for_each_row(to.as_mut_slice(), rowsize, backend, |i, row| {
                row.copy_from_slice(from.row(row_of(rowids[i])));
            });
        }
        Mapping::Scatter => {
            if from.rowsize() == 0 {
                return;
            }
            for (i, &id) in rowids.iter().enumerate() {
                to.row_mut(row_of(id)).copy_from_slice(from.row(i));
            }
        }
    }
}
