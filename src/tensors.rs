//! Row-major matrices and the borrowed views the kernels operate on.
//!
//! # Layout
//!
//! A matrix of shape `rows x rowsize` is a flat buffer where row `i` occupies
//! elements `[i * rowsize, (i + 1) * rowsize)`. The shape is carried next to the
//! data, never inside it.
//!
//! - [`MatrixRef`] / [`MatrixMut`] borrow a caller-owned buffer for the duration
//!   of a kernel call. Building one checks that the buffer length matches the
//!   declared shape.
//! - [`Matrix`] owns its buffer and is used by the allocating helpers in
//!   [`crate::nnet`] and in tests.
//!
//! ## Limitations
//! - Row-major only
//! - No broadcasting, slicing, or shape inference
//!
//! ## Example
//!
//! ```rust
//! use briny_nnet::matrix;
//! let m = matrix![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
//! assert_eq!((m.rows(), m.rowsize()), (2, 3));
//! assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
//! ```

use crate::element::Element;
use crate::error::{KernelError, Result};

fn check_len(what: &'static str, len: usize, rows: usize, rowsize: usize) -> Result<()> {
    let expected = rows
        .checked_mul(rowsize)
        .ok_or_else(|| KernelError::size(what, usize::MAX, len))?;
    if expected != len {
        return Err(KernelError::size(what, expected, len));
    }
    Ok(())
}

/// A borrowed, read-only row-major matrix.
#[derive(Debug, Clone, Copy)]
pub struct MatrixRef<'a, T> {
    data: &'a [T],
    rows: usize,
    rowsize: usize,
}

impl<'a, T> MatrixRef<'a, T> {
    /// Wraps `data` as a `rows x rowsize` matrix.
    ///
    /// # Errors
    /// [`KernelError::SizeMismatch`] if `data.len() != rows * rowsize`.
    pub fn new(data: &'a [T], rows: usize, rowsize: usize) -> Result<Self> {
        check_len("matrix buffer", data.len(), rows, rowsize)?;
        Ok(Self {
            data,
            rows,
            rowsize,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of elements per row.
    pub fn rowsize(&self) -> usize {
        self.rowsize
    }

    /// The underlying flat buffer.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Row `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.rows()`.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [T] {
        assert!(i < self.rows, "row {i} out of range for {} rows", self.rows);
        &self.data[i * self.rowsize..(i + 1) * self.rowsize]
    }
}

/// A borrowed, writable row-major matrix.
#[derive(Debug)]
pub struct MatrixMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    rowsize: usize,
}

impl<'a, T> MatrixMut<'a, T> {
    /// Wraps `data` as a writable `rows x rowsize` matrix.
    ///
    /// # Errors
    /// [`KernelError::SizeMismatch`] if `data.len() != rows * rowsize`.
    pub fn new(data: &'a mut [T], rows: usize, rowsize: usize) -> Result<Self> {
        check_len("matrix buffer", data.len(), rows, rowsize)?;
        Ok(Self {
            data,
            rows,
            rowsize,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of elements per row.
    pub fn rowsize(&self) -> usize {
        self.rowsize
    }

    /// The underlying flat buffer.
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    /// The underlying flat buffer, writable.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Row `i`, writable.
    ///
    /// # Panics
    /// Panics if `i >= self.rows()`.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        assert!(i < self.rows, "row {i} out of range for {} rows", self.rows);
        &mut self.data[i * self.rowsize..(i + 1) * self.rowsize]
    }

    /// Shortens the borrow so the view can be passed on and used again.
    pub fn reborrow(&mut self) -> MatrixMut<'_, T> {
        MatrixMut {
            data: &mut *self.data,
            rows: self.rows,
            rowsize: self.rowsize,
        }
    }

    /// Consumes the view, returning the flat buffer.
    pub fn into_slice(self) -> &'a mut [T] {
        self.data
    }
}

/// An owned row-major matrix.
///
/// - `rows x rowsize` elements stored in `data`.
/// - Used as the return type of the allocating helpers; the raw kernels only
///   ever see [`MatrixRef`] / [`MatrixMut`].
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    rowsize: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Creates a matrix from flat row-major data.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * rowsize`.
    pub fn new(rows: usize, rowsize: usize, data: Vec<T>) -> Self {
        assert_eq!(
            rows * rowsize,
            data.len(),
            "shape {rows}x{rowsize} is incompatible with {} data elements",
            data.len()
        );
        Self {
            rows,
            rowsize,
            data,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of elements per row.
    pub fn rowsize(&self) -> usize {
        self.rowsize
    }

    /// Row `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.rowsize..(i + 1) * self.rowsize]
    }

    /// Flat row-major data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consumes the matrix, returning its flat data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Read-only view for the kernels.
    pub fn view(&self) -> MatrixRef<'_, T> {
        MatrixRef {
            data: &self.data,
            rows: self.rows,
            rowsize: self.rowsize,
        }
    }

    /// Writable view for the kernels.
    pub fn view_mut(&mut self) -> MatrixMut<'_, T> {
        MatrixMut {
            data: &mut self.data,
            rows: self.rows,
            rowsize: self.rowsize,
        }
    }
}

impl<T: Element> Matrix<T> {
    /// A `rows x rowsize` matrix of zeros.
    pub fn zeros(rows: usize, rowsize: usize) -> Self {
        Self::new(rows, rowsize, vec![T::ZERO; rows * rowsize])
    }
}

/// Defines a [`Matrix`] from nested row literals.
///
/// # Example
/// ```
/// use briny_nnet::matrix;
/// let m = matrix![[1, 2], [3, 4], [5, 6]];
/// assert_eq!(m.rows(), 3);
/// assert_eq!(m.as_slice(), &[1, 2, 3, 4, 5, 6]);
/// ```
///
/// # Panics
/// Panics on ragged literals.
#[macro_export]
macro_rules! matrix {
    ($([ $($x:expr),* $(,)? ]),+ $(,)?) => {{
        let rows = vec![$(vec![$($x),*]),+];
        let rowsize = rows[0].len();
        assert!(
            rows.iter().all(|r| r.len() == rowsize),
            "ragged matrix literal (rows have mismatched lengths)"
        );
        let n = rows.len();
        $crate::tensors::Matrix::new(n, rowsize, rows.into_iter().flatten().collect())
    }};
}
