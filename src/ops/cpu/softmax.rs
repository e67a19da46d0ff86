use super::for_each_row;
use crate::backend::Backend;
use crate::element::Real;
use crate::error::Result;
use crate::ops::checks;
use crate::tensors::{MatrixMut, MatrixRef};

/// Row-wise softmax: `out[i][j] = exp(x[i][j] - max_i) / sum_j exp(x[i][j] - max_i)`.
///
/// Subtracting the row maximum keeps `exp` from overflowing for large logits.
///
/// # Errors
/// [`KernelError::SizeMismatch`](crate::KernelError::SizeMismatch) if `out`
/// does not have the shape of `x`.
pub fn softmax<T: Real>(
    x: MatrixRef<'_, T>,
    out: MatrixMut<'_, T>,
    backend: Backend,
) -> Result<()> {
    checks::same_shape("softmax output", &x, &out)?;
    softmax_unchecked(x, out, backend);
    Ok(())
}

/// [`softmax`] without validation.
///
/// # Panics
/// Panics if `out` has more rows than `x` or a different row length.
pub fn softmax_unchecked<T: Real>(
    x: MatrixRef<'_, T>,
    mut out: MatrixMut<'_, T>,
    backend: Backend,
) {
    let rowsize = out.rowsize();
    for_each_row(out.as_mut_slice(), rowsize, backend, |i, row| {
        let logits = x.row(i);
        let max_val = logits.iter().copied().fold(T::NEG_INFINITY, T::max_of);

        let mut exp_sum = T::ZERO;
        for (y, &v) in row.iter_mut().zip(logits) {
            *y = (v - max_val).exp();
            exp_sum = exp_sum + *y;
        }
        for y in row.iter_mut() {
            *y = *y / exp_sum;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix;
    use crate::tensors::Matrix;
    use approx::assert_relative_eq;

    #[test]
    fn rows_sum_to_one() {
        let x = matrix![[1.0f64, 2.0, 3.0], [-5.0, 0.0, 5.0]];
        let mut out = Matrix::zeros(2, 3);
        softmax(x.view(), out.view_mut(), Backend::Parallel).unwrap();
        for i in 0..2 {
            assert_relative_eq!(out.row(i).iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
        assert!(out.row(0)[2] > out.row(0)[1]);
    }

    #[test]
    fn large_logits_do_not_overflow() {
        let x = matrix![[1000.0f32, 1000.0]];
        let mut out = Matrix::zeros(1, 2);
        softmax(x.view(), out.view_mut(), Backend::Serial).unwrap();
        assert_relative_eq!(out.as_slice()[0], 0.5);
        assert_relative_eq!(out.as_slice()[1], 0.5);
    }

    #[test]
    fn shape_must_match() {
        let x = matrix![[1.0f32, 2.0]];
        let mut out = Matrix::zeros(2, 2);
        assert!(softmax(x.view(), out.view_mut(), Backend::Serial).is_err());
    }
}
