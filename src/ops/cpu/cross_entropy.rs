use super::for_each_row;
use crate::backend::Backend;
use crate::element::Real;
use crate::error::Result;
use crate::ops::checks;
use crate::tensors::MatrixRef;

/// Per-row categorical cross-entropy against one-hot (or soft) targets.
///
/// # Formula
/// With `p` the prediction row clipped to `[eps, 1 - eps]` and renormalized:
///
/// `$$ out_i = -\sum_j y_{ij} \ln p_{ij} $$`
///
/// # Errors
/// [`KernelError::SizeMismatch`](crate::KernelError::SizeMismatch) if
/// `y_true` does not have the shape of `y_pred` or `out` does not have one slot
/// per row.
pub fn categorical_cross_entropy<T: Real>(
    y_pred: MatrixRef<'_, T>,
    y_true: MatrixRef<'_, T>,
    eps: T,
    out: &mut [T],
    backend: Backend,
) -> Result<()> {
    checks::equal("target rows", y_pred.rows(), y_true.rows())?;
    checks::equal("target row length", y_pred.rowsize(), y_true.rowsize())?;
    checks::equal("losses", y_pred.rows(), out.len())?;
    categorical_cross_entropy_unchecked(y_pred, y_true, eps, out, backend);
    Ok(())
}

/// [`categorical_cross_entropy`] without validation.
///
/// # Panics
/// Panics if `out` is longer than the number of rows.
pub fn categorical_cross_entropy_unchecked<T: Real>(
    y_pred: MatrixRef<'_, T>,
    y_true: MatrixRef<'_, T>,
    eps: T,
    out: &mut [T],
    backend: Backend,
) {
    let hi = T::ONE - eps;
    let clip = |p: T| {
        if p < eps {
            eps
        } else if p > hi {
            hi
        } else {
            p
        }
    };

    for_each_row(out, 1, backend, |i, loss| {
        let pred = y_pred.row(i);
        let norm = pred.iter().fold(T::ZERO, |acc, &p| acc + clip(p));

        let mut sum = T::ZERO;
        for (&p, &t) in pred.iter().zip(y_true.row(i)) {
            sum = sum + t * (clip(p) / norm).ln();
        }
        loss[0] = -sum;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix;
    use approx::assert_relative_eq;

    #[test]
    fn confident_correct_prediction_is_cheap() {
        let pred = matrix![[0.9f64, 0.1], [0.5, 0.5]];
        let target = matrix![[1.0, 0.0], [0.0, 1.0]];
        let mut losses = [0.0; 2];
        categorical_cross_entropy(pred.view(), target.view(), 1e-15, &mut losses, Backend::Parallel)
            .unwrap();
        assert_relative_eq!(losses[0], -(0.9f64.ln()), epsilon = 1e-12);
        assert_relative_eq!(losses[1], 2.0f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn zero_probability_is_clipped() {
        let pred = matrix![[1.0f32, 0.0]];
        let target = matrix![[0.0f32, 1.0]];
        let mut losses = [0.0f32; 1];
        categorical_cross_entropy(pred.view(), target.view(), 1e-7, &mut losses, Backend::Serial)
            .unwrap();
        assert!(losses[0].is_finite());
        assert!(losses[0] > 10.0);
    }

    #[test]
    fn loss_slots_must_match_rows() {
        let pred = matrix![[0.5f32, 0.5]];
        let mut losses = [0.0f32; 2];
        assert!(
            categorical_cross_entropy(pred.view(), pred.view(), 1e-7, &mut losses, Backend::Serial)
                .is_err()
        );
    }
}
