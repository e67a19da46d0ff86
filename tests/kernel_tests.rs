use briny_nnet::backend::{Verification, set_verification};
use briny_nnet::nnet::{
    copy_rows, copy_sum_rows, cross_entropy_losses, decode_labels, gather_rows, one_hot,
    one_hot_encode, scatter_rows, softmaxed, sum_rows,
};
use briny_nnet::{KernelError, Mapping, Matrix, MatrixMut, MatrixRef, matrix};

// errors are only reported by the checked kernels
fn checked() {
    set_verification(Verification::Checked);
}

#[test]
fn test_one_hot_example() {
    let out: Matrix<f32> = one_hot(&[0i32, 2, 1], 3).unwrap();
    assert_eq!(
        out,
        matrix![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]]
    );
}

#[test]
fn test_one_hot_into_raw_buffer() {
    let mut buf = [5.0f64; 8];
    let out = MatrixMut::new(&mut buf, 2, 4).unwrap();
    one_hot_encode(&[3i64, 0], 4, out).unwrap();
    assert_eq!(buf, [0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_one_hot_rejects_negative_label() {
    checked();
    let err = one_hot::<i32, f32>(&[1, -1], 2).unwrap_err();
    assert_eq!(
        err,
        KernelError::InvalidLabel {
            position: 1,
            label: -1,
            n_classes: 2
        }
    );
}

#[test]
fn test_encode_then_decode() {
    let labels = [4usize, 0, 2, 2, 1];
    let encoded: Matrix<u8> = one_hot(&labels, 5).unwrap();
    assert_eq!(decode_labels(encoded.view()).unwrap(), labels.to_vec());
}

#[test]
fn test_gather_example() {
    let from = matrix![[1, 2], [3, 4], [5, 6]];
    let to = gather_rows(&[2i32, 0], from.view()).unwrap();
    assert_eq!(to, matrix![[5, 6], [1, 2]]);
}

#[test]
fn test_gather_into_raw_buffers() {
    let from_buf = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
    let mut to_buf = [0.0f32; 6];
    let from = MatrixRef::new(&from_buf, 3, 2).unwrap();
    let to = MatrixMut::new(&mut to_buf, 3, 2).unwrap();
    copy_rows(&[1u32, 1, 0], from, to, Mapping::Gather).unwrap();
    assert_eq!(to_buf, [3.0, 4.0, 3.0, 4.0, 1.0, 2.0]);
}

#[test]
fn test_scatter_leaves_unaddressed_rows() {
    let from = matrix![[7, 7], [8, 8]];
    let to = scatter_rows(&[3i32, 1], from.view(), 4).unwrap();
    assert_eq!(to, matrix![[0, 0], [8, 8], [0, 0], [7, 7]]);
}

#[test]
fn test_scatter_out_of_range() {
    checked();
    let from = matrix![[7, 7], [8, 8]];
    let err = scatter_rows(&[0i32, 4], from.view(), 4).unwrap_err();
    assert_eq!(
        err,
        KernelError::IndexOutOfRange {
            position: 1,
            index: 4,
            rows: 4
        }
    );
}

#[test]
fn test_scatter_duplicate_ids_last_writer_wins() {
    let from = matrix![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
    let to = scatter_rows(&[0i32, 0, 1], from.view(), 2).unwrap();
    assert_eq!(to, matrix![[2.0, 2.0], [3.0, 3.0]]);
}

#[test]
fn test_gather_sum_example() {
    let from = matrix![[1.0f32, 2.0], [3.0, 4.0]];
    let mut to = Matrix::zeros(1, 2);
    copy_sum_rows(
        &[0i32, 1],
        2,
        from.view(),
        to.view_mut(),
        Mapping::Gather,
        &[0.5, 0.5],
        0.0,
        1.0,
    )
    .unwrap();
    assert_eq!(to, matrix![[2.0, 3.0]]);
}

#[test]
fn test_gather_sum_ignores_mapping() {
    let from = matrix![[1.0f64, 2.0], [3.0, 4.0], [5.0, 6.0]];
    let mut gathered = Matrix::zeros(2, 2);
    let mut scattered = Matrix::zeros(2, 2);
    let ids = [2i32, 1, 0, 0];
    let coefs = [1.0, 2.0, 0.5, 0.5];
    copy_sum_rows(&ids, 2, from.view(), gathered.view_mut(), Mapping::Gather, &coefs, 1.0, 3.0)
        .unwrap();
    copy_sum_rows(&ids, 2, from.view(), scattered.view_mut(), Mapping::Scatter, &coefs, 1.0, 3.0)
        .unwrap();
    assert_eq!(gathered, scattered);
    // 3 * (row2 + 2 * row1) + 1, 3 * row0 + 1
    assert_eq!(gathered, matrix![[34.0, 43.0], [4.0, 7.0]]);
}

#[test]
fn test_sum_rows_defaults_to_unit_weights() {
    let from = matrix![[1, 10], [2, 20], [3, 30]];
    let out = sum_rows(&[0i32, 1, 2, 2, 2, 2], 2, 3, from.view(), None, 0, 1).unwrap();
    assert_eq!(out, matrix![[6, 60], [9, 90]]);
}

#[test]
fn test_sum_rows_zero_group_is_constant() {
    let from = matrix![[1.0f32, 2.0, 3.0]];
    let out = sum_rows::<i32, f32>(&[], 3, 0, from.view(), None, -2.5, 4.0).unwrap();
    assert_eq!(out, Matrix::new(3, 3, vec![-2.5; 9]));
}

#[test]
fn test_gather_sum_rowid_count_mismatch() {
    checked();
    let from = matrix![[1.0f32, 2.0]];
    let mut to = Matrix::new(2, 2, vec![3.0f32; 4]);
    let err = copy_sum_rows(
        &[0i32, 0, 0],
        2,
        from.view(),
        to.view_mut(),
        Mapping::Gather,
        &[1.0; 3],
        0.0,
        1.0,
    )
    .unwrap_err();
    assert_eq!(
        err,
        KernelError::SizeMismatch {
            what: "rowids",
            expected: 4,
            got: 3
        }
    );
    assert_eq!(to.as_slice(), &[3.0; 4]);
}

#[test]
fn test_softmax_then_cross_entropy() {
    let logits = matrix![[2.0f64, 0.0], [0.0, 2.0]];
    let targets: Matrix<f64> = one_hot(&[0i32, 0], 2).unwrap();
    let probs = softmaxed(logits.view()).unwrap();
    let losses = cross_entropy_losses(probs.view(), targets.view()).unwrap();
    assert!(losses[0] < losses[1]);
    assert!((losses[0] + losses[1]).is_finite());
}

#[test]
fn test_sum_rows_saturates_integer_overflow() {
    let from = matrix![[i64::MAX / 2 + 1]];
    let out = sum_rows(&[0i32, 0], 1, 2, from.view(), None, 0, 1).unwrap();
    assert_eq!(out, matrix![[i64::MAX]]);

    let from = matrix![[i32::MAX]];
    let out = sum_rows(&[0i32, 0, 0], 1, 3, from.view(), Some(&[i32::MAX; 3][..]), 0, 1).unwrap();
    assert_eq!(out, matrix![[i32::MAX]]);
}

#[test]
fn test_view_shape_mismatch() {
    let buf = [0.0f32; 7];
    assert!(matches!(
        MatrixRef::new(&buf, 2, 4),
        Err(KernelError::SizeMismatch { .. })
    ));
}
