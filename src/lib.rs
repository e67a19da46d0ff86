//! briny_nnet: parallel row kernels for neural-network training pipelines.
//!
//! Three stateless, data-parallel primitives on row-major matrices:
//!
//! - **One-hot encoding** of integer class labels into a dense indicator matrix.
//! - **Row gather/scatter** between matrices by index.
//! - **Weighted gather-and-sum** of row groups (embedding-bag pooling) with a
//!   uniform scale and bias.
//!
//! Plus the small helpers that usually sit next to them in a classifier:
//! one-hot decoding, row-wise softmax and categorical cross-entropy.
//!
//! # Modules
//!
//! - [`nnet`]: the public entry points, into caller buffers or allocating.
//! - [`ops`]: the kernels ([`ops::cpu`]) and the dispatch layer.
//! - [`tensors`]: [`Matrix`] and the [`MatrixRef`] / [`MatrixMut`] views.
//! - [`element`]: the numeric traits kernels are generic over.
//! - [`backend`]: runtime switches for parallelism and validation.
//!
//! # Checked and unchecked
//!
//! Every kernel has a checked form, which validates all preconditions before
//! the first write and reports a [`KernelError`], and an unchecked fast path.
//! [`backend::set_verification`] picks which one [`nnet`] uses; debug builds
//! default to checked, release builds to unchecked.
//!
//! # Example
//!
//! ```rust
//! use briny_nnet::{matrix, nnet, ops::Mapping, tensors::Matrix};
//!
//! let table = matrix![[1.0f32, 2.0], [3.0, 4.0], [5.0, 6.0]];
//!
//! // embedding lookup
//! let rows = nnet::gather_rows(&[2i32, 0], table.view())?;
//! assert_eq!(rows, matrix![[5.0, 6.0], [1.0, 2.0]]);
//!
//! // mean of rows 0 and 1
//! let mut pooled = Matrix::zeros(1, 2);
//! nnet::copy_sum_rows(&[0i32, 1], 2, table.view(), pooled.view_mut(), Mapping::Gather,
//!     &[0.5, 0.5], 0.0, 1.0)?;
//! assert_eq!(pooled, matrix![[2.0, 3.0]]);
//! # Ok::<(), briny_nnet::KernelError>(())
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::many_single_char_names,
    clippy::cast_possible_truncation,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::module_name_repetitions
)]
#![deny(unsafe_code)]
#![forbid(missing_docs)]

pub mod backend;
pub mod element;
pub mod error;
pub mod nnet;
pub mod ops;
pub mod tensors;

pub use element::{Accumulate, Element, Real, RowIndex};
pub use error::{KernelError, Result};
pub use ops::Mapping;
pub use tensors::{Matrix, MatrixMut, MatrixRef};
