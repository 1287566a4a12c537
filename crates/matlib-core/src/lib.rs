//! `matlib-core` - strided vector and matrix kernels for matlib.
//!
//! This crate provides:
//! - Element type tags, transpose modes and the error taxonomy shared with
//!   the C ABI
//! - A `ComputeBackend` trait and the reference `CpuBackend`: reductions,
//!   element-wise math and matrix broadcasts
//! - Layout validation for strided vectors and leading-dimension matrices
//! - `Matlib`, a dtype-dispatched front end over borrowed buffer views
//! - Process-wide runtime threading configuration
//!
//! Buffers always belong to the caller. Kernels borrow them for the length
//! of one call and never allocate, retain or free them.

pub mod backend;
pub mod buffer;
pub mod config;
pub mod cpu;
pub mod dtype;
pub mod element;
pub mod error;
pub mod layout;
pub mod matlib;
pub mod transpose;
pub mod unary;

// Re-export primary types at the crate root for convenience.
pub use backend::ComputeBackend;
pub use buffer::{BufferView, BufferViewMut};
pub use config::{Parallel, RuntimeConfig};
pub use cpu::CpuBackend;
pub use dtype::DType;
pub use element::{Element, IntElement};
pub use error::{MatlibError, Result, SUCCESS};
pub use layout::{MatrixLayout, VectorLayout};
pub use matlib::{Matlib, Value};
pub use transpose::Transpose;
pub use unary::UnaryOp;

pub use half::f16;
pub use num_complex::Complex;
pub use num_traits::Float;
