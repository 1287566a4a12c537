use std::fmt::Debug;

use half::f16;
use num_traits::Float;

use crate::element::{Element, IntElement};
use crate::error::Result;
use crate::transpose::Transpose;
use crate::unary::UnaryOp;

/// Trait for pluggable kernel backends.
///
/// Buffers are borrowed from the caller for the duration of a call and are
/// never retained. Vector operands are described by an element count `n` and
/// a stride `inc`; matrix operands are row-major with leading dimension `ld`.
/// Every method validates its operands against the slice lengths it is given
/// and returns `InvalidShapeOrParam` instead of reading out of bounds.
#[allow(clippy::too_many_arguments)]
pub trait ComputeBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu").
    fn name(&self) -> &str;

    /// Sum of `n` elements of `x` taken at stride `inc`.
    ///
    /// Accumulates in `T::Acc`. Returns zero when `n == 0`.
    fn sum<T: Element>(&self, n: usize, x: &[T], inc: isize) -> Result<T>;

    /// Sum of a half-precision vector, accumulated in f64.
    fn sum_half(&self, n: usize, x: &[f16], inc: isize) -> Result<f64>;

    /// Wrapping i64 sum of an integer vector.
    fn sum_int<T: IntElement>(&self, n: usize, x: &[T], inc: isize) -> Result<i64>;

    /// Number of non-zero bytes in a boolean vector.
    fn count_true(&self, n: usize, x: &[u8], inc: isize) -> Result<i64>;

    /// Logical index of the first maximum. NaN wins at its first occurrence.
    ///
    /// # Errors
    /// `n` must be at least 1.
    fn imax<T: Element + Float>(&self, n: usize, x: &[T], inc: isize) -> Result<usize>;

    /// Logical index of the first minimum. NaN wins at its first occurrence.
    fn imin<T: Element + Float>(&self, n: usize, x: &[T], inc: isize) -> Result<usize>;

    fn imax_int<T: IntElement>(&self, n: usize, x: &[T], inc: isize) -> Result<usize>;

    fn imin_int<T: IntElement>(&self, n: usize, x: &[T], inc: isize) -> Result<usize>;

    /// x := alpha * x + beta
    fn increment<T: Element>(
        &self,
        n: usize,
        x: &mut [T],
        inc: isize,
        alpha: T,
        beta: T,
    ) -> Result<()>;

    /// x := 1 / (alpha * x + beta)
    fn reciprocal<T: Element>(
        &self,
        n: usize,
        x: &mut [T],
        inc: isize,
        alpha: T,
        beta: T,
    ) -> Result<()>;

    /// x := op(x) for each of the `n` strided elements.
    ///
    /// Domain errors follow IEEE 754, e.g. `sqrt(-1)` is NaN.
    fn unary<T: Element + Float>(&self, op: UnaryOp, n: usize, x: &mut [T], inc: isize)
        -> Result<()>;

    /// x := 1 / (alpha * sqrt(x) + beta)
    fn rsqrt<T: Element + Float>(
        &self,
        n: usize,
        x: &mut [T],
        inc: isize,
        alpha: T,
        beta: T,
    ) -> Result<()>;

    /// x := value for each of the `n` strided elements.
    fn fill<T: Copy + Send + Sync>(&self, n: usize, value: T, x: &mut [T], inc: isize)
        -> Result<()>;

    /// Scaled broadcast-add: a := a + alpha * op(x).
    ///
    /// In no-transpose modes `x` has `n` elements and is added to every row
    /// of the `m x n` matrix `a`; in transpose modes it has `m` elements and
    /// is added to every column. Conjugate modes conjugate `x` first.
    /// `alpha == 0` performs no writes.
    fn add<T: Element>(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        alpha: T,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()>;

    /// a := a * op(x), broadcast as in [`ComputeBackend::add`].
    fn multiply<T: Element>(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()>;

    /// a := op(x), broadcast as in [`ComputeBackend::add`].
    fn duplicate<T: Element>(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()>;

    /// a := a ^ op(x), broadcast as in [`ComputeBackend::add`].
    fn pow<T: Element + Float>(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()>;

    /// a[i][j] := max(a[i][j], x[j]). NaN in either operand yields NaN.
    fn maximum<T: Element + Float>(
        &self,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()>;

    /// a[i][j] := min(a[i][j], x[j]). NaN in either operand yields NaN.
    fn minimum<T: Element + Float>(
        &self,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()>;

    /// Sum over the middle axis: `b[i][l] = sum_j a[i][j][l]`.
    ///
    /// - `a`: contiguous data of shape [m, n, k]
    /// - `b`: contiguous data of shape [m, k], overwritten
    fn reduce_sum<T: Element>(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        b: &mut [T],
    ) -> Result<()>;

    /// Maximum over the middle axis, shaped as in
    /// [`ComputeBackend::reduce_sum`]. Requires `n >= 1`.
    fn reduce_max<T: Element + Float>(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        b: &mut [T],
    ) -> Result<()>;

    /// Index of the first maximum over the middle axis, written as an
    /// integer of type `I`. Requires `n >= 1`.
    fn reduce_arg_max<T: Element + Float, I: IntElement>(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        b: &mut [I],
    ) -> Result<()>;
}
