mod broadcast;
mod elementwise;
mod reduce;

use half::f16;
use num_traits::Float;

use crate::backend::ComputeBackend;
use crate::config;
use crate::element::{Element, IntElement};
use crate::error::{MatlibError, Result};
use crate::layout::{MatrixLayout, VectorLayout};
use crate::transpose::Transpose;
use crate::unary::UnaryOp;

/// Pure-Rust CPU backend.
///
/// Kernels run on the calling thread unless the `parallel` feature is enabled
/// and a call touches at least `parallel_threshold` elements, in which case
/// the work is split across the process-wide rayon pool.
#[derive(Debug, Clone)]
pub struct CpuBackend {
    parallel_threshold: usize,
}

impl CpuBackend {
    /// Backend using the process-wide runtime configuration.
    pub fn new() -> Self {
        Self::with_threshold(config::runtime().parallel_threshold)
    }

    /// Backend that never leaves the calling thread.
    pub fn sequential() -> Self {
        Self::with_threshold(usize::MAX)
    }

    pub fn with_threshold(parallel_threshold: usize) -> Self {
        CpuBackend { parallel_threshold }
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// The pool to run `work` elements on, or `None` to stay sequential.
    #[cfg(feature = "parallel")]
    fn pool_for(&self, work: usize) -> Option<&'static rayon::ThreadPool> {
        if work < self.parallel_threshold {
            return None;
        }
        let pool = config::pool()?;
        if pool.current_num_threads() <= 1 {
            return None;
        }
        tracing::trace!(work, threads = pool.current_num_threads(), "parallel dispatch");
        Some(pool)
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn require_nonempty(n: usize) -> Result<()> {
    if n == 0 {
        return Err(MatlibError::invalid("n must be at least 1"));
    }
    Ok(())
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn sum<T: Element>(&self, n: usize, x: &[T], inc: isize) -> Result<T> {
        let layout = VectorLayout::new(n, inc);
        layout.validate("X", x.len())?;
        Ok(T::narrow(self.strided_sum(x, layout)))
    }

    fn sum_half(&self, n: usize, x: &[f16], inc: isize) -> Result<f64> {
        let layout = VectorLayout::new(n, inc);
        layout.validate("X", x.len())?;
        Ok(reduce::half_sum(x, layout))
    }

    fn sum_int<T: IntElement>(&self, n: usize, x: &[T], inc: isize) -> Result<i64> {
        let layout = VectorLayout::new(n, inc);
        layout.validate("X", x.len())?;
        Ok(self.strided_int_sum(x, layout))
    }

    fn count_true(&self, n: usize, x: &[u8], inc: isize) -> Result<i64> {
        let layout = VectorLayout::new(n, inc);
        layout.validate("X", x.len())?;
        Ok(reduce::count_nonzero(x, layout))
    }

    fn imax<T: Element + Float>(&self, n: usize, x: &[T], inc: isize) -> Result<usize> {
        require_nonempty(n)?;
        let layout = VectorLayout::new(n, inc);
        layout.validate("X", x.len())?;
        Ok(reduce::arg_best(x, layout, |v, best| v > best, |v| v.is_nan()))
    }

    fn imin<T: Element + Float>(&self, n: usize, x: &[T], inc: isize) -> Result<usize> {
        require_nonempty(n)?;
        let layout = VectorLayout::new(n, inc);
        layout.validate("X", x.len())?;
        Ok(reduce::arg_best(x, layout, |v, best| v < best, |v| v.is_nan()))
    }

    fn imax_int<T: IntElement>(&self, n: usize, x: &[T], inc: isize) -> Result<usize> {
        require_nonempty(n)?;
        let layout = VectorLayout::new(n, inc);
        layout.validate("X", x.len())?;
        Ok(reduce::arg_best(x, layout, |v, best| v > best, |_| false))
    }

    fn imin_int<T: IntElement>(&self, n: usize, x: &[T], inc: isize) -> Result<usize> {
        require_nonempty(n)?;
        let layout = VectorLayout::new(n, inc);
        layout.validate("X", x.len())?;
        Ok(reduce::arg_best(x, layout, |v, best| v < best, |_| false))
    }

    fn increment<T: Element>(
        &self,
        n: usize,
        x: &mut [T],
        inc: isize,
        alpha: T,
        beta: T,
    ) -> Result<()> {
        let layout = VectorLayout::new(n, inc);
        let span = layout.validate("X", x.len())?;
        self.for_each_strided(&mut x[..span], layout, move |v| *v = alpha * *v + beta);
        Ok(())
    }

    fn reciprocal<T: Element>(
        &self,
        n: usize,
        x: &mut [T],
        inc: isize,
        alpha: T,
        beta: T,
    ) -> Result<()> {
        let layout = VectorLayout::new(n, inc);
        let span = layout.validate("X", x.len())?;
        self.for_each_strided(&mut x[..span], layout, move |v| {
            *v = T::one() / (alpha * *v + beta)
        });
        Ok(())
    }

    fn unary<T: Element + Float>(
        &self,
        op: UnaryOp,
        n: usize,
        x: &mut [T],
        inc: isize,
    ) -> Result<()> {
        let layout = VectorLayout::new(n, inc);
        let span = layout.validate("X", x.len())?;
        self.for_each_strided(&mut x[..span], layout, move |v| *v = op.apply(*v));
        Ok(())
    }

    fn rsqrt<T: Element + Float>(
        &self,
        n: usize,
        x: &mut [T],
        inc: isize,
        alpha: T,
        beta: T,
    ) -> Result<()> {
        let layout = VectorLayout::new(n, inc);
        let span = layout.validate("X", x.len())?;
        self.for_each_strided(&mut x[..span], layout, move |v| {
            *v = T::one() / (alpha * (*v).sqrt() + beta)
        });
        Ok(())
    }

    fn fill<T: Copy + Send + Sync>(
        &self,
        n: usize,
        value: T,
        x: &mut [T],
        inc: isize,
    ) -> Result<()> {
        let layout = VectorLayout::new(n, inc);
        let span = layout.validate("X", x.len())?;
        self.for_each_strided(&mut x[..span], layout, move |v| *v = value);
        Ok(())
    }

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
    ) -> Result<()> {
        let (xl, al, span) = broadcast_layouts(trans, m, n, inc, ld, x.len(), a.len())?;
        if alpha == T::zero() {
            return Ok(());
        }
        self.broadcast(trans, x, xl, &mut a[..span], al, move |e, v| *e += alpha * v);
        Ok(())
    }

    fn multiply<T: Element>(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()> {
        let (xl, al, span) = broadcast_layouts(trans, m, n, inc, ld, x.len(), a.len())?;
        self.broadcast(trans, x, xl, &mut a[..span], al, |e, v| *e *= v);
        Ok(())
    }

    fn duplicate<T: Element>(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()> {
        let (xl, al, span) = broadcast_layouts(trans, m, n, inc, ld, x.len(), a.len())?;
        self.broadcast(trans, x, xl, &mut a[..span], al, |e, v| *e = v);
        Ok(())
    }

    fn pow<T: Element + Float>(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()> {
        let (xl, al, span) = broadcast_layouts(trans, m, n, inc, ld, x.len(), a.len())?;
        self.broadcast(trans, x, xl, &mut a[..span], al, |e, v| *e = (*e).powf(v));
        Ok(())
    }

    fn maximum<T: Element + Float>(
        &self,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()> {
        let trans = Transpose::NoTrans;
        let (xl, al, span) = broadcast_layouts(trans, m, n, inc, ld, x.len(), a.len())?;
        self.broadcast(trans, x, xl, &mut a[..span], al, |e, v| {
            if v.is_nan() || (!(*e).is_nan() && v > *e) {
                *e = v;
            }
        });
        Ok(())
    }

    fn minimum<T: Element + Float>(
        &self,
        m: usize,
        n: usize,
        x: &[T],
        inc: isize,
        a: &mut [T],
        ld: usize,
    ) -> Result<()> {
        let trans = Transpose::NoTrans;
        let (xl, al, span) = broadcast_layouts(trans, m, n, inc, ld, x.len(), a.len())?;
        self.broadcast(trans, x, xl, &mut a[..span], al, |e, v| {
            if v.is_nan() || (!(*e).is_nan() && v < *e) {
                *e = v;
            }
        });
        Ok(())
    }

    fn reduce_sum<T: Element>(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        b: &mut [T],
    ) -> Result<()> {
        let b_len = axis_lengths(m, n, k, a.len(), b.len())?;
        self.middle_axis(m, n, k, a, &mut b[..b_len], |x, lane| {
            T::narrow(reduce::lane_sum(x, lane))
        });
        Ok(())
    }

    fn reduce_max<T: Element + Float>(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        b: &mut [T],
    ) -> Result<()> {
        require_nonempty(n)?;
        let b_len = axis_lengths(m, n, k, a.len(), b.len())?;
        self.middle_axis(m, n, k, a, &mut b[..b_len], |x, lane| {
            x[lane.index(reduce::arg_best(x, lane, |v, best| v > best, |v| v.is_nan()))]
        });
        Ok(())
    }

    fn reduce_arg_max<T: Element + Float, I: IntElement>(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        b: &mut [I],
    ) -> Result<()> {
        require_nonempty(n)?;
        let b_len = axis_lengths(m, n, k, a.len(), b.len())?;
        self.middle_axis(m, n, k, a, &mut b[..b_len], |x, lane| {
            I::from_index(reduce::arg_best(x, lane, |v, best| v > best, |v| v.is_nan()))
        });
        Ok(())
    }
}

/// Validate the operands of a broadcast kernel and describe them, returning
/// the span of `a` as the third element.
fn broadcast_layouts(
    trans: Transpose,
    m: usize,
    n: usize,
    inc: isize,
    ld: usize,
    x_len: usize,
    a_len: usize,
) -> Result<(VectorLayout, MatrixLayout, usize)> {
    let al = MatrixLayout::new(m, n, ld);
    let span = al.validate("A", a_len)?;
    let xl = VectorLayout::new(trans.vector_len(m, n), inc);
    if !al.is_empty() {
        xl.validate("X", x_len)?;
    }
    Ok((xl, al, span))
}

/// Check `a` holds [m, n, k] and `b` holds [m, k]; returns `m * k`.
fn axis_lengths(m: usize, n: usize, k: usize, a_len: usize, b_len: usize) -> Result<usize> {
    let need_a = m
        .checked_mul(n)
        .and_then(|v| v.checked_mul(k))
        .ok_or_else(|| MatlibError::invalid("m*n*k overflows"))?;
    if a_len < need_a {
        return Err(MatlibError::invalid(format!(
            "matrix specification too large for bufferA: needs {} elements, has {}",
            need_a, a_len
        )));
    }
    let need_b = m
        .checked_mul(k)
        .ok_or_else(|| MatlibError::invalid("m*k overflows"))?;
    if b_len < need_b {
        return Err(MatlibError::invalid(format!(
            "matrix specification too large for bufferB: needs {} elements, has {}",
            need_b, b_len
        )));
    }
    Ok(need_b)
}
