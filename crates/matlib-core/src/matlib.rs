//! Validated, dtype-dispatched entry points over [`BufferView`]s.
//!
//! Each method checks offsets, strides and buffer sizes, requires paired
//! operands to share one element type, and routes the call to the typed
//! kernel of the configured [`ComputeBackend`].

use num_complex::Complex;

use crate::backend::ComputeBackend;
use crate::buffer::{BufferView, BufferViewMut};
use crate::config::{self, Parallel};
use crate::cpu::CpuBackend;
use crate::dtype::DType;
use crate::error::{MatlibError, Result};
use crate::layout::check_offset;
use crate::transpose::Transpose;
use crate::unary::UnaryOp;

/// Result of a dtype-dispatched reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Complex(Complex<f64>),
}

impl Value {
    /// The value as f64; complex values yield their real part.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(v) => *v as f64,
            Value::Float(v) => *v,
            Value::Complex(c) => c.re,
        }
    }
}

fn tail<'a, T>(name: &str, v: &'a [T], offset: usize) -> Result<&'a [T]> {
    check_offset(name, offset, v.len())?;
    Ok(&v[offset..])
}

fn tail_mut<'a, T>(name: &str, v: &'a mut [T], offset: usize) -> Result<&'a mut [T]> {
    check_offset(name, offset, v.len())?;
    Ok(&mut v[offset..])
}

fn unsupported(op: &str, dtype: DType) -> MatlibError {
    MatlibError::unsupported(format!("{} does not support {}", op, dtype))
}

fn check_same_dtype(x: DType, a: DType) -> Result<()> {
    if x != a {
        return Err(MatlibError::unsupported(format!(
            "unmatched data type for X and A: {},{}",
            x, a
        )));
    }
    Ok(())
}

/// Runs `$body` with `$v` bound to the slice of any integer view.
macro_rules! with_int_view {
    ($view:expr, $v:ident => $body:expr, _ => $other:expr) => {
        match $view {
            BufferView::I8($v) => $body,
            BufferView::I16($v) => $body,
            BufferView::I32($v) => $body,
            BufferView::I64($v) => $body,
            BufferView::U8($v) => $body,
            BufferView::U16($v) => $body,
            BufferView::U32($v) => $body,
            BufferView::U64($v) => $body,
            _ => $other,
        }
    };
}

/// Runs `$body` with `$v` bound to the slice of any mutable integer view.
macro_rules! with_int_view_mut {
    ($view:expr, $v:ident => $body:expr, _ => $other:expr) => {
        match $view {
            BufferViewMut::I8($v) => $body,
            BufferViewMut::I16($v) => $body,
            BufferViewMut::I32($v) => $body,
            BufferViewMut::I64($v) => $body,
            BufferViewMut::U8($v) => $body,
            BufferViewMut::U16($v) => $body,
            BufferViewMut::U32($v) => $body,
            BufferViewMut::U64($v) => $body,
            _ => $other,
        }
    };
}

/// Entry point to the kernel library.
#[derive(Debug, Clone)]
pub struct Matlib<B: ComputeBackend = CpuBackend> {
    backend: B,
}

impl Matlib<CpuBackend> {
    pub fn new() -> Self {
        Self::with_backend(CpuBackend::new())
    }
}

impl Default for Matlib<CpuBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ComputeBackend> Matlib<B> {
    pub fn with_backend(backend: B) -> Self {
        Matlib { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn num_threads(&self) -> usize {
        config::num_threads()
    }

    pub fn nprocs(&self) -> usize {
        config::nprocs()
    }

    pub fn parallel(&self) -> Parallel {
        config::parallel()
    }

    pub fn version(&self) -> &'static str {
        config::version()
    }

    /// Human-readable build description, e.g. `"Matlib 0.1.0"`.
    pub fn config(&self) -> String {
        format!("Matlib {}", config::version())
    }

    /// sum := sum(X)
    ///
    /// Integer and bool buffers yield [`Value::Int`], real floats
    /// [`Value::Float`], complex buffers [`Value::Complex`].
    pub fn sum(&self, n: usize, x: BufferView<'_>, offset_x: usize, inc_x: isize) -> Result<Value> {
        let b = &self.backend;
        match x {
            BufferView::F32(v) => Ok(Value::Float(b.sum(n, tail("X", v, offset_x)?, inc_x)? as f64)),
            BufferView::F64(v) => Ok(Value::Float(b.sum(n, tail("X", v, offset_x)?, inc_x)?)),
            BufferView::F16(v) => Ok(Value::Float(b.sum_half(n, tail("X", v, offset_x)?, inc_x)?)),
            BufferView::C32(v) => {
                let s = b.sum(n, tail("X", v, offset_x)?, inc_x)?;
                Ok(Value::Complex(Complex::new(s.re as f64, s.im as f64)))
            }
            BufferView::C64(v) => Ok(Value::Complex(b.sum(n, tail("X", v, offset_x)?, inc_x)?)),
            BufferView::Bool(v) => Ok(Value::Int(b.count_true(n, tail("X", v, offset_x)?, inc_x)?)),
            other => with_int_view!(other,
                v => Ok(Value::Int(b.sum_int(n, tail("X", v, offset_x)?, inc_x)?)),
                _ => Err(unsupported("sum", other.dtype()))),
        }
    }

    /// index := argmax(X)
    pub fn imax(&self, n: usize, x: BufferView<'_>, offset_x: usize, inc_x: isize) -> Result<usize> {
        let b = &self.backend;
        match x {
            BufferView::F32(v) => b.imax(n, tail("X", v, offset_x)?, inc_x),
            BufferView::F64(v) => b.imax(n, tail("X", v, offset_x)?, inc_x),
            other => with_int_view!(other,
                v => b.imax_int(n, tail("X", v, offset_x)?, inc_x),
                _ => Err(unsupported("imax", other.dtype()))),
        }
    }

    /// index := argmin(X)
    pub fn imin(&self, n: usize, x: BufferView<'_>, offset_x: usize, inc_x: isize) -> Result<usize> {
        let b = &self.backend;
        match x {
            BufferView::F32(v) => b.imin(n, tail("X", v, offset_x)?, inc_x),
            BufferView::F64(v) => b.imin(n, tail("X", v, offset_x)?, inc_x),
            other => with_int_view!(other,
                v => b.imin_int(n, tail("X", v, offset_x)?, inc_x),
                _ => Err(unsupported("imin", other.dtype()))),
        }
    }

    /// X := alpha * X + beta
    pub fn increment(
        &self,
        n: usize,
        alpha: f64,
        x: BufferViewMut<'_>,
        offset_x: usize,
        inc_x: isize,
        beta: f64,
    ) -> Result<()> {
        let b = &self.backend;
        match x {
            BufferViewMut::F32(v) => b.increment(
                n,
                tail_mut("X", v, offset_x)?,
                inc_x,
                alpha as f32,
                beta as f32,
            ),
            BufferViewMut::F64(v) => b.increment(n, tail_mut("X", v, offset_x)?, inc_x, alpha, beta),
            other => Err(unsupported("increment", other.dtype())),
        }
    }

    /// X := 1 / (alpha * X + beta)
    pub fn reciprocal(
        &self,
        n: usize,
        alpha: f64,
        x: BufferViewMut<'_>,
        offset_x: usize,
        inc_x: isize,
        beta: f64,
    ) -> Result<()> {
        let b = &self.backend;
        match x {
            BufferViewMut::F32(v) => b.reciprocal(
                n,
                tail_mut("X", v, offset_x)?,
                inc_x,
                alpha as f32,
                beta as f32,
            ),
            BufferViewMut::F64(v) => {
                b.reciprocal(n, tail_mut("X", v, offset_x)?, inc_x, alpha, beta)
            }
            other => Err(unsupported("reciprocal", other.dtype())),
        }
    }

    /// A(m,n) := alpha * op(X) + A(m,n)
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        alpha: f64,
        x: BufferView<'_>,
        offset_x: usize,
        inc_x: isize,
        a: BufferViewMut<'_>,
        offset_a: usize,
        ld_a: usize,
    ) -> Result<()> {
        check_same_dtype(x.dtype(), a.dtype())?;
        let b = &self.backend;
        match (x, a) {
            (BufferView::F32(xv), BufferViewMut::F32(av)) => b.add(
                trans,
                m,
                n,
                alpha as f32,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (BufferView::F64(xv), BufferViewMut::F64(av)) => b.add(
                trans,
                m,
                n,
                alpha,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (BufferView::C32(xv), BufferViewMut::C32(av)) => b.add(
                trans,
                m,
                n,
                Complex::new(alpha as f32, 0.0),
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (BufferView::C64(xv), BufferViewMut::C64(av)) => b.add(
                trans,
                m,
                n,
                Complex::new(alpha, 0.0),
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (other, _) => Err(unsupported("add", other.dtype())),
        }
    }

    /// A(m,n) := op(X) * A(m,n)
    #[allow(clippy::too_many_arguments)]
    pub fn multiply(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        x: BufferView<'_>,
        offset_x: usize,
        inc_x: isize,
        a: BufferViewMut<'_>,
        offset_a: usize,
        ld_a: usize,
    ) -> Result<()> {
        check_same_dtype(x.dtype(), a.dtype())?;
        let b = &self.backend;
        match (x, a) {
            (BufferView::F32(xv), BufferViewMut::F32(av)) => b.multiply(
                trans,
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (BufferView::F64(xv), BufferViewMut::F64(av)) => b.multiply(
                trans,
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (other, _) => Err(unsupported("multiply", other.dtype())),
        }
    }

    /// A(m,n) := op(X)
    #[allow(clippy::too_many_arguments)]
    pub fn duplicate(
        &self,
        trans: Transpose,
        m: usize,
        n: usize,
        x: BufferView<'_>,
        offset_x: usize,
        inc_x: isize,
        a: BufferViewMut<'_>,
        offset_a: usize,
        ld_a: usize,
    ) -> Result<()> {
        check_same_dtype(x.dtype(), a.dtype())?;
        let b = &self.backend;
        match (x, a) {
            (BufferView::F32(xv), BufferViewMut::F32(av)) => b.duplicate(
                trans,
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (BufferView::F64(xv), BufferViewMut::F64(av)) => b.duplicate(
                trans,
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (other, _) => Err(unsupported("duplicate", other.dtype())),
        }
    }

    /// B(m,k) := sum(A(m,n,k), axis=1)
    #[allow(clippy::too_many_arguments)]
    pub fn reduce_sum(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: BufferView<'_>,
        offset_a: usize,
        out: BufferViewMut<'_>,
        offset_b: usize,
    ) -> Result<()> {
        check_same_dtype(a.dtype(), out.dtype())?;
        let b = &self.backend;
        match (a, out) {
            (BufferView::F32(av), BufferViewMut::F32(bv)) => b.reduce_sum(
                m,
                n,
                k,
                tail("A", av, offset_a)?,
                tail_mut("B", bv, offset_b)?,
            ),
            (BufferView::F64(av), BufferViewMut::F64(bv)) => b.reduce_sum(
                m,
                n,
                k,
                tail("A", av, offset_a)?,
                tail_mut("B", bv, offset_b)?,
            ),
            (other, _) => Err(unsupported("reduce_sum", other.dtype())),
        }
    }

    /// X := op(X)
    pub fn unary(
        &self,
        op: UnaryOp,
        n: usize,
        x: BufferViewMut<'_>,
        offset_x: usize,
        inc_x: isize,
    ) -> Result<()> {
        let b = &self.backend;
        match x {
            BufferViewMut::F32(v) => b.unary(op, n, tail_mut("X", v, offset_x)?, inc_x),
            BufferViewMut::F64(v) => b.unary(op, n, tail_mut("X", v, offset_x)?, inc_x),
            other => Err(unsupported(op.name(), other.dtype())),
        }
    }

    /// X := 1 / (alpha * sqrt(X) + beta)
    pub fn rsqrt(
        &self,
        n: usize,
        alpha: f64,
        x: BufferViewMut<'_>,
        offset_x: usize,
        inc_x: isize,
        beta: f64,
    ) -> Result<()> {
        let b = &self.backend;
        match x {
            BufferViewMut::F32(v) => b.rsqrt(
                n,
                tail_mut("X", v, offset_x)?,
                inc_x,
                alpha as f32,
                beta as f32,
            ),
            BufferViewMut::F64(v) => b.rsqrt(n, tail_mut("X", v, offset_x)?, inc_x, alpha, beta),
            other => Err(unsupported("rsqrt", other.dtype())),
        }
    }

    /// X := value
    ///
    /// `value` is a view of at least one element of X's type; its first
    /// element is written. Every storable type is accepted.
    pub fn fill(
        &self,
        n: usize,
        value: BufferView<'_>,
        x: BufferViewMut<'_>,
        offset_x: usize,
        inc_x: isize,
    ) -> Result<()> {
        check_same_dtype(value.dtype(), x.dtype())?;
        if value.is_empty() {
            return Err(MatlibError::invalid("fill value buffer is empty"));
        }
        let b = &self.backend;
        match (value, x) {
            (BufferView::Bool(v), BufferViewMut::Bool(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::I8(v), BufferViewMut::I8(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::I16(v), BufferViewMut::I16(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::I32(v), BufferViewMut::I32(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::I64(v), BufferViewMut::I64(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::U8(v), BufferViewMut::U8(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::U16(v), BufferViewMut::U16(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::U32(v), BufferViewMut::U32(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::U64(v), BufferViewMut::U64(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::F16(v), BufferViewMut::F16(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::F32(v), BufferViewMut::F32(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::F64(v), BufferViewMut::F64(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::C32(v), BufferViewMut::C32(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (BufferView::C64(v), BufferViewMut::C64(xv)) => b.fill(n, v[0], tail_mut("X", xv, offset_x)?, inc_x),
            (other, _) => Err(unsupported("fill", other.dtype())),
        }
    }

    /// X := 0
    pub fn zeros(&self, n: usize, x: BufferViewMut<'_>, offset_x: usize, inc_x: isize) -> Result<()> {
        let b = &self.backend;
        match x {
            BufferViewMut::F32(v) => b.fill(n, 0.0, tail_mut("X", v, offset_x)?, inc_x),
            BufferViewMut::F64(v) => b.fill(n, 0.0, tail_mut("X", v, offset_x)?, inc_x),
            other => Err(unsupported("zeros", other.dtype())),
        }
    }

    /// A(m,n) := A(m,n) ^ op(X)
    ///
    /// With `trans` set, X has `m` elements and is broadcast down columns.
    #[allow(clippy::too_many_arguments)]
    pub fn pow(
        &self,
        trans: bool,
        m: usize,
        n: usize,
        a: BufferViewMut<'_>,
        offset_a: usize,
        ld_a: usize,
        x: BufferView<'_>,
        offset_x: usize,
        inc_x: isize,
    ) -> Result<()> {
        check_same_dtype(x.dtype(), a.dtype())?;
        let trans = Transpose::from_flag(trans);
        let b = &self.backend;
        match (x, a) {
            (BufferView::F32(xv), BufferViewMut::F32(av)) => b.pow(
                trans,
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (BufferView::F64(xv), BufferViewMut::F64(av)) => b.pow(
                trans,
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (other, _) => Err(unsupported("pow", other.dtype())),
        }
    }

    /// A(m,n) := max(A(m,n), X(n))
    #[allow(clippy::too_many_arguments)]
    pub fn maximum(
        &self,
        m: usize,
        n: usize,
        a: BufferViewMut<'_>,
        offset_a: usize,
        ld_a: usize,
        x: BufferView<'_>,
        offset_x: usize,
        inc_x: isize,
    ) -> Result<()> {
        check_same_dtype(x.dtype(), a.dtype())?;
        let b = &self.backend;
        match (x, a) {
            (BufferView::F32(xv), BufferViewMut::F32(av)) => b.maximum(
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (BufferView::F64(xv), BufferViewMut::F64(av)) => b.maximum(
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (other, _) => Err(unsupported("maximum", other.dtype())),
        }
    }

    /// A(m,n) := min(A(m,n), X(n))
    #[allow(clippy::too_many_arguments)]
    pub fn minimum(
        &self,
        m: usize,
        n: usize,
        a: BufferViewMut<'_>,
        offset_a: usize,
        ld_a: usize,
        x: BufferView<'_>,
        offset_x: usize,
        inc_x: isize,
    ) -> Result<()> {
        check_same_dtype(x.dtype(), a.dtype())?;
        let b = &self.backend;
        match (x, a) {
            (BufferView::F32(xv), BufferViewMut::F32(av)) => b.minimum(
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (BufferView::F64(xv), BufferViewMut::F64(av)) => b.minimum(
                m,
                n,
                tail("X", xv, offset_x)?,
                inc_x,
                tail_mut("A", av, offset_a)?,
                ld_a,
            ),
            (other, _) => Err(unsupported("minimum", other.dtype())),
        }
    }

    /// B(m,k) := max(A(m,n,k), axis=1)
    #[allow(clippy::too_many_arguments)]
    pub fn reduce_max(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: BufferView<'_>,
        offset_a: usize,
        out: BufferViewMut<'_>,
        offset_b: usize,
    ) -> Result<()> {
        check_same_dtype(a.dtype(), out.dtype())?;
        let b = &self.backend;
        match (a, out) {
            (BufferView::F32(av), BufferViewMut::F32(bv)) => b.reduce_max(
                m,
                n,
                k,
                tail("A", av, offset_a)?,
                tail_mut("B", bv, offset_b)?,
            ),
            (BufferView::F64(av), BufferViewMut::F64(bv)) => b.reduce_max(
                m,
                n,
                k,
                tail("A", av, offset_a)?,
                tail_mut("B", bv, offset_b)?,
            ),
            (other, _) => Err(unsupported("reduce_max", other.dtype())),
        }
    }

    /// B(m,k) := argmax(A(m,n,k), axis=1)
    ///
    /// B may be any integer type; indices wrap if they do not fit.
    #[allow(clippy::too_many_arguments)]
    pub fn reduce_arg_max(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: BufferView<'_>,
        offset_a: usize,
        out: BufferViewMut<'_>,
        offset_b: usize,
    ) -> Result<()> {
        let out_dtype = out.dtype();
        if !out_dtype.is_integer() {
            return Err(unsupported("reduce_arg_max output", out_dtype));
        }
        let b = &self.backend;
        match a {
            BufferView::F32(av) => with_int_view_mut!(out,
                bv => b.reduce_arg_max(m, n, k, tail("A", av, offset_a)?, tail_mut("B", bv, offset_b)?),
                _ => Err(unsupported("reduce_arg_max output", out_dtype))),
            BufferView::F64(av) => with_int_view_mut!(out,
                bv => b.reduce_arg_max(m, n, k, tail("A", av, offset_a)?, tail_mut("B", bv, offset_b)?),
                _ => Err(unsupported("reduce_arg_max output", out_dtype))),
            other => Err(unsupported("reduce_arg_max", other.dtype())),
        }
    }
}
