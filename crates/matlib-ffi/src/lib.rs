//! C ABI for matlib.
//!
//! # Safety
//!
//! Every pointer argument must either be null (only allowed when the
//! operation touches no elements) or point to a properly aligned buffer
//! holding at least as many elements as the vector or matrix description
//! spans. Buffers passed as `a` or `x` to in-place operations must not
//! overlap any other operand of the same call.
#![allow(clippy::missing_safety_doc, clippy::too_many_arguments)]

mod context;
mod error;
mod types;

pub use context::*;
pub use error::*;
pub use types::*;

use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};

use matlib_core::layout::dimension;
use matlib_core::{
    config, Complex, ComputeBackend, DType, Float, IntElement, MatlibError, MatrixLayout, Result,
    Transpose, UnaryOp, VectorLayout,
};
use tracing::warn;

/// Run `f`, turning an error or a panic into `fallback` plus a recorded
/// last error.
fn guard<R, F>(symbol: &'static str, fallback: R, f: F) -> R
where
    F: FnOnce() -> Result<R>,
{
    let err = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => return value,
        Ok(Err(err)) => err,
        Err(_) => MatlibError::InvalidShapeOrParam("internal panic".to_string()),
    };
    warn!(symbol, code = err.code(), error = %err, "call rejected");
    set_last_error(&err);
    fallback
}

fn invalid(msg: impl Into<String>) -> MatlibError {
    MatlibError::InvalidShapeOrParam(msg.into())
}

fn unsupported(op: &str, dtype: DType) -> MatlibError {
    MatlibError::UnsupportedDataType(format!("{} does not support {}", op, dtype))
}

/// Largest element count a slice of `T` may have.
fn max_elements<T>() -> usize {
    isize::MAX as usize / std::mem::size_of::<T>().max(1)
}

/// Borrow the window a strided vector of `n` elements covers.
unsafe fn vector<'a, T>(name: &str, ptr: *const T, n: usize, inc: i32) -> Result<&'a [T]> {
    let layout = VectorLayout::new(n, inc as isize);
    if n == 0 {
        return Ok(&[]);
    }
    let span = layout.validate(name, max_elements::<T>())?;
    if ptr.is_null() {
        return Err(invalid(format!("buffer{} is null", name)));
    }
    Ok(unsafe { std::slice::from_raw_parts(ptr, span) })
}

unsafe fn vector_mut<'a, T>(name: &str, ptr: *mut T, n: usize, inc: i32) -> Result<&'a mut [T]> {
    let layout = VectorLayout::new(n, inc as isize);
    if n == 0 {
        return Ok(Default::default());
    }
    let span = layout.validate(name, max_elements::<T>())?;
    if ptr.is_null() {
        return Err(invalid(format!("buffer{} is null", name)));
    }
    Ok(unsafe { std::slice::from_raw_parts_mut(ptr, span) })
}

/// Borrow the rows of an `m x n` matrix with leading dimension `ld`.
unsafe fn matrix_mut<'a, T>(
    name: &str,
    ptr: *mut T,
    m: usize,
    n: usize,
    ld: usize,
) -> Result<&'a mut [T]> {
    let layout = MatrixLayout::new(m, n, ld);
    let span = layout.validate(name, max_elements::<T>())?;
    if layout.is_empty() {
        return Ok(Default::default());
    }
    if ptr.is_null() {
        return Err(invalid(format!("buffer{} is null", name)));
    }
    Ok(unsafe { std::slice::from_raw_parts_mut(ptr, span) })
}

/// Decoded arguments shared by the broadcast family.
struct Broadcast<'a, T> {
    trans: Transpose,
    m: usize,
    n: usize,
    x: &'a [T],
    inc: isize,
    a: &'a mut [T],
    ld: usize,
}

unsafe fn broadcast_args<'a, T>(
    trans: Transpose,
    m: i32,
    n: i32,
    x: *const T,
    inc_x: i32,
    a: *mut T,
    ld_a: i32,
) -> Result<Broadcast<'a, T>> {
    let m = dimension("m", m)?;
    let n = dimension("n", n)?;
    let ld = dimension("ldA", ld_a)?;
    let a = unsafe { matrix_mut("A", a, m, n, ld)? };
    // An empty matrix never reads X.
    let x_len = if m == 0 || n == 0 {
        0
    } else {
        trans.vector_len(m, n)
    };
    let x = unsafe { vector("X", x, x_len, inc_x)? };
    Ok(Broadcast {
        trans,
        m,
        n,
        x,
        inc: inc_x as isize,
        a,
        ld,
    })
}

unsafe fn sum<T: matlib_core::Element>(n: i32, x: *const T, inc_x: i32) -> Result<T> {
    let n = dimension("n", n)?;
    let x = unsafe { vector("X", x, n, inc_x)? };
    context::backend().sum(n, x, inc_x as isize)
}

unsafe fn add<T: matlib_core::Element>(
    trans: i32,
    m: i32,
    n: i32,
    alpha: T,
    x: *const T,
    inc_x: i32,
    a: *mut T,
    ld_a: i32,
) -> Result<()> {
    let b = unsafe { broadcast_args(Transpose::try_from(trans)?, m, n, x, inc_x, a, ld_a)? };
    context::backend().add(b.trans, b.m, b.n, alpha, b.x, b.inc, b.a, b.ld)
}

unsafe fn index_of<T, F>(n: i32, x: *const T, inc_x: i32, pick: F) -> Result<i32>
where
    F: FnOnce(usize, &[T], isize) -> Result<usize>,
{
    let n = dimension("n", n)?;
    let x = unsafe { vector("X", x, n, inc_x)? };
    let index = pick(n, x, inc_x as isize)?;
    i32::try_from(index).map_err(|_| invalid(format!("index {} overflows int32", index)))
}

unsafe fn scale<T: matlib_core::Element>(
    n: i32,
    x: *mut T,
    inc_x: i32,
    alpha: T,
    beta: T,
    reciprocal: bool,
) -> Result<()> {
    let n = dimension("n", n)?;
    let x = unsafe { vector_mut("X", x, n, inc_x)? };
    let backend = context::backend();
    if reciprocal {
        backend.reciprocal(n, x, inc_x as isize, alpha, beta)
    } else {
        backend.increment(n, x, inc_x as isize, alpha, beta)
    }
}

/// Decoded arguments of a middle-axis reduction over contiguous [m, n, k].
struct Axis<'a, T, O> {
    m: usize,
    n: usize,
    k: usize,
    a: &'a [T],
    b: &'a mut [O],
}

unsafe fn axis_args<'a, T, O>(
    m: i32,
    n: i32,
    k: i32,
    a: *const T,
    b: *mut O,
) -> Result<Axis<'a, T, O>> {
    let m = dimension("m", m)?;
    let n = dimension("n", n)?;
    let k = dimension("k", k)?;
    let a_len = m
        .checked_mul(n)
        .and_then(|v| v.checked_mul(k))
        .ok_or_else(|| invalid("m*n*k overflows"))?;
    let b_len = m.checked_mul(k).ok_or_else(|| invalid("m*k overflows"))?;
    let a = unsafe { vector("A", a, a_len, 1)? };
    let b = unsafe { vector_mut("B", b, b_len, 1)? };
    Ok(Axis { m, n, k, a, b })
}

unsafe fn unary<T: matlib_core::Element + Float>(
    op: UnaryOp,
    n: i32,
    x: *mut T,
    inc_x: i32,
) -> Result<()> {
    let n = dimension("n", n)?;
    let x = unsafe { vector_mut("X", x, n, inc_x)? };
    context::backend().unary(op, n, x, inc_x as isize)
}

unsafe fn rsqrt<T: matlib_core::Element + Float>(
    n: i32,
    alpha: T,
    x: *mut T,
    inc_x: i32,
    beta: T,
) -> Result<()> {
    let n = dimension("n", n)?;
    let x = unsafe { vector_mut("X", x, n, inc_x)? };
    context::backend().rsqrt(n, x, inc_x as isize, alpha, beta)
}

unsafe fn fill_bytes<const N: usize>(
    n: usize,
    value: *const c_void,
    x: *mut c_void,
    inc_x: i32,
) -> Result<()> {
    let xs = unsafe { vector_mut("X", x.cast::<[u8; N]>(), n, inc_x)? };
    if n == 0 {
        return Ok(());
    }
    if value.is_null() {
        return Err(invalid("value pointer is null"));
    }
    let value = unsafe { value.cast::<[u8; N]>().read() };
    context::backend().fill(n, value, xs, inc_x as isize)
}

unsafe fn reduce_arg_max<T, I>(m: i32, n: i32, k: i32, a: *const T, b: *mut I) -> Result<()>
where
    T: matlib_core::Element + Float,
    I: IntElement,
{
    let ax = unsafe { axis_args(m, n, k, a, b)? };
    context::backend().reduce_arg_max(ax.m, ax.n, ax.k, ax.a, ax.b)
}

/// Dispatch an untyped pointer on an integer `dtype`, binding `$p` to the
/// pointer cast to the matching element type.
macro_rules! with_int_ptr {
    ($op:expr, $dtype:expr, $ptr:expr, $p:ident => $body:expr) => {
        match $dtype {
            DType::Int8 => { let $p = $ptr.cast::<i8>(); $body }
            DType::Int16 => { let $p = $ptr.cast::<i16>(); $body }
            DType::Int32 => { let $p = $ptr.cast::<i32>(); $body }
            DType::Int64 => { let $p = $ptr.cast::<i64>(); $body }
            DType::Uint8 => { let $p = $ptr.cast::<u8>(); $body }
            DType::Uint16 => { let $p = $ptr.cast::<u16>(); $body }
            DType::Uint32 => { let $p = $ptr.cast::<u32>(); $body }
            DType::Uint64 => { let $p = $ptr.cast::<u64>(); $body }
            other => Err(unsupported($op, other)),
        }
    };
}

/// Number of logical processors, at least 1.
#[no_mangle]
pub extern "C" fn rindow_matlib_common_get_nprocs() -> i32 {
    i32::try_from(config::nprocs()).unwrap_or(i32::MAX)
}

/// Number of worker threads kernels may use, at least 1.
#[no_mangle]
pub extern "C" fn rindow_matlib_common_get_num_threads() -> i32 {
    i32::try_from(config::num_threads()).unwrap_or(i32::MAX)
}

/// Threading model the library was built with (see `MatlibParallel`).
#[no_mangle]
pub extern "C" fn rindow_matlib_common_get_parallel() -> i32 {
    MatlibParallel::from(config::parallel()) as i32
}

/// Static version string. The caller must not free it.
#[no_mangle]
pub extern "C" fn rindow_matlib_common_get_version() -> *const c_char {
    context::version().as_ptr()
}

/// Status of the most recent failure on this thread, then reset to success.
#[no_mangle]
pub extern "C" fn rindow_matlib_common_last_error() -> MatlibStatus {
    take_last_status()
}

/// Message of the most recent failure on this thread, or null.
///
/// The caller owns the string and must free it with
/// `rindow_matlib_common_free_string`.
#[no_mangle]
pub extern "C" fn rindow_matlib_common_last_error_message() -> *mut c_char {
    match take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// Free a string returned by `rindow_matlib_common_last_error_message`.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_common_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Sum of `n` floats at stride `incX`. Returns NaN on failure.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_sum(n: i32, x: *const f32, inc_x: i32) -> f32 {
    guard("rindow_matlib_s_sum", f32::NAN, || unsafe { sum(n, x, inc_x) })
}

/// Sum of `n` doubles at stride `incX`. Returns NaN on failure.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_sum(n: i32, x: *const f64, inc_x: i32) -> f64 {
    guard("rindow_matlib_d_sum", f64::NAN, || unsafe { sum(n, x, inc_x) })
}

/// Integer sum (or true-count for bool) of a vector tagged with `dtype`.
/// Returns 0 on failure.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_i_sum(
    dtype: i32,
    n: i32,
    x: *const c_void,
    inc_x: i32,
) -> i64 {
    guard("rindow_matlib_i_sum", 0, || {
        let dtype = DType::try_from(dtype)?;
        let n = dimension("n", n)?;
        let backend = context::backend();
        let inc = inc_x as isize;
        if dtype == DType::Bool {
            let xs = unsafe { vector("X", x as *const u8, n, inc_x)? };
            return backend.count_true(n, xs, inc);
        }
        with_int_ptr!("sum", dtype, x, p => {
            let xs = unsafe { vector("X", p, n, inc_x)? };
            backend.sum_int(n, xs, inc)
        })
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_imax(n: i32, x: *const f32, inc_x: i32) -> i32 {
    guard("rindow_matlib_s_imax", -1, || unsafe {
        index_of(n, x, inc_x, |n, xs, inc| context::backend().imax(n, xs, inc))
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_imax(n: i32, x: *const f64, inc_x: i32) -> i32 {
    guard("rindow_matlib_d_imax", -1, || unsafe {
        index_of(n, x, inc_x, |n, xs, inc| context::backend().imax(n, xs, inc))
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_imin(n: i32, x: *const f32, inc_x: i32) -> i32 {
    guard("rindow_matlib_s_imin", -1, || unsafe {
        index_of(n, x, inc_x, |n, xs, inc| context::backend().imin(n, xs, inc))
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_imin(n: i32, x: *const f64, inc_x: i32) -> i32 {
    guard("rindow_matlib_d_imin", -1, || unsafe {
        index_of(n, x, inc_x, |n, xs, inc| context::backend().imin(n, xs, inc))
    })
}

/// Index of the first maximum of an integer vector tagged with `dtype`.
/// Returns -1 on failure.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_i_imax(
    dtype: i32,
    n: i32,
    x: *const c_void,
    inc_x: i32,
) -> i32 {
    guard("rindow_matlib_i_imax", -1, || {
        let dtype = DType::try_from(dtype)?;
        let n_elems = dimension("n", n)?;
        let backend = context::backend();
        let index = with_int_ptr!("imax", dtype, x, p => {
            let xs = unsafe { vector("X", p, n_elems, inc_x)? };
            backend.imax_int(n_elems, xs, inc_x as isize)
        })?;
        i32::try_from(index).map_err(|_| invalid(format!("index {} overflows int32", index)))
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_i_imin(
    dtype: i32,
    n: i32,
    x: *const c_void,
    inc_x: i32,
) -> i32 {
    guard("rindow_matlib_i_imin", -1, || {
        let dtype = DType::try_from(dtype)?;
        let n_elems = dimension("n", n)?;
        let backend = context::backend();
        let index = with_int_ptr!("imin", dtype, x, p => {
            let xs = unsafe { vector("X", p, n_elems, inc_x)? };
            backend.imin_int(n_elems, xs, inc_x as isize)
        })?;
        i32::try_from(index).map_err(|_| invalid(format!("index {} overflows int32", index)))
    })
}

/// x := alpha * x + beta
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_increment(
    n: i32,
    x: *mut f32,
    inc_x: i32,
    alpha: f32,
    beta: f32,
) {
    guard("rindow_matlib_s_increment", (), || unsafe {
        scale(n, x, inc_x, alpha, beta, false)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_increment(
    n: i32,
    x: *mut f64,
    inc_x: i32,
    alpha: f64,
    beta: f64,
) {
    guard("rindow_matlib_d_increment", (), || unsafe {
        scale(n, x, inc_x, alpha, beta, false)
    })
}

/// x := 1 / (alpha * x + beta)
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_reciprocal(
    n: i32,
    x: *mut f32,
    inc_x: i32,
    alpha: f32,
    beta: f32,
) {
    guard("rindow_matlib_s_reciprocal", (), || unsafe {
        scale(n, x, inc_x, alpha, beta, true)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_reciprocal(
    n: i32,
    x: *mut f64,
    inc_x: i32,
    alpha: f64,
    beta: f64,
) {
    guard("rindow_matlib_d_reciprocal", (), || unsafe {
        scale(n, x, inc_x, alpha, beta, true)
    })
}

/// A := A + alpha * op(X), broadcast along rows (no-trans) or columns
/// (trans). `alpha == 0` leaves `A` untouched.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_add(
    trans: i32,
    m: i32,
    n: i32,
    alpha: f32,
    x: *const f32,
    inc_x: i32,
    a: *mut f32,
    ld_a: i32,
) {
    guard("rindow_matlib_s_add", (), || unsafe {
        add(trans, m, n, alpha, x, inc_x, a, ld_a)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_add(
    trans: i32,
    m: i32,
    n: i32,
    alpha: f64,
    x: *const f64,
    inc_x: i32,
    a: *mut f64,
    ld_a: i32,
) {
    guard("rindow_matlib_d_add", (), || unsafe {
        add(trans, m, n, alpha, x, inc_x, a, ld_a)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_c_add(
    trans: i32,
    m: i32,
    n: i32,
    alpha: MatlibComplex32,
    x: *const MatlibComplex32,
    inc_x: i32,
    a: *mut MatlibComplex32,
    ld_a: i32,
) {
    guard("rindow_matlib_c_add", (), || unsafe {
        add::<Complex<f32>>(trans, m, n, alpha.into(), x.cast(), inc_x, a.cast(), ld_a)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_z_add(
    trans: i32,
    m: i32,
    n: i32,
    alpha: MatlibComplex64,
    x: *const MatlibComplex64,
    inc_x: i32,
    a: *mut MatlibComplex64,
    ld_a: i32,
) {
    guard("rindow_matlib_z_add", (), || unsafe {
        add::<Complex<f64>>(trans, m, n, alpha.into(), x.cast(), inc_x, a.cast(), ld_a)
    })
}

/// A := A * op(X)
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_multiply(
    trans: i32,
    m: i32,
    n: i32,
    x: *const f32,
    inc_x: i32,
    a: *mut f32,
    ld_a: i32,
) {
    guard("rindow_matlib_s_multiply", (), || {
        let b = unsafe { broadcast_args(Transpose::try_from(trans)?, m, n, x, inc_x, a, ld_a)? };
        context::backend().multiply(b.trans, b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_multiply(
    trans: i32,
    m: i32,
    n: i32,
    x: *const f64,
    inc_x: i32,
    a: *mut f64,
    ld_a: i32,
) {
    guard("rindow_matlib_d_multiply", (), || {
        let b = unsafe { broadcast_args(Transpose::try_from(trans)?, m, n, x, inc_x, a, ld_a)? };
        context::backend().multiply(b.trans, b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

/// A := op(X)
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_duplicate(
    trans: i32,
    m: i32,
    n: i32,
    x: *const f32,
    inc_x: i32,
    a: *mut f32,
    ld_a: i32,
) {
    guard("rindow_matlib_s_duplicate", (), || {
        let b = unsafe { broadcast_args(Transpose::try_from(trans)?, m, n, x, inc_x, a, ld_a)? };
        context::backend().duplicate(b.trans, b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_duplicate(
    trans: i32,
    m: i32,
    n: i32,
    x: *const f64,
    inc_x: i32,
    a: *mut f64,
    ld_a: i32,
) {
    guard("rindow_matlib_d_duplicate", (), || {
        let b = unsafe { broadcast_args(Transpose::try_from(trans)?, m, n, x, inc_x, a, ld_a)? };
        context::backend().duplicate(b.trans, b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

/// B[i][l] := sum_j A[i][j][l] for contiguous A of shape [m, n, k].
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_reducesum(
    m: i32,
    n: i32,
    k: i32,
    a: *const f32,
    b: *mut f32,
) {
    guard("rindow_matlib_s_reducesum", (), || {
        let ax = unsafe { axis_args(m, n, k, a, b)? };
        context::backend().reduce_sum(ax.m, ax.n, ax.k, ax.a, ax.b)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_reducesum(
    m: i32,
    n: i32,
    k: i32,
    a: *const f64,
    b: *mut f64,
) {
    guard("rindow_matlib_d_reducesum", (), || {
        let ax = unsafe { axis_args(m, n, k, a, b)? };
        context::backend().reduce_sum(ax.m, ax.n, ax.k, ax.a, ax.b)
    })
}

/// x := x * x
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_square(n: i32, x: *mut f32, inc_x: i32) {
    guard("rindow_matlib_s_square", (), || unsafe { unary(UnaryOp::Square, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_square(n: i32, x: *mut f64, inc_x: i32) {
    guard("rindow_matlib_d_square", (), || unsafe { unary(UnaryOp::Square, n, x, inc_x) })
}

/// x := sqrt(x). Negative inputs become NaN.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_sqrt(n: i32, x: *mut f32, inc_x: i32) {
    guard("rindow_matlib_s_sqrt", (), || unsafe { unary(UnaryOp::Sqrt, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_sqrt(n: i32, x: *mut f64, inc_x: i32) {
    guard("rindow_matlib_d_sqrt", (), || unsafe { unary(UnaryOp::Sqrt, n, x, inc_x) })
}

/// x := e ^ x
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_exp(n: i32, x: *mut f32, inc_x: i32) {
    guard("rindow_matlib_s_exp", (), || unsafe { unary(UnaryOp::Exp, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_exp(n: i32, x: *mut f64, inc_x: i32) {
    guard("rindow_matlib_d_exp", (), || unsafe { unary(UnaryOp::Exp, n, x, inc_x) })
}

/// x := ln(x). Zero maps to -inf, negative inputs to NaN.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_log(n: i32, x: *mut f32, inc_x: i32) {
    guard("rindow_matlib_s_log", (), || unsafe { unary(UnaryOp::Log, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_log(n: i32, x: *mut f64, inc_x: i32) {
    guard("rindow_matlib_d_log", (), || unsafe { unary(UnaryOp::Log, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_tanh(n: i32, x: *mut f32, inc_x: i32) {
    guard("rindow_matlib_s_tanh", (), || unsafe { unary(UnaryOp::Tanh, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_tanh(n: i32, x: *mut f64, inc_x: i32) {
    guard("rindow_matlib_d_tanh", (), || unsafe { unary(UnaryOp::Tanh, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_sin(n: i32, x: *mut f32, inc_x: i32) {
    guard("rindow_matlib_s_sin", (), || unsafe { unary(UnaryOp::Sin, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_sin(n: i32, x: *mut f64, inc_x: i32) {
    guard("rindow_matlib_d_sin", (), || unsafe { unary(UnaryOp::Sin, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_cos(n: i32, x: *mut f32, inc_x: i32) {
    guard("rindow_matlib_s_cos", (), || unsafe { unary(UnaryOp::Cos, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_cos(n: i32, x: *mut f64, inc_x: i32) {
    guard("rindow_matlib_d_cos", (), || unsafe { unary(UnaryOp::Cos, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_tan(n: i32, x: *mut f32, inc_x: i32) {
    guard("rindow_matlib_s_tan", (), || unsafe { unary(UnaryOp::Tan, n, x, inc_x) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_tan(n: i32, x: *mut f64, inc_x: i32) {
    guard("rindow_matlib_d_tan", (), || unsafe { unary(UnaryOp::Tan, n, x, inc_x) })
}

/// x := 1 / (alpha * sqrt(x) + beta)
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_rsqrt(
    n: i32,
    alpha: f32,
    x: *mut f32,
    inc_x: i32,
    beta: f32,
) {
    guard("rindow_matlib_s_rsqrt", (), || unsafe { rsqrt(n, alpha, x, inc_x, beta) })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_rsqrt(
    n: i32,
    alpha: f64,
    x: *mut f64,
    inc_x: i32,
    beta: f64,
) {
    guard("rindow_matlib_d_rsqrt", (), || unsafe { rsqrt(n, alpha, x, inc_x, beta) })
}

/// x := 0
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_zeros(n: i32, x: *mut f32, inc_x: i32) {
    guard("rindow_matlib_s_zeros", (), || {
        let n = dimension("n", n)?;
        let xs = unsafe { vector_mut("X", x, n, inc_x)? };
        context::backend().fill(n, 0.0, xs, inc_x as isize)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_zeros(n: i32, x: *mut f64, inc_x: i32) {
    guard("rindow_matlib_d_zeros", (), || {
        let n = dimension("n", n)?;
        let xs = unsafe { vector_mut("X", x, n, inc_x)? };
        context::backend().fill(n, 0.0, xs, inc_x as isize)
    })
}

/// x := *value for a vector of any element type. `value` points at one
/// element of `dtype`.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_fill(
    dtype: i32,
    n: i32,
    value: *const c_void,
    x: *mut c_void,
    inc_x: i32,
) {
    guard("rindow_matlib_fill", (), || {
        let dtype = DType::try_from(dtype)?;
        let n = dimension("n", n)?;
        match dtype.size_in_bytes() {
            1 => unsafe { fill_bytes::<1>(n, value, x, inc_x) },
            2 => unsafe { fill_bytes::<2>(n, value, x, inc_x) },
            4 => unsafe { fill_bytes::<4>(n, value, x, inc_x) },
            8 => unsafe { fill_bytes::<8>(n, value, x, inc_x) },
            16 => unsafe { fill_bytes::<16>(n, value, x, inc_x) },
            _ => Err(unsupported("fill", dtype)),
        }
    })
}

/// A := A ^ op(X), broadcast as in `rindow_matlib_s_add`.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_pow(
    trans: i32,
    m: i32,
    n: i32,
    a: *mut f32,
    ld_a: i32,
    x: *const f32,
    inc_x: i32,
) {
    guard("rindow_matlib_s_pow", (), || {
        let b = unsafe { broadcast_args(Transpose::try_from(trans)?, m, n, x, inc_x, a, ld_a)? };
        context::backend().pow(b.trans, b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_pow(
    trans: i32,
    m: i32,
    n: i32,
    a: *mut f64,
    ld_a: i32,
    x: *const f64,
    inc_x: i32,
) {
    guard("rindow_matlib_d_pow", (), || {
        let b = unsafe { broadcast_args(Transpose::try_from(trans)?, m, n, x, inc_x, a, ld_a)? };
        context::backend().pow(b.trans, b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

/// A[i][j] := max(A[i][j], X[j]). NaN in either operand yields NaN.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_maximum(
    m: i32,
    n: i32,
    a: *mut f32,
    ld_a: i32,
    x: *const f32,
    inc_x: i32,
) {
    guard("rindow_matlib_s_maximum", (), || {
        let b = unsafe { broadcast_args(Transpose::NoTrans, m, n, x, inc_x, a, ld_a)? };
        context::backend().maximum(b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_maximum(
    m: i32,
    n: i32,
    a: *mut f64,
    ld_a: i32,
    x: *const f64,
    inc_x: i32,
) {
    guard("rindow_matlib_d_maximum", (), || {
        let b = unsafe { broadcast_args(Transpose::NoTrans, m, n, x, inc_x, a, ld_a)? };
        context::backend().maximum(b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

/// A[i][j] := min(A[i][j], X[j]). NaN in either operand yields NaN.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_minimum(
    m: i32,
    n: i32,
    a: *mut f32,
    ld_a: i32,
    x: *const f32,
    inc_x: i32,
) {
    guard("rindow_matlib_s_minimum", (), || {
        let b = unsafe { broadcast_args(Transpose::NoTrans, m, n, x, inc_x, a, ld_a)? };
        context::backend().minimum(b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_minimum(
    m: i32,
    n: i32,
    a: *mut f64,
    ld_a: i32,
    x: *const f64,
    inc_x: i32,
) {
    guard("rindow_matlib_d_minimum", (), || {
        let b = unsafe { broadcast_args(Transpose::NoTrans, m, n, x, inc_x, a, ld_a)? };
        context::backend().minimum(b.m, b.n, b.x, b.inc, b.a, b.ld)
    })
}

/// B[i][l] := max_j A[i][j][l]. Requires `n >= 1`.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_reducemax(
    m: i32,
    n: i32,
    k: i32,
    a: *const f32,
    b: *mut f32,
) {
    guard("rindow_matlib_s_reducemax", (), || {
        let ax = unsafe { axis_args(m, n, k, a, b)? };
        context::backend().reduce_max(ax.m, ax.n, ax.k, ax.a, ax.b)
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_reducemax(
    m: i32,
    n: i32,
    k: i32,
    a: *const f64,
    b: *mut f64,
) {
    guard("rindow_matlib_d_reducemax", (), || {
        let ax = unsafe { axis_args(m, n, k, a, b)? };
        context::backend().reduce_max(ax.m, ax.n, ax.k, ax.a, ax.b)
    })
}

/// B[i][l] := index of the first maximum of A[i][..][l], written as the
/// integer type `dtypeB`.
#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_s_reduceargmax(
    m: i32,
    n: i32,
    k: i32,
    a: *const f32,
    dtype_b: i32,
    b: *mut c_void,
) {
    guard("rindow_matlib_s_reduceargmax", (), || {
        let dtype = DType::try_from(dtype_b)?;
        if !dtype.is_integer() {
            return Err(unsupported("reduceargmax output", dtype));
        }
        with_int_ptr!("reduceargmax output", dtype, b, p => unsafe {
            reduce_arg_max(m, n, k, a, p)
        })
    })
}

#[no_mangle]
pub unsafe extern "C" fn rindow_matlib_d_reduceargmax(
    m: i32,
    n: i32,
    k: i32,
    a: *const f64,
    dtype_b: i32,
    b: *mut c_void,
) {
    guard("rindow_matlib_d_reduceargmax", (), || {
        let dtype = DType::try_from(dtype_b)?;
        if !dtype.is_integer() {
            return Err(unsupported("reduceargmax output", dtype));
        }
        with_int_ptr!("reduceargmax output", dtype, b, p => unsafe {
            reduce_arg_max(m, n, k, a, p)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::ffi::CStr;
    use std::ptr;

    const NO_TRANS: i32 = 111;
    const TRANS: i32 = 112;

    fn clear() {
        let _ = rindow_matlib_common_last_error();
        let _ = take_last_error();
    }

    #[test]
    fn test_introspection() {
        assert!(rindow_matlib_common_get_nprocs() >= 1);
        assert!(rindow_matlib_common_get_num_threads() >= 1);
        assert!(matches!(rindow_matlib_common_get_parallel(), 0 | 1));
        let version = unsafe { CStr::from_ptr(rindow_matlib_common_get_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_sum_scenarios() {
        clear();
        let x = [1.0f32, 2.0, 3.0, 4.0];
        assert_eq!(unsafe { rindow_matlib_s_sum(4, x.as_ptr(), 1) }, 10.0);
        assert_eq!(unsafe { rindow_matlib_s_sum(2, x.as_ptr(), 2) }, 4.0);

        let y = [0.5f64, 0.25];
        assert_relative_eq!(unsafe { rindow_matlib_d_sum(2, y.as_ptr(), 1) }, 0.75);
        assert_eq!(rindow_matlib_common_last_error(), MatlibStatus::Success);
    }

    #[test]
    fn test_sum_empty_accepts_null() {
        assert_eq!(unsafe { rindow_matlib_s_sum(0, ptr::null(), 1) }, 0.0);
        assert_eq!(unsafe { rindow_matlib_d_sum(0, ptr::null(), 0) }, 0.0);
    }

    #[test]
    fn test_sum_negative_stride() {
        let x = [1.0f64, 10.0, 2.0, 20.0, 3.0];
        assert_eq!(unsafe { rindow_matlib_d_sum(3, x.as_ptr(), -2) }, 6.0);
    }

    #[test]
    fn test_sum_rejects_bad_args() {
        clear();
        let x = [1.0f32; 4];
        assert!(unsafe { rindow_matlib_s_sum(2, x.as_ptr(), 0) }.is_nan());
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
        // Cleared on read.
        assert_eq!(rindow_matlib_common_last_error(), MatlibStatus::Success);

        assert!(unsafe { rindow_matlib_s_sum(-1, x.as_ptr(), 1) }.is_nan());
        assert!(unsafe { rindow_matlib_s_sum(2, ptr::null(), 1) }.is_nan());
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
    }

    #[test]
    fn test_last_error_message() {
        clear();
        assert!(rindow_matlib_common_last_error_message().is_null());

        let x = [1.0f32; 2];
        unsafe { rindow_matlib_s_sum(2, x.as_ptr(), 0) };
        let msg = rindow_matlib_common_last_error_message();
        assert!(!msg.is_null());
        let text = unsafe { CStr::from_ptr(msg) }.to_str().unwrap().to_string();
        assert!(text.contains("incX"), "{}", text);
        unsafe { rindow_matlib_common_free_string(msg) };
        unsafe { rindow_matlib_common_free_string(ptr::null_mut()) };
        clear();
    }

    #[test]
    fn test_add_rows_and_columns() {
        let x = [1.0f32, 2.0, 3.0];
        let mut a = [0.0f32; 6];
        unsafe { rindow_matlib_s_add(NO_TRANS, 2, 3, 1.0, x.as_ptr(), 1, a.as_mut_ptr(), 3) };
        assert_eq!(a, [1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);

        let y = [10.0f64, 20.0];
        let mut b = [1.0f64; 6];
        unsafe { rindow_matlib_d_add(TRANS, 2, 3, 2.0, y.as_ptr(), 1, b.as_mut_ptr(), 3) };
        assert_eq!(b, [21.0, 21.0, 21.0, 41.0, 41.0, 41.0]);
    }

    #[test]
    fn test_add_leaves_padding_untouched() {
        let x = [1.0f32, 1.0];
        let mut a = [0.0f32, 0.0, -1.0, 0.0, 0.0];
        unsafe { rindow_matlib_s_add(NO_TRANS, 2, 2, 1.0, x.as_ptr(), 1, a.as_mut_ptr(), 3) };
        assert_eq!(a, [1.0, 1.0, -1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_add_rejects_bad_args() {
        clear();
        let x = [1.0f32; 3];
        let mut a = [0.0f32; 6];
        unsafe { rindow_matlib_s_add(999, 2, 3, 1.0, x.as_ptr(), 1, a.as_mut_ptr(), 3) };
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
        unsafe { rindow_matlib_s_add(NO_TRANS, 2, 3, 1.0, x.as_ptr(), 1, a.as_mut_ptr(), 2) };
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
        assert_eq!(a, [0.0; 6]);

        // Empty matrices never touch either buffer.
        unsafe { rindow_matlib_s_add(NO_TRANS, 0, 3, 1.0, ptr::null(), 1, ptr::null_mut(), 3) };
        assert_eq!(rindow_matlib_common_last_error(), MatlibStatus::Success);
    }

    #[test]
    fn test_complex_add_conjugates() {
        let x = [MatlibComplex32 { re: 1.0, im: 2.0 }];
        let mut a = [MatlibComplex32 { re: 0.0, im: 0.0 }; 2];
        let one = MatlibComplex32 { re: 1.0, im: 0.0 };
        unsafe { rindow_matlib_c_add(114, 2, 1, one, x.as_ptr(), 1, a.as_mut_ptr(), 1) };
        assert_eq!(a[0], MatlibComplex32 { re: 1.0, im: -2.0 });
        assert_eq!(a[1], MatlibComplex32 { re: 1.0, im: -2.0 });

        let z = [MatlibComplex64 { re: 0.5, im: 0.5 }];
        let mut b = [MatlibComplex64 { re: 1.0, im: 1.0 }];
        let two = MatlibComplex64 { re: 2.0, im: 0.0 };
        unsafe { rindow_matlib_z_add(NO_TRANS, 1, 1, two, z.as_ptr(), 1, b.as_mut_ptr(), 1) };
        assert_eq!(b[0], MatlibComplex64 { re: 2.0, im: 2.0 });
    }

    #[test]
    fn test_integer_sum() {
        clear();
        let x = [1i32, -2, 3, 4];
        let total = unsafe { rindow_matlib_i_sum(DType::Int32.code(), 4, x.as_ptr().cast(), 1) };
        assert_eq!(total, 6);

        let flags = [1u8, 0, 2, 0, 1];
        let count = unsafe { rindow_matlib_i_sum(DType::Bool.code(), 5, flags.as_ptr().cast(), 1) };
        assert_eq!(count, 3);

        let f = [1.0f32];
        let r = unsafe { rindow_matlib_i_sum(DType::Float32.code(), 1, f.as_ptr().cast(), 1) };
        assert_eq!(r, 0);
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::UnsupportedDataType
        );
    }

    #[test]
    fn test_index_reductions() {
        clear();
        let x = [3.0f32, 9.0, 1.0, 9.0];
        assert_eq!(unsafe { rindow_matlib_s_imax(4, x.as_ptr(), 1) }, 1);
        assert_eq!(unsafe { rindow_matlib_s_imin(4, x.as_ptr(), 1) }, 2);

        let y = [2.0f64, f64::NAN, 0.0];
        assert_eq!(unsafe { rindow_matlib_d_imax(3, y.as_ptr(), 1) }, 1);
        assert_eq!(unsafe { rindow_matlib_d_imin(3, y.as_ptr(), 1) }, 1);

        let ints = [5i16, -7, 12];
        let code = DType::Int16.code();
        assert_eq!(unsafe { rindow_matlib_i_imax(code, 3, ints.as_ptr().cast(), 1) }, 2);
        assert_eq!(unsafe { rindow_matlib_i_imin(code, 3, ints.as_ptr().cast(), 1) }, 1);

        assert_eq!(unsafe { rindow_matlib_s_imax(0, x.as_ptr(), 1) }, -1);
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
    }

    #[test]
    fn test_increment_and_reciprocal() {
        let mut x = [1.0f32, 2.0, 3.0];
        unsafe { rindow_matlib_s_increment(3, x.as_mut_ptr(), 1, 2.0, 1.0) };
        assert_eq!(x, [3.0, 5.0, 7.0]);

        let mut y = [1.0f64, 0.0, 3.0];
        unsafe { rindow_matlib_d_reciprocal(2, y.as_mut_ptr(), 2, 1.0, 1.0) };
        assert_relative_eq!(y[0], 0.5);
        assert_eq!(y[1], 0.0);
        assert_relative_eq!(y[2], 0.25);
    }

    #[test]
    fn test_multiply_and_duplicate() {
        let x = [2.0f32, 3.0];
        let mut a = [1.0f32, 1.0, 1.0, 1.0];
        unsafe { rindow_matlib_s_multiply(NO_TRANS, 2, 2, x.as_ptr(), 1, a.as_mut_ptr(), 2) };
        assert_eq!(a, [2.0, 3.0, 2.0, 3.0]);

        let y = [7.0f64, 8.0];
        let mut b = [0.0f64; 4];
        unsafe { rindow_matlib_d_duplicate(TRANS, 2, 2, y.as_ptr(), 1, b.as_mut_ptr(), 2) };
        assert_eq!(b, [7.0, 7.0, 8.0, 8.0]);
    }

    #[test]
    fn test_reducesum() {
        // shape [2, 3, 1]
        let a = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut b = [0.0f32; 2];
        unsafe { rindow_matlib_s_reducesum(2, 3, 1, a.as_ptr(), b.as_mut_ptr()) };
        assert_eq!(b, [6.0, 15.0]);

        clear();
        unsafe { rindow_matlib_d_reducesum(-1, 3, 1, ptr::null(), ptr::null_mut()) };
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
    }

    #[test]
    fn test_panic_is_recorded() {
        clear();
        let r: i32 = guard("test", -1, || panic!("boom"));
        assert_eq!(r, -1);
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
        let msg = take_last_error().unwrap();
        assert!(msg.to_str().unwrap().contains("internal panic"));
    }

    #[test]
    fn test_unary_family() {
        let mut x = [4.0f32, -1.0, 9.0];
        unsafe { rindow_matlib_s_sqrt(2, x.as_mut_ptr(), 2) };
        assert_eq!(x, [2.0, -1.0, 3.0]);
        unsafe { rindow_matlib_s_square(3, x.as_mut_ptr(), 1) };
        assert_eq!(x, [4.0, 1.0, 9.0]);

        let mut y = [0.0f64, 1.0];
        unsafe { rindow_matlib_d_exp(2, y.as_mut_ptr(), 1) };
        assert_relative_eq!(y[1], std::f64::consts::E);
        unsafe { rindow_matlib_d_log(2, y.as_mut_ptr(), 1) };
        assert_relative_eq!(y[0], 0.0);
        assert_relative_eq!(y[1], 1.0);

        let mut z = [0.0f64; 4];
        unsafe { rindow_matlib_d_sin(1, z.as_mut_ptr(), 1) };
        unsafe { rindow_matlib_d_cos(1, z[1..].as_mut_ptr(), 1) };
        unsafe { rindow_matlib_d_tan(1, z[2..].as_mut_ptr(), 1) };
        unsafe { rindow_matlib_d_tanh(1, z[3..].as_mut_ptr(), 1) };
        assert_eq!(z, [0.0, 1.0, 0.0, 0.0]);

        let mut neg = [-1.0f32];
        unsafe { rindow_matlib_s_log(1, neg.as_mut_ptr(), 1) };
        assert!(neg[0].is_nan());
    }

    #[test]
    fn test_rsqrt_and_zeros() {
        let mut x = [4.0f32, 16.0];
        unsafe { rindow_matlib_s_rsqrt(2, 1.0, x.as_mut_ptr(), 1, 0.0) };
        assert_eq!(x, [0.5, 0.25]);

        let mut y = [1.0f64; 5];
        unsafe { rindow_matlib_d_zeros(3, y.as_mut_ptr(), -2) };
        assert_eq!(y, [0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_fill_by_dtype() {
        clear();
        let mut ints = [0i64; 3];
        let v = 42i64;
        unsafe {
            rindow_matlib_fill(
                DType::Int64.code(),
                3,
                (&v as *const i64).cast(),
                ints.as_mut_ptr().cast(),
                1,
            )
        };
        assert_eq!(ints, [42; 3]);

        let mut zs = [MatlibComplex64 { re: 0.0, im: 0.0 }; 2];
        let z = MatlibComplex64 { re: 1.5, im: -2.0 };
        unsafe {
            rindow_matlib_fill(
                DType::Complex64.code(),
                1,
                (&z as *const MatlibComplex64).cast(),
                zs[1..].as_mut_ptr().cast(),
                1,
            )
        };
        assert_eq!(zs[0], MatlibComplex64 { re: 0.0, im: 0.0 });
        assert_eq!(zs[1], z);
        assert_eq!(rindow_matlib_common_last_error(), MatlibStatus::Success);

        unsafe {
            rindow_matlib_fill(
                DType::Unknown.code(),
                1,
                (&v as *const i64).cast(),
                ints.as_mut_ptr().cast(),
                1,
            )
        };
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::UnsupportedDataType
        );
        unsafe {
            rindow_matlib_fill(DType::Int64.code(), 1, ptr::null(), ints.as_mut_ptr().cast(), 1)
        };
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
    }

    #[test]
    fn test_pow_maximum_minimum() {
        let x = [2.0f32, 3.0];
        let mut a = [2.0f32; 4];
        unsafe { rindow_matlib_s_pow(NO_TRANS, 2, 2, a.as_mut_ptr(), 2, x.as_ptr(), 1) };
        assert_eq!(a, [4.0, 8.0, 4.0, 8.0]);

        let y = [1.0f64, f64::NAN];
        let mut b = [0.0f64, 5.0, 3.0, 2.0];
        unsafe { rindow_matlib_d_maximum(2, 2, b.as_mut_ptr(), 2, y.as_ptr(), 1) };
        assert_eq!(b[0], 1.0);
        assert!(b[1].is_nan());
        assert_eq!(b[2], 3.0);
        assert!(b[3].is_nan());

        let mut c = [0.0f64, 5.0, 3.0, 2.0];
        let w = [1.0f64, 4.0];
        unsafe { rindow_matlib_d_minimum(2, 2, c.as_mut_ptr(), 2, w.as_ptr(), 1) };
        assert_eq!(c, [0.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_reducemax_and_reduceargmax() {
        clear();
        // shape [2, 3, 1]
        let a = [1.0f32, 7.0, 3.0, 9.0, 5.0, 6.0];
        let mut b = [0.0f32; 2];
        unsafe { rindow_matlib_s_reducemax(2, 3, 1, a.as_ptr(), b.as_mut_ptr()) };
        assert_eq!(b, [7.0, 9.0]);

        let mut idx = [-1i32; 2];
        unsafe {
            rindow_matlib_s_reduceargmax(2, 3, 1, a.as_ptr(), DType::Int32.code(), idx.as_mut_ptr().cast())
        };
        assert_eq!(idx, [1, 0]);
        assert_eq!(rindow_matlib_common_last_error(), MatlibStatus::Success);

        let mut floats = [0.0f32; 2];
        unsafe {
            rindow_matlib_s_reduceargmax(2, 3, 1, a.as_ptr(), DType::Float32.code(), floats.as_mut_ptr().cast())
        };
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::UnsupportedDataType
        );

        let mut bd = [0.0f64; 1];
        unsafe { rindow_matlib_d_reducemax(1, 0, 1, ptr::null(), bd.as_mut_ptr()) };
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
    }

    #[test]
    fn test_span_beyond_address_space_is_rejected() {
        clear();
        let x = [1.0f32; 2];
        assert!(unsafe { rindow_matlib_s_sum(i32::MAX, x.as_ptr(), i32::MAX) }.is_nan());
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
        let mut a = [0.0f64; 4];
        unsafe { rindow_matlib_d_duplicate(NO_TRANS, i32::MAX, 1, ptr::null(), 1, a.as_mut_ptr(), i32::MAX) };
        assert_eq!(
            rindow_matlib_common_last_error(),
            MatlibStatus::InvalidShapeOrParam
        );
        assert_eq!(a, [0.0; 4]);
    }
}
