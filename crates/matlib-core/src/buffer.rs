//! Borrowed, dtype-tagged views over caller-owned buffers.
//!
//! The views never own or copy data. Tags that have no native Rust element
//! type (`float8`, `complex8`, `complex16`, `unknown`) have no variant and are
//! therefore rejected before any kernel runs.

use half::f16;
use num_complex::Complex;

use crate::dtype::DType;

macro_rules! buffer_views {
    ($($variant:ident($t:ty) => $dtype:ident),* $(,)?) => {
        /// Read-only view of a dense buffer of one element type.
        ///
        /// `Bool` buffers hold one byte per element; any non-zero byte is true.
        #[derive(Debug, Clone, Copy)]
        pub enum BufferView<'a> {
            $($variant(&'a [$t]),)*
        }

        /// Mutable view of a dense buffer of one element type.
        #[derive(Debug)]
        pub enum BufferViewMut<'a> {
            $($variant(&'a mut [$t]),)*
        }

        impl<'a> BufferView<'a> {
            pub fn dtype(&self) -> DType {
                match self {
                    $(BufferView::$variant(_) => DType::$dtype,)*
                }
            }

            /// Number of elements in the buffer.
            pub fn len(&self) -> usize {
                match self {
                    $(BufferView::$variant(v) => v.len(),)*
                }
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }

        impl<'a> BufferViewMut<'a> {
            pub fn dtype(&self) -> DType {
                match self {
                    $(BufferViewMut::$variant(_) => DType::$dtype,)*
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(BufferViewMut::$variant(v) => v.len(),)*
                }
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }
    };
}

buffer_views!(
    Bool(u8) => Bool,
    I8(i8) => Int8,
    I16(i16) => Int16,
    I32(i32) => Int32,
    I64(i64) => Int64,
    U8(u8) => Uint8,
    U16(u16) => Uint16,
    U32(u32) => Uint32,
    U64(u64) => Uint64,
    F16(f16) => Float16,
    F32(f32) => Float32,
    F64(f64) => Float64,
    C32(Complex<f32>) => Complex32,
    C64(Complex<f64>) => Complex64,
);

macro_rules! impl_from_slices {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a [$t]> for BufferView<'a> {
                fn from(v: &'a [$t]) -> Self {
                    BufferView::$variant(v)
                }
            }

            impl<'a> From<&'a mut [$t]> for BufferViewMut<'a> {
                fn from(v: &'a mut [$t]) -> Self {
                    BufferViewMut::$variant(v)
                }
            }
        )*
    };
}

// `u8` maps to Uint8; construct `Bool` views explicitly.
impl_from_slices!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f16 => F16,
    f32 => F32,
    f64 => F64,
    Complex<f32> => C32,
    Complex<f64> => C64,
);
