//! Descriptors for strided vectors and leading-dimension matrices.
//!
//! A vector of `n` elements with stride `inc` covers a window of
//! `(n - 1) * |inc| + 1` elements. A negative stride walks that same window
//! from its last element back to its first, so logical element `i` lives at
//! `(n - 1 - i) * |inc|`.

use crate::error::{MatlibError, Result};

/// A strided vector inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorLayout {
    pub n: usize,
    pub inc: isize,
}

impl VectorLayout {
    pub fn new(n: usize, inc: isize) -> Self {
        VectorLayout { n, inc }
    }

    /// Number of buffer elements the vector touches, first to last, or
    /// `None` if that count does not fit in `usize`.
    pub fn span(&self) -> Option<usize> {
        if self.n == 0 {
            return Some(0);
        }
        (self.n - 1)
            .checked_mul(self.inc.unsigned_abs())?
            .checked_add(1)
    }

    /// Buffer position of logical element `i`.
    #[inline]
    pub fn index(&self, i: usize) -> usize {
        let step = self.inc.unsigned_abs();
        if self.inc >= 0 {
            i * step
        } else {
            (self.n - 1 - i) * step
        }
    }

    /// Check that the vector fits in a buffer of `len` elements and return
    /// its span.
    ///
    /// `name` is the operand name used in the error message ("X", "A", ...).
    pub fn validate(&self, name: &str, len: usize) -> Result<usize> {
        if self.n == 0 {
            return Ok(0);
        }
        if self.inc == 0 {
            return Err(MatlibError::invalid(format!(
                "inc{} must not be zero",
                name
            )));
        }
        let span = self.span().ok_or_else(|| {
            MatlibError::invalid(format!(
                "vector specification for buffer{} overflows: n={} inc={}",
                name, self.n, self.inc
            ))
        })?;
        if span > len {
            return Err(MatlibError::invalid(format!(
                "vector specification too large for buffer{}: needs {} elements, has {}",
                name, span, len
            )));
        }
        Ok(span)
    }
}

/// A row-major `m x n` matrix whose rows start `ld` elements apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixLayout {
    pub m: usize,
    pub n: usize,
    pub ld: usize,
}

impl MatrixLayout {
    pub fn new(m: usize, n: usize, ld: usize) -> Self {
        MatrixLayout { m, n, ld }
    }

    pub fn is_empty(&self) -> bool {
        self.m == 0 || self.n == 0
    }

    /// Number of buffer elements from the first to the last matrix element,
    /// or `None` if that count does not fit in `usize`.
    pub fn span(&self) -> Option<usize> {
        if self.is_empty() {
            return Some(0);
        }
        (self.m - 1).checked_mul(self.ld)?.checked_add(self.n)
    }

    /// Number of matrix elements, saturating at `usize::MAX`.
    pub fn elements(&self) -> usize {
        self.m.saturating_mul(self.n)
    }

    /// Check the leading dimension and that the matrix fits in a buffer of
    /// `len` elements, returning its span.
    ///
    /// Rows may not overlap, so `ld` must be at least `max(1, n)`.
    pub fn validate(&self, name: &str, len: usize) -> Result<usize> {
        if self.ld < self.n.max(1) {
            return Err(MatlibError::invalid(format!(
                "ld{}={} must be at least max(1, n={})",
                name, self.ld, self.n
            )));
        }
        let span = self.span().ok_or_else(|| {
            MatlibError::invalid(format!(
                "matrix specification for buffer{} overflows: m={} ld={}",
                name, self.m, self.ld
            ))
        })?;
        if span > len {
            return Err(MatlibError::invalid(format!(
                "matrix specification too large for buffer{}: needs {} elements, has {}",
                name, span, len
            )));
        }
        Ok(span)
    }
}

/// Convert a signed dimension from the C ABI, rejecting negatives.
pub fn dimension(name: &str, value: i32) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| MatlibError::invalid(format!("{} must not be negative, got {}", name, value)))
}

/// Check that an `offset` leaves room in a buffer of `len` elements.
pub fn check_offset(name: &str, offset: usize, len: usize) -> Result<()> {
    if offset > len {
        return Err(MatlibError::invalid(format!(
            "offset{}={} is past the end of buffer{} (len {})",
            name, offset, name, len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_span() {
        assert_eq!(VectorLayout::new(0, 3).span(), Some(0));
        assert_eq!(VectorLayout::new(1, 3).span(), Some(1));
        assert_eq!(VectorLayout::new(3, 2).span(), Some(5));
        assert_eq!(VectorLayout::new(3, -2).span(), Some(5));
        assert_eq!(VectorLayout::new(usize::MAX / 2 + 2, 2).span(), None);
        assert_eq!(VectorLayout::new(3, isize::MIN).span(), None);
    }

    #[test]
    fn test_vector_index() {
        let fwd = VectorLayout::new(3, 2);
        assert_eq!(
            (0..3).map(|i| fwd.index(i)).collect::<Vec<_>>(),
            vec![0, 2, 4]
        );
        let rev = VectorLayout::new(3, -2);
        assert_eq!(
            (0..3).map(|i| rev.index(i)).collect::<Vec<_>>(),
            vec![4, 2, 0]
        );
    }

    #[test]
    fn test_vector_validate() {
        assert_eq!(VectorLayout::new(3, 1).validate("X", 3).unwrap(), 3);
        assert!(VectorLayout::new(3, 2).validate("X", 4).is_err());
        assert!(VectorLayout::new(2, 0).validate("X", 4).is_err());
        // Empty vectors never touch the buffer.
        assert!(VectorLayout::new(0, 0).validate("X", 0).is_ok());
    }

    #[test]
    fn test_vector_validate_overflow() {
        let huge = VectorLayout::new(usize::MAX / 2 + 2, 2);
        let err = huge.validate("X", 2).unwrap_err();
        assert_eq!(err.code(), -107);
        assert!(err.to_string().contains("overflows"));
        assert!(huge.validate("X", usize::MAX).is_err());
    }

    #[test]
    fn test_matrix_validate() {
        let ok = MatrixLayout::new(2, 3, 4);
        assert_eq!(ok.span(), Some(7));
        assert_eq!(ok.validate("A", 7).unwrap(), 7);
        assert!(ok.validate("A", 6).is_err());

        let narrow = MatrixLayout::new(2, 3, 2);
        let err = narrow.validate("A", 100).unwrap_err();
        assert_eq!(err.code(), -107);

        assert!(MatrixLayout::new(0, 0, 1).validate("A", 0).is_ok());
        assert!(MatrixLayout::new(1, 0, 0).validate("A", 0).is_err());
    }

    #[test]
    fn test_matrix_validate_overflow() {
        let huge = MatrixLayout::new(3, 1, usize::MAX / 2 + 1);
        assert_eq!(huge.span(), None);
        let err = huge.validate("A", usize::MAX).unwrap_err();
        assert_eq!(err.code(), -107);
        assert!(err.to_string().contains("overflows"));
        assert_eq!(MatrixLayout::new(usize::MAX, 4, 4).elements(), usize::MAX);
    }

    #[test]
    fn test_dimension() {
        assert_eq!(dimension("n", 4).unwrap(), 4);
        assert_eq!(dimension("n", 0).unwrap(), 0);
        assert!(dimension("n", -1).is_err());
    }

    #[test]
    fn test_check_offset() {
        assert!(check_offset("X", 0, 0).is_ok());
        assert!(check_offset("X", 3, 3).is_ok());
        assert!(check_offset("X", 4, 3).is_err());
    }
}
