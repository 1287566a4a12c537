use std::fmt;

use crate::error::MatlibError;

/// How a vector operand is laid against a matrix operand.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transpose {
    /// `x` has one element per column and is applied to every row.
    NoTrans = 111,
    /// `x` has one element per row and is applied to every column.
    Trans = 112,
    ConjTrans = 113,
    ConjNoTrans = 114,
}

impl Transpose {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// True when `x` runs along the rows of the matrix (length `m`).
    pub fn is_trans(&self) -> bool {
        matches!(self, Transpose::Trans | Transpose::ConjTrans)
    }

    /// True when `x` is conjugated before use. A no-op for real data.
    pub fn is_conj(&self) -> bool {
        matches!(self, Transpose::ConjTrans | Transpose::ConjNoTrans)
    }

    /// Length `x` must have for an `m x n` matrix.
    pub fn vector_len(&self, m: usize, n: usize) -> usize {
        if self.is_trans() {
            m
        } else {
            n
        }
    }

    pub fn from_flag(trans: bool) -> Self {
        if trans {
            Transpose::Trans
        } else {
            Transpose::NoTrans
        }
    }
}

impl TryFrom<i32> for Transpose {
    type Error = MatlibError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            111 => Ok(Transpose::NoTrans),
            112 => Ok(Transpose::Trans),
            113 => Ok(Transpose::ConjTrans),
            114 => Ok(Transpose::ConjNoTrans),
            other => Err(MatlibError::invalid(format!(
                "unknown transpose code {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Transpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transpose::NoTrans => "no_trans",
            Transpose::Trans => "trans",
            Transpose::ConjTrans => "conj_trans",
            Transpose::ConjNoTrans => "conj_no_trans",
        };
        f.write_str(s)
    }
}
