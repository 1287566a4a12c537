use thiserror::Error;

/// Status code reported for a successful call.
pub const SUCCESS: i32 = 0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatlibError {
    #[error("memory allocation failure: {0}")]
    MemAllocFailure(String),
    #[error("permutation out of range: {0}")]
    PermOutOfRange(String),
    #[error("duplicate axis: {0}")]
    DupAxis(String),
    #[error("unsupported data type: {0}")]
    UnsupportedDataType(String),
    #[error("image buffer size mismatch: {0}")]
    UnmatchImageBufferSize(String),
    #[error("cols buffer size mismatch: {0}")]
    UnmatchColsBufferSize(String),
    #[error("invalid shape or parameter: {0}")]
    InvalidShapeOrParam(String),
    #[error("images out of range: {0}")]
    ImagesOutOfRange(String),
    #[error("cols out of range: {0}")]
    ColsOutOfRange(String),
}

impl MatlibError {
    /// The stable negative integer code carried across the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            MatlibError::MemAllocFailure(_) => -101,
            MatlibError::PermOutOfRange(_) => -102,
            MatlibError::DupAxis(_) => -103,
            MatlibError::UnsupportedDataType(_) => -104,
            MatlibError::UnmatchImageBufferSize(_) => -105,
            MatlibError::UnmatchColsBufferSize(_) => -106,
            MatlibError::InvalidShapeOrParam(_) => -107,
            MatlibError::ImagesOutOfRange(_) => -108,
            MatlibError::ColsOutOfRange(_) => -109,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MatlibError::InvalidShapeOrParam(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        MatlibError::UnsupportedDataType(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, MatlibError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let all = [
            (MatlibError::MemAllocFailure(String::new()), -101),
            (MatlibError::PermOutOfRange(String::new()), -102),
            (MatlibError::DupAxis(String::new()), -103),
            (MatlibError::UnsupportedDataType(String::new()), -104),
            (MatlibError::UnmatchImageBufferSize(String::new()), -105),
            (MatlibError::UnmatchColsBufferSize(String::new()), -106),
            (MatlibError::InvalidShapeOrParam(String::new()), -107),
            (MatlibError::ImagesOutOfRange(String::new()), -108),
            (MatlibError::ColsOutOfRange(String::new()), -109),
        ];
        for (err, code) in all {
            assert_eq!(err.code(), code);
            assert!(err.code() < SUCCESS);
        }
    }

    #[test]
    fn test_display_includes_message() {
        let err = MatlibError::invalid("incX must not be zero");
        assert_eq!(
            err.to_string(),
            "invalid shape or parameter: incX must not be zero"
        );
    }
}
