use matlib_core::{Complex, MatlibError, Parallel};

/// Status codes reported through `rindow_matlib_common_last_error`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatlibStatus {
    Success = 0,
    MemAllocFailure = -101,
    PermOutOfRange = -102,
    DupAxis = -103,
    UnsupportedDataType = -104,
    UnmatchImageBufferSize = -105,
    UnmatchColsBufferSize = -106,
    InvalidShapeOrParam = -107,
    ImagesOutOfRange = -108,
    ColsOutOfRange = -109,
}

impl From<&MatlibError> for MatlibStatus {
    fn from(err: &MatlibError) -> Self {
        match err {
            MatlibError::MemAllocFailure(_) => MatlibStatus::MemAllocFailure,
            MatlibError::PermOutOfRange(_) => MatlibStatus::PermOutOfRange,
            MatlibError::DupAxis(_) => MatlibStatus::DupAxis,
            MatlibError::UnsupportedDataType(_) => MatlibStatus::UnsupportedDataType,
            MatlibError::UnmatchImageBufferSize(_) => MatlibStatus::UnmatchImageBufferSize,
            MatlibError::UnmatchColsBufferSize(_) => MatlibStatus::UnmatchColsBufferSize,
            MatlibError::InvalidShapeOrParam(_) => MatlibStatus::InvalidShapeOrParam,
            MatlibError::ImagesOutOfRange(_) => MatlibStatus::ImagesOutOfRange,
            MatlibError::ColsOutOfRange(_) => MatlibStatus::ColsOutOfRange,
        }
    }
}

/// Threading model reported by `rindow_matlib_common_get_parallel`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatlibParallel {
    Sequential = 0,
    Thread = 1,
    OpenMp = 2,
}

impl From<Parallel> for MatlibParallel {
    fn from(p: Parallel) -> Self {
        match p {
            Parallel::Sequential => MatlibParallel::Sequential,
            Parallel::Thread => MatlibParallel::Thread,
            Parallel::OpenMp => MatlibParallel::OpenMp,
        }
    }
}

/// Single-precision complex number, laid out as `{ re, im }`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatlibComplex32 {
    pub re: f32,
    pub im: f32,
}

/// Double-precision complex number, laid out as `{ re, im }`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatlibComplex64 {
    pub re: f64,
    pub im: f64,
}

impl From<MatlibComplex32> for Complex<f32> {
    fn from(c: MatlibComplex32) -> Self {
        Complex::new(c.re, c.im)
    }
}

impl From<MatlibComplex64> for Complex<f64> {
    fn from(c: MatlibComplex64) -> Self {
        Complex::new(c.re, c.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_matches_core_codes() {
        let errors = [
            MatlibError::MemAllocFailure(String::new()),
            MatlibError::DupAxis(String::new()),
            MatlibError::UnsupportedDataType(String::new()),
            MatlibError::InvalidShapeOrParam(String::new()),
            MatlibError::ColsOutOfRange(String::new()),
        ];
        for err in &errors {
            assert_eq!(MatlibStatus::from(err) as i32, err.code());
        }
    }

    #[test]
    fn test_complex_layout() {
        assert_eq!(
            std::mem::size_of::<MatlibComplex32>(),
            std::mem::size_of::<Complex<f32>>()
        );
        assert_eq!(
            std::mem::align_of::<MatlibComplex64>(),
            std::mem::align_of::<Complex<f64>>()
        );
        let z: Complex<f64> = MatlibComplex64 { re: 1.0, im: -2.0 }.into();
        assert_eq!(z, Complex::new(1.0, -2.0));
    }
}
