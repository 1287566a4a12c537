use std::ffi::CString;
use std::sync::OnceLock;

use matlib_core::{config, CpuBackend};

/// Backend shared by every exported symbol.
pub fn backend() -> &'static CpuBackend {
    static BACKEND: OnceLock<CpuBackend> = OnceLock::new();
    BACKEND.get_or_init(CpuBackend::new)
}

/// NUL-terminated version string with static lifetime.
pub fn version() -> &'static CString {
    static VERSION: OnceLock<CString> = OnceLock::new();
    VERSION.get_or_init(|| CString::new(config::version()).unwrap_or_default())
}
