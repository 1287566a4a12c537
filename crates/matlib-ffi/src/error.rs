use std::cell::{Cell, RefCell};
use std::ffi::CString;

use matlib_core::MatlibError;

use crate::types::MatlibStatus;

thread_local! {
    static LAST_STATUS: Cell<MatlibStatus> = const { Cell::new(MatlibStatus::Success) };
    static LAST_MESSAGE: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record a failure for later retrieval via `rindow_matlib_common_last_error`.
pub fn set_last_error(err: &MatlibError) {
    LAST_STATUS.with(|s| s.set(MatlibStatus::from(err)));
    LAST_MESSAGE.with(|e| {
        *e.borrow_mut() = CString::new(err.to_string()).ok();
    });
}

/// Take the last status, leaving `Success` in its place.
pub fn take_last_status() -> MatlibStatus {
    LAST_STATUS.with(|s| s.replace(MatlibStatus::Success))
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_MESSAGE.with(|e| e.borrow_mut().take())
}
