//=========================================================================
// Platform Handle Mapper
//
// Converts winit's raw window/display handles into the opaque pointer
// pair a native `on_setup` callback carries.
//
// Responsibilities:
// - Extract the platform pointer from each supported handle kind
// - Reject handles that do not belong to the resolved platform
//
// Notes:
// This is the inverse of `NativeHandlePair::to_raw`: a pair mapped here
// converts back to the same raw handles.
//=========================================================================

use std::ffi::c_void;
use std::ptr::{self, NonNull};

use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};

use crate::core::error::BridgeError;
use crate::platform::Platform;

//=== Window Conversion ===================================================
//
// Maps a raw window handle to its opaque pointer. The handle kind must
// match what `platform` expects.
//

pub(crate) fn window_pointer(
    platform: Platform,
    raw: RawWindowHandle,
) -> Result<*mut c_void, BridgeError> {
    match (platform, raw) {
        (Platform::Win32, RawWindowHandle::Win32(handle)) => Ok(handle.hwnd.get() as *mut c_void),
        (Platform::Cocoa, RawWindowHandle::AppKit(handle)) => Ok(handle.ns_view.as_ptr()),
        (Platform::Wayland, RawWindowHandle::Wayland(handle)) => Ok(handle.surface.as_ptr()),
        (Platform::X11, RawWindowHandle::Xlib(handle)) => Ok(handle.window as usize as *mut c_void),
        (platform, other) => Err(BridgeError::SurfaceCreationFailed {
            platform,
            reason: format!("unexpected window handle {:?}", other),
        }),
    }
}

//=== Display Conversion ==================================================
//
// Backends without a display connection (win32, cocoa) map to null.
//

pub(crate) fn display_pointer(raw: RawDisplayHandle) -> *mut c_void {
    match raw {
        RawDisplayHandle::Xlib(handle) => handle.display.map_or(ptr::null_mut(), NonNull::as_ptr),
        RawDisplayHandle::Wayland(handle) => handle.display.as_ptr(),
        _ => ptr::null_mut(),
    }
}

//=== Full Conversion =====================================================

/// Pointer pair for a live window, in `on_setup` argument order.
pub(crate) fn native_pointers(
    platform: Platform,
    window: &(impl HasWindowHandle + HasDisplayHandle),
) -> Result<(*mut c_void, *mut c_void), BridgeError> {
    let unavailable = |e: raw_window_handle::HandleError| BridgeError::SurfaceCreationFailed {
        platform,
        reason: e.to_string(),
    };

    let window_handle = window.window_handle().map_err(unavailable)?.as_raw();
    let display_handle = window.display_handle().map_err(unavailable)?.as_raw();

    Ok((window_pointer(platform, window_handle)?, display_pointer(display_handle)))
}

//=========================================================================
// Unit Tests
//=========================================================================
