//=========================================================================
// Native Handle Pair
//
// Non-owning view of the window/display handles a native library passes
// to the setup callback.
//
// Notes:
// The native library owns both handles. They are valid from `on_setup`
// until the window closes; the session expires the pair at close and
// every accessor fails loudly afterwards.
//=========================================================================

use std::ffi::{c_ulong, c_void};
use std::num::NonZeroIsize;
use std::ptr::{self, NonNull};

use log::error;
use raw_window_handle::{
    AppKitDisplayHandle, AppKitWindowHandle, RawDisplayHandle, RawWindowHandle,
    WaylandDisplayHandle, WaylandWindowHandle, Win32WindowHandle, WindowsDisplayHandle,
    XlibDisplayHandle, XlibWindowHandle,
};

use crate::core::error::BridgeError;
use crate::platform::Platform;

//=== NativeHandlePair ====================================================

/// Opaque window + display handles borrowed from the native library.
///
/// What each pointer means depends on the [`Platform`]:
///
/// | platform | window            | display       |
/// |----------|-------------------|---------------|
/// | win32    | `HWND`            | unused        |
/// | cocoa    | `NSView*`         | unused        |
/// | wayland  | `wl_surface*`     | `wl_display*` |
/// | x11      | `Window` id       | `Display*`    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeHandlePair {
    window: *mut c_void,
    display: *mut c_void,
    live: bool,
}

impl NativeHandlePair {
    pub fn new(window: *mut c_void, display: *mut c_void) -> Self {
        Self { window, display, live: true }
    }

    //--- Validity ---------------------------------------------------------

    /// Whether the owning window is still open.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Marks the window as closed. Later accessor calls fail.
    pub fn expire(&mut self) {
        self.live = false;
    }

    //--- Accessors --------------------------------------------------------

    /// Native window handle.
    ///
    /// # Errors
    ///
    /// [`BridgeError::HandleExpired`] once the window has closed.
    pub fn window(&self) -> Result<*mut c_void, BridgeError> {
        self.checked(self.window)
    }

    /// Native display handle (null on backends without one).
    ///
    /// # Errors
    ///
    /// [`BridgeError::HandleExpired`] once the window has closed.
    pub fn display(&self) -> Result<*mut c_void, BridgeError> {
        self.checked(self.display)
    }

    fn checked(&self, handle: *mut c_void) -> Result<*mut c_void, BridgeError> {
        if self.live {
            Ok(handle)
        } else {
            error!(target: "bridge::session", "Native handle accessed after window close");
            Err(BridgeError::HandleExpired)
        }
    }

    //--- Conversion -------------------------------------------------------

    /// Wraps the pointers in the raw-window-handle types for `platform`.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::HandleExpired`] if the pair was expired
    /// - [`BridgeError::SurfaceCreationFailed`] if a handle the platform
    ///   requires is null
    pub fn to_raw(
        &self,
        platform: Platform,
    ) -> Result<(RawWindowHandle, RawDisplayHandle), BridgeError> {
        let window = self.window()?;
        let display = self.display()?;

        let missing = |what: &str| BridgeError::SurfaceCreationFailed {
            platform,
            reason: format!("null {} handle", what),
        };

        match platform {
            Platform::Win32 => {
                let hwnd = NonZeroIsize::new(window as isize).ok_or_else(|| missing("HWND"))?;
                Ok((
                    RawWindowHandle::Win32(Win32WindowHandle::new(hwnd)),
                    RawDisplayHandle::Windows(WindowsDisplayHandle::new()),
                ))
            }
            Platform::Cocoa => {
                let ns_view = NonNull::new(window).ok_or_else(|| missing("NSView"))?;
                Ok((
                    RawWindowHandle::AppKit(AppKitWindowHandle::new(ns_view)),
                    RawDisplayHandle::AppKit(AppKitDisplayHandle::new()),
                ))
            }
            Platform::Wayland => {
                let surface = NonNull::new(window).ok_or_else(|| missing("wl_surface"))?;
                let display = NonNull::new(display).ok_or_else(|| missing("wl_display"))?;
                Ok((
                    RawWindowHandle::Wayland(WaylandWindowHandle::new(surface)),
                    RawDisplayHandle::Wayland(WaylandDisplayHandle::new(display)),
                ))
            }
            Platform::X11 => {
                if window.is_null() {
                    return Err(missing("X11 window"));
                }
                let window_id = window as usize as c_ulong;
                Ok((
                    RawWindowHandle::Xlib(XlibWindowHandle::new(window_id)),
                    RawDisplayHandle::Xlib(XlibDisplayHandle::new(NonNull::new(display), 0)),
                ))
            }
        }
    }
}

impl Default for NativeHandlePair {
    /// An already-expired pair of null handles.
    fn default() -> Self {
        Self { window: ptr::null_mut(), display: ptr::null_mut(), live: false }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
