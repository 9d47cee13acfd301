//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Contract between the bridge and a native window library: the C-ABI
// callback table and the blocking spawn call.
//
// Native entry point, as exported by a prebuilt library:
// ```text
//  spawn_window(title, icon?, width, height,
//               on_setup, on_draw, on_resize)     blocks until close
//
//  on_setup(window, display, width, height)
//  on_draw()
//  on_resize(width, height)
// ```
//
// The callbacks carry no user pointer. They reach the session through the
// slot the table holds open on the spawning thread (see `trampoline`).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ffi::c_void;

//=== Internal Dependencies ===============================================

use super::trampoline::ActiveSession;
use crate::core::error::BridgeError;
use crate::platform::marshal::NativeString;
use crate::platform::Platform;

//=== Callback Signatures =================================================

/// `on_setup(window, display, width, height)`
pub type SetupCallback =
    unsafe extern "C" fn(window: *mut c_void, display: *mut c_void, width: u32, height: u32);

/// `on_draw()`
pub type DrawCallback = unsafe extern "C" fn();

/// `on_resize(width, height)`
pub type ResizeCallback = unsafe extern "C" fn(width: u32, height: u32);

/// `on_close()`, fired by hosts that can report the close before the
/// window is destroyed.
pub type CloseCallback = unsafe extern "C" fn();

//=== CallbackTable =======================================================

/// Trampolines registered with the native library before spawning.
///
/// While the table is alive its session is the active one on the creating
/// thread; dropping the table deactivates it. The table borrows the session
/// for `'s`, so it cannot outlive it.
///
/// # Single-flight contract
///
/// The native event loop must fire these callbacks on the thread that
/// spawned it, one at a time, never from inside another. A callback that
/// arrives while another is running is logged and dropped.
pub struct CallbackTable<'s> {
    on_setup: SetupCallback,
    on_draw: DrawCallback,
    on_resize: ResizeCallback,
    on_close: Option<CloseCallback>,
    _active: ActiveSession<'s>,
}

impl<'s> CallbackTable<'s> {
    pub(crate) fn new(
        active: ActiveSession<'s>,
        on_setup: SetupCallback,
        on_draw: DrawCallback,
        on_resize: ResizeCallback,
        on_close: Option<CloseCallback>,
    ) -> Self {
        Self { on_setup, on_draw, on_resize, on_close, _active: active }
    }

    /// Function pointers in native entry point order.
    pub fn raw_parts(&self) -> (SetupCallback, DrawCallback, ResizeCallback) {
        (self.on_setup, self.on_draw, self.on_resize)
    }

    //--- Dispatch ---------------------------------------------------------

    /// Fires the setup callback.
    ///
    /// # Safety
    ///
    /// Must run on the thread that built the table, with no other callback
    /// running. `window` and `display` must stay valid until the window
    /// closes.
    pub unsafe fn setup(&self, window: *mut c_void, display: *mut c_void, width: u32, height: u32) {
        (self.on_setup)(window, display, width, height);
    }

    /// Fires the draw callback.
    ///
    /// # Safety
    ///
    /// Must run on the thread that built the table.
    pub unsafe fn draw(&self) {
        (self.on_draw)();
    }

    /// Fires the resize callback.
    ///
    /// # Safety
    ///
    /// Must run on the thread that built the table.
    pub unsafe fn resize(&self, width: u32, height: u32) {
        (self.on_resize)(width, height);
    }

    /// Fires the close callback, if the table has one.
    ///
    /// # Safety
    ///
    /// Must run on the thread that built the table.
    pub unsafe fn close(&self) {
        if let Some(on_close) = self.on_close {
            on_close();
        }
    }
}

//=== SpawnRequest ========================================================

/// Everything the native entry point is invoked with.
pub struct SpawnRequest<'s> {
    pub platform: Platform,
    pub title: NativeString,
    pub icon: Option<NativeString>,
    pub width: u32,
    pub height: u32,
    pub callbacks: CallbackTable<'s>,
}

//=== NativeWindowLibrary =================================================

/// A native library that owns a window and its event loop.
pub trait NativeWindowLibrary {
    /// Opens the window and runs its event loop on the calling thread.
    ///
    /// Returns only after the window has closed. Callbacks in
    /// `request.callbacks` fire from inside this call; `on_setup` comes
    /// first.
    ///
    /// # Errors
    ///
    /// Only failures before the loop starts are reported (missing entry
    /// point, event loop creation). Once running, the native library owns
    /// the window lifecycle.
    fn spawn_window(&self, request: SpawnRequest<'_>) -> Result<(), BridgeError>;
}
