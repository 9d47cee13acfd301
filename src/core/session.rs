//=========================================================================
// Bridge Session
//
// Explicit state behind the native callback trampolines: platform tag,
// canvas context, user callbacks and current window size.
//
// State machine:
// ```text
//  Unstarted ──begin()──> AwaitingSetup ──on_setup()──> Ready
//                                                        │  ↑
//                                          on_resize()   ↓  │
//                                                      Resizing
//  any ──close()──> Closed
// ```
//
// Notes:
// The native event loop serializes every callback, so the session is
// driven through `&mut self` without locks. Failures inside a callback
// are logged here and never returned to native code.
//=========================================================================

//=== External Dependencies ===============================================

use std::ffi::c_void;

use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::callbacks::CallbackSet;
use crate::core::config::{PresentationFormat, SurfaceSize};
use crate::core::error::BridgeError;
use crate::core::handles::NativeHandlePair;
use crate::gpu::GpuBackend;
use crate::platform::Platform;

//=== SessionState ========================================================

/// Lifecycle position of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, native entry point not yet invoked.
    Unstarted,
    /// Native loop running, no setup callback seen yet (or setup failed).
    AwaitingSetup,
    /// Context built and user setup finished; draws are forwarded.
    Ready,
    /// Inside `on_resize`.
    Resizing,
    /// Window closed; every callback is a no-op.
    Closed,
}

//=== SessionStats ========================================================

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub contexts_built: u32,
    pub frames_drawn: u64,
    pub resizes: u32,
}

//=== BridgeSession =======================================================

/// Per-window state shared by the setup/draw/resize trampolines.
pub struct BridgeSession<G: GpuBackend> {
    platform: Platform,
    format: PresentationFormat,
    gpu: G,
    callbacks: CallbackSet<G::Device, G::Context>,
    size: SurfaceSize,
    handles: Option<NativeHandlePair>,
    context: Option<G::Context>,
    state: SessionState,
    stats: SessionStats,
}

impl<G: GpuBackend> BridgeSession<G> {
    //--- Construction -----------------------------------------------------

    pub fn new(
        platform: Platform,
        format: PresentationFormat,
        size: SurfaceSize,
        gpu: G,
        callbacks: CallbackSet<G::Device, G::Context>,
    ) -> Self {
        Self {
            platform,
            format,
            gpu,
            callbacks,
            size,
            handles: None,
            context: None,
            state: SessionState::Unstarted,
            stats: SessionStats::default(),
        }
    }

    /// Marks the native entry point as invoked.
    pub fn begin(&mut self) {
        if self.state == SessionState::Unstarted {
            debug!(target: "bridge::session", "Session started on {}", self.platform);
            self.state = SessionState::AwaitingSetup;
        }
    }

    //--- Callbacks --------------------------------------------------------

    /// Handles the native setup callback.
    ///
    /// Builds the first context from the handle pair and runs user setup.
    /// The session becomes `Ready` only after user setup returns, so no user
    /// draw can precede it. A failed build leaves the session stalled in
    /// `AwaitingSetup`.
    pub fn on_setup(&mut self, window: *mut c_void, display: *mut c_void, width: u32, height: u32) {
        if self.state != SessionState::AwaitingSetup {
            warn!(
                target: "bridge::session",
                "Ignoring setup callback in state {:?}",
                self.state
            );
            return;
        }

        self.size = SurfaceSize::new(width, height);
        let handles = self.handles.insert(NativeHandlePair::new(window, display));

        let context = match self.gpu.build_context(self.platform, handles, self.format, self.size) {
            Ok(context) => context,
            Err(e) => {
                error!(target: "bridge::session", "Setup aborted: {}", e);
                return;
            }
        };
        self.stats.contexts_built += 1;

        let context = self.context.insert(context);
        {
            // A panicking user setup still leaves a usable context behind.
            let _unwind = UnwindState::new(&mut self.state, SessionState::Ready);
            (self.callbacks.setup)(self.gpu.device(), context);
        }

        self.state = SessionState::Ready;
        info!(
            target: "bridge::session",
            "Canvas ready on {} ({}x{}, {})",
            self.platform, width, height, self.format
        );
    }

    /// Handles the native draw callback: user draw, then present.
    pub fn on_draw(&mut self) {
        if let Err(e) = self.draw_frame() {
            debug!(target: "bridge::session", "Draw skipped ({:?}): {}", self.state, e);
        }
    }

    /// Handles the native resize callback.
    ///
    /// Records the new size and runs user resize. Backends whose resize
    /// policy demands it get a freshly built context followed by one
    /// synthetic draw; all others keep drawing into the existing context.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if self.state == SessionState::Closed {
            debug!(target: "bridge::session", "Resize after close ignored");
            return;
        }

        let was_ready = self.state == SessionState::Ready;
        let previous = self.state;
        if was_ready {
            self.state = SessionState::Resizing;
        }

        self.size = SurfaceSize::new(width, height);
        self.stats.resizes += 1;
        trace!(target: "bridge::session", "Resized to {}x{}", width, height);

        {
            let _unwind = UnwindState::new(&mut self.state, previous);
            (self.callbacks.resize)(width, height);
        }

        if !was_ready {
            return;
        }

        if !self.platform.resize_policy().rebuild_surface_on_resize {
            self.state = SessionState::Ready;
            return;
        }

        let rebuilt = self.rebuild_context();
        self.state = SessionState::Ready;

        match rebuilt {
            Ok(()) => self.on_draw(),
            Err(e) => error!(target: "bridge::session", "Surface rebuild failed: {}", e),
        }
    }

    /// Ends the session: drops the context, then expires the handles.
    ///
    /// Safe to call more than once.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        self.context = None;
        if let Some(handles) = self.handles.as_mut() {
            handles.expire();
        }
        self.state = SessionState::Closed;

        info!(
            target: "bridge::session",
            "Session closed ({} frames, {} contexts, {} resizes)",
            self.stats.frames_drawn, self.stats.contexts_built, self.stats.resizes
        );
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Window size as last reported by the native library.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn context(&self) -> Option<&G::Context> {
        self.context.as_ref()
    }

    pub fn handles(&self) -> Option<&NativeHandlePair> {
        self.handles.as_ref()
    }

    //--- Internal Helpers -------------------------------------------------

    fn draw_frame(&mut self) -> Result<(), BridgeError> {
        if self.state != SessionState::Ready {
            return Err(BridgeError::UninitializedContext);
        }
        let context = self.context.as_mut().ok_or(BridgeError::UninitializedContext)?;

        (self.callbacks.draw)(self.gpu.device(), context);
        self.gpu.present(context);
        self.stats.frames_drawn += 1;
        Ok(())
    }

    fn rebuild_context(&mut self) -> Result<(), BridgeError> {
        self.context = None;

        let handles = self.handles.as_ref().ok_or(BridgeError::UninitializedContext)?;
        let context = self.gpu.build_context(self.platform, handles, self.format, self.size)?;

        self.context = Some(context);
        self.stats.contexts_built += 1;
        debug!(
            target: "bridge::session",
            "Rebuilt {} context at {}x{}",
            self.platform, self.size.width, self.size.height
        );
        Ok(())
    }
}

//=== UnwindState ==========================================================

/// Puts `state` back to `fallback` if a user callback unwinds past it.
///
/// Panics are caught at the trampoline, so without this the session would
/// be left in whatever intermediate state the callback ran under.
struct UnwindState<'a> {
    state: &'a mut SessionState,
    fallback: SessionState,
}

impl<'a> UnwindState<'a> {
    fn new(state: &'a mut SessionState, fallback: SessionState) -> Self {
        Self { state, fallback }
    }
}

impl Drop for UnwindState<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            warn!(
                target: "bridge::session",
                "User callback panicked in state {:?}, continuing as {:?}",
                self.state, self.fallback
            );
            *self.state = self.fallback;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
