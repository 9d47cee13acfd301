//=========================================================================
// Winit Host
//
// In-process native window library: runs a winit event loop on the
// calling thread and drives the callback table from it.
//
// Architecture:
// ```text
//  Main Thread (blocked inside spawn_window):
//  ┌─────────────────────────────────────────┐
//  │  Winit Event Loop                       │
//  │   resumed          → create window      │
//  │                    → on_setup(handles)  │
//  │   Resized          → on_resize(w, h)    │
//  │   RedrawRequested  → on_draw()          │
//  │                    → request next frame │
//  │   CloseRequested   → on_close() + exit  │
//  └─────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Backend follows the platform tag**: on Linux the event loop is
//   forced onto Wayland or X11 to match the resolved platform
// - **Close before destroy**: `on_close` fires while the window still
//   exists, so the session drops its surface before the window goes away
// - **Main thread requirement**: winit mandates the main thread on macOS,
//   so this runs on whichever thread called `Bridge::spawn`
//
//=========================================================================

//=== External Crates =====================================================

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Icon, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use super::handle_mapper;
use super::Platform;
use crate::core::error::BridgeError;
use crate::core::platform_bridge::{NativeWindowLibrary, SpawnRequest};

//=== WinitHost ===========================================================

/// [`NativeWindowLibrary`] backed by a winit event loop.
///
/// winit allows one event loop per process, so a host can spawn a single
/// window over the program's lifetime.
#[derive(Debug, Default, Clone, Copy)]
pub struct WinitHost;

impl WinitHost {
    pub fn new() -> Self {
        Self
    }
}

impl NativeWindowLibrary for WinitHost {
    fn spawn_window(&self, request: SpawnRequest<'_>) -> Result<(), BridgeError> {
        debug!(target: "platform", "Starting winit event loop ({})", request.platform);

        let event_loop = build_event_loop(request.platform)?;
        let mut app = HostApp::new(request);

        event_loop.run_app(&mut app)?;

        info!(target: "platform", "Winit event loop exited");
        Ok(())
    }
}

//--- Event Loop Construction ---------------------------------------------

fn build_event_loop(platform: Platform) -> Result<EventLoop<()>, BridgeError> {
    let mut builder = EventLoop::builder();

    #[cfg(target_os = "linux")]
    {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        use winit::platform::x11::EventLoopBuilderExtX11;

        match platform {
            Platform::Wayland => {
                builder.with_wayland();
            }
            Platform::X11 => {
                builder.with_x11();
            }
            Platform::Win32 | Platform::Cocoa => {}
        }
    }
    #[cfg(not(target_os = "linux"))]
    let _ = platform;

    Ok(builder.build()?)
}

/// Decodes a PNG (or other enabled format) into a window icon.
///
/// Icon problems are cosmetic: they are logged and the window opens
/// without one.
fn load_icon(path: &str) -> Option<Icon> {
    let image = match image::open(path) {
        Ok(image) => image.into_rgba8(),
        Err(e) => {
            warn!(target: "platform", "Failed to load window icon {}: {}", path, e);
            return None;
        }
    };

    let (width, height) = image.dimensions();
    match Icon::from_rgba(image.into_raw(), width, height) {
        Ok(icon) => Some(icon),
        Err(e) => {
            warn!(target: "platform", "Invalid window icon {}: {}", path, e);
            None
        }
    }
}

//=== HostApp =============================================================

/// Winit application state for one spawned window.
struct HostApp<'s> {
    request: SpawnRequest<'s>,

    /// Created lazily in `resumed()`.
    window: Option<Window>,

    closed: bool,
}

impl<'s> HostApp<'s> {
    fn new(request: SpawnRequest<'s>) -> Self {
        Self { request, window: None, closed: false }
    }

    fn window_attributes(&self) -> WindowAttributes {
        let title = String::from_utf8_lossy(self.request.title.as_bytes()).into_owned();
        let icon = self
            .request
            .icon
            .as_ref()
            .and_then(|path| load_icon(&String::from_utf8_lossy(path.as_bytes())));

        WindowAttributes::default()
            .with_title(title)
            .with_inner_size(LogicalSize::new(self.request.width, self.request.height))
            .with_window_icon(icon)
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.fire_close();
        event_loop.exit();
    }

    /// Fires `on_close` once, while the window still exists.
    fn fire_close(&mut self) {
        if !self.closed {
            // Safety: winit delivers events one at a time on this thread.
            unsafe { self.request.callbacks.close() };
            self.closed = true;
        }
    }
}

// The loop can end without a close request (error, platform exit). The
// session must still drop its surface before `window` goes away.
impl Drop for HostApp<'_> {
    fn drop(&mut self) {
        if !self.closed {
            debug!(target: "platform", "Event loop ended without a close request");
        }
        self.fire_close();
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for HostApp<'_> {
    /// Creates the window and fires `on_setup` with its native handles.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        let window = match event_loop.create_window(self.window_attributes()) {
            Ok(window) => window,
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
                return;
            }
        };

        let (window_ptr, display_ptr) =
            match handle_mapper::native_pointers(self.request.platform, &window) {
                Ok(pointers) => pointers,
                Err(e) => {
                    error!(target: "platform", "Native handles unavailable: {}", e);
                    self.close(event_loop);
                    return;
                }
            };

        let size = window.inner_size();
        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            window.scale_factor()
        );

        // Safety: the window outlives the session's use of its handles;
        // `on_close` fires before it is dropped.
        unsafe { self.request.callbacks.setup(window_ptr, display_ptr, size.width, size.height) };

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.closed {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::Resized(size) => {
                trace!(target: "platform", "Resized: {}x{}", size.width, size.height);
                // Safety: winit delivers events one at a time on this thread.
                unsafe { self.request.callbacks.resize(size.width, size.height) };

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                // Safety: winit delivers events one at a time on this thread.
                unsafe { self.request.callbacks.draw() };

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                // Input, focus, etc. are not forwarded.
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
