//=========================================================================
// Canvas Bridge
//
// Main entry point: describes one window, resolves its platform, acquires
// the GPU and hands control to a native window library.
//
// Architecture:
// ```text
//   BridgeBuilder ──build()──> Bridge ──spawn(&library)──> [native loop]
//        │                       │
//        ├─ with_title()         ├─ acquires adapter + device (async)
//        ├─ with_size()          ├─ marshals title / icon
//        ├─ on_setup()           ├─ registers trampolines
//        ├─ on_draw()            └─ blocks until the window closes
//        └─ on_resize()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::callbacks::CallbackSet;
use crate::core::config::{PresentationFormat, WindowConfig};
use crate::core::error::BridgeError;
use crate::core::platform_bridge::trampoline::callback_table;
use crate::core::platform_bridge::{NativeWindowLibrary, SpawnRequest};
use crate::core::session::{BridgeSession, SessionStats};
use crate::gpu::{GpuBackend, WgpuBackend};
use crate::platform::marshal::NativeString;
use crate::platform::winit_host::WinitHost;
use crate::platform::Platform;

//=== BridgeBuilder =======================================================

/// Builder for configuring and constructing a [`Bridge`].
///
/// # Default Values
///
/// - **Title**: `"canvas"`
/// - **Size**: 512 x 512
/// - **Presentation format**: `bgra8unorm`
/// - **Callbacks**: no-ops
///
/// # Examples
///
/// ```no_run
/// use canvas_bridge::prelude::*;
///
/// BridgeBuilder::<WgpuBackend>::new()
///     .with_title("Clear")
///     .with_size(800, 600)
///     .on_draw(|gpu, canvas| {
///         let Ok(frame) = canvas.current_texture() else { return };
///         let view = frame.texture.create_view(&Default::default());
///         let mut encoder = gpu.device.create_command_encoder(&Default::default());
///         encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
///             color_attachments: &[Some(wgpu::RenderPassColorAttachment {
///                 view: &view,
///                 depth_slice: None,
///                 resolve_target: None,
///                 ops: wgpu::Operations {
///                     load: wgpu::LoadOp::Clear(wgpu::Color::BLUE),
///                     store: wgpu::StoreOp::Store,
///                 },
///             })],
///             ..Default::default()
///         });
///         gpu.queue.submit([encoder.finish()]);
///     })
///     .build()?
///     .run()?;
/// # Ok::<(), canvas_bridge::BridgeError>(())
/// ```
pub struct BridgeBuilder<G: GpuBackend> {
    config: WindowConfig,
    callbacks: CallbackSet<G::Device, G::Context>,
}

impl<G: GpuBackend> BridgeBuilder<G> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self { config: WindowConfig::default(), callbacks: CallbackSet::new() }
    }

    //--- Window Options ---------------------------------------------------

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Sets the window icon (PNG).
    pub fn with_icon(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.icon_path = Some(path.into());
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// Default: 512 x 512
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0, "Window width must be positive");
        assert!(height > 0, "Window height must be positive");
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Default: `bgra8unorm`
    pub fn with_presentation_format(mut self, format: PresentationFormat) -> Self {
        self.config.presentation_format = format;
        self
    }

    /// On Linux, use X11 instead of Wayland.
    pub fn with_force_alt_backend(mut self, force: bool) -> Self {
        self.config.force_alt_backend = force;
        self
    }

    //--- Callbacks --------------------------------------------------------

    /// Runs once with the device and the first canvas context.
    pub fn on_setup<F>(mut self, setup: F) -> Self
    where
        F: FnMut(&G::Device, &mut G::Context) + 'static,
    {
        self.callbacks = self.callbacks.with_setup(setup);
        self
    }

    /// Runs for every frame; whatever it renders is presented afterwards.
    pub fn on_draw<F>(mut self, draw: F) -> Self
    where
        F: FnMut(&G::Device, &mut G::Context) + 'static,
    {
        self.callbacks = self.callbacks.with_draw(draw);
        self
    }

    /// Runs with the new size whenever the window is resized.
    pub fn on_resize<F>(mut self, resize: F) -> Self
    where
        F: FnMut(u32, u32) + 'static,
    {
        self.callbacks = self.callbacks.with_resize(resize);
        self
    }

    //--- Construction -----------------------------------------------------

    /// Resolves the platform for the running OS and builds the bridge.
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnsupportedPlatform`] if the OS has no backend.
    pub fn build(self) -> Result<Bridge<G>, BridgeError> {
        self.build_for_os(std::env::consts::OS)
    }

    /// Like [`build`](Self::build), for an explicit OS identifier.
    ///
    /// # Errors
    ///
    /// [`BridgeError::UnsupportedPlatform`] if `os` has no backend.
    pub fn build_for_os(self, os: &str) -> Result<Bridge<G>, BridgeError> {
        let platform = Platform::resolve(os, self.config.force_alt_backend)?;

        info!(
            target: "bridge",
            "Building bridge for {:?} on {} ({}x{}, {})",
            self.config.title,
            platform,
            self.config.width,
            self.config.height,
            self.config.presentation_format
        );

        Ok(Bridge { config: self.config, platform, callbacks: self.callbacks })
    }
}

impl<G: GpuBackend> Default for BridgeBuilder<G> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Bridge ==============================================================

/// A configured window ready to be spawned.
///
/// Create via [`BridgeBuilder`]. Spawning consumes the bridge; it returns
/// once the window has closed.
pub struct Bridge<G: GpuBackend> {
    config: WindowConfig,
    platform: Platform,
    callbacks: CallbackSet<G::Device, G::Context>,
}

impl<G: GpuBackend> Bridge<G> {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    //--- Execution --------------------------------------------------------

    /// Runs the window on `library` with an already acquired `gpu`.
    ///
    /// # Lifecycle
    ///
    /// 1. Marshals title and icon path into native strings
    /// 2. Creates the session and registers its trampolines
    /// 3. Invokes the native entry point (blocks here)
    /// 4. On return: closes the session and reports its stats
    ///
    /// # Errors
    ///
    /// Whatever the library reports before its event loop starts.
    pub fn spawn_with<L>(self, gpu: G, library: &L) -> Result<SessionStats, BridgeError>
    where
        L: NativeWindowLibrary + ?Sized,
    {
        //--- 1. Marshal strings -------------------------------------------
        let title = NativeString::new(&self.config.title);
        let icon = self.config.icon_path.as_deref().map(NativeString::from);

        //--- 2. Build the session -----------------------------------------
        let mut session = BridgeSession::new(
            self.platform,
            self.config.presentation_format,
            self.config.size(),
            gpu,
            self.callbacks,
        );
        session.begin();

        //--- 3. Hand control to the native library -------------------------
        info!(target: "bridge", "Spawning native window on {}", self.platform);

        let result = library.spawn_window(SpawnRequest {
            platform: self.platform,
            title,
            icon,
            width: self.config.width,
            height: self.config.height,
            callbacks: callback_table(&mut session),
        });

        //--- 4. Cleanup ---------------------------------------------------
        session.close();

        match result {
            Ok(()) => {
                info!(target: "bridge", "Window closed");
                Ok(session.stats())
            }
            Err(e) => {
                error!(target: "bridge", "Native window library failed: {}", e);
                Err(e)
            }
        }
    }
}

impl Bridge<WgpuBackend> {
    /// Acquires a wgpu adapter and device, then spawns on `library`.
    ///
    /// Completes once the window has closed.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::AdapterUnavailable`] / [`BridgeError::DeviceUnavailable`]
    ///   before the native library is touched
    /// - Whatever [`spawn_with`](Self::spawn_with) reports
    pub async fn spawn<L>(self, library: &L) -> Result<SessionStats, BridgeError>
    where
        L: NativeWindowLibrary + ?Sized,
    {
        let gpu = WgpuBackend::acquire().await?;
        self.spawn_with(gpu, library)
    }

    /// Spawns on a [`WinitHost`] and blocks until the window closes.
    ///
    /// # Errors
    ///
    /// See [`spawn`](Self::spawn).
    pub fn run(self) -> Result<SessionStats, BridgeError> {
        pollster::block_on(self.spawn(&WinitHost::new()))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SurfaceSize;
    use crate::testing::{
        recording_callbacks, Entry, Journal, MockContext, MockDevice, MockGpu, NativeEvent,
        ScriptedLibrary,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_builder(journal: &Journal) -> BridgeBuilder<MockGpu> {
        let callbacks = recording_callbacks(journal);
        BridgeBuilder {
            config: WindowConfig::default(),
            callbacks,
        }
    }

    fn setup_event(width: u32, height: u32) -> NativeEvent {
        NativeEvent::Setup { window: 0xA1, display: 0xD1, width, height }
    }

    //=====================================================================
    // BridgeBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = BridgeBuilder::<MockGpu>::new();
        assert_eq!(builder.config, WindowConfig::default());
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let bridge = BridgeBuilder::<MockGpu>::new()
            .with_title("Editor")
            .with_icon("icon.png")
            .with_size(1024, 768)
            .with_presentation_format(PresentationFormat::Rgba8UnormSrgb)
            .with_force_alt_backend(true)
            .build_for_os("linux")
            .unwrap();

        assert_eq!(bridge.platform(), Platform::X11);
        assert_eq!(bridge.config().title, "Editor");
        assert_eq!(bridge.config().icon_path, Some(PathBuf::from("icon.png")));
        assert_eq!(bridge.config().size(), SurfaceSize::new(1024, 768));
        assert_eq!(bridge.config().presentation_format, PresentationFormat::Rgba8UnormSrgb);
    }

    #[test]
    #[should_panic(expected = "Window width must be positive")]
    fn builder_with_size_panics_on_zero_width() {
        BridgeBuilder::<MockGpu>::new().with_size(0, 600);
    }

    #[test]
    #[should_panic(expected = "Window height must be positive")]
    fn builder_with_size_panics_on_zero_height() {
        BridgeBuilder::<MockGpu>::new().with_size(800, 0);
    }

    #[test]
    fn unsupported_os_fails_before_spawn() {
        let result = BridgeBuilder::<MockGpu>::new().build_for_os("plan9");
        assert!(matches!(result, Err(BridgeError::UnsupportedPlatform { .. })));
    }

    //=====================================================================
    // Spawn Tests
    //=====================================================================

    #[test]
    fn linux_spawn_receives_marshalled_arguments() {
        let journal = Journal::default();
        let bridge = recording_builder(&journal)
            .with_title("T")
            .with_size(800, 600)
            .build_for_os("linux")
            .unwrap();
        assert_eq!(bridge.platform(), Platform::Wayland);

        let library = ScriptedLibrary::default();
        bridge.spawn_with(MockGpu::new(&journal), &library).unwrap();

        let spawns = library.spawns();
        assert_eq!(spawns.len(), 1);
        let spawn = &spawns[0];
        assert_eq!(spawn.platform, Platform::Wayland);
        assert_eq!(spawn.title, b"T\0".to_vec());
        assert_eq!(spawn.icon, None);
        assert_eq!((spawn.width, spawn.height), (800, 600));
        assert!(spawn.callbacks_non_null);
    }

    #[test]
    fn icon_path_is_marshalled() {
        let journal = Journal::default();
        let bridge = recording_builder(&journal)
            .with_icon("assets/icon.png")
            .build_for_os("windows")
            .unwrap();

        let library = ScriptedLibrary::default();
        bridge.spawn_with(MockGpu::new(&journal), &library).unwrap();

        let expected = NativeString::from(PathBuf::from("assets/icon.png").as_path());
        assert_eq!(library.spawns()[0].icon, Some(expected.as_bytes_with_nul().to_vec()));
    }

    #[test]
    fn default_config_reaches_native_call_and_context() {
        let journal = Journal::default();
        let bridge = recording_builder(&journal).build_for_os("windows").unwrap();

        let library = ScriptedLibrary::new(vec![setup_event(512, 512)]);
        bridge.spawn_with(MockGpu::new(&journal), &library).unwrap();

        let spawn = &library.spawns()[0];
        assert_eq!((spawn.width, spawn.height), (512, 512));
        assert_eq!(spawn.title, b"canvas\0".to_vec());
        assert_eq!(
            journal.entries()[0],
            Entry::Build {
                context: 1,
                platform: Platform::Win32,
                format: PresentationFormat::Bgra8Unorm,
                size: SurfaceSize::new(512, 512),
            }
        );
    }

    #[test]
    fn win32_resize_reuses_setup_context() {
        let journal = Journal::default();
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&sizes);

        let bridge = recording_builder(&journal)
            .with_size(800, 600)
            .on_resize(move |w, h| sink.borrow_mut().push((w, h)))
            .build_for_os("windows")
            .unwrap();

        let library = ScriptedLibrary::new(vec![
            setup_event(800, 600),
            NativeEvent::Resize { width: 400, height: 300 },
            NativeEvent::Draw,
        ]);
        let stats = bridge.spawn_with(MockGpu::new(&journal), &library).unwrap();

        assert_eq!(*sizes.borrow(), vec![(400, 300)]);
        assert_eq!(stats.contexts_built, 1);
        assert_eq!(journal.builds(), 1);
        assert_eq!(
            journal.last_draw(),
            Some(Entry::Draw { context: 1, size: SurfaceSize::new(800, 600) })
        );
    }

    #[test]
    fn cocoa_resize_rebuilds_and_draws_twice() {
        let journal = Journal::default();
        let bridge = recording_builder(&journal)
            .with_size(800, 600)
            .build_for_os("macos")
            .unwrap();

        let library = ScriptedLibrary::new(vec![
            setup_event(800, 600),
            NativeEvent::Resize { width: 400, height: 300 },
            NativeEvent::Draw,
        ]);
        let stats = bridge.spawn_with(MockGpu::new(&journal), &library).unwrap();

        assert_eq!(stats.contexts_built, 2);
        assert_eq!(stats.frames_drawn, 2);
        assert_eq!(journal.builds(), 2);
        assert_eq!(journal.draws(), 2);
        assert_eq!(
            journal.last_draw(),
            Some(Entry::Draw { context: 2, size: SurfaceSize::new(400, 300) })
        );
    }

    #[test]
    fn draw_never_precedes_setup_end_to_end() {
        let journal = Journal::default();
        let bridge = recording_builder(&journal).build_for_os("linux").unwrap();

        let library = ScriptedLibrary::new(vec![
            NativeEvent::Draw,
            NativeEvent::Draw,
            setup_event(512, 512),
            NativeEvent::Draw,
        ]);
        let stats = bridge.spawn_with(MockGpu::new(&journal), &library).unwrap();

        assert_eq!(stats.frames_drawn, 1);
        let entries = journal.entries();
        assert!(matches!(entries[0], Entry::Build { .. }));
        assert!(matches!(entries[1], Entry::Setup { .. }));
        assert!(matches!(entries[2], Entry::Draw { .. }));
    }

    #[test]
    fn native_close_ends_session_before_return() {
        let journal = Journal::default();
        let bridge = recording_builder(&journal).build_for_os("linux").unwrap();

        let library = ScriptedLibrary::new(vec![
            setup_event(512, 512),
            NativeEvent::Close,
            NativeEvent::Draw,
        ]);
        let stats = bridge.spawn_with(MockGpu::new(&journal), &library).unwrap();

        assert_eq!(stats.frames_drawn, 0);
        assert_eq!(journal.draws(), 0);
    }

    #[test]
    fn user_callbacks_receive_device_and_context() {
        let journal = Journal::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let setup_sink = Rc::clone(&seen);
        let draw_sink = Rc::clone(&seen);

        let bridge = BridgeBuilder::<MockGpu>::new()
            .on_setup(move |device: &MockDevice, context: &mut MockContext| {
                setup_sink.borrow_mut().push(("setup", *device, context.id));
            })
            .on_draw(move |device: &MockDevice, context: &mut MockContext| {
                draw_sink.borrow_mut().push(("draw", *device, context.id));
            })
            .build_for_os("linux")
            .unwrap();

        let library = ScriptedLibrary::new(vec![setup_event(512, 512), NativeEvent::Draw]);
        bridge.spawn_with(MockGpu::new(&journal), &library).unwrap();

        assert_eq!(*seen.borrow(), vec![("setup", MockDevice, 1), ("draw", MockDevice, 1)]);
    }
}
