//=========================================================================
// Prebuilt Native Library
//
// Loads a native window library shipped as a dynamic library and calls
// its exported `spawn_window` entry point.
//
// Architecture:
// ```text
//  LibraryLocator::locate_from_env()
//   ├─ CANVAS_BRIDGE_LOCAL set → Local(<local_dir>/<file name>)
//   └─ otherwise               → Remote(<release>/<version>/<file name>)
//   ↓
//  DylibLibrary::open(&source)     (remote sources must be fetched first)
//   ↓
//  spawn_window(title, icon?, w, h, setup, draw, resize)
// ```
//
// Notes:
// Fetching a remote build is left to packaging; this module only names
// where it lives.
//=========================================================================

//=== External Dependencies ===============================================

use std::ffi::c_char;
use std::path::{Path, PathBuf};
use std::ptr;

use libloading::{Library, Symbol};
use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::error::BridgeError;
use crate::core::platform_bridge::{
    DrawCallback, NativeWindowLibrary, ResizeCallback, SetupCallback, SpawnRequest,
};

//=== Constants ===========================================================

/// Exported symbol every prebuilt library must provide.
pub const ENTRY_POINT: &[u8] = b"spawn_window\0";

/// Environment flag selecting a local build over the released binary.
pub const LOCAL_OVERRIDE_ENV: &str = "CANVAS_BRIDGE_LOCAL";

type SpawnWindowFn = unsafe extern "C" fn(
    title: *const c_char,
    icon: *const c_char,
    width: u32,
    height: u32,
    on_setup: SetupCallback,
    on_draw: DrawCallback,
    on_resize: ResizeCallback,
);

//=== LibrarySource =======================================================

/// Where a prebuilt library can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    /// A build on the local filesystem.
    Local(PathBuf),
    /// A release artifact URL.
    Remote(String),
}

//=== LibraryLocator ======================================================

/// Resolves the per-platform file name and location of a prebuilt library.
#[derive(Debug, Clone)]
pub struct LibraryLocator {
    name: String,
    version: String,
    release_base: String,
    local_dir: PathBuf,
}

impl LibraryLocator {
    /// Locator for library `name` at release `version`.
    ///
    /// Local builds default to `target/release`.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        release_base: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            release_base: release_base.into(),
            local_dir: PathBuf::from("target").join("release"),
        }
    }

    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = dir.into();
        self
    }

    /// Platform file name (`libname.so`, `name.dll`, `libname.dylib`).
    pub fn file_name(&self) -> String {
        libloading::library_filename(&self.name).to_string_lossy().into_owned()
    }

    /// Picks the local build when `local_override` is set, else the release.
    pub fn locate(&self, local_override: bool) -> LibrarySource {
        if local_override {
            LibrarySource::Local(self.local_dir.join(self.file_name()))
        } else {
            LibrarySource::Remote(format!(
                "{}/{}/{}",
                self.release_base.trim_end_matches('/'),
                self.version,
                self.file_name()
            ))
        }
    }

    /// [`locate`](Self::locate) driven by [`LOCAL_OVERRIDE_ENV`].
    pub fn locate_from_env(&self) -> LibrarySource {
        let local = std::env::var_os(LOCAL_OVERRIDE_ENV).is_some_and(|v| !v.is_empty());
        debug!(target: "platform", "{} set: {}", LOCAL_OVERRIDE_ENV, local);
        self.locate(local)
    }
}

//=== DylibLibrary ========================================================

/// [`NativeWindowLibrary`] backed by a loaded dynamic library.
pub struct DylibLibrary {
    library: Library,
    path: PathBuf,
}

impl DylibLibrary {
    /// Opens the library at `source`.
    ///
    /// # Errors
    ///
    /// [`BridgeError::LibraryUnavailable`] for remote sources (not fetched
    /// here) and for anything [`open_path`](Self::open_path) rejects.
    pub fn open(source: &LibrarySource) -> Result<Self, BridgeError> {
        match source {
            LibrarySource::Local(path) => Self::open_path(path),
            LibrarySource::Remote(url) => Err(BridgeError::LibraryUnavailable(format!(
                "{} must be downloaded before it can be opened",
                url
            ))),
        }
    }

    /// Loads the library at `path` and checks it exports the entry point.
    ///
    /// # Errors
    ///
    /// [`BridgeError::LibraryUnavailable`] if loading fails or the symbol
    /// is missing.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        debug!(target: "platform", "Loading native window library from {:?}", path);

        // Safety: loading runs the library's initializers; the library is
        // trusted to be a native window library build.
        let library = unsafe { Library::new(path) }.map_err(|e| {
            BridgeError::LibraryUnavailable(format!("failed to load {:?}: {}", path, e))
        })?;

        {
            let _entry: Symbol<SpawnWindowFn> =
                unsafe { library.get(ENTRY_POINT) }.map_err(|e| missing_entry_point(path, e))?;
        }

        info!(target: "platform", "Native window library loaded: {:?}", path);
        Ok(Self { library, path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NativeWindowLibrary for DylibLibrary {
    fn spawn_window(&self, request: SpawnRequest<'_>) -> Result<(), BridgeError> {
        // Safety: the symbol's signature is the documented entry point ABI.
        let spawn: SpawnWindowFn = *unsafe { self.library.get::<SpawnWindowFn>(ENTRY_POINT) }
            .map_err(|e| missing_entry_point(&self.path, e))?;

        info!(
            target: "platform",
            "Spawning native window {:?} ({}x{}, {})",
            request.title, request.width, request.height, request.platform
        );

        // Safety: `self.library` stays loaded for the whole call.
        unsafe { call_entry_point(spawn, &request) };

        Ok(())
    }
}

/// Invokes `spawn` with the request's marshalled arguments.
///
/// # Safety
///
/// `spawn` must follow the entry point ABI and return only once the window
/// closed; the title and icon buffers and the callback table's session are
/// borrowed for exactly that long.
unsafe fn call_entry_point(spawn: SpawnWindowFn, request: &SpawnRequest<'_>) {
    let (on_setup, on_draw, on_resize) = request.callbacks.raw_parts();
    let icon = request.icon.as_ref().map_or(ptr::null(), |icon| icon.as_ptr());

    spawn(request.title.as_ptr(), icon, request.width, request.height, on_setup, on_draw, on_resize);
}

fn missing_entry_point(path: &Path, e: libloading::Error) -> BridgeError {
    BridgeError::LibraryUnavailable(format!("{:?} lacks spawn_window: {}", path, e))
}

//=========================================================================
// Unit Tests
//=========================================================================
