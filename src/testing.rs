//=========================================================================
// Test Support
//
// In-memory stand-ins for the GPU API and the native window library, so
// bridge behavior can be checked without a window or a GPU.
//
// - `MockGpu`: records every context build and present in a `Journal`
// - `ScriptedLibrary`: records spawn arguments, then replays native
//   callbacks through the real C-ABI callback table
//
//=========================================================================

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::rc::Rc;

use crate::core::callbacks::CallbackSet;
use crate::core::config::{PresentationFormat, SurfaceSize};
use crate::core::error::BridgeError;
use crate::core::handles::NativeHandlePair;
use crate::core::platform_bridge::{NativeWindowLibrary, SpawnRequest};
use crate::gpu::GpuBackend;
use crate::platform::Platform;

pub(crate) fn fake_handle(addr: usize) -> *mut c_void {
    addr as *mut c_void
}

//=== Journal =============================================================

/// One observable step of a session, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Entry {
    Build { context: u32, platform: Platform, format: PresentationFormat, size: SurfaceSize },
    Setup { context: u32 },
    Draw { context: u32, size: SurfaceSize },
    Present { context: u32 },
    Resize { width: u32, height: u32 },
}

/// Shared, append-only record of session steps.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<Entry>>>);

impl Journal {
    pub(crate) fn push(&self, entry: Entry) {
        self.0.borrow_mut().push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<Entry> {
        self.0.borrow().clone()
    }

    pub(crate) fn count(&self, predicate: impl Fn(&Entry) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| predicate(e)).count()
    }

    pub(crate) fn builds(&self) -> usize {
        self.count(|e| matches!(e, Entry::Build { .. }))
    }

    pub(crate) fn draws(&self) -> usize {
        self.count(|e| matches!(e, Entry::Draw { .. }))
    }

    pub(crate) fn last_draw(&self) -> Option<Entry> {
        self.0.borrow().iter().rev().find(|e| matches!(e, Entry::Draw { .. })).cloned()
    }
}

//=== MockGpu =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MockDevice;

/// Context handed to callbacks; remembers the size it was built with.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct MockContext {
    pub(crate) id: u32,
    pub(crate) size: SurfaceSize,
}

/// [`GpuBackend`] that journals builds and presents.
///
/// Clones share state, so a test can keep one while the session owns
/// another.
#[derive(Clone)]
pub(crate) struct MockGpu {
    journal: Journal,
    next_id: Rc<Cell<u32>>,
    fail: Rc<Cell<bool>>,
    windows: Rc<RefCell<Vec<*mut c_void>>>,
}

impl MockGpu {
    pub(crate) fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            next_id: Rc::new(Cell::new(1)),
            fail: Rc::new(Cell::new(false)),
            windows: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Makes every later build fail with `SurfaceCreationFailed`.
    pub(crate) fn fail_builds(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Window handle used by each successful build.
    pub(crate) fn built_windows(&self) -> Vec<*mut c_void> {
        self.windows.borrow().clone()
    }
}

impl GpuBackend for MockGpu {
    type Device = MockDevice;
    type Context = MockContext;

    fn device(&self) -> &MockDevice {
        &MockDevice
    }

    fn build_context(
        &self,
        platform: Platform,
        handles: &NativeHandlePair,
        format: PresentationFormat,
        size: SurfaceSize,
    ) -> Result<MockContext, BridgeError> {
        let (_, _) = handles.to_raw(platform)?;

        if self.fail.get() {
            return Err(BridgeError::SurfaceCreationFailed {
                platform,
                reason: "mock failure".to_string(),
            });
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.windows.borrow_mut().push(handles.window()?);
        self.journal.push(Entry::Build { context: id, platform, format, size });

        Ok(MockContext { id, size })
    }

    fn present(&self, context: &mut MockContext) {
        self.journal.push(Entry::Present { context: context.id });
    }
}

/// Callbacks that journal every invocation.
pub(crate) fn recording_callbacks(journal: &Journal) -> CallbackSet<MockDevice, MockContext> {
    let setup = journal.clone();
    let draw = journal.clone();
    let resize = journal.clone();

    CallbackSet::new()
        .with_setup(move |_, context: &mut MockContext| {
            setup.push(Entry::Setup { context: context.id });
        })
        .with_draw(move |_, context: &mut MockContext| {
            draw.push(Entry::Draw { context: context.id, size: context.size });
        })
        .with_resize(move |width, height| {
            resize.push(Entry::Resize { width, height });
        })
}

//=== ScriptedLibrary =====================================================

/// Event a [`ScriptedLibrary`] fires through the callback table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NativeEvent {
    Setup { window: usize, display: usize, width: u32, height: u32 },
    Draw,
    Resize { width: u32, height: u32 },
    Close,
}

/// Arguments the native entry point received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SpawnRecord {
    pub(crate) platform: Platform,
    pub(crate) title: Vec<u8>,
    pub(crate) icon: Option<Vec<u8>>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) callbacks_non_null: bool,
}

/// [`NativeWindowLibrary`] that replays a fixed event script.
#[derive(Default)]
pub(crate) struct ScriptedLibrary {
    script: Vec<NativeEvent>,
    spawned: RefCell<Vec<SpawnRecord>>,
}

impl ScriptedLibrary {
    pub(crate) fn new(script: Vec<NativeEvent>) -> Self {
        Self { script, spawned: RefCell::new(Vec::new()) }
    }

    pub(crate) fn spawns(&self) -> Vec<SpawnRecord> {
        self.spawned.borrow().clone()
    }
}

impl NativeWindowLibrary for ScriptedLibrary {
    fn spawn_window(&self, request: SpawnRequest<'_>) -> Result<(), BridgeError> {
        let (on_setup, on_draw, on_resize) = request.callbacks.raw_parts();

        self.spawned.borrow_mut().push(SpawnRecord {
            platform: request.platform,
            title: request.title.as_bytes_with_nul().to_vec(),
            icon: request.icon.as_ref().map(|icon| icon.as_bytes_with_nul().to_vec()),
            width: request.width,
            height: request.height,
            callbacks_non_null: on_setup as usize != 0
                && on_draw as usize != 0
                && on_resize as usize != 0,
        });

        // Safety: events are fired one at a time, never from inside another
        // callback, matching the native single-flight contract.
        for event in &self.script {
            unsafe {
                match *event {
                    NativeEvent::Setup { window, display, width, height } => request.callbacks.setup(
                        fake_handle(window),
                        fake_handle(display),
                        width,
                        height,
                    ),
                    NativeEvent::Draw => request.callbacks.draw(),
                    NativeEvent::Resize { width, height } => request.callbacks.resize(width, height),
                    NativeEvent::Close => request.callbacks.close(),
                }
            }
        }

        Ok(())
    }
}
