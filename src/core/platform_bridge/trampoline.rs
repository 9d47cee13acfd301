//=========================================================================
// Callback Trampolines
//=========================================================================
//
// `extern "C"` entry points the native library calls back into.
//
// Architecture:
//   callback_table(&mut session)  → session becomes the active one
//   native loop → trampoline(args) → active session → BridgeSession::on_*()
//   table dropped                  → previous active session restored
//
// The native entry point passes no user pointer, so the session is kept in
// a thread-local slot for exactly as long as its table lives. The slot is
// tagged with the backend type; a trampoline for another backend finds
// nothing. While a trampoline runs the slot is emptied, so a callback fired
// from inside another one is dropped instead of aliasing the session.
//
// Each call runs under `catch_unwind`: a panic in user code is logged and
// swallowed, since unwinding into the native event loop would abort the
// process.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error};

//=== Internal Dependencies ===============================================

use super::interface::CallbackTable;
use crate::core::session::BridgeSession;
use crate::gpu::GpuBackend;

//=== Active Session Slot =================================================

#[derive(Clone, Copy)]
struct SlotEntry {
    backend: TypeId,
    session: *mut c_void,
}

thread_local! {
    static ACTIVE_SESSION: Cell<Option<SlotEntry>> = const { Cell::new(None) };
}

/// Keeps a session reachable from the trampolines on this thread.
///
/// Restores whatever was active before when dropped, so tables nest.
pub(crate) struct ActiveSession<'s> {
    previous: Option<SlotEntry>,
    _session: PhantomData<&'s mut ()>,
    _not_send: PhantomData<*mut ()>,
}

impl<'s> ActiveSession<'s> {
    fn install<G: GpuBackend>(session: &'s mut BridgeSession<G>) -> Self {
        let entry = SlotEntry {
            backend: TypeId::of::<G>(),
            session: (session as *mut BridgeSession<G>).cast::<c_void>(),
        };
        let previous = ACTIVE_SESSION.with(|slot| slot.replace(Some(entry)));
        if previous.is_some() {
            debug!(target: "bridge::session", "Nested session activated");
        }

        Self { previous, _session: PhantomData, _not_send: PhantomData }
    }
}

impl Drop for ActiveSession<'_> {
    fn drop(&mut self) {
        ACTIVE_SESSION.with(|slot| slot.set(self.previous));
    }
}

//=== Table Construction ==================================================

/// Builds the callback table for `session` and makes it the active one.
///
/// The table mutably borrows the session for as long as it lives.
pub(crate) fn callback_table<G: GpuBackend>(session: &mut BridgeSession<G>) -> CallbackTable<'_> {
    CallbackTable::new(
        ActiveSession::install(session),
        on_setup::<G>,
        on_draw::<G>,
        on_resize::<G>,
        Some(on_close::<G>),
    )
}

//=== Trampolines =========================================================

unsafe extern "C" fn on_setup<G: GpuBackend>(
    window: *mut c_void,
    display: *mut c_void,
    width: u32,
    height: u32,
) {
    dispatch::<G>("setup", |session| session.on_setup(window, display, width, height));
}

unsafe extern "C" fn on_draw<G: GpuBackend>() {
    dispatch::<G>("draw", |session| session.on_draw());
}

unsafe extern "C" fn on_resize<G: GpuBackend>(width: u32, height: u32) {
    dispatch::<G>("resize", |session| session.on_resize(width, height));
}

unsafe extern "C" fn on_close<G: GpuBackend>() {
    dispatch::<G>("close", |session| session.close());
}

//--- Internal Helpers ----------------------------------------------------

/// Runs `call` against the active session of backend `G`.
///
/// # Safety
///
/// The slot only ever holds sessions installed by [`ActiveSession`], whose
/// borrow keeps them alive until the entry is removed again.
unsafe fn dispatch<G: GpuBackend>(name: &str, call: impl FnOnce(&mut BridgeSession<G>)) {
    let Some(entry) = ACTIVE_SESSION.with(Cell::take) else {
        error!(
            target: "bridge::session",
            "Native {} callback fired with no active session",
            name
        );
        return;
    };

    if entry.backend != TypeId::of::<G>() {
        ACTIVE_SESSION.with(|slot| slot.set(Some(entry)));
        error!(
            target: "bridge::session",
            "Native {} callback registered for another backend",
            name
        );
        return;
    }

    let session = &mut *entry.session.cast::<BridgeSession<G>>();
    let result = panic::catch_unwind(AssertUnwindSafe(|| call(session)));
    ACTIVE_SESSION.with(|slot| slot.set(Some(entry)));

    if let Err(payload) = result {
        error!(
            target: "bridge::session",
            "Panic in {} callback contained: {}",
            name,
            panic_message(payload.as_ref())
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
