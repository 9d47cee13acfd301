//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges native window libraries (winit host, prebuilt dylib) with the
// bridge session.
//
// This module defines the contract a native library must honor, so the
// library can be swapped without touching session logic.
//
// Components:
// - `interface`: callback table, spawn request, library trait (the contract)
// - `trampoline`: `extern "C"` entry points that forward into the session
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod interface;
pub(crate) mod trampoline;

//=== Public API ==========================================================

pub use interface::{
    CallbackTable, CloseCallback, DrawCallback, NativeWindowLibrary, ResizeCallback,
    SetupCallback, SpawnRequest,
};
