//=========================================================================
// Canvas Bridge Library Root
//
// Connects a native window event loop to a wgpu canvas: the native side
// owns the window and fires callbacks, this crate turns them into a GPU
// context and per-frame draw calls.
//
// Responsibilities:
// - Expose the high-level facade (`BridgeBuilder` / `Bridge`)
// - Resolve the windowing platform and marshal arguments for native code
// - Keep the session lifecycle (setup → draw / resize → close) in one place
//
// Typical usage:
// ```no_run
// use canvas_bridge::prelude::*;
//
// fn main() -> Result<(), BridgeError> {
//     BridgeBuilder::<WgpuBackend>::new()
//         .with_title("canvas")
//         .build()?
//         .run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds configuration, errors and the session state machine.
// `gpu` holds the GPU abstraction and its wgpu implementation.
// `platform` holds platform resolution and the native window libraries
// (in-process winit host, prebuilt dynamic library).
//
pub mod core;
pub mod gpu;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `bridge` defines the builder and entry point; its types are re-exported
// below.
//
mod bridge;

#[cfg(test)]
mod testing;

//--- Public Exports ------------------------------------------------------

pub use bridge::{Bridge, BridgeBuilder};
pub use crate::core::error::BridgeError;
pub use crate::core::session::SessionStats;
