//=========================================================================
// Core
//
// Platform-independent half of the bridge: configuration, the errors every
// layer reports, and the session state machine the native callbacks drive.
//
// Responsibilities:
// - Describe a window (`config`) and the user hooks attached to it
//   (`callbacks`)
// - Track native handles and their liveness (`handles`)
// - Sequence setup, draw and resize into a single session (`session`)
// - Define the C-ABI seam towards native window libraries
//   (`platform_bridge`)
//
//=========================================================================

pub mod callbacks;
pub mod config;
pub mod error;
pub mod handles;
pub mod platform_bridge;
pub mod session;
