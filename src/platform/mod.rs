//=========================================================================
// Platform Subsystem
//
// Resolves the windowing backend for the running OS and hosts the native
// window libraries the bridge can drive.
//
// Architecture:
// ```text
//  BridgeBuilder::build()
//   ↓
//  Platform::current(force_alt_backend)      (resolved once, pure)
//   ├─ "linux"   → Wayland  (X11 when forced)
//   ├─ "windows" → Win32
//   └─ "macos"   → Cocoa
//   ↓
//  NativeWindowLibrary::spawn_window()
//   ├─ WinitHost     (in-process winit event loop)
//   └─ DylibLibrary  (prebuilt `spawn_window` entry point)
// ```
//
// Key Design Decisions:
// - **Early resolution**: An unsupported OS is reported by `build()`,
//   before any GPU work or native call happens
// - **Explicit resize policy**: Which backends need their surface rebuilt
//   on resize lives in a table, not in scattered conditionals
//
//=========================================================================

//=== Submodules ==========================================================

pub mod dylib;
pub mod marshal;
pub mod winit_host;

mod handle_mapper;

//=== External Crates =====================================================

use std::fmt;

use log::debug;

//=== Internal Imports ====================================================

use crate::core::error::BridgeError;

//=== Platform ============================================================

/// Windowing backend a native window is created on.
///
/// The tag decides how opaque native handles are interpreted when a GPU
/// surface is built, and whether the surface survives a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Windows (HWND + no display connection).
    Win32,
    /// macOS (NSView + no display connection).
    Cocoa,
    /// Linux Wayland (wl_surface + wl_display).
    Wayland,
    /// Linux X11 (Window id + Xlib Display).
    X11,
}

impl Platform {
    //--- Resolution -------------------------------------------------------

    /// Maps an OS identifier to a backend.
    ///
    /// Linux defaults to Wayland; `force_alt_backend` selects X11 instead.
    /// The flag has no effect on other systems.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedPlatform`] for any OS outside
    /// `linux`, `windows`, `macos` / `darwin`.
    pub fn resolve(os: &str, force_alt_backend: bool) -> Result<Self, BridgeError> {
        let platform = match os {
            "linux" if force_alt_backend => Self::X11,
            "linux" => Self::Wayland,
            "windows" => Self::Win32,
            "macos" | "darwin" => Self::Cocoa,
            other => {
                return Err(BridgeError::UnsupportedPlatform { os: other.to_string() });
            }
        };

        debug!(
            target: "platform",
            "Resolved platform {} (os: {}, force_alt_backend: {})",
            platform, os, force_alt_backend
        );
        Ok(platform)
    }

    /// Resolves the backend for the OS this binary runs on.
    pub fn current(force_alt_backend: bool) -> Result<Self, BridgeError> {
        Self::resolve(std::env::consts::OS, force_alt_backend)
    }

    //--- Queries ----------------------------------------------------------

    /// Lowercase name used in logs and by native libraries.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Win32 => "win32",
            Self::Cocoa => "cocoa",
            Self::Wayland => "wayland",
            Self::X11 => "x11",
        }
    }

    /// Looks up this backend's entry in the resize policy table.
    pub fn resize_policy(self) -> ResizePolicy {
        RESIZE_POLICIES
            .iter()
            .find(|(platform, _)| *platform == self)
            .map(|(_, policy)| *policy)
            .unwrap_or_default()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=== ResizePolicy ========================================================

/// How a backend's presentation surface reacts to a window resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizePolicy {
    /// Discard and rebuild the surface context, then draw once immediately.
    ///
    /// The Cocoa compositor invalidates the drawable on resize and will not
    /// present a stale one. Other backends keep their context as configured.
    pub rebuild_surface_on_resize: bool,
}

/// Per-backend resize behavior.
///
/// TODO: re-check the Cocoa entry against current wgpu/winit releases; the
/// rebuild may only work around a Metal layer resize defect.
const RESIZE_POLICIES: [(Platform, ResizePolicy); 4] = [
    (Platform::Win32, ResizePolicy { rebuild_surface_on_resize: false }),
    (Platform::Cocoa, ResizePolicy { rebuild_surface_on_resize: true }),
    (Platform::Wayland, ResizePolicy { rebuild_surface_on_resize: false }),
    (Platform::X11, ResizePolicy { rebuild_surface_on_resize: false }),
];

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Resolver Tests
    //=====================================================================

    #[test]
    fn resolves_every_supported_os() {
        assert_eq!(Platform::resolve("windows", false).unwrap(), Platform::Win32);
        assert_eq!(Platform::resolve("macos", false).unwrap(), Platform::Cocoa);
        assert_eq!(Platform::resolve("darwin", false).unwrap(), Platform::Cocoa);
        assert_eq!(Platform::resolve("linux", false).unwrap(), Platform::Wayland);
        assert_eq!(Platform::resolve("linux", true).unwrap(), Platform::X11);
    }

    #[test]
    fn force_flag_only_affects_linux() {
        assert_eq!(Platform::resolve("windows", true).unwrap(), Platform::Win32);
        assert_eq!(Platform::resolve("macos", true).unwrap(), Platform::Cocoa);
    }

    #[test]
    fn unknown_os_is_unsupported() {
        for os in ["freebsd", "android", "ios", "", "Linux"] {
            match Platform::resolve(os, false) {
                Err(BridgeError::UnsupportedPlatform { os: reported }) => {
                    assert_eq!(reported, os);
                }
                other => panic!("Expected UnsupportedPlatform for {:?}, got {:?}", os, other),
            }
        }
    }

    #[test]
    fn display_matches_tag_names() {
        assert_eq!(Platform::Win32.to_string(), "win32");
        assert_eq!(Platform::Cocoa.to_string(), "cocoa");
        assert_eq!(Platform::Wayland.to_string(), "wayland");
        assert_eq!(Platform::X11.to_string(), "x11");
    }

    //=====================================================================
    // Resize Policy Tests
    //=====================================================================

    #[test]
    fn only_cocoa_rebuilds_on_resize() {
        assert!(Platform::Cocoa.resize_policy().rebuild_surface_on_resize);
        assert!(!Platform::Win32.resize_policy().rebuild_surface_on_resize);
        assert!(!Platform::Wayland.resize_policy().rebuild_surface_on_resize);
        assert!(!Platform::X11.resize_policy().rebuild_surface_on_resize);
    }

    #[test]
    fn policy_table_covers_every_platform() {
        for platform in [Platform::Win32, Platform::Cocoa, Platform::Wayland, Platform::X11] {
            assert!(
                RESIZE_POLICIES.iter().any(|(p, _)| *p == platform),
                "Missing resize policy for {}",
                platform
            );
        }
    }
}
