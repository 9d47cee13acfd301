//=========================================================================
// Window Configuration
//
// Describes the single window a bridge spawns and the pixel format its
// canvas is configured with.
//
// Responsibilities:
// - Hold caller-supplied window options with their defaults
// - Name presentation formats the way WebGPU canvases do
//
// Notes:
// A `WindowConfig` is immutable once handed to `Bridge`. Setters live on
// `BridgeBuilder`, which validates them.
//=========================================================================

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

//=== Defaults ============================================================

/// Default window title.
pub const DEFAULT_TITLE: &str = "canvas";

/// Default window width in pixels.
pub const DEFAULT_WIDTH: u32 = 512;

/// Default window height in pixels.
pub const DEFAULT_HEIGHT: u32 = 512;

//=== SurfaceSize =========================================================

/// Pixel dimensions of a window's drawable area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

//=== PresentationFormat ==================================================

/// Pixel format of the presented canvas texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresentationFormat {
    #[default]
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Rgba16Float,
}

impl PresentationFormat {
    /// WebGPU spelling of the format (e.g. `"bgra8unorm"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bgra8Unorm => "bgra8unorm",
            Self::Bgra8UnormSrgb => "bgra8unorm-srgb",
            Self::Rgba8Unorm => "rgba8unorm",
            Self::Rgba8UnormSrgb => "rgba8unorm-srgb",
            Self::Rgba16Float => "rgba16float",
        }
    }
}

impl fmt::Display for PresentationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected presentation format name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown presentation format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for PresentationFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bgra8unorm" => Ok(Self::Bgra8Unorm),
            "bgra8unorm-srgb" => Ok(Self::Bgra8UnormSrgb),
            "rgba8unorm" => Ok(Self::Rgba8Unorm),
            "rgba8unorm-srgb" => Ok(Self::Rgba8UnormSrgb),
            "rgba16float" => Ok(Self::Rgba16Float),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl From<PresentationFormat> for wgpu::TextureFormat {
    fn from(format: PresentationFormat) -> Self {
        match format {
            PresentationFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
            PresentationFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            PresentationFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            PresentationFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            PresentationFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
        }
    }
}

//=== WindowConfig ========================================================

/// Options for the window a bridge spawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub icon_path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub presentation_format: PresentationFormat,
    /// On Linux, use X11 instead of Wayland.
    pub force_alt_backend: bool,
}

impl WindowConfig {
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            icon_path: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            presentation_format: PresentationFormat::default(),
            force_alt_backend: false,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "canvas");
        assert_eq!(config.icon_path, None);
        assert_eq!(config.size(), SurfaceSize::new(512, 512));
        assert_eq!(config.presentation_format, PresentationFormat::Bgra8Unorm);
        assert_eq!(config.presentation_format.as_str(), "bgra8unorm");
        assert!(!config.force_alt_backend);
    }

    #[test]
    fn format_names_parse_back() {
        for format in [
            PresentationFormat::Bgra8Unorm,
            PresentationFormat::Bgra8UnormSrgb,
            PresentationFormat::Rgba8Unorm,
            PresentationFormat::Rgba8UnormSrgb,
            PresentationFormat::Rgba16Float,
        ] {
            assert_eq!(format.as_str().parse::<PresentationFormat>(), Ok(format));
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = "depth24plus".parse::<PresentationFormat>().unwrap_err();
        assert_eq!(err.to_string(), "unknown presentation format: depth24plus");
    }

    #[test]
    fn unknown_format_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<UnknownFormat>();

        let err: Box<dyn std::error::Error> = Box::new(UnknownFormat("r8".to_string()));
        assert_eq!(err.to_string(), "unknown presentation format: r8");
    }

    #[test]
    fn formats_map_to_wgpu() {
        let format: wgpu::TextureFormat = PresentationFormat::Bgra8Unorm.into();
        assert_eq!(format, wgpu::TextureFormat::Bgra8Unorm);

        let format: wgpu::TextureFormat = PresentationFormat::Rgba16Float.into();
        assert_eq!(format, wgpu::TextureFormat::Rgba16Float);
    }
}
