//=========================================================================
// wgpu Backend
//
// Acquires the adapter and device up front and builds canvas contexts
// from borrowed native handles.
//
// Architecture:
// ```text
//  WgpuBackend::acquire().await        (before the native call)
//   ├─ Instance (all backends)
//   ├─ Adapter  ──fail──> AdapterUnavailable
//   └─ Device   ──fail──> DeviceUnavailable
//
//  build_context()                     (inside on_setup / on_resize)
//   ├─ NativeHandlePair::to_raw(platform)
//   ├─ create_surface_unsafe(RawHandle)
//   └─ configure(format, size)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{CanvasContext, GpuBackend};
use crate::core::config::{PresentationFormat, SurfaceSize};
use crate::core::error::BridgeError;
use crate::core::handles::NativeHandlePair;
use crate::platform::Platform;

//=== GpuDevice ===========================================================

/// Device and queue shared by every callback of a session.
pub struct GpuDevice {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

//=== WgpuBackend =========================================================

/// wgpu-backed [`GpuBackend`].
pub struct WgpuBackend {
    instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    gpu: GpuDevice,
}

impl WgpuBackend {
    /// Requests an adapter and a device.
    ///
    /// Must complete before the native window is spawned: native callbacks
    /// are synchronous and cannot wait on either request.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::AdapterUnavailable`] if no adapter matches
    /// - [`BridgeError::DeviceUnavailable`] if the adapter refuses a device
    pub async fn acquire() -> Result<Self, BridgeError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // No surface exists yet, so the adapter is picked without one.
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| BridgeError::AdapterUnavailable(e.to_string()))?;

        let info = adapter.get_info();
        info!(target: "bridge::gpu", "Adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("canvas_bridge device"),
                ..Default::default()
            })
            .await
            .map_err(|e| BridgeError::DeviceUnavailable(e.to_string()))?;

        debug!(target: "bridge::gpu", "Device acquired");

        Ok(Self { instance, adapter, gpu: GpuDevice { device, queue } })
    }

    //--- Internal Helpers -------------------------------------------------

    fn surface_config(
        &self,
        platform: Platform,
        surface: &wgpu::Surface<'static>,
        format: PresentationFormat,
        size: SurfaceSize,
    ) -> Result<wgpu::SurfaceConfiguration, BridgeError> {
        let caps = surface.get_capabilities(&self.adapter);

        let requested: wgpu::TextureFormat = format.into();
        let format = if caps.formats.contains(&requested) {
            requested
        } else {
            let fallback = caps.formats.first().copied().ok_or_else(|| {
                BridgeError::SurfaceCreationFailed {
                    platform,
                    reason: "surface is incompatible with the adapter".to_string(),
                }
            })?;
            warn!(
                target: "bridge::gpu",
                "Format {:?} unsupported on {}, falling back to {:?}",
                requested, platform, fallback
            );
            fallback
        };

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        })
    }
}

impl GpuBackend for WgpuBackend {
    type Device = GpuDevice;
    type Context = CanvasContext;

    fn device(&self) -> &GpuDevice {
        &self.gpu
    }

    fn build_context(
        &self,
        platform: Platform,
        handles: &NativeHandlePair,
        format: PresentationFormat,
        size: SurfaceSize,
    ) -> Result<CanvasContext, BridgeError> {
        let (raw_window_handle, raw_display_handle) = handles.to_raw(platform)?;

        // Safety: the native library keeps both handles alive until the
        // window closes, and the session drops this context before then.
        let surface = unsafe {
            self.instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle,
                raw_window_handle,
            })
        }
        .map_err(|e| BridgeError::SurfaceCreationFailed { platform, reason: e.to_string() })?;

        let config = self.surface_config(platform, &surface, format, size)?;

        debug!(
            target: "bridge::gpu",
            "Configured {} surface: {}x{} {:?}",
            platform, config.width, config.height, config.format
        );

        Ok(CanvasContext::new(surface, config, self.gpu.device.clone()))
    }

    fn present(&self, context: &mut CanvasContext) {
        context.present();
    }
}
