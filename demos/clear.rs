//=========================================================================
// Clear Demo
//
// Opens a window and clears it to a color that drifts every frame.
//
// Run with:
//   RUST_LOG=debug cargo run --example clear
//=========================================================================

use canvas_bridge::prelude::*;

fn main() -> Result<(), BridgeError> {
    env_logger::init();

    let mut frame = 0u32;

    let stats = BridgeBuilder::<WgpuBackend>::new()
        .with_title("Clear")
        .with_size(800, 600)
        .on_setup(|_, canvas| {
            log::info!("Canvas ready: {:?} ({:?})", canvas.size(), canvas.format());
        })
        .on_draw(move |gpu, canvas| {
            let Ok(texture) = canvas.current_texture() else {
                return;
            };
            let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());

            frame = frame.wrapping_add(1);
            let t = (frame % 360) as f64 / 360.0;

            let mut encoder = gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("clear") });
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r: t, g: 0.2, b: 1.0 - t, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            gpu.queue.submit([encoder.finish()]);
        })
        .on_resize(|width, height| log::debug!("Resized to {}x{}", width, height))
        .build()?
        .run()?;

    log::info!("{:?}", stats);
    Ok(())
}
