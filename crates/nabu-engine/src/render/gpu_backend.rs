use winit::dpi::PhysicalSize;

use super::{FrameError, RenderBackend, TeardownReport};
use crate::device::{AcquiredFrame, GpuDevice, RenderSurface, SurfaceErrorAction};
use crate::mesh::MeshBuffers;
use crate::pipeline::{ConstantBuffer, MeshPipeline};
use crate::scene::SceneConstants;

/// Everything created during setup, released together at shutdown.
pub struct GpuResources {
    pub gpu: GpuDevice,
    pub surface: RenderSurface,
    pub pipeline: MeshPipeline,
    pub mesh: MeshBuffers,
    pub constants: ConstantBuffer,
}

struct PendingFrame {
    encoder: wgpu::CommandEncoder,
    target: AcquiredFrame,
    color_load: wgpu::LoadOp<wgpu::Color>,
    depth_load: wgpu::LoadOp<f32>,
    targets_bound: bool,

    /// Clears were requested that no recorded pass has applied yet.
    clears_pending: bool,
}

/// wgpu implementation of [`RenderBackend`].
///
/// Clears are folded into the load ops of the next render pass; wgpu has no
/// standalone clear command.
pub struct GpuBackend {
    resources: Option<GpuResources>,
    frame: Option<PendingFrame>,
}

impl GpuBackend {
    pub fn new(resources: GpuResources) -> Self {
        Self {
            resources: Some(resources),
            frame: None,
        }
    }

    fn resources(&self) -> Result<&GpuResources, FrameError> {
        self.resources.as_ref().ok_or(FrameError::Released)
    }

    fn frame(&mut self) -> Result<&mut PendingFrame, FrameError> {
        self.frame.as_mut().ok_or(FrameError::NotAcquired)
    }
}

fn record_pass(frame: &mut PendingFrame, res: &GpuResources, index_count: Option<u32>) {
    let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("nabu mesh pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &frame.target.view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: frame.color_load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: res.surface.depth_view(),
            depth_ops: Some(wgpu::Operations {
                load: frame.depth_load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            }),
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    if let Some(count) = index_count {
        pass.set_pipeline(res.pipeline.pipeline());
        pass.set_bind_group(0, res.constants.bind_group(), &[]);
        pass.set_vertex_buffer(0, res.mesh.vertex_buffer().slice(..));
        pass.set_index_buffer(res.mesh.index_buffer().slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..count, 0, 0..1);
    }
    drop(pass);

    // Later passes in the same frame keep what this one wrote.
    frame.color_load = wgpu::LoadOp::Load;
    frame.depth_load = wgpu::LoadOp::Load;
    frame.clears_pending = false;
}

impl RenderBackend for GpuBackend {
    fn write_constants(&mut self, constants: &SceneConstants) -> Result<(), FrameError> {
        let res = self.resources()?;
        res.constants.write(res.gpu.queue(), constants);
        Ok(())
    }

    fn acquire(&mut self) -> Result<bool, FrameError> {
        if self.frame.take().is_some() {
            log::warn!("previous frame was never presented; dropping it");
        }

        let res = self.resources()?;
        if !res.surface.is_drawable() {
            log::trace!("surface has no drawable area; frame skipped");
            return Ok(false);
        }

        let target = match res.surface.acquire() {
            Ok(target) => target,
            Err(err) => {
                return match res.surface.handle_error(res.gpu.device(), &err) {
                    SurfaceErrorAction::Reconfigured => {
                        log::debug!("surface {err}; reconfigured, frame skipped");
                        Ok(false)
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::warn!("surface {err}; frame skipped");
                        Ok(false)
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface {err}; cannot continue");
                        Err(FrameError::Surface(err))
                    }
                };
            }
        };

        let encoder = res
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("nabu frame encoder"),
            });

        self.frame = Some(PendingFrame {
            encoder,
            target,
            color_load: wgpu::LoadOp::Load,
            depth_load: wgpu::LoadOp::Load,
            targets_bound: false,
            clears_pending: false,
        });
        Ok(true)
    }

    fn clear_depth(&mut self, depth: f32) -> Result<(), FrameError> {
        let frame = self.frame()?;
        frame.depth_load = wgpu::LoadOp::Clear(depth);
        frame.clears_pending = true;
        Ok(())
    }

    fn clear_color(&mut self, color: wgpu::Color) -> Result<(), FrameError> {
        let frame = self.frame()?;
        frame.color_load = wgpu::LoadOp::Clear(color);
        frame.clears_pending = true;
        Ok(())
    }

    fn bind_targets(&mut self) -> Result<(), FrameError> {
        self.frame()?.targets_bound = true;
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32) -> Result<(), FrameError> {
        let res = self.resources.as_ref().ok_or(FrameError::Released)?;
        let frame = self.frame.as_mut().ok_or(FrameError::NotAcquired)?;
        if !frame.targets_bound {
            return Err(FrameError::TargetsNotBound);
        }

        record_pass(frame, res, Some(index_count));
        Ok(())
    }

    fn present(&mut self) -> Result<(), FrameError> {
        let res = self.resources.as_ref().ok_or(FrameError::Released)?;
        let mut frame = self.frame.take().ok_or(FrameError::NotAcquired)?;

        if frame.clears_pending {
            record_pass(&mut frame, res, None);
        }

        let PendingFrame {
            encoder, target, ..
        } = frame;
        res.gpu.queue().submit(Some(encoder.finish()));
        target.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(res) = self.resources.as_mut() else {
            return;
        };
        res.surface
            .resize(res.gpu.device(), PhysicalSize::new(width, height));
    }

    fn index_count(&self) -> u32 {
        self.resources
            .as_ref()
            .map_or(0, |res| res.mesh.index_count())
    }

    /// Flushes the queue, then releases constants, mesh buffers, pipeline,
    /// surface and device in that order.
    fn release(&mut self) -> TeardownReport {
        let mut report = TeardownReport::new();

        if self.frame.take().is_some() {
            report.record("unpresented frame");
        }

        let Some(GpuResources {
            gpu,
            surface,
            pipeline,
            mesh,
            constants,
        }) = self.resources.take()
        else {
            return report;
        };

        release_in_order(gpu, Some(surface), pipeline, mesh, constants, &mut report);

        log::info!(
            "GPU resources released ({} groups, {} failures)",
            report.released().len(),
            report.failures().len()
        );
        report
    }
}

/// Dependents go before what they reference: the queue is drained first and
/// the device goes last.
fn release_in_order(
    gpu: GpuDevice,
    surface: Option<RenderSurface>,
    pipeline: MeshPipeline,
    mesh: MeshBuffers,
    constants: ConstantBuffer,
    report: &mut TeardownReport,
) {
    match gpu.flush() {
        Ok(()) => report.record("queue flush"),
        Err(err) => report.fail("queue flush", err),
    }

    constants.release(report);
    mesh.release(report);
    pipeline.release(report);
    if let Some(surface) = surface {
        surface.release(report);
    }
    gpu.release(report);
}

impl Drop for GpuBackend {
    fn drop(&mut self) {
        if self.resources.is_some() {
            let _ = self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{noop_device, DEPTH_FORMAT};
    use crate::mesh::{MeshData, Vertex};
    use crate::pipeline::{build_fixed_state, build_input_layout, compile_shader, ShaderStage};

    const VIEWER_SHADERS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../nabu-viewer/assets/shaders");

    fn triangle() -> MeshData {
        let v = |x: f32, z: f32| Vertex {
            position: [x, 0.0, z],
            normal: [0.0, 1.0, 0.0],
        };
        MeshData {
            vertices: vec![v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn teardown_follows_resource_dependencies() {
        let gpu = noop_device();
        let vs = compile_shader(format!("{VIEWER_SHADERS}/vertex.wgsl"), "VS", ShaderStage::Vertex)
            .unwrap();
        let ps = compile_shader(format!("{VIEWER_SHADERS}/pixel.wgsl"), "PS", ShaderStage::Pixel)
            .unwrap();
        let pipeline = MeshPipeline::new(
            gpu.device(),
            &vs,
            &ps,
            &build_input_layout(&vs).unwrap(),
            build_fixed_state(DEPTH_FORMAT),
            wgpu::TextureFormat::Bgra8Unorm,
        );
        let constants = pipeline.create_constants(gpu.device());
        let mesh = MeshBuffers::upload(gpu.device(), &triangle());

        let mut report = TeardownReport::new();
        release_in_order(gpu, None, pipeline, mesh, constants, &mut report);

        assert!(report.is_clean(), "{:?}", report.failures());
        assert_eq!(
            report.released(),
            &[
                "queue flush",
                "constant bind group",
                "constant buffer",
                "index buffer",
                "vertex buffer",
                "render pipeline",
                "pipeline layout",
                "shader modules",
                "device",
                "instance",
            ]
        );
    }
}
