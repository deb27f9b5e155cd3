//! WebGPU render pipeline setup

use wgpu::util::DeviceExt;

use super::vertex::{Vertex, colors};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Flat-color triangle renderer
///
/// Owns the device, queue and pipeline. The host acquires a texture view
/// (a swapchain frame or an offscreen target), hands it to
/// [`RenderState::render_to_view`] and presents it afterwards.
pub struct RenderState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl RenderState {
    pub async fn new(
        adapter: &wgpu::Adapter,
        format: wgpu::TextureFormat,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("arcane-duel-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;
        let info = adapter.get_info();
        log::info!("render device ready on {} ({format:?})", info.name);
        if info.device_type == wgpu::DeviceType::Cpu {
            log::warn!("rendering on a software adapter, expect low frame rates");
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flat_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [0.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            device,
            queue,
            format,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
        })
    }

    /// Number of vertices drawn by the last frame
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Upload arena-space vertices, letterboxed into `viewport` (pixels)
    pub fn upload(&mut self, vertices: &[Vertex], viewport: (u32, u32)) {
        let ndc_vertices = to_ndc(vertices, viewport);

        let bytes: &[u8] = bytemuck::cast_slice(&ndc_vertices);
        if bytes.len() as wgpu::BufferAddress <= self.vertex_buffer.size() {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        } else {
            log::debug!("growing vertex buffer to {} bytes", bytes.len());
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytes,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
        }
        self.vertex_count = ndc_vertices.len() as u32;
    }

    /// Clear `view` to the background color and draw the uploaded triangles
    pub fn render_to_view(&self, view: &wgpu::TextureView) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Upload and draw one frame into `view`
    pub fn render(
        &mut self,
        vertices: &[Vertex],
        view: &wgpu::TextureView,
        viewport: (u32, u32),
    ) {
        self.upload(vertices, viewport);
        self.render_to_view(view);
    }
}

/// Map an arena position (origin top-left, y down) to normalized device
/// coordinates, letterboxing to keep the arena's aspect ratio.
pub fn arena_to_ndc(x: f32, y: f32, viewport: (u32, u32)) -> (f32, f32) {
    let (w, h) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);
    let arena_aspect = ARENA_WIDTH / ARENA_HEIGHT;
    let view_aspect = w / h;
    let (sx, sy) = if view_aspect > arena_aspect {
        // Wider than the arena: bars left and right
        (arena_aspect / view_aspect, 1.0)
    } else {
        (1.0, view_aspect / arena_aspect)
    };
    let nx = (x / ARENA_WIDTH) * 2.0 - 1.0;
    let ny = 1.0 - (y / ARENA_HEIGHT) * 2.0;
    (nx * sx, ny * sy)
}

/// Convert a whole triangle list to NDC
pub fn to_ndc(vertices: &[Vertex], viewport: (u32, u32)) -> Vec<Vertex> {
    vertices
        .iter()
        .map(|v| {
            let (x, y) = arena_to_ndc(v.position[0], v.position[1], viewport);
            Vertex::new(x, y, v.color)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::renderer::{Starfield, build_scene};
    use crate::sim::GameState;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    #[test]
    fn test_arena_corners_fill_matching_viewport() {
        let vp = (1280, 760);
        assert!(close(arena_to_ndc(0.0, 0.0, vp), (-1.0, 1.0)));
        assert!(close(arena_to_ndc(ARENA_WIDTH, ARENA_HEIGHT, vp), (1.0, -1.0)));
        assert!(close(
            arena_to_ndc(ARENA_WIDTH * 0.5, ARENA_HEIGHT * 0.5, vp),
            (0.0, 0.0)
        ));
    }

    #[test]
    fn test_letterbox_on_wide_viewport() {
        // Twice as wide as needed: arena spans half the width
        let vp = (2560, 760);
        let (x, y) = arena_to_ndc(ARENA_WIDTH, 0.0, vp);
        assert!((x - 0.5).abs() < 1e-5);
        assert!((y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_letterbox_on_tall_viewport() {
        let vp = (1280, 1520);
        let (x, y) = arena_to_ndc(0.0, 0.0, vp);
        assert!((x + 1.0).abs() < 1e-5);
        assert!((y - 0.5).abs() < 1e-5);
    }

    fn offscreen_target(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen_target"),
            size: wgpu::Extent3d {
                width: 128,
                height: 76,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    #[test]
    fn test_draws_scene_offscreen() {
        let instance = wgpu::Instance::default();
        let adapter = match pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                force_fallback_adapter: true,
                ..Default::default()
            },
        )) {
            Ok(adapter) => adapter,
            Err(err) => {
                eprintln!("skipping offscreen render: {err}");
                return;
            }
        };

        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let mut renderer = match pollster::block_on(RenderState::new(&adapter, format)) {
            Ok(renderer) => renderer,
            Err(err) => {
                eprintln!("skipping offscreen render: {err}");
                return;
            }
        };

        let state = GameState::new();
        let settings = Settings::default();
        let stars = Starfield::new(7, settings.quality.star_count());
        let vertices = build_scene(&state, &settings, &stars, 0.0);
        assert!(!vertices.is_empty());

        let target = offscreen_target(&renderer.device, format);
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        renderer.render(&vertices, &view, (128, 76));
        assert_eq!(renderer.vertex_count() as usize, vertices.len());

        // A second, empty frame reuses the buffer and draws nothing
        renderer.render(&[], &view, (128, 76));
        assert_eq!(renderer.vertex_count(), 0);
    }

    #[test]
    fn test_to_ndc_keeps_color() {
        let v = [Vertex::new(640.0, 380.0, [0.1, 0.2, 0.3, 0.4])];
        let out = to_ndc(&v, (0, 0));
        assert_eq!(out[0].color, [0.1, 0.2, 0.3, 0.4]);
    }
}
