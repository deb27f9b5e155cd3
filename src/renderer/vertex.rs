//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.04, 0.03, 0.09, 1.0];
    pub const FLOOR_LINE: [f32; 4] = [0.22, 0.18, 0.38, 0.5];
    pub const CENTER_LINE: [f32; 4] = [0.45, 0.35, 0.7, 0.35];
    pub const STAR: [f32; 4] = [0.8, 0.8, 1.0, 0.6];
    pub const PLAYER: [f32; 4] = [0.35, 0.75, 1.0, 1.0];
    pub const PLAYER_CORE: [f32; 4] = [0.85, 0.95, 1.0, 1.0];
    pub const ENEMY: [f32; 4] = [1.0, 0.35, 0.45, 1.0];
    pub const ENEMY_DESPERATE: [f32; 4] = [1.0, 0.6, 0.2, 1.0];
    pub const ENEMY_CORE: [f32; 4] = [1.0, 0.85, 0.85, 1.0];
    pub const SHIELD: [f32; 4] = [0.5, 0.9, 1.0, 0.55];
    pub const BURN: [f32; 4] = [1.0, 0.5, 0.15, 0.5];
    pub const SLOW: [f32; 4] = [0.5, 0.6, 1.0, 0.45];
    pub const PANEL: [f32; 4] = [0.08, 0.06, 0.16, 0.85];
    pub const BAR_BACK: [f32; 4] = [0.15, 0.12, 0.25, 1.0];
    pub const HP: [f32; 4] = [0.9, 0.25, 0.35, 1.0];
    pub const MANA: [f32; 4] = [0.3, 0.5, 1.0, 1.0];
    pub const COOLDOWN: [f32; 4] = [0.0, 0.0, 0.0, 0.55];
    pub const SELECTED: [f32; 4] = [1.0, 0.95, 0.6, 1.0];
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
}

/// RGBA from an RGB triple and an alpha
pub const fn rgba(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}
