//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

    pub fn at(p: Vec2, color: [f32; 4]) -> Self {
        Self::new(p.x, p.y, color)
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
pub mod palette {
    use crate::render::color::Rgb;

    pub const BACKGROUND: Rgb = Rgb::from_u32(0x1a1a2e);
    pub const GRID: Rgb = Rgb::from_u32(0x16213e);
    pub const OBSTACLE: Rgb = Rgb::from_u32(0xe74c3c);
    pub const PLAYER: Rgb = Rgb::from_u32(0x3498db);
    /// Coin radial gradient: center, halfway, rim
    pub const COIN_CENTER: Rgb = Rgb::from_u32(0xffd700);
    pub const COIN_MID: Rgb = Rgb::from_u32(0xffed4e);
    pub const COIN_RIM: Rgb = Rgb::from_u32(0xd4af37);
    pub const COIN_GLYPH: Rgb = Rgb::BLACK;
}
