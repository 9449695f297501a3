//! Per-frame draw list
//!
//! Fixed draw order: background, grid, obstacles, coins, player. Building a
//! scene only reads the game state.

use glam::Vec2;
use std::ops::Range;

use super::shapes;
use super::vertex::{Vertex, palette};
use crate::consts::*;
use crate::sim::{GameState, Rect};

/// Segments per coin ring
const COIN_SEGMENTS: u32 = 24;
/// Height of the `$` glyph in pixels
const GLYPH_HEIGHT: f32 = 12.0;

/// Draw layers, in the order they are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawLayer {
    Background,
    Grid,
    Obstacles,
    Coins,
    Player,
}

/// Triangle list for one frame, tagged by layer
#[derive(Debug, Clone)]
pub struct Scene {
    pub vertices: Vec<Vertex>,
    pub layers: Vec<(DrawLayer, Range<usize>)>,
    /// Rotate coin glyphs with the coin's spin (off for reduced motion)
    pub spin_coins: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            layers: Vec::new(),
            spin_coins: true,
        }
    }

    /// Rebuild the draw list from the current state
    pub fn build(&mut self, state: &GameState) {
        self.vertices.clear();
        self.layers.clear();
        let spin = self.spin_coins;

        self.layer(DrawLayer::Background, |out| {
            let field = Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);
            shapes::rect(out, &field, palette::BACKGROUND.to_linear(1.0));
        });

        self.layer(DrawLayer::Grid, |out| {
            let color = palette::GRID.to_linear(1.0);
            let mut y = 0.0;
            while y < FIELD_HEIGHT {
                shapes::hline(out, y, 0.0, FIELD_WIDTH, 1.0, color);
                y += GRID_SPACING;
            }
        });

        self.layer(DrawLayer::Obstacles, |out| {
            for obstacle in &state.obstacles {
                shapes::bevel_box(out, &obstacle.bounds(), palette::OBSTACLE, OBSTACLE_BEVEL);
            }
        });

        self.layer(DrawLayer::Coins, |out| {
            let stops = [
                (0.0, palette::COIN_CENTER),
                (0.5, palette::COIN_MID),
                (1.0, palette::COIN_RIM),
            ];
            let glyph = palette::COIN_GLYPH.to_linear(1.0);
            for coin in &state.coins {
                let center = coin.pos + coin.size * 0.5;
                let radius = coin.size.x / 2.0;
                shapes::gradient_disc(out, center, radius, &stops, COIN_SEGMENTS);
                let rotation = if spin { coin.rotation } else { 0.0 };
                shapes::dollar_glyph(out, center, GLYPH_HEIGHT, rotation, glyph);
            }
        });

        self.layer(DrawLayer::Player, |out| {
            shapes::bevel_box(out, &state.player.bounds(), palette::PLAYER, PLAYER_BEVEL);
        });
    }

    fn layer(&mut self, layer: DrawLayer, emit: impl FnOnce(&mut Vec<Vertex>)) {
        let start = self.vertices.len();
        emit(&mut self.vertices);
        self.layers.push((layer, start..self.vertices.len()));
    }

    /// Vertex range emitted for a layer
    pub fn layer_range(&self, layer: DrawLayer) -> Option<Range<usize>> {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, r)| r.clone())
    }

    pub fn layer_vertices(&self, layer: DrawLayer) -> &[Vertex] {
        self.layer_range(layer)
            .map(|r| &self.vertices[r])
            .unwrap_or(&[])
    }

    /// Centre of the player box as drawn (front face)
    pub fn player_anchor(&self) -> Option<Vec2> {
        let face = self.layer_vertices(DrawLayer::Player).get(..6)?;
        let sum = face
            .iter()
            .fold(Vec2::ZERO, |acc, v| acc + Vec2::from(v.position));
        Some(sum / face.len() as f32)
    }
}
