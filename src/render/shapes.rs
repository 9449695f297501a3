//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in field pixels (y down) and
//! appended to the caller's buffer.

use glam::Vec2;
use std::f32::consts::TAU;

use super::color::Rgb;
use super::vertex::Vertex;
use crate::consts::FACE_SHADE_PERCENT;
use crate::sim::Rect;

/// Convex quad `a b c d` (either winding) as two triangles
pub fn quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    out.extend_from_slice(&[
        Vertex::at(a, color),
        Vertex::at(b, color),
        Vertex::at(c, color),
        Vertex::at(a, color),
        Vertex::at(c, color),
        Vertex::at(d, color),
    ]);
}

/// Filled axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, r: &Rect, color: [f32; 4]) {
    let (x0, y0, x1, y1) = (r.pos.x, r.pos.y, r.right(), r.bottom());
    quad(
        out,
        Vec2::new(x0, y0),
        Vec2::new(x1, y0),
        Vec2::new(x1, y1),
        Vec2::new(x0, y1),
        color,
    );
}

/// Horizontal line of the given thickness centred on `y`
pub fn hline(out: &mut Vec<Vertex>, y: f32, x0: f32, x1: f32, thickness: f32, color: [f32; 4]) {
    let r = Rect::new(x0, y - thickness / 2.0, x1 - x0, thickness);
    rect(out, &r, color);
}

/// Pseudo-3D box: flat front face, a lighter top face and a darker right
/// face, both pushed up and right by `bevel` pixels.
pub fn bevel_box(out: &mut Vec<Vertex>, r: &Rect, base: Rgb, bevel: f32) {
    let (x, y, w, h) = (r.pos.x, r.pos.y, r.size.x, r.size.y);
    let lit = base.adjust_brightness(FACE_SHADE_PERCENT).to_linear(1.0);
    let shade = base.adjust_brightness(-FACE_SHADE_PERCENT).to_linear(1.0);

    // Front
    rect(out, r, base.to_linear(1.0));

    // Top
    quad(
        out,
        Vec2::new(x, y),
        Vec2::new(x + bevel, y - bevel),
        Vec2::new(x + w + bevel, y - bevel),
        Vec2::new(x + w, y),
        lit,
    );

    // Right
    quad(
        out,
        Vec2::new(x + w, y),
        Vec2::new(x + w + bevel, y - bevel),
        Vec2::new(x + w + bevel, y + h - bevel),
        Vec2::new(x + w, y + h),
        shade,
    );
}

/// Ring band with per-edge colours (the GPU interpolates between them).
/// An `inner_radius` of zero produces a filled disc.
pub fn gradient_ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    inner_color: [f32; 4],
    outer_color: [f32; 4],
    segments: u32,
) {
    out.reserve((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        let dir1 = Vec2::from_angle(theta1);
        let dir2 = Vec2::from_angle(theta2);

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        out.push(Vertex::at(inner1, inner_color));
        out.push(Vertex::at(outer1, outer_color));
        out.push(Vertex::at(inner2, inner_color));

        out.push(Vertex::at(inner2, inner_color));
        out.push(Vertex::at(outer1, outer_color));
        out.push(Vertex::at(outer2, outer_color));
    }
}

/// Disc with a radial gradient. `stops` are `(fraction of radius, colour)`
/// pairs in increasing order, starting at 0.0.
pub fn gradient_disc(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    stops: &[(f32, Rgb)],
    segments: u32,
) {
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        gradient_ring(
            out,
            center,
            radius * t0,
            radius * t1,
            c0.to_linear(1.0),
            c1.to_linear(1.0),
            segments,
        );
    }
}

/// Stroke boxes of a `$` sign in glyph units (height 1, centred on origin)
const DOLLAR_STROKES: [(f32, f32, f32, f32); 6] = [
    // x0, y0, x1, y1
    (-0.30, -0.38, 0.30, -0.26), // top bar
    (-0.30, -0.38, -0.18, 0.06), // upper left
    (-0.30, -0.06, 0.30, 0.06),  // middle bar
    (0.18, -0.06, 0.30, 0.38),   // lower right
    (-0.30, 0.26, 0.30, 0.38),   // bottom bar
    (-0.05, -0.50, 0.05, 0.50),  // spine
];

/// `$` glyph of the given height, rotated about `center`
pub fn dollar_glyph(out: &mut Vec<Vertex>, center: Vec2, height: f32, rotation: f32, color: [f32; 4]) {
    let rot = Vec2::from_angle(rotation);
    let place = |x: f32, y: f32| center + rot.rotate(Vec2::new(x, y) * height);

    for (x0, y0, x1, y1) in DOLLAR_STROKES {
        quad(
            out,
            place(x0, y0),
            place(x1, y0),
            place(x1, y1),
            place(x0, y1),
            color,
        );
    }
}
