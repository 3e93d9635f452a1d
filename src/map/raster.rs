use crate::braille::{BrailleCanvas, Paint};
use crate::map::compositor::{BackgroundGradient, CountryStyle, DrawInstruction};
use crate::path::{ParsedPath, Segment};
use glam::DVec2;

/// Max chord deviation, in pixels, tolerated when flattening curves
const FLATTEN_TOLERANCE: f64 = 0.25;
const MAX_SUBDIVISION_DEPTH: u32 = 16;

/// Execute a draw list onto the canvas in order. Returns the background
/// gradient the list opened with, for the host to paint behind the cells.
pub fn render(canvas: &mut BrailleCanvas, instructions: &[DrawInstruction]) -> Option<BackgroundGradient> {
    let mut background = None;
    for instruction in instructions {
        match instruction {
            DrawInstruction::FillBackground(gradient) => background = Some(*gradient),
            DrawInstruction::Shadow(path) => fill_path(canvas, path, Paint::Shadow),
            DrawInstruction::Fill(path, style) => {
                let paint = match style {
                    CountryStyle::Visited => Paint::VisitedFill,
                    CountryStyle::Unvisited => Paint::UnvisitedFill,
                };
                fill_path(canvas, path, paint);
            }
            DrawInstruction::Border(path, style) => {
                let paint = match style {
                    CountryStyle::Visited => Paint::VisitedBorder,
                    CountryStyle::Unvisited => Paint::UnvisitedBorder,
                };
                stroke_path(canvas, path, paint);
            }
        }
    }
    background
}

/// Flatten a path into one polyline per subpath. Curves become short
/// chords via recursive midpoint subdivision.
pub fn flatten_path(path: &ParsedPath) -> Vec<Vec<DVec2>> {
    let mut rings: Vec<Vec<DVec2>> = Vec::new();
    let mut current: Vec<DVec2> = Vec::new();
    let mut cursor = DVec2::ZERO;

    for seg in &path.segments {
        match *seg {
            Segment::MoveTo(p) => {
                if current.len() > 1 {
                    rings.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                current.push(p);
                cursor = p;
            }
            Segment::LineTo(p) => {
                current.push(p);
                cursor = p;
            }
            Segment::QuadTo { ctrl, to } => {
                flatten_quad(&mut current, cursor, ctrl, to, 0);
                cursor = to;
            }
            Segment::CubicTo { ctrl1, ctrl2, to } => {
                flatten_cubic(&mut current, cursor, ctrl1, ctrl2, to, 0);
                cursor = to;
            }
            Segment::Close => {
                if let Some(&start) = current.first() {
                    current.push(start);
                    cursor = start;
                }
            }
        }
    }
    if current.len() > 1 {
        rings.push(current);
    }
    rings
}

fn flatten_cubic(out: &mut Vec<DVec2>, p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, depth: u32) {
    let d1 = dist_to_seg_sq(p1, p0, p3);
    let d2 = dist_to_seg_sq(p2, p0, p3);
    if d1.max(d2) <= FLATTEN_TOLERANCE * FLATTEN_TOLERANCE || depth > MAX_SUBDIVISION_DEPTH {
        out.push(p3);
        return;
    }
    let p01 = 0.5 * (p0 + p1);
    let p12 = 0.5 * (p1 + p2);
    let p23 = 0.5 * (p2 + p3);
    let p012 = 0.5 * (p01 + p12);
    let p123 = 0.5 * (p12 + p23);
    let mid = 0.5 * (p012 + p123);
    flatten_cubic(out, p0, p01, p012, mid, depth + 1);
    flatten_cubic(out, mid, p123, p23, p3, depth + 1);
}

fn flatten_quad(out: &mut Vec<DVec2>, p0: DVec2, ctrl: DVec2, p2: DVec2, depth: u32) {
    if dist_to_seg_sq(ctrl, p0, p2) <= FLATTEN_TOLERANCE * FLATTEN_TOLERANCE
        || depth > MAX_SUBDIVISION_DEPTH
    {
        out.push(p2);
        return;
    }
    let p01 = 0.5 * (p0 + ctrl);
    let p12 = 0.5 * (ctrl + p2);
    let mid = 0.5 * (p01 + p12);
    flatten_quad(out, p0, p01, mid, depth + 1);
    flatten_quad(out, mid, p12, p2, depth + 1);
}

/// Squared distance from `p` to the segment `a`-`b`
fn dist_to_seg_sq(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return (p - a).length_squared();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + t * ab)).length_squared()
}

/// Fill the path's interior with an even-odd scanline pass. Subpaths are
/// treated as closed rings, so holes carve out of the fill.
pub fn fill_path(canvas: &mut BrailleCanvas, path: &ParsedPath, paint: Paint) {
    let rings = flatten_path(path);
    let mut edges: Vec<(DVec2, DVec2)> = Vec::new();
    for ring in &rings {
        if ring.len() < 3 {
            continue;
        }
        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            // Horizontal edges never cross a scanline
            if a.y != b.y {
                edges.push((a, b));
            }
        }
    }
    if edges.is_empty() {
        return;
    }

    let (pixel_w, pixel_h) = canvas.pixel_size();
    let min_y = edges.iter().map(|(a, b)| a.y.min(b.y)).fold(f64::MAX, f64::min);
    let max_y = edges.iter().map(|(a, b)| a.y.max(b.y)).fold(f64::MIN, f64::max);
    let y_start = (min_y.floor().max(0.0)) as usize;
    let y_end = (max_y.ceil().min(pixel_h as f64)) as usize;

    let mut crossings: Vec<f64> = Vec::new();
    for py in y_start..y_end {
        let y = py as f64 + 0.5;
        crossings.clear();
        for &(a, b) in &edges {
            let crosses = (a.y <= y && b.y > y) || (b.y <= y && a.y > y);
            if crosses {
                crossings.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let x_start = ((pair[0] - 0.5).ceil().max(0.0)) as usize;
            let x_end = (pair[1] - 0.5).floor();
            if x_end < 0.0 {
                continue;
            }
            let x_end = (x_end as usize).min(pixel_w.saturating_sub(1));
            for px in x_start..=x_end {
                canvas.set_pixel(px, py, paint);
            }
        }
    }
}

/// Stroke the path's outline with Bresenham lines
pub fn stroke_path(canvas: &mut BrailleCanvas, path: &ParsedPath, paint: Paint) {
    for ring in flatten_path(path) {
        for pair in ring.windows(2) {
            draw_line(
                canvas,
                pair[0].x.round() as i32,
                pair[0].y.round() as i32,
                pair[1].x.round() as i32,
                pair[1].y.round() as i32,
                paint,
            );
        }
    }
}

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32, paint: Paint) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y, paint);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::compositor::BACKGROUND;
    use crate::path;
    use std::sync::Arc;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0, Paint::UnvisitedBorder);
        let s = canvas.to_string();
        assert!(s.chars().all(|c| c == '⠉'));
    }

    #[test]
    fn test_flatten_lines_passthrough() {
        let p = path::parse("M 0 0 L 10 0 L 10 10 Z").unwrap();
        let rings = flatten_path(&p);
        assert_eq!(rings.len(), 1);
        assert_eq!(
            rings[0],
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(10.0, 0.0),
                DVec2::new(10.0, 10.0),
                DVec2::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_flatten_curve_stays_near_chord_ends() {
        let p = path::parse("M 0 0 C 0 10 20 10 20 0").unwrap();
        let rings = flatten_path(&p);
        let ring = &rings[0];
        assert_eq!(ring[0], DVec2::new(0.0, 0.0));
        assert_eq!(*ring.last().unwrap(), DVec2::new(20.0, 0.0));
        // Flattening a real curve must add intermediate points
        assert!(ring.len() > 2);
        // And every point stays inside the control hull's bounds
        for pt in ring {
            assert!(pt.x >= 0.0 && pt.x <= 20.0);
            assert!(pt.y >= 0.0 && pt.y <= 10.0);
        }
    }

    #[test]
    fn test_fill_covers_rectangle_interior() {
        // 5x2 chars = 10x8 pixels
        let mut canvas = BrailleCanvas::new(5, 2);
        let rect = path::parse("M 1 1 L 9 1 L 9 7 L 1 7 Z").unwrap();
        fill_path(&mut canvas, &rect, Paint::VisitedFill);

        // Interior cells carry the fill paint
        assert_eq!(canvas.cell(1, 0).1, Some(Paint::VisitedFill));
        assert_eq!(canvas.cell(2, 1).1, Some(Paint::VisitedFill));
        // Nothing painted left of the rectangle's first column of dots
        assert_eq!(canvas.cell(0, 0).0 as u32 & 0x01, 0);
    }

    #[test]
    fn test_fill_ignores_degenerate_ring() {
        let mut canvas = BrailleCanvas::new(4, 4);
        let line = path::parse("M 0 0 L 5 5").unwrap();
        fill_path(&mut canvas, &line, Paint::UnvisitedFill);
        assert_eq!(canvas.to_string(), canvas_blank(4, 4));
    }

    fn canvas_blank(w: usize, h: usize) -> String {
        (0..h)
            .map(|_| "⠀".repeat(w))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_returns_background_and_layers_paint() {
        let mut canvas = BrailleCanvas::new(5, 2);
        let fill = Arc::new(path::parse("M 1 1 L 9 1 L 9 7 L 1 7 Z").unwrap());
        let instructions = vec![
            DrawInstruction::FillBackground(BACKGROUND),
            DrawInstruction::Shadow(fill.clone()),
            DrawInstruction::Fill(fill.clone(), CountryStyle::Visited),
            DrawInstruction::Border(fill, CountryStyle::Visited),
        ];

        let background = render(&mut canvas, &instructions);
        assert_eq!(background, Some(BACKGROUND));
        // Border is drawn last, so edge cells end up with border paint
        assert_eq!(canvas.cell(0, 0).1, Some(Paint::VisitedBorder));
    }
}
