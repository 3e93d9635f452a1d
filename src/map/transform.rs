use crate::error::MapError;
use crate::path::{ParsedPath, Segment};
use glam::DVec2;

/// Width of the logical coordinate space the outlines are authored in
pub const MAP_WIDTH: f64 = 1008.0;
/// Height of the logical coordinate space
pub const MAP_HEIGHT: f64 = 651.0;

/// Uniform scale + centering offset mapping the logical space onto a
/// drawing surface without distortion.
///
/// Pure function of the surface size, so callers can cache it keyed on the
/// `(width, height)` pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewportTransform {
    /// Fit the logical space into a surface, letterboxing the short axis
    pub fn fit(surface_width: f64, surface_height: f64) -> Result<Self, MapError> {
        if surface_width <= 0.0 || surface_height <= 0.0 {
            return Err(MapError::InvalidSurface {
                width: surface_width,
                height: surface_height,
            });
        }

        let scale = (surface_width / MAP_WIDTH).min(surface_height / MAP_HEIGHT);
        Ok(Self {
            scale,
            offset_x: (surface_width - MAP_WIDTH * scale) / 2.0,
            offset_y: (surface_height - MAP_HEIGHT * scale) / 2.0,
        })
    }

    /// Map one logical point to surface coordinates
    #[inline(always)]
    pub fn apply(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    /// Map a whole path to surface coordinates, uniformly over endpoints
    /// and control points
    pub fn apply_path(&self, path: &ParsedPath) -> ParsedPath {
        let segments = path
            .segments
            .iter()
            .map(|seg| match *seg {
                Segment::MoveTo(p) => Segment::MoveTo(self.apply(p)),
                Segment::LineTo(p) => Segment::LineTo(self.apply(p)),
                Segment::QuadTo { ctrl, to } => Segment::QuadTo {
                    ctrl: self.apply(ctrl),
                    to: self.apply(to),
                },
                Segment::CubicTo { ctrl1, ctrl2, to } => Segment::CubicTo {
                    ctrl1: self.apply(ctrl1),
                    ctrl2: self.apply(ctrl2),
                    to: self.apply(to),
                },
                Segment::Close => Segment::Close,
            })
            .collect();
        ParsedPath::new(segments)
    }
}

/// Translate an already-transformed path by a surface-space delta
pub fn shift_path(path: &ParsedPath, delta: DVec2) -> ParsedPath {
    let segments = path
        .segments
        .iter()
        .map(|seg| match *seg {
            Segment::MoveTo(p) => Segment::MoveTo(p + delta),
            Segment::LineTo(p) => Segment::LineTo(p + delta),
            Segment::QuadTo { ctrl, to } => Segment::QuadTo {
                ctrl: ctrl + delta,
                to: to + delta,
            },
            Segment::CubicTo { ctrl1, ctrl2, to } => Segment::CubicTo {
                ctrl1: ctrl1 + delta,
                ctrl2: ctrl2 + delta,
                to: to + delta,
            },
            Segment::Close => Segment::Close,
        })
        .collect();
    ParsedPath::new(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_surface_is_identity() {
        let t = ViewportTransform::fit(MAP_WIDTH, MAP_HEIGHT).unwrap();
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.offset_x, 0.0);
        assert_eq!(t.offset_y, 0.0);
    }

    #[test]
    fn test_double_surface_doubles_scale() {
        let t = ViewportTransform::fit(2.0 * MAP_WIDTH, 2.0 * MAP_HEIGHT).unwrap();
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.offset_x, 0.0);
        assert_eq!(t.offset_y, 0.0);
    }

    #[test]
    fn test_tall_surface_is_width_bound() {
        let t = ViewportTransform::fit(MAP_WIDTH, 2.0 * MAP_HEIGHT).unwrap();
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.offset_x, 0.0);
        assert_eq!(t.offset_y, MAP_HEIGHT / 2.0);
    }

    #[test]
    fn test_degenerate_surface_rejected() {
        assert!(matches!(
            ViewportTransform::fit(0.0, 100.0),
            Err(MapError::InvalidSurface { .. })
        ));
        assert!(matches!(
            ViewportTransform::fit(100.0, -5.0),
            Err(MapError::InvalidSurface { .. })
        ));
    }

    #[test]
    fn test_apply_path_is_uniform() {
        let t = ViewportTransform {
            scale: 2.0,
            offset_x: 10.0,
            offset_y: 20.0,
        };
        let path = crate::path::parse("M 1 1 C 2 2 3 3 4 4 Z").unwrap();
        let out = t.apply_path(&path);
        assert_eq!(out.segments[0], Segment::MoveTo(DVec2::new(12.0, 22.0)));
        assert_eq!(
            out.segments[1],
            Segment::CubicTo {
                ctrl1: DVec2::new(14.0, 24.0),
                ctrl2: DVec2::new(16.0, 26.0),
                to: DVec2::new(18.0, 28.0),
            }
        );
        assert_eq!(out.segments[2], Segment::Close);
    }

    #[test]
    fn test_shift_path_translates_every_vertex() {
        let path = crate::path::parse("M 0 0 L 10 0 Q 15 5 10 10").unwrap();
        let shifted = shift_path(&path, DVec2::new(2.0, 2.0));
        assert_eq!(shifted.segments[0], Segment::MoveTo(DVec2::new(2.0, 2.0)));
        assert_eq!(
            shifted.segments[2],
            Segment::QuadTo {
                ctrl: DVec2::new(17.0, 7.0),
                to: DVec2::new(12.0, 12.0),
            }
        );
    }
}
