use glam::DVec2;

/// One command of a parsed outline, with all coordinates resolved to
/// absolute positions in the logical map space
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    MoveTo(DVec2),
    LineTo(DVec2),
    QuadTo { ctrl: DVec2, to: DVec2 },
    CubicTo { ctrl1: DVec2, ctrl2: DVec2, to: DVec2 },
    Close,
}

impl Segment {
    /// Endpoint the cursor lands on, if the segment moves it
    pub fn endpoint(&self) -> Option<DVec2> {
        match *self {
            Segment::MoveTo(p) | Segment::LineTo(p) => Some(p),
            Segment::QuadTo { to, .. } | Segment::CubicTo { to, .. } => Some(to),
            Segment::Close => None,
        }
    }
}

/// A country outline as an ordered segment list.
/// May contain several disjoint subpaths (multi-polygon countries);
/// the first segment is always a `MoveTo`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedPath {
    pub segments: Vec<Segment>,
}

impl ParsedPath {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Axis-aligned bounds over every vertex (endpoints and control
    /// points) of every segment; `None` for an empty path
    pub fn bounds(&self) -> Option<BoundingBox> {
        fn grow(bbox: &mut Option<BoundingBox>, p: DVec2) {
            match bbox {
                Some(b) => b.expand(p),
                None => *bbox = Some(BoundingBox::at(p)),
            }
        }

        let mut bbox: Option<BoundingBox> = None;
        for seg in &self.segments {
            match *seg {
                Segment::MoveTo(p) | Segment::LineTo(p) => grow(&mut bbox, p),
                Segment::QuadTo { ctrl, to } => {
                    grow(&mut bbox, ctrl);
                    grow(&mut bbox, to);
                }
                Segment::CubicTo { ctrl1, ctrl2, to } => {
                    grow(&mut bbox, ctrl1);
                    grow(&mut bbox, ctrl2);
                    grow(&mut bbox, to);
                }
                Segment::Close => {}
            }
        }

        bbox
    }

    /// Final cursor position after tracing the whole command sequence.
    /// `Close` returns the cursor to the start of its subpath.
    pub fn terminal_point(&self) -> Option<DVec2> {
        let mut cursor = None;
        let mut subpath_start = None;

        for seg in &self.segments {
            match *seg {
                Segment::MoveTo(p) => {
                    cursor = Some(p);
                    subpath_start = Some(p);
                }
                Segment::Close => cursor = subpath_start,
                _ => cursor = seg.endpoint(),
            }
        }

        cursor
    }
}

/// Axis-aligned bounding box in logical map coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// Degenerate box containing a single point
    pub fn at(p: DVec2) -> Self {
        Self { min: p, max: p }
    }

    pub fn expand(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
