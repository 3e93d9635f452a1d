use crate::error::MapError;
use crate::path::{ParsedPath, Segment};
use glam::DVec2;

/// Parse one path-language string into a segment list.
///
/// Grammar is the usual single-letter command language: `M/m` move, `L/l`
/// line, `H/h`/`V/v` axis-aligned shorthand, `C/c`/`S/s` cubic curves,
/// `Q/q`/`T/t` quadratic curves, `Z/z` close. Lowercase commands are
/// relative to the current point. A command letter may be followed by any
/// number of coordinate groups (implicit repetition); after a move the
/// implicit command is a line. Numbers may be separated by whitespace or
/// commas, or packed densely (`1.5.5`, `10-5`).
///
/// Pure function: no state survives a call.
pub fn parse(data: &str) -> Result<ParsedPath, MapError> {
    Scanner::new(data).run()
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    cur: DVec2,
    subpath_start: DVec2,
    last_cubic_ctrl: Option<DVec2>,
    last_quad_ctrl: Option<DVec2>,
    segments: Vec<Segment>,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            bytes: data.as_bytes(),
            pos: 0,
            cur: DVec2::ZERO,
            subpath_start: DVec2::ZERO,
            last_cubic_ctrl: None,
            last_quad_ctrl: None,
            segments: Vec::new(),
        }
    }

    fn run(mut self) -> Result<ParsedPath, MapError> {
        let mut cmd: Option<u8> = None;

        loop {
            self.skip_separators();
            let Some(c) = self.peek() else { break };

            if c.is_ascii_alphabetic() {
                self.pos += 1;
                cmd = Some(c);
            } else {
                match cmd {
                    None => {
                        return Err(MapError::MalformedPath(format!(
                            "expected command letter, found {:?}",
                            c as char
                        )));
                    }
                    // Close takes no arguments, so a trailing coordinate
                    // cannot belong to anything
                    Some(b'Z') | Some(b'z') => {
                        return Err(MapError::MalformedPath(
                            "coordinates after close command".into(),
                        ));
                    }
                    Some(_) => {}
                }
            }

            let active = cmd.unwrap();
            if self.segments.is_empty() && !matches!(active, b'M' | b'm') {
                return Err(MapError::MalformedPath(format!(
                    "path must start with a move, found {:?}",
                    active as char
                )));
            }

            self.apply(active)?;

            // A repeated coordinate group after a move is an implicit line
            cmd = Some(match active {
                b'M' => b'L',
                b'm' => b'l',
                other => other,
            });
        }

        if self.segments.is_empty() {
            return Err(MapError::MalformedPath("empty path".into()));
        }
        Ok(ParsedPath::new(self.segments))
    }

    /// Execute one coordinate group of `cmd`
    fn apply(&mut self, cmd: u8) -> Result<(), MapError> {
        let rel = cmd.is_ascii_lowercase();
        match cmd.to_ascii_uppercase() {
            b'M' => {
                let p = self.point(rel)?;
                self.cur = p;
                self.subpath_start = p;
                self.segments.push(Segment::MoveTo(p));
                self.clear_ctrl();
            }
            b'L' => {
                let p = self.point(rel)?;
                self.line_to(p);
            }
            b'H' => {
                let x = self.number()?;
                let x = if rel { self.cur.x + x } else { x };
                self.line_to(DVec2::new(x, self.cur.y));
            }
            b'V' => {
                let y = self.number()?;
                let y = if rel { self.cur.y + y } else { y };
                self.line_to(DVec2::new(self.cur.x, y));
            }
            b'C' => {
                let ctrl1 = self.point(rel)?;
                let ctrl2 = self.point(rel)?;
                let to = self.point(rel)?;
                self.cubic_to(ctrl1, ctrl2, to);
            }
            b'S' => {
                // Reflect the previous cubic control through the current
                // point; falls back to the current point after any
                // non-cubic command
                let ctrl1 = self.reflected(self.last_cubic_ctrl);
                let ctrl2 = self.point(rel)?;
                let to = self.point(rel)?;
                self.cubic_to(ctrl1, ctrl2, to);
            }
            b'Q' => {
                let ctrl = self.point(rel)?;
                let to = self.point(rel)?;
                self.quad_to(ctrl, to);
            }
            b'T' => {
                let ctrl = self.reflected(self.last_quad_ctrl);
                let to = self.point(rel)?;
                self.quad_to(ctrl, to);
            }
            b'Z' => {
                self.segments.push(Segment::Close);
                self.cur = self.subpath_start;
                self.clear_ctrl();
            }
            other => {
                return Err(MapError::MalformedPath(format!(
                    "unknown command {:?}",
                    other as char
                )));
            }
        }
        Ok(())
    }

    fn line_to(&mut self, p: DVec2) {
        self.cur = p;
        self.segments.push(Segment::LineTo(p));
        self.clear_ctrl();
    }

    fn cubic_to(&mut self, ctrl1: DVec2, ctrl2: DVec2, to: DVec2) {
        self.segments.push(Segment::CubicTo { ctrl1, ctrl2, to });
        self.cur = to;
        self.last_cubic_ctrl = Some(ctrl2);
        self.last_quad_ctrl = None;
    }

    fn quad_to(&mut self, ctrl: DVec2, to: DVec2) {
        self.segments.push(Segment::QuadTo { ctrl, to });
        self.cur = to;
        self.last_quad_ctrl = Some(ctrl);
        self.last_cubic_ctrl = None;
    }

    fn clear_ctrl(&mut self) {
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
    }

    fn reflected(&self, prev: Option<DVec2>) -> DVec2 {
        match prev {
            Some(c) => 2.0 * self.cur - c,
            None => self.cur,
        }
    }

    fn point(&mut self, rel: bool) -> Result<DVec2, MapError> {
        let x = self.number()?;
        let y = self.number()?;
        let p = DVec2::new(x, y);
        Ok(if rel { self.cur + p } else { p })
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || c == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Greedy number scan: sign, digits, at most one decimal point, an
    /// optional exponent. Stops before a second '.' or an interior sign so
    /// densely packed coordinates ("1.5.5", "10-5") tokenize correctly.
    fn number(&mut self) -> Result<f64, MapError> {
        self.skip_separators();
        let start = self.pos;

        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }

        let mut digits = false;
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            match c {
                b'0'..=b'9' => {
                    digits = true;
                    self.pos += 1;
                }
                b'.' if !seen_dot => {
                    seen_dot = true;
                    self.pos += 1;
                }
                b'e' | b'E' if digits => {
                    self.pos += 1;
                    if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                        self.pos += 1;
                    }
                    let mut exp_digits = false;
                    while matches!(self.peek(), Some(b'0'..=b'9')) {
                        exp_digits = true;
                        self.pos += 1;
                    }
                    if !exp_digits {
                        return Err(MapError::MalformedPath(
                            "exponent without digits".into(),
                        ));
                    }
                    break;
                }
                _ => break,
            }
        }

        if !digits {
            return Err(MapError::MalformedPath(match self.peek() {
                Some(c) => format!("expected number, found {:?}", c as char),
                None => "expected number, found end of input".into(),
            }));
        }

        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| MapError::MalformedPath("non-ascii coordinate".into()))?;
        text.parse::<f64>()
            .map_err(|_| MapError::MalformedPath(format!("bad number {:?}", text)))
    }
}
