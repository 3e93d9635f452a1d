/// What a pixel was painted as, used to pick the terminal color of the
/// cell it lands in. Later paints win within a cell, which matches the
/// draw-list order (shadow under fill under border).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Shadow,
    VisitedFill,
    UnvisitedFill,
    VisitedBorder,
    UnvisitedBorder,
}

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots),
/// Unicode Braille patterns U+2800 to U+28FF, plus one paint tag per
/// cell so land masses can be colored by visited state.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    dots: Vec<u8>,
    paints: Vec<Option<Paint>>,
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![0u8; width * height],
            paints: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel resolution of the canvas
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.width * 2, self.height * 4)
    }

    /// Set a pixel at the given coordinates.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize, paint: Paint) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        };

        let idx = cy * self.width + cx;
        self.dots[idx] |= bit;
        self.paints[idx] = Some(paint);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, paint: Paint) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, paint);
        }
    }

    /// The character and paint of one cell
    pub fn cell(&self, cx: usize, cy: usize) -> (char, Option<Paint>) {
        if cx >= self.width || cy >= self.height {
            return (' ', None);
        }
        let idx = cy * self.width + cx;
        let ch = match self.dots[idx] {
            0 => ' ',
            bits => char::from_u32(0x2800 + bits as u32).unwrap_or(' '),
        };
        (ch, self.paints[idx])
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.dots.fill(0);
        self.paints.fill(None);
    }

    /// Render the dot grid as plain text (no colors), one line per row
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|cy| {
                (0..self.width)
                    .map(|cx| {
                        let bits = self.dots[cy * self.width + cx];
                        char::from_u32(0x2800 + bits as u32).unwrap_or(' ')
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
