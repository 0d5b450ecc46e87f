//! Unpacks the display bitmap into a grid of colors.
use crate::definitions::display::{self, ROW_SIZE};

/// A rendered `64x32` frame, stored row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<C> {
    pixels: Vec<C>,
}

impl<C: Copy> Frame<C> {
    /// Will return the color of the given pixel.
    ///
    /// # Panics
    /// if the coordinates are outside of the display
    pub fn pixel(&self, x: usize, y: usize) -> C {
        assert!(x < display::WIDTH && y < display::HEIGHT);
        self.pixels[y * display::WIDTH + x]
    }

    /// All the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[C]> {
        self.pixels.chunks(display::WIDTH)
    }

    pub fn pixels(&self) -> &[C] {
        &self.pixels
    }
}

/// Will unpack the given bitmap, a cleared bit becomes `off` a set bit `on`.
///
/// # Example
/// ```rust
/// # use chip8vm::render::render;
/// let mut bitmap = [0u8; 0x100];
/// bitmap[0] = 0b1000_0001;
/// let frame = render(&bitmap, '.', '#');
/// assert_eq!(frame.pixel(0, 0), '#');
/// assert_eq!(frame.pixel(1, 0), '.');
/// assert_eq!(frame.pixel(7, 0), '#');
/// ```
pub fn render<C: Copy>(bitmap: &[u8], off: C, on: C) -> Frame<C> {
    debug_assert_eq!(bitmap.len(), display::BUFFER_SIZE);

    let mut pixels = Vec::with_capacity(display::RESOLUTION);
    for y in 0..display::HEIGHT {
        for x in 0..display::WIDTH {
            let byte = bitmap[y * ROW_SIZE + (x >> 3)];
            let set = byte & (0x80 >> (x & 7)) != 0;
            pixels.push(if set { on } else { off });
        }
    }
    Frame { pixels }
}
