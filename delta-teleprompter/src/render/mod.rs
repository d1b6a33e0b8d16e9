/// Glyph rasterization and drawing of single text rows.
pub mod text;

use crate::graphics::color::{self, Color};
use crate::layout::{Position, Rect, Size};

/// Simple structure that encapsulates the frame buffer and relevant metadata.
/// Render methods take this structure, to keep them separate from the event loop.
///
/// Pixels are `0x00RRGGBB`, row by row.  Writes outside the buffer are dropped.
pub struct DrawHandle<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> DrawHandle<'a> {
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        debug_assert!(buffer.len() >= width * height);
        Self { buffer, width, height }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            origin: Position::default(),
            size: self.size(),
        }
    }

    #[inline]
    fn index(&self, position: Position) -> Option<usize> {
        let x = usize::try_from(position.x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(position.y).ok().filter(|&y| y < self.height)?;
        Some(y * self.width + x)
    }

    /// Paints `value` over what is already there, `coverage` being 0 (nothing) to 255 (opaque).
    pub fn blend(&mut self, position: Position, value: Color, coverage: u8) {
        if let Some(index) = self.index(position) {
            let under = color::from_pixel(self.buffer[index]);
            self.buffer[index] = color::to_pixel(color::blend(under, value, coverage));
        }
    }

    pub fn fill(&mut self, value: Color) {
        let pixel = color::to_pixel(value);
        let len = self.width * self.height;
        self.buffer[..len].fill(pixel);
    }

    /// Fills the part of `rect` that is on screen.
    pub fn fill_rect(&mut self, rect: Rect, value: Color) {
        let pixel = color::to_pixel(value);
        let left = rect.left().clamp(0, self.width as i32) as usize;
        let right = rect.right().clamp(0, self.width as i32) as usize;
        let top = rect.top().clamp(0, self.height as i32) as usize;
        let bottom = rect.bottom().clamp(0, self.height as i32) as usize;
        for y in top..bottom {
            self.buffer[y * self.width + left..y * self.width + right].fill(pixel);
        }
    }
}

/// We're only dealing with integer pixels for now
pub type Pixel = usize;

pub trait Drawable {
    /// Draws at `position`, leaving every pixel outside `clip` untouched.
    fn draw_at(&self, handle: &mut DrawHandle, position: Position, color: Color, clip: Rect);
}
