use fontdue::Font;
use unicode_segmentation::UnicodeSegmentation;

use crate::layout::Size;
use crate::render::Pixel;

/// A font at one pixel size.  This is what the reflow measures with and what the renderer lays out with.
#[derive(Clone, Copy)]
pub struct FontMetrics<'a> {
    pub(crate) font: &'a Font,
    pub size: u16,
}

impl<'a> FontMetrics<'a> {
    pub fn new(font: &'a Font, size: u16) -> Self {
        Self { font, size }
    }

    pub fn px(&self) -> f32 {
        f32::from(self.size)
    }

    /// Height of every row, spacing included.  Uniform for the whole font at this size.
    pub fn line_height(&self) -> Pixel {
        self.font
            .horizontal_line_metrics(self.px())
            .map(|metrics| metrics.new_line_size.ceil() as Pixel)
            .unwrap_or(Pixel::from(self.size))
    }

    /// Distance from the top of a row to its baseline.
    pub fn ascent(&self) -> i32 {
        self.font
            .horizontal_line_metrics(self.px())
            .map(|metrics| metrics.ascent.round() as i32)
            .unwrap_or(i32::from(self.size))
    }

    /// Horizontal advance of one grapheme cluster.
    /// Only the base character advances the pen; combining marks sit on top of it.
    pub fn cluster_advance(&self, cluster: &str) -> f32 {
        cluster
            .chars()
            .next()
            .map(|base| self.font.metrics(base, self.px()).advance_width)
            .unwrap_or(0.0)
    }

    /// Rendered size of `text` on a single row.
    pub fn measure(&self, text: &str) -> Size {
        let width: f32 = text.graphemes(true).map(|cluster| self.cluster_advance(cluster)).sum();
        Size {
            width: width.ceil() as Pixel,
            height: self.line_height(),
        }
    }
}
