use std::collections::HashMap;
use std::rc::Rc;

use fontdue::Font;
use unicode_segmentation::UnicodeSegmentation;

use super::{DrawHandle, Drawable, Pixel};
use crate::graphics::color::Color;
use crate::graphics::text::FontMetrics;
use crate::layout::{Position, Rect};

/// Output of rasterization, for a given font and size.
///
/// Offsets are relative to the pen position on the baseline,
/// with `y` growing downwards like everything else on screen.
struct Raster {
    bitmap: Vec<u8>,
    bitmap_width: usize,

    /// From the pen position to the left edge of the bitmap
    left: i32,
    /// From the baseline up to the top edge of the bitmap
    top: i32,
}

impl Raster {
    fn rasterize(font: &Font, size: u16, character: char) -> Self {
        let (metrics, bitmap) = font.rasterize(character, f32::from(size));

        Self {
            bitmap,
            bitmap_width: metrics.width,
            left: metrics.xmin,
            // `ymin` is the offset of the bitmap's bottom edge from the baseline, upwards
            top: metrics.ymin + metrics.height as i32,
        }
    }
}

impl Drawable for Raster {
    /// `position` is the pen position on the baseline.
    fn draw_at(&self, handle: &mut DrawHandle, position: Position, color: Color, clip: Rect) {
        if self.bitmap_width == 0 {
            return;
        }
        for (row, coverage_row) in self.bitmap.chunks(self.bitmap_width).enumerate() {
            for (column, &coverage) in coverage_row.iter().enumerate() {
                if coverage == 0 {
                    continue;
                }
                let pixel = Position {
                    x: position.x + self.left + column as i32,
                    y: position.y - self.top + row as i32,
                };
                if clip.contains(pixel) {
                    handle.blend(pixel, color, coverage);
                }
            }
        }
    }
}

/// Glyph rasters keyed by character and pixel size.
///
/// Scrolling redraws the same few rows every frame, so rasterizing once per glyph pays off.
#[derive(Default)]
pub struct GlyphCache {
    rasters: HashMap<(char, u16), Rc<Raster>>,
}

impl GlyphCache {
    /// Font sizes change in steps of two, so a handful of sizes end up in here; past this we start over.
    const CAPACITY: usize = 4096;

    fn get(&mut self, font: &Font, size: u16, character: char) -> Rc<Raster> {
        if self.rasters.len() >= Self::CAPACITY && !self.rasters.contains_key(&(character, size)) {
            log::debug!("glyph cache full, clearing");
            self.rasters.clear();
        }
        Rc::clone(
            self.rasters
                .entry((character, size))
                .or_insert_with(|| Rc::new(Raster::rasterize(font, size, character))),
        )
    }

    pub fn clear(&mut self) {
        log::debug!("dropping {} cached glyphs", self.len());
        self.rasters.clear();
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }
}

/// A glyph placed on a row: its raster plus the pen offset from the start of the row.
struct Unit {
    pen: f32,
    raster: Rc<Raster>,
}

/// A single row of text, laid out and ready to draw.
pub struct TextLine {
    units: Vec<Unit>,
    width: Pixel,
    ascent: i32,
}

impl TextLine {
    /// Lays out `text` on one row.  Every character of a grapheme cluster is drawn at
    /// the cluster's pen position; only the cluster as a whole advances the pen.
    pub fn layout(text: &str, metrics: &FontMetrics, cache: &mut GlyphCache) -> Self {
        let mut units = Vec::with_capacity(text.len());
        let mut pen = 0.0;

        for cluster in text.graphemes(true) {
            for character in cluster.chars().filter(|c| !c.is_whitespace()) {
                units.push(Unit {
                    pen,
                    raster: cache.get(metrics.font, metrics.size, character),
                });
            }
            pen += metrics.cluster_advance(cluster);
        }

        Self {
            units,
            width: pen.ceil() as Pixel,
            ascent: metrics.ascent(),
        }
    }

    pub fn width(&self) -> Pixel {
        self.width
    }
}

impl Drawable for TextLine {
    /// `position` is the top left corner of the row.
    fn draw_at(&self, handle: &mut DrawHandle, position: Position, color: Color, clip: Rect) {
        let baseline = position.y + self.ascent;
        for unit in &self.units {
            unit.raster.draw_at(
                handle,
                Position {
                    x: position.x + unit.pen.round() as i32,
                    y: baseline,
                },
                color,
                clip,
            );
        }
    }
}
