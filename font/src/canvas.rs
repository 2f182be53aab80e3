use crate::geometry::{Disp2D, Pos2D, Rect2D};

use image::{GrayImage, Luma};

/// A grayscale canvas, holding one 8-bit ink coverage value per pixel.
pub trait Canvas {
    /// Returns the size of the canvas.
    fn size(&self) -> Disp2D;
    fn width(&self) -> i32 {
        self.size().dx
    }
    fn height(&self) -> i32 {
        self.size().dy
    }

    fn boundary(&self) -> Rect2D {
        Rect2D::from_lefttop_diag(Pos2D::ORIGIN, self.size())
    }

    /// Coverage at `pos`. Positions outside the canvas have no ink.
    fn coverage(&self, pos: Pos2D) -> u8;

    /// Write a coverage value into specific pixel. Positions outside the canvas are ignored.
    fn render_pixel(&mut self, pos: Pos2D, coverage: u8);
}

/// The transient raster of a single glyph at a single size tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRaster {
    image: GrayImage,
}

impl GlyphRaster {
    /// A blank (inkless) raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: GrayImage::new(width, height) }
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    fn contains(&self, pos: Pos2D) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }

    /// Draw `src` with its left top at `left_top`, clipped to this raster.
    /// Overlapping coverage keeps the stronger ink.
    pub fn draw_over(&mut self, src: &GlyphRaster, left_top: Pos2D) {
        let area = Rect2D::from_lefttop_diag(left_top, src.size()).bound(self.boundary());
        if area.is_empty() {
            return;
        }
        area.iterate_abs(|pos| {
            let ink = src.coverage(Pos2D::ORIGIN + (pos - left_top));
            let merged = self.coverage(pos).max(ink);
            self.render_pixel(pos, merged);
        });
    }
}

impl Canvas for GlyphRaster {
    fn size(&self) -> Disp2D {
        (self.image.width() as i32, self.image.height() as i32).into()
    }

    fn coverage(&self, pos: Pos2D) -> u8 {
        if !self.contains(pos) {
            return 0;
        }
        self.image.get_pixel(pos.x as u32, pos.y as u32).0[0]
    }

    fn render_pixel(&mut self, pos: Pos2D, coverage: u8) {
        if self.contains(pos) {
            self.image.put_pixel(pos.x as u32, pos.y as u32, Luma([coverage]));
        }
    }
}
