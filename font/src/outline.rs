//! The outline rasterizer: turns characters of an outline font into 8-bit coverage bitmaps.

extern crate freetype as ft;

use std::rc::Rc;

use crate::canvas::{Canvas, GlyphRaster};
use crate::error::FontError;
use crate::geometry::GlyphBounds;

/// A glyph rendered at its native resolution, positioned relative to the pen origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedGlyph {
    /// Ink coverage of the glyph bitmap.
    pub coverage: GlyphRaster,
    /// Columns from the pen origin to the left edge of the bitmap.
    pub left: i32,
    /// Rows from the pen origin (baseline) up to the top edge of the bitmap.
    pub top: i32,
    /// Horizontal outline extent, used to detect glyphs wider than the cell.
    pub bounds: GlyphBounds,
}

/// A face bound to a single pixel height.
pub trait GlyphFace {
    fn render(&self, ch: char) -> Result<RenderedGlyph, FontError>;
}

/// An outline font which can produce faces at arbitrary pixel heights.
pub trait OutlineFont {
    type Face<'a>: GlyphFace
    where
        Self: 'a;

    fn face(&self, pixel_height: u32) -> Result<Self::Face<'_>, FontError>;
}

/// An outline font parsed by FreeType.
pub struct FreeTypeFont {
    // declared first so that the face is released before its library.
    face: ft::Face,
    _library: ft::Library,
}

impl FreeTypeFont {
    /// Parse a TrueType/OpenType font from its file contents.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        let library = ft::Library::init().map_err(FontError::Library)?;
        let face = library
            .new_memory_face(Rc::new(bytes), 0)
            .map_err(FontError::Parse)?;
        Ok(Self { face, _library: library })
    }

    pub fn family_name(&self) -> Option<String> {
        self.face.family_name()
    }
}

impl OutlineFont for FreeTypeFont {
    type Face<'a> = FreeTypeFace<'a>;

    /// Size the underlying face to `pixel_height`.
    /// The face is shared, so only the most recently sized face renders at its own size.
    fn face(&self, pixel_height: u32) -> Result<FreeTypeFace<'_>, FontError> {
        if pixel_height == 0 {
            return Err(FontError::UnsupportedSize { pixel_height });
        }
        // a height of N points at 72 DPI is N pixels.
        self.face
            .set_char_size(0, (pixel_height as isize) * 64, 72, 72)
            .map_err(|source| FontError::Size { pixel_height, source })?;
        Ok(FreeTypeFace { face: &self.face })
    }
}

pub struct FreeTypeFace<'a> {
    face: &'a ft::Face,
}

/// Outlines only: no hinting, and embedded bitmap strikes are never used, even at
/// pixel sizes the font carries them for.
fn load_flags() -> ft::face::LoadFlag {
    ft::face::LoadFlag::RENDER | ft::face::LoadFlag::NO_HINTING | ft::face::LoadFlag::NO_BITMAP
}

impl GlyphFace for FreeTypeFace<'_> {
    fn render(&self, ch: char) -> Result<RenderedGlyph, FontError> {
        self.face
            .load_char(ch as usize, load_flags())
            .map_err(|source| FontError::Render { ch, source })?;

        let glyph = self.face.glyph();
        let metrics = glyph.metrics();
        let bounds = GlyphBounds::from_26_6(metrics.horiBearingX as i64, metrics.width as i64);

        let bitmap = glyph.bitmap();
        // blank glyphs such as the space may come back without a pixel mode.
        if bitmap.width() > 0 && bitmap.rows() > 0 {
            match bitmap.pixel_mode() {
                Ok(ft::bitmap::PixelMode::Gray) => {}
                Ok(_) => return Err(FontError::PixelMode { ch }),
                Err(source) => return Err(FontError::Render { ch, source }),
            }
        }

        Ok(RenderedGlyph {
            coverage: copy_bitmap(&bitmap),
            left: glyph.bitmap_left(),
            top: glyph.bitmap_top(),
            bounds,
        })
    }
}

/// Copy a FreeType gray bitmap, honoring its row pitch.
fn copy_bitmap(bitmap: &ft::Bitmap) -> GlyphRaster {
    let w = bitmap.width().max(0);
    let rows = bitmap.rows().max(0);
    let pitch = bitmap.pitch();
    let buffer = bitmap.buffer();

    let mut raster = GlyphRaster::new(w as u32, rows as u32);
    for q in 0..rows {
        // a negative pitch means the rows flow bottom-up.
        let row_start = if pitch >= 0 { q * pitch } else { (rows - 1 - q) * -pitch };
        for p in 0..w {
            if let Some(&coverage) = buffer.get((row_start + p) as usize) {
                raster.render_pixel((p, q).into(), coverage);
            }
        }
    }
    raster
}

#[cfg(test)]
mod tests {
    use super::*;
    use freetype::face::LoadFlag;

    use crate::normalize::place;
    use crate::tier::{SizeTier, TierSet};

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSans.ttf");

    fn dejavu() -> FreeTypeFont {
        FreeTypeFont::from_bytes(std::fs::read(FIXTURE).unwrap()).unwrap()
    }

    #[test]
    fn glyphs_load_from_outlines() {
        let flags = load_flags();
        assert!(flags.contains(LoadFlag::NO_BITMAP));
        assert!(flags.contains(LoadFlag::NO_HINTING));
        assert!(flags.contains(LoadFlag::RENDER));
    }

    #[test]
    fn family_name_is_read() {
        assert_eq!(dejavu().family_name().as_deref(), Some("DejaVu Sans"));
    }

    #[test]
    fn zero_height_is_refused() {
        let font = dejavu();
        assert!(matches!(font.face(0), Err(FontError::UnsupportedSize { pixel_height: 0 })));
    }

    #[test]
    fn space_is_blank() {
        let font = dejavu();
        let glyph = font.face(20).unwrap().render(' ').unwrap();
        assert_eq!(glyph.coverage.width(), 0);
        assert_eq!(glyph.coverage.height(), 0);
        assert_eq!(glyph.bounds, GlyphBounds::default());
    }

    #[test]
    fn descender_hangs_left_of_the_pen() {
        let font = dejavu();
        let tier = *TierSet::standard().get(9).unwrap();
        let glyph = font.face(tier.height).unwrap().render('j').unwrap();
        assert!(glyph.bounds.min_x < 0, "{:?}", glyph.bounds);
        assert!(glyph.left < 0, "left {}", glyph.left);
        // the tail drops below the baseline
        assert!(glyph.coverage.height() > glyph.top);
    }

    #[test]
    fn bitmap_is_copied_row_by_row() {
        let font = dejavu();
        let glyph = font.face(32).unwrap().render('A').unwrap();

        let bitmap = font.face.glyph().bitmap();
        assert_eq!(glyph.coverage.width(), bitmap.width());
        assert_eq!(glyph.coverage.height(), bitmap.rows());
        assert!(bitmap.width() > 0 && bitmap.rows() > 0);

        let pitch = bitmap.pitch().abs() as usize;
        let buffer = bitmap.buffer();
        let mut ink = 0;
        glyph.coverage.boundary().iterate_abs(|pos| {
            let row = if bitmap.pitch() >= 0 { pos.y } else { bitmap.rows() - 1 - pos.y };
            let expected = buffer[row as usize * pitch + pos.x as usize];
            assert_eq!(glyph.coverage.coverage(pos), expected, "at {:?}", pos);
            ink += (expected > 0) as usize;
        });
        assert!(ink > 0);
    }

    #[test]
    fn wide_capital_overflows_the_smallest_cell() {
        let font = dejavu();
        let tier = SizeTier::new(0, 6);
        let glyph = font.face(tier.height).unwrap().render('W').unwrap();
        let placement = place(glyph.bounds, &tier);
        assert!(placement.overflow, "{:?}", glyph.bounds);
        assert!(placement.canvas_width > tier.width);
    }

    #[test]
    fn narrow_letter_fits_the_largest_cell() {
        let font = dejavu();
        let tier = *TierSet::standard().get(9).unwrap();
        let glyph = font.face(tier.height).unwrap().render('i').unwrap();
        assert!(!place(glyph.bounds, &tier).overflow);
    }
}
