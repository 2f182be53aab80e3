//! ASCII art dumps of glyph cells, for eyeballing a conversion.

use crate::canvas::{Canvas, GlyphRaster};
use crate::geometry::Pos2D;
use crate::normalize::Placement;
use crate::tier::CellLayout;

/// Intensity ramp, indexed by the top two bits of the coverage.
const RAMP: &[u8; 4] = b".++8";

/// Render a grayscale raster, one line per row.
///
/// With an `origin`, inkless pixels just left of the pen column show as `]` and
/// inkless pixels on the row right above the baseline show as `_`.
pub fn ascii_art<C: Canvas>(raster: &C, origin: Option<Pos2D>) -> String {
    let mut buf = String::with_capacity(((raster.width() + 1) * raster.height()).max(0) as usize);
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let coverage = raster.coverage((x, y).into());
            let ch = match origin {
                Some(o) if coverage >> 6 == 0 && x == o.x - 1 => ']',
                Some(o) if coverage >> 6 == 0 && y == o.y - 1 => '_',
                _ => RAMP[(coverage >> 6) as usize] as char,
            };
            buf.push(ch);
        }
        buf.push('\n');
    }
    buf
}

/// Render a packed cell, `@` for set bits and `.` for unset ones. Row padding is not shown.
pub fn packed_art(cell: &[u8], layout: &CellLayout) -> String {
    let mut buf = String::with_capacity((layout.width as usize + 1) * layout.height as usize);
    for row in cell.chunks(layout.bytes_per_row).take(layout.height as usize) {
        for x in 0..layout.width as usize {
            let set = row.get(x / 8).is_some_and(|b| b & (0x80 >> (x % 8)) != 0);
            buf.push(if set { '@' } else { '.' });
        }
        buf.push('\n');
    }
    buf
}

/// One generated cell, before and after packing.
pub struct GlyphSample<'s> {
    pub tier: usize,
    pub ch: char,
    /// The cell-sized grayscale raster that was packed.
    pub raster: &'s GlyphRaster,
    pub placement: &'s Placement,
    pub cell: &'s [u8],
    pub layout: &'s CellLayout,
}

impl GlyphSample<'_> {
    /// Pen origin within `raster`. Scaled glyphs have no pixel-exact origin.
    pub fn origin(&self) -> Option<Pos2D> {
        (!self.placement.overflow).then_some(self.placement.origin)
    }
}

/// Receives every printable cell of a conversion.
pub trait GlyphPreview {
    fn preview(&mut self, sample: &GlyphSample<'_>);
}

/// Dumps cells into the log at trace level.
pub struct TracePreview;

impl GlyphPreview for TracePreview {
    fn preview(&mut self, sample: &GlyphSample<'_>) {
        log::trace!(
            "tier {} {:?}{}\n{}\n{}",
            sample.tier,
            sample.ch,
            if sample.placement.overflow { " (scaled)" } else { "" },
            ascii_art(sample.raster, sample.origin()),
            packed_art(sample.cell, sample.layout)
        );
    }
}
