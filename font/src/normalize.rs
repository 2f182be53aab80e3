//! Fitting rendered glyphs into the fixed cell of a size tier.

use crate::canvas::{Canvas, GlyphRaster};
use crate::geometry::{GlyphBounds, Pos2D};
use crate::outline::RenderedGlyph;
use crate::tier::SizeTier;

/// Left margin, in pixels, ahead of the leftmost ink.
pub const LEFT_MARGIN: i32 = 2;
/// Padding added to the right edge of the ink when measuring a glyph.
pub const RIGHT_PADDING: i32 = 2;

/// Where a glyph goes within its canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Width of the canvas the glyph is drawn onto.
    pub canvas_width: u32,
    /// Pen origin on the canvas.
    pub origin: Pos2D,
    /// Whether the glyph is wider than the cell and has to be scaled down.
    pub overflow: bool,
}

/// Decide the canvas and pen origin of a glyph with natural extent `bounds`.
pub fn place(bounds: GlyphBounds, tier: &SizeTier) -> Placement {
    let char_width = bounds.max_x + RIGHT_PADDING;
    let origin = Pos2D::from((LEFT_MARGIN - bounds.min_x, tier.baseline()));
    let overflow = char_width > tier.width as i32;

    Placement {
        canvas_width: if overflow { char_width as u32 } else { tier.width },
        origin,
        overflow,
    }
}

/// Draw `glyph` onto a blank canvas per `placement`, scaling it down to the cell when it overflows.
/// The returned raster always has the exact cell size of `tier`.
pub fn compose(glyph: &RenderedGlyph, placement: &Placement, tier: &SizeTier) -> GlyphRaster {
    let mut canvas = GlyphRaster::new(placement.canvas_width, tier.height);
    let left_top = Pos2D::from((
        placement.origin.x + glyph.left,
        placement.origin.y - glyph.top,
    ));
    canvas.draw_over(&glyph.coverage, left_top);

    if placement.overflow {
        downscale(&canvas, tier.width, tier.height)
    } else {
        canvas
    }
}

/// Map destination index `d` to the two nearest source indices and the weight of the second one.
fn sample_axis(d: u32, scale: f64, src_len: u32) -> (u32, u32, f64) {
    let s = (d as f64 + 0.5) * scale - 0.5;
    if s < 0.0 {
        return (0, 0, 0.0);
    }
    let s0 = s as u32;
    let s1 = s0 + 1;
    if s1 >= src_len {
        return (src_len - 1, src_len - 1, 1.0);
    }
    (s0, s1, s - s0 as f64)
}

/// Approximate bilinear resampling of `src` to `width` x `height`.
///
/// Each destination pixel centre is mapped back into the source and blended from
/// its four nearest neighbours, clamping at the edges. Blending is done on 16-bit
/// intensities and truncated back to 8 bits.
pub fn downscale(src: &GlyphRaster, width: u32, height: u32) -> GlyphRaster {
    let mut dst = GlyphRaster::new(width, height);
    if src.width() <= 0 || src.height() <= 0 {
        return dst;
    }
    let (src_w, src_h) = (src.width() as u32, src.height() as u32);
    let x_scale = src_w as f64 / width as f64;
    let y_scale = src_h as f64 / height as f64;

    let wide = |x: u32, y: u32| src.coverage((x as i32, y as i32).into()) as f64 * 257.0;

    for dy in 0..height {
        let (sy0, sy1, y_frac) = sample_axis(dy, y_scale, src_h);
        for dx in 0..width {
            let (sx0, sx1, x_frac) = sample_axis(dx, x_scale, src_w);
            let top = (1.0 - x_frac) * wide(sx0, sy0) + x_frac * wide(sx1, sy0);
            let bottom = (1.0 - x_frac) * wide(sx0, sy1) + x_frac * wide(sx1, sy1);
            let blended = ((1.0 - y_frac) * top + y_frac * bottom) as u32;
            dst.render_pixel((dx as i32, dy as i32).into(), (blended >> 8) as u8);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(w: u32, h: u32, left: i32, top: i32, bounds: GlyphBounds) -> RenderedGlyph {
        let mut coverage = GlyphRaster::new(w, h);
        coverage.boundary().iterate_abs(|pos| coverage.render_pixel(pos, 255));
        RenderedGlyph { coverage, left, top, bounds }
    }

    #[test]
    fn fitting_glyph_keeps_cell_width() {
        let tier = SizeTier::new(1, 8);
        let placement = place(GlyphBounds::new(1, 5), &tier);
        assert_eq!(placement.canvas_width, 8);
        assert_eq!(placement.origin, Pos2D::from((1, 14)));
        assert!(!placement.overflow);
    }

    #[test]
    fn negative_bearing_shifts_ink_right() {
        let tier = SizeTier::new(1, 8);
        let placement = place(GlyphBounds::new(-1, 4), &tier);
        assert_eq!(placement.origin.x, 3);
        assert!(!placement.overflow);
    }

    #[test]
    fn exact_fit_is_not_overflow() {
        let tier = SizeTier::new(0, 6);
        assert!(!place(GlyphBounds::new(0, 4), &tier).overflow);
        let wide = place(GlyphBounds::new(0, 5), &tier);
        assert!(wide.overflow);
        assert_eq!(wide.canvas_width, 7);
    }

    #[test]
    fn compose_puts_ink_at_margin_and_above_baseline() {
        let tier = SizeTier::new(1, 8);
        let glyph = block(3, 4, 0, 4, GlyphBounds::new(0, 3));
        let placement = place(glyph.bounds, &tier);
        let raster = compose(&glyph, &placement, &tier);

        assert_eq!((raster.width(), raster.height()), (8, 16));
        // baseline row 14, ink rows 10..14, columns 2..5
        for y in 0..16 {
            for x in 0..8 {
                let inked = (2..5).contains(&x) && (10..14).contains(&y);
                assert_eq!(raster.coverage((x, y).into()) == 255, inked, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn overflowing_glyph_is_scaled_to_cell() {
        let tier = SizeTier::new(0, 6);
        let glyph = block(10, 6, 0, 6, GlyphBounds::new(0, 10));
        let placement = place(glyph.bounds, &tier);
        assert!(placement.overflow);
        assert_eq!(placement.canvas_width, 12);

        let raster = compose(&glyph, &placement, &tier);
        assert_eq!((raster.width(), raster.height()), (6, 12));
        assert!(raster.as_image().pixels().any(|p| p.0[0] > 0));
    }

    #[test]
    fn downscale_halves_solid_and_edges() {
        let mut src = GlyphRaster::new(4, 1);
        for x in 0..4 {
            src.render_pixel((x, 0).into(), if x < 2 { 255 } else { 0 });
        }
        let dst = downscale(&src, 2, 1);
        // centres map to source x = 0.5 and 2.5
        assert_eq!(dst.coverage((0, 0).into()), 255);
        assert_eq!(dst.coverage((1, 0).into()), 0);
    }

    #[test]
    fn downscale_blends_neighbours() {
        let mut src = GlyphRaster::new(3, 1);
        src.render_pixel((1, 0).into(), 200);
        let dst = downscale(&src, 2, 1);
        // centres map to x = 0.25 and x = 1.75, both a quarter of the middle column
        assert_eq!(dst.coverage((0, 0).into()), 50);
        assert_eq!(dst.coverage((1, 0).into()), 50);
    }
}
