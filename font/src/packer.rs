//! Packing grayscale rasters into the 1-bit cell format.
//!
//! Rows are stored top to bottom, each padded to whole bytes, with the leftmost pixel of
//! every byte in its most significant bit.

use crate::canvas::Canvas;
use crate::tier::CellLayout;

/// Intensities are judged by their top two bits; anything from 64 up is ink.
pub const INK_SHIFT: u32 = 6;

#[inline]
pub fn is_ink(coverage: u8) -> bool {
    coverage >> INK_SHIFT > 0
}

/// Pack `raster` into exactly `layout.cell_bytes()` bytes.
///
/// Columns at or beyond `layout.width` are always unset, and pixels the raster
/// does not cover count as unset too.
pub fn pack<C: Canvas>(raster: &C, layout: &CellLayout) -> Vec<u8> {
    let mut buf = Vec::with_capacity(layout.cell_bytes());
    for y in 0..layout.height as i32 {
        for j in 0..layout.bytes_per_row {
            let byte = (0..8).fold(0u8, |acc, k| {
                let x = (j * 8 + k) as i32;
                let bit = x < layout.width as i32 && is_ink(raster.coverage((x, y).into()));
                (acc << 1) | bit as u8
            });
            buf.push(byte);
        }
    }
    buf
}
