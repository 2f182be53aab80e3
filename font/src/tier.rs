//! Size tiers of the bitmap font and the byte layout of their glyph cells.

use crate::error::TierError;

/// Cell widths of the standard HZK layout, in rendering (and file) order.
pub const STANDARD_WIDTHS: [u32; 10] = [6, 8, 10, 12, 14, 16, 20, 24, 28, 32];

/// Number of control character cells (codes 0..32) leading each tier.
pub const CONTROL_CELLS: u64 = 32;
/// Number of printable character cells (codes 32..127) in each tier.
pub const PRINTABLE_CELLS: u64 = 95;
/// The DEL cell (code 127) trailing every tier but the last.
pub const DEL_CELLS: u64 = 1;

/// Printable characters, in the order they are laid out.
pub const PRINTABLE: core::ops::RangeInclusive<char> = ' '..='~';

/// Widest accepted tier; cells are twice as tall as they are wide.
pub const MAX_WIDTH: u32 = u32::MAX / 2;

/// One pixel size of the font.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SizeTier {
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

impl SizeTier {
    pub fn new(index: usize, width: u32) -> Self {
        Self { index, width, height: 2 * width }
    }

    pub fn layout(&self) -> CellLayout {
        CellLayout::new(self.width, self.height)
    }

    /// Baseline row, fixed at a third of the width above the bottom of the cell.
    pub fn baseline(&self) -> i32 {
        (self.height - self.width / 3) as i32
    }
}

/// The fixed footprint of every glyph bitmap in a tier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellLayout {
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: usize,
}

impl CellLayout {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bytes_per_row: (width as usize).div_ceil(8),
        }
    }

    /// Bytes occupied by one glyph cell.
    pub fn cell_bytes(&self) -> usize {
        self.bytes_per_row * self.height as usize
    }

    pub fn cells(&self, count: u64) -> u64 {
        count * self.cell_bytes() as u64
    }
}

/// An ordered, immutable sequence of size tiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierSet {
    tiers: Vec<SizeTier>,
}

impl TierSet {
    pub fn standard() -> Self {
        Self::build(&STANDARD_WIDTHS)
    }

    pub fn from_widths(widths: &[u32]) -> Result<Self, TierError> {
        if widths.is_empty() {
            return Err(TierError::Empty);
        }
        if let Some(index) = widths.iter().position(|&w| w == 0) {
            return Err(TierError::ZeroWidth { index });
        }
        if let Some(index) = widths.iter().position(|&w| w > MAX_WIDTH) {
            return Err(TierError::TooWide { index, width: widths[index] });
        }
        Ok(Self::build(widths))
    }

    fn build(widths: &[u32]) -> Self {
        let tiers = widths
            .iter()
            .enumerate()
            .map(|(index, &width)| SizeTier::new(index, width))
            .collect();
        Self { tiers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SizeTier> {
        self.tiers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SizeTier> {
        self.tiers.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Whether `tier` is the final tier, which carries no DEL cell.
    pub fn is_last(&self, tier: &SizeTier) -> bool {
        tier.index + 1 == self.tiers.len()
    }

    /// Bytes of a whole tier: control, printable and (unless last) DEL cells.
    pub fn tier_len(&self, tier: &SizeTier) -> u64 {
        let del = if self.is_last(tier) { 0 } else { DEL_CELLS };
        tier.layout().cells(CONTROL_CELLS + PRINTABLE_CELLS + del)
    }

    /// Length of everything ahead of the trailer.
    /// Template and output share this layout, so this is also where the trailer starts in both.
    pub fn generated_len(&self) -> u64 {
        self.iter().map(|tier| self.tier_len(tier)).sum()
    }
}

impl Default for TierSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a TierSet {
    type Item = &'a SizeTier;
    type IntoIter = core::slice::Iter<'a, SizeTier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}
