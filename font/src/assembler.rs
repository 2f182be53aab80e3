//! Interleaving generated glyph cells with regions copied from the template.
//!
//! Per tier the file holds the control cells (copied), the printable cells (generated)
//! and, on every tier but the last, the DEL cell (copied). The template trailer follows.

use std::io::{self, Read, Seek, SeekFrom, Write};

use log::{debug, trace};

use crate::error::ConvertError;
use crate::normalize::{compose, place};
use crate::outline::{GlyphFace, OutlineFont};
use crate::packer::pack;
use crate::preview::{GlyphPreview, GlyphSample};
use crate::tier::{SizeTier, TierSet, CONTROL_CELLS, DEL_CELLS, PRINTABLE, PRINTABLE_CELLS};

/// Read position in the template.
///
/// It advances over copied and generated regions alike, because the template holds
/// a region of the same size where the output holds generated cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemplateCursor(u64);

impl TemplateCursor {
    pub const START: TemplateCursor = TemplateCursor(0);

    pub fn offset(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn advance(self, bytes: u64) -> TemplateCursor {
        TemplateCursor(self.0 + bytes)
    }
}

/// States of the assembly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Control character cells, copied from the template.
    Control(SizeTier),
    /// Printable character cells, rendered from the outline font.
    Printable(SizeTier),
    /// The DEL cell, copied from the template unless the tier is the last one.
    Del(SizeTier),
    /// Everything left in the template, copied.
    Trailer,
    Done,
}

impl Phase {
    pub fn first(tiers: &TierSet) -> Phase {
        tiers.get(0).copied().map_or(Phase::Trailer, Phase::Control)
    }

    pub fn next(self, tiers: &TierSet) -> Phase {
        match self {
            Phase::Control(tier) => Phase::Printable(tier),
            Phase::Printable(tier) => Phase::Del(tier),
            Phase::Del(tier) => tiers
                .get(tier.index + 1)
                .copied()
                .map_or(Phase::Trailer, Phase::Control),
            Phase::Trailer | Phase::Done => Phase::Done,
        }
    }

    /// Template bytes the phase covers. The trailer covers whatever is left, so it reports zero.
    pub fn template_advance(self, tiers: &TierSet) -> u64 {
        match self {
            Phase::Control(tier) => tier.layout().cells(CONTROL_CELLS),
            Phase::Printable(tier) => tier.layout().cells(PRINTABLE_CELLS),
            // the final tier has no DEL cell.
            Phase::Del(tier) if tiers.is_last(&tier) => 0,
            Phase::Del(tier) => tier.layout().cells(DEL_CELLS),
            Phase::Trailer | Phase::Done => 0,
        }
    }
}

/// Summary of a finished conversion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Total bytes written to the output.
    pub bytes_written: u64,
    /// Bytes of the trailer copied from the template.
    pub trailer_bytes: u64,
    /// Glyphs that were wider than their cell and got scaled down.
    pub overflowed_glyphs: usize,
}

/// Drives the phases of a single conversion.
pub struct Assembler<'a, 'p, R, W, F> {
    template: R,
    output: W,
    font: &'a F,
    tiers: &'a TierSet,
    preview: Option<&'p mut dyn GlyphPreview>,
    report: ConversionReport,
}

impl<'a, 'p, R, W, F> Assembler<'a, 'p, R, W, F>
where
    R: Read + Seek,
    W: Write,
    F: OutlineFont,
{
    pub fn new(template: R, output: W, font: &'a F, tiers: &'a TierSet) -> Self {
        Self {
            template,
            output,
            font,
            tiers,
            preview: None,
            report: ConversionReport::default(),
        }
    }

    pub fn with_preview(mut self, preview: &'p mut dyn GlyphPreview) -> Self {
        self.preview = Some(preview);
        self
    }

    /// Run every phase and flush the output.
    pub fn run(mut self) -> Result<ConversionReport, ConvertError> {
        let mut phase = Phase::first(self.tiers);
        let mut cursor = TemplateCursor::START;
        while phase != Phase::Done {
            cursor = self.step(phase, cursor)?;
            phase = phase.next(self.tiers);
        }
        self.output.flush().map_err(ConvertError::OutputWrite)?;
        Ok(self.report)
    }

    /// Execute `phase` with the template at `cursor`, returning the cursor after it.
    pub fn step(&mut self, phase: Phase, cursor: TemplateCursor) -> Result<TemplateCursor, ConvertError> {
        let len = phase.template_advance(self.tiers);
        match phase {
            Phase::Control(tier) => {
                debug!(
                    "tier {} ({}x{}): control cells at {}",
                    tier.index, tier.width, tier.height, cursor.offset()
                );
                self.copy(cursor, len)
            }
            Phase::Printable(tier) => {
                self.render_tier(&tier)?;
                Ok(cursor.advance(len))
            }
            Phase::Del(tier) => {
                // skip the template's printable cells, which were never read.
                let offset = cursor.offset();
                self.template
                    .seek(SeekFrom::Start(offset))
                    .map_err(|source| ConvertError::TemplateSeek { offset, source })?;
                if len == 0 {
                    debug!("tier {}: last tier, no DEL cell", tier.index);
                    return Ok(cursor);
                }
                self.copy(cursor, len)
            }
            Phase::Trailer => {
                let copied = self.copy_rest(cursor)?;
                debug!("trailer: {} bytes from {}", copied, cursor.offset());
                self.report.trailer_bytes = copied;
                Ok(cursor.advance(copied))
            }
            Phase::Done => Ok(cursor),
        }
    }

    fn render_tier(&mut self, tier: &SizeTier) -> Result<(), ConvertError> {
        let font = self.font;
        let face = font
            .face(tier.height)
            .map_err(|source| ConvertError::FaceConstruction {
                tier: tier.index,
                width: tier.width,
                source,
            })?;
        let layout = tier.layout();

        for ch in PRINTABLE {
            let glyph = face
                .render(ch)
                .map_err(|source| ConvertError::GlyphRender { tier: tier.index, ch, source })?;

            let placement = place(glyph.bounds, tier);
            if placement.overflow {
                debug!(
                    "tier {}: {:?} is {}px wide, scaling into {}px",
                    tier.index, ch, placement.canvas_width, tier.width
                );
                self.report.overflowed_glyphs += 1;
            }

            let raster = compose(&glyph, &placement, tier);
            let cell = pack(&raster, &layout);
            debug_assert_eq!(cell.len(), layout.cell_bytes());

            if let Some(preview) = self.preview.as_deref_mut() {
                preview.preview(&GlyphSample {
                    tier: tier.index,
                    ch,
                    raster: &raster,
                    placement: &placement,
                    cell: &cell,
                    layout: &layout,
                });
            }
            self.write(&cell)?;
        }
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), ConvertError> {
        self.output.write_all(buf).map_err(ConvertError::OutputWrite)?;
        self.report.bytes_written += buf.len() as u64;
        Ok(())
    }

    /// Copy exactly `len` bytes from the template. Running out of template is an error.
    fn copy(&mut self, cursor: TemplateCursor, len: u64) -> Result<TemplateCursor, ConvertError> {
        trace!("copy {} bytes from {}", len, cursor.offset());
        let mut buf = vec![0; len as usize];
        self.template
            .read_exact(&mut buf)
            .map_err(|source| ConvertError::TemplateRead { offset: cursor.offset(), source })?;
        self.write(&buf)?;
        Ok(cursor.advance(len))
    }

    /// Copy the template to its end, returning the number of bytes copied.
    fn copy_rest(&mut self, cursor: TemplateCursor) -> Result<u64, ConvertError> {
        let copied = io::copy(&mut self.template, &mut self.output)
            .map_err(|source| ConvertError::TemplateRead { offset: cursor.offset(), source })?;
        self.report.bytes_written += copied;
        Ok(copied)
    }
}
