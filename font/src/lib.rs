//! Conversion of outline fonts into the fixed-layout HZK bitmap font format.
//!
//! An HZK file holds, for each of its size tiers, 128 glyph cells of 1-bit rows.
//! Only the printable cells are generated; the control cells, the DEL cells and the
//! trailer are carried over from a template HZK file.

pub mod geometry;
pub mod canvas;
pub mod tier;
pub mod outline;
pub mod normalize;
pub mod packer;
pub mod preview;
pub mod assembler;
pub mod error;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

pub use assembler::{Assembler, ConversionReport, Phase, TemplateCursor};
pub use error::{ConvertError, FontError, TierError};
pub use outline::{FreeTypeFont, GlyphFace, OutlineFont};
pub use preview::{GlyphPreview, GlyphSample, TracePreview};
pub use tier::{CellLayout, SizeTier, TierSet};

/// Convert a single font, reading the template and writing the output as streams.
pub fn convert<R, W, F>(
    template: R,
    font: &F,
    tiers: &TierSet,
    output: W,
    preview: Option<&mut dyn GlyphPreview>,
) -> Result<ConversionReport, ConvertError>
where
    R: Read + Seek,
    W: Write,
    F: OutlineFont,
{
    let assembler = Assembler::new(template, output, font, tiers);
    match preview {
        Some(preview) => assembler.with_preview(preview).run(),
        None => assembler.run(),
    }
}

/// Convert the outline font at `font_path` into a new HZK file at `output_path`.
///
/// Every handle is opened here and dropped on return, including early failures.
pub fn convert_files(
    template_path: &Path,
    font_path: &Path,
    output_path: &Path,
    tiers: &TierSet,
    preview: Option<&mut dyn GlyphPreview>,
) -> Result<ConversionReport, ConvertError> {
    let template = File::open(template_path).map_err(|source| ConvertError::TemplateOpen {
        path: template_path.to_path_buf(),
        source,
    })?;

    let bytes = std::fs::read(font_path).map_err(|source| ConvertError::FontOpen {
        path: font_path.to_path_buf(),
        source,
    })?;
    let font = FreeTypeFont::from_bytes(bytes).map_err(|source| ConvertError::FontParse {
        path: font_path.to_path_buf(),
        source,
    })?;
    if let Some(family) = font.family_name() {
        log::debug!("{}: family {}", font_path.display(), family);
    }

    let output = File::create(output_path).map_err(|source| ConvertError::OutputCreate {
        path: output_path.to_path_buf(),
        source,
    })?;

    convert(
        BufReader::new(template),
        &font,
        tiers,
        BufWriter::new(output),
        preview,
    )
}
