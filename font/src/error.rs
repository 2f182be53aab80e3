use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected size tier lists.
#[derive(Debug, Error)]
pub enum TierError {
    #[error("at least one size tier is required")]
    Empty,
    #[error("size tier {index} has zero width")]
    ZeroWidth { index: usize },
    #[error("size tier {index} is {width}px wide, its cell height would not fit in 32 bits")]
    TooWide { index: usize, width: u32 },
}

/// Failures of the outline rasterizer.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to initialize the font library: {0}")]
    Library(#[source] freetype::Error),
    #[error("failed to parse outline font: {0}")]
    Parse(#[source] freetype::Error),
    #[error("pixel height {pixel_height} is not supported")]
    UnsupportedSize { pixel_height: u32 },
    #[error("failed to size face to {pixel_height}px: {source}")]
    Size {
        pixel_height: u32,
        #[source]
        source: freetype::Error,
    },
    #[error("failed to render {ch:?}: {source}")]
    Render {
        ch: char,
        #[source]
        source: freetype::Error,
    },
    #[error("{ch:?} did not render to an 8-bit coverage bitmap")]
    PixelMode { ch: char },
}

/// Failures of a single file conversion. Each one aborts that conversion only.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot open template {}: {source}", path.display())]
    TemplateOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot open font {}: {source}", path.display())]
    FontOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse font {}: {source}", path.display())]
    FontParse {
        path: PathBuf,
        #[source]
        source: FontError,
    },
    #[error("cannot create output {}: {source}", path.display())]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot construct face for tier {tier} ({width}px): {source}")]
    FaceConstruction {
        tier: usize,
        width: u32,
        #[source]
        source: FontError,
    },
    #[error("cannot render {ch:?} at tier {tier}: {source}")]
    GlyphRender {
        tier: usize,
        ch: char,
        #[source]
        source: FontError,
    },
    #[error("template read failed at offset {offset}: {source}")]
    TemplateRead {
        offset: u64,
        #[source]
        source: io::Error,
    },
    #[error("template seek to offset {offset} failed: {source}")]
    TemplateSeek {
        offset: u64,
        #[source]
        source: io::Error,
    },
    #[error("output write failed: {0}")]
    OutputWrite(#[source] io::Error),
}

impl ConvertError {
    /// Short name of the conversion stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            ConvertError::TemplateOpen { .. } => "template open",
            ConvertError::FontOpen { .. } => "font open",
            ConvertError::FontParse { .. } => "font parse",
            ConvertError::OutputCreate { .. } => "output create",
            ConvertError::FaceConstruction { .. } => "face construction",
            ConvertError::GlyphRender { .. } => "glyph render",
            ConvertError::TemplateRead { .. } => "template read",
            ConvertError::TemplateSeek { .. } => "template seek",
            ConvertError::OutputWrite(_) => "output write",
        }
    }
}
