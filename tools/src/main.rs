// generate HZK bitmap fonts from every otf/ttf font file found under the given roots,
// taking the non-generated regions from a template HZK file.

mod logger;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::Parser;
use hzkfont::{convert_files, GlyphPreview, TierSet, TracePreview};
use log::{error, info, warn};

const DEFAULT_TEMPLATE: &str = "0T5UIC1.HZK";
const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

#[derive(Parser, Debug)]
#[command(name = "hzkgen")]
#[command(about = "Render outline fonts into HZK bitmap fonts", long_about = None)]
struct Cli {
    /// Directories (searched recursively) or font files to convert
    #[arg(default_value = ".")]
    roots: Vec<PathBuf>,

    /// Template HZK file providing control cells, DEL cells and trailer
    #[arg(long, short = 't', default_value = DEFAULT_TEMPLATE)]
    template: PathBuf,

    /// Directory receiving the generated files
    #[arg(long, short = 'o', default_value = ".")]
    out_dir: PathBuf,

    /// Dump every generated glyph as ASCII art (needs -vv)
    #[arg(long)]
    preview: bool,

    /// More logging; repeat for trace
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn is_font(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect font files under `roots`, in walk order.
fn find_fonts(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut fonts = Vec::new();
    for root in roots {
        for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_font(entry.path()) => {
                    fonts.push(entry.into_path());
                }
                Ok(_) => {}
                Err(err) => warn!("Failure accessing {}", err),
            }
        }
    }
    fonts
}

/// `<template stem>_<font stem>.<template extension>` inside `out_dir`.
fn output_path(template: &Path, font: &Path, out_dir: &Path) -> Option<PathBuf> {
    let template_stem = template.file_stem()?.to_string_lossy();
    let font_stem = font.file_stem()?.to_string_lossy();
    let mut name = format!("{}_{}", template_stem, font_stem);
    if let Some(ext) = template.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    Some(out_dir.join(name))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(logger::filter_for(cli.verbose, cli.quiet))?;

    let tiers = TierSet::standard();
    let fonts = find_fonts(&cli.roots);
    if fonts.is_empty() {
        warn!("no otf/ttf fonts found");
    }

    let mut failed = 0;
    for font in &fonts {
        let Some(output) = output_path(&cli.template, font, &cli.out_dir) else {
            error!("cannot derive an output name for {}", font.display());
            failed += 1;
            continue;
        };

        info!("Processing: {}", font.display());
        let mut tracer = TracePreview;
        let preview = cli.preview.then_some(&mut tracer as &mut dyn GlyphPreview);

        match convert_files(&cli.template, font, &output, &tiers, preview) {
            Ok(report) => info!(
                "wrote {} ({} bytes, {} glyphs scaled to fit)",
                output.display(),
                report.bytes_written,
                report.overflowed_glyphs
            ),
            Err(err) => {
                error!("{} failed at {}: {}", font.display(), err.stage(), err);
                failed += 1;
            }
        }
    }

    info!("{} of {} fonts converted", fonts.len() - failed, fonts.len());
    if failed > 0 {
        anyhow::bail!("{} fonts failed", failed);
    }
    Ok(())
}
