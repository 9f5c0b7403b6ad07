//! Patch command implementation.
//!
//! Wires the full pipeline together: load the image and the strings file,
//! collect free ranges from config and the command line, run the patch
//! engine, then write the image, the summary and the optional JSON
//! report. All human-readable output goes to stderr, since the patched
//! image itself may be streaming to stdout.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use restring_core::{
    FreeRange, FwImage, KeyOutcome, Patcher, TranslationTable, resolve_encoding,
};

use super::hex_utils::parse_range;
use crate::config::Config;

#[allow(clippy::too_many_arguments)]
pub fn run(
    image_path: &Path,
    output: Option<&Path>,
    strings: Option<&Path>,
    force: bool,
    range_args: &[String],
    encoding_label: Option<&str>,
    config_path: &Path,
    report_path: Option<&Path>,
) -> Result<()> {
    let config = Config::load_or_default(config_path);

    let encoding = match encoding_label.or(config.encoding.as_deref()) {
        Some(label) => resolve_encoding(label)?,
        None => encoding_rs::UTF_8,
    };

    let data = fs::read(image_path)
        .with_context(|| format!("Failed to read image {}", image_path.display()))?;
    let mut image = match config.base_address {
        Some(base) => FwImage::with_base(data, base),
        None => FwImage::new(data),
    };
    eprintln!(
        "Loaded {} ({} bytes, base 0x{:X})",
        image_path.display(),
        image.len(),
        image.base()
    );

    let table = match strings {
        Some(path) => TranslationTable::load(path, encoding)
            .with_context(|| format!("Failed to read strings file {}", path.display()))?,
        None => TranslationTable::from_reader(io::stdin().lock(), encoding)
            .context("Failed to read strings from stdin")?,
    };
    eprintln!("Loaded {} translation(s), encoding {}", table.len(), encoding.name());

    let mut ranges: Vec<FreeRange> = config.free_ranges();
    for arg in range_args {
        ranges.push(parse_range(arg)?);
    }

    let report = Patcher::with_ranges(&mut image, ranges)?
        .force(force || config.force)
        .run(&table);

    eprintln!();
    eprintln!(
        "Processed {} key(s): {} replaced, {} relocated, {} not found, {} unreferenced",
        report.keys.len(),
        report.count(KeyOutcome::Replaced),
        report.count(KeyOutcome::Relocated),
        report.count(KeyOutcome::NotFound),
        report.count(KeyOutcome::Unreferenced),
    );
    eprintln!(
        "{} in-place write(s), {} pointer(s) updated, {} byte(s) appended",
        report.in_place_writes, report.pointers_updated, report.bytes_appended,
    );
    for warning in &report.warnings {
        eprintln!("  warning: {warning}");
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        eprintln!("Report saved to {}", path.display());
    }

    // The image is written even after an abort: everything before the
    // failing key is already translated and consistent.
    match output {
        Some(path) => {
            image
                .save(path)
                .with_context(|| format!("Failed to write image {}", path.display()))?;
            eprintln!("Saved {} ({} bytes)", path.display(), image.len());
        }
        None => {
            image.write_to(io::stdout().lock())?;
            io::stdout().flush()?;
        }
    }

    if report.aborted {
        bail!("no space left in the image; output is only partially translated");
    }
    Ok(())
}
