//! Scan command implementation.
//!
//! Lists every referenced string the discovery heuristic finds in an
//! image. The plain mode prints one escaped string per line so the output
//! can be edited into a strings file; the default mode is a readable
//! listing with pointer locations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use restring_core::{FwImage, ScanReport, StringScanner, escape};

pub fn run(image_path: &Path, plain: bool, json: Option<&Path>) -> Result<()> {
    let image = FwImage::load(image_path)
        .with_context(|| format!("Failed to read image {}", image_path.display()))?;

    if let Some(path) = json {
        let report = ScanReport::collect(&image);
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Failed to write scan report {}", path.display()))?;
        println!(
            "Saved {} string(s) to {}",
            report.strings.len(),
            path.display()
        );
        return Ok(());
    }

    let scanner = StringScanner::new(&image);

    if plain {
        // Strings go to stdout so they can be piped into a file; keep the
        // status line out of the way on stderr.
        let mut count = 0usize;
        for string_ref in scanner.scan() {
            println!("{}", escape(string_ref.string));
            count += 1;
        }
        eprintln!("Found {count} referenced string(s)");
        return Ok(());
    }

    println!(
        "Referenced strings in {} ({} bytes, base 0x{:X}):",
        image_path.display(),
        image.len(),
        image.base()
    );
    println!();
    let mut count = 0usize;
    for string_ref in scanner.scan() {
        println!(
            "  0x{:06X} -> 0x{:08X}  {}",
            string_ref.pointer_offset,
            string_ref.address,
            escape(string_ref.string)
        );
        count += 1;
    }
    println!();
    println!("Found {count} referenced string(s)");

    Ok(())
}
