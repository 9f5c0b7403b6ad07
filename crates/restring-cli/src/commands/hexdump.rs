//! Hexdump command implementation.
//!
//! Displays raw image bytes in traditional hexdump format, useful for
//! checking what sits around a string before declaring a free range.
//!
//! # Output Format
//!
//! ```text
//! 0x04F000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use restring_core::FwImage;

use super::hex_utils::parse_offset;

pub fn run(image_path: &Path, offset_arg: &str, size: usize, ascii: bool) -> Result<()> {
    let offset = parse_offset(offset_arg)?;
    let image = FwImage::load(image_path)
        .with_context(|| format!("Failed to read image {}", image_path.display()))?;

    if offset >= image.len() {
        bail!(
            "Offset 0x{:X} is past the end of the image ({} bytes)",
            offset,
            image.len()
        );
    }
    let end = offset.saturating_add(size).min(image.len());
    let bytes = &image.bytes()[offset..end];

    println!(
        "Hexdump of {} at 0x{:X} ({} bytes):",
        image_path.display(),
        offset,
        bytes.len()
    );
    println!();

    for (i, chunk) in bytes.chunks(16).enumerate() {
        print!("0x{:06X}: ", offset + i * 16);

        // Hex bytes
        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                print!(" ");
            }
            print!("{byte:02X} ");
        }

        // Padding for incomplete lines
        if chunk.len() < 16 {
            for j in chunk.len()..16 {
                if j == 8 {
                    print!(" ");
                }
                print!("   ");
            }
        }

        // ASCII representation
        if ascii {
            print!(" |");
            for byte in chunk {
                if *byte >= 0x20 && *byte < 0x7F {
                    print!("{}", *byte as char);
                } else {
                    print!(".");
                }
            }
            for _ in chunk.len()..16 {
                print!(" ");
            }
            print!("|");
        }

        println!();
    }

    Ok(())
}
