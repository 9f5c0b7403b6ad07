//! Heuristic string discovery
//!
//! Firmware images carry no string table. Translatable strings are found by
//! scanning every 4-aligned word for values that look like pointers into the
//! image and land on a printable, null-terminated run of bytes. The same
//! aligned scan is reused in reverse to find every pointer referencing a
//! given string once it has moved.

mod report;

pub use report::{ScanEntry, ScanReport};

use memchr::memmem;

use crate::image::FwImage;
use crate::image::layout::POINTER_SIZE;

/// String-like bytes: printable ASCII plus tab, CR and LF.
pub fn is_string_char(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\r' | b'\n') || (0x20..=0x7E).contains(&byte)
}

/// Read the null-terminated string starting at `offset`.
///
/// Returns `None` when the offset is out of range, a non-string byte shows
/// up before the terminator, or the image ends unterminated. The returned
/// slice excludes the terminator and may be empty.
pub fn read_c_string(image: &FwImage, offset: usize) -> Option<&[u8]> {
    let bytes = image.bytes().get(offset..)?;
    for (i, &byte) in bytes.iter().enumerate() {
        if byte == 0 {
            return Some(&bytes[..i]);
        }
        if !is_string_char(byte) {
            return None;
        }
    }
    None
}

/// One discovered pointer/string pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringRef<'a> {
    /// File offset of the 4-byte pointer word.
    pub pointer_offset: usize,
    /// The address stored in the pointer word.
    pub address: u32,
    /// The referenced string, terminator excluded.
    pub string: &'a [u8],
}

/// Scanner for referenced strings in a firmware image.
pub struct StringScanner<'a> {
    image: &'a FwImage,
}

impl<'a> StringScanner<'a> {
    pub fn new(image: &'a FwImage) -> Self {
        Self { image }
    }

    /// Iterate every referenced string in ascending pointer-offset order.
    ///
    /// Pointers to empty strings are skipped; a lone terminator is not a
    /// translatable string.
    pub fn scan(&self) -> impl Iterator<Item = StringRef<'a>> + 'a {
        let image = self.image;
        aligned_words(image).filter_map(move |(pointer_offset, address)| {
            let target = image.offset_of(address)?;
            let string = read_c_string(image, target)?;
            if string.is_empty() {
                return None;
            }
            Some(StringRef {
                pointer_offset,
                address,
                string,
            })
        })
    }
}

/// Every offset where `key` occurs with a null terminator right after it.
///
/// The needle's single NUL is its last byte, so matches cannot overlap and
/// the non-overlapping search misses nothing.
pub fn find_occurrences(image: &FwImage, key: &[u8]) -> Vec<usize> {
    let mut needle = Vec::with_capacity(key.len() + 1);
    needle.extend_from_slice(key);
    needle.push(0);
    memmem::find_iter(image.bytes(), &needle).collect()
}

/// Every 4-aligned offset whose word holds the address of `offset`.
pub fn find_pointers_to(image: &FwImage, offset: usize) -> Vec<usize> {
    let target = image.address_of(offset);
    aligned_words(image)
        .filter(|&(_, word)| word == target)
        .map(|(pointer_offset, _)| pointer_offset)
        .collect()
}

/// Decode every 4-aligned offset that still holds a full word.
fn aligned_words(image: &FwImage) -> impl Iterator<Item = (usize, u32)> + '_ {
    (0..image.len().saturating_sub(POINTER_SIZE - 1))
        .step_by(POINTER_SIZE)
        .filter_map(move |offset| Some((offset, image.read_word(offset)?)))
}
