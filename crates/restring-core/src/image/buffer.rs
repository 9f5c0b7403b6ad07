use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::image::layout::{FIRMWARE_BASE, POINTER_SIZE};

/// A firmware image under patch.
///
/// Wraps the raw bytes of a flat dump together with the logical address it
/// is mapped at. All offsets are file offsets; [`FwImage::address_of`] and
/// [`FwImage::offset_of`] convert between offsets and pointer values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FwImage {
    data: Vec<u8>,
    base: u32,
}

impl FwImage {
    /// Wrap raw image bytes mapped at [`FIRMWARE_BASE`].
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_base(data, FIRMWARE_BASE)
    }

    /// Wrap raw image bytes mapped at a custom base address.
    pub fn with_base(data: Vec<u8>, base: u32) -> Self {
        Self { data, base }
    }

    /// Read an image from disk, mapped at [`FIRMWARE_BASE`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(fs::read(path)?))
    }

    /// Write the image bytes to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, &self.data)?;
        Ok(())
    }

    /// Write the image bytes to an arbitrary writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.data)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Logical address of a file offset.
    pub fn address_of(&self, offset: usize) -> u32 {
        self.base.wrapping_add(offset as u32)
    }

    /// File offset a pointer value refers to, or `None` when the value
    /// does not point inside the image.
    pub fn offset_of(&self, address: u32) -> Option<usize> {
        let offset = address.checked_sub(self.base)? as usize;
        (offset < self.data.len()).then_some(offset)
    }

    /// Decode the little-endian word at `offset`, or `None` when a full
    /// word does not fit before the end of the image.
    pub fn read_word(&self, offset: usize) -> Option<u32> {
        let b = self.data.get(offset..offset + POINTER_SIZE)?;
        Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Overwrite the word at `offset` with the little-endian encoding of
    /// `value`. The offset must leave room for a full word.
    pub fn write_word(&mut self, offset: usize, value: u32) {
        self.data[offset..offset + POINTER_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    /// Overwrite `bytes.len()` bytes at `offset`. The write must fit
    /// inside the current image.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Zero the bytes in `[start, end)`.
    pub fn zero_fill(&mut self, start: usize, end: usize) {
        self.data[start..end].fill(0);
    }

    /// Append raw bytes, growing the image.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }
}
