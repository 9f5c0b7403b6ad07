//! Relocation space management
//!
//! Strings that cannot be replaced in place move either into one of the
//! caller-designated free ranges inside the image, or into the append area
//! past the current image end. Ranges are tried first, in the order given;
//! the append area is the fallback and is capped by [`MAX_IMAGE_SIZE`].

use tracing::debug;

use crate::error::{Error, Result};
use crate::image::layout::MAX_IMAGE_SIZE;

/// A `[start, end)` interval of the image that is safe to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRange {
    start: usize,
    end: usize,
}

impl FreeRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Capacity not yet handed out.
    pub fn remaining(&self) -> usize {
        self.end - self.start
    }
}

/// Where an allocation landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationSource {
    /// Inside a designated free range; the bytes already exist.
    FreeRange,
    /// Past the image end; the buffer must grow by the allocation size.
    Append,
}

/// A reserved destination for one relocated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub offset: usize,
    pub source: AllocationSource,
}

/// Hands out relocation destinations, consuming each range from the front.
///
/// Space is never returned: once handed out, an offset stays reserved for
/// the rest of the run.
#[derive(Debug, Clone)]
pub struct AllocationArena {
    ranges: Vec<FreeRange>,
    /// Image length implied by the allocations so far.
    cursor: usize,
}

impl AllocationArena {
    /// Arena with no free ranges; every allocation appends.
    pub fn new(image_len: usize) -> Self {
        Self {
            ranges: Vec::new(),
            cursor: image_len,
        }
    }

    /// Arena backed by free ranges, tried in the order given.
    ///
    /// Every range must be non-empty and lie inside the image.
    pub fn with_ranges(image_len: usize, ranges: Vec<FreeRange>) -> Result<Self> {
        for range in &ranges {
            if range.start >= range.end {
                return Err(Error::InvalidRange {
                    start: range.start,
                    end: range.end,
                    message: "start is not below end".to_string(),
                });
            }
            if range.end > image_len {
                return Err(Error::InvalidRange {
                    start: range.start,
                    end: range.end,
                    message: format!("end is past the image length {image_len:#x}"),
                });
            }
        }
        Ok(Self {
            ranges,
            cursor: image_len,
        })
    }

    /// Reserve `size` bytes: the first range that still fits wins, else the
    /// append area up to [`MAX_IMAGE_SIZE`].
    pub fn allocate(&mut self, size: usize) -> Result<Allocation> {
        for range in &mut self.ranges {
            if range.remaining() >= size {
                let offset = range.start;
                range.start += size;
                debug!("reserved {} byte(s) at 0x{:X} from a free range", size, offset);
                return Ok(Allocation {
                    offset,
                    source: AllocationSource::FreeRange,
                });
            }
        }
        if self.cursor + size > MAX_IMAGE_SIZE {
            return Err(Error::OutOfSpace {
                needed: size,
                limit: MAX_IMAGE_SIZE,
            });
        }
        let offset = self.cursor;
        self.cursor += size;
        debug!("reserved {} byte(s) at 0x{:X} by appending", size, offset);
        Ok(Allocation {
            offset,
            source: AllocationSource::Append,
        })
    }

    /// Image length implied by the appends handed out so far.
    pub fn image_len(&self) -> usize {
        self.cursor
    }
}
