//! Layout constants for fixed-base firmware images
//!
//! This module centralizes the constants that describe how strings and
//! pointers are laid out in a flat firmware dump. The image is mapped at a
//! fixed logical address, so file offsets and pointer values convert back
//! and forth by adding or subtracting the base.

/// Logical address the image is mapped at. A pointer word referencing file
/// offset `o` holds `FIRMWARE_BASE + o`.
pub const FIRMWARE_BASE: u32 = 0x0801_0000;

/// Hard ceiling on the total image size, in bytes. Appending relocated
/// strings past this limit would overrun the device's flash region, so a
/// patch run stops once the limit is hit.
pub const MAX_IMAGE_SIZE: usize = 0x70000;

/// Pointer words are 4-byte little-endian values at 4-aligned offsets.
pub const POINTER_SIZE: usize = 4;

/// How many bytes past a string's start are inspected when deciding whether
/// a longer replacement may spill over the old footprint. Everything inside
/// the window must be NUL for the overwrite to be considered safe.
pub const INPLACE_TAIL_WINDOW: usize = 32;
