//! # restring-core
//!
//! Core library for the restring firmware string translator.
//!
//! This crate provides:
//! - Firmware image access with offset/address mapping (`image`)
//! - Heuristic discovery of referenced strings (`scan`)
//! - Strings-file parsing and encoding (`table`)
//! - The in-place / relocating patch engine (`patch`)
//!
//! A patch run loads an image and a translation table, overwrites every
//! occurrence that fits where it stands, relocates the rest into free
//! ranges or the append area, and rewrites the pointers that referenced
//! the moved strings.

pub mod error;
pub mod image;
pub mod patch;
pub mod scan;
pub mod table;

pub use error::{Error, Result};
pub use image::FwImage;
pub use image::layout::{FIRMWARE_BASE, INPLACE_TAIL_WINDOW, MAX_IMAGE_SIZE, POINTER_SIZE};
pub use patch::{FreeRange, KeyOutcome, KeyReport, PatchReport, Patcher};
pub use scan::{
    ScanEntry, ScanReport, StringRef, StringScanner, find_occurrences, find_pointers_to,
    is_string_char, read_c_string,
};
pub use table::{TranslationEntry, TranslationTable, escape, resolve_encoding, unescape};
