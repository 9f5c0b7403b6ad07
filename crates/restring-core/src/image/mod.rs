//! Firmware image access
//!
//! The image is a flat byte buffer mapped at a fixed logical address.
//! [`layout`] holds the constants describing the mapping; [`FwImage`] is the
//! mutable buffer every other module operates on.

pub mod layout;

mod buffer;

pub use buffer::FwImage;
