//! Serializable scan results

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::image::FwImage;
use crate::scan::StringScanner;

/// One referenced string, ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    /// File offset of the pointer word.
    pub pointer_offset: usize,
    /// Address the pointer holds.
    pub address: u32,
    /// The referenced string. Scanner output is printable ASCII, so the
    /// lossy conversion never actually loses anything.
    pub string: String,
}

/// Snapshot of a full discovery scan over one image.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub image_len: usize,
    pub base_address: u32,
    pub strings: Vec<ScanEntry>,
}

impl ScanReport {
    /// Run a scan and collect every referenced string.
    pub fn collect(image: &FwImage) -> Self {
        let strings = StringScanner::new(image)
            .scan()
            .map(|s| ScanEntry {
                pointer_offset: s.pointer_offset,
                address: s.address,
                string: String::from_utf8_lossy(s.string).into_owned(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            image_len: image.len(),
            base_address: image.base(),
            strings,
        }
    }
}
