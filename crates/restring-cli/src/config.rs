//! CLI configuration file
//!
//! `restring.toml` carries per-project defaults so repeated patch runs do
//! not need the same flags every time:
//!
//! ```toml
//! force = false
//! encoding = "windows-1251"
//! base_address = 0x08010000
//!
//! [[ranges]]
//! start = 0x4F000
//! end = 0x50000
//! ```

use std::fs;
use std::path::Path;

use restring_core::FreeRange;
use serde::Deserialize;
use tracing::{debug, warn};

/// Values read from `restring.toml`. Command-line flags win over these.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Skip the in-place tail check.
    pub force: bool,
    /// Encoding label for translated strings.
    pub encoding: Option<String>,
    /// Override of the logical base address.
    pub base_address: Option<u32>,
    /// Free ranges usable for relocated strings, tried before any ranges
    /// given on the command line.
    pub ranges: Vec<RangeEntry>,
}

/// One `[[ranges]]` entry.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RangeEntry {
    pub start: usize,
    pub end: usize,
}

impl Config {
    /// Load a config file, falling back to defaults when it is missing.
    /// A file that exists but does not parse is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                debug!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                if path.exists() {
                    warn!("failed to load config {}: {e}, using defaults", path.display());
                }
                Self::default()
            }
        }
    }

    fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Config ranges in declaration order.
    pub fn free_ranges(&self) -> Vec<FreeRange> {
        self.ranges
            .iter()
            .map(|r| FreeRange::new(r.start, r.end))
            .collect()
    }
}
