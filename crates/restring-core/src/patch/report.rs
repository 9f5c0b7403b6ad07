//! Patch run reporting
//!
//! Every run produces a [`PatchReport`]: one [`KeyReport`] per table entry
//! plus run-wide counters. The report serializes to JSON for toolchain
//! consumption; warnings are also emitted through `tracing` as they happen.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, IntoStaticStr};

/// Final state of one translation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
pub enum KeyOutcome {
    /// Every occurrence was overwritten in place.
    #[strum(serialize = "replaced")]
    Replaced,
    /// At least one occurrence moved and its pointers were rewritten.
    #[strum(serialize = "relocated")]
    Relocated,
    /// The key does not occur in the image.
    #[strum(serialize = "not-found")]
    NotFound,
    /// Nothing points at the occurrences that needed to move.
    #[strum(serialize = "unreferenced")]
    Unreferenced,
    /// Relocation space ran out; the run stopped at this key.
    #[strum(serialize = "out-of-space")]
    OutOfSpace,
}

/// What happened to one translation entry.
#[derive(Debug, Clone, Serialize)]
pub struct KeyReport {
    pub key: String,
    pub outcome: KeyOutcome,
    /// Occurrences of the key found in the image.
    pub occurrences: usize,
    /// Occurrences overwritten in place.
    pub in_place: usize,
    /// Occurrences the tail safety check refused to overwrite.
    pub skipped_unsafe: usize,
    /// Address the value moved to, when relocation happened.
    pub relocated_to: Option<u32>,
    /// Pointer words rewritten to the new address.
    pub pointers_updated: usize,
}

/// Summary of one whole patch run.
#[derive(Debug, Clone, Serialize)]
pub struct PatchReport {
    pub started_at: DateTime<Utc>,
    pub keys: Vec<KeyReport>,
    pub warnings: Vec<String>,
    pub in_place_writes: usize,
    pub relocations: usize,
    pub pointers_updated: usize,
    pub bytes_appended: usize,
    /// Image length when the run finished.
    pub final_len: usize,
    /// True when the run stopped early because relocation space ran out.
    pub aborted: bool,
}

impl PatchReport {
    pub(crate) fn new() -> Self {
        Self {
            started_at: Utc::now(),
            keys: Vec::new(),
            warnings: Vec::new(),
            in_place_writes: 0,
            relocations: 0,
            pointers_updated: 0,
            bytes_appended: 0,
            final_len: 0,
            aborted: false,
        }
    }

    /// Record a diagnostic: logged immediately, kept for the report.
    pub(crate) fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    /// Number of keys that ended with the given outcome.
    pub fn count(&self, outcome: KeyOutcome) -> usize {
        self.keys.iter().filter(|k| k.outcome == outcome).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(KeyOutcome::Replaced.to_string(), "replaced");
        assert_eq!(KeyOutcome::NotFound.to_string(), "not-found");
        assert_eq!(KeyOutcome::OutOfSpace.to_string(), "out-of-space");
        let label: &'static str = KeyOutcome::Unreferenced.into();
        assert_eq!(label, "unreferenced");
    }

    #[test]
    fn test_report_serializes_outcomes_in_kebab_case() {
        let mut report = PatchReport::new();
        report.keys.push(KeyReport {
            key: "Hello".to_string(),
            outcome: KeyOutcome::NotFound,
            occurrences: 0,
            in_place: 0,
            skipped_unsafe: 0,
            relocated_to: None,
            pointers_updated: 0,
        });
        report.warn("\"Hello\" not found, ignoring".to_string());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"outcome\":\"not-found\""));
        assert!(json.contains("not found, ignoring"));
    }

    #[test]
    fn test_count_filters_by_outcome() {
        let mut report = PatchReport::new();
        for outcome in [KeyOutcome::Replaced, KeyOutcome::Replaced, KeyOutcome::Relocated] {
            report.keys.push(KeyReport {
                key: String::new(),
                outcome,
                occurrences: 1,
                in_place: 0,
                skipped_unsafe: 0,
                relocated_to: None,
                pointers_updated: 0,
            });
        }
        assert_eq!(report.count(KeyOutcome::Replaced), 2);
        assert_eq!(report.count(KeyOutcome::Relocated), 1);
        assert_eq!(report.count(KeyOutcome::NotFound), 0);
    }
}
