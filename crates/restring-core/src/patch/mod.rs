//! The patch engine
//!
//! Applies a translation table to a firmware image. Each key is handled in
//! table order: occurrences that fit are overwritten in place, everything
//! else moves to relocation space and every pointer referencing a moved
//! occurrence is rewritten. The image length only changes on the append
//! path, and a key is only repointed after its value has been written, so
//! an aborted run still leaves every finished key consistent.

mod arena;
mod report;

pub use arena::FreeRange;
pub use report::{KeyOutcome, KeyReport, PatchReport};

use arena::{AllocationArena, AllocationSource};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::image::FwImage;
use crate::image::layout::INPLACE_TAIL_WINDOW;
use crate::scan;
use crate::table::{TranslationEntry, TranslationTable};

/// Verdict on one occurrence before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// The value fits the footprint, or the tail behind it is free.
    InPlace,
    /// Overwriting here would clobber live data; relocate instead.
    Unsafe,
}

/// String rewriter with pointer repair.
///
/// Borrows the image exclusively for one run. Relocation space is consumed
/// monotonically and never handed back, so a `Patcher` is single-use.
pub struct Patcher<'a> {
    image: &'a mut FwImage,
    arena: AllocationArena,
    force: bool,
}

impl<'a> Patcher<'a> {
    /// Patcher with no free ranges; every relocation appends.
    ///
    /// The arena is sized from the image here, so relocation addresses
    /// always agree with where the bytes land.
    pub fn new(image: &'a mut FwImage) -> Self {
        let arena = AllocationArena::new(image.len());
        Self {
            image,
            arena,
            force: false,
        }
    }

    /// Patcher that tries the given free ranges, in order, before the
    /// append area. Rejects ranges that are empty or reach past the image.
    pub fn with_ranges(image: &'a mut FwImage, ranges: Vec<FreeRange>) -> Result<Self> {
        let arena = AllocationArena::with_ranges(image.len(), ranges)?;
        Ok(Self {
            image,
            arena,
            force: false,
        })
    }

    /// Skip the tail safety check for in-place-eligible entries. Writes
    /// that would run past the end of the image are still refused.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Apply every table entry in order.
    ///
    /// The run only stops early when relocation space runs out; everything
    /// written up to that point stays written.
    pub fn run(&mut self, table: &TranslationTable) -> PatchReport {
        let mut report = PatchReport::new();
        for entry in table.entries() {
            let key_report = self.process_entry(entry, &mut report);
            let fatal = key_report.outcome == KeyOutcome::OutOfSpace;
            report.keys.push(key_report);
            if fatal {
                report.aborted = true;
                break;
            }
        }
        report.final_len = self.image.len();
        report
    }

    fn process_entry(&mut self, entry: &TranslationEntry, report: &mut PatchReport) -> KeyReport {
        let key = String::from_utf8_lossy(&entry.key).into_owned();
        let occurrences = scan::find_occurrences(self.image, &entry.key);

        let mut out = KeyReport {
            key: key.clone(),
            outcome: KeyOutcome::NotFound,
            occurrences: occurrences.len(),
            in_place: 0,
            skipped_unsafe: 0,
            relocated_to: None,
            pointers_updated: 0,
        };
        if occurrences.is_empty() {
            report.warn(format!("{key:?} not found, ignoring"));
            return out;
        }

        // In-place pass. Values that fit the footprint always qualify;
        // longer ones only for in-place-eligible entries.
        let mut unplaced: Vec<usize> = Vec::new();
        if entry.value.len() <= entry.key.len() || entry.inplace {
            info!("{:?}: replacing {} occurrence(s)", key, occurrences.len());
            for &offset in &occurrences {
                match self.classify(entry, offset) {
                    Placement::InPlace => {
                        self.write_in_place(entry, offset);
                        out.in_place += 1;
                    }
                    Placement::Unsafe => {
                        report.warn(format!(
                            "0x{offset:X}: unsafe to overwrite {key:?} in place, will repoint"
                        ));
                        out.skipped_unsafe += 1;
                        unplaced.push(offset);
                    }
                }
            }
            report.in_place_writes += out.in_place;
            if unplaced.is_empty() {
                out.outcome = KeyOutcome::Replaced;
                return out;
            }
        } else {
            unplaced = occurrences;
        }

        // Relocation pass. One destination serves every pointer that still
        // references an untranslated occurrence of this key.
        info!("{:?}: looking for pointers to {} occurrence(s)", key, unplaced.len());
        let mut pointers: Vec<usize> = Vec::new();
        for &offset in &unplaced {
            let found = scan::find_pointers_to(self.image, offset);
            if found.is_empty() {
                report.warn(format!("0x{offset:X}: string is unreferenced"));
            }
            pointers.extend(found);
        }
        if pointers.is_empty() {
            report.warn(format!("no pointers to {key:?}, unable to translate"));
            out.outcome = KeyOutcome::Unreferenced;
            return out;
        }

        let needed = entry.value.len() + 1;
        let allocation = match self.arena.allocate(needed) {
            Ok(allocation) => allocation,
            Err(err) => {
                let message = format!("{err}; saving and stopping");
                error!("{}", message);
                report.warnings.push(message);
                out.outcome = KeyOutcome::OutOfSpace;
                return out;
            }
        };

        let destination = allocation.offset;
        match allocation.source {
            AllocationSource::FreeRange => {
                self.image.write(destination, &entry.value);
                self.image.write(destination + entry.value.len(), &[0]);
            }
            AllocationSource::Append => {
                self.image.append(&entry.value);
                self.image.append(&[0]);
                report.bytes_appended += needed;
                debug_assert_eq!(self.image.len(), self.arena.image_len());
            }
        }

        let address = self.image.address_of(destination);
        info!(
            "{:?}: relocated to 0x{:X}, repointing {} pointer(s)",
            key,
            destination,
            pointers.len()
        );
        for &pointer_offset in &pointers {
            self.image.write_word(pointer_offset, address);
        }
        out.relocated_to = Some(address);
        out.pointers_updated = pointers.len();
        report.relocations += 1;
        report.pointers_updated += pointers.len();
        out.outcome = KeyOutcome::Relocated;
        out
    }

    /// Decide whether `entry.value` may overwrite the occurrence at `offset`.
    fn classify(&self, entry: &TranslationEntry, offset: usize) -> Placement {
        if entry.value.len() <= entry.key.len() {
            return Placement::InPlace;
        }
        // A longer write must stay inside the buffer, forced or not.
        if offset + entry.value.len() + 1 > self.image.len() {
            return Placement::Unsafe;
        }
        if self.force || self.tail_is_clear(offset, entry.key.len()) {
            Placement::InPlace
        } else {
            Placement::Unsafe
        }
    }

    /// True when every byte between the old footprint and the window
    /// boundary is NUL. The window ends [`INPLACE_TAIL_WINDOW`] bytes past
    /// the string start, so keys at least that long pass trivially.
    fn tail_is_clear(&self, offset: usize, key_len: usize) -> bool {
        let start = (offset + key_len).min(self.image.len());
        let end = (offset + INPLACE_TAIL_WINDOW).min(self.image.len());
        start >= end || self.image.bytes()[start..end].iter().all(|&b| b == 0)
    }

    /// Overwrite one occurrence with the value and a terminator, zeroing
    /// whatever a shorter value exposes of the old footprint.
    fn write_in_place(&mut self, entry: &TranslationEntry, offset: usize) {
        self.image.write(offset, &entry.value);
        self.image.write(offset + entry.value.len(), &[0]);
        let new_end = offset + entry.value.len() + 1;
        let old_end = offset + entry.key.len() + 1;
        if new_end < old_end {
            self.image.zero_fill(new_end, old_end);
        }
        debug!("0x{:X}: replaced in place", offset);
    }
}
