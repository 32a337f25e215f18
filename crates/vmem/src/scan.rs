//! Depth-first scan of the live page-table tree.
//!
//! A single pass collects everything the frame allocator may need: the first
//! childless table, the highest frame index in use and the data page farthest
//! from the page being brought in.

use crate::config::Config;
use crate::memory::PhysicalMemory;
use crate::table::{ROOT_FRAME, read_entry};

/// A frame together with the table entry that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub frame: u64,
    /// Table holding the owning entry.
    pub parent: u64,
    /// Row of the owning entry inside `parent`.
    pub row: u64,
}

/// Eviction candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Victim {
    pub slot: Slot,
    /// Virtual page held by the frame.
    pub page: u64,
    /// Cyclic distance from the target page.
    pub distance: u64,
}

/// Allocation signals gathered by one scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// First non-root table with every entry unused.
    pub empty_table: Option<Slot>,
    /// Highest frame index referenced anywhere in the tree.
    pub max_frame: u64,
    /// Data page with the largest cyclic distance to the target.
    pub victim: Option<Victim>,
}

pub(crate) struct TreeScanner<'a, M: ?Sized> {
    config: &'a Config,
    memory: &'a M,
    target_page: u64,
    /// Table whose entry is being filled; never offered for reuse.
    filling: u64,
    result: ScanResult,
}

impl<'a, M: PhysicalMemory + ?Sized> TreeScanner<'a, M> {
    pub(crate) fn new(config: &'a Config, memory: &'a M, target_page: u64, filling: u64) -> Self {
        Self {
            config,
            memory,
            target_page,
            filling,
            result: ScanResult::default(),
        }
    }

    pub(crate) fn run(mut self) -> ScanResult {
        self.visit_table(ROOT_FRAME, 0, 0);
        self.result
    }

    /// Visit every entry of the table `frame` at tree `depth`.
    ///
    /// `prefix` holds the page-number digits consumed above this table.
    /// Returns true when the table has no used entry.
    fn visit_table(&mut self, frame: u64, depth: u32, prefix: u64) -> bool {
        let mut empty = true;

        for row in 0..self.config.page_size() {
            let Some(child) = read_entry(self.config, self.memory, frame, row).frame() else {
                continue;
            };
            empty = false;
            self.result.max_frame = self.result.max_frame.max(child);

            let page_prefix = (prefix << self.config.offset_width()) | row;
            let slot = Slot {
                frame: child,
                parent: frame,
                row,
            };

            if depth + 1 < self.config.tables_depth() {
                let child_empty = self.visit_table(child, depth + 1, page_prefix);
                if child_empty && child != self.filling && self.result.empty_table.is_none() {
                    self.result.empty_table = Some(slot);
                }
            } else {
                self.consider_victim(slot, page_prefix);
            }
        }

        empty
    }

    fn consider_victim(&mut self, slot: Slot, page: u64) {
        let distance = self.config.cyclic_distance(page, self.target_page);
        // Strictly greater: ties keep the first page in traversal order.
        if self.result.victim.is_none_or(|best| distance > best.distance) {
            self.result.victim = Some(Victim {
                slot,
                page,
                distance,
            });
        }
    }
}
