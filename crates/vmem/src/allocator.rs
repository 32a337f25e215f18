//! Frame allocation with a fixed priority: reuse a childless table, then take
//! a never-used frame, then evict the most distant data page.

use crate::memory::PhysicalMemory;
use crate::scan::{ScanResult, TreeScanner};
use crate::table::{FrameKind, Mmu};
use crate::vm::VmError;

/// Where an allocated frame came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocationSource {
    /// A table without children, detached from its parent.
    ReusedTable,
    /// The frame just above the high-water mark.
    Fresh,
    /// A data frame whose page was swapped out.
    Evicted { page: u64 },
}

/// A frame ready to be linked into the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub frame: u64,
    pub source: AllocationSource,
}

impl<M: PhysicalMemory + ?Sized> Mmu<'_, M> {
    pub(crate) fn scan(&self, target_page: u64, filling: u64) -> ScanResult {
        TreeScanner::new(self.config, &*self.memory, target_page, filling).run()
    }

    /// Find a frame for the unused entry `row` of table `parent`, on behalf
    /// of `target_page`.
    ///
    /// Any frame taken from the tree is unlinked from its old owner first.
    pub(crate) fn allocate_frame(
        &mut self,
        parent: u64,
        row: u64,
        target_page: u64,
        kind: FrameKind,
    ) -> Result<Allocation, VmError> {
        let scan = self.scan(target_page, parent);

        if let Some(empty) = scan.empty_table.filter(|slot| slot.frame != parent) {
            log::debug!(
                "alloc: reusing empty table {} (owner {}[{}]) for {}[{}]",
                empty.frame,
                empty.parent,
                empty.row,
                parent,
                row
            );
            self.clear_entry(empty.parent, empty.row);
            self.prepare_frame(empty.frame, kind);
            return Ok(Allocation {
                frame: empty.frame,
                source: AllocationSource::ReusedTable,
            });
        }

        let fresh = scan.max_frame + 1;
        if fresh < self.config.num_frames() {
            log::trace!("alloc: fresh frame {} for {}[{}]", fresh, parent, row);
            self.prepare_frame(fresh, kind);
            return Ok(Allocation {
                frame: fresh,
                source: AllocationSource::Fresh,
            });
        }

        // Unreachable with a validated config: a full tree always holds a leaf.
        let victim = scan.victim.ok_or(VmError::FramesExhausted)?;
        log::debug!(
            "alloc: evicting page {} from frame {} (distance {} to page {})",
            victim.page,
            victim.slot.frame,
            victim.distance,
            target_page
        );
        self.memory.evict(victim.slot.frame, victim.page);
        self.clear_entry(victim.slot.parent, victim.slot.row);
        self.prepare_frame(victim.slot.frame, kind);
        Ok(Allocation {
            frame: victim.slot.frame,
            source: AllocationSource::Evicted { page: victim.page },
        })
    }
}
