//! Level-by-level translation of a virtual address to its data frame.

use crate::memory::PhysicalMemory;
use crate::table::{FrameKind, Mmu, PageTableEntry, ROOT_FRAME};
use crate::vm::{Stats, VmError};

impl<M: PhysicalMemory + ?Sized> Mmu<'_, M> {
    /// Walk from the root to the data frame of `va`.
    ///
    /// With `create` set, every unused entry on the way is filled: tables come
    /// back zeroed from the allocator and the data page is restored from swap.
    /// Without it the first unused entry ends the walk with
    /// [`VmError::NotMapped`] and nothing is modified.
    pub(crate) fn walk(&mut self, va: u64, create: bool, stats: &mut Stats) -> Result<u64, VmError> {
        let depth = self.config.tables_depth();
        let page = self.config.page_number(va);
        let mut frame = ROOT_FRAME;
        let mut faulted = false;

        for level in 0..depth {
            let row = self.config.index_at_level(va, level);
            frame = match self.entry(frame, row).frame() {
                Some(child) => child,
                None if !create => return Err(VmError::NotMapped),
                None => {
                    let kind = FrameKind::at_level(level, depth);
                    let allocation = self.allocate_frame(frame, row, page, kind)?;
                    stats.record(allocation.source);
                    faulted = true;
                    if kind == FrameKind::Leaf {
                        self.memory.restore(allocation.frame, page);
                    }
                    self.set_entry(frame, row, PageTableEntry::bound(allocation.frame));
                    log::trace!(
                        "walk: va {:#x} level {} bound {}[{}] -> {} ({:?})",
                        va,
                        level,
                        frame,
                        row,
                        allocation.frame,
                        allocation.source
                    );
                    allocation.frame
                }
            };
        }

        if faulted {
            stats.page_faults += 1;
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::memory::SimulatedMemory;

    fn setup(frames: u64) -> (Config, SimulatedMemory) {
        // branching 4, depth 3, 64 pages
        let config = Config::new(2, 3, frames).unwrap();
        let mem = SimulatedMemory::new(&config);
        (config, mem)
    }

    #[test]
    fn test_creates_full_path_on_empty_tree() {
        let (config, mut mem) = setup(16);
        let mut stats = Stats::default();
        let frame = Mmu::new(&config, &mut mem).walk(0, true, &mut stats).unwrap();
        assert_eq!(frame, 3);
        assert_eq!(stats.page_faults, 1);
        assert_eq!(stats.fresh_frames, 3);

        let mmu = Mmu::new(&config, &mut mem);
        assert_eq!(mmu.entry(0, 0).frame(), Some(1));
        assert_eq!(mmu.entry(1, 0).frame(), Some(2));
        assert_eq!(mmu.entry(2, 0).frame(), Some(3));
    }

    #[test]
    fn test_existing_path_is_followed_without_faults() {
        let (config, mut mem) = setup(16);
        let mut stats = Stats::default();
        let first = Mmu::new(&config, &mut mem).walk(0b11_01_10_00, true, &mut stats).unwrap();
        let again = Mmu::new(&config, &mut mem).walk(0b11_01_10_01, true, &mut stats).unwrap();
        assert_eq!(first, again);
        assert_eq!(stats.page_faults, 1);
    }

    #[test]
    fn test_shares_upper_tables_between_neighbours() {
        let (config, mut mem) = setup(16);
        let mut stats = Stats::default();
        // pages 0 and 1 differ only in the last digit
        Mmu::new(&config, &mut mem).walk(0b00_00_00_00, true, &mut stats).unwrap();
        let frame = Mmu::new(&config, &mut mem).walk(0b00_00_01_00, true, &mut stats).unwrap();
        assert_eq!(frame, 4);
        assert_eq!(stats.fresh_frames, 4);
    }

    #[test]
    fn test_lookup_without_create_has_no_side_effects() {
        let (config, mut mem) = setup(16);
        let before = mem.clone();
        let mut stats = Stats::default();
        let result = Mmu::new(&config, &mut mem).walk(0b01_00_00_00, false, &mut stats);
        assert_eq!(result, Err(VmError::NotMapped));
        assert_eq!(mem, before);
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn test_lookup_without_create_stops_at_partial_path() {
        let (config, mut mem) = setup(16);
        let mut stats = Stats::default();
        Mmu::new(&config, &mut mem).walk(0, true, &mut stats).unwrap();
        // same first two digits, unmapped last digit
        let result = Mmu::new(&config, &mut mem).walk(0b00_00_11_00, false, &mut stats);
        assert_eq!(result, Err(VmError::NotMapped));
        assert_eq!(Mmu::new(&config, &mut mem).walk(0b11, false, &mut stats), Ok(3));
    }

    #[test]
    fn test_leaf_is_restored_from_swap() {
        let (config, mut mem) = setup(16);
        mem.write_word(config.physical_address(9, 2), 41);
        mem.evict(9, 5);

        let mut stats = Stats::default();
        let frame = Mmu::new(&config, &mut mem).walk(5 << 2, true, &mut stats).unwrap();
        assert_eq!(mem.read_word(config.physical_address(frame, 2)), 41);
        assert!(!mem.is_swapped(5));
    }
}
