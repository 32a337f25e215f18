//! Public read/write interface over the translation core.

use psim_error::define_error;

use crate::allocator::AllocationSource;
use crate::config::{Config, Word};
use crate::memory::{PhysicalMemory, SimulatedMemory};
use crate::scan::{ScanResult, TreeScanner};
use crate::table::{FrameKind, Mmu, ROOT_FRAME};

define_error! {
    /// Translation error.
    pub enum VmError(0x02) {
        /// Address at or beyond the virtual memory size
        AddressOutOfRange = 0x01 => "Virtual address out of range",
        /// Lookup hit an unused entry with creation disabled
        NotMapped = 0x02 => "Virtual address not mapped",
        /// No table to reuse, no fresh frame and no page to evict
        FramesExhausted = 0x03 => "No frame available for allocation",
    }
}

/// Fault and allocation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Walks that had to create at least one entry.
    pub page_faults: u64,
    pub tables_reused: u64,
    pub fresh_frames: u64,
    pub evictions: u64,
}

impl Stats {
    pub(crate) fn record(&mut self, source: AllocationSource) {
        match source {
            AllocationSource::ReusedTable => self.tables_reused += 1,
            AllocationSource::Fresh => self.fresh_frames += 1,
            AllocationSource::Evicted { .. } => self.evictions += 1,
        }
    }
}

/// A virtual address space backed by `M`.
///
/// Reads and writes never report a missing page: any fault is resolved by
/// creating the tables and the page on the spot, evicting if needed.
#[derive(Debug)]
pub struct VirtualMemory<M> {
    config: Config,
    memory: M,
    stats: Stats,
}

impl VirtualMemory<SimulatedMemory> {
    /// Initialized address space over a fresh [`SimulatedMemory`].
    pub fn simulated(config: Config) -> Self {
        let memory = SimulatedMemory::new(&config);
        let mut vm = Self::new(config, memory);
        vm.initialize();
        vm
    }
}

impl<M: PhysicalMemory> VirtualMemory<M> {
    /// Wrap `memory`. Call [`VirtualMemory::initialize`] before translating.
    pub fn new(config: Config, memory: M) -> Self {
        Self {
            config,
            memory,
            stats: Stats::default(),
        }
    }

    /// Clear the root table, unmapping everything.
    pub fn initialize(&mut self) {
        self.mmu().prepare_frame(ROOT_FRAME, FrameKind::Table);
        log::debug!(
            "vm: initialized, {} frames of {} words, {} pages",
            self.config.num_frames(),
            self.config.page_size(),
            self.config.num_pages()
        );
    }

    /// Read the word at `va`, paging it in if needed.
    pub fn read(&mut self, va: u64) -> Result<Word, VmError> {
        let address = self.resolve(va)?;
        Ok(self.memory.read_word(address))
    }

    /// Write `value` at `va`, paging it in if needed.
    pub fn write(&mut self, va: u64, value: Word) -> Result<(), VmError> {
        let address = self.resolve(va)?;
        self.memory.write_word(address, value);
        Ok(())
    }

    /// Physical word address of `va` if its page is resident.
    ///
    /// Never allocates or evicts.
    pub fn translate(&mut self, va: u64) -> Result<u64, VmError> {
        self.check_range(va)?;
        let frame = Mmu::new(&self.config, &mut self.memory).walk(va, false, &mut self.stats)?;
        Ok(self.config.physical_address(frame, self.config.offset(va)))
    }

    /// What the allocator would see when faulting on `page` right now.
    pub fn allocation_candidates(&self, page: u64) -> ScanResult {
        TreeScanner::new(&self.config, &self.memory, page, ROOT_FRAME).run()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Direct access to the backing memory. Writing table frames through it
    /// can break the tree.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn into_memory(self) -> M {
        self.memory
    }

    fn mmu(&mut self) -> Mmu<'_, M> {
        Mmu::new(&self.config, &mut self.memory)
    }

    fn check_range(&self, va: u64) -> Result<(), VmError> {
        if va >= self.config.virtual_memory_size() {
            log::warn!(
                "vm: address {:#x} beyond virtual memory size {:#x}",
                va,
                self.config.virtual_memory_size()
            );
            return Err(VmError::AddressOutOfRange);
        }
        Ok(())
    }

    fn resolve(&mut self, va: u64) -> Result<u64, VmError> {
        self.check_range(va)?;
        let frame = Mmu::new(&self.config, &mut self.memory).walk(va, true, &mut self.stats)?;
        Ok(self.config.physical_address(frame, self.config.offset(va)))
    }
}
