//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;

use psim_vmem::{Config, PhysicalMemory, SimulatedMemory, VirtualMemory, Word};

/// Simulated memory that records every swap operation.
#[derive(Debug, Clone)]
pub struct RecordingMemory {
    pub inner: SimulatedMemory,
    /// `(frame, page)` per evict call, in order.
    pub evictions: Vec<(u64, u64)>,
    /// `(frame, page)` per restore call, in order.
    pub restores: Vec<(u64, u64)>,
}

impl RecordingMemory {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: SimulatedMemory::new(config),
            evictions: Vec::new(),
            restores: Vec::new(),
        }
    }
}

impl PhysicalMemory for RecordingMemory {
    fn read_word(&self, address: u64) -> Word {
        self.inner.read_word(address)
    }

    fn write_word(&mut self, address: u64, value: Word) {
        self.inner.write_word(address, value);
    }

    fn evict(&mut self, frame: u64, page: u64) {
        self.evictions.push((frame, page));
        self.inner.evict(frame, page);
    }

    fn restore(&mut self, frame: u64, page: u64) {
        self.restores.push((frame, page));
        self.inner.restore(frame, page);
    }
}

/// Initialized address space over a [`RecordingMemory`].
pub fn recording_vm(config: Config) -> VirtualMemory<RecordingMemory> {
    let memory = RecordingMemory::new(&config);
    let mut vm = VirtualMemory::new(config, memory);
    vm.initialize();
    vm
}

/// A mapped data page found by walking the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub page: u64,
    pub frame: u64,
}

/// Every frame referenced from the tree, in traversal order, plus the data
/// pages reached at the bottom.
pub fn collect_tree<M: PhysicalMemory>(config: &Config, memory: &M) -> (Vec<u64>, Vec<Mapping>) {
    let mut frames = Vec::new();
    let mut mappings = Vec::new();
    visit(config, memory, 0, 0, 0, &mut frames, &mut mappings);
    (frames, mappings)
}

fn visit<M: PhysicalMemory>(
    config: &Config,
    memory: &M,
    frame: u64,
    depth: u32,
    prefix: u64,
    frames: &mut Vec<u64>,
    mappings: &mut Vec<Mapping>,
) {
    for row in 0..config.page_size() {
        let word = memory.read_word(config.physical_address(frame, row));
        if word == 0 {
            continue;
        }
        let child = word as u64;
        frames.push(child);
        let page = (prefix << config.offset_width()) | row;
        if depth + 1 < config.tables_depth() {
            visit(config, memory, child, depth + 1, page, frames, mappings);
        } else {
            mappings.push(Mapping { page, frame: child });
        }
    }
}

/// Assert the tree has no aliasing, never references the root and stays
/// inside physical memory.
pub fn assert_tree_invariants<M: PhysicalMemory>(config: &Config, memory: &M) {
    let (frames, _) = collect_tree(config, memory);
    let mut seen = HashSet::new();
    for frame in frames {
        assert_ne!(frame, 0, "root referenced from the tree");
        assert!(frame < config.num_frames(), "frame {frame} out of range");
        assert!(seen.insert(frame), "frame {frame} referenced twice");
    }
}
