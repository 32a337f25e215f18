//! Page table entries and table-level access to physical frames.
//!
//! A frame has no stored type. The walker decides from the tree depth whether
//! its words are child frame indices ([`FrameKind::Table`]) or user data
//! ([`FrameKind::Leaf`]).

use crate::config::{Config, Word};
use crate::memory::PhysicalMemory;

/// Frame holding the root table. Never reused, never evicted.
pub const ROOT_FRAME: u64 = 0;

/// One word of a table frame: 0 when unused, otherwise a child frame index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct PageTableEntry(Word);

impl PageTableEntry {
    /// An unused entry.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// An entry pointing at `frame`.
    pub const fn bound(frame: u64) -> Self {
        Self(frame as Word)
    }

    /// Reinterpret a raw word as an entry.
    pub const fn from_word(word: Word) -> Self {
        Self(word)
    }

    pub const fn word(self) -> Word {
        self.0
    }

    pub const fn is_unused(self) -> bool {
        self.0 == 0
    }

    /// Child frame, or `None` when unused.
    pub const fn frame(self) -> Option<u64> {
        if self.is_unused() {
            None
        } else {
            Some(self.0 as u64)
        }
    }
}

/// How a frame's words are interpreted at its position in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Child frame indices.
    Table,
    /// User data.
    Leaf,
}

impl FrameKind {
    /// Kind of the frame hanging off an entry at `level` of a tree with
    /// `depth` table levels.
    pub const fn at_level(level: u32, depth: u32) -> Self {
        if level + 1 == depth {
            Self::Leaf
        } else {
            Self::Table
        }
    }
}

/// Borrowed view of the page-table tree: constants plus the memory it lives in.
pub(crate) struct Mmu<'a, M: ?Sized> {
    pub(crate) config: &'a Config,
    pub(crate) memory: &'a mut M,
}

impl<'a, M: PhysicalMemory + ?Sized> Mmu<'a, M> {
    pub(crate) fn new(config: &'a Config, memory: &'a mut M) -> Self {
        Self { config, memory }
    }

    pub(crate) fn entry(&self, frame: u64, row: u64) -> PageTableEntry {
        read_entry(self.config, &*self.memory, frame, row)
    }

    pub(crate) fn set_entry(&mut self, frame: u64, row: u64, entry: PageTableEntry) {
        let address = self.config.physical_address(frame, row);
        self.memory.write_word(address, entry.word());
    }

    pub(crate) fn clear_entry(&mut self, frame: u64, row: u64) {
        self.set_entry(frame, row, PageTableEntry::empty());
    }

    /// Make a freshly allocated frame ready for its role.
    ///
    /// Tables are zeroed. Leaves are left alone: the swap restore that follows
    /// overwrites every word.
    pub(crate) fn prepare_frame(&mut self, frame: u64, kind: FrameKind) {
        if kind == FrameKind::Leaf {
            return;
        }
        for row in 0..self.config.page_size() {
            self.clear_entry(frame, row);
        }
    }
}

/// Read the entry at `row` of table `frame`.
pub(crate) fn read_entry<M: PhysicalMemory + ?Sized>(
    config: &Config,
    memory: &M,
    frame: u64,
    row: u64,
) -> PageTableEntry {
    PageTableEntry::from_word(memory.read_word(config.physical_address(frame, row)))
}
