//! Physical memory substrate.
//!
//! The translation core only ever touches RAM through [`PhysicalMemory`]:
//! word reads and writes plus moving one data page to and from swap.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use psim_utils::HashMap;

use crate::config::{Config, Word};

/// Word-addressable RAM with page-granular swap.
pub trait PhysicalMemory {
    /// Read the word at `address`.
    fn read_word(&self, address: u64) -> Word;

    /// Write `value` at `address`.
    fn write_word(&mut self, address: u64, value: Word);

    /// Move the contents of `frame` to swap under `page`.
    fn evict(&mut self, frame: u64, page: u64);

    /// Load the contents saved under `page` into `frame`.
    fn restore(&mut self, frame: u64, page: u64);
}

impl<M: PhysicalMemory + ?Sized> PhysicalMemory for &mut M {
    fn read_word(&self, address: u64) -> Word {
        (**self).read_word(address)
    }

    fn write_word(&mut self, address: u64, value: Word) {
        (**self).write_word(address, value);
    }

    fn evict(&mut self, frame: u64, page: u64) {
        (**self).evict(frame, page);
    }

    fn restore(&mut self, frame: u64, page: u64) {
        (**self).restore(frame, page);
    }
}

/// In-process RAM plus a swap store keyed by virtual page number.
///
/// Restoring a page that was never evicted zero-fills the frame, so a fresh
/// data page never exposes words left behind by a previous owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedMemory {
    page_size: u64,
    ram: Vec<Word>,
    swap: HashMap<u64, Vec<Word>>,
}

impl SimulatedMemory {
    /// Zeroed RAM sized for `config`, empty swap.
    pub fn new(config: &Config) -> Self {
        Self {
            page_size: config.page_size(),
            ram: vec![0; config.ram_size() as usize],
            swap: HashMap::new(),
        }
    }

    /// Raw RAM contents, frame after frame.
    pub fn ram(&self) -> &[Word] {
        &self.ram
    }

    /// Words of a single frame.
    pub fn frame(&self, frame: u64) -> &[Word] {
        &self.ram[self.frame_range(frame)]
    }

    /// Number of pages currently held in swap.
    pub fn swapped_pages(&self) -> usize {
        self.swap.len()
    }

    /// Whether `page` is currently held in swap.
    pub fn is_swapped(&self, page: u64) -> bool {
        self.swap.contains_key(&page)
    }

    fn frame_range(&self, frame: u64) -> Range<usize> {
        let start = (frame * self.page_size) as usize;
        start..start + self.page_size as usize
    }
}

impl PhysicalMemory for SimulatedMemory {
    fn read_word(&self, address: u64) -> Word {
        self.ram[address as usize]
    }

    fn write_word(&mut self, address: u64, value: Word) {
        self.ram[address as usize] = value;
    }

    fn evict(&mut self, frame: u64, page: u64) {
        let saved = self.frame(frame).to_vec();
        if self.swap.insert(page, saved).is_some() {
            log::warn!("swap: page {page} was already swapped out, overwritten");
        }
    }

    fn restore(&mut self, frame: u64, page: u64) {
        let range = self.frame_range(frame);
        match self.swap.remove(&page) {
            Some(saved) => self.ram[range].copy_from_slice(&saved),
            None => self.ram[range].fill(0),
        }
    }
}
