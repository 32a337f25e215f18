#![no_std]

//! Hierarchical page-table MMU simulator.
//!
//! Virtual addresses are translated through a fixed-depth tree of page
//! tables rooted at physical frame 0. Missing tables and pages are created on
//! demand; when physical memory runs out a data page is swapped out, picking
//! the page farthest (on the circular page-number space) from the one being
//! brought in.
//!
//! Allocation follows a strict order:
//! 1. reuse a page table that has no children left,
//! 2. take the next never-used frame,
//! 3. evict a data page.
//!
//! The physical memory substrate is a collaborator ([`PhysicalMemory`]);
//! [`SimulatedMemory`] is the in-process implementation.
//!
//! ```ignore
//! let config = Config::new(4, 4, 64)?;
//! let mut vm = VirtualMemory::simulated(config);
//! vm.write(0x1234, 7)?;
//! assert_eq!(vm.read(0x1234)?, 7);
//! ```

extern crate alloc;

mod address;
mod allocator;
pub mod config;
pub mod memory;
mod scan;
pub mod table;
mod vm;
mod walker;

pub use allocator::{Allocation, AllocationSource};
pub use config::{Config, ConfigError, Word};
pub use memory::{PhysicalMemory, SimulatedMemory};
pub use scan::{ScanResult, Slot, Victim};
pub use table::{FrameKind, PageTableEntry, ROOT_FRAME};
pub use vm::{Stats, VirtualMemory, VmError};
