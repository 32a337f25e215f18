//! Simulator constants, fixed for the lifetime of a [`VirtualMemory`].
//!
//! Everything is derived from three numbers: the offset width (bits of a
//! page offset, which is also the bits consumed per tree level), the tree
//! depth and the number of physical frames.
//!
//! [`VirtualMemory`]: crate::VirtualMemory

use psim_error::define_error;
use psim_utils::{div_ceil, pow2};

/// A single word of physical memory.
pub type Word = i32;

/// Widest address space the simulator accepts.
const MAX_ADDRESS_WIDTH: u32 = 63;

define_error! {
    /// Rejected configuration.
    pub enum ConfigError(0x01) {
        /// Pages must hold at least two words
        ZeroOffsetWidth = 0x01 => "Offset width must be at least one bit",
        /// The tree needs at least one level
        ZeroDepth = 0x02 => "Page table depth must be at least one level",
        /// No bits left for a page number
        VirtualWidthTooSmall = 0x03 => "Virtual address width must exceed the offset width",
        /// Addresses or RAM size overflow
        AddressSpaceTooWide = 0x04 => "Address space does not fit in 63 bits",
        /// A full root-to-leaf path does not fit in RAM
        TooFewFrames = 0x05 => "Physical memory cannot hold a full translation path",
        /// Frame indices are stored in table words
        FrameIndexOverflow = 0x06 => "Frame index does not fit in a word",
    }
}

/// Validated simulator constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    offset_width: u32,
    virtual_width: u32,
    tables_depth: u32,
    num_frames: u64,
}

impl Config {
    /// 16-word pages, 64 frames, 20-bit virtual addresses (4 levels).
    pub const DEFAULT: Self = Self {
        offset_width: 4,
        virtual_width: 20,
        tables_depth: 4,
        num_frames: 64,
    };

    /// Build a configuration from the branching factor (as `2^offset_width`),
    /// the tree depth and the number of physical frames.
    ///
    /// Virtual addresses are `offset_width * (tables_depth + 1)` bits wide.
    pub fn new(offset_width: u32, tables_depth: u32, num_frames: u64) -> Result<Self, ConfigError> {
        if offset_width == 0 {
            return Err(ConfigError::ZeroOffsetWidth);
        }
        if tables_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        let virtual_width = tables_depth
            .checked_add(1)
            .and_then(|levels| offset_width.checked_mul(levels))
            .ok_or(ConfigError::AddressSpaceTooWide)?;
        Self::validate(Self {
            offset_width,
            virtual_width,
            tables_depth,
            num_frames,
        })
    }

    /// Build a configuration from address widths in bits.
    ///
    /// The frame count is `2^(physical_width - offset_width)` and the depth is
    /// the number of offset-wide digits needed to cover a page number. When
    /// the page-number width is not a multiple of the offset width the
    /// topmost digit is narrower.
    pub fn from_address_widths(
        offset_width: u32,
        physical_width: u32,
        virtual_width: u32,
    ) -> Result<Self, ConfigError> {
        if offset_width == 0 {
            return Err(ConfigError::ZeroOffsetWidth);
        }
        if virtual_width <= offset_width {
            return Err(ConfigError::VirtualWidthTooSmall);
        }
        if physical_width < offset_width {
            return Err(ConfigError::TooFewFrames);
        }
        if physical_width > MAX_ADDRESS_WIDTH {
            return Err(ConfigError::AddressSpaceTooWide);
        }
        let num_frames =
            pow2(physical_width - offset_width).ok_or(ConfigError::AddressSpaceTooWide)?;
        let tables_depth = div_ceil(virtual_width - offset_width, offset_width);
        Self::validate(Self {
            offset_width,
            virtual_width,
            tables_depth,
            num_frames,
        })
    }

    fn validate(config: Self) -> Result<Self, ConfigError> {
        if config.virtual_width > MAX_ADDRESS_WIDTH {
            return Err(ConfigError::AddressSpaceTooWide);
        }
        // Root plus one frame per level must be resident at the same time.
        if config.num_frames <= u64::from(config.tables_depth) {
            return Err(ConfigError::TooFewFrames);
        }
        if config.num_frames - 1 > Word::MAX as u64 {
            return Err(ConfigError::FrameIndexOverflow);
        }
        let ram_size = config
            .num_frames
            .checked_mul(config.page_size())
            .ok_or(ConfigError::AddressSpaceTooWide)?;
        if ram_size > 1 << MAX_ADDRESS_WIDTH {
            return Err(ConfigError::AddressSpaceTooWide);
        }
        log::debug!(
            "config: page_size={} depth={} frames={} pages={}",
            config.page_size(),
            config.tables_depth,
            config.num_frames,
            config.num_pages()
        );
        Ok(config)
    }

    /// Bits of a page offset; also the bits consumed per tree level.
    #[inline]
    pub const fn offset_width(&self) -> u32 {
        self.offset_width
    }

    /// Words per frame, which is also the branching factor of a table.
    #[inline]
    pub const fn page_size(&self) -> u64 {
        1 << self.offset_width
    }

    /// Number of table levels between the root and a data page.
    #[inline]
    pub const fn tables_depth(&self) -> u32 {
        self.tables_depth
    }

    /// Total physical frames, root included.
    #[inline]
    pub const fn num_frames(&self) -> u64 {
        self.num_frames
    }

    /// Width of a virtual address in bits.
    #[inline]
    pub const fn virtual_width(&self) -> u32 {
        self.virtual_width
    }

    /// Number of virtual pages; the size of the page-number ring.
    #[inline]
    pub const fn num_pages(&self) -> u64 {
        1 << (self.virtual_width - self.offset_width)
    }

    /// Number of addressable virtual words.
    #[inline]
    pub const fn virtual_memory_size(&self) -> u64 {
        1 << self.virtual_width
    }

    /// Number of physical words.
    #[inline]
    pub const fn ram_size(&self) -> u64 {
        self.num_frames * self.page_size()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
