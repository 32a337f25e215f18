//! Address decomposition.
//!
//! ```text
//! virtual address (depth D, w = offset width):
//! ┌──────────┬──────────┬─────┬────────────┬──────────┐
//! │ index[0] │ index[1] │ ... │ index[D-1] │  offset  │
//! │  (w bit) │  (w bit) │     │   (w bit)  │  (w bit) │
//! └──────────┴──────────┴─────┴────────────┴──────────┘
//!
//! physical address = frame * page_size + row
//! ```

use psim_utils::{abs_diff, low_mask};

use crate::config::Config;

impl Config {
    /// Word offset of `va` inside its page.
    #[inline]
    pub const fn offset(&self, va: u64) -> u64 {
        va & low_mask(self.offset_width())
    }

    /// Virtual page number of `va`.
    #[inline]
    pub const fn page_number(&self, va: u64) -> u64 {
        va >> self.offset_width()
    }

    /// Table row used for `va` at tree `level`; level 0 is the root.
    ///
    /// `level` must be below [`Config::tables_depth`].
    #[inline]
    pub const fn index_at_level(&self, va: u64, level: u32) -> u64 {
        let shift = self.offset_width() * (self.tables_depth() - level);
        (va >> shift) & low_mask(self.offset_width())
    }

    /// Physical word address of `row` inside `frame`.
    #[inline]
    pub const fn physical_address(&self, frame: u64, row: u64) -> u64 {
        frame * self.page_size() + row
    }

    /// Distance between two page numbers on the ring of [`Config::num_pages`].
    #[inline]
    pub const fn cyclic_distance(&self, a: u64, b: u64) -> u64 {
        let diff = abs_diff(a, b);
        let wrapped = self.num_pages() - diff;
        if diff < wrapped { diff } else { wrapped }
    }
}
