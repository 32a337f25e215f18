//! Shared error-definition macro for the simulator crates.
//!
//! Every error enum in the workspace is declared through [`define_error!`] so
//! that each failure carries a stable numeric code (`subsystem << 8 | code`),
//! a static description and a uniform `Display` form.
//!
//! ## Usage
//!
//! ### Simple errors (no inner data)
//! ```ignore
//! define_error! {
//!     pub enum VmError(0x02) {
//!         AddressOutOfRange = 0x01 => "Virtual address out of range",
//!         NotMapped = 0x02 => "Virtual address not mapped",
//!     }
//! }
//! ```
//!
//! ### Nested errors (with inner error type)
//! ```ignore
//! define_error! {
//!     pub enum SetupError(0x03) {
//!         Config(ConfigError) = 0x01 => "Invalid configuration",
//!     }
//! }
//! ```

#![no_std]

/// Define an error enum with subsystem code, per-variant codes and descriptions.
///
/// Supports both simple variants and nested variants wrapping an inner error.
#[macro_export]
macro_rules! define_error {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($subsystem:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(($inner:ty))? = $code:literal => $desc:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $(($inner))?,
            )*
        }

        impl $name {
            /// Subsystem identifier for this error type.
            pub const SUBSYSTEM: u8 = $subsystem;

            /// Numeric error code, subsystem in the high byte.
            pub const fn code(&self) -> u16 {
                match self {
                    $(
                        $crate::define_error!(@pattern $variant $(($inner))? _unused) => {
                            (($subsystem as u16) << 8) | $code
                        }
                    )*
                }
            }

            /// Static description used in log lines.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(
                        $crate::define_error!(@pattern $variant $(($inner))? _unused) => {
                            $desc
                        }
                    )*
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $(
                        $crate::define_error!(@pattern $variant $(($inner))? inner) => {
                            $crate::define_error!(@display_body self f $desc $(($inner))? inner)
                        }
                    )*
                }
            }
        }

        impl core::error::Error for $name {}
    };

    (@pattern $variant:ident ($inner:ty) $bind:ident) => { Self::$variant($bind) };
    (@pattern $variant:ident $bind:ident) => { Self::$variant };

    (@display_body $self:ident $f:ident $desc:literal ($inner:ty) $bind:ident) => {
        write!($f, "E{:04X}: {} ({})", $self.code(), $desc, $bind)
    };
    (@display_body $self:ident $f:ident $desc:literal $bind:ident) => {
        write!($f, "E{:04X}: {}", $self.code(), $desc)
    };
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    define_error! {
        /// Leaf error used by the macro tests
        pub enum SwapError(0x7F) {
            /// Slot already occupied
            SlotBusy = 0x01 => "Swap slot busy",
            /// Nothing stored under the key
            Missing = 0x02 => "Swap slot empty",
        }
    }

    define_error! {
        pub enum PagingError(0x7E) {
            Swap(SwapError) = 0x01 => "Paging failed",
            Fatal = 0x02 => "Paging aborted",
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SwapError::SlotBusy.code(), 0x7F01);
        assert_eq!(SwapError::Missing.code(), 0x7F02);
        assert_eq!(PagingError::Swap(SwapError::Missing).code(), 0x7E01);
        assert_eq!(PagingError::Fatal.code(), 0x7E02);
    }

    #[test]
    fn test_error_names() {
        assert_eq!(SwapError::SlotBusy.name(), "Swap slot busy");
        assert_eq!(
            PagingError::Swap(SwapError::SlotBusy).name(),
            "Paging failed"
        );
    }

    #[test]
    fn test_display_format() {
        assert_eq!(format!("{}", SwapError::Missing), "E7F02: Swap slot empty");
        assert_eq!(
            format!("{}", PagingError::Swap(SwapError::SlotBusy)),
            "E7E01: Paging failed (E7F01: Swap slot busy)"
        );
    }

    #[test]
    fn test_subsystem_constant() {
        assert_eq!(SwapError::SUBSYSTEM, 0x7F);
        assert_eq!(PagingError::SUBSYSTEM, 0x7E);
    }

    #[test]
    fn test_usable_as_dyn_error() {
        let err: &dyn core::error::Error = &PagingError::Fatal;
        assert_eq!(format!("{err}"), "E7E02: Paging aborted");
        assert!(format!("{:?}", SwapError::SlotBusy).contains("SlotBusy"));
    }
}
