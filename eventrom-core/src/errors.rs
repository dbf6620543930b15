//! Error Types for Record Validation and Device Access
//!
//! ## Design Philosophy
//!
//! Errors are returned from code that runs on a microcontroller next to a
//! slow I2C bus, so they follow the usual embedded rules:
//!
//! 1. **Small Size**: every variant carries a few integers or a
//!    `&'static str`, never an owned buffer.
//!
//! 2. **No Heap Allocation**: all error data is inline.
//!
//! 3. **Copy Semantics**: errors implement `Copy` and can be stashed in
//!    reports or returned through several layers without cloning.
//!
//! ## Error Categories
//!
//! ### Validation (before any I/O)
//! - `ValidationError::Empty`: a text field has zero bytes
//! - `ValidationError::TooLong`: a text field exceeds its byte bound
//! - `ValidationError::RecordTooLarge`: the encoded record exceeds one slot
//!
//! ### Transport (the bus or the part itself)
//! - `TransportError::Nack`: the device did not acknowledge
//! - `TransportError::Bus`: any other bus-level failure
//! - `TransportError::OutOfBounds` / `PageOverflow`: the caller broke the
//!   device contract
//!
//! ### Store
//! - `StoreError::SlotOutOfRange`: slot index beyond the device geometry
//! - `StoreError::VerifyMismatch`: read-back after a write differed
//!
//! Corrupt or erased slots are **not** errors. Loading one yields `None`;
//! the reason is available as a [`DecodeFault`](crate::codec::DecodeFault)
//! for diagnostics only.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use eventrom_core::{Event, EventStore, StoreConfig, StoreError};
//! use eventrom_core::transport::MemoryEeprom;
//!
//! let mut store = EventStore::new(MemoryEeprom::<4096>::new(32), StoreConfig::default());
//! let event = Event::new("Ceremony", 1730649600, 1730653200, "Elliot", "Badges!").unwrap();
//!
//! match store.save(&event, 0) {
//!     Ok(()) => {}
//!     Err(StoreError::Validation(_)) => {
//!         // Nothing was written; fix the input
//!     }
//!     Err(StoreError::Transport(_)) => {
//!         // Slot may be partially written; retry or clear it
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

use crate::event::Field;

/// Result type for record validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for raw device access
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for slot store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record rejected before encoding
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Text field has no bytes
    #[error("{field} must not be empty")]
    Empty {
        /// The offending field
        field: Field,
    },

    /// Text field longer than its bound
    #[error("{field} is {len} bytes, maximum is {max}")]
    TooLong {
        /// The offending field
        field: Field,
        /// Actual UTF-8 byte length
        len: usize,
        /// Maximum allowed byte length
        max: usize,
    },

    /// Encoded record does not fit in one slot
    #[error("encoded record is {len} bytes, slot holds {max}")]
    RecordTooLarge {
        /// Encoded size
        len: usize,
        /// Slot size
        max: usize,
    },
}

/// Failure reported by a byte transport
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Access runs past the end of the device
    #[error("access of {len} bytes at {address} exceeds capacity {capacity}")]
    OutOfBounds {
        /// Start address of the access
        address: u16,
        /// Requested length
        len: usize,
        /// Device capacity in bytes
        capacity: usize,
    },

    /// Write longer than a page or crossing a page boundary
    #[error("write of {len} bytes at {address} breaks page size {page_size}")]
    PageOverflow {
        /// Start address of the write
        address: u16,
        /// Write length
        len: usize,
        /// Device page size
        page_size: usize,
    },

    /// Device did not acknowledge (absent or busy)
    #[error("device did not acknowledge at {address}")]
    Nack {
        /// Address of the failed transaction
        address: u16,
    },

    /// Other bus failure
    #[error("bus error at {address}: {reason}")]
    Bus {
        /// Address of the failed transaction
        address: u16,
        /// Short description from the bus driver
        reason: &'static str,
    },

    /// Host I/O failure on an image-backed device
    #[error("image I/O error at {address}")]
    Io {
        /// Address of the failed access
        address: u16,
    },
}

/// Slot store failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Event rejected; nothing was written
    #[error("invalid event: {0}")]
    Validation(ValidationError),

    /// Device access failed; the slot may be partially written
    #[error("transport failure: {0}")]
    Transport(TransportError),

    /// Slot index beyond the device geometry
    #[error("slot {slot} out of range, device holds {slots}")]
    SlotOutOfRange {
        /// Requested slot index
        slot: usize,
        /// Number of slots on the device
        slots: usize,
    },

    /// Read-back after write differed from what was written
    #[error("verification failed at {address}")]
    VerifyMismatch {
        /// First address whose content differed
        address: u16,
    },
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err)
    }
}

impl From<TransportError> for StoreError {
    fn from(err: TransportError) -> Self {
        StoreError::Transport(err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ValidationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Empty { field } =>
                defmt::write!(fmt, "{} empty", field.name()),
            Self::TooLong { field, len, max } =>
                defmt::write!(fmt, "{} is {} bytes, max {}", field.name(), len, max),
            Self::RecordTooLarge { len, max } =>
                defmt::write!(fmt, "record {} bytes, slot {}", len, max),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::OutOfBounds { address, len, capacity } =>
                defmt::write!(fmt, "{} bytes at {} past {}", len, address, capacity),
            Self::PageOverflow { address, len, page_size } =>
                defmt::write!(fmt, "{} bytes at {} breaks page {}", len, address, page_size),
            Self::Nack { address } =>
                defmt::write!(fmt, "NACK at {}", address),
            Self::Bus { address, reason } =>
                defmt::write!(fmt, "bus error at {}: {}", address, reason),
            Self::Io { address } =>
                defmt::write!(fmt, "image I/O at {}", address),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StoreError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Validation(e) => defmt::write!(fmt, "invalid event: {}", e),
            Self::Transport(e) => defmt::write!(fmt, "transport: {}", e),
            Self::SlotOutOfRange { slot, slots } =>
                defmt::write!(fmt, "slot {} of {}", slot, slots),
            Self::VerifyMismatch { address } =>
                defmt::write!(fmt, "verify mismatch at {}", address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_stay_small() {
        assert!(core::mem::size_of::<StoreError>() <= 40);
    }

    #[test]
    fn conversions_wrap_inner_error() {
        let v = ValidationError::Empty { field: Field::Name };
        assert_eq!(StoreError::from(v), StoreError::Validation(v));

        let t = TransportError::Nack { address: 250 };
        assert_eq!(StoreError::from(t), StoreError::Transport(t));
    }

    #[cfg(feature = "std")]
    #[test]
    fn messages_name_the_field() {
        let err = ValidationError::TooLong { field: Field::Description, len: 139, max: 138 };
        assert_eq!(err.to_string(), "description is 139 bytes, maximum is 138");
    }
}
