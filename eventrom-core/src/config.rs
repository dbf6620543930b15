//! Device Geometry and Store Configuration
//!
//! Configuration is plain data built at startup, there are no files or
//! environment lookups on a badge. Defaults describe the reference part
//! (4096 bytes, 32-byte pages, 10 ms write cycle).
//!
//! ```rust
//! use eventrom_core::{Geometry, StoreConfig};
//!
//! // 64 KB part with 128-byte pages
//! let geometry = Geometry::new(65536, 128).with_settle_ms(5);
//! let config = StoreConfig::new(geometry)
//!     .with_write_verify(true)
//!     .with_slot_padding(true);
//!
//! assert_eq!(config.geometry.slot_count(), 262);
//! ```

use fugit::MillisDurationU32;

use crate::constants::device::{MAX_ADDRESSABLE, MAX_PAGE_SIZE};
use crate::constants::{DEFAULT_CAPACITY, DEFAULT_PAGE_SIZE, DEFAULT_SETTLE_MS, SLOT_SIZE};

/// Physical layout of the EEPROM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Total capacity in bytes
    pub capacity: usize,
    /// Largest single write, also the write alignment unit (at most 256)
    pub page_size: usize,
    /// Pause after each page write before the part accepts reads
    pub settle: MillisDurationU32,
}

impl Geometry {
    /// Geometry with the default settle delay
    ///
    /// Capacity is clamped to the 16-bit address space and page size to
    /// `1..=256` bytes.
    pub const fn new(capacity: usize, page_size: usize) -> Self {
        let capacity = if capacity > MAX_ADDRESSABLE { MAX_ADDRESSABLE } else { capacity };
        let page_size = if page_size == 0 {
            1
        } else if page_size > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            page_size
        };
        Self {
            capacity,
            page_size,
            settle: MillisDurationU32::millis(DEFAULT_SETTLE_MS),
        }
    }

    /// Override the settle delay
    pub const fn with_settle_ms(mut self, millis: u32) -> Self {
        self.settle = MillisDurationU32::millis(millis);
        self
    }

    /// Number of whole slots that fit on the device
    pub const fn slot_count(&self) -> usize {
        self.capacity / SLOT_SIZE
    }

    /// Bytes past the last slot that the store never uses
    pub const fn unused_tail(&self) -> usize {
        self.capacity - self.slot_count() * SLOT_SIZE
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_PAGE_SIZE)
    }
}

/// Slot store behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Device layout
    pub geometry: Geometry,
    /// Read back every saved record and compare
    pub verify_writes: bool,
    /// Fill the rest of the slot with the erased sentinel on save
    pub pad_slots: bool,
    /// Sample erased addresses after a wipe
    pub wipe_verify: bool,
}

impl StoreConfig {
    /// Configuration for the given geometry with default behaviour
    pub const fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            verify_writes: false,
            pad_slots: false,
            wipe_verify: true,
        }
    }

    /// Enable or disable read-back verification of saves
    pub const fn with_write_verify(mut self, enabled: bool) -> Self {
        self.verify_writes = enabled;
        self
    }

    /// Enable or disable padding slots with the sentinel on save
    pub const fn with_slot_padding(mut self, enabled: bool) -> Self {
        self.pad_slots = enabled;
        self
    }

    /// Enable or disable sampled verification after a wipe
    pub const fn with_wipe_verify(mut self, enabled: bool) -> Self {
        self.wipe_verify = enabled;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Geometry::default())
    }
}
