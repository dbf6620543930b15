//! Byte Transport Abstraction
//!
//! The store reaches the EEPROM only through [`Transport`]: a paged write, a
//! byte-range read and a settle pause. On the badge this is an I2C bus with
//! 16-bit word addressing; in tests it is a RAM array.
//!
//! ## Contract
//!
//! - `write` receives at most one page and never crosses a page boundary.
//!   The store guarantees this, implementations may reject anything else
//!   with [`TransportError::PageOverflow`].
//! - After each write the store calls `settle` with the configured write
//!   cycle time. Reads issued before the part finished its internal write
//!   cycle would be NACKed on real hardware.
//! - Implementations are not reentrant. Callers sharing one device between
//!   tasks must lock around the whole store, not individual calls.
//!
//! ## Implementing for a Bus
//!
//! ```rust
//! use eventrom_core::transport::Transport;
//! use eventrom_core::{TransportError, TransportResult};
//! use fugit::MillisDurationU32;
//!
//! struct I2cEeprom<B> {
//!     bus: B,
//!     device_address: u8,
//! }
//!
//! # trait Bus { fn write(&mut self, dev: u8, bytes: &[u8]) -> Result<(), ()>;
//! #   fn write_read(&mut self, dev: u8, out: &[u8], buf: &mut [u8]) -> Result<(), ()>;
//! #   fn delay_ms(&mut self, ms: u32); }
//! impl<B: Bus> Transport for I2cEeprom<B> {
//!     fn write(&mut self, address: u16, data: &[u8]) -> TransportResult<()> {
//!         let mut frame = [0u8; 2 + 32];
//!         frame[..2].copy_from_slice(&address.to_be_bytes());
//!         frame[2..2 + data.len()].copy_from_slice(data);
//!         self.bus
//!             .write(self.device_address, &frame[..2 + data.len()])
//!             .map_err(|_| TransportError::Nack { address })
//!     }
//!
//!     fn read(&mut self, address: u16, buf: &mut [u8]) -> TransportResult<()> {
//!         self.bus
//!             .write_read(self.device_address, &address.to_be_bytes(), buf)
//!             .map_err(|_| TransportError::Nack { address })
//!     }
//!
//!     fn settle(&mut self, duration: MillisDurationU32) {
//!         self.bus.delay_ms(duration.to_millis());
//!     }
//! }
//! ```

use fugit::MillisDurationU32;

use crate::errors::TransportResult;

pub mod memory;
#[cfg(feature = "std")]
pub mod file;

pub use memory::{Fault, MemoryEeprom, MemoryStats, MAX_PENDING_FAULTS};
#[cfg(feature = "std")]
pub use file::FileEeprom;

/// Paged byte access to a non-volatile memory
pub trait Transport {
    /// Write `data` starting at `address`
    ///
    /// `data` fits within one page.
    fn write(&mut self, address: u16, data: &[u8]) -> TransportResult<()>;

    /// Fill `buf` with the bytes starting at `address`
    fn read(&mut self, address: u16, buf: &mut [u8]) -> TransportResult<()>;

    /// Block until the medium is readable after a write
    fn settle(&mut self, duration: MillisDurationU32);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, address: u16, data: &[u8]) -> TransportResult<()> {
        (**self).write(address, data)
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> TransportResult<()> {
        (**self).read(address, buf)
    }

    fn settle(&mut self, duration: MillisDurationU32) {
        (**self).settle(duration)
    }
}

/// Split a write of `len` bytes at `offset` into page-bounded pieces
///
/// Each piece is `(offset, len)`, no longer than a page and never crossing
/// a page boundary. A write starting on a boundary splits into whole pages.
///
/// ```rust
/// use eventrom_core::transport::page_chunks;
///
/// let pieces: Vec<_> = page_chunks(250, 34, 32).collect();
/// assert_eq!(pieces, [(250, 6), (256, 28)]);
/// ```
pub fn page_chunks(offset: usize, len: usize, page_size: usize) -> PageChunks {
    PageChunks {
        cursor: offset,
        end: offset + len,
        page_size: page_size.max(1),
    }
}

/// Iterator returned by [`page_chunks`]
#[derive(Debug, Clone)]
pub struct PageChunks {
    cursor: usize,
    end: usize,
    page_size: usize,
}

impl Iterator for PageChunks {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let room = self.page_size - self.cursor % self.page_size;
        let len = room.min(self.end - self.cursor);
        let piece = (self.cursor, len);
        self.cursor += len;
        Some(piece)
    }
}

impl core::iter::FusedIterator for PageChunks {}

/// Check that an access of `len` bytes at `address` stays on the device
pub(crate) fn check_bounds(address: u16, len: usize, capacity: usize) -> TransportResult<()> {
    if address as usize + len > capacity {
        return Err(crate::errors::TransportError::OutOfBounds { address, len, capacity });
    }
    Ok(())
}

/// Check that a write stays inside one page
pub(crate) fn check_page(address: u16, len: usize, page_size: usize) -> TransportResult<()> {
    let offset = address as usize % page_size;
    if len > page_size || offset + len > page_size {
        return Err(crate::errors::TransportError::PageOverflow { address, len, page_size });
    }
    Ok(())
}
