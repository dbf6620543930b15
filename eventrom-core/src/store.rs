//! Slot Store
//!
//! Maps slot indices to device addresses and moves encoded records between
//! the codec and the transport. The store owns all address arithmetic:
//! slot `i` occupies `[i * 250, i * 250 + 250)` and there is no header,
//! footer or index region.
//!
//! ```text
//! reference part, 4096 bytes
//!
//!  0          250        500            3750       4000      4096
//!  ├──────────┼──────────┼──── ... ─────┼──────────┼─────────┤
//!  │  slot 0  │  slot 1  │              │ slot 15  │ unused  │
//! ```
//!
//! ## Failure Modes
//!
//! - Validation failures happen before any write.
//! - A transport failure mid-save stops at the failing chunk. Earlier
//!   chunks stay written and the slot content is undefined until the next
//!   successful save or clear.
//! - Saving a shorter record over a longer one leaves the old tail bytes in
//!   place. They sit past the new record's length fields and are never
//!   read, unless [`StoreConfig::pad_slots`] fills them with the sentinel.
//!
//! ## Concurrency
//!
//! Every call blocks until its transport calls complete. The store takes
//! `&mut self` for reads too, so sharing it requires one lock around the
//! whole store.

use crate::codec::{self, ByteSource, DecodeFault};
use crate::config::{Geometry, StoreConfig};
use crate::constants::{ERASED_BYTE, SLOT_SIZE};
use crate::errors::{StoreError, StoreResult, TransportError, TransportResult};
use crate::event::Event;
use crate::transport::Transport;

/// What a slot currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    /// Erased, never written since
    Empty,
    /// A valid record
    Occupied(Event),
    /// Bytes that do not decode to a record
    Corrupt(DecodeFault),
}

impl SlotStatus {
    /// Whether the slot is erased
    pub fn is_empty(&self) -> bool {
        matches!(self, SlotStatus::Empty)
    }

    /// The stored event, if any
    pub fn event(&self) -> Option<&Event> {
        match self {
            SlotStatus::Occupied(event) => Some(event),
            _ => None,
        }
    }

    /// Consume into the stored event, if any
    pub fn into_event(self) -> Option<Event> {
        match self {
            SlotStatus::Occupied(event) => Some(event),
            _ => None,
        }
    }
}

/// Event store over a byte transport
///
/// ```rust
/// use eventrom_core::{Event, EventStore, StoreConfig};
/// use eventrom_core::transport::MemoryEeprom;
///
/// let mut store = EventStore::new(MemoryEeprom::<4096>::new(32), StoreConfig::default());
/// let event = Event::new("Ceremony", 1730649600, 1730653200, "Elliot", "Badges!").unwrap();
///
/// store.save(&event, 0).unwrap();
/// assert_eq!(store.load(0), Some(event));
/// assert_eq!(store.load(1), None);
/// ```
#[derive(Debug)]
pub struct EventStore<T> {
    pub(crate) transport: T,
    pub(crate) config: StoreConfig,
}

impl<T: Transport> EventStore<T> {
    /// Wrap a transport
    ///
    /// The transport must match `config.geometry`; the store never probes
    /// the device.
    pub fn new(transport: T, config: StoreConfig) -> Self {
        Self { transport, config }
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Device geometry
    pub fn geometry(&self) -> &Geometry {
        &self.config.geometry
    }

    /// Number of slots on the device
    pub fn slot_count(&self) -> usize {
        self.config.geometry.slot_count()
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Borrow the transport mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// First device offset of `slot`
    pub fn slot_address(&self, slot: usize) -> StoreResult<usize> {
        let slots = self.slot_count();
        if slot >= slots {
            return Err(StoreError::SlotOutOfRange { slot, slots });
        }
        Ok(slot * SLOT_SIZE)
    }

    /// Encode `event` and write it into `slot`
    ///
    /// Nothing is written when the event fails validation or the slot is
    /// out of range. A transport failure leaves the slot partially written.
    pub fn save(&mut self, event: &Event, slot: usize) -> StoreResult<()> {
        let base = self.slot_address(slot)?;
        let record = codec::encode(event)?;

        let padded;
        let bytes: &[u8] = if self.config.pad_slots {
            let mut full = [ERASED_BYTE; SLOT_SIZE];
            full[..record.len()].copy_from_slice(&record);
            padded = full;
            &padded
        } else {
            &record
        };

        self.write_chunked(base, bytes).map_err(|err| {
            log_warn!("save to slot {} failed: {}", slot, err);
            StoreError::Transport(err)
        })?;

        if self.config.verify_writes {
            self.verify(base, bytes)?;
        }

        log_debug!("saved {} byte record to slot {}", record.len(), slot);
        Ok(())
    }

    /// Read the record in `slot`
    ///
    /// Erased, corrupt, unreadable and out-of-range slots all yield `None`.
    /// Never writes.
    pub fn load(&mut self, slot: usize) -> Option<Event> {
        match self.inspect(slot) {
            Ok(status) => status.into_event(),
            Err(err) => {
                log_debug!("load of slot {} skipped: {}", slot, err);
                None
            }
        }
    }

    /// Classify the content of `slot`
    pub fn inspect(&mut self, slot: usize) -> StoreResult<SlotStatus> {
        let base = self.slot_address(slot)?;
        let mut reader = SlotReader {
            transport: &mut self.transport,
            cursor: base,
            end: base + SLOT_SIZE,
        };

        Ok(match codec::try_decode(&mut reader) {
            Ok(event) => SlotStatus::Occupied(event),
            Err(DecodeFault::Empty) => SlotStatus::Empty,
            Err(fault) => {
                log_debug!("slot {} holds no record: {}", slot, fault);
                SlotStatus::Corrupt(fault)
            }
        })
    }

    /// Write `data` at `offset` one page-bounded chunk at a time
    ///
    /// Waits the settle delay after every chunk and stops at the first
    /// failure.
    pub(crate) fn write_chunked(&mut self, offset: usize, data: &[u8]) -> TransportResult<()> {
        let geometry = self.config.geometry;

        for (at, len) in crate::transport::page_chunks(offset, data.len(), geometry.page_size) {
            let address = device_address(at, len, geometry.capacity)?;
            let start = at - offset;
            self.transport.write(address, &data[start..start + len])?;
            self.transport.settle(geometry.settle);
            log_trace!("wrote {} bytes at {}", len, address);
        }

        Ok(())
    }

    fn verify(&mut self, offset: usize, expected: &[u8]) -> StoreResult<()> {
        let mut buf = [0u8; SLOT_SIZE];
        let actual = &mut buf[..expected.len()];
        let address = device_address(offset, expected.len(), self.config.geometry.capacity)?;
        self.transport.read(address, actual)?;

        match actual.iter().zip(expected).position(|(a, e)| a != e) {
            None => Ok(()),
            Some(index) => {
                let address = device_address(offset + index, 1, self.config.geometry.capacity)?;
                log_warn!("read-back mismatch at {}", address);
                Err(StoreError::VerifyMismatch { address })
            }
        }
    }
}

/// Convert a device offset to a transport address, checking capacity
pub(crate) fn device_address(offset: usize, len: usize, capacity: usize) -> TransportResult<u16> {
    match u16::try_from(offset) {
        Ok(address) if offset + len <= capacity => Ok(address),
        _ => Err(TransportError::OutOfBounds {
            address: offset.min(u16::MAX as usize) as u16,
            len,
            capacity,
        }),
    }
}

/// Incremental reader over one slot
struct SlotReader<'a, T> {
    transport: &'a mut T,
    cursor: usize,
    end: usize,
}

impl<T: Transport> ByteSource for SlotReader<'_, T> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeFault> {
        if self.cursor + buf.len() > self.end {
            return Err(DecodeFault::ShortRead);
        }
        let address = u16::try_from(self.cursor).map_err(|_| DecodeFault::ShortRead)?;
        self.transport.read(address, buf).map_err(DecodeFault::Transport)?;
        self.cursor += buf.len();
        Ok(())
    }
}
