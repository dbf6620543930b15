//! Erase Manager
//!
//! Returns the device, or a single slot, to the erased state by writing the
//! sentinel through the same chunked path as [`EventStore::save`]. Erasing
//! is one-directional: a failed stroke stops the pass but strokes already
//! written stay erased, and a verification mismatch is reported without any
//! rollback.

use heapless::Vec;

use crate::constants::device::MAX_PAGE_SIZE;
use crate::constants::{ERASED_BYTE, SLOT_SIZE};
use crate::errors::{StoreError, StoreResult, TransportResult};
use crate::store::{device_address, EventStore};
use crate::transport::Transport;

/// Mismatching addresses kept in a [`VerifyOutcome`]
pub const MAX_REPORTED_MISMATCHES: usize = 16;

/// Source buffer for sentinel strokes: one maximal page, longer than a slot
static BLANK: [u8; MAX_PAGE_SIZE] = [ERASED_BYTE; MAX_PAGE_SIZE];

const _: () = assert!(SLOT_SIZE <= MAX_PAGE_SIZE);

/// Result of sampling erased addresses after a wipe
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerifyOutcome {
    /// Addresses sampled
    pub checked: usize,
    /// Addresses read back with something other than the sentinel
    pub mismatched: usize,
    /// Addresses whose read failed
    pub unreadable: usize,
    /// The first failing addresses of either kind, in ascending order
    pub mismatches: Vec<u16, MAX_REPORTED_MISMATCHES>,
}

impl VerifyOutcome {
    /// Whether every sampled address read back as the sentinel
    pub fn is_clean(&self) -> bool {
        self.mismatched == 0 && self.unreadable == 0
    }

    fn record_failure(&mut self, address: u16) {
        // Full list: keep counting, drop the address
        let _ = self.mismatches.push(address);
    }
}

/// Summary of a completed [`EventStore::wipe`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WipeReport {
    /// Sentinel strokes issued
    pub strokes: usize,
    /// Bytes covered by the strokes
    pub bytes: usize,
    /// Sampled verification, `None` when disabled
    pub verification: Option<VerifyOutcome>,
}

impl WipeReport {
    /// Whether verification was skipped or found nothing wrong
    pub fn is_clean(&self) -> bool {
        self.verification.as_ref().map_or(true, VerifyOutcome::is_clean)
    }
}

impl<T: Transport> EventStore<T> {
    /// Fill the whole device with the erased sentinel
    ///
    /// Strokes are page-sized from address zero, the last one covering the
    /// remainder. The first failing stroke aborts the pass. With
    /// [`StoreConfig::wipe_verify`](crate::StoreConfig::wipe_verify) set, the
    /// base address of every slot and the first unused byte after the last
    /// slot are read back afterwards. Sampling never fails the wipe: wrong
    /// and unreadable bytes are both reported in the [`VerifyOutcome`].
    ///
    /// ```rust
    /// use eventrom_core::{EventStore, StoreConfig};
    /// use eventrom_core::transport::MemoryEeprom;
    ///
    /// let mut store = EventStore::new(MemoryEeprom::<4096>::new(32), StoreConfig::default());
    /// let report = store.wipe().unwrap();
    ///
    /// assert_eq!(report.strokes, 128);
    /// assert_eq!(report.verification.map(|v| v.checked), Some(17));
    /// ```
    pub fn wipe(&mut self) -> TransportResult<WipeReport> {
        let geometry = self.config.geometry;
        let stroke = geometry.page_size;
        let mut offset = 0;
        let mut strokes = 0;

        while offset < geometry.capacity {
            let len = stroke.min(geometry.capacity - offset);
            self.write_chunked(offset, &BLANK[..len]).map_err(|err| {
                log_warn!("wipe stopped at {}: {}", offset, err);
                err
            })?;
            offset += len;
            strokes += 1;
        }

        let verification = if self.config.wipe_verify {
            Some(self.sample_erased())
        } else {
            None
        };

        log_debug!("wiped {} bytes in {} strokes", offset, strokes);
        Ok(WipeReport { strokes, bytes: offset, verification })
    }

    /// Fill one slot with the erased sentinel
    ///
    /// Afterwards [`load`](EventStore::load) returns `None` for the slot.
    pub fn clear(&mut self, slot: usize) -> StoreResult<()> {
        let base = self.slot_address(slot)?;
        self.write_chunked(base, &BLANK[..SLOT_SIZE]).map_err(|err| {
            log_warn!("clear of slot {} failed: {}", slot, err);
            StoreError::Transport(err)
        })?;
        log_debug!("cleared slot {}", slot);
        Ok(())
    }

    fn sample_erased(&mut self) -> VerifyOutcome {
        let capacity = self.config.geometry.capacity;
        let mut outcome = VerifyOutcome::default();

        for offset in sample_offsets(self.slot_count(), capacity) {
            // Sample offsets lie inside the device
            let Ok(address) = device_address(offset, 1, capacity) else {
                continue;
            };
            outcome.checked += 1;

            let mut byte = [0u8; 1];
            match self.transport.read(address, &mut byte) {
                Ok(()) if byte[0] == ERASED_BYTE => {}
                Ok(()) => {
                    log_warn!("address {} reads {} after wipe", address, byte[0]);
                    outcome.mismatched += 1;
                    outcome.record_failure(address);
                }
                Err(err) => {
                    log_warn!("address {} unreadable after wipe: {}", address, err);
                    outcome.unreadable += 1;
                    outcome.record_failure(address);
                }
            }
        }

        outcome
    }
}

/// Slot bases, then the first byte past the last slot when it exists
fn sample_offsets(slots: usize, capacity: usize) -> impl Iterator<Item = usize> {
    let tail = slots * SLOT_SIZE;
    (0..slots)
        .map(|slot| slot * SLOT_SIZE)
        .chain((tail < capacity).then_some(tail))
}
