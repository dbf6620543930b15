//! RAM-backed EEPROM with fault injection
//!
//! Stands in for the I2C part in tests and host-side simulation:
//! - starts fully erased, like a factory-fresh device
//! - enforces the page contract the real part silently wraps on
//! - injects read errors, write errors, torn writes and silent corruption
//! - counts every transaction and settle pause
//!
//! Faults are consumed in FIFO order: an access triggers the oldest queued
//! fault of the matching kind whose address lies inside the accessed range.

use fugit::MillisDurationU32;
use heapless::Vec;

use super::{check_bounds, check_page, Transport};
use crate::constants::ERASED_BYTE;
use crate::errors::{TransportError, TransportResult};

/// Maximum number of faults queued at once
pub const MAX_PENDING_FAULTS: usize = 8;

/// A failure to inject into a [`MemoryEeprom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Fail the next read touching `address`
    ReadError {
        /// Address that triggers the fault
        address: u16,
    },
    /// Fail the next write touching `address`, storing nothing
    WriteError {
        /// Address that triggers the fault
        address: u16,
    },
    /// Store only the first `bytes_written` bytes of the next write
    /// touching `address`, then fail
    TornWrite {
        /// Address that triggers the fault
        address: u16,
        /// Bytes that land before the failure
        bytes_written: usize,
    },
    /// Let the next write touching `address` succeed but store the
    /// inverted byte there
    Corruption {
        /// Address whose byte is flipped
        address: u16,
    },
    /// Report the device absent on the next access of any kind
    Absent,
}

impl Fault {
    fn hits_read(&self, start: u16, len: usize) -> bool {
        match *self {
            Fault::ReadError { address } => touches(address, start, len),
            Fault::Absent => true,
            _ => false,
        }
    }

    fn hits_write(&self, start: u16, len: usize) -> bool {
        match *self {
            Fault::WriteError { address }
            | Fault::TornWrite { address, .. }
            | Fault::Corruption { address } => touches(address, start, len),
            Fault::Absent => true,
            _ => false,
        }
    }
}

fn touches(address: u16, start: u16, len: usize) -> bool {
    let address = address as usize;
    let start = start as usize;
    address >= start && address < start + len
}

/// Transaction counts for a [`MemoryEeprom`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    /// Successful read transactions
    pub reads: u32,
    /// Write transactions that stored data (torn writes included)
    pub writes: u32,
    /// Bytes returned by reads
    pub bytes_read: u32,
    /// Bytes stored by writes
    pub bytes_written: u32,
    /// Settle pauses requested
    pub settles: u32,
    /// Total settle time requested, in milliseconds
    pub settle_ms: u32,
    /// Faults that fired
    pub faults_fired: u32,
}

/// In-memory EEPROM of `N` bytes
#[derive(Debug, Clone)]
pub struct MemoryEeprom<const N: usize> {
    data: [u8; N],
    page_size: usize,
    faults: Vec<Fault, MAX_PENDING_FAULTS>,
    stats: MemoryStats,
}

impl<const N: usize> MemoryEeprom<N> {
    /// Erased device with the given page size (zero is treated as one)
    pub fn new(page_size: usize) -> Self {
        Self {
            data: [ERASED_BYTE; N],
            page_size: page_size.max(1),
            faults: Vec::new(),
            stats: MemoryStats::default(),
        }
    }

    /// Device capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Page size in bytes
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Raw device contents
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.data
    }

    /// Raw device contents, for planting corruption
    pub fn as_bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.data
    }

    /// Queue a fault; returns it back when the queue is full
    pub fn inject(&mut self, fault: Fault) -> Result<(), Fault> {
        self.faults.push(fault)
    }

    /// Faults not yet triggered
    pub fn pending_faults(&self) -> &[Fault] {
        &self.faults
    }

    /// Transaction statistics
    pub fn stats(&self) -> MemoryStats {
        self.stats
    }

    /// Zero the statistics
    pub fn reset_stats(&mut self) {
        self.stats = MemoryStats::default();
    }

    fn take_fault(&mut self, hit: impl Fn(&Fault) -> bool) -> Option<Fault> {
        let index = self.faults.iter().position(hit)?;
        self.stats.faults_fired += 1;
        Some(self.faults.remove(index))
    }
}

impl<const N: usize> Default for MemoryEeprom<N> {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_PAGE_SIZE)
    }
}

impl<const N: usize> Transport for MemoryEeprom<N> {
    fn write(&mut self, address: u16, data: &[u8]) -> TransportResult<()> {
        check_bounds(address, data.len(), N)?;
        check_page(address, data.len(), self.page_size)?;

        let start = address as usize;
        match self.take_fault(|f| f.hits_write(address, data.len())) {
            None => {}
            Some(Fault::TornWrite { bytes_written, .. }) => {
                let landed = bytes_written.min(data.len());
                self.data[start..start + landed].copy_from_slice(&data[..landed]);
                self.stats.writes += 1;
                self.stats.bytes_written += landed as u32;
                return Err(TransportError::Bus { address, reason: "torn write" });
            }
            Some(Fault::Corruption { address: flipped }) => {
                self.data[start..start + data.len()].copy_from_slice(data);
                self.data[flipped as usize] = !self.data[flipped as usize];
                self.stats.writes += 1;
                self.stats.bytes_written += data.len() as u32;
                return Ok(());
            }
            Some(Fault::Absent) => return Err(TransportError::Nack { address }),
            Some(_) => return Err(TransportError::Bus { address, reason: "injected write error" }),
        }

        self.data[start..start + data.len()].copy_from_slice(data);
        self.stats.writes += 1;
        self.stats.bytes_written += data.len() as u32;
        Ok(())
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> TransportResult<()> {
        check_bounds(address, buf.len(), N)?;

        match self.take_fault(|f| f.hits_read(address, buf.len())) {
            None => {}
            Some(Fault::Absent) => return Err(TransportError::Nack { address }),
            Some(_) => return Err(TransportError::Bus { address, reason: "injected read error" }),
        }

        let start = address as usize;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
        self.stats.reads += 1;
        self.stats.bytes_read += buf.len() as u32;
        Ok(())
    }

    fn settle(&mut self, duration: MillisDurationU32) {
        self.stats.settles += 1;
        self.stats.settle_ms += duration.to_millis();
    }
}
