//! File-backed EEPROM image
//!
//! Lets host tools prepare or inspect a badge schedule without hardware.
//! The image is a flat file of exactly `capacity` bytes in device order, so
//! it can be flashed with any EEPROM programmer.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use fugit::MillisDurationU32;

use super::{check_bounds, check_page, Transport};
use crate::constants::ERASED_BYTE;
use crate::errors::{TransportError, TransportResult};

/// EEPROM image stored in a host file
///
/// ```rust,no_run
/// use eventrom_core::{Event, EventStore, StoreConfig};
/// use eventrom_core::transport::FileEeprom;
///
/// let image = FileEeprom::open("schedule.bin", 4096, 32)?;
/// let mut store = EventStore::new(image, StoreConfig::default());
///
/// let event = Event::new("Ceremony", 1730649600, 1730653200, "Elliot", "Badges!").unwrap();
/// store.save(&event, 0).unwrap();
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct FileEeprom {
    file: File,
    capacity: usize,
    page_size: usize,
}

impl FileEeprom {
    /// Open an image, creating it erased or extending it to `capacity`
    pub fn open<P: AsRef<Path>>(path: P, capacity: usize, page_size: usize) -> io::Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let len = file.metadata()?.len() as usize;
        if len < capacity {
            file.seek(SeekFrom::Start(len as u64))?;
            file.write_all(&vec![ERASED_BYTE; capacity - len])?;
            file.flush()?;
        }

        Ok(Self {
            file,
            capacity,
            page_size: page_size.max(1),
        })
    }

    /// Image capacity in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Page size enforced on writes
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Release the underlying file
    pub fn into_file(self) -> File {
        self.file
    }

    fn io_error(address: u16, err: io::Error) -> TransportError {
        log_warn!("image I/O error at {}: {}", address, err);
        TransportError::Io { address }
    }
}

impl Transport for FileEeprom {
    fn write(&mut self, address: u16, data: &[u8]) -> TransportResult<()> {
        check_bounds(address, data.len(), self.capacity)?;
        check_page(address, data.len(), self.page_size)?;

        self.file
            .seek(SeekFrom::Start(address as u64))
            .and_then(|_| self.file.write_all(data))
            .map_err(|e| Self::io_error(address, e))
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> TransportResult<()> {
        check_bounds(address, buf.len(), self.capacity)?;

        self.file
            .seek(SeekFrom::Start(address as u64))
            .and_then(|_| self.file.read_exact(buf))
            .map_err(|e| Self::io_error(address, e))
    }

    fn settle(&mut self, _duration: MillisDurationU32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_erased() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.bin");

        let mut image = FileEeprom::open(&path, 512, 32).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 512);

        let mut buf = [0u8; 16];
        image.read(496, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == ERASED_BYTE));
    }

    #[test]
    fn contents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.bin");

        {
            let mut image = FileEeprom::open(&path, 512, 32).unwrap();
            image.write(250, b"slot one").unwrap();
        }

        let mut image = FileEeprom::open(&path, 512, 32).unwrap();
        let mut buf = [0u8; 8];
        image.read(250, &mut buf).unwrap();
        assert_eq!(&buf, b"slot one");
    }

    #[test]
    fn short_image_is_extended_with_sentinel() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x00; 100]).unwrap();
        file.flush().unwrap();

        let mut image = FileEeprom::open(file.path(), 256, 32).unwrap();
        let mut buf = [0u8; 2];
        image.read(99, &mut buf).unwrap();
        assert_eq!(buf, [0x00, ERASED_BYTE]);
    }

    #[test]
    fn enforces_device_contract() {
        let dir = tempfile::tempdir().unwrap();
        let mut image = FileEeprom::open(dir.path().join("image.bin"), 256, 32).unwrap();

        assert!(matches!(
            image.write(30, &[0u8; 4]),
            Err(TransportError::PageOverflow { .. })
        ));
        let mut buf = [0u8; 4];
        assert!(matches!(
            image.read(254, &mut buf),
            Err(TransportError::OutOfBounds { .. })
        ));
    }
}
