//! Device Constants
//!
//! Values tied to the physical medium. The defaults describe the 4 KB
//! I2C EEPROM fitted to the schedule badge (24C32 class part).

/// Byte value of an erased cell.
///
/// A slot whose name length prefix reads as this value has never been
/// written since the last erase.
pub const ERASED_BYTE: u8 = 0xFF;

/// The sentinel as seen through a two-byte length prefix.
pub const ERASED_WORD: u16 = 0xFFFF;

/// Total capacity of the reference part in bytes.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Page size of the reference part.
///
/// A single write transaction must not exceed one page; common parts use
/// 16, 32 or 64 bytes.
pub const DEFAULT_PAGE_SIZE: usize = 32;

/// Largest page size the store drives.
///
/// Serial EEPROMs top out at 256-byte pages; erase strokes are sourced from
/// a static buffer of this size.
pub const MAX_PAGE_SIZE: usize = 256;

/// Write cycle time of the reference part.
///
/// The datasheet maximum is 5 ms; the badge firmware has always waited 10.
pub const DEFAULT_SETTLE_MS: u32 = 10;

/// Largest capacity reachable with 16-bit word addressing.
pub const MAX_ADDRESSABLE: usize = 1 << 16;
