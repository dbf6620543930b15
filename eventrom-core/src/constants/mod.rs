//! Constants for Eventrom Core
//!
//! Every number that ends up on the medium is defined here. The record
//! layout constants are bit-exact: changing any of them makes existing
//! device images unreadable.
//!
//! ## Organization
//!
//! - **Record**: field bounds and the slot size they add up to
//! - **Device**: erased-state sentinel and the reference part's geometry

/// Field bounds and slot layout of one encoded event.
pub mod record;

/// Erased-state sentinel and default device geometry.
pub mod device;

pub use record::{
    DESCRIPTION_MAX_BYTES, NAME_MAX_BYTES, SLOT_SIZE, SPEAKER_MAX_BYTES,
    TEXT_MIN_BYTES,
};

pub use device::{
    DEFAULT_CAPACITY, DEFAULT_PAGE_SIZE, DEFAULT_SETTLE_MS, ERASED_BYTE,
    ERASED_WORD,
};
