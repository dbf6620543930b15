//! Event record store for badge EEPROMs
//!
//! Persists a conference schedule on a small paged EEPROM reached over a
//! slow bus. Each event is packed into one fixed 250-byte slot; erased
//! slots read as the 0xFF sentinel and decode to nothing.
//!
//! Key constraints:
//! - Runs without an allocator; every buffer is bounded at compile time
//! - Writes never exceed a page and settle after every page
//! - Corrupt or unreadable slots are absent, never half-decoded
//!
//! ```rust
//! use eventrom_core::{EventBuilder, EventStore, StoreConfig};
//! use eventrom_core::transport::MemoryEeprom;
//!
//! let mut store = EventStore::new(MemoryEeprom::<4096>::new(32), StoreConfig::default());
//! store.wipe().unwrap();
//!
//! let keynote = EventBuilder::new("Keynote")
//!     .starts_at(1730649600)
//!     .ends_at(1730653200)
//!     .speaker("Elliot")
//!     .description("Opening remarks")
//!     .build()
//!     .unwrap();
//! store.save(&keynote, 0).unwrap();
//!
//! for (slot, event) in store.list_slots(16) {
//!     assert_eq!((slot, event.name()), (0, "Keynote"));
//! }
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod codec;
pub mod config;
pub mod constants;
pub mod enumerate;
pub mod erase;
pub mod errors;
pub mod event;
pub mod store;
pub mod transport;

// Public API
pub use codec::DecodeFault;
pub use config::{Geometry, StoreConfig};
pub use enumerate::Slots;
pub use erase::{VerifyOutcome, WipeReport};
pub use errors::{
    StoreError, StoreResult, TransportError, TransportResult, ValidationError,
    ValidationResult,
};
pub use event::{EpochSeconds, Event, EventBuilder, Field};
pub use store::{EventStore, SlotStatus};
pub use transport::Transport;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
