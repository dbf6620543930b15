//! Shared fixtures for integration tests
//!
//! - Stores over the reference part
//! - A small conference schedule
//! - Assertion helpers for device contents

#![allow(dead_code)]

use eventrom_core::constants::{ERASED_BYTE, SLOT_SIZE};
use eventrom_core::transport::MemoryEeprom;
use eventrom_core::{Event, EventStore, StoreConfig};

/// Reference part: 4096 bytes
pub type Device = MemoryEeprom<4096>;

/// Store over an erased reference part with default behaviour
pub fn store() -> EventStore<Device> {
    store_with(StoreConfig::default())
}

/// Store over an erased reference part
pub fn store_with(config: StoreConfig) -> EventStore<Device> {
    EventStore::new(Device::new(32), config)
}

/// Event from the badge launch
pub fn ceremony() -> Event {
    Event::new("Ceremony", 1730649600, 1730653200, "Elliot", "Badges!").unwrap()
}

/// A day of talks, one hour each
pub fn schedule() -> Vec<Event> {
    [
        ("Opening Keynote", "Ada", "Welcome and logistics"),
        ("Soldering 101", "Grace", "Bring your badge"),
        ("I2C Deep Dive", "Linus", "Clock stretching explained"),
        ("Closing", "Elliot", "Prizes"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (name, speaker, description))| {
        let start = 1730649600 + i as u32 * 3600;
        Event::new(name, start, start + 3600, speaker, description).unwrap()
    })
    .collect()
}

/// Event with every text field at its bound
pub fn largest() -> Event {
    Event::new(
        &"n".repeat(50),
        u32::MAX,
        0,
        &"s".repeat(50),
        &"d".repeat(138),
    )
    .unwrap()
}

/// Whether every byte of `slot` holds the sentinel
pub fn slot_is_erased(device: &Device, slot: usize) -> bool {
    let base = slot * SLOT_SIZE;
    device.as_bytes()[base..base + SLOT_SIZE]
        .iter()
        .all(|&b| b == ERASED_BYTE)
}
