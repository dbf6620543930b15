//! End-to-end store behaviour over simulated and file-backed devices

#![cfg(feature = "std")]

mod common;

use common::{ceremony, largest, schedule, slot_is_erased, store, store_with, Device};
use eventrom_core::codec;
use eventrom_core::constants::{ERASED_BYTE, SLOT_SIZE};
use eventrom_core::transport::{Fault, FileEeprom};
use eventrom_core::{
    Event, EventStore, Field, SlotStatus, StoreConfig, StoreError, TransportError,
    ValidationError,
};

#[test]
fn ceremony_survives_a_round_trip() {
    let mut store = store();
    store.save(&ceremony(), 0).unwrap();

    let loaded = store.load(0).unwrap();
    assert_eq!(loaded, ceremony());
    assert_eq!(codec::encode(&loaded).unwrap().len(), 33);
}

#[test]
fn largest_record_fills_the_last_slot() {
    let mut store = store();
    store.save(&largest(), 15).unwrap();

    assert_eq!(codec::encode(&largest()).unwrap().len(), SLOT_SIZE);
    assert_eq!(store.load(15), Some(largest()));
    assert!(slot_is_erased(store.transport(), 14));
    assert!(store.transport().as_bytes()[4000..].iter().all(|&b| b == ERASED_BYTE));
}

#[test]
fn oversized_description_is_rejected() {
    let err = Event::new("Talk", 0, 0, "Speaker", &"d".repeat(139)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::TooLong { field: Field::Description, len: 139, max: 138 }
    );
}

#[test]
fn wipe_is_idempotent() {
    let mut store = store();
    for (slot, event) in schedule().iter().enumerate() {
        store.save(event, slot * 4).unwrap();
    }

    for _ in 0..2 {
        let report = store.wipe().unwrap();
        assert!(report.is_clean());
        for slot in 0..store.slot_count() {
            assert_eq!(store.load(slot), None);
        }
    }
}

#[test]
fn listing_skips_the_gap() {
    let talks = schedule();
    let mut store = store();
    store.save(&talks[0], 0).unwrap();
    store.save(&talks[1], 2).unwrap();

    let listed: Vec<_> = store.list_slots(3).collect();
    assert_eq!(listed, vec![(0, talks[0].clone()), (2, talks[1].clone())]);
}

#[test]
fn torn_save_reads_as_absent_until_rewritten() {
    let mut store = store();
    store
        .transport_mut()
        .inject(Fault::TornWrite { address: 10, bytes_written: 4 })
        .unwrap();

    assert_eq!(
        store.save(&ceremony(), 0),
        Err(StoreError::Transport(TransportError::Bus { address: 0, reason: "torn write" }))
    );
    assert_eq!(store.load(0), None);
    assert!(matches!(store.inspect(0), Ok(SlotStatus::Corrupt(_))));

    store.save(&ceremony(), 0).unwrap();
    assert_eq!(store.load(0), Some(ceremony()));
}

#[test]
fn absent_device_is_reported() {
    let mut store = store();
    store.transport_mut().inject(Fault::Absent).unwrap();

    assert_eq!(
        store.save(&ceremony(), 3),
        Err(StoreError::Transport(TransportError::Nack { address: 750 }))
    );
}

#[test]
fn verified_padded_saves() {
    let config = StoreConfig::default()
        .with_write_verify(true)
        .with_slot_padding(true);
    let mut store = store_with(config);

    store.save(&largest(), 1).unwrap();
    store.save(&ceremony(), 1).unwrap();

    let bytes = store.transport().as_bytes();
    assert!(bytes[250 + 33..500].iter().all(|&b| b == ERASED_BYTE));
    assert_eq!(store.load(1), Some(ceremony()));
}

#[test]
fn filling_free_slots() {
    let mut store = store();
    for event in schedule() {
        let slot = store.first_empty_slot().unwrap();
        store.save(&event, slot).unwrap();
    }
    assert_eq!(store.first_empty_slot(), Some(4));

    store.clear(1).unwrap();
    assert_eq!(store.first_empty_slot(), Some(1));
    assert_eq!(store.list_slots(16).map(|(slot, _)| slot).collect::<Vec<_>>(), [0, 2, 3]);
}

#[test]
fn store_over_a_borrowed_device() {
    let mut device = Device::new(32);
    {
        let mut store = EventStore::new(&mut device, StoreConfig::default());
        store.save(&ceremony(), 2).unwrap();
    }
    assert_eq!(device.as_bytes()[500], 8);
    assert_eq!(&device.as_bytes()[501..509], b"Ceremony");
}

#[test]
fn image_file_holds_a_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badge.bin");
    let talks = schedule();

    {
        let image = FileEeprom::open(&path, 4096, 32).unwrap();
        let mut store = EventStore::new(image, StoreConfig::default());
        store.wipe().unwrap();
        for (slot, event) in talks.iter().enumerate() {
            store.save(event, slot).unwrap();
        }
    }

    let raw = std::fs::read(&path).unwrap();
    assert_eq!(raw.len(), 4096);
    assert_eq!(raw[250] as usize, talks[1].name().len());

    let image = FileEeprom::open(&path, 4096, 32).unwrap();
    let mut store = EventStore::new(image, StoreConfig::default());
    let listed: Vec<_> = store.list_slots(16).map(|(_, event)| event).collect();
    assert_eq!(listed, talks);
}
