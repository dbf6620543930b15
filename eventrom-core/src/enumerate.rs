//! Slot Enumeration
//!
//! Walks slots in index order and yields the ones holding a valid record.
//! The walk is lazy: each step performs exactly one [`EventStore::load`]
//! when it is consumed, so changes made to the device between steps are
//! seen by the steps that follow. Calling [`EventStore::list_slots`] again
//! starts a fresh walk from slot zero.

use core::iter::FusedIterator;

use crate::event::Event;
use crate::store::{EventStore, SlotStatus};
use crate::transport::Transport;

/// Lazy walk over occupied slots, see [`EventStore::list_slots`]
#[derive(Debug)]
pub struct Slots<'a, T> {
    store: &'a mut EventStore<T>,
    next: usize,
    end: usize,
}

impl<T: Transport> Iterator for Slots<'_, T> {
    type Item = (usize, Event);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            let slot = self.next;
            self.next += 1;
            if let Some(event) = self.store.load(slot) {
                return Some((slot, event));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.next))
    }
}

impl<T: Transport> FusedIterator for Slots<'_, T> {}

impl<T: Transport> EventStore<T> {
    /// Occupied slots among the first `max_slots`, in index order
    ///
    /// `max_slots` is clamped to the device slot count. Erased, corrupt and
    /// unreadable slots are skipped.
    ///
    /// ```rust
    /// use eventrom_core::{Event, EventStore, StoreConfig};
    /// use eventrom_core::transport::MemoryEeprom;
    ///
    /// let mut store = EventStore::new(MemoryEeprom::<4096>::new(32), StoreConfig::default());
    /// store.save(&Event::new("Opening", 0, 60, "Ada", "Welcome").unwrap(), 2).unwrap();
    ///
    /// let names: Vec<_> = store.list_slots(16).map(|(slot, e)| (slot, e.name().len())).collect();
    /// assert_eq!(names, [(2, 7)]);
    /// ```
    pub fn list_slots(&mut self, max_slots: usize) -> Slots<'_, T> {
        let end = max_slots.min(self.slot_count());
        Slots { store: self, next: 0, end }
    }

    /// Lowest slot that is erased, if any
    ///
    /// Corrupt slots are not considered free; clear them first.
    pub fn first_empty_slot(&mut self) -> Option<usize> {
        (0..self.slot_count()).find(|&slot| matches!(self.inspect(slot), Ok(SlotStatus::Empty)))
    }
}
