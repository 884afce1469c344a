use std::future::Future;

use crate::types::{SlotField, SlotValues};

/// Capability surface of the host that owns the artist credit slots.
///
/// The host owns storage and may be mutated by a person at the same time;
/// the editor only reads, requests and writes through this trait. Indices
/// are non-negative here; relative indices are resolved by the editor
/// against a fresh [`count_slots`](SlotProvider::count_slots).
pub trait SlotProvider {
    /// Number of slots currently visible.
    fn count_slots(&self) -> usize;

    /// Asks the host for one more slot.
    ///
    /// Fire-and-forget: the slot is not guaranteed to be visible until a
    /// later [`settle`](SlotProvider::settle) has resolved.
    fn request_new_slot(&self);

    /// Reads the current values of a slot, `None` if it does not exist.
    fn read_slot(&self, index: usize) -> Option<SlotValues>;

    /// Writes one field as if it had been typed, notifying every listener
    /// bound to it.
    ///
    /// Must be a no-op when the slot or field is disabled, or `value` is empty.
    fn write_slot_field(&self, index: usize, field: SlotField, value: &str);

    /// Whether the field currently accepts input.
    fn is_editable(&self, index: usize, field: SlotField) -> bool {
        let _ = (index, field);
        true
    }

    /// Resolves at the host's next resumption point, after it has had a
    /// chance to apply pending slot requests.
    fn settle(&self) -> impl Future<Output = ()>;
}

impl<P: SlotProvider> SlotProvider for &P {
    fn count_slots(&self) -> usize {
        (**self).count_slots()
    }

    fn request_new_slot(&self) {
        (**self).request_new_slot();
    }

    fn read_slot(&self, index: usize) -> Option<SlotValues> {
        (**self).read_slot(index)
    }

    fn write_slot_field(&self, index: usize, field: SlotField, value: &str) {
        (**self).write_slot_field(index, field, value);
    }

    fn is_editable(&self, index: usize, field: SlotField) -> bool {
        (**self).is_editable(index, field)
    }

    fn settle(&self) -> impl Future<Output = ()> {
        (**self).settle()
    }
}
