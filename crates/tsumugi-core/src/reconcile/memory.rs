//! # In-Memory Slot Host
//!
//! A slot collection that behaves like the editing surface it stands in
//! for: new slots only show up at a later resumption, fields can be
//! disabled, and every accepted write is broadcast as an input event.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use crate::reconcile::provider::SlotProvider;
use crate::types::{SlotField, SlotValues};

/// Buffered input events per subscriber.
const EVENT_CAPACITY: usize = 256;

/// When requested slots become visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Growth {
    /// At the next settle.
    #[default]
    OnSettle,
    /// After the given number of settles (at least one).
    Delayed(u32),
    /// Never; requests are accepted and ignored.
    Never,
}

/// A write the host accepted, as seen by listeners bound to the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub slot: usize,
    pub field: SlotField,
    pub value: String,
}

#[derive(Debug, Default)]
struct Slot {
    values: SlotValues,
    disabled: Vec<SlotField>,
}

#[derive(Debug, Default)]
struct HostState {
    slots: Vec<Slot>,
    /// Settles left before each requested slot appears, in request order.
    pending: Vec<u32>,
    requests: usize,
    settles: usize,
}

/// Single-threaded in-memory slot collection.
#[derive(Debug)]
pub struct MemorySlots {
    state: RefCell<HostState>,
    growth: Growth,
    events: broadcast::Sender<InputEvent>,
}

impl Default for MemorySlots {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySlots {
    /// Creates an empty collection.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RefCell::new(HostState::default()),
            growth: Growth::default(),
            events,
        }
    }

    /// Creates a collection pre-populated with the given slots.
    pub fn with_slots(slots: impl IntoIterator<Item = SlotValues>) -> Self {
        let host = Self::new();
        host.state.borrow_mut().slots = slots
            .into_iter()
            .map(|values| Slot {
                values,
                disabled: Vec::new(),
            })
            .collect();
        host
    }

    /// Creates a collection holding `count` blank slots.
    pub fn with_empty_slots(count: usize) -> Self {
        Self::with_slots(std::iter::repeat_with(SlotValues::default).take(count))
    }

    /// Sets when requested slots become visible.
    pub fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    /// Makes a field read-only. Unknown slots are ignored.
    pub fn disable(&self, index: usize, field: SlotField) {
        if let Some(slot) = self.state.borrow_mut().slots.get_mut(index) {
            if !slot.disabled.contains(&field) {
                slot.disabled.push(field);
            }
        }
    }

    /// Subscribes to accepted writes.
    pub fn subscribe(&self) -> broadcast::Receiver<InputEvent> {
        self.events.subscribe()
    }

    /// Snapshot of every visible slot.
    pub fn values(&self) -> Vec<SlotValues> {
        self.state
            .borrow()
            .slots
            .iter()
            .map(|slot| slot.values.clone())
            .collect()
    }

    /// Number of slot requests received so far.
    pub fn requests(&self) -> usize {
        self.state.borrow().requests
    }

    /// Number of settles the host has gone through.
    pub fn settles(&self) -> usize {
        self.state.borrow().settles
    }

    fn apply_pending(&self) {
        let mut state = self.state.borrow_mut();
        state.settles += 1;
        for remaining in &mut state.pending {
            *remaining = remaining.saturating_sub(1);
        }
        let ready = state.pending.iter().filter(|r| **r == 0).count();
        if ready > 0 {
            state.pending.retain(|r| *r > 0);
            state
                .slots
                .extend(std::iter::repeat_with(Slot::default).take(ready));
            trace!(ready, total = state.slots.len(), "slots materialized");
        }
    }
}

impl SlotProvider for MemorySlots {
    fn count_slots(&self) -> usize {
        self.state.borrow().slots.len()
    }

    fn request_new_slot(&self) {
        let mut state = self.state.borrow_mut();
        state.requests += 1;
        match self.growth {
            Growth::OnSettle => state.pending.push(1),
            Growth::Delayed(settles) => state.pending.push(settles.max(1)),
            Growth::Never => {}
        }
    }

    fn read_slot(&self, index: usize) -> Option<SlotValues> {
        self.state
            .borrow()
            .slots
            .get(index)
            .map(|slot| slot.values.clone())
    }

    fn write_slot_field(&self, index: usize, field: SlotField, value: &str) {
        if value.is_empty() {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            let Some(slot) = state.slots.get_mut(index) else {
                return;
            };
            if slot.disabled.contains(&field) {
                return;
            }
            *slot.values.get_mut(field) = value.to_owned();
        }
        // No subscribers is fine.
        let _ = self.events.send(InputEvent {
            slot: index,
            field,
            value: value.to_owned(),
        });
    }

    fn is_editable(&self, index: usize, field: SlotField) -> bool {
        self.state
            .borrow()
            .slots
            .get(index)
            .is_some_and(|slot| !slot.disabled.contains(&field))
    }

    async fn settle(&self) {
        self.apply_pending();
        tokio::task::yield_now().await;
    }
}
