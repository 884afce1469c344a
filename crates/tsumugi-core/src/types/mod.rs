pub mod segment;
pub mod slot;

pub use segment::{render, CreditSegment};
pub use slot::{SlotField, SlotIndex, SlotValues};
