//! # Slot Reconciliation
//!
//! Keeps the host's artist credit slots in step with a parsed credit.

pub mod editor;
pub mod memory;
pub mod provider;

pub use editor::{
    CreditEditor, ReconcileState, ReconcilerConfig, Reconciliation, CREDIT_SEPARATOR,
    CV_CLOSE_JOIN, CV_OPEN_JOIN,
};
pub use memory::{Growth, InputEvent, MemorySlots};
pub use provider::SlotProvider;
