//! # Tsumugi Core
//!
//! Splits freeform artist credits such as `"A feat. B (CV. C)"` into
//! structured segments and reconciles them onto a host's growable list of
//! artist credit slots.
//!
//! ## Quick Start
//!
//! ```rust
//! use tsumugi_core::parser::parse;
//! use tsumugi_core::reconcile::{CreditEditor, MemorySlots};
//!
//! let credit = parse("A vs. B feat. C");
//! assert_eq!(credit[0].artist, "A");
//! assert_eq!(credit[0].join_phrase.as_deref(), Some(" vs. "));
//!
//! let host = MemorySlots::with_empty_slots(1);
//! let editor = CreditEditor::new(&host);
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(editor.fill(&credit)).unwrap();
//!
//! assert_eq!(host.values().len(), 3);
//! assert_eq!(host.values()[2].artist, "C");
//! ```
pub mod error;
pub mod parser;
pub mod reconcile;
pub mod types;

// Re-export primary API
pub use error::{CreditError, Result};
pub use parser::{parse, CreditTokenizer, Delimiter, DelimiterKind, TokenizerConfig, TrailingToken};
pub use reconcile::{
    CreditEditor, Growth, InputEvent, MemorySlots, ReconcileState, ReconcilerConfig,
    Reconciliation, SlotProvider,
};
pub use types::{render, CreditSegment, SlotField, SlotIndex, SlotValues};
