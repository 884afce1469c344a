//! # Artist Credit Editor
//!
//! Projects a list of [`CreditSegment`]s onto the host's slot collection,
//! growing it when needed and writing only the fields a segment supplies.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{CreditError, Result};
use crate::parser::CreditTokenizer;
use crate::reconcile::provider::SlotProvider;
use crate::types::{CreditSegment, SlotField, SlotIndex};

/// Join phrase that opens a character voice credit.
pub const CV_OPEN_JOIN: &str = " (CV ";

/// Join phrase that closes a character voice credit.
pub const CV_CLOSE_JOIN: &str = ")";

/// Separator inserted before a newly appended character voice credit.
pub const CREDIT_SEPARATOR: &str = ",";

/// Where a `fill` or `append` currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReconcileState {
    /// No operation in flight.
    #[default]
    Idle,
    /// Slot requests are being issued.
    SlotsRequested,
    /// Waiting for requested slots to become visible.
    AwaitingVisibility,
    /// Writing segment values into slots.
    Writing,
}

/// Configuration for the credit editor.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    max_resumptions: u32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_resumptions: 32,
        }
    }
}

impl ReconcilerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the visibility wait budget (at least one cycle).
    pub fn with_max_resumptions(mut self, max_resumptions: u32) -> Self {
        self.max_resumptions = max_resumptions.max(1);
        self
    }

    /// Settle cycles to wait for requested slots before giving up.
    pub fn max_resumptions(&self) -> u32 {
        self.max_resumptions
    }
}

/// What an editor operation did to the slot collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Slots requested from the host.
    pub requested: usize,
    /// Settle cycles spent, request yields included.
    pub resumptions: u32,
    /// Fields actually written.
    pub fields_written: usize,
    /// Segments with no slot to land in at write time.
    pub skipped: usize,
}

impl Reconciliation {
    fn absorb(&mut self, other: Reconciliation) {
        self.requested += other.requested;
        self.resumptions += other.resumptions;
        self.fields_written += other.fields_written;
        self.skipped += other.skipped;
    }
}

/// Counts an operation as in flight until dropped. The editor goes back to
/// `Idle` when the last in-flight operation ends, however it ends.
struct InFlight<'a> {
    state: &'a Cell<ReconcileState>,
    active: &'a Cell<usize>,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a Cell<ReconcileState>, active: &'a Cell<usize>) -> Self {
        active.set(active.get() + 1);
        Self { state, active }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let left = self.active.get().saturating_sub(1);
        self.active.set(left);
        if left == 0 {
            self.state.set(ReconcileState::Idle);
        }
    }
}

/// Editor bound to one host slot collection.
///
/// All operations take `&self`: the editor runs on the host's single
/// logical thread and never locks the collection. A person typing into a
/// slot while an operation is in flight simply races it, last write wins.
pub struct CreditEditor<P> {
    provider: P,
    config: ReconcilerConfig,
    state: Cell<ReconcileState>,
    active: Cell<usize>,
}

impl<P: SlotProvider> CreditEditor<P> {
    /// Create an editor with default settings.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ReconcilerConfig::default())
    }

    /// Create an editor with the given configuration.
    pub fn with_config(provider: P, config: ReconcilerConfig) -> Self {
        Self {
            provider,
            config,
            state: Cell::new(ReconcileState::Idle),
            active: Cell::new(0),
        }
    }

    /// The host this editor writes to.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get the editor configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Current phase of the in-flight `fill` or `append`.
    ///
    /// When operations overlap on one editor this is the phase most recently
    /// entered by any of them; it only reads `Idle` once all have finished.
    pub fn state(&self) -> ReconcileState {
        self.state.get()
    }

    /// Writes `target` into the slots at the same indices, requesting
    /// however many slots are missing first.
    ///
    /// Fields a segment leaves empty are not touched, so pre-existing slots
    /// keep their values there and new slots keep the host's defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CreditError::SlotTimeout`] if the requested slots are not
    /// visible within the resumption budget. Nothing is written in that case.
    pub async fn fill(&self, target: &[CreditSegment]) -> Result<Reconciliation> {
        let _in_flight = InFlight::enter(&self.state, &self.active);
        let mut report = Reconciliation::default();

        let current = self.provider.count_slots();
        if target.len() > current {
            self.grow(current, target.len() - current, &mut report)
                .await?;
        }

        self.transition(ReconcileState::Writing);
        // Growth is only trusted after a fresh look at the collection.
        let visible = self.provider.count_slots();
        for (index, segment) in target.iter().enumerate() {
            if index >= visible {
                warn!(index, visible, "slot disappeared before it could be written");
                report.skipped += 1;
                continue;
            }
            report.fields_written += self.write_segment(index, segment);
        }

        debug!(
            segments = target.len(),
            requested = report.requested,
            written = report.fields_written,
            "filled artist credit"
        );
        Ok(report)
    }

    /// Requests one slot and writes `segment` into it once it is the last.
    ///
    /// # Errors
    ///
    /// Returns [`CreditError::SlotTimeout`] if the slot never shows up.
    pub async fn append(&self, segment: &CreditSegment) -> Result<Reconciliation> {
        let _in_flight = InFlight::enter(&self.state, &self.active);
        let mut report = Reconciliation::default();

        let current = self.provider.count_slots();
        self.grow(current, 1, &mut report).await?;

        self.transition(ReconcileState::Writing);
        let len = self.provider.count_slots();
        let index = SlotIndex::LAST
            .resolve(len)
            .ok_or(CreditError::SlotNotFound { index: -1, len })?;
        report.fields_written += self.write_segment(index, segment);

        Ok(report)
    }

    /// Reads the slot at `index` (negative counts from the end), lets
    /// `transform` edit it and writes back every non-empty field of the
    /// result. Returns the transformed segment.
    ///
    /// The segment handed to `transform` has every field present, empty
    /// ones as `Some("")`. Setting a field to `None` (or `""`) leaves the
    /// slot's value untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CreditError::SlotNotFound`] if `index` does not resolve;
    /// nothing is created or written then.
    pub fn update<F>(&self, index: isize, transform: F) -> Result<CreditSegment>
    where
        F: FnOnce(CreditSegment) -> CreditSegment,
    {
        self.rewrite(SlotIndex(index), transform)
            .map(|(updated, _)| updated)
    }

    /// `update` that also reports how many fields were written.
    fn rewrite<F>(&self, index: SlotIndex, transform: F) -> Result<(CreditSegment, usize)>
    where
        F: FnOnce(CreditSegment) -> CreditSegment,
    {
        let len = self.provider.count_slots();
        let not_found = CreditError::SlotNotFound {
            index: index.0,
            len,
        };

        let Some(resolved) = index.resolve(len) else {
            debug!(%index, len, "update target out of range");
            return Err(not_found);
        };
        let current = self.provider.read_slot(resolved).ok_or(not_found)?;

        let updated = transform(CreditSegment::from(current));
        let written = self.write_segment(resolved, &updated);
        Ok((updated, written))
    }

    /// Parses the credit string typed into the first slot and fills the
    /// collection with the result.
    ///
    /// # Errors
    ///
    /// Returns [`CreditError::EmptySource`] if the first slot has no artist
    /// text, or any error from [`fill`](Self::fill).
    pub async fn parse_first_slot(&self, tokenizer: &CreditTokenizer) -> Result<Reconciliation> {
        let source = self
            .provider
            .read_slot(0)
            .map(|values| values.artist)
            .filter(|artist| !artist.is_empty())
            .ok_or(CreditError::EmptySource)?;

        let target = tokenizer.parse(&source);
        debug!(%source, segments = target.len(), "parsed first slot");
        self.fill(&target).await
    }

    /// Credits `actor` as the voice of the character in the last slot:
    /// `..., Character (CV actor)`.
    ///
    /// The previous credit, if any, gets `", "` appended to its join phrase;
    /// the character's join phrase becomes [`CV_OPEN_JOIN`]; a new slot holds
    /// `actor` followed by [`CV_CLOSE_JOIN`]. An empty `actor` does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CreditError::MissingCharacter`] if the last slot has no
    /// artist, or any error from [`append`](Self::append).
    pub async fn append_credited_voice(&self, actor: &str) -> Result<Reconciliation> {
        let len = self.provider.count_slots();
        let character = SlotIndex::LAST
            .resolve(len)
            .and_then(|index| self.provider.read_slot(index))
            .map(|values| values.artist)
            .unwrap_or_default();
        if character.is_empty() {
            return Err(CreditError::MissingCharacter);
        }
        if actor.is_empty() {
            debug!(%character, "no voice actor to credit");
            return Ok(Reconciliation::default());
        }

        let mut report = Reconciliation::default();

        match self.rewrite(SlotIndex(-2), |previous| {
            let join_phrase = format!("{}{CREDIT_SEPARATOR} ", previous.join_phrase_or_empty());
            CreditSegment {
                join_phrase: Some(join_phrase),
                ..previous
            }
        }) {
            Ok((_, written)) => report.fields_written += written,
            Err(err) => trace!(%err, "no preceding credit to separate"),
        }

        let (_, written) = self.rewrite(SlotIndex::LAST, |last| CreditSegment {
            join_phrase: Some(CV_OPEN_JOIN.to_owned()),
            ..last
        })?;
        report.fields_written += written;

        let voice = CreditSegment::new(actor).with_join_phrase(CV_CLOSE_JOIN);
        report.absorb(self.append(&voice).await?);

        debug!(%character, actor, "appended character voice credit");
        Ok(report)
    }

    /// Issues `missing` requests, yielding to the host after each, then
    /// waits until `current + missing` slots are visible.
    async fn grow(
        &self,
        current: usize,
        missing: usize,
        report: &mut Reconciliation,
    ) -> Result<()> {
        self.transition(ReconcileState::SlotsRequested);
        for _ in 0..missing {
            self.provider.request_new_slot();
            self.provider.settle().await;
            report.resumptions += 1;
        }
        report.requested += missing;

        self.transition(ReconcileState::AwaitingVisibility);
        let expected = current + missing;
        let mut waited = 0;
        loop {
            let observed = self.provider.count_slots();
            if observed >= expected {
                trace!(expected, observed, waited, "requested slots visible");
                return Ok(());
            }
            if waited >= self.config.max_resumptions() {
                warn!(expected, observed, waited, "requested slots never appeared");
                return Err(CreditError::SlotTimeout {
                    expected,
                    observed,
                    resumptions: waited,
                });
            }
            self.provider.settle().await;
            waited += 1;
            report.resumptions += 1;
        }
    }

    /// Writes every non-empty, editable field of `segment` into the slot.
    fn write_segment(&self, index: usize, segment: &CreditSegment) -> usize {
        let mut written = 0;
        for field in SlotField::ALL {
            let Some(value) = field.of(segment).filter(|value| !value.is_empty()) else {
                continue;
            };
            if !self.provider.is_editable(index, field) {
                trace!(index, %field, "field disabled; skipping");
                continue;
            }
            self.provider.write_slot_field(index, field, value);
            written += 1;
        }
        written
    }

    fn transition(&self, next: ReconcileState) {
        trace!(from = ?self.state.get(), to = ?next, "reconcile state");
        self.state.set(next);
    }
}
