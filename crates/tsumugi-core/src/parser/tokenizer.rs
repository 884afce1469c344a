//! # Artist Credit Tokenizer
//!
//! Splits a freeform credit string such as `"A vs. B feat. C"` into ordered
//! [`CreditSegment`]s, keeping every delimiter verbatim as the join phrase of
//! the artist before it.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::parser::delimiter::{scan_delimiters, Delimiter};
use crate::types::CreditSegment;

/// What to do with the empty artist token left by a string that ends in a
/// delimiter, e.g. the final `)` of `"A(CV.B)"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailingToken {
    /// Drop the empty token and the dangling delimiter, so the last segment
    /// never carries a join phrase.
    #[default]
    Drop,
    /// Keep the empty token as a final segment; the segment before it keeps
    /// the dangling delimiter as its join phrase.
    Keep,
}

/// Configuration for the credit tokenizer.
#[derive(Debug, Clone, Default)]
pub struct TokenizerConfig {
    /// Policy for a trailing empty artist token.
    pub trailing: TrailingToken,
}

impl TokenizerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trailing-token policy.
    pub fn with_trailing(mut self, trailing: TrailingToken) -> Self {
        self.trailing = trailing;
        self
    }
}

/// Tokenizer for artist credit strings.
#[derive(Debug, Clone, Default)]
pub struct CreditTokenizer {
    config: TokenizerConfig,
}

impl CreditTokenizer {
    /// Create a tokenizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tokenizer with the given configuration.
    pub fn with_config(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// Get the tokenizer configuration.
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Split a credit string into segments.
    ///
    /// Never fails: a string without any delimiter comes back as a single
    /// segment holding the whole, untrimmed input. The first segment's
    /// `credited_as` is always set to its own artist text so that pasting a
    /// full credit overwrites whatever name the first slot displayed.
    ///
    /// # Examples
    /// ```
    /// use tsumugi_core::parser::CreditTokenizer;
    ///
    /// let credit = CreditTokenizer::new().parse("A vs. B feat. C");
    /// assert_eq!(credit.len(), 3);
    /// assert_eq!(credit[0].join_phrase.as_deref(), Some(" vs. "));
    /// assert_eq!(credit[1].join_phrase.as_deref(), Some(" feat. "));
    /// assert_eq!(credit[2].join_phrase, None);
    /// ```
    pub fn parse(&self, input: &str) -> Vec<CreditSegment> {
        if input.is_empty() {
            return Vec::new();
        }

        let delimiters = scan_delimiters(input);
        let tokens = artist_spans(input, &delimiters);
        let mut segments = assemble(input, &tokens, &delimiters);

        if self.config.trailing == TrailingToken::Drop {
            drop_trailing_token(&mut segments);
        }

        if let Some(first) = segments.first_mut() {
            first.credited_as = Some(first.artist.clone());
        }

        trace!(
            input,
            delimiters = delimiters.len(),
            segments = segments.len(),
            "parsed artist credit"
        );
        segments
    }
}

/// Parse a credit string with the default configuration.
pub fn parse(input: &str) -> Vec<CreditSegment> {
    CreditTokenizer::new().parse(input)
}

/// Byte ranges of the artist tokens around `delimiters`, including empty
/// leading and trailing tokens.
fn artist_spans(input: &str, delimiters: &[Delimiter]) -> Vec<Range<usize>> {
    let mut spans = Vec::with_capacity(delimiters.len() + 1);
    let mut start = 0;
    for delimiter in delimiters {
        spans.push(start..delimiter.start);
        start = delimiter.end;
    }
    spans.push(start..input.len());
    spans
}

/// Pairs each artist token with the next delimiter.
///
/// A delimiter only becomes the token's join phrase when it starts exactly
/// where consumption stopped. Otherwise the segment gets no join phrase and
/// the unconsumed text is folded into the front of the next artist, so the
/// segments still cover every byte of `input`.
///
/// Spans must lie on char boundaries of `input`.
fn assemble(input: &str, tokens: &[Range<usize>], delimiters: &[Delimiter]) -> Vec<CreditSegment> {
    let mut segments: Vec<CreditSegment> = Vec::with_capacity(tokens.len());
    let mut pending = delimiters.iter();
    let mut consumed = 0;

    for token in tokens {
        let end = token.end.max(consumed);
        let mut segment = CreditSegment::new(&input[consumed..end]);
        consumed = end;

        if let Some(delimiter) = pending.next() {
            if delimiter.start == consumed {
                segment.join_phrase = Some(delimiter.text(input).to_owned());
                consumed = delimiter.end;
            } else {
                debug!(
                    at = consumed,
                    delimiter_start = delimiter.start,
                    "delimiter not contiguous with artist token; folding into next artist"
                );
            }
        }

        segments.push(segment);
    }

    if consumed < input.len() {
        if let Some(last) = segments.last_mut() {
            last.artist.push_str(&input[consumed..]);
        }
    }

    segments
}

/// Removes an empty final token together with the delimiter in front of it.
fn drop_trailing_token(segments: &mut Vec<CreditSegment>) {
    let dangling = segments.len() > 1
        && segments.last().is_some_and(|last| last.artist.is_empty())
        && segments[segments.len() - 2].join_phrase.is_some();

    if dangling {
        segments.pop();
        if let Some(last) = segments.last_mut() {
            last.join_phrase = None;
        }
    }
}
