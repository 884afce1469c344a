use std::fmt;

use serde::{Deserialize, Serialize};

/// One contributor's credit inside an artist credit.
///
/// A full credit is an ordered list of segments; rendering each segment's
/// artist followed by its join phrase reproduces the credited string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreditSegment {
    /// Artist name as searched, or an opaque artist identifier.
    pub artist: String,

    /// Name as credited, when it must override what the slot displays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credited_as: Option<String>,

    /// Literal text rendered between this segment and the next.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_phrase: Option<String>,
}

impl CreditSegment {
    /// Creates a segment holding only an artist.
    #[must_use]
    pub fn new(artist: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            credited_as: None,
            join_phrase: None,
        }
    }

    /// Sets the credited name.
    #[must_use]
    pub fn with_credited_as(mut self, credited_as: impl Into<String>) -> Self {
        self.credited_as = Some(credited_as.into());
        self
    }

    /// Sets the join phrase.
    #[must_use]
    pub fn with_join_phrase(mut self, join_phrase: impl Into<String>) -> Self {
        self.join_phrase = Some(join_phrase.into());
        self
    }

    /// Join phrase, or `""` when absent.
    #[must_use]
    pub fn join_phrase_or_empty(&self) -> &str {
        self.join_phrase.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for CreditSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.artist, self.join_phrase_or_empty())
    }
}

/// Renders a whole credit back into a single string.
#[must_use]
pub fn render(segments: &[CreditSegment]) -> String {
    segments.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_join_phrase() {
        let seg = CreditSegment::new("Tsukino").with_join_phrase(" feat. ");
        assert_eq!(seg.to_string(), "Tsukino feat. ");
        assert_eq!(CreditSegment::new("Kagura").to_string(), "Kagura");
    }

    #[test]
    fn render_concatenates_segments() {
        let credit = vec![
            CreditSegment::new("A").with_join_phrase(" vs. "),
            CreditSegment::new("B").with_join_phrase(" feat. "),
            CreditSegment::new("C"),
        ];
        assert_eq!(render(&credit), "A vs. B feat. C");
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn absent_fields_are_skipped_in_json() {
        let seg = CreditSegment::new("A").with_join_phrase("(CV.");
        let json = serde_json::to_string(&seg).unwrap();
        assert_eq!(json, r#"{"artist":"A","join_phrase":"(CV."}"#);

        let back: CreditSegment = serde_json::from_str(r#"{"artist":"B"}"#).unwrap();
        assert_eq!(back, CreditSegment::new("B"));
    }
}
