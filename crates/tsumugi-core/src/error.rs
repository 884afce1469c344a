use thiserror::Error;

/// Conditions reported by the credit editor.
///
/// None of these are fatal: each one describes a user action that could not
/// be completed (yet) and carries a one-line message suitable for a notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreditError {
    /// The requested slot index does not resolve inside the current collection.
    #[error("no artist credit slot at index {index} (collection has {len})")]
    SlotNotFound {
        /// The index as requested, possibly negative.
        index: isize,
        /// Number of slots visible when the index was resolved.
        len: usize,
    },

    /// Requested slots never became visible within the resumption budget.
    #[error(
        "artist credit slots did not appear: expected {expected}, observed {observed} after {resumptions} resumptions"
    )]
    SlotTimeout {
        /// Slot count the editor was waiting for.
        expected: usize,
        /// Slot count last observed.
        observed: usize,
        /// Number of settle cycles spent waiting.
        resumptions: u32,
    },

    /// The first slot holds no credit string to parse.
    #[error("enter the artist credits to parse in the first input box")]
    EmptySource,

    /// The last slot holds no character to attach a voice credit to.
    #[error("enter a character first")]
    MissingCharacter,
}

impl CreditError {
    /// Returns `true` if the caller can carry on after this condition.
    ///
    /// Every variant is currently recoverable; the method exists so callers
    /// don't have to match on the variant set.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SlotNotFound { .. }
            | Self::SlotTimeout { .. }
            | Self::EmptySource
            | Self::MissingCharacter => true,
        }
    }
}

/// Result type alias for credit editor operations.
pub type Result<T> = std::result::Result<T, CreditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = CreditError::SlotNotFound { index: -2, len: 1 };
        assert_eq!(
            err.to_string(),
            "no artist credit slot at index -2 (collection has 1)"
        );

        let err = CreditError::SlotTimeout {
            expected: 4,
            observed: 2,
            resumptions: 32,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 4"));
        assert!(msg.contains("observed 2"));
        assert!(msg.contains("32 resumptions"));
    }

    #[test]
    fn all_conditions_are_recoverable() {
        for err in [
            CreditError::SlotNotFound { index: 9, len: 3 },
            CreditError::SlotTimeout {
                expected: 1,
                observed: 0,
                resumptions: 1,
            },
            CreditError::EmptySource,
            CreditError::MissingCharacter,
        ] {
            assert!(err.is_recoverable(), "{err} should be recoverable");
        }
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CreditError>();
    }
}
