//! Transcript and cleaned-text value objects

use std::fmt;

/// Raw text returned by the speech-to-text service.
/// Transient: consumed by the cleanup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptText(String);

impl TranscriptText {
    /// Create from a string; the value is stored trimmed
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TranscriptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final text presented to the user.
///
/// Either the cleanup result, or the untouched transcript when cleanup
/// failed; which of the two it is stays observable so the surface can say so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedText {
    text: String,
    fallback: bool,
}

impl CleanedText {
    /// Successful cleanup result
    pub fn cleaned(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            fallback: false,
        }
    }

    /// Fallback: present the raw transcript unmodified
    pub fn fallback(transcript: TranscriptText) -> Self {
        Self {
            text: transcript.into_string(),
            fallback: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when cleanup failed and this is the raw transcript
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for CleanedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
