use tracing::debug;

use super::lemmatizer::Lemmatizer;
use super::stopwords::StopwordSet;

/// Cleans essay text before it reaches the encoder.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    stopwords: StopwordSet,
    lemmatizer: Lemmatizer,
}

impl TextNormalizer {
    pub fn new(stopwords: StopwordSet, lemmatizer: Lemmatizer) -> Self {
        Self {
            stopwords,
            lemmatizer,
        }
    }

    /// Strips non-letters, lowercases and collapses whitespace; with
    /// `remove_stopwords`, also drops stopwords and lemmatizes what is left.
    ///
    /// Returns an empty string when the input holds no ASCII letters.
    pub fn normalize(&self, text: &str, remove_stopwords: bool) -> String {
        let cleaned = clean_text(text);
        let tokens = cleaned.split(' ').filter(|t| !t.is_empty());

        let normalized = if remove_stopwords {
            tokens
                .filter(|t| !self.stopwords.contains(t))
                .map(|t| self.lemmatizer.lemmatize(t))
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            tokens.collect::<Vec<_>>().join(" ")
        };

        debug!(
            input_len = text.len(),
            output_len = normalized.len(),
            remove_stopwords,
            "Normalized essay text"
        );

        normalized
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }
}

/// Replaces every non `[A-Za-z]` character with a space, lowercases, and
/// collapses whitespace runs into single spaces (trimmed).
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}
