//! Essay text normalization.
//!
//! - [`TextNormalizer`] runs the full clean/stopword/lemmatize pass.
//! - [`StopwordSet`] and [`Lemmatizer`] are loaded once from the lexicon
//!   directory (NLTK corpus layout) by the [`crate::registry`].

pub mod lemmatizer;
pub mod normalizer;
pub mod stopwords;


pub use lemmatizer::Lemmatizer;
pub use normalizer::{TextNormalizer, clean_text};
pub use stopwords::{ENGLISH_STOPWORDS, StopwordSet};

use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Paths inside an NLTK data directory.
pub fn stopwords_file(lexicon_dir: &Path) -> PathBuf {
    lexicon_dir.join("corpora").join("stopwords").join("english")
}

pub fn wordnet_dir(lexicon_dir: &Path) -> PathBuf {
    lexicon_dir.join("corpora").join("wordnet")
}

/// Builds a normalizer from an NLTK data directory.
///
/// A missing stopword file falls back to [`ENGLISH_STOPWORDS`]; a missing
/// WordNet directory leaves lemmatization as the identity. Files that exist but
/// cannot be read are errors.
pub fn load_normalizer(lexicon_dir: &Path) -> std::io::Result<TextNormalizer> {
    let stopwords_path = stopwords_file(lexicon_dir);
    let stopwords = if stopwords_path.exists() {
        StopwordSet::from_file(&stopwords_path)?
    } else {
        warn!(
            path = %stopwords_path.display(),
            "Stopword corpus not found, using built-in English list"
        );
        StopwordSet::english()
    };

    let wordnet = wordnet_dir(lexicon_dir);
    let lemmatizer = if wordnet.is_dir() {
        Lemmatizer::from_wordnet_dir(&wordnet)?
    } else {
        warn!(
            path = %wordnet.display(),
            "WordNet corpus not found, lemmatization disabled"
        );
        Lemmatizer::identity()
    };

    info!(
        stopwords = stopwords.len(),
        lemmatizer = lemmatizer.has_dictionary(),
        "Lexicon loaded"
    );

    Ok(TextNormalizer::new(stopwords, lemmatizer))
}
