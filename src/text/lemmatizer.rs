//! Noun lemmatization following WordNet's morphology.
//!
//! A word is first looked up in the exception list (irregular plurals such as
//! `children -> child`); otherwise every matching suffix rule produces a
//! candidate. Candidates (including the word itself) survive only if the noun
//! index knows them, and the shortest survivor wins. Words with no surviving
//! candidate are returned unchanged.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

/// WordNet's noun detachment rules, in lookup order.
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

pub const NOUN_INDEX_FILE: &str = "index.noun";
pub const NOUN_EXCEPTIONS_FILE: &str = "noun.exc";

#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    exceptions: HashMap<String, Vec<String>>,
    index: Option<HashSet<String>>,
}

impl Lemmatizer {
    /// A lemmatizer with no dictionary; every word maps to itself.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builds a lemmatizer from an in-memory noun index and exception list.
    pub fn new<I, E>(index: I, exceptions: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator<Item = (String, Vec<String>)>,
    {
        Self {
            exceptions: exceptions.into_iter().collect(),
            index: Some(index.into_iter().map(Into::into).collect()),
        }
    }

    /// Loads `index.noun` and `noun.exc` from a WordNet corpus directory.
    pub fn from_wordnet_dir(dir: &Path) -> io::Result<Self> {
        let index_text = std::fs::read_to_string(dir.join(NOUN_INDEX_FILE))?;
        let exc_text = std::fs::read_to_string(dir.join(NOUN_EXCEPTIONS_FILE))?;

        let index = parse_index(&index_text);
        if index.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} contains no lemmas", dir.join(NOUN_INDEX_FILE).display()),
            ));
        }

        Ok(Self {
            exceptions: parse_exceptions(&exc_text),
            index: Some(index),
        })
    }

    pub fn has_dictionary(&self) -> bool {
        self.index.is_some()
    }

    /// Reduces `word` to its noun base form.
    pub fn lemmatize(&self, word: &str) -> String {
        let Some(index) = &self.index else {
            return word.to_string();
        };

        let candidates: Vec<String> = match self.exceptions.get(word) {
            Some(bases) => std::iter::once(word.to_string())
                .chain(bases.iter().cloned())
                .collect(),
            None => std::iter::once(word.to_string())
                .chain(detach_suffixes(word))
                .collect(),
        };

        // First shortest known candidate; ties keep lookup order.
        let mut best: Option<&String> = None;
        for candidate in candidates.iter().filter(|c| index.contains(c.as_str())) {
            if best.is_none_or(|b| candidate.len() < b.len()) {
                best = Some(candidate);
            }
        }

        best.cloned().unwrap_or_else(|| word.to_string())
    }
}

fn detach_suffixes(word: &str) -> impl Iterator<Item = String> + '_ {
    NOUN_SUFFIX_RULES
        .iter()
        .filter(move |(suffix, _)| word.ends_with(suffix))
        .map(move |(suffix, replacement)| {
            format!("{}{}", &word[..word.len() - suffix.len()], replacement)
        })
}

/// Lemma is the first field; license header lines start with a space.
fn parse_index(text: &str) -> HashSet<String> {
    text.lines()
        .filter(|line| !line.starts_with(' ') && !line.trim().is_empty())
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_lowercase)
        .collect()
}

fn parse_exceptions(text: &str) -> HashMap<String, Vec<String>> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let inflected = fields.next()?;
            let bases: Vec<String> = fields.map(str::to_string).collect();
            if bases.is_empty() {
                return None;
            }
            Some((inflected.to_string(), bases))
        })
        .collect()
}
