//! Trigger keys and matches

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A trigger literal and whether its captured content may span whitespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Literal that starts a mention, e.g. `@` or `[[`
    pub literal: String,
    /// Whether the captured text may contain whitespace
    #[serde(default)]
    pub multi_word: bool,
}

impl Key {
    pub fn new(literal: impl Into<String>, multi_word: bool) -> Self {
        Self {
            literal: literal.into(),
            multi_word,
        }
    }

    /// Key whose capture ends at the first whitespace
    pub fn single(literal: impl Into<String>) -> Self {
        Self::new(literal, false)
    }

    /// Key whose capture may span whitespace
    pub fn multi(literal: impl Into<String>) -> Self {
        Self::new(literal, true)
    }

    /// Length of the literal in chars
    pub fn char_len(&self) -> usize {
        self.literal.chars().count()
    }
}

/// Ordered set of trigger keys.
///
/// Order only matters for display; the matcher picks anchors by their
/// distance to the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<Key>,
}

impl KeySet {
    /// Build a key set, dropping empty literals and later duplicates
    pub fn new(keys: Vec<Key>) -> Self {
        let mut set = Self::default();
        for key in keys {
            set.insert(key);
        }
        set
    }

    /// Parse the declarative attribute pair.
    ///
    /// `keys` is a space separated list of literals. `multiword` absent means
    /// no key is multi-word; present but empty means every key is; otherwise
    /// it lists the multi-word literals.
    ///
    /// Parsing never fails. Empty literals from doubled spaces and repeats of
    /// an earlier literal are dropped, and multi-word entries naming no key
    /// are ignored. `ExpanderConfig::validate` applies the same rules and
    /// only rejects a list that leaves no key.
    ///
    /// # Arguments
    /// * `keys` - Value of the `keys` attribute
    /// * `multiword` - Value of the `multiword` attribute, if present
    pub fn from_attributes(keys: Option<&str>, multiword: Option<&str>) -> Self {
        let literals = split_words(keys.unwrap_or_default());
        let multi_words = split_words(multiword.unwrap_or_default());
        let all_multi_word = multiword.is_some() && multi_words.is_empty();

        Self::new(
            literals
                .into_iter()
                .map(|literal| {
                    let multi = all_multi_word || multi_words.contains(&literal);
                    Key::new(literal, multi)
                })
                .collect(),
        )
    }

    fn insert(&mut self, key: Key) {
        if key.literal.is_empty() || self.get(&key.literal).is_some() {
            return;
        }
        self.keys.push(key);
    }

    /// Look up a key by its literal
    pub fn get(&self, literal: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.literal == literal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn split_words(value: &str) -> Vec<String> {
    value
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// A mention believed to be in progress.
///
/// Invariant: `position >= key length` and `position + text length` never
/// exceeds the length of the text it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Text captured after the trigger literal
    pub text: String,
    /// Literal of the trigger that fired
    pub key: String,
    /// Offset immediately after the trigger literal
    pub position: usize,
}

impl Match {
    /// Offset where the trigger literal starts
    pub fn anchor(&self) -> usize {
        self.position.saturating_sub(self.key.chars().count())
    }

    /// Editor range covering the trigger literal and the captured text
    pub fn replaced_range(&self) -> Range<usize> {
        self.anchor()..self.position + self.text.chars().count()
    }
}
