/*!
 * Records exchanged between readers and the writer.
 */

use serde::{Deserialize, Deserializer, Serialize};

/// One vocabulary entry as found in an input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Natural key of the entry
    pub word: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub translations: Vec<Translation>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub phrases: Vec<Phrase>,
}

// `null` children read the same as a missing key
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WordRecord {
    /// Create a record without children
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translations: Vec::new(),
            phrases: Vec::new(),
        }
    }

    /// Add a translation
    pub fn with_translation(mut self, translation: impl Into<String>, kind: impl Into<String>) -> Self {
        self.translations.push(Translation {
            translation: translation.into(),
            kind: kind.into(),
        });
        self
    }

    /// Add a phrase
    pub fn with_phrase(mut self, phrase: impl Into<String>, translation: impl Into<String>) -> Self {
        self.phrases.push(Phrase {
            phrase: phrase.into(),
            translation: translation.into(),
        });
        self
    }
}

/// Translation of a word, with its part of speech
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub translation: String,

    /// Part of speech, e.g. "v" or "n"
    #[serde(rename = "type")]
    pub kind: String,
}

/// Phrase containing a word, with its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub phrase: String,
    pub translation: String,
}

/// Parsed records of one input unit (or one chunk of it)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Name of the unit the records came from
    pub unit: String,
    /// Records in file order
    pub records: Vec<WordRecord>,
}

impl Batch {
    /// Tag records with the unit they came from
    pub fn new(unit: impl Into<String>, records: Vec<WordRecord>) -> Self {
        Self {
            unit: unit.into(),
            records,
        }
    }

    /// Number of records in the batch
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the batch carries no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
