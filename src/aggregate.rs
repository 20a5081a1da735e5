//! Submission buffer and frequency aggregation.
//!
//! Aggregation is exact-string-match: case and whitespace are significant, so `"Cat"`,
//! `"cat"` and `"cat "` are three distinct entries. This keeps participant intent intact and
//! is deliberately not normalized.

use std::collections::HashMap;

/// Raw responses collected since the active question last changed, in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionBuffer {
    entries: Vec<String>,
}

impl SubmissionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push(text.into());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn frequencies(&self) -> WordFrequencies {
        WordFrequencies::aggregate(&self.entries)
    }
}

impl<S: Into<String>> FromIterator<S> for SubmissionBuffer {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// One unique submission text and how often it was seen.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct WordCount {
    pub text: String,
    pub count: u32,
}

/// Mapping from unique text to occurrence count.
///
/// Entries enumerate in first-appearance order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct WordFrequencies {
    entries: Vec<WordCount>,
}

impl WordFrequencies {
    pub fn aggregate<S: AsRef<str>>(submissions: &[S]) -> Self {
        let mut index = HashMap::<&str, usize>::with_capacity(submissions.len());
        let mut entries = Vec::<WordCount>::new();

        for s in submissions {
            let text = s.as_ref();
            match index.get(text) {
                Some(&i) => entries[i].count += 1,
                None => {
                    index.insert(text, entries.len());
                    entries.push(WordCount {
                        text: text.to_owned(),
                        count: 1,
                    });
                }
            }
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of unique words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordCount> {
        self.entries.iter()
    }

    pub fn get(&self, text: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.text == text)
            .map(|e| e.count)
    }

    /// Largest occurrence count, or `None` for an empty mapping.
    pub fn max_count(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.count).max()
    }

    /// Sum of all counts; equals the length of the aggregated input.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count as usize).sum()
    }
}

impl<'a> IntoIterator for &'a WordFrequencies {
    type Item = &'a WordCount;
    type IntoIter = std::slice::Iter<'a, WordCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
