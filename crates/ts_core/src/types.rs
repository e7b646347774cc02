use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use crate::{Error, Result};

/// Coarse size class requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLength {
    Short,
    Medium,
    Long,
}

impl TargetLength {
    pub const ALL: [TargetLength; 3] = [TargetLength::Short, TargetLength::Medium, TargetLength::Long];

    /// The integer the HTTP surface uses for this class.
    pub fn words(self) -> u32 {
        match self {
            TargetLength::Short => 100,
            TargetLength::Medium => 150,
            TargetLength::Long => 200,
        }
    }

    /// Resolve an arbitrary integer to the nearest preset. Ties go to the longer one,
    /// so 125 is Medium and 175 is Long.
    pub fn from_words(words: u32) -> Self {
        let mut best = TargetLength::Short;
        for candidate in Self::ALL {
            if words.abs_diff(candidate.words()) <= words.abs_diff(best.words()) {
                best = candidate;
            }
        }
        best
    }
}

impl Default for TargetLength {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for TargetLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetLength::Short => "short",
            TargetLength::Medium => "medium",
            TargetLength::Long => "long",
        };
        write!(f, "{} ({})", name, self.words())
    }
}

/// Decoding bounds sent to the remote model alongside the input text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodingParameters {
    pub max_length: u32,
    pub min_length: u32,
    pub length_penalty: f64,
    #[serde(rename = "num_beams")]
    pub beam_count: u32,
    pub no_repeat_ngram_size: u32,
    #[serde(rename = "do_sample", serialize_with = "sampling_flag")]
    pub deterministic: bool,
}

fn sampling_flag<S: Serializer>(deterministic: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_bool(!deterministic)
}

#[derive(Debug, Clone)]
pub struct SummaryRequest {
    text: String,
    target_length: TargetLength,
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>, target_length: TargetLength) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self { text, target_length })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target_length(&self) -> TargetLength {
        self.target_length
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub original_text: String,
    #[serde(rename = "summary")]
    pub summary_text: String,
    #[serde(rename = "original_length")]
    pub original_word_count: usize,
    #[serde(rename = "summary_length")]
    pub summary_word_count: usize,
}

impl SummaryResult {
    pub fn new(original_text: String, summary_text: String) -> Self {
        Self {
            original_word_count: word_count(&original_text),
            summary_word_count: word_count(&summary_text),
            original_text,
            summary_text,
        }
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_lengths_map_exactly() {
        assert_eq!(TargetLength::from_words(100), TargetLength::Short);
        assert_eq!(TargetLength::from_words(150), TargetLength::Medium);
        assert_eq!(TargetLength::from_words(200), TargetLength::Long);
    }

    #[test]
    fn test_other_lengths_pick_nearest_preset() {
        assert_eq!(TargetLength::from_words(0), TargetLength::Short);
        assert_eq!(TargetLength::from_words(120), TargetLength::Short);
        assert_eq!(TargetLength::from_words(125), TargetLength::Medium);
        assert_eq!(TargetLength::from_words(160), TargetLength::Medium);
        assert_eq!(TargetLength::from_words(175), TargetLength::Long);
        assert_eq!(TargetLength::from_words(5000), TargetLength::Long);
    }

    #[test]
    fn test_blank_request_is_rejected() {
        let result = SummaryRequest::new("   \n\t ", TargetLength::Medium);
        assert!(matches!(result, Err(Error::EmptyInput)));

        let request = SummaryRequest::new("  some text ", TargetLength::Short).unwrap();
        assert_eq!(request.text(), "  some text ");
        assert_eq!(request.target_length(), TargetLength::Short);
    }

    #[test]
    fn test_parameters_serialize_with_wire_names() {
        let params = DecodingParameters {
            max_length: 250,
            min_length: 80,
            length_penalty: 1.0,
            beam_count: 2,
            no_repeat_ngram_size: 2,
            deterministic: true,
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["max_length"], 250);
        assert_eq!(value["min_length"], 80);
        assert_eq!(value["num_beams"], 2);
        assert_eq!(value["no_repeat_ngram_size"], 2);
        assert_eq!(value["do_sample"], false);
    }

    #[test]
    fn test_summary_result_counts_words() {
        let result = SummaryResult::new("one two  three\nfour".to_string(), "X Y".to_string());
        assert_eq!(result.original_word_count, 4);
        assert_eq!(result.summary_word_count, 2);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["summary"], "X Y");
        assert_eq!(value["original_length"], 4);
        assert_eq!(value["summary_length"], 2);
    }
}
