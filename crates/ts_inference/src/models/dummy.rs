use async_trait::async_trait;
use std::fmt;
use ts_core::{DecodingParameters, Result, SummarizationModel};

/// Returns the leading words of the input. Used for offline runs and tests.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummarizationModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn infer(&self, input: &str, parameters: &DecodingParameters) -> Result<String> {
        // roughly five tokens per word of output budget
        let limit = (parameters.max_length / 5).max(1) as usize;
        let words: Vec<&str> = input.split_whitespace().take(limit).collect();
        Ok(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::select_parameters;
    use ts_core::TargetLength;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();
        let text = (0..500).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");

        let short = model.infer(&text, &select_parameters(TargetLength::Short)).await.unwrap();
        assert_eq!(short.split_whitespace().count(), 50);
        assert!(short.starts_with("0 1 2"));

        let long = model.infer(&text, &select_parameters(TargetLength::Long)).await.unwrap();
        assert_eq!(long.split_whitespace().count(), 90);

        let tiny = model.infer("just three words", &select_parameters(TargetLength::Long)).await.unwrap();
        assert_eq!(tiny, "just three words");
    }
}
