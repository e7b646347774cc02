use std::fmt;
use std::sync::Arc;
use ts_core::{word_count, Error, Result, SummarizationModel, SummaryRequest, SummaryResult, TargetLength};
use crate::chunker::chunk;
use crate::params::select_parameters;

/// Inputs up to this many words go to the model in one call.
pub const SINGLE_PASS_WORD_LIMIT: usize = 1500;
/// Chunk size for the map-reduce path.
pub const CHUNK_WORDS: usize = 800;

/// Top-level summarization policy: one pass for short inputs, sequential
/// map-reduce over word chunks for long ones.
pub struct Summarizer {
    model: Arc<dyn SummarizationModel>,
}

impl fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summarizer")
            .field("model", &self.model.name())
            .finish()
    }
}

impl Summarizer {
    pub fn new(model: Arc<dyn SummarizationModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn summarize(&self, text: &str, target: TargetLength) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }

        let parameters = select_parameters(target);
        let words = word_count(text);

        if words <= SINGLE_PASS_WORD_LIMIT {
            tracing::info!("📝 Summarizing {} words in a single pass ({})", words, target);
            return self.model.infer(text, &parameters).await;
        }

        let chunks = chunk(text, CHUNK_WORDS);
        let total = chunks.len();
        tracing::info!("📑 Summarizing {} words in {} chunks ({})", words, total, target);

        // strictly one call in flight; partials keep chunk order
        let mut partials = Vec::with_capacity(total);
        for (i, piece) in chunks.iter().enumerate() {
            tracing::debug!("🤖 Summarizing chunk {}/{}", i + 1, total);
            partials.push(self.model.infer(piece, &parameters).await?);
        }

        let combined = partials.join("\n");
        tracing::info!("🔄 Reducing {} partial summaries ({} words)", total, word_count(&combined));
        self.model.infer(&combined, &parameters).await
    }

    pub async fn summarize_request(&self, request: SummaryRequest) -> Result<SummaryResult> {
        let summary = self.summarize(request.text(), request.target_length()).await?;
        let result = SummaryResult::new(request.text().to_string(), summary);
        tracing::info!(
            "✨ Summary ready: {} words -> {} words",
            result.original_word_count,
            result.summary_word_count
        );
        Ok(result)
    }
}
