use async_trait::async_trait;
use crate::types::DecodingParameters;
use crate::Result;

#[async_trait]
pub trait SummarizationModel: Send + Sync {
    fn name(&self) -> &str;

    /// Produce a summary of `input` using the given decoding bounds.
    async fn infer(&self, input: &str, parameters: &DecodingParameters) -> Result<String>;
}
