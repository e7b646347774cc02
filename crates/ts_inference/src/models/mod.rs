use std::fmt;
use std::sync::Arc;
use ts_core::{Result, SummarizationModel};
use crate::client::ResilientClient;
use crate::InferenceConfig;

pub mod dummy;

pub use dummy::DummyModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ModelKind {
    /// Remote Hugging Face inference endpoint
    #[default]
    Huggingface,
    /// Offline extractive stand-in, no network access
    Dummy,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Huggingface => write!(f, "huggingface"),
            ModelKind::Dummy => write!(f, "dummy"),
        }
    }
}

pub fn create_model(kind: ModelKind, config: &InferenceConfig) -> Result<Arc<dyn SummarizationModel>> {
    let model: Arc<dyn SummarizationModel> = match kind {
        ModelKind::Huggingface => Arc::new(ResilientClient::new(config)?),
        ModelKind::Dummy => Arc::new(DummyModel::new()),
    };
    tracing::info!("🤖 Using {} model: {}", kind, model.name());
    Ok(model)
}
