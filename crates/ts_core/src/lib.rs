pub mod error;
pub mod models;
pub mod types;

pub use error::Error;
pub use models::SummarizationModel;
pub use types::{
    word_count, DecodingParameters, SummaryRequest, SummaryResult, TargetLength,
};

pub type Result<T> = std::result::Result<T, Error>;
