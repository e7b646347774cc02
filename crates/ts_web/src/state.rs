use std::fmt;
use ts_inference::Summarizer;
use ts_sources::TranscriptFetcher;

pub struct AppState {
    pub summarizer: Summarizer,
    pub transcripts: TranscriptFetcher,
}

impl AppState {
    pub fn new(summarizer: Summarizer, transcripts: TranscriptFetcher) -> Self {
        Self { summarizer, transcripts }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("summarizer", &self.summarizer)
            .field("transcripts", &self.transcripts)
            .finish()
    }
}
