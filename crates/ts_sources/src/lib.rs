//! Input collaborators: turn uploaded PDFs and YouTube videos into plain text.

pub mod pdf;
pub mod youtube;

pub use pdf::{ensure_pdf_file_name, extract_pdf_text};
pub use youtube::{extract_video_id, TranscriptFetcher, TranscriptSegment};
