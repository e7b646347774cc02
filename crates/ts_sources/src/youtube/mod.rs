mod timedtext;
mod transcript;
mod video_id;

pub use timedtext::{parse_json3, parse_timedtext, parse_transcript_xml, parse_vtt};
pub use transcript::{TranscriptFetcher, TranscriptSegment, DEFAULT_LANGUAGES};
pub use video_id::extract_video_id;
