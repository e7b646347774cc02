use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use ts_core::{Error, Result};
use url::Url;
use super::timedtext::{parse_timedtext, parse_transcript_xml};

pub const DEFAULT_LANGUAGES: [&str; 3] = ["en", "en-US", "en-GB"];
const YOUTUBE_BASE: &str = "https://www.youtube.com";
const CAPTION_TRACKS_MARKER: &str = "\"captionTracks\":";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Fetches transcripts from the caption tracks listed on the watch page, falling
/// back to the public timed-text endpoint when the page lists none.
pub struct TranscriptFetcher {
    client: Client,
    base_url: Url,
    languages: Vec<String>,
}

impl fmt::Debug for TranscriptFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptFetcher")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .field("languages", &self.languages)
            .finish()
    }
}

impl TranscriptFetcher {
    pub fn new() -> Result<Self> {
        Self::with_base_url(YOUTUBE_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| Error::Config(format!("invalid YouTube base URL: {}", e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        })
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        if !languages.is_empty() {
            self.languages = languages;
        }
        self
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Transcript text as one space-separated string.
    pub async fn fetch_text(&self, video_id: &str) -> Result<String> {
        let segments = self.fetch(video_id).await?;
        Ok(segments.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join(" "))
    }

    pub async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        let primary_error = match self.fetch_caption_track(video_id).await {
            Ok(segments) if !segments.is_empty() => return Ok(segments),
            Ok(_) => Error::TranscriptUnavailable(format!("empty transcript for video {}", video_id)),
            Err(e @ (Error::TranscriptsDisabled(_) | Error::TranscriptUnavailable(_))) => e,
            Err(e) => return Err(e),
        };

        tracing::warn!("⚠️ {} - trying timed-text fallback for {}", primary_error, video_id);
        match self.fetch_timedtext(video_id).await {
            Ok(segments) if !segments.is_empty() => Ok(segments),
            Ok(_) => Err(primary_error),
            Err(e) => {
                tracing::warn!("⚠️ timed-text fallback failed for {}: {}", video_id, e);
                Err(primary_error)
            }
        }
    }

    async fn fetch_caption_track(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        let mut watch_url = self.endpoint("watch")?;
        watch_url.query_pairs_mut().append_pair("v", video_id);

        let html = self
            .client
            .get(watch_url)
            .header(reqwest::header::ACCEPT_LANGUAGE, self.languages.join(","))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let tracks = caption_tracks(&html)
            .ok_or_else(|| Error::TranscriptsDisabled(format!("Transcripts are disabled for video {}", video_id)))?;
        let track = select_track(&tracks, &self.languages).ok_or_else(|| {
            Error::TranscriptUnavailable(format!(
                "No transcript found for video {} in languages {:?}",
                video_id, self.languages
            ))
        })?;

        tracing::debug!("🎬 Using {} caption track for {}", track.language_code, video_id);
        let body = self.client.get(&track.base_url).send().await?.error_for_status()?.text().await?;
        Ok(parse_transcript_xml(&body))
    }

    async fn fetch_timedtext(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        for language in &self.languages {
            let mut url = self.endpoint("api/timedtext")?;
            url.query_pairs_mut()
                .append_pair("v", video_id)
                .append_pair("lang", language)
                .append_pair("fmt", "json3");

            let response = self.client.get(url).send().await?;
            if !response.status().is_success() {
                continue;
            }
            let segments = parse_timedtext(&response.text().await?)?;
            if !segments.is_empty() {
                return Ok(segments);
            }
        }
        Ok(Vec::new())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("invalid YouTube endpoint {}: {}", path, e)))
    }
}

/// The `captionTracks` array embedded in the watch page's player response.
fn caption_tracks(html: &str) -> Option<Vec<CaptionTrack>> {
    let start = html.find(CAPTION_TRACKS_MARKER)? + CAPTION_TRACKS_MARKER.len();
    serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<Vec<CaptionTrack>>()
        .next()?
        .ok()
        .filter(|tracks| !tracks.is_empty())
}

/// First preferred language wins; manual captions beat generated ones.
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let mut matching = tracks.iter().filter(|t| t.language_code.eq_ignore_ascii_case(lang));
        let first = matching.next()?;
        if !first.is_generated() {
            return Some(first);
        }
        Some(matching.find(|t| !t.is_generated()).unwrap_or(first))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.com/{}", lang),
            language_code: lang.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_caption_tracks_from_player_response() {
        let html = r#"<script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","languageCode":"en","kind":"asr"}],"audioTracks":[]}}};</script>"#;
        let tracks = caption_tracks(html).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].base_url, "https://www.youtube.com/api/timedtext?v=abc&lang=en");
        assert!(tracks[0].is_generated());

        assert!(caption_tracks("<html>no captions here</html>").is_none());
        assert!(caption_tracks(r#""captionTracks":[]"#).is_none());
    }

    #[test]
    fn test_track_selection_prefers_language_then_manual() {
        let tracks = vec![track("de", None), track("en", Some("asr")), track("en", None)];
        let languages = vec!["fr".to_string(), "en".to_string()];
        let chosen = select_track(&tracks, &languages).unwrap();
        assert_eq!(chosen.language_code, "en");
        assert!(!chosen.is_generated());

        let only_generated = vec![track("en", Some("asr"))];
        assert!(select_track(&only_generated, &languages).unwrap().is_generated());

        assert!(select_track(&tracks, &["ja".to_string()]).is_none());
    }
}
