use ts_core::{Error, Result};
use url::Url;

const ID_LEN: usize = 11;

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == ID_LEN
        && candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_youtube_host(host: &str) -> bool {
    let host = host.trim_start_matches("www.").trim_start_matches("m.").trim_start_matches("music.");
    host == "youtube.com" || host == "youtube-nocookie.com"
}

/// Accepts watch, short-link, embed, shorts and live URLs, or a bare video id.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();
    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };
    let url = Url::parse(&with_scheme).map_err(|_| Error::InvalidUrl(format!("Invalid YouTube URL: {}", input)))?;
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let segments = url.path_segments().map(|s| s.filter(|p| !p.is_empty()).collect::<Vec<_>>()).unwrap_or_default();

    let candidate = if host == "youtu.be" || host == "www.youtu.be" {
        segments.first().map(|s| s.to_string())
    } else if is_youtube_host(&host) {
        match segments.as_slice() {
            ["watch", ..] => url.query_pairs().find(|(k, _)| k == "v").map(|(_, v)| v.into_owned()),
            ["embed" | "shorts" | "live" | "v", id, ..] => Some(id.to_string()),
            _ => None,
        }
    } else {
        None
    };

    match candidate {
        Some(id) if is_video_id(&id) => Ok(id),
        _ => Err(Error::InvalidUrl(format!("Invalid YouTube URL: {}", input))),
    }
}
