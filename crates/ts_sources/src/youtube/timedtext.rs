use html_escape::decode_html_entities;
use scraper::{Html, Selector};
use serde::Deserialize;
use ts_core::{Error, Result};
use super::transcript::TranscriptSegment;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Body {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: f64,
    #[serde(default)]
    d_duration_ms: f64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a timed-text body in whichever format the endpoint returned.
pub fn parse_timedtext(body: &str) -> Result<Vec<TranscriptSegment>> {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        Ok(Vec::new())
    } else if trimmed.starts_with('{') {
        parse_json3(trimmed)
    } else if trimmed.starts_with('<') {
        Ok(parse_transcript_xml(trimmed))
    } else {
        Ok(parse_vtt(trimmed))
    }
}

/// `{"events": [{"tStartMs": .., "dDurationMs": .., "segs": [{"utf8": ..}]}]}`
pub fn parse_json3(body: &str) -> Result<Vec<TranscriptSegment>> {
    let parsed: Json3Body = serde_json::from_str(body)
        .map_err(|e| Error::TranscriptUnavailable(format!("unreadable timed-text events: {}", e)))?;

    Ok(parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            segment(&text, event.t_start_ms / 1000.0, event.d_duration_ms / 1000.0)
        })
        .collect())
}

/// `<transcript><text start=".." dur="..">..</text></transcript>`
pub fn parse_transcript_xml(body: &str) -> Vec<TranscriptSegment> {
    let document = Html::parse_fragment(body);
    let mut segments = Vec::new();
    if let Ok(selector) = Selector::parse("text") {
        for element in document.select(&selector) {
            let attr = |name: &str| element.value().attr(name).and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0);
            let text = element.text().collect::<String>();
            if let Some(seg) = segment(&decode_html_entities(&text), attr("start"), attr("dur")) {
                segments.push(seg);
            }
        }
    }
    segments
}

/// WebVTT cues. Header, NOTE and STYLE blocks are skipped; inline tags are stripped.
pub fn parse_vtt(body: &str) -> Vec<TranscriptSegment> {
    let normalized = body.replace("\r\n", "\n");
    let mut segments = Vec::new();

    for block in normalized.split("\n\n") {
        let mut lines = block.lines().skip_while(|line| !line.contains("-->"));
        let timing = match lines.next() {
            Some(timing) => timing,
            None => continue,
        };
        let mut bounds = timing.split("-->").map(|part| {
            part.split_whitespace().next().and_then(parse_timestamp).unwrap_or(0.0)
        });
        let start = bounds.next().unwrap_or(0.0);
        let end = bounds.next().unwrap_or(start);

        let text = lines.map(cue_text).collect::<Vec<_>>().join(" ");
        if let Some(seg) = segment(&decode_html_entities(&text), start, (end - start).max(0.0)) {
            // rolling auto-captions repeat the previous cue
            if segments.last().map(|prev: &TranscriptSegment| prev.text == seg.text).unwrap_or(false) {
                continue;
            }
            segments.push(seg);
        }
    }
    segments
}

fn segment(text: &str, start: f64, duration: f64) -> Option<TranscriptSegment> {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(TranscriptSegment { text, start, duration })
    }
}

/// `hh:mm:ss.mmm` or `mm:ss.mmm`
fn parse_timestamp(raw: &str) -> Option<f64> {
    raw.split(':')
        .try_fold(0.0, |acc, part| part.replace(',', ".").parse::<f64>().ok().map(|v| acc * 60.0 + v))
}

/// Plain text of one cue line. Timestamp tags (`<00:00:01.000>`) are not HTML
/// tags, so they are cut before the line goes through the HTML parser.
fn cue_text(line: &str) -> String {
    let mut rest = line;
    let mut markup = String::with_capacity(line.len());
    while let Some(open) = rest.find('<') {
        markup.push_str(&rest[..open]);
        let tail = &rest[open..];
        let is_timestamp = tail[1..].starts_with(|c: char| c.is_ascii_digit());
        match tail.find('>') {
            Some(close) if is_timestamp => rest = &tail[close + 1..],
            _ => {
                markup.push('<');
                rest = &tail[1..];
            }
        }
    }
    markup.push_str(rest);

    Html::parse_fragment(&markup).root_element().text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json3_events() {
        let body = r#"{"events": [
            {"tStartMs": 0, "dDurationMs": 1500, "segs": [{"utf8": "Hello"}, {"utf8": " world"}]},
            {"tStartMs": 1500, "dDurationMs": 10},
            {"tStartMs": 2000, "dDurationMs": 1000, "segs": [{"utf8": "\n"}]},
            {"tStartMs": 3000, "dDurationMs": 2000, "segs": [{"utf8": "second line"}]}
        ]}"#;
        let segments = parse_json3(body).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello world");
        assert_eq!(segments[0].duration, 1.5);
        assert_eq!(segments[1].start, 3.0);
    }

    #[test]
    fn test_transcript_xml() {
        let body = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.1">it&amp;#39;s fine</text><text start="2.6" dur="1">Tom &amp;amp; Jerry</text><text start="4" dur="1"> </text></transcript>"#;
        let segments = parse_transcript_xml(body);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "it's fine");
        assert_eq!(segments[0].start, 0.5);
        assert_eq!(segments[1].text, "Tom & Jerry");
    }

    #[test]
    fn test_vtt_cues() {
        let body = "WEBVTT\nKind: captions\nLanguage: en\n\n\
                    NOTE generated\n\n\
                    1\n00:00:01.000 --> 00:00:03.500 align:start\n<c>first</c> cue\nsecond line\n\n\
                    00:00:03.500 --> 00:00:05.000\nfirst cue second line\n\n\
                    00:00:05.000 --> 00:00:06.000\nfirst cue second line\n\n\
                    00:07.250 --> 00:08.000\nshort stamp\n";
        let segments = parse_vtt(body);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["first cue second line", "short stamp"]);
        assert_eq!(segments[0].start, 1.0);
        assert_eq!(segments[0].duration, 2.5);
        assert_eq!(segments[1].start, 7.25);
    }

    #[test]
    fn test_transcript_xml_numeric_and_named_entities() {
        let body = r#"<transcript><text start="1" dur="2">it&amp;#8217;s &amp;#x27;ok&amp;#x27; caf&amp;eacute;</text></transcript>"#;
        let segments = parse_transcript_xml(body);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "it\u{2019}s 'ok' caf\u{e9}");
    }

    #[test]
    fn test_vtt_entities_and_inline_markup() {
        let body = "WEBVTT\n\n\
                    00:00:00.000 --> 00:00:02.000\nit&#8217;s caf&eacute; &nbsp;x\n\n\
                    00:00:02.000 --> 00:00:04.000\n<00:00:02.100><c> auto</c><00:00:02.600><c.colorE5E5E5> caption</c>\n\n\
                    00:00:04.000 --> 00:00:05.000\n<v Roger>a < b &amp;#39;quoted&amp;#39;</v>\n";
        let texts: Vec<String> = parse_vtt(body).into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["it\u{2019}s caf\u{e9} x", "auto caption", "a < b 'quoted'"]);
    }

    #[test]
    fn test_format_detection() {
        assert!(parse_timedtext("").unwrap().is_empty());
        assert_eq!(parse_timedtext(r#"{"events": [{"segs": [{"utf8": "json"}]}]}"#).unwrap()[0].text, "json");
        assert_eq!(parse_timedtext("WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nvtt").unwrap()[0].text, "vtt");
        assert!(parse_json3("{not json").is_err());
    }
}
