use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use ts_core::Error;
use super::transport::{RawResponse, TransportError};

/// Outcome of a single attempt against the upstream endpoint.
#[derive(Debug)]
pub enum Attempt {
    Done(String),
    Retry(RetryReason),
    Fail(Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryReason {
    /// 503: the model is being loaded. The server may say how long that takes.
    ColdStart { estimated_time: Option<Duration> },
    /// Rate limit, gateway trouble or socket timeout. `status` is `None` for timeouts.
    Transient { status: Option<u16> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<SummaryItem>),
    Single(SummaryItem),
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: Option<String>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct LoadingBody {
    estimated_time: Option<Value>,
}

const TRANSIENT_STATUSES: [u16; 5] = [408, 429, 500, 502, 504];

pub fn classify(result: std::result::Result<RawResponse, TransportError>) -> Attempt {
    let response = match result {
        Ok(response) => response,
        Err(TransportError::Timeout) => return Attempt::Retry(RetryReason::Transient { status: None }),
        Err(TransportError::Network(msg)) => return Attempt::Fail(Error::NetworkError(msg)),
    };

    match response.status {
        200 => match parse_summary(&response.body) {
            Ok(summary) => Attempt::Done(summary),
            Err(e) => Attempt::Fail(e),
        },
        503 => Attempt::Retry(RetryReason::ColdStart {
            estimated_time: parse_estimated_time(&response.body),
        }),
        status if TRANSIENT_STATUSES.contains(&status) => {
            Attempt::Retry(RetryReason::Transient { status: Some(status) })
        }
        status => Attempt::Fail(Error::UpstreamError {
            status,
            message: error_message(&response.body),
        }),
    }
}

/// Extract `summary_text` from either `[{...}]` or `{...}`.
pub fn parse_summary(body: &str) -> ts_core::Result<String> {
    let parsed: InferenceResponse = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("unexpected body: {}", e)))?;

    let item = match parsed {
        InferenceResponse::Batch(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("empty result list".to_string()))?,
        InferenceResponse::Single(item) => item,
    };

    if let Some(summary) = item.summary_text {
        return Ok(summary.trim().to_string());
    }
    if let Some(error) = item.error {
        return Err(Error::UpstreamError { status: 200, message: value_to_message(&error) });
    }
    Err(Error::MalformedResponse("missing summary_text".to_string()))
}

fn parse_estimated_time(body: &str) -> Option<Duration> {
    let loading: LoadingBody = serde_json::from_str(body).ok()?;
    let seconds = match loading.estimated_time? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    // zero or negative estimates are treated like a missing one
    if seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}

fn error_message(body: &str) -> String {
    if let Ok(item) = serde_json::from_str::<SummaryItem>(body) {
        if let Some(error) = item.error {
            return value_to_message(&error);
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_to_message).collect::<Vec<_>>().join("; "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_body(status: u16, body: &str) -> Attempt {
        classify(Ok(RawResponse::new(status, body)))
    }

    #[test]
    fn test_both_success_shapes_are_accepted() {
        assert!(matches!(classify_body(200, r#"[{"summary_text": " A B "}]"#), Attempt::Done(s) if s == "A B"));
        assert!(matches!(classify_body(200, r#"{"summary_text": "A B"}"#), Attempt::Done(s) if s == "A B"));
    }

    #[test]
    fn test_missing_summary_is_malformed() {
        assert!(matches!(classify_body(200, r#"[{"generated_text": "x"}]"#), Attempt::Fail(Error::MalformedResponse(_))));
        assert!(matches!(classify_body(200, "[]"), Attempt::Fail(Error::MalformedResponse(_))));
        assert!(matches!(classify_body(200, "<html>oops</html>"), Attempt::Fail(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_error_field_in_success_body() {
        match classify_body(200, r#"{"error": "input too long"}"#) {
            Attempt::Fail(Error::UpstreamError { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "input too long");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cold_start_reads_estimate() {
        let attempt = classify_body(503, r#"{"error": "Model is currently loading", "estimated_time": 20.5}"#);
        match attempt {
            Attempt::Retry(RetryReason::ColdStart { estimated_time }) => {
                assert_eq!(estimated_time, Some(Duration::from_millis(20_500)));
            }
            other => panic!("unexpected {:?}", other),
        }

        for body in [
            "",
            "{}",
            r#"{"estimated_time": "soon"}"#,
            r#"{"estimated_time": -3}"#,
            r#"{"estimated_time": 0}"#,
            r#"{"estimated_time": 1e30}"#,
        ] {
            assert!(matches!(
                classify_body(503, body),
                Attempt::Retry(RetryReason::ColdStart { estimated_time: None })
            ));
        }
    }

    #[test]
    fn test_transient_and_permanent_statuses() {
        for status in [408, 429, 500, 502, 504] {
            assert!(matches!(
                classify_body(status, ""),
                Attempt::Retry(RetryReason::Transient { status: Some(s) }) if s == status
            ));
        }
        match classify_body(400, r#"{"error": ["bad parameters"]}"#) {
            Attempt::Fail(Error::UpstreamError { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad parameters");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(classify_body(401, "Unauthorized"), Attempt::Fail(Error::UpstreamError { status: 401, .. })));
    }

    #[test]
    fn test_transport_faults() {
        assert!(matches!(
            classify(Err(TransportError::Timeout)),
            Attempt::Retry(RetryReason::Transient { status: None })
        ));
        assert!(matches!(
            classify(Err(TransportError::Network("connection refused".into()))),
            Attempt::Fail(Error::NetworkError(_))
        ));
    }
}
