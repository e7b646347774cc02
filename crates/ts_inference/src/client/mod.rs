//! Resilient client for the remote summarization endpoint.
//!
//! Every call is a loop of attempts bounded by a total wall-clock budget rather than
//! by an attempt counter. A 503 means the model is loading and carries a server
//! estimate of the wait; 408/429/5xx and socket timeouts back off exponentially;
//! anything else fails on the spot.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use ts_core::{DecodingParameters, Error, Result, SummarizationModel};
use crate::{InferenceConfig, RetryPolicy};

pub mod response;
pub mod transport;

pub use response::{classify, parse_summary, Attempt, RetryReason};
pub use transport::{HttpTransport, InferenceRequest, InferenceTransport, RawResponse, TransportError};

pub struct ResilientClient {
    transport: Arc<dyn InferenceTransport>,
    model_id: String,
    total_budget: Duration,
    policy: RetryPolicy,
}

impl fmt::Debug for ResilientClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientClient")
            .field("transport", &"<dyn InferenceTransport>")
            .field("model_id", &self.model_id)
            .field("total_budget", &self.total_budget)
            .field("policy", &self.policy)
            .finish()
    }
}

impl ResilientClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: &InferenceConfig, transport: Arc<dyn InferenceTransport>) -> Self {
        Self {
            transport,
            model_id: config.model_id.clone(),
            total_budget: config.total_budget,
            policy: config.retry.clone(),
        }
    }

    pub async fn summarize_text(&self, input: &str, parameters: &DecodingParameters) -> Result<String> {
        let started = Instant::now();
        let mut backoff = self.policy.initial_backoff;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let request = InferenceRequest { inputs: input, parameters };
            let outcome = classify(self.transport.send(&request).await);
            let elapsed = started.elapsed();

            let reason = match outcome {
                Attempt::Done(summary) => {
                    tracing::debug!(attempt, ?elapsed, "summary received");
                    return Ok(summary);
                }
                Attempt::Fail(e) => {
                    tracing::debug!(attempt, ?elapsed, "attempt failed: {}", e);
                    return Err(e);
                }
                Attempt::Retry(reason) => reason,
            };

            match reason {
                RetryReason::ColdStart { estimated_time } => {
                    let estimate = estimated_time
                        .unwrap_or(backoff)
                        .max(self.policy.min_cold_start_wait);
                    let exhausted = elapsed
                        .checked_add(estimate)
                        .map_or(true, |deadline| deadline > self.total_budget);
                    if exhausted {
                        tracing::warn!(attempt, ?elapsed, ?estimate, "model still loading, giving up");
                        return Err(Error::UpstreamTimeout { elapsed });
                    }
                    let wait = estimate.min(self.policy.max_cold_start_wait);
                    tracing::warn!(attempt, ?wait, "⏳ model {} is loading, waiting", self.model_id);
                    sleep(wait).await;
                }
                RetryReason::Transient { status } => {
                    if elapsed + backoff > self.total_budget {
                        tracing::warn!(attempt, ?elapsed, ?status, "retry budget exhausted");
                        return Err(match status {
                            Some(status) => Error::UpstreamError {
                                status,
                                message: format!("still failing after {} attempts", attempt),
                            },
                            None => Error::UpstreamUnavailable(format!(
                                "no response within {:?} after {} attempts",
                                elapsed, attempt
                            )),
                        });
                    }
                    tracing::warn!(attempt, ?status, ?backoff, "transient upstream failure, backing off");
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(self.policy.max_backoff);
                }
            }
        }
    }
}

#[async_trait]
impl SummarizationModel for ResilientClient {
    fn name(&self) -> &str {
        &self.model_id
    }

    async fn infer(&self, input: &str, parameters: &DecodingParameters) -> Result<String> {
        self.summarize_text(input, parameters).await
    }
}
