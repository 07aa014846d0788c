use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::InsightSettings;

use super::model::Insight;

/// Maximum error body size kept in error messages.
const MAX_ERROR_BODY_SIZE: usize = 300;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("insight service unreachable at {0}")]
    ConnectionRefused(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("insight service error: {0}")]
    Api(String),
}

pub type InsightResult<T> = Result<T, InsightError>;

/// Source of AI insight for a track.
///
/// `Ok(None)` means the service has no data for this track; the pipeline
/// treats errors and `None` identically (no insight, no retry).
pub trait InsightSource: Send + Sync {
    fn fetch_insight(&self, title: &str, artist: Option<&str>) -> InsightResult<Option<Insight>>;
}

#[derive(Debug, Serialize)]
struct InsightRequest<'a> {
    title: &'a str,
    artist: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct InsightResponse {
    mood: String,
    fact: String,
    vibe: String,
}

/// Blocking HTTP client for the insight service.
///
/// One attempt per track with a bounded timeout; a timeout is reported as
/// "unavailable" rather than an error so the pipeline degrades silently.
pub struct HttpInsightClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpInsightClient {
    pub fn new(settings: &InsightSettings) -> InsightResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
        })
    }

    fn truncate_error_body(body: String) -> String {
        if body.len() <= MAX_ERROR_BODY_SIZE {
            return body;
        }
        let truncate_at = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
            .last()
            .unwrap_or(0);
        format!("{}... (truncated)", &body[..truncate_at])
    }
}

impl InsightSource for HttpInsightClient {
    fn fetch_insight(&self, title: &str, artist: Option<&str>) -> InsightResult<Option<Insight>> {
        let url = format!("{}/v1/insight", self.base_url);
        let request = InsightRequest { title, artist };

        let response = match self.http.post(&url).json(&request).send() {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                debug!(title, "insight request timed out; treating as unavailable");
                return Ok(None);
            }
            Err(e) if e.is_connect() => {
                return Err(InsightError::ConnectionRefused(self.base_url.clone()));
            }
            Err(e) => return Err(InsightError::Http(e)),
        };

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => {
                let body: InsightResponse = response.json()?;
                Ok(Some(Insight {
                    mood: body.mood,
                    fact: body.fact,
                    vibe: body.vibe,
                }))
            }
            status => {
                let body = Self::truncate_error_body(response.text().unwrap_or_default());
                Err(InsightError::Api(format!("status {}: {}", status, body)))
            }
        }
    }
}
