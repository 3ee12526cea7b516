use std::{num::NonZeroU32, sync::Arc, time::Duration};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;

use crate::{error::LookupError, models::OmdbMovie};

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl OmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        timeout: Duration,
        rps: u32,
    ) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN));
        let limiter = Arc::new(RateLimiter::direct(quota));
        Self { client, api_key, base_url, timeout, limiter }
    }

    /// Looks a title up on OMDb. One request per call, never retried.
    ///
    /// `Ok(None)` means OMDb answered and had no match. The rate-limiter wait
    /// and the request share one deadline of `timeout`.
    pub async fn lookup(&self, title: &str) -> Result<Option<OmdbMovie>, LookupError> {
        tokio::time::timeout(self.timeout, self.fetch(title))
            .await
            .map_err(|_| LookupError::TimedOut(self.timeout))?
    }

    async fn fetch(&self, title: &str) -> Result<Option<OmdbMovie>, LookupError> {
        self.limiter.until_ready().await;

        let body = self
            .client
            .get(&self.base_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let resp: OmdbResponse = serde_json::from_str(&body)?;
        resp.into_outcome()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    response: String,
    title: Option<String>,
    director: Option<String>,
    year: Option<String>,
    poster: Option<String>,
    error: Option<String>,
}

impl OmdbResponse {
    fn into_outcome(self) -> Result<Option<OmdbMovie>, LookupError> {
        match self.response.as_str() {
            "True" => {
                let title = present(self.title)
                    .ok_or(LookupError::Malformed("match without a title"))?;
                Ok(Some(OmdbMovie {
                    title,
                    director: present(self.director),
                    year: present(self.year),
                    poster: present(self.poster),
                }))
            }
            "False" => {
                tracing::debug!(reason = self.error.as_deref().unwrap_or(""), "no OMDb match");
                Ok(None)
            }
            _ => Err(LookupError::Malformed("unexpected Response value")),
        }
    }
}

// OMDb fills unknown fields with "N/A".
fn present(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty() && s != "N/A")
}
