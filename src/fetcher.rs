// Holiday fetcher: retrieves one year of public holidays for a country from the upstream API

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::holiday::{decode_holidays, HolidayRecord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP error: status {status_code}")]
    Http { status_code: u16 },

    // Network failures, timeouts and malformed bodies
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Transport(format!("request timed out: {e}"))
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Source of raw holiday records. One call is one attempt: implementations
/// never retry.
#[async_trait]
pub trait HolidayFetcher: Send + Sync {
    async fn fetch(&self, year: i32, country_code: &str) -> Result<Vec<HolidayRecord>, FetchError>;
}

pub fn holidays_url(base_url: &str, year: i32, country_code: &str) -> String {
    format!(
        "{}/PublicHolidays/{}/{}",
        base_url.trim_end_matches('/'),
        year,
        country_code
    )
}

/// Year must have four digits and the country code must not be blank.
pub fn validate_request(year: i32, country_code: &str) -> Result<(), FetchError> {
    if !(1000..=9999).contains(&year) {
        return Err(FetchError::InvalidRequest(format!(
            "year must have four digits, got {year}"
        )));
    }
    if country_code.trim().is_empty() {
        return Err(FetchError::InvalidRequest(
            "country code must not be empty".to_string(),
        ));
    }
    Ok(())
}

// Status check and body decoding shared by every fetcher
pub fn interpret_response(
    year: i32,
    status: u16,
    body: &[u8],
) -> Result<Vec<HolidayRecord>, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Http {
            status_code: status,
        });
    }

    let decoded = decode_holidays(body)
        .map_err(|e| FetchError::Transport(format!("malformed response body: {e}")))?;

    if decoded.dropped > 0 {
        warn!(year, dropped = decoded.dropped, "dropped malformed holiday records");
    }

    Ok(decoded.records)
}

/// Fetches holidays over HTTP from a Nager.Date compatible API.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &TrackerConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self::with_client(client, config.base_url.clone()))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl HolidayFetcher for HttpFetcher {
    async fn fetch(&self, year: i32, country_code: &str) -> Result<Vec<HolidayRecord>, FetchError> {
        validate_request(year, country_code)?;

        let url = holidays_url(&self.base_url, year, country_code);
        debug!(%url, "fetching public holidays");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body: Bytes = response.bytes().await?;
        interpret_response(year, status.as_u16(), &body)
    }
}

// In-process fetcher with canned per-year responses, for tests and benchmarks
pub mod mock_fetcher {
    use super::*;
    use parking_lot::Mutex;
    use serde::Serialize;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone)]
    pub enum MockResponse {
        Body { status: u16, body: Bytes },
        TransportFailure(String),
    }

    // Upstream field names
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct WireHoliday<'a> {
        date: String,
        local_name: &'a str,
        name: &'a str,
        country_code: &'a str,
        fixed: bool,
        global: bool,
    }

    impl MockResponse {
        pub fn json(body: impl Into<Bytes>) -> Self {
            MockResponse::Body {
                status: 200,
                body: body.into(),
            }
        }

        pub fn status(status: u16) -> Self {
            MockResponse::Body {
                status,
                body: Bytes::new(),
            }
        }

        pub fn holidays(records: &[HolidayRecord]) -> Self {
            let wire: Vec<WireHoliday<'_>> = records
                .iter()
                .map(|r| WireHoliday {
                    date: r.date.format("%Y-%m-%d").to_string(),
                    local_name: &r.local_name,
                    name: &r.name,
                    country_code: &r.country_code,
                    fixed: r.is_fixed,
                    global: r.is_global,
                })
                .collect();

            // Serializing plain strings and bools cannot fail
            let body = serde_json::to_vec(&wire).unwrap_or_default();
            Self::json(body)
        }
    }

    /// Years without a configured response answer with HTTP 404.
    #[derive(Default)]
    pub struct MockFetcher {
        responses: Mutex<HashMap<i32, MockResponse>>,
        calls: Mutex<HashMap<i32, usize>>,
        total_calls: AtomicUsize,
    }

    impl MockFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond_with(&self, year: i32, response: MockResponse) {
            self.responses.lock().insert(year, response);
        }

        pub fn calls_for(&self, year: i32) -> usize {
            self.calls.lock().get(&year).copied().unwrap_or(0)
        }

        pub fn total_calls(&self) -> usize {
            self.total_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HolidayFetcher for MockFetcher {
        async fn fetch(
            &self,
            year: i32,
            country_code: &str,
        ) -> Result<Vec<HolidayRecord>, FetchError> {
            validate_request(year, country_code)?;

            self.total_calls.fetch_add(1, Ordering::SeqCst);
            *self.calls.lock().entry(year).or_insert(0) += 1;

            let response = self.responses.lock().get(&year).cloned();
            match response {
                Some(MockResponse::Body { status, body }) => {
                    interpret_response(year, status, &body)
                }
                Some(MockResponse::TransportFailure(message)) => {
                    Err(FetchError::Transport(message))
                }
                None => Err(FetchError::Http { status_code: 404 }),
            }
        }
    }
}
