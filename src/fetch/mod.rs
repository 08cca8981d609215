use std::time::Duration;

use thiserror::Error;

/// Classified outcome of a single page fetch.
///
/// The original pipeline handled timeouts in one call site and ignored them
/// in the other two; here every call site goes through the same
/// classification so callers decide skip-vs-abort deliberately.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request returned HTTP {status}")]
    Status { status: u16 },
    #[error("request timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(reqwest::Error),
}

impl FetchError {
    fn classify(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Anything that can turn a URL plus query parameters into a page body.
///
/// Discovery and the dataset builders only ever see this trait, so tests
/// drive them with scripted stand-ins instead of a live site.
pub trait PageSource {
    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher with bounded connect/read timeouts and a fixed
/// client label sent as the User-Agent header.
pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new(
        client_label: &str,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(client_label)
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()
            .map_err(FetchError::classify)?;
        Ok(Self { client })
    }
}

impl PageSource for Fetcher {
    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        let mut req = self.client.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        let resp = req.send().map_err(FetchError::classify)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        resp.text().map_err(FetchError::classify)
    }
}
