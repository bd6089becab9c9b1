//! Remote rule source access
//!
//! A cheap HEAD request doubles as the reachability probe; the full rule
//! array comes from a GET of the same URL. Both share one client with a
//! fixed timeout so a slow endpoint can only stall the operation in flight.

use std::time::Duration;

use reqwest::blocking::Client;

use super::model::{self, Rule};
use super::RulesError;

/// Network access to the remote rule list
pub trait RuleFetcher {
    /// Lightweight existence check against the rules URL.
    /// False on any network error or non-success status.
    fn probe(&self) -> bool;

    /// Full fetch and parse of the remote rule array
    fn fetch(&self) -> Result<Vec<Rule>, RulesError>;
}

/// Fetcher backed by a blocking HTTP client
pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RulesError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cursor-rules/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RulesError::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// The URL this fetcher talks to
    #[allow(dead_code)]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RuleFetcher for HttpFetcher {
    fn probe(&self) -> bool {
        match self.client.head(&self.url).send() {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn fetch(&self) -> Result<Vec<Rule>, RulesError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| RulesError::Fetch(format!("request to {} failed: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(RulesError::Fetch(format!(
                "{} returned status {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .map_err(|e| RulesError::Fetch(format!("failed to read response body: {e}")))?;

        model::parse_rules(&body)
    }
}
