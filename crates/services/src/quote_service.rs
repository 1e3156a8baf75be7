use std::env;
use std::time::Duration;

use cbt_core::model::{FALLBACK_QUOTES, Quote, fallback_quote};
use rand::Rng;
use reqwest::Client;

use crate::error::QuoteError;

pub const DEFAULT_QUOTE_URL: &str =
    "https://api.quotable.io/random?tags=education|success|motivational";
pub const DEFAULT_QUOTE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone, Debug)]
pub struct QuoteConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_QUOTE_URL.into(),
            timeout: DEFAULT_QUOTE_TIMEOUT,
        }
    }
}

impl QuoteConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset or unparseable values keep defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let url = lookup("CBT_QUOTE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.url);
        let timeout = lookup("CBT_QUOTE_TIMEOUT_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(defaults.timeout, Duration::from_millis);
        Self { url, timeout }
    }
}

/// Best-effort motivational quote source.
#[derive(Clone)]
pub struct QuoteService {
    client: Client,
    config: QuoteConfig,
}

impl QuoteService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(QuoteConfig::from_env())
    }

    #[must_use]
    pub fn new(config: QuoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Fetch one quote from the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `QuoteError` on network failure, a non-success status, a
    /// timeout, or a body without quote text.
    pub async fn fetch(&self) -> Result<Quote, QuoteError> {
        let request = async {
            let response = self.client.get(&self.config.url).send().await?;
            if !response.status().is_success() {
                return Err(QuoteError::HttpStatus(response.status()));
            }
            let quote: Quote = response.json().await?;
            Ok(quote)
        };

        let quote = tokio::time::timeout(self.config.timeout, request)
            .await
            .map_err(|_| QuoteError::Timeout)??;

        if quote.content.trim().is_empty() {
            return Err(QuoteError::EmptyResponse);
        }
        Ok(quote)
    }

    /// A quote from the service, or a random local one if it fails. Never fails.
    pub async fn quote_or_fallback(&self) -> Quote {
        match self.fetch().await {
            Ok(quote) => quote,
            Err(err) => {
                tracing::warn!(error = %err, "quote service not available, using fallback");
                random_fallback()
            }
        }
    }
}

#[must_use]
pub fn random_fallback() -> Quote {
    let index = rand::rng().random_range(0..FALLBACK_QUOTES.len());
    fallback_quote(index)
}
