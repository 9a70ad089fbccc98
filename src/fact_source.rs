//! Where facts come from: the public cat-facts API, with a static fallback.

use crate::config::GameConfig;
use crate::games::cat_facts::{Fact, FactBatch};
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Facts served when the API is unreachable.
pub const FALLBACK_FACTS: [&str; 10] = [
    "Cats spend about 70% of their day sleeping",
    "A cat can make more than 100 different vocal sounds",
    "Cats see six times better at night than humans do",
    "A purring cat vibrates at a frequency that may help heal bones",
    "Cats can rotate their ears 180 degrees",
    "An adult cat has 30 teeth",
    "Cats cannot taste sweetness",
    "Cats can run at up to 48 km/h",
    "A cat's whiskers are about as wide as its body",
    "Cats spend more time grooming than hunting",
];

/// A synchronous view of an already fetched batch.
pub trait FactSource: Send + Sync {
    /// Returns the facts to draw from.
    fn batch(&self) -> FactBatch;
}

/// Fetches a fresh batch from somewhere remote.
#[async_trait]
pub trait FactProvider: Send + Sync {
    /// Fetches one batch.
    async fn fetch(&self) -> Result<FactBatch, FactSourceError>;
}

#[async_trait]
impl<P: FactProvider + ?Sized> FactProvider for Box<P> {
    async fn fetch(&self) -> Result<FactBatch, FactSourceError> {
        (**self).fetch().await
    }
}

/// The built-in fallback list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFacts;

impl FactSource for StaticFacts {
    #[instrument(skip(self))]
    fn batch(&self) -> FactBatch {
        FactBatch::new(FALLBACK_FACTS.iter().map(|text| Fact::from_text(*text)).collect())
    }
}

#[async_trait]
impl FactProvider for StaticFacts {
    async fn fetch(&self) -> Result<FactBatch, FactSourceError> {
        Ok(self.batch())
    }
}

/// Page returned by the facts endpoint.
#[derive(Debug, Deserialize)]
struct FactsPage {
    data: Option<Vec<Fact>>,
}

/// HTTP client for the cat-facts API.
#[derive(Debug, Clone)]
pub struct CatFactClient {
    client: reqwest::Client,
    url: String,
}

impl CatFactClient {
    /// Creates a client fetching `url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FactSourceError`] if the HTTP client cannot be built.
    #[instrument(skip(url), fields(url = %url.as_ref()))]
    pub fn new(url: impl AsRef<str>, timeout: Duration) -> Result<Self, FactSourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FactSourceError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.as_ref().to_string(),
        })
    }

    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FactSourceError`] if the HTTP client cannot be built.
    pub fn from_config(config: &GameConfig) -> Result<Self, FactSourceError> {
        Self::new(config.facts_request_url(), config.fetch_timeout())
    }

    /// Returns the request URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FactProvider for CatFactClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<FactBatch, FactSourceError> {
        debug!("Fetching facts");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FactSourceError::new(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FactSourceError::new(format!("HTTP error: {}", status)));
        }

        let page: FactsPage = response
            .json()
            .await
            .map_err(|e| FactSourceError::new(format!("Malformed response: {}", e)))?;

        let facts = page
            .data
            .ok_or_else(|| FactSourceError::new("Response has no data array"))?;
        info!(count = facts.len(), "Fetched facts");
        Ok(FactBatch::new(facts))
    }
}

/// Caches a provider's batch and falls back to [`StaticFacts`] on failure.
#[derive(Debug)]
pub struct FactFeed<P> {
    provider: P,
    revalidate_after: Duration,
    cached: Option<(Instant, FactBatch)>,
}

impl<P: FactProvider> FactFeed<P> {
    /// Creates a feed that refetches once a batch is older than `revalidate_after`.
    pub fn new(provider: P, revalidate_after: Duration) -> Self {
        Self {
            provider,
            revalidate_after,
            cached: None,
        }
    }

    /// Returns true if a fetched batch is cached and still fresh.
    pub fn is_fresh(&self) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|(fetched_at, _)| fetched_at.elapsed() < self.revalidate_after)
    }

    /// Returns a fresh batch, fetching if needed.
    ///
    /// Any fetch failure, or an empty result, yields the fallback list.
    /// Fallback batches are not cached so the next load retries.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> FactBatch {
        if self.is_fresh()
            && let Some((_, batch)) = &self.cached
        {
            debug!("Using cached facts");
            return batch.clone();
        }
        match self.provider.fetch().await {
            Ok(batch) if !batch.is_empty() => {
                self.cached = Some((Instant::now(), batch.clone()));
                batch
            }
            Ok(_) => {
                warn!("Provider returned no facts, using fallback");
                StaticFacts.batch()
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch facts, using fallback");
                StaticFacts.batch()
            }
        }
    }
}

impl<P: FactProvider> FactSource for FactFeed<P> {
    fn batch(&self) -> FactBatch {
        match &self.cached {
            Some((_, batch)) => batch.clone(),
            None => StaticFacts.batch(),
        }
    }
}

/// Fact source error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Fact source error: {} at {}:{}", message, file, line)]
pub struct FactSourceError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl FactSourceError {
    /// Creates a new fact source error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
