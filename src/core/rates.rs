//! Rate tables and the provider abstraction

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Failures while acquiring a live rate table.
#[derive(Debug, Error)]
pub enum RateError {
    /// No access credential was configured.
    #[error("missing credential: set API_KEY in the environment or a .env file")]
    Config,

    /// The request never produced a response (connection error, timeout).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("rate provider returned status {0}")]
    RemoteStatus(u16),

    /// The response body could not be turned into a usable table.
    #[error("failed to decode rates response: {0}")]
    Decode(String),
}

/// Currency code to rate, all relative to `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: BTreeMap<String, f64>,
    as_of: Option<DateTime<Utc>>,
}

impl RateTable {
    /// Builds a table, dropping entries that are not finite and positive.
    /// Returns `None` when nothing usable is left.
    pub fn new<I, S>(base: &str, rates: I, as_of: Option<DateTime<Utc>>) -> Option<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            let code = code.as_ref().trim().to_uppercase();
            if code.is_empty() || !rate.is_finite() || rate <= 0.0 {
                warn!(code = %code, rate, "Discarding unusable rate");
                continue;
            }
            table.insert(code, rate);
        }

        if table.is_empty() {
            return None;
        }

        Some(Self {
            base: base.trim().to_uppercase(),
            rates: table,
            as_of,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn as_of(&self) -> Option<DateTime<Utc>> {
        self.as_of
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Performs exactly one fetch of the latest rates. No retries.
    async fn fetch_latest(&self) -> Result<RateTable, RateError>;
}
