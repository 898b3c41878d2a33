//! Finnhub REST client.
//!
//! Each symbol costs three calls, always issued one after the other:
//! 1. `/quote`: current price
//! 2. `/stock/metric?metric=all`: 52 week high & low
//! 3. `/stock/profile2`: market capitalisation & company name
//!
//! The free tier allows 60 calls per minute.
//!
//! API documentation: https://finnhub.io/docs/api
use crate::error::{Error, Result};
use crate::http::Fetch;
use serde_json::{Number, Value};
use std::time::Duration;
use tracing::{debug, error, trace, warn};

pub const BASE_URL: &str = "https://finnhub.io/api/v1";

/// API calls made per symbol.
pub const CALLS_PER_SYMBOL: u64 = 3;

/// Free tier quota.
pub const CALLS_PER_MINUTE: u64 = 60;

/// Shortest per-symbol delay that keeps a sequential run inside the quota.
pub fn min_delay() -> Duration {
    Duration::from_millis(CALLS_PER_SYMBOL * 60_000 / CALLS_PER_MINUTE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Quote,
    Metric,
    Profile,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Quote => "/quote",
            Endpoint::Metric => "/stock/metric",
            Endpoint::Profile => "/stock/profile2",
        }
    }
}

/// Market statistics for one symbol, numbers kept as Finnhub sent them.
///
/// `None` means Finnhub returned the field as `null`; a field that is absent
/// altogether never makes it this far.
#[derive(Clone, Debug, PartialEq)]
pub struct StatisticsRecord {
    pub price: Option<Number>,
    pub week_low_52: Option<Number>,
    pub week_high_52: Option<Number>,
    pub market_cap: Option<Number>,
    pub name: Option<String>,
}

pub struct FinnhubClient<H> {
    http: H,
    base_url: String,
    token: String,
}

impl<H: Fetch> FinnhubClient<H> {
    pub fn new(http: H, token: impl Into<String>) -> Self {
        Self::with_base_url(http, BASE_URL, token)
    }

    pub fn with_base_url(http: H, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    /// Collect price, 52 week range, market cap and name for `symbol`.
    ///
    /// The three requests run in a fixed order; the first failure is returned
    /// and the remaining requests are not sent.
    pub async fn statistics(&self, symbol: &str) -> Result<StatisticsRecord> {
        let quote = self.fetch(Endpoint::Quote, symbol).await?;
        let price = number(&quote, Endpoint::Quote, symbol, &["c"])?;

        let metric = self.fetch(Endpoint::Metric, symbol).await?;
        let week_high_52 = number(&metric, Endpoint::Metric, symbol, &["metric", "52WeekHigh"])?;
        let week_low_52 = number(&metric, Endpoint::Metric, symbol, &["metric", "52WeekLow"])?;

        let profile = self.fetch(Endpoint::Profile, symbol).await?;
        let market_cap = number(&profile, Endpoint::Profile, symbol, &["marketCapitalization"])?;
        let name = match lookup(&profile, &["name"]) {
            Some(Value::String(name)) => Some(name.clone()),
            Some(Value::Null) => None,
            _ => return Err(schema(Endpoint::Profile, symbol, &["name"])),
        };

        debug!("[{symbol}] price {price:?}, 52w {week_low_52:?}..{week_high_52:?}, cap {market_cap:?}");

        Ok(StatisticsRecord {
            price,
            week_low_52,
            week_high_52,
            market_cap,
            name,
        })
    }

    async fn fetch(&self, endpoint: Endpoint, symbol: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let mut query = vec![("symbol", symbol)];
        if endpoint == Endpoint::Metric {
            query.push(("metric", "all"));
        }
        query.push(("token", self.token.as_str()));

        trace!("fetching {} for [{symbol}]", endpoint.path());
        let body = self.http.get(&url, &query).await.map_err(|err| {
            error!("failed to fetch {} for [{symbol}], error({err})", endpoint.path());
            err
        })?;

        serde_json::from_str(&body).map_err(|err| {
            error!("failed to parse {} for [{symbol}], error({err})", endpoint.path());
            schema(endpoint, symbol, &[])
        })
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |value, key| value.get(key))
}

// a present `null` is kept as `None`; a missing key or a non-number is a schema error
fn number(
    value: &Value,
    endpoint: Endpoint,
    symbol: &str,
    path: &[&str],
) -> Result<Option<Number>> {
    match lookup(value, path) {
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(Value::Null) => {
            warn!("{} for [{symbol}] has null {}", endpoint.path(), path.join("."));
            Ok(None)
        }
        _ => {
            error!("{} for [{symbol}] has no number at {}", endpoint.path(), path.join("."));
            Err(schema(endpoint, symbol, path))
        }
    }
}

fn schema(endpoint: Endpoint, symbol: &str, path: &[&str]) -> Error {
    Error::Schema {
        endpoint: endpoint.path(),
        symbol: symbol.to_string(),
        field: if path.is_empty() {
            "<json body>".to_string()
        } else {
            path.join(".")
        },
    }
}
