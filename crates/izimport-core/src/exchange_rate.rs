//! USD exchange-rate lookup against Open Exchange Rates.
//!
//! [`ExchangeRateClient::latest`] never fails: any problem (no app id,
//! transport error, non-2xx status, bad body, missing currency) is logged and
//! answered with [`ExchangeRate::fallback`].

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ImportCostError;
use crate::types::{round_money, Currency, FxRate, MONEY_DECIMAL_PLACES};
use crate::ImportCostResult;

const DEFAULT_BASE_URL: &str = "https://openexchangerates.org/";
const LATEST_PATH: &str = "api/latest.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("izimport/", env!("CARGO_PKG_VERSION"));

/// Rate served whenever the provider cannot be used.
pub const FALLBACK_RATE: FxRate = dec!(3.68);

/// Local currency the calculator converts into.
pub const TARGET_CURRENCY: Currency = Currency::PEN;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Local-currency units per 1 unit of `base_currency`
    pub rate: FxRate,
    pub currency: String,
    pub base_currency: String,
    pub last_updated: DateTime<Utc>,
}

impl ExchangeRate {
    /// 3.68 PEN per USD, stamped now.
    pub fn fallback() -> Self {
        ExchangeRate {
            rate: FALLBACK_RATE,
            currency: TARGET_CURRENCY.code().to_string(),
            base_currency: Currency::USD.code().to_string(),
            last_updated: Utc::now(),
        }
    }
}

/// Two-decimal rendering used on screen (3.7 -> "3.70").
pub fn format_rate(rate: FxRate) -> String {
    let mut rounded = round_money(rate);
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded.to_string()
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    /// Unix seconds
    timestamp: i64,
    base: String,
    rates: HashMap<String, f64>,
}

impl LatestRatesResponse {
    fn into_rate(self, currency: &Currency) -> ImportCostResult<ExchangeRate> {
        let code = currency.code();
        let rate = self
            .rates
            .get(code)
            .copied()
            .and_then(Decimal::from_f64)
            .filter(|r| *r > Decimal::ZERO)
            .ok_or_else(|| ImportCostError::MissingRate {
                currency: code.to_string(),
            })?;

        let last_updated = DateTime::<Utc>::from_timestamp(self.timestamp, 0)
            .unwrap_or_else(Utc::now);

        Ok(ExchangeRate {
            rate,
            currency: code.to_string(),
            base_currency: Currency::from_code(&self.base).code().to_string(),
            last_updated,
        })
    }
}

#[derive(Clone)]
pub struct ExchangeRateClient {
    http: Client,
    base_url: Url,
    app_id: Option<String>,
}

impl ExchangeRateClient {
    pub fn new(app_id: Option<String>) -> ImportCostResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, app_id)
    }

    pub fn with_base_url(base: &str, app_id: Option<String>) -> ImportCostResult<Self> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            app_id: app_id.filter(|id| !id.trim().is_empty()),
        })
    }

    /// Latest PEN-per-USD rate, or the fallback.
    pub async fn latest(&self) -> ExchangeRate {
        match self.fetch_latest().await {
            Ok(rate) => rate,
            Err(error) => {
                tracing::warn!(%error, "exchange rate unavailable, using fallback {FALLBACK_RATE}");
                ExchangeRate::fallback()
            }
        }
    }

    /// Single provider round-trip without the fallback.
    pub async fn fetch_latest(&self) -> ImportCostResult<ExchangeRate> {
        let app_id = self.app_id.as_deref().ok_or_else(|| {
            ImportCostError::Configuration("OPENEXCHANGERATES_APP_ID is not set".into())
        })?;

        let mut url = self.base_url.join(LATEST_PATH)?;
        url.query_pairs_mut().append_pair("app_id", app_id);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImportCostError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body: LatestRatesResponse = response.json().await?;
        let rate = body.into_rate(&TARGET_CURRENCY)?;
        tracing::debug!(rate = %rate.rate, base = %rate.base_currency, "exchange rate fetched");
        Ok(rate)
    }
}
