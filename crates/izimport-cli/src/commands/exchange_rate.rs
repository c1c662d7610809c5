use clap::Args;
use serde_json::{json, Value};

use izimport_core::exchange_rate::{format_rate, ExchangeRateClient};

use crate::config::Config;

/// Arguments for the exchange-rate lookup
#[derive(Args, Debug)]
pub struct ExchangeRateArgs {
    /// Fail instead of serving the fallback rate
    #[arg(long)]
    pub strict: bool,
}

pub fn run_exchange_rate(
    args: ExchangeRateArgs,
    config: &Config,
) -> Result<Value, Box<dyn std::error::Error>> {
    let client = ExchangeRateClient::with_base_url(
        &config.exchange_rate_url,
        config.exchange_rate_app_id.clone(),
    )?;

    let rate = if args.strict {
        super::block_on(client.fetch_latest())??
    } else {
        super::block_on(client.latest())?
    };

    Ok(json!({
        "result": {
            "rate": rate.rate,
            "formatted_rate": format_rate(rate.rate),
            "currency": rate.currency,
            "base_currency": rate.base_currency,
            "last_updated": rate.last_updated,
        }
    }))
}
