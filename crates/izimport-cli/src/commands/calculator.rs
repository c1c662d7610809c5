use clap::Args;
use serde_json::Value;

use izimport_core::calculator::exempt::{self, ExemptInput};
use izimport_core::calculator::simplified::{self, SimplifiedInput};
use izimport_core::calculator::{to_numeric, CalculatorForm, InputField, NormalizedValue, Regime};
use izimport_core::exchange_rate::ExchangeRateClient;

use crate::config::Config;
use crate::input;

/// Commercial fields shared by both calculators, taken as typed text.
#[derive(Args, Debug, Default)]
pub struct CommercialArgs {
    /// Price per unit in USD
    #[arg(long)]
    pub unit_price: Option<String>,

    /// Number of units
    #[arg(long)]
    pub quantity: Option<String>,

    /// International freight in USD
    #[arg(long)]
    pub freight: Option<String>,

    /// Platform commission in percent (e.g. 2.99)
    #[arg(long)]
    pub commission: Option<String>,

    /// Administrative cost in USD
    #[arg(long)]
    pub admin_cost: Option<String>,

    /// Local-currency units per USD
    #[arg(long)]
    pub exchange_rate: Option<String>,

    /// Sale price per unit in local currency
    #[arg(long)]
    pub sale_price: Option<String>,

    /// Look up the exchange rate when --exchange-rate is not given
    #[arg(long)]
    pub fetch_rate: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the exempt (de-minimis) calculator
#[derive(Args, Debug)]
pub struct ExemptArgs {
    #[command(flatten)]
    pub commercial: CommercialArgs,
}

/// Arguments for the simplified (tariffed) calculator
#[derive(Args, Debug)]
pub struct SimplifiedArgs {
    #[command(flatten)]
    pub commercial: CommercialArgs,

    /// Insurance in percent of FOB value (e.g. 0.75)
    #[arg(long)]
    pub insurance: Option<String>,
}

pub fn run_exempt(args: ExemptArgs, config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input: ExemptInput = if let Some(ref path) = args.commercial.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let form = fill_form(Regime::Exempt, &args.commercial, None, config)?;
        form.input()
    };
    let result = exempt::price_exempt_import(&calc_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_simplified(
    args: SimplifiedArgs,
    config: &Config,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input: SimplifiedInput = if let Some(ref path) = args.commercial.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let form = fill_form(
            Regime::Simplified,
            &args.commercial,
            args.insurance.as_deref(),
            config,
        )?;
        SimplifiedInput {
            commercial: form.input(),
            insurance_percent: form
                .field(InputField::InsurancePercent)
                .map(to_numeric)
                .unwrap_or_default(),
        }
    };
    let result = simplified::price_simplified_import(&calc_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Type each flag into a fresh form, the way a user fills the screen.
fn fill_form(
    regime: Regime,
    args: &CommercialArgs,
    insurance: Option<&str>,
    config: &Config,
) -> Result<CalculatorForm, Box<dyn std::error::Error>> {
    let mut form = CalculatorForm::new(regime);

    let fetched_rate = match (&args.exchange_rate, args.fetch_rate) {
        (None, true) => Some(fetch_rate(config)?),
        _ => None,
    };

    let entries = [
        (InputField::UnitPrice, "--unit-price", args.unit_price.as_deref()),
        (InputField::Quantity, "--quantity", args.quantity.as_deref()),
        (InputField::InternationalFreight, "--freight", args.freight.as_deref()),
        (InputField::PlatformCommissionPercent, "--commission", args.commission.as_deref()),
        (InputField::InsurancePercent, "--insurance", insurance),
        (InputField::AdministrativeCost, "--admin-cost", args.admin_cost.as_deref()),
        (
            InputField::ExchangeRate,
            "--exchange-rate",
            args.exchange_rate.as_deref().or(fetched_rate.as_deref()),
        ),
        (InputField::SalePriceLocalCurrency, "--sale-price", args.sale_price.as_deref()),
    ];

    for (field, flag, raw) in entries {
        let Some(raw) = raw else { continue };
        if !form.set_field(field, raw.trim()) {
            return Err(format!("{flag}: '{raw}' is not a non-negative decimal number").into());
        }
    }

    if form.field(InputField::UnitPrice).map_or(true, NormalizedValue::is_empty)
        || form.field(InputField::Quantity).map_or(true, NormalizedValue::is_empty)
    {
        return Err("--unit-price and --quantity are required (or provide --input)".into());
    }

    Ok(form)
}

fn fetch_rate(config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let client = ExchangeRateClient::with_base_url(
        &config.exchange_rate_url,
        config.exchange_rate_app_id.clone(),
    )?;
    let rate = super::block_on(client.latest())?;
    tracing::info!(rate = %rate.rate, currency = %rate.currency, "using looked-up exchange rate");
    Ok(rate.rate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn test_config() -> Config {
        Config {
            exchange_rate_app_id: None,
            exchange_rate_url: "https://openexchangerates.org/".into(),
            tracking_url: "https://izimport.com/".into(),
        }
    }

    fn sample_args() -> CommercialArgs {
        CommercialArgs {
            unit_price: Some("10".into()),
            quantity: Some("5".into()),
            freight: Some("20".into()),
            commission: Some("3".into()),
            admin_cost: Some("11.8".into()),
            exchange_rate: Some("3.75".into()),
            sale_price: Some("300".into()),
            ..CommercialArgs::default()
        }
    }

    #[test]
    fn test_flags_fill_the_form() {
        let form = fill_form(Regime::Simplified, &sample_args(), Some("0.75"), &test_config())
            .unwrap();
        assert_eq!(form.output().total_cost, dec!(99.89));
    }

    #[test]
    fn test_malformed_flag_is_reported() {
        let args = CommercialArgs {
            freight: Some("12.3.4".into()),
            ..sample_args()
        };
        let err = fill_form(Regime::Exempt, &args, None, &test_config()).unwrap_err();
        assert!(err.to_string().contains("--freight"));
    }

    #[test]
    fn test_unit_price_and_quantity_required() {
        let args = CommercialArgs {
            quantity: None,
            ..sample_args()
        };
        assert!(fill_form(Regime::Exempt, &args, None, &test_config()).is_err());
    }

    #[test]
    fn test_fetch_rate_without_app_id_uses_fallback() {
        let args = CommercialArgs {
            exchange_rate: None,
            fetch_rate: true,
            ..sample_args()
        };
        let form = fill_form(Regime::Exempt, &args, None, &test_config()).unwrap();
        assert_eq!(form.input().exchange_rate, dec!(3.68));
    }
}
