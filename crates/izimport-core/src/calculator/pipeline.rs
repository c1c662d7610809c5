use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::duties::{DutyBreakdown, HUNDRED};
use crate::error::ImportCostError;
use crate::types::{round_money, FxRate, Money, Percent};
use crate::ImportCostResult;

/// Commercial inputs shared by both regimes. Missing fields deserialize as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationInput {
    /// Price per unit in USD
    pub unit_price: Money,
    /// Units in the lot (fractional allowed)
    pub quantity: Decimal,
    /// International freight in USD
    pub international_freight: Money,
    /// Platform commission in percentage points (2.99 = 2.99%)
    pub platform_commission_percent: Percent,
    /// Flat administrative fee in USD
    pub administrative_cost: Money,
    /// Local-currency units per 1 USD
    pub exchange_rate: FxRate,
    /// Sale price per unit in local currency
    pub sale_price_local_currency: Money,
}

/// Regime-specific tax rule applied on top of the shared pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tariff {
    /// De-minimis tier, no customs duties.
    Exempt,
    /// Tariffed tier: insurance on FOB, then Ad Valorem, IPM and IGV.
    Simplified { insurance_percent: Percent },
}

/// Fully derived cost and profitability breakdown, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOutput {
    pub fob_value: Money,
    pub freight_plus_fob: Money,
    pub platform_commission_total: Money,
    pub total_to_transfer: Money,
    /// Present only under the simplified regime
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duties: Option<DutyBreakdown>,
    pub total_cost: Money,
    pub unit_cost_final: Money,
    pub total_cost_local_currency: Money,
    pub unit_cost_final_local_currency: Money,
    pub sale_price_usd: Money,
    pub income_local_currency: Money,
    pub income_usd: Money,
    pub profit_usd: Money,
    pub profit_local_currency: Money,
}

impl CalculationOutput {
    /// Output of an all-empty form.
    pub fn zero(tariff: Tariff) -> Self {
        run(&CalculationInput::default(), tariff)
    }

    /// Every monetary figure in the breakdown, duties included.
    pub fn monetary_fields(&self) -> Vec<(&'static str, Money)> {
        let mut fields = vec![
            ("fob_value", self.fob_value),
            ("freight_plus_fob", self.freight_plus_fob),
            ("platform_commission_total", self.platform_commission_total),
            ("total_to_transfer", self.total_to_transfer),
        ];
        if let Some(d) = &self.duties {
            fields.extend([
                ("insurance_total", d.insurance_total),
                ("customs_value_cif", d.customs_value_cif),
                ("ad_valorem", d.ad_valorem),
                ("ipm", d.ipm),
                ("igv", d.igv),
                ("total_duties", d.total_duties),
            ]);
        }
        fields.extend([
            ("total_cost", self.total_cost),
            ("unit_cost_final", self.unit_cost_final),
            ("total_cost_local_currency", self.total_cost_local_currency),
            ("unit_cost_final_local_currency", self.unit_cost_final_local_currency),
            ("sale_price_usd", self.sale_price_usd),
            ("income_local_currency", self.income_local_currency),
            ("income_usd", self.income_usd),
            ("profit_usd", self.profit_usd),
            ("profit_local_currency", self.profit_local_currency),
        ]);
        fields
    }

    fn rounded(self) -> Self {
        CalculationOutput {
            fob_value: round_money(self.fob_value),
            freight_plus_fob: round_money(self.freight_plus_fob),
            platform_commission_total: round_money(self.platform_commission_total),
            total_to_transfer: round_money(self.total_to_transfer),
            duties: self.duties.map(DutyBreakdown::rounded),
            total_cost: round_money(self.total_cost),
            unit_cost_final: round_money(self.unit_cost_final),
            total_cost_local_currency: round_money(self.total_cost_local_currency),
            unit_cost_final_local_currency: round_money(self.unit_cost_final_local_currency),
            sale_price_usd: round_money(self.sale_price_usd),
            income_local_currency: round_money(self.income_local_currency),
            income_usd: round_money(self.income_usd),
            profit_usd: round_money(self.profit_usd),
            profit_local_currency: round_money(self.profit_local_currency),
        }
    }
}

/// Run the full cost pipeline in one pass.
///
/// FOB -> freight -> platform commission -> [duties] -> total cost -> unit
/// cost -> income and profit in USD and local currency. Intermediates stay
/// unrounded; the finished breakdown is rounded to cents once at the end.
/// Division by a zero quantity or exchange rate yields 0.
pub fn run(input: &CalculationInput, tariff: Tariff) -> CalculationOutput {
    let fob_value = input.unit_price.saturating_mul(input.quantity);
    let freight_plus_fob = fob_value.saturating_add(input.international_freight);
    let platform_commission_total =
        freight_plus_fob.saturating_mul(input.platform_commission_percent) / HUNDRED;
    let total_to_transfer = freight_plus_fob.saturating_add(platform_commission_total);

    let duties = match tariff {
        Tariff::Exempt => None,
        Tariff::Simplified { insurance_percent } => Some(DutyBreakdown::assess(
            fob_value,
            freight_plus_fob,
            insurance_percent,
        )),
    };
    let total_duties = duties.as_ref().map_or(Decimal::ZERO, |d| d.total_duties);

    let total_cost = total_to_transfer
        .saturating_add(total_duties)
        .saturating_add(input.administrative_cost);

    // Profitability
    let fx = input.exchange_rate;
    let unit_cost_final = guarded_div(total_cost, input.quantity);
    let total_cost_local_currency = total_cost.saturating_mul(fx);
    let unit_cost_final_local_currency = unit_cost_final.saturating_mul(fx);
    let sale_price_usd = guarded_div(input.sale_price_local_currency, fx);
    let income_local_currency = input.quantity.saturating_mul(input.sale_price_local_currency);
    let income_usd = guarded_div(income_local_currency, fx);
    let profit_usd = income_usd.saturating_sub(total_cost);
    let profit_local_currency = profit_usd.saturating_mul(fx);

    CalculationOutput {
        fob_value,
        freight_plus_fob,
        platform_commission_total,
        total_to_transfer,
        duties,
        total_cost,
        unit_cost_final,
        total_cost_local_currency,
        unit_cost_final_local_currency,
        sale_price_usd,
        income_local_currency,
        income_usd,
        profit_usd,
        profit_local_currency,
    }
    .rounded()
}

/// `numerator / denominator` when the denominator is positive, else 0.
fn guarded_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator.checked_div(denominator).unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Validation & warnings for externally supplied inputs
// ---------------------------------------------------------------------------

pub(crate) fn validate_non_negative(fields: &[(&str, Decimal)]) -> ImportCostResult<()> {
    for (field, value) in fields {
        if *value < Decimal::ZERO {
            return Err(ImportCostError::InvalidInput {
                field: (*field).into(),
                reason: format!("Must be zero or positive, got {value}"),
            });
        }
    }
    Ok(())
}

pub(crate) fn input_fields(input: &CalculationInput) -> [(&'static str, Decimal); 7] {
    [
        ("unit_price", input.unit_price),
        ("quantity", input.quantity),
        ("international_freight", input.international_freight),
        ("platform_commission_percent", input.platform_commission_percent),
        ("administrative_cost", input.administrative_cost),
        ("exchange_rate", input.exchange_rate),
        ("sale_price_local_currency", input.sale_price_local_currency),
    ]
}

pub(crate) fn collect_warnings(input: &CalculationInput, output: &CalculationOutput) -> Vec<String> {
    let mut warnings = Vec::new();
    if input.quantity.is_zero() {
        warnings.push("Quantity is zero; unit cost reported as 0".to_string());
    }
    if input.exchange_rate.is_zero() {
        warnings.push(
            "Exchange rate is zero; local-currency conversions reported as 0".to_string(),
        );
    }
    if output.profit_usd < Decimal::ZERO {
        warnings.push(format!(
            "Sale price does not cover total cost: loss of {} USD",
            output.profit_usd.abs()
        ));
    }
    warnings
}
