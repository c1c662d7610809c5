use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::{normalize, to_numeric, NormalizedValue};
use super::pipeline::{self, CalculationInput, CalculationOutput};
use super::Regime;

/// User-editable fields of a calculator screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    UnitPrice,
    Quantity,
    InternationalFreight,
    PlatformCommissionPercent,
    AdministrativeCost,
    ExchangeRate,
    SalePriceLocalCurrency,
    /// Simplified regime only
    InsurancePercent,
}

impl InputField {
    pub const COMMON: [InputField; 7] = [
        InputField::UnitPrice,
        InputField::Quantity,
        InputField::InternationalFreight,
        InputField::PlatformCommissionPercent,
        InputField::AdministrativeCost,
        InputField::ExchangeRate,
        InputField::SalePriceLocalCurrency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InputField::UnitPrice => "unit_price",
            InputField::Quantity => "quantity",
            InputField::InternationalFreight => "international_freight",
            InputField::PlatformCommissionPercent => "platform_commission_percent",
            InputField::AdministrativeCost => "administrative_cost",
            InputField::ExchangeRate => "exchange_rate",
            InputField::SalePriceLocalCurrency => "sale_price_local_currency",
            InputField::InsurancePercent => "insurance_percent",
        }
    }

    /// Fields shown on a screen of the given regime, in display order.
    pub fn for_regime(regime: Regime) -> Vec<InputField> {
        let mut fields = Self::COMMON.to_vec();
        if regime == Regime::Simplified {
            // Insurance sits between commission and the administrative fee
            fields.insert(4, InputField::InsurancePercent);
        }
        fields
    }
}

/// Live state of one calculator screen: the raw field texts and the
/// breakdown derived from them.
///
/// The output is a function of the fields alone. Each accepted edit rebuilds
/// the input and replaces the whole output in one assignment, so a reader
/// never sees a half-updated breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatorForm {
    regime: Regime,
    fields: BTreeMap<InputField, NormalizedValue>,
    output: CalculationOutput,
}

impl CalculatorForm {
    pub fn new(regime: Regime) -> Self {
        let fields = InputField::for_regime(regime)
            .into_iter()
            .map(|f| (f, NormalizedValue::Empty))
            .collect();
        CalculatorForm {
            regime,
            fields,
            output: CalculationOutput::zero(regime.tariff(Decimal::ZERO)),
        }
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Apply a keystroke-level edit to `field`.
    ///
    /// Returns `false` and leaves the form untouched when the text is not a
    /// valid non-negative decimal or the field does not exist on this screen.
    pub fn set_field(&mut self, field: InputField, raw: &str) -> bool {
        if !self.fields.contains_key(&field) {
            tracing::debug!(field = field.name(), regime = ?self.regime, "field not on this form");
            return false;
        }
        let value = match normalize(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(field = field.name(), error = %e, "keystroke rejected");
                return false;
            }
        };
        self.fields.insert(field, value);
        self.recompute();
        true
    }

    /// Current text of `field`, `None` if the field is not on this screen.
    pub fn field(&self, field: InputField) -> Option<&NormalizedValue> {
        self.fields.get(&field)
    }

    /// Numeric view of the current fields (empty fields are 0).
    pub fn input(&self) -> CalculationInput {
        CalculationInput {
            unit_price: self.numeric(InputField::UnitPrice),
            quantity: self.numeric(InputField::Quantity),
            international_freight: self.numeric(InputField::InternationalFreight),
            platform_commission_percent: self.numeric(InputField::PlatformCommissionPercent),
            administrative_cost: self.numeric(InputField::AdministrativeCost),
            exchange_rate: self.numeric(InputField::ExchangeRate),
            sale_price_local_currency: self.numeric(InputField::SalePriceLocalCurrency),
        }
    }

    pub fn output(&self) -> &CalculationOutput {
        &self.output
    }

    /// Clear every field and zero the breakdown.
    pub fn reset(&mut self) {
        *self = CalculatorForm::new(self.regime);
    }

    fn numeric(&self, field: InputField) -> Decimal {
        self.fields.get(&field).map(to_numeric).unwrap_or_default()
    }

    fn recompute(&mut self) {
        let tariff = self.regime.tariff(self.numeric(InputField::InsurancePercent));
        let output = pipeline::run(&self.input(), tariff);
        tracing::trace!(regime = ?self.regime, total_cost = %output.total_cost, "recomputed");
        self.output = output;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn fill(form: &mut CalculatorForm) {
        let entries = [
            (InputField::UnitPrice, "10"),
            (InputField::Quantity, "5"),
            (InputField::InternationalFreight, "20"),
            (InputField::PlatformCommissionPercent, "3"),
            (InputField::AdministrativeCost, "11.8"),
            (InputField::ExchangeRate, "3.75"),
            (InputField::SalePriceLocalCurrency, "300"),
        ];
        for (field, raw) in entries {
            assert!(form.set_field(field, raw), "{} rejected", field.name());
        }
    }

    #[test]
    fn test_new_form_is_empty_and_zero() {
        let form = CalculatorForm::new(Regime::Simplified);
        for field in InputField::for_regime(Regime::Simplified) {
            assert_eq!(form.field(field), Some(&NormalizedValue::Empty));
        }
        for (name, value) in form.output().monetary_fields() {
            assert!(value.is_zero(), "{name} should start at 0");
        }
    }

    #[test]
    fn test_every_edit_recomputes() {
        let mut form = CalculatorForm::new(Regime::Exempt);
        form.set_field(InputField::UnitPrice, "10");
        assert_eq!(form.output().fob_value, Decimal::ZERO);
        form.set_field(InputField::Quantity, "5");
        assert_eq!(form.output().fob_value, dec!(50));

        fill(&mut form);
        assert_eq!(form.output().total_cost, dec!(83.90));
        assert_eq!(form.output().profit_local_currency, dec!(1185.38));
    }

    #[test]
    fn test_rejected_keystroke_keeps_previous_value() {
        let mut form = CalculatorForm::new(Regime::Exempt);
        assert!(form.set_field(InputField::UnitPrice, "12.3"));
        let before = form.clone();

        assert!(!form.set_field(InputField::UnitPrice, "12.3.4"));
        assert_eq!(
            form.field(InputField::UnitPrice),
            Some(&NormalizedValue::Populated("12.3".into()))
        );
        assert_eq!(form, before);
    }

    #[test]
    fn test_partial_decimal_kept_verbatim() {
        let mut form = CalculatorForm::new(Regime::Exempt);
        assert!(form.set_field(InputField::Quantity, "2."));
        assert_eq!(form.field(InputField::Quantity).unwrap().as_str(), "2.");
        assert_eq!(form.input().quantity, dec!(2));
    }

    #[test]
    fn test_clearing_a_field_counts_as_zero() {
        let mut form = CalculatorForm::new(Regime::Exempt);
        fill(&mut form);
        assert!(form.set_field(InputField::Quantity, ""));
        assert_eq!(form.field(InputField::Quantity), Some(&NormalizedValue::Empty));
        assert_eq!(form.output().unit_cost_final, Decimal::ZERO);
    }

    #[test]
    fn test_insurance_only_on_simplified() {
        let mut exempt = CalculatorForm::new(Regime::Exempt);
        assert!(!exempt.set_field(InputField::InsurancePercent, "0.75"));
        assert!(exempt.field(InputField::InsurancePercent).is_none());

        let mut simplified = CalculatorForm::new(Regime::Simplified);
        fill(&mut simplified);
        assert!(simplified.set_field(InputField::InsurancePercent, "0.75"));
        assert_eq!(simplified.output().total_cost, dec!(99.89));
        assert_eq!(
            simplified.output().duties.as_ref().map(|d| d.total_duties),
            Some(dec!(15.99))
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = CalculatorForm::new(Regime::Simplified);
        fill(&mut form);
        form.set_field(InputField::InsurancePercent, "0.75");
        form.reset();

        assert_eq!(form, CalculatorForm::new(Regime::Simplified));
        for (name, value) in form.output().monetary_fields() {
            assert!(value.is_zero(), "{name} should be 0 after reset");
        }
        assert_eq!(form.input(), CalculationInput::default());
    }

    #[test]
    fn test_forms_are_independent() {
        let mut exempt = CalculatorForm::new(Regime::Exempt);
        let simplified = CalculatorForm::new(Regime::Simplified);
        fill(&mut exempt);
        assert!(simplified.output().total_cost.is_zero());
    }

    #[test]
    fn test_field_order_for_simplified() {
        let fields = InputField::for_regime(Regime::Simplified);
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[4], InputField::InsurancePercent);
        assert_eq!(fields[5], InputField::AdministrativeCost);
    }
}
