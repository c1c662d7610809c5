use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::pipeline::{self, collect_warnings, input_fields, validate_non_negative, Tariff};
use super::{CalculationInput, CalculationOutput};
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::ImportCostResult;

/// Inputs for the simplified (tariffed) regime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifiedInput {
    #[serde(flatten)]
    pub commercial: CalculationInput,
    /// Insurance as a percentage of FOB value
    pub insurance_percent: Percent,
}

impl SimplifiedInput {
    pub fn tariff(&self) -> Tariff {
        Tariff::Simplified {
            insurance_percent: self.insurance_percent,
        }
    }
}

/// Cost and profitability of an import under the simplified regime.
///
/// CIF = FOB + freight + FOB * insurance%
/// duties = CIF * 4% + (CIF + Ad Valorem) * (2% + 16%)
/// total_cost = transfer + duties + administrative cost
pub fn calculate_simplified(input: &SimplifiedInput) -> CalculationOutput {
    pipeline::run(&input.commercial, input.tariff())
}

/// Validated, envelope-wrapped variant of [`calculate_simplified`].
pub fn price_simplified_import(
    input: &SimplifiedInput,
) -> ImportCostResult<ComputationOutput<CalculationOutput>> {
    let start = Instant::now();

    validate_non_negative(&input_fields(&input.commercial))?;
    validate_non_negative(&[("insurance_percent", input.insurance_percent)])?;

    let output = calculate_simplified(input);
    let mut warnings = collect_warnings(&input.commercial, &output);
    if input.insurance_percent.is_zero() {
        warnings.push("No insurance declared; CIF equals FOB plus freight".to_string());
    }
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Simplified regime import cost (Ad Valorem 4%, IPM 2%, IGV 16%)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
