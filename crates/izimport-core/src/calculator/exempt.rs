use std::time::Instant;

use super::pipeline::{self, collect_warnings, input_fields, validate_non_negative, Tariff};
use super::{CalculationInput, CalculationOutput};
use crate::types::{with_metadata, ComputationOutput};
use crate::ImportCostResult;

/// The exempt (de-minimis) regime takes only the shared commercial inputs.
pub type ExemptInput = CalculationInput;

/// Cost and profitability of a de-minimis import: no customs duties.
///
/// total_cost = (FOB + freight) * (1 + commission%) + administrative cost
pub fn calculate_exempt(input: &ExemptInput) -> CalculationOutput {
    pipeline::run(input, Tariff::Exempt)
}

/// Validated, envelope-wrapped variant of [`calculate_exempt`] for callers
/// that hand over deserialized input instead of filtered keystrokes.
pub fn price_exempt_import(
    input: &ExemptInput,
) -> ImportCostResult<ComputationOutput<CalculationOutput>> {
    let start = Instant::now();

    validate_non_negative(&input_fields(input))?;

    let output = calculate_exempt(input);
    let warnings = collect_warnings(input, &output);
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Exempt regime import cost (no customs duties)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
