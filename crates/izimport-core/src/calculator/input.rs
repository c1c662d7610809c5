use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ImportCostError;
use crate::ImportCostResult;

/// Raw state of a single numeric field as typed by the user.
///
/// `Populated` keeps the text verbatim so partially typed values such as
/// `"12."` survive until the next keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum NormalizedValue {
    #[default]
    Empty,
    Populated(String),
}

impl NormalizedValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, NormalizedValue::Empty)
    }

    /// Text as it should appear in the field (blank when empty).
    pub fn as_str(&self) -> &str {
        match self {
            NormalizedValue::Empty => "",
            NormalizedValue::Populated(text) => text,
        }
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accept `""` or text of the shape `digits [ "." digits ]`, where both digit
/// runs may be empty and at most one decimal point appears.
///
/// Anything else is an [`ImportCostError::InvalidInput`]; editors discard it
/// and keep the previous value.
pub fn normalize(raw: &str) -> ImportCostResult<NormalizedValue> {
    if raw.is_empty() {
        return Ok(NormalizedValue::Empty);
    }

    let mut seen_point = false;
    for c in raw.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_point => seen_point = true,
            _ => {
                return Err(ImportCostError::InvalidInput {
                    field: "numeric_field".into(),
                    reason: format!("'{raw}' is not a non-negative decimal number"),
                })
            }
        }
    }

    Ok(NormalizedValue::Populated(raw.to_string()))
}

/// Numeric value used by the calculator. Empty or unparseable text is 0.
pub fn to_numeric(value: &NormalizedValue) -> Decimal {
    match value {
        NormalizedValue::Empty => Decimal::ZERO,
        NormalizedValue::Populated(text) => parse_lenient(text),
    }
}

/// Parse `"5."`, `".5"` and `"007"` the way a float parser would; `"."` and
/// values too large for a Decimal become 0.
fn parse_lenient(text: &str) -> Decimal {
    let trimmed = text.strip_suffix('.').unwrap_or(text);
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    let candidate = if trimmed.starts_with('.') {
        format!("0{trimmed}")
    } else {
        trimmed.to_string()
    };
    match Decimal::from_str(&candidate) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(text, error = %e, "field value out of range, read as 0");
            Decimal::ZERO
        }
    }
}
