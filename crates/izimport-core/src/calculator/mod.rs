//! Import cost & profitability calculator.
//!
//! One numeric pipeline ([`pipeline::run`]) shared by the exempt and
//! simplified regimes, the keystroke filter that feeds it, and the form
//! state that recomputes the breakdown on every edit.

pub mod duties;
pub mod form;
pub mod input;
pub mod pipeline;

#[cfg(feature = "exempt")]
pub mod exempt;

#[cfg(feature = "simplified")]
pub mod simplified;

use serde::{Deserialize, Serialize};

pub use duties::DutyBreakdown;
pub use form::{CalculatorForm, InputField};
pub use input::{normalize, to_numeric, NormalizedValue};
pub use pipeline::{CalculationInput, CalculationOutput, Tariff};

use crate::types::Percent;

/// Fiscal regime of a calculator screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// De-minimis imports, no customs duties.
    Exempt,
    /// Tariffed imports subject to Ad Valorem, IPM and IGV.
    Simplified,
}

impl Regime {
    /// Tax rule for this regime; the insurance rate is ignored when exempt.
    pub fn tariff(self, insurance_percent: Percent) -> Tariff {
        match self {
            Regime::Exempt => Tariff::Exempt,
            Regime::Simplified => Tariff::Simplified { insurance_percent },
        }
    }
}
