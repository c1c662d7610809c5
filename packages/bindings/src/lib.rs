use napi::Result as NapiResult;
use napi_derive::napi;

use izimport_core::ad_gate::{GateDecision, InterstitialGate};
use izimport_core::calculator::{self, CalculatorForm, InputField, NormalizedValue, Regime};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_enum<T: serde::de::DeserializeOwned>(name: &str) -> NapiResult<T> {
    serde_json::from_value(serde_json::Value::String(name.to_string())).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// One-shot calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_exempt(input_json: String) -> NapiResult<String> {
    let input: calculator::exempt::ExemptInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = calculator::exempt::price_exempt_import(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_simplified(input_json: String) -> NapiResult<String> {
    let input: calculator::simplified::SimplifiedInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        calculator::simplified::price_simplified_import(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Keystroke filter: the cleaned text, or `null` when the edit must be
/// discarded.
#[napi]
pub fn normalize_input(raw: String) -> Option<String> {
    calculator::normalize(&raw)
        .ok()
        .map(|value| value.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Live calculator screen
// ---------------------------------------------------------------------------

#[napi]
pub struct CalculatorScreen {
    form: CalculatorForm,
}

#[napi]
impl CalculatorScreen {
    /// `regime` is `"exempt"` or `"simplified"`.
    #[napi(constructor)]
    pub fn new(regime: String) -> napi::Result<Self> {
        let regime: Regime = parse_enum(&regime)?;
        Ok(CalculatorScreen {
            form: CalculatorForm::new(regime),
        })
    }

    /// Apply an edit to a snake_case field; `false` means it was rejected.
    #[napi]
    pub fn set_field(&mut self, field: String, raw: String) -> NapiResult<bool> {
        let field: InputField = parse_enum(&field)?;
        Ok(self.form.set_field(field, &raw))
    }

    #[napi]
    pub fn field(&self, field: String) -> NapiResult<Option<String>> {
        let field: InputField = parse_enum(&field)?;
        Ok(self
            .form
            .field(field)
            .map(NormalizedValue::as_str)
            .map(str::to_string))
    }

    /// Current breakdown as JSON.
    #[napi]
    pub fn output(&self) -> NapiResult<String> {
        serde_json::to_string(self.form.output()).map_err(to_napi_error)
    }

    #[napi]
    pub fn reset(&mut self) {
        self.form.reset();
    }
}

// ---------------------------------------------------------------------------
// Interstitial ad gate
// ---------------------------------------------------------------------------

#[napi]
pub struct AdGate {
    gate: InterstitialGate,
}

#[napi]
impl AdGate {
    #[napi(constructor)]
    pub fn new(threshold: Option<u32>) -> Self {
        AdGate {
            gate: threshold.map(InterstitialGate::new).unwrap_or_default(),
        }
    }

    /// Returns `"wait"`, `"show"` or `"not_ready"`.
    #[napi]
    pub fn on_calculate(&mut self, ad_ready: bool) -> String {
        let decision = match self.gate.on_calculate(ad_ready) {
            GateDecision::Wait => "wait",
            GateDecision::Show => "show",
            GateDecision::NotReady => "not_ready",
        };
        decision.to_string()
    }

    #[napi]
    pub fn remaining(&self) -> u32 {
        self.gate.progress().remaining
    }

    #[napi]
    pub fn reset(&mut self) {
        self.gate.reset();
    }
}
