use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportCostError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No {currency} rate in provider response")]
    MissingRate { currency: String },

    #[error("Tracking number not found")]
    TrackingNotFound,

    #[error("Server error ({status}), retry later")]
    ServerUnavailable { status: u16 },

    #[error("HTTP error: {status}")]
    HttpStatus { status: u16 },

    #[error("No shipment data returned for this tracking number")]
    NoShipmentData,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ImportCostError {
    fn from(e: serde_json::Error) -> Self {
        ImportCostError::SerializationError(e.to_string())
    }
}

#[cfg(any(feature = "exchange_rate", feature = "tracking"))]
impl From<reqwest::Error> for ImportCostError {
    fn from(e: reqwest::Error) -> Self {
        ImportCostError::Transport(e.to_string())
    }
}

#[cfg(any(feature = "exchange_rate", feature = "tracking"))]
impl From<url::ParseError> for ImportCostError {
    fn from(e: url::ParseError) -> Self {
        ImportCostError::Transport(format!("invalid URL: {e}"))
    }
}
