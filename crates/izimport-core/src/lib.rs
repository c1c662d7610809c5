pub mod calculator;
pub mod error;
pub mod types;

#[cfg(feature = "ad_gate")]
pub mod ad_gate;

#[cfg(feature = "exchange_rate")]
pub mod exchange_rate;

#[cfg(feature = "tracking")]
pub mod tracking;

#[cfg(all(test, any(feature = "exchange_rate", feature = "tracking")))]
mod test_server;

pub use error::ImportCostError;
pub use types::*;

/// Standard result type for all izimport operations
pub type ImportCostResult<T> = Result<T, ImportCostError>;
