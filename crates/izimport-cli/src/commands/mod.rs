pub mod calculator;
pub mod exchange_rate;
pub mod tracking;

use std::future::Future;

/// Drive one async lookup to completion on a single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}
