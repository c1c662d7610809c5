use clap::Args;
use serde_json::{json, Value};

use izimport_core::tracking::TrackingClient;

use crate::config::Config;

/// Arguments for a shipment lookup
#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Carrier or forwarder tracking number
    #[arg(long)]
    pub tracking_number: String,
}

pub fn run_track(args: TrackArgs, config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let client = TrackingClient::with_base_url(&config.tracking_url)?;
    let shipment = super::block_on(client.track(&args.tracking_number))??;

    let events: Vec<Value> = shipment
        .events
        .iter()
        .map(|e| {
            json!({
                "timestamp": e.timestamp,
                "status_code": e.status_code,
                "description": e.description,
            })
        })
        .collect();

    Ok(json!({
        "result": {
            "id": shipment.id,
            "status": shipment.status.label(),
            "status_code": shipment.status.status_code,
            "estimated_time_of_delivery": shipment.estimated_time_of_delivery,
            "events": events,
        },
        "shipment": shipment,
    }))
}
