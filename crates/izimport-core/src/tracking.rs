//! Shipment tracking lookup (`GET /api/shipment?trackingNumber=...`).

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::ImportCostError;
use crate::ImportCostResult;

const DEFAULT_BASE_URL: &str = "https://izimport.com/";
const SHIPMENT_PATH: &str = "api/shipment";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const USER_AGENT: &str = concat!("izimport/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Response model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentStatus {
    pub timestamp: String,
    pub status_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ShipmentStatus {
    /// Short label: the explicit status if present, else the description.
    pub fn label(&self) -> &str {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub timestamp: String,
    pub status_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    #[serde(rename = "@type", default)]
    pub kind: String,
    pub organization_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub number: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    #[serde(rename = "dgf:locationName")]
    pub location_name: String,
}

/// Forwarding leg: acceptance -> loading port -> unloading port -> delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRoute {
    #[serde(rename = "dgf:placeOfAcceptance")]
    pub place_of_acceptance: RoutePoint,
    #[serde(rename = "dgf:portOfLoading")]
    pub port_of_loading: RoutePoint,
    #[serde(rename = "dgf:portOfUnloading")]
    pub port_of_unloading: RoutePoint,
    #[serde(rename = "dgf:placeOfDelivery")]
    pub place_of_delivery: RoutePoint,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<Carrier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_delivery_signed_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_number_of_pieces: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(rename = "dgf:routes", default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<ShipmentRoute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Measure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Location>,
    pub status: ShipmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ShipmentDetails>,
    #[serde(default)]
    pub events: Vec<TrackingEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time_of_delivery: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShipmentEnvelope {
    #[serde(default)]
    shipments: Vec<Shipment>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Map a non-2xx status to the error shown to the user.
fn status_error(status: StatusCode) -> ImportCostError {
    if status == StatusCode::NOT_FOUND {
        ImportCostError::TrackingNotFound
    } else if status.is_server_error() {
        ImportCostError::ServerUnavailable {
            status: status.as_u16(),
        }
    } else {
        ImportCostError::HttpStatus {
            status: status.as_u16(),
        }
    }
}

fn first_shipment(envelope: ShipmentEnvelope) -> ImportCostResult<Shipment> {
    envelope
        .shipments
        .into_iter()
        .next()
        .ok_or(ImportCostError::NoShipmentData)
}

#[derive(Clone)]
pub struct TrackingClient {
    http: Client,
    base_url: Url,
}

impl TrackingClient {
    pub fn new() -> ImportCostResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> ImportCostResult<Self> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// URL queried for `tracking_number` (trimmed, query-encoded).
    pub fn shipment_url(&self, tracking_number: &str) -> ImportCostResult<Url> {
        let trimmed = tracking_number.trim();
        if trimmed.is_empty() {
            return Err(ImportCostError::InvalidInput {
                field: "tracking_number".into(),
                reason: "Tracking number must not be blank".into(),
            });
        }
        let mut url = self.base_url.join(SHIPMENT_PATH)?;
        url.query_pairs_mut().append_pair("trackingNumber", trimmed);
        Ok(url)
    }

    /// First shipment reported for `tracking_number`.
    pub async fn track(&self, tracking_number: &str) -> ImportCostResult<Shipment> {
        let url = self.shipment_url(tracking_number)?;
        tracing::debug!(%url, "tracking shipment");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let error = status_error(status);
            tracing::warn!(status = status.as_u16(), %error, "tracking lookup failed");
            return Err(error);
        }

        let envelope: ShipmentEnvelope = response.json().await?;
        first_shipment(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{serve, REFUSED_URL};
    use pretty_assertions::assert_eq;

    const SAMPLE_BODY: &str = r#"{
        "url": "/shipments?trackingNumber=7777777770",
        "shipments": [
            {
                "id": "7777777770",
                "service": "freight",
                "origin": { "address": { "countryCode": "CN", "addressLocality": "SHENZHEN" } },
                "destination": { "address": { "countryCode": "PE", "addressLocality": "LIMA" } },
                "status": {
                    "timestamp": "2026-10-14T09:30:00",
                    "statusCode": "transit",
                    "status": "In transit",
                    "description": "Departed origin port",
                    "location": { "address": { "addressLocality": "SHENZHEN" } }
                },
                "details": {
                    "carrier": { "@type": "Organization", "organizationName": "DHL Global Forwarding" },
                    "totalNumberOfPieces": 3,
                    "references": [ { "number": "HBL123", "type": "housebill" } ],
                    "dgf:routes": [
                        {
                            "dgf:placeOfAcceptance": { "dgf:locationName": "SHENZHEN, CN" },
                            "dgf:portOfLoading": { "dgf:locationName": "YANTIAN, CN" },
                            "dgf:portOfUnloading": { "dgf:locationName": "CALLAO, PE" },
                            "dgf:placeOfDelivery": { "dgf:locationName": "LIMA, PE" }
                        }
                    ]
                },
                "events": [
                    {
                        "timestamp": "2026-10-14T09:30:00",
                        "statusCode": "transit",
                        "description": "Departed origin port"
                    },
                    {
                        "timestamp": "2026-10-12T16:00:00",
                        "statusCode": "pre-transit",
                        "description": "Booking confirmed"
                    }
                ]
            },
            {
                "id": "second",
                "status": { "timestamp": "", "statusCode": "unknown", "description": "" }
            }
        ]
    }"#;

    #[test]
    fn test_first_shipment_is_returned() {
        let envelope: ShipmentEnvelope = serde_json::from_str(SAMPLE_BODY).unwrap();
        let shipment = first_shipment(envelope).unwrap();

        assert_eq!(shipment.id, "7777777770");
        assert_eq!(shipment.status.label(), "In transit");
        assert_eq!(shipment.events.len(), 2);

        let details = shipment.details.unwrap();
        assert_eq!(details.total_number_of_pieces, Some(3));
        assert_eq!(details.routes[0].port_of_unloading.location_name, "CALLAO, PE");
        assert_eq!(
            details.carrier.map(|c| c.organization_name),
            Some("DHL Global Forwarding".to_string())
        );
    }

    #[test]
    fn test_empty_shipments_is_no_data() {
        let envelope: ShipmentEnvelope = serde_json::from_str(r#"{"shipments": []}"#).unwrap();
        assert!(matches!(
            first_shipment(envelope),
            Err(ImportCostError::NoShipmentData)
        ));
        let envelope: ShipmentEnvelope = serde_json::from_str("{}").unwrap();
        assert!(first_shipment(envelope).is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND),
            ImportCostError::TrackingNotFound
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY),
            ImportCostError::ServerUnavailable { status: 502 }
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR),
            ImportCostError::ServerUnavailable { status: 500 }
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS),
            ImportCostError::HttpStatus { status: 429 }
        ));
    }

    #[test]
    fn test_status_label_falls_back_to_description() {
        let status = ShipmentStatus {
            timestamp: String::new(),
            status_code: "delivered".into(),
            status: None,
            description: "Delivered to consignee".into(),
            location: None,
        };
        assert_eq!(status.label(), "Delivered to consignee");
    }

    #[test]
    fn test_shipment_url_trims_and_encodes() {
        let client = TrackingClient::new().unwrap();
        let url = client.shipment_url("  AB 12/34  ").unwrap();
        assert_eq!(
            url.as_str(),
            "https://izimport.com/api/shipment?trackingNumber=AB+12%2F34"
        );
    }

    #[tokio::test]
    async fn test_blank_tracking_number_is_rejected() {
        let client = TrackingClient::new().unwrap();
        match client.track("   ").await.unwrap_err() {
            ImportCostError::InvalidInput { field, .. } => assert_eq!(field, "tracking_number"),
            e => panic!("Expected InvalidInput, got {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_track_returns_first_shipment() {
        let client = TrackingClient::with_base_url(&serve("200 OK", SAMPLE_BODY, 1)).unwrap();
        let shipment = client.track("7777777770").await.unwrap();
        assert_eq!(shipment.id, "7777777770");
    }

    #[tokio::test]
    async fn test_track_not_found() {
        let client = TrackingClient::with_base_url(&serve("404 Not Found", "", 1)).unwrap();
        assert!(matches!(
            client.track("UNKNOWN").await,
            Err(ImportCostError::TrackingNotFound)
        ));
    }

    #[tokio::test]
    async fn test_track_server_unavailable() {
        let base = serve("503 Service Unavailable", "", 1);
        let client = TrackingClient::with_base_url(&base).unwrap();
        assert!(matches!(
            client.track("7777777770").await,
            Err(ImportCostError::ServerUnavailable { status: 503 })
        ));
    }

    #[tokio::test]
    async fn test_track_empty_shipments() {
        let base = serve("200 OK", r#"{"shipments": []}"#, 1);
        let client = TrackingClient::with_base_url(&base).unwrap();
        assert!(matches!(
            client.track("7777777770").await,
            Err(ImportCostError::NoShipmentData)
        ));
    }

    #[tokio::test]
    async fn test_track_refused_connection() {
        let client = TrackingClient::with_base_url(REFUSED_URL).unwrap();
        assert!(matches!(
            client.track("7777777770").await,
            Err(ImportCostError::Transport(_))
        ));
    }
}
