use serde::{Deserialize, Serialize};

/// A latitude/longitude pair as the guest trips API expects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Guest rider identity attached to a trip request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub first_name: String,
    pub last_name: String,
    /// Phone number with country code (e.g. +12125551234).
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Body for `POST /guests/trips/estimates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatesRequest {
    pub pickup: Coordinates,
    pub dropoff: Coordinates,
}

/// Body for `POST /guests/trips`.
///
/// Optional fields are omitted from the wire entirely rather than sent as
/// null, matching what the backend's validators accept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripRequest {
    pub guest: GuestInfo,
    pub pickup: Coordinates,
    pub dropoff: Coordinates,
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_for_driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_memo: Option<String>,
}
