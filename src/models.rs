use serde::{Deserialize, Serialize};

// ============ Address Models ============

/// Candidate address as received, before validation.
///
/// Deserializes from the `/geocode` query string (`alamat`, `daerah`, `negeri`)
/// and from a batch CSV row (`Alamat`, `Daerah`, `Negeri`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddressInput {
    /// Street line.
    #[serde(rename = "alamat", alias = "Alamat", default)]
    pub street: Option<String>,
    /// District, optional.
    #[serde(rename = "daerah", alias = "Daerah", default)]
    pub district: Option<String>,
    /// State / region.
    #[serde(rename = "negeri", alias = "Negeri", default)]
    pub region: Option<String>,
}

/// An address that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub street: String,
    /// May be empty.
    pub district: String,
    pub region: String,
}

impl AddressRecord {
    /// Free-text address sent to the provider.
    ///
    /// The district is kept even when empty, e.g. `"Jalan Ampang, , Selangor"`.
    pub fn full_address(&self) -> String {
        format!("{}, {}, {}", self.street, self.district, self.region)
    }
}

// ============ Geocoding Models ============

/// Best-ranked match returned for an address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Google Maps search link for the coordinates.
    #[serde(rename = "url")]
    pub map_url: String,
}

/// Batch row after the lookup; geocode fields are absent when the lookup failed or found nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(rename = "Alamat")]
    pub street: String,
    #[serde(rename = "Daerah")]
    pub district: String,
    #[serde(rename = "Negeri")]
    pub region: String,
    #[serde(rename = "Latitud", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitud", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(rename = "Rujukan", skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
}

impl EnrichedRecord {
    pub fn new(record: AddressRecord, result: Option<GeocodeResult>) -> Self {
        let AddressRecord {
            street,
            district,
            region,
        } = record;

        match result {
            Some(result) => Self {
                street,
                district,
                region,
                latitude: Some(result.latitude),
                longitude: Some(result.longitude),
                map_url: Some(result.map_url),
                formatted_address: Some(result.formatted_address),
            },
            None => Self {
                street,
                district,
                region,
                latitude: None,
                longitude: None,
                map_url: None,
                formatted_address: None,
            },
        }
    }

    pub fn is_geocoded(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

// ============ Google Geocoding API Models ============

/// Body of `GET /maps/api/geocode/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleGeocodeResponse {
    /// `OK`, `ZERO_RESULTS`, `REQUEST_DENIED`, `OVER_QUERY_LIMIT`, `INVALID_REQUEST`, ...
    pub status: String,
    #[serde(default)]
    pub results: Vec<GoogleGeocodeCandidate>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleGeocodeCandidate {
    pub formatted_address: String,
    pub geometry: GoogleGeometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleGeometry {
    pub location: GoogleLatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GoogleLatLng {
    pub lat: f64,
    pub lng: f64,
}
