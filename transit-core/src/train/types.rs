//! Train API response DTOs.

use serde::Deserialize;

/// Response from `GET /routes`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainRoutesResponse {
    pub routes: Vec<TrainRouteDto>,
}

/// A train route. The mode tag is usually absent from this feed.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainRouteDto {
    pub route_id: String,
    pub route_name: Option<String>,
    pub route_color: Option<String>,
    pub route_type: Option<String>,
}

/// Response from `GET /arrivals`. Arrivals nest under `ctatt`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainArrivalsResponse {
    pub ctatt: TrainArrivalsBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainArrivalsBody {
    /// When the response was generated.
    pub tmst: Option<String>,

    pub eta: Vec<TrainArrivalDto>,
}

/// One predicted arrival.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainArrivalDto {
    /// Parent station identifier.
    pub sta_id: Option<String>,

    /// Platform-level stop identifier.
    pub stp_id: Option<String>,

    /// Station name.
    pub sta_nm: Option<String>,

    /// Platform description ("Service toward Loop").
    pub stp_de: Option<String>,

    /// Run number, the train's vehicle identifier.
    pub rn: Option<String>,

    pub rt: Option<String>,

    /// Destination name.
    pub dest_nm: Option<String>,

    /// Direction code.
    pub tr_dr: Option<String>,

    /// When the prediction was generated ("2023-12-25T14:22:00").
    pub prdt: Option<String>,

    /// Predicted arrival time ("2023-12-25T14:30:00").
    pub arr_t: Option<String>,

    /// Delay flag; omitted when the run is on time.
    pub is_dly: Option<bool>,
}

/// Response from `GET /stops`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainStopsResponse {
    pub stops: Vec<TrainStopDto>,
}

/// A stop on a train route. Train stop lists are per route.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainStopDto {
    pub stop_id: String,
    pub stop_name: Option<String>,
}

/// Response from `GET /directions`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainDirectionsResponse {
    pub directions: Vec<TrainDirectionDto>,
}

/// One direction entry. The feed repeats entries per branch, so the
/// normalizer deduplicates.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainDirectionDto {
    pub dir: Option<String>,
}
