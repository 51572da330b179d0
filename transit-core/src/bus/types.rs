//! Bus tracker API response DTOs.
//!
//! These map directly to the bus tracker JSON envelopes. Descriptive fields
//! use `Option` because the upstream omits fields rather than sending null;
//! envelope arrays and record identifiers are required structure, so a
//! payload without them fails to decode and surfaces as malformed.

use serde::Deserialize;

/// Response from `GET /getroutes`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusRoutesResponse {
    pub routes: Vec<BusRouteDto>,
}

/// A bus route. There is no route type field in this payload.
#[derive(Debug, Clone, Deserialize)]
pub struct BusRouteDto {
    /// Route identifier (e.g. "22").
    pub rt: String,

    /// Human-readable route name.
    pub rtnm: Option<String>,

    /// Display color (e.g. "#336633").
    pub rtclr: Option<String>,
}

/// Response from `GET /getvehicles`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusVehiclesResponse {
    pub vehicle: Vec<BusVehicleDto>,
}

/// A vehicle currently in service. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct BusVehicleDto {
    /// Vehicle identifier.
    pub vid: Option<String>,

    /// Route the vehicle is serving.
    pub rt: Option<String>,

    /// Destination headsign.
    pub des: Option<String>,

    pub lat: Option<String>,
    pub lon: Option<String>,

    /// Heading in degrees, as a string.
    pub hdg: Option<String>,

    /// Whether the vehicle is running late.
    pub dly: Option<bool>,

    /// When the position was observed ("YYYYMMDD HH:MM").
    pub tmstmp: Option<String>,
}

/// Response from `GET /getpatterns`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusPatternsResponse {
    pub ptr: Vec<BusPatternDto>,
}

/// The shape a route traces in one direction.
#[derive(Debug, Clone, Deserialize)]
pub struct BusPatternDto {
    /// Pattern identifier.
    pub pid: i64,

    /// Direction this pattern serves.
    pub rtdir: Option<String>,

    /// Shape points; ordering is carried by `seq`, not array position.
    pub pt: Vec<BusPatternPointDto>,
}

/// One point along a pattern. `typ` is "S" for a stop, "W" for a waypoint;
/// only stops carry `stpid`/`stpnm`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusPatternPointDto {
    pub seq: i64,
    pub typ: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub stpid: Option<String>,
    pub stpnm: Option<String>,
}

/// Response from `GET /getpredictions`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusPredictionsResponse {
    pub prd: Vec<BusPredictionDto>,
}

/// An arrival/departure prediction. `typ` is "A" or "D".
#[derive(Debug, Clone, Deserialize)]
pub struct BusPredictionDto {
    pub typ: Option<String>,
    pub stpnm: Option<String>,
    pub stpid: Option<String>,
    pub vid: Option<String>,
    pub rt: Option<String>,
    pub rtdir: Option<String>,

    /// Destination headsign.
    pub des: Option<String>,

    /// Predicted time ("YYYYMMDD HH:MM").
    pub prdtm: Option<String>,

    /// When the prediction was generated ("YYYYMMDD HH:MM").
    pub tmstmp: Option<String>,

    /// Delay flag; omitted when the vehicle is on time.
    pub dly: Option<bool>,
}

/// Response from `GET /getdirections`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusDirectionsResponse {
    pub directions: Vec<BusDirectionDto>,
}

/// One direction served by a route.
#[derive(Debug, Clone, Deserialize)]
pub struct BusDirectionDto {
    pub dir: Option<String>,
}

/// Response from `GET /getstops`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusStopsResponse {
    pub stops: Vec<BusStopDto>,
}

/// A stop on a route.
#[derive(Debug, Clone, Deserialize)]
pub struct BusStopDto {
    pub stpid: String,
    pub stpnm: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}
