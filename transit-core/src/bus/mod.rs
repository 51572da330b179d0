//! Bus agency API: client, raw DTOs, normalizers, and the resource service.
//!
//! The bus tracker speaks flat envelopes (`routes`, `vehicle`, `ptr`,
//! `prd`, `directions`, `stops`) with terse field names, and notably never
//! includes a route type; the normalizer stamps it.

mod client;
mod convert;
mod service;
mod types;

pub use client::{BusApi, BusClient, BusConfig};
pub use convert::{
    normalize_directions, normalize_patterns, normalize_predictions, normalize_routes,
    normalize_stops, normalize_vehicles,
};
pub use service::BusService;
pub use types::{
    BusDirectionDto, BusDirectionsResponse, BusPatternDto, BusPatternPointDto,
    BusPatternsResponse, BusPredictionDto, BusPredictionsResponse, BusRouteDto,
    BusRoutesResponse, BusStopDto, BusStopsResponse, BusVehicleDto, BusVehiclesResponse,
};
