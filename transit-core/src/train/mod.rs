//! Train agency API: client, raw DTOs, normalizers, and the resource
//! service.
//!
//! The train feed looks nothing like the bus one: arrivals nest under
//! `ctatt.eta`, routes use `route_id`-style names, and the route type tag
//! is usually absent (defaulting to `Train` on normalization).

mod client;
mod convert;
mod service;
mod types;

pub use client::{TrainApi, TrainClient, TrainConfig};
pub use convert::{normalize_arrivals, normalize_directions, normalize_routes, normalize_stops};
pub use service::TrainService;
pub use types::{
    TrainArrivalDto, TrainArrivalsBody, TrainArrivalsResponse, TrainDirectionDto,
    TrainDirectionsResponse, TrainRouteDto, TrainRoutesResponse, TrainStopDto,
    TrainStopsResponse,
};
