//! Conversion from bus tracker DTOs to the normalized domain model.
//!
//! Every transform here is pure and total over documented payload shapes:
//! missing descriptive fields become empty strings, a missing delay flag
//! means not delayed, and the route type (which the bus upstream never
//! sends) is stamped here. Only a record missing a required prediction
//! timestamp aborts, as malformed.

use chrono::NaiveDateTime;

use crate::domain::{
    Pattern, PatternPoint, PointKind, Prediction, Route, RouteKind, Stop, StopSet, Vehicle,
};
use crate::error::TransitError;

use super::types::{
    BusDirectionDto, BusPatternDto, BusPatternPointDto, BusPredictionDto, BusRouteDto, BusStopDto,
    BusVehicleDto,
};

/// Cross-agency normalization rule: bus payloads carry no route type, so
/// every bus route is stamped with this constant.
const BUS_ROUTE_KIND: RouteKind = RouteKind::Bus;

/// Time format used by the bus tracker ("20231225 14:30").
const BUS_TIME_FORMAT: &str = "%Y%m%d %H:%M";

/// Normalize the full route list.
pub fn normalize_routes(raw: &[BusRouteDto]) -> Vec<Route> {
    raw.iter()
        .map(|r| Route {
            route: r.rt.clone(),
            name: r.rtnm.clone().unwrap_or_default(),
            color: r.rtclr.clone().unwrap_or_default(),
            kind: BUS_ROUTE_KIND,
        })
        .collect()
}

/// Normalize the patterns of one route. The pattern payload does not carry
/// the route id, so the caller supplies it.
pub fn normalize_patterns(raw: &[BusPatternDto], route: &str) -> Vec<Pattern> {
    raw.iter()
        .map(|p| {
            let mut points: Vec<&BusPatternPointDto> = p.pt.iter().collect();
            points.sort_by_key(|pt| pt.seq);

            Pattern {
                id: p.pid.to_string(),
                route: route.to_string(),
                direction: p.rtdir.clone().unwrap_or_default(),
                kind: BUS_ROUTE_KIND,
                points: points.into_iter().map(point_to_domain).collect(),
            }
        })
        .collect()
}

fn point_to_domain(pt: &BusPatternPointDto) -> PatternPoint {
    // "S" marks a stop; anything else (including a missing tag) is a plain
    // shape vertex and carries no stop fields.
    if pt.typ.as_deref() == Some("S") {
        PatternPoint {
            kind: PointKind::Stop,
            lat: pt.lat,
            lon: pt.lon,
            stop_name: pt.stpnm.clone(),
            stop_id: pt.stpid.clone(),
        }
    } else {
        PatternPoint {
            kind: PointKind::Waypoint,
            lat: pt.lat,
            lon: pt.lon,
            stop_name: None,
            stop_id: None,
        }
    }
}

/// Normalize a prediction list. Fails only when a record lacks a parseable
/// timestamp, which leaves the normalizer nothing to return.
pub fn normalize_predictions(raw: &[BusPredictionDto]) -> Result<Vec<Prediction>, TransitError> {
    raw.iter().map(prediction_to_domain).collect()
}

fn prediction_to_domain(p: &BusPredictionDto) -> Result<Prediction, TransitError> {
    Ok(Prediction {
        kind: p.typ.clone().unwrap_or_default(),
        stop_name: p.stpnm.clone().unwrap_or_default(),
        stop_id: p.stpid.clone().unwrap_or_default(),
        vehicle_id: p.vid.clone().unwrap_or_default(),
        route: p.rt.clone().unwrap_or_default(),
        direction: p.rtdir.clone().unwrap_or_default(),
        destination: p.des.clone().unwrap_or_default(),
        predicted_time: parse_bus_time(p.prdtm.as_deref(), "prdtm")?,
        observed_at: parse_bus_time(p.tmstmp.as_deref(), "tmstmp")?,
        delayed: p.dly.unwrap_or(false),
    })
}

fn parse_bus_time(value: Option<&str>, field: &'static str) -> Result<NaiveDateTime, TransitError> {
    let value = value.ok_or_else(|| TransitError::Malformed {
        message: format!("prediction missing {field}"),
    })?;

    NaiveDateTime::parse_from_str(value, BUS_TIME_FORMAT).map_err(|_| TransitError::Malformed {
        message: format!("invalid {field}: {value}"),
    })
}

/// Normalize a direction list to plain direction names, in upstream order.
pub fn normalize_directions(raw: &[BusDirectionDto]) -> Vec<String> {
    raw.iter().filter_map(|d| d.dir.clone()).collect()
}

/// Normalize the stops of one (route, direction) pair.
pub fn normalize_stops(raw: &[BusStopDto], route: &str, direction: &str) -> StopSet {
    StopSet {
        route: route.to_string(),
        direction: direction.to_string(),
        stops: raw
            .iter()
            .map(|s| Stop {
                id: s.stpid.clone(),
                name: s.stpnm.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

/// Normalize the vehicle list. A record without an id or a usable position
/// is unusable downstream; it is skipped with a warning rather than failing
/// the whole response.
pub fn normalize_vehicles(raw: &[BusVehicleDto]) -> Vec<Vehicle> {
    raw.iter().filter_map(vehicle_to_domain).collect()
}

fn vehicle_to_domain(v: &BusVehicleDto) -> Option<Vehicle> {
    let id = match v.vid.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            tracing::warn!("skipping vehicle record without id");
            return None;
        }
    };

    let (lat, lon) = match (parse_coord(v.lat.as_deref()), parse_coord(v.lon.as_deref())) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            tracing::warn!(vehicle = %id, "skipping vehicle record without usable position");
            return None;
        }
    };

    Some(Vehicle {
        id,
        route: v.rt.clone().unwrap_or_default(),
        destination: v.des.clone().unwrap_or_default(),
        lat,
        lon,
        heading: v.hdg.as_deref().and_then(|h| h.parse().ok()).unwrap_or(0),
        delayed: v.dly.unwrap_or(false),
        observed_at: v
            .tmstmp
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t, BUS_TIME_FORMAT).ok()),
    })
}

fn parse_coord(value: Option<&str>) -> Option<f64> {
    value?.parse().ok()
}
