//! Conversion from train API DTOs to the normalized domain model.

use chrono::NaiveDateTime;

use crate::domain::{Prediction, Route, RouteKind, Stop, StopSet};
use crate::error::TransitError;

use super::types::{TrainArrivalDto, TrainDirectionDto, TrainRouteDto, TrainStopDto};

/// Time format used by the train API ("2023-12-25T14:30:00").
const TRAIN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Train predictions are arrivals.
const ARRIVAL_KIND: &str = "A";

/// Normalize the full route list. The feed usually omits the mode tag;
/// an absent or unrecognized tag means `Train`.
pub fn normalize_routes(raw: &[TrainRouteDto]) -> Vec<Route> {
    raw.iter()
        .map(|r| Route {
            route: r.route_id.clone(),
            name: r.route_name.clone().unwrap_or_default(),
            color: r.route_color.clone().unwrap_or_default(),
            kind: route_kind(r.route_type.as_deref()),
        })
        .collect()
}

fn route_kind(tag: Option<&str>) -> RouteKind {
    match tag {
        Some(t) if t.eq_ignore_ascii_case("bus") => RouteKind::Bus,
        _ => RouteKind::Train,
    }
}

/// Normalize an arrival list into predictions. Fails only when a record
/// lacks a parseable timestamp.
pub fn normalize_arrivals(raw: &[TrainArrivalDto]) -> Result<Vec<Prediction>, TransitError> {
    raw.iter().map(arrival_to_domain).collect()
}

fn arrival_to_domain(a: &TrainArrivalDto) -> Result<Prediction, TransitError> {
    Ok(Prediction {
        kind: ARRIVAL_KIND.to_string(),
        stop_name: a.sta_nm.clone().unwrap_or_default(),
        // Prefer the platform-level stop id, falling back to the station.
        stop_id: a
            .stp_id
            .clone()
            .or_else(|| a.sta_id.clone())
            .unwrap_or_default(),
        vehicle_id: a.rn.clone().unwrap_or_default(),
        route: a.rt.clone().unwrap_or_default(),
        direction: a.tr_dr.clone().unwrap_or_default(),
        destination: a.dest_nm.clone().unwrap_or_default(),
        predicted_time: parse_train_time(a.arr_t.as_deref(), "arrT")?,
        observed_at: parse_train_time(a.prdt.as_deref(), "prdt")?,
        delayed: a.is_dly.unwrap_or(false),
    })
}

fn parse_train_time(
    value: Option<&str>,
    field: &'static str,
) -> Result<NaiveDateTime, TransitError> {
    let value = value.ok_or_else(|| TransitError::Malformed {
        message: format!("arrival missing {field}"),
    })?;

    NaiveDateTime::parse_from_str(value, TRAIN_TIME_FORMAT).map_err(|_| TransitError::Malformed {
        message: format!("invalid {field}: {value}"),
    })
}

/// Collapse the direction list to plain names, deduplicated in first-seen
/// order. The feed repeats entries per branch.
pub fn normalize_directions(raw: &[TrainDirectionDto]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for entry in raw {
        if let Some(dir) = &entry.dir {
            if !names.contains(dir) {
                names.push(dir.clone());
            }
        }
    }
    names
}

/// Normalize the stops of one route. Train stop lists are per route, so the
/// set's direction is empty.
pub fn normalize_stops(raw: &[TrainStopDto], route: &str) -> StopSet {
    StopSet {
        route: route.to_string(),
        direction: String::new(),
        stops: raw
            .iter()
            .map(|s| Stop {
                id: s.stop_id.clone(),
                name: s.stop_name.clone().unwrap_or_default(),
            })
            .collect(),
    }
}
