//! Normalized domain model.
//!
//! Every upstream payload is converted into these types before it is cached
//! or returned, so callers work with one schema regardless of which agency
//! produced the data. All entities are transient: recomputed from upstream
//! truth or served from cache, never persisted.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Which agency a route (or pattern) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteKind {
    Bus,
    Train,
}

/// A transit route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub route: String,
    pub name: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: RouteKind,
}

/// Whether a pattern point is a plain shape vertex or a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointKind {
    Waypoint,
    Stop,
}

/// One point along a pattern, ordered by the upstream sequence number.
/// Only `Stop` points carry `stop_name`/`stop_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternPoint {
    pub kind: PointKind,
    pub lat: f64,
    pub lon: f64,
    pub stop_name: Option<String>,
    pub stop_id: Option<String>,
}

/// The shape a route traces in one direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub id: String,
    pub route: String,
    pub direction: String,
    #[serde(rename = "type")]
    pub kind: RouteKind,
    pub points: Vec<PatternPoint>,
}

/// An arrival/departure prediction for one vehicle at one stop.
///
/// References to routes and stops are carried by id only; upstreams may
/// return dangling ids and they pass through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    #[serde(rename = "type")]
    pub kind: String,
    pub stop_name: String,
    pub stop_id: String,
    pub vehicle_id: String,
    pub route: String,
    pub direction: String,
    pub destination: String,
    pub predicted_time: NaiveDateTime,
    pub observed_at: NaiveDateTime,
    pub delayed: bool,
}

/// A stop on a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: String,
    pub name: String,
}

/// The ordered stops of a route in one direction. Train stop lists are per
/// route, in which case `direction` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopSet {
    pub route: String,
    pub direction: String,
    pub stops: Vec<Stop>,
}

/// A vehicle currently in service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: String,
    pub route: String,
    pub destination: String,
    pub lat: f64,
    pub lon: f64,
    pub heading: u16,
    pub delayed: bool,
    pub observed_at: Option<NaiveDateTime>,
}

/// Case-insensitive substring search over route names, then offset/limit
/// paging. Applied after cache retrieval; each request re-filters the full
/// list, so filter results are never cached themselves.
pub fn search_routes(routes: &[Route], query: &str, offset: usize, limit: usize) -> Vec<Route> {
    let needle = query.to_lowercase();
    routes
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .skip(offset)
        .take(limit)
        .cloned()
        .collect()
}

/// Derived view: map each requested route id to its color, built by
/// filtering an already-fetched route list. Unknown ids are simply absent.
pub fn route_colors(routes: &[Route], ids: &[String]) -> HashMap<String, String> {
    routes
        .iter()
        .filter(|r| ids.contains(&r.route))
        .map(|r| (r.route.clone(), r.color.clone()))
        .collect()
}
