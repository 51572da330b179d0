//! Bus resource service: cache-check, fetch-on-miss, normalize, store.
//!
//! Each operation is a sequential pipeline over one cache key. A hit
//! returns the cached normalized value directly; a miss calls the upstream
//! once, normalizes, stores, and returns. Upstream failures propagate
//! unchanged and never touch the cache. Vehicles and predictions are
//! real-time data and bypass the cache entirely.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheStore, CachedValue};
use crate::domain::{self, Pattern, Prediction, Route, StopSet, Vehicle};
use crate::error::TransitError;
use crate::keys;

use super::client::BusApi;
use super::convert;

/// Resource service over the bus upstream and the shared cache store.
pub struct BusService<C> {
    client: C,
    store: CacheStore,
}

impl<C: BusApi> BusService<C> {
    /// Create a service over an upstream client and the shared store.
    pub fn new(client: C, store: CacheStore) -> Self {
        Self { client, store }
    }

    /// Full normalized route list, cached.
    pub async fn routes(&self) -> Result<Arc<Vec<Route>>, TransitError> {
        if let Some(CachedValue::Routes(routes)) = self.store.get(keys::BUS_ROUTES).await {
            return Ok(routes);
        }

        let raw = self.client.get_routes().await?;
        let routes = Arc::new(convert::normalize_routes(&raw.routes));

        self.store
            .set(keys::BUS_ROUTES, CachedValue::Routes(Arc::clone(&routes)))
            .await;

        Ok(routes)
    }

    /// Search the route list by name, then page. The filter step runs on
    /// every request over the full (cached or fresh) list; filter results
    /// are never cached themselves.
    pub async fn search_routes(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Route>, TransitError> {
        let routes = self.routes().await?;
        Ok(domain::search_routes(&routes, query, offset, limit))
    }

    /// Derived view: id → color for the requested routes, built from the
    /// route list without a second upstream call.
    pub async fn route_colors(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, String>, TransitError> {
        let routes = self.routes().await?;
        Ok(domain::route_colors(&routes, ids))
    }

    /// Live vehicle positions for a comma-separated route list. Uncached.
    pub async fn vehicles(&self, routes: &str) -> Result<Vec<Vehicle>, TransitError> {
        let raw = self.client.get_vehicles(routes).await?;
        Ok(convert::normalize_vehicles(&raw.vehicle))
    }

    /// Patterns of one route, cached per route.
    pub async fn patterns(&self, route: &str) -> Result<Arc<Vec<Pattern>>, TransitError> {
        let key = keys::pattern(route);

        if let Some(CachedValue::Patterns(patterns)) = self.store.get(&key).await {
            return Ok(patterns);
        }

        let raw = self.client.get_patterns(route).await?;
        let patterns = Arc::new(convert::normalize_patterns(&raw.ptr, route));

        self.store
            .set(key, CachedValue::Patterns(Arc::clone(&patterns)))
            .await;

        Ok(patterns)
    }

    /// Arrival/departure predictions for one stop. Uncached.
    pub async fn predictions(&self, stop_id: &str) -> Result<Vec<Prediction>, TransitError> {
        let raw = self.client.get_predictions(stop_id).await?;
        convert::normalize_predictions(&raw.prd)
    }

    /// Directions served by one route, cached per route.
    pub async fn directions(&self, route: &str) -> Result<Arc<Vec<String>>, TransitError> {
        let key = keys::direction(route);

        if let Some(CachedValue::Directions(directions)) = self.store.get(&key).await {
            return Ok(directions);
        }

        let raw = self.client.get_directions(route).await?;
        let directions = Arc::new(convert::normalize_directions(&raw.directions));

        self.store
            .set(key, CachedValue::Directions(Arc::clone(&directions)))
            .await;

        Ok(directions)
    }

    /// Stops of one (route, direction) pair, cached per pair.
    pub async fn stops(&self, route: &str, direction: &str) -> Result<Arc<StopSet>, TransitError> {
        let key = keys::stops(route, direction);

        if let Some(CachedValue::Stops(stops)) = self.store.get(&key).await {
            return Ok(stops);
        }

        let raw = self.client.get_stops(route, direction).await?;
        let stops = Arc::new(convert::normalize_stops(&raw.stops, route, direction));

        self.store
            .set(key, CachedValue::Stops(Arc::clone(&stops)))
            .await;

        Ok(stops)
    }

    /// Stops of one route across every direction it serves. A directions
    /// failure aborts the whole operation and surfaces that failure; no
    /// partial stop list is returned.
    pub async fn stops_all_directions(
        &self,
        route: &str,
    ) -> Result<Vec<Arc<StopSet>>, TransitError> {
        let directions = self.directions(route).await?;

        let mut sets = Vec::with_capacity(directions.len());
        for direction in directions.iter() {
            sets.push(self.stops(route, direction).await?);
        }

        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::bus::types::{
        BusDirectionDto, BusDirectionsResponse, BusPatternDto, BusPatternPointDto,
        BusPatternsResponse, BusPredictionDto, BusPredictionsResponse, BusRouteDto,
        BusRoutesResponse, BusStopDto, BusStopsResponse, BusVehiclesResponse,
    };

    fn unavailable() -> TransitError {
        TransitError::Api {
            status: 503,
            message: "Service Unavailable".to_string(),
        }
    }

    /// Counting in-memory upstream. Clones share counters so tests keep a
    /// handle after moving one into the service.
    #[derive(Clone, Default)]
    struct MockBusApi {
        routes_calls: Arc<AtomicUsize>,
        patterns_calls: Arc<AtomicUsize>,
        directions_calls: Arc<AtomicUsize>,
        stops_calls: Arc<AtomicUsize>,
        predictions_calls: Arc<AtomicUsize>,
        fail_routes: bool,
        fail_directions: bool,
        fail_predictions: bool,
    }

    #[async_trait]
    impl BusApi for MockBusApi {
        async fn get_routes(&self) -> Result<BusRoutesResponse, TransitError> {
            self.routes_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_routes {
                return Err(unavailable());
            }
            Ok(BusRoutesResponse {
                routes: vec![
                    BusRouteDto {
                        rt: "1".to_string(),
                        rtnm: Some("Bronzeville/Union Station".to_string()),
                        rtclr: Some("#FF0000".to_string()),
                    },
                    BusRouteDto {
                        rt: "2".to_string(),
                        rtnm: Some("Hyde Park Express".to_string()),
                        rtclr: Some("#00FF00".to_string()),
                    },
                ],
            })
        }

        async fn get_vehicles(&self, _routes: &str) -> Result<BusVehiclesResponse, TransitError> {
            Ok(BusVehiclesResponse { vehicle: vec![] })
        }

        async fn get_patterns(&self, _route: &str) -> Result<BusPatternsResponse, TransitError> {
            self.patterns_calls.fetch_add(1, Ordering::SeqCst);
            Ok(BusPatternsResponse {
                ptr: vec![BusPatternDto {
                    pid: 954,
                    rtdir: Some("Northbound".to_string()),
                    pt: vec![BusPatternPointDto {
                        seq: 1,
                        typ: Some("S".to_string()),
                        lat: 41.87,
                        lon: -87.62,
                        stpid: Some("456".to_string()),
                        stpnm: Some("Michigan & Balbo".to_string()),
                    }],
                }],
            })
        }

        async fn get_predictions(
            &self,
            _stop_id: &str,
        ) -> Result<BusPredictionsResponse, TransitError> {
            self.predictions_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_predictions {
                return Err(unavailable());
            }
            Ok(BusPredictionsResponse {
                prd: vec![BusPredictionDto {
                    typ: Some("A".to_string()),
                    stpnm: Some("Michigan & Balbo".to_string()),
                    stpid: Some("456".to_string()),
                    vid: Some("1234".to_string()),
                    rt: Some("3".to_string()),
                    rtdir: Some("Northbound".to_string()),
                    des: Some("Michigan/Chicago".to_string()),
                    prdtm: Some("20231225 14:30".to_string()),
                    tmstmp: Some("20231225 14:22".to_string()),
                    dly: None,
                }],
            })
        }

        async fn get_directions(&self, _route: &str) -> Result<BusDirectionsResponse, TransitError> {
            self.directions_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_directions {
                return Err(unavailable());
            }
            Ok(BusDirectionsResponse {
                directions: vec![
                    BusDirectionDto {
                        dir: Some("Northbound".to_string()),
                    },
                    BusDirectionDto {
                        dir: Some("Southbound".to_string()),
                    },
                ],
            })
        }

        async fn get_stops(
            &self,
            _route: &str,
            direction: &str,
        ) -> Result<BusStopsResponse, TransitError> {
            self.stops_calls.fetch_add(1, Ordering::SeqCst);
            Ok(BusStopsResponse {
                stops: vec![BusStopDto {
                    stpid: format!("456-{direction}"),
                    stpnm: Some("Michigan & Balbo".to_string()),
                    lat: Some(41.87),
                    lon: Some(-87.62),
                }],
            })
        }
    }

    fn service(mock: &MockBusApi) -> (BusService<MockBusApi>, CacheStore) {
        let store = CacheStore::default();
        (BusService::new(mock.clone(), store.clone()), store)
    }

    #[tokio::test]
    async fn routes_miss_then_hit() {
        let mock = MockBusApi::default();
        let (service, store) = service(&mock);

        let first = service.routes().await.unwrap();
        assert_eq!(mock.routes_calls.load(Ordering::SeqCst), 1);

        let second = service.routes().await.unwrap();
        assert_eq!(mock.routes_calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);

        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn route_colors_never_issues_a_second_call() {
        let mock = MockBusApi::default();
        let (service, _store) = service(&mock);

        service.routes().await.unwrap();
        let colors = service
            .route_colors(&["1".to_string(), "2".to_string()])
            .await
            .unwrap();

        assert_eq!(mock.routes_calls.load(Ordering::SeqCst), 1);
        assert_eq!(colors["1"], "#FF0000");
        assert_eq!(colors["2"], "#00FF00");
    }

    #[tokio::test]
    async fn search_reuses_the_cached_list() {
        let mock = MockBusApi::default();
        let (service, _store) = service(&mock);

        let hits = service.search_routes("hyde", 0, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].route, "2");

        // A different query re-filters the cached list, no new fetch.
        let hits = service.search_routes("BRONZEVILLE", 0, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(mock.routes_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn patterns_are_cached_per_route() {
        let mock = MockBusApi::default();
        let (service, _store) = service(&mock);

        service.patterns("3").await.unwrap();
        service.patterns("3").await.unwrap();
        assert_eq!(mock.patterns_calls.load(Ordering::SeqCst), 1);

        // A different route is a different key.
        let other = service.patterns("4").await.unwrap();
        assert_eq!(mock.patterns_calls.load(Ordering::SeqCst), 2);
        assert_eq!(other[0].route, "4");
    }

    #[tokio::test]
    async fn upstream_failure_propagates_and_leaves_cache_untouched() {
        let mock = MockBusApi {
            fail_routes: true,
            ..MockBusApi::default()
        };
        let (service, store) = service(&mock);

        let err = service.routes().await.unwrap_err();
        assert!(matches!(err, TransitError::Api { status: 503, .. }));
        assert!(store.get(keys::BUS_ROUTES).await.is_none());

        // Nothing was cached, so the next call goes upstream again.
        let _ = service.routes().await;
        assert_eq!(mock.routes_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn prediction_failure_keeps_its_kind() {
        let mock = MockBusApi {
            fail_predictions: true,
            ..MockBusApi::default()
        };
        let (service, store) = service(&mock);

        let err = service.predictions("456").await.unwrap_err();
        assert!(matches!(err, TransitError::Api { status: 503, .. }));

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn stops_all_directions_composes_both_resources() {
        let mock = MockBusApi::default();
        let (service, _store) = service(&mock);

        let sets = service.stops_all_directions("3").await.unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].direction, "Northbound");
        assert_eq!(sets[1].direction, "Southbound");
        assert_eq!(mock.directions_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mock.stops_calls.load(Ordering::SeqCst), 2);

        // Every piece was cached individually; a repeat stays local.
        service.stops_all_directions("3").await.unwrap();
        assert_eq!(mock.directions_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mock.stops_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stops_all_directions_aborts_on_directions_failure() {
        let mock = MockBusApi {
            fail_directions: true,
            ..MockBusApi::default()
        };
        let (service, _store) = service(&mock);

        let err = service.stops_all_directions("3").await.unwrap_err();
        assert!(matches!(err, TransitError::Api { status: 503, .. }));
        assert_eq!(mock.stops_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn predictions_normalize_without_caching() {
        let mock = MockBusApi::default();
        let (service, store) = service(&mock);

        service.predictions("456").await.unwrap();
        service.predictions("456").await.unwrap();

        assert_eq!(mock.predictions_calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.stats().hits, 0);
    }
}
