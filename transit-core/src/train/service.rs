//! Train resource service.
//!
//! Same pipeline as the bus side over the same shared store: routes and
//! stop lists are cached under the `train:` namespace, arrivals are
//! real-time and uncached, and directions are collapsed on every fetch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheStore, CachedValue};
use crate::domain::{self, Prediction, Route, StopSet};
use crate::error::TransitError;
use crate::keys;

use super::client::TrainApi;
use super::convert;

/// Resource service over the train upstream and the shared cache store.
pub struct TrainService<C> {
    client: C,
    store: CacheStore,
}

impl<C: TrainApi> TrainService<C> {
    /// Create a service over an upstream client and the shared store.
    pub fn new(client: C, store: CacheStore) -> Self {
        Self { client, store }
    }

    /// Full normalized route list, cached under the train namespace.
    pub async fn routes(&self) -> Result<Arc<Vec<Route>>, TransitError> {
        if let Some(CachedValue::Routes(routes)) = self.store.get(keys::TRAIN_ROUTES).await {
            return Ok(routes);
        }

        let raw = self.client.get_routes().await?;
        let routes = Arc::new(convert::normalize_routes(&raw.routes));

        self.store
            .set(keys::TRAIN_ROUTES, CachedValue::Routes(Arc::clone(&routes)))
            .await;

        Ok(routes)
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

    /// Predicted arrivals at one station, optionally filtered to a route.
    /// Uncached.
    pub async fn arrivals(
        &self,
        station_id: &str,
        route: Option<&str>,
    ) -> Result<Vec<Prediction>, TransitError> {
        let raw = self.client.get_arrivals(station_id, route).await?;
        convert::normalize_arrivals(&raw.ctatt.eta)
    }

    /// Stops of one route, cached per route.
    pub async fn stops(&self, route: &str) -> Result<Arc<StopSet>, TransitError> {
        let key = keys::train_stops(route);

        if let Some(CachedValue::Stops(stops)) = self.store.get(&key).await {
            return Ok(stops);
        }

        let raw = self.client.get_stops(route).await?;
        let stops = Arc::new(convert::normalize_stops(&raw.stops, route));

        self.store
            .set(key, CachedValue::Stops(Arc::clone(&stops)))
            .await;

        Ok(stops)
    }

    /// Directions served by one route, collapsed to deduplicated names.
    /// Fetched fresh on every call.
    pub async fn directions(&self, route: &str) -> Result<Vec<String>, TransitError> {
        let raw = self.client.get_directions(route).await?;
        Ok(convert::normalize_directions(&raw.directions))
    }
}
