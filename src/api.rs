use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{Route, RouteConnection, RouteDetails, RouteMembership, RoutePatch, Waypoint};
use crate::error::Error;

#[async_trait]
pub trait WaypointAPI {
    async fn list_waypoints(&self, limit: u64, offset: u64) -> Result<Vec<Waypoint>, Error>;
    async fn find_waypoint(&self, id: Uuid) -> Result<Waypoint, Error>;
    async fn nearest_waypoints(
        &self,
        amount: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Waypoint>, Error>;
    async fn create_waypoint(&self, waypoint: Waypoint) -> Result<Waypoint, Error>;
    async fn update_waypoint(&self, waypoint: Waypoint) -> Result<(), Error>;
    async fn delete_waypoint(&self, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn list_routes(&self, limit: u64, offset: u64) -> Result<Vec<Route>, Error>;
    async fn find_route(&self, id: Uuid) -> Result<RouteDetails, Error>;
    async fn create_route(&self, route: Route, waypoint_ids: Vec<Uuid>) -> Result<Route, Error>;
    async fn update_route(&self, id: Uuid, patch: RoutePatch) -> Result<(), Error>;
    async fn delete_route(&self, id: Uuid) -> Result<(), Error>;
}

/// The relational/spatial queries tying waypoints and routes together.
#[async_trait]
pub trait TransferAPI {
    async fn routes_through_waypoint(&self, id: Uuid) -> Result<Vec<RouteMembership>, Error>;

    /// Routes visiting both waypoints in the direction from `from` to `to`.
    async fn common_routes(&self, from: Uuid, to: Uuid) -> Result<Vec<Route>, Error>;

    /// First pair of nearest waypoints around the two areas that share a
    /// common route.
    async fn collect_routes(
        &self,
        amount: i64,
        from_latitude: f64,
        from_longitude: f64,
        to_latitude: f64,
        to_longitude: f64,
    ) -> Result<RouteConnection, Error>;
}

pub trait API: WaypointAPI + RouteAPI + TransferAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
