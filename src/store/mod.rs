mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{Route, RouteMembership, RoutePatch, Waypoint};
use crate::error::Error;

/// Spatial store: waypoints with coordinates and the k-nearest scan.
#[async_trait]
pub trait WaypointStore {
    async fn insert(&self, waypoint: &Waypoint) -> Result<(), Error>;
    async fn get_by_id(&self, id: Uuid) -> Result<Waypoint, Error>;
    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Waypoint>, Error>;

    /// Up to `amount` waypoints ordered by ascending great-circle distance
    /// from the given coordinate. The caller validates `amount > 0`.
    async fn nearest(&self, amount: i64, latitude: f64, longitude: f64)
        -> Result<Vec<Waypoint>, Error>;

    async fn update(&self, waypoint: &Waypoint) -> Result<(), Error>;
    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}

/// Route metadata plus the one multi-step mutation: `insert` writes the route
/// row and its membership rows as a single atomic unit.
#[async_trait]
pub trait RouteStore {
    async fn insert(&self, route: &Route, waypoint_ids: &[Uuid]) -> Result<(), Error>;
    async fn get_by_id(&self, id: Uuid) -> Result<Route, Error>;

    /// Missing ids are silently omitted; an empty id set yields an empty list.
    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Route>, Error>;

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Route>, Error>;
    async fn update(&self, id: Uuid, patch: &RoutePatch) -> Result<(), Error>;
    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}

/// Association reads over the route-waypoint membership rows.
#[async_trait]
pub trait MembershipStore {
    /// Every membership row the waypoint participates in. Empty for a known
    /// waypoint with no routes; existence checks are the caller's concern.
    async fn by_waypoint(&self, waypoint_id: Uuid) -> Result<Vec<RouteMembership>, Error>;

    /// The stop sequence of one route variant, ordered by route_number.
    async fn waypoints_in_order(
        &self,
        route_id: Uuid,
        route_kind: i32,
    ) -> Result<Vec<Waypoint>, Error>;
}

pub type DynWaypointStore = Arc<dyn WaypointStore + Send + Sync>;
pub type DynRouteStore = Arc<dyn RouteStore + Send + Sync>;
pub type DynMembershipStore = Arc<dyn MembershipStore + Send + Sync>;
