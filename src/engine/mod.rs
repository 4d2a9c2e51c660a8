mod route_api;
mod transfer_api;
mod waypoint_api;

use crate::api::API;
use crate::store::{DynMembershipStore, DynRouteStore, DynWaypointStore};

/// The query/mutation engine behind the API traits. Stores are injected so
/// the same engine runs over Postgres in production and the in-memory store
/// in tests.
pub struct Engine {
    waypoints: DynWaypointStore,
    routes: DynRouteStore,
    memberships: DynMembershipStore,
}

impl Engine {
    pub fn new(
        waypoints: DynWaypointStore,
        routes: DynRouteStore,
        memberships: DynMembershipStore,
    ) -> Self {
        Self {
            waypoints,
            routes,
            memberships,
        }
    }
}

impl API for Engine {}
