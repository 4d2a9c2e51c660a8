use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered association of a waypoint to a (route, route_kind) pair.
///
/// `route_number` is the 1-based position of the waypoint along that variant
/// of the route, assigned in the order waypoints were supplied at creation.
/// `route_name` is a denormalized copy kept in sync on route rename.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteMembership {
    pub route_id: Uuid,
    pub waypoint_id: Uuid,
    pub route_name: String,
    pub route_kind: i32,
    pub route_number: i32,
}
