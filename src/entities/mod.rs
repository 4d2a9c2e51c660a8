mod membership;
mod route;
mod waypoint;

pub use membership::RouteMembership;
pub use route::{Route, RouteDetails, RoutePatch, RouteType, VehicleType};
pub use waypoint::{validate_coordinates, RouteConnection, Waypoint};
