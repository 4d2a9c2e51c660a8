use async_trait::async_trait;
use geo::HaversineDistance;
use geo_types::Point;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::{Route, RouteMembership, RoutePatch, Waypoint};
use crate::error::Error;
use crate::store::{MembershipStore, RouteStore, WaypointStore};

#[derive(Default)]
struct State {
    // BTreeMaps keep listing and distance tie-breaks in stable id order
    waypoints: BTreeMap<Uuid, Waypoint>,
    routes: BTreeMap<Uuid, Route>,
    memberships: Vec<RouteMembership>,
}

/// In-memory store with the same observable contract as [`super::PgStore`].
/// Backs the test suite and database-free local runs.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn position(waypoint: &Waypoint) -> Point {
    Point::new(waypoint.longitude, waypoint.latitude)
}

#[async_trait]
impl WaypointStore for MemoryStore {
    async fn insert(&self, waypoint: &Waypoint) -> Result<(), Error> {
        let mut state = self.state.write().await;

        if state.waypoints.contains_key(&waypoint.id) {
            return Err(Error::conflict("waypoint already exists"));
        }

        state.waypoints.insert(waypoint.id, waypoint.clone());

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Waypoint, Error> {
        let state = self.state.read().await;

        state
            .waypoints
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("waypoint not found"))
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Waypoint>, Error> {
        let state = self.state.read().await;

        Ok(state
            .waypoints
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn nearest(
        &self,
        amount: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Waypoint>, Error> {
        let state = self.state.read().await;

        let origin = Point::new(longitude, latitude);

        let mut waypoints: Vec<Waypoint> = state.waypoints.values().cloned().collect();

        // haversine, not flat degrees: a degree of longitude shrinks with
        // latitude, so Euclidean ordering would be wrong off the equator
        waypoints.sort_by(|a, b| {
            let da = origin.haversine_distance(&position(a));
            let db = origin.haversine_distance(&position(b));
            da.total_cmp(&db)
        });

        waypoints.truncate(amount as usize);

        Ok(waypoints)
    }

    async fn update(&self, waypoint: &Waypoint) -> Result<(), Error> {
        let mut state = self.state.write().await;

        match state.waypoints.get_mut(&waypoint.id) {
            Some(existing) => {
                *existing = waypoint.clone();
                Ok(())
            }
            None => Err(Error::not_found("waypoint not found")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let mut state = self.state.write().await;

        if !state.waypoints.contains_key(&id) {
            return Err(Error::not_found("waypoint not found"));
        }

        if state.memberships.iter().any(|m| m.waypoint_id == id) {
            return Err(Error::bad_request("waypoint is still part of a route"));
        }

        state.waypoints.remove(&id);

        Ok(())
    }
}

#[async_trait]
impl RouteStore for MemoryStore {
    async fn insert(&self, route: &Route, waypoint_ids: &[Uuid]) -> Result<(), Error> {
        // validate everything before touching state so a failure leaves no
        // partial rows; the write lock keeps the whole insert atomic for
        // concurrent readers
        let mut state = self.state.write().await;

        if state.routes.contains_key(&route.id) {
            return Err(Error::conflict("route already exists"));
        }

        for waypoint_id in waypoint_ids {
            if !state.waypoints.contains_key(waypoint_id) {
                return Err(Error::bad_request(format!("unknown waypoint {}", waypoint_id)));
            }
        }

        state.routes.insert(route.id, route.clone());

        for (i, waypoint_id) in waypoint_ids.iter().enumerate() {
            state.memberships.push(RouteMembership {
                route_id: route.id,
                waypoint_id: *waypoint_id,
                route_name: route.name.clone(),
                route_kind: route.route_kind,
                route_number: i as i32 + 1,
            });
        }

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Route, Error> {
        let state = self.state.read().await;

        state
            .routes
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("route not found"))
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Route>, Error> {
        let state = self.state.read().await;

        Ok(ids
            .iter()
            .filter_map(|id| state.routes.get(id).cloned())
            .collect())
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Route>, Error> {
        let state = self.state.read().await;

        Ok(state
            .routes
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, patch: &RoutePatch) -> Result<(), Error> {
        let mut state = self.state.write().await;

        let route = state
            .routes
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("route not found"))?;

        if let Some(name) = &patch.name {
            route.name = name.clone();
        }
        if let Some(price) = patch.price {
            route.price = price;
        }
        if let Some(vehicle_type) = patch.vehicle_type {
            route.vehicle_type = vehicle_type;
        }
        if let Some(route_type) = patch.route_type {
            route.route_type = route_type;
        }

        if let Some(name) = &patch.name {
            for membership in state.memberships.iter_mut() {
                if membership.route_id == id {
                    membership.route_name = name.clone();
                }
            }
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let mut state = self.state.write().await;

        if state.routes.remove(&id).is_none() {
            return Err(Error::not_found("route not found"));
        }

        // cascade, same as the foreign key policy on the Postgres side
        state.memberships.retain(|m| m.route_id != id);

        Ok(())
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn by_waypoint(&self, waypoint_id: Uuid) -> Result<Vec<RouteMembership>, Error> {
        let state = self.state.read().await;

        Ok(state
            .memberships
            .iter()
            .filter(|m| m.waypoint_id == waypoint_id)
            .cloned()
            .collect())
    }

    async fn waypoints_in_order(
        &self,
        route_id: Uuid,
        route_kind: i32,
    ) -> Result<Vec<Waypoint>, Error> {
        let state = self.state.read().await;

        let mut memberships: Vec<&RouteMembership> = state
            .memberships
            .iter()
            .filter(|m| m.route_id == route_id && m.route_kind == route_kind)
            .collect();

        memberships.sort_by_key(|m| m.route_number);

        memberships
            .into_iter()
            .map(|m| {
                state
                    .waypoints
                    .get(&m.waypoint_id)
                    .cloned()
                    .ok_or_else(|| Error::internal("membership references a missing waypoint"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::entities::Waypoint;
    use crate::store::WaypointStore;

    #[test]
    fn nearest_orders_by_spherical_distance() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();

            // at 60°N a degree of longitude spans ~55.7 km while 0.6° of
            // latitude spans ~66.7 km; flat-degree ordering would flip these
            let east = Waypoint::new("east", 60.0, 11.0);
            let north = Waypoint::new("north", 60.6, 10.0);

            store.insert(&north).await.unwrap();
            store.insert(&east).await.unwrap();

            let found = store.nearest(2, 60.0, 10.0).await.unwrap();

            assert_eq!(found[0].id, east.id);
            assert_eq!(found[1].id, north.id);
        });
    }

    #[test]
    fn nearest_truncates_to_amount() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();

            for i in 0..4 {
                store
                    .insert(&Waypoint::new(format!("w{}", i), 50.0, 8.0 + f64::from(i)))
                    .await
                    .unwrap();
            }

            let found = store.nearest(2, 50.0, 8.0).await.unwrap();
            assert_eq!(found.len(), 2);

            let all = store.nearest(10, 50.0, 8.0).await.unwrap();
            assert_eq!(all.len(), 4);
        });
    }
}
