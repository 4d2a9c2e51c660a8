use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::RouteAPI;
use crate::entities::{Route, RouteDetails, RoutePatch};
use crate::error::Error;

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_routes(&self, limit: u64, offset: u64) -> Result<Vec<Route>, Error> {
        self.routes.list(limit, offset).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_route(&self, id: Uuid) -> Result<RouteDetails, Error> {
        let route = self.routes.get_by_id(id).await?;

        let waypoints = self
            .memberships
            .waypoints_in_order(route.id, route.route_kind)
            .await?;

        Ok(RouteDetails { route, waypoints })
    }

    #[tracing::instrument(skip(self))]
    async fn create_route(&self, route: Route, waypoint_ids: Vec<Uuid>) -> Result<Route, Error> {
        route.validate()?;

        // a route of declared length L needs at least L stop references;
        // extras are accepted and numbered like any other
        if waypoint_ids.len() < route.length as usize {
            return Err(Error::bad_request("fewer waypoints than route length"));
        }

        self.routes.insert(&route, &waypoint_ids).await?;

        tracing::info!(id = %route.id, stops = waypoint_ids.len(), "route created");

        Ok(route)
    }

    #[tracing::instrument(skip(self))]
    async fn update_route(&self, id: Uuid, patch: RoutePatch) -> Result<(), Error> {
        patch.validate()?;

        if patch.is_empty() {
            return Err(Error::bad_request("no fields to update"));
        }

        self.routes.update(id, &patch).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_route(&self, id: Uuid) -> Result<(), Error> {
        self.routes.delete(id).await
    }
}
