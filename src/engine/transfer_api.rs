use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::TransferAPI;
use crate::entities::{validate_coordinates, Route, RouteConnection, RouteMembership};
use crate::error::Error;

#[async_trait]
impl TransferAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn routes_through_waypoint(&self, id: Uuid) -> Result<Vec<RouteMembership>, Error> {
        // an unknown waypoint is NotFound; a known waypoint with no routes
        // is an empty success
        self.waypoints.get_by_id(id).await?;

        self.memberships.by_waypoint(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn common_routes(&self, from: Uuid, to: Uuid) -> Result<Vec<Route>, Error> {
        self.waypoints.get_by_id(from).await?;
        self.waypoints.get_by_id(to).await?;

        let from_memberships = self.memberships.by_waypoint(from).await?;
        let to_memberships = self.memberships.by_waypoint(to).await?;

        tracing::debug!(
            from_rows = from_memberships.len(),
            to_rows = to_memberships.len(),
            "matching membership rows"
        );

        // a route matches when both waypoints sit on the same variant and
        // `from` comes strictly earlier; deduplicated by route id since a
        // stop visited twice would pair up more than once
        let mut route_ids: Vec<Uuid> = Vec::new();

        for a in &from_memberships {
            for b in &to_memberships {
                if a.route_id == b.route_id
                    && a.route_kind == b.route_kind
                    && a.route_number < b.route_number
                    && !route_ids.contains(&a.route_id)
                {
                    route_ids.push(a.route_id);
                }
            }
        }

        if route_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.routes.get_by_ids(&route_ids).await
    }

    #[tracing::instrument(skip(self))]
    async fn collect_routes(
        &self,
        amount: i64,
        from_latitude: f64,
        from_longitude: f64,
        to_latitude: f64,
        to_longitude: f64,
    ) -> Result<RouteConnection, Error> {
        if amount <= 0 {
            return Err(Error::bad_request("amount must be positive"));
        }

        validate_coordinates(from_latitude, from_longitude)?;
        validate_coordinates(to_latitude, to_longitude)?;

        let near_from = self
            .waypoints
            .nearest(amount, from_latitude, from_longitude)
            .await?;
        let near_to = self
            .waypoints
            .nearest(amount, to_latitude, to_longitude)
            .await?;

        // first match wins, scanning closest-first on both sides; this bounds
        // the cost at amount^2 common-route lookups
        for from_waypoint in &near_from {
            for to_waypoint in &near_to {
                let routes = self
                    .common_routes(from_waypoint.id, to_waypoint.id)
                    .await?;

                if !routes.is_empty() {
                    return Ok(RouteConnection {
                        from: from_waypoint.clone(),
                        to: to_waypoint.clone(),
                        routes,
                    });
                }
            }
        }

        Err(Error::not_found("no connecting routes found"))
    }
}
