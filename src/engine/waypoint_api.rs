use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::WaypointAPI;
use crate::entities::{validate_coordinates, Waypoint};
use crate::error::Error;

#[async_trait]
impl WaypointAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_waypoints(&self, limit: u64, offset: u64) -> Result<Vec<Waypoint>, Error> {
        self.waypoints.list(limit, offset).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_waypoint(&self, id: Uuid) -> Result<Waypoint, Error> {
        self.waypoints.get_by_id(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn nearest_waypoints(
        &self,
        amount: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Waypoint>, Error> {
        if amount <= 0 {
            return Err(Error::bad_request("amount must be positive"));
        }

        validate_coordinates(latitude, longitude)?;

        self.waypoints.nearest(amount, latitude, longitude).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_waypoint(&self, waypoint: Waypoint) -> Result<Waypoint, Error> {
        waypoint.validate()?;

        self.waypoints.insert(&waypoint).await?;

        tracing::info!(id = %waypoint.id, "waypoint created");

        Ok(waypoint)
    }

    #[tracing::instrument(skip(self))]
    async fn update_waypoint(&self, waypoint: Waypoint) -> Result<(), Error> {
        waypoint.validate()?;

        self.waypoints.update(&waypoint).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_waypoint(&self, id: Uuid) -> Result<(), Error> {
        self.waypoints.delete(id).await
    }
}
