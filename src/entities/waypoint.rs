use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Route;
use crate::error::Error;

pub const MAX_NAME_LENGTH: usize = 256;

/// A physical stop location. Routes reference waypoints, never the other way
/// around, so a waypoint outlives any route passing through it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Waypoint {
            id: Uuid::new_v4(),
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() || self.name.len() > MAX_NAME_LENGTH {
            return Err(Error::bad_request("invalid name"));
        }

        validate_coordinates(self.latitude, self.longitude)
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), Error> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::bad_request("latitude out of range"));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::bad_request("longitude out of range"));
    }

    Ok(())
}

/// A connection between two areas: the pair of waypoints that links them and
/// every route running from `from` to `to`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteConnection {
    pub from: Waypoint,
    pub to: Waypoint,
    pub routes: Vec<Route>,
}
