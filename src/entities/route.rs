use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::entities::waypoint::MAX_NAME_LENGTH;
use crate::entities::Waypoint;
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Bus,
    Trolleybus,
    Train,
}

impl VehicleType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Trolleybus => "trolleybus",
            Self::Train => "train",
        }
    }
}

impl FromStr for VehicleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "bus" => Ok(Self::Bus),
            "trolleybus" => Ok(Self::Trolleybus),
            "train" => Ok(Self::Train),
            other => Err(Error::internal(format!("unknown vehicle type: {}", other))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    City,
    Intercity,
}

impl RouteType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Intercity => "intercity",
        }
    }
}

impl FromStr for RouteType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "city" => Ok(Self::City),
            "intercity" => Ok(Self::Intercity),
            other => Err(Error::internal(format!("unknown route type: {}", other))),
        }
    }
}

/// A named transit line. `route_kind` distinguishes directional variants of
/// the same line; each (route, kind) pair carries its own 1..N stop numbering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub route_kind: i32,
    pub length: i32,
    pub price: i64,
    pub vehicle_type: VehicleType,
    pub route_type: RouteType,
}

impl Route {
    pub fn new(
        name: impl Into<String>,
        route_kind: i32,
        length: i32,
        price: i64,
        vehicle_type: VehicleType,
        route_type: RouteType,
    ) -> Self {
        Route {
            id: Uuid::new_v4(),
            name: name.into(),
            route_kind,
            length,
            price,
            vehicle_type,
            route_type,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() || self.name.len() > MAX_NAME_LENGTH {
            return Err(Error::bad_request("invalid name"));
        }

        // 1 and 2 are the directional variants; 0 is reserved
        if !(0..=2).contains(&self.route_kind) {
            return Err(Error::bad_request("invalid route kind"));
        }

        if self.length < 0 {
            return Err(Error::bad_request("invalid length"));
        }

        if self.price < 0 {
            return Err(Error::bad_request("invalid price"));
        }

        Ok(())
    }
}

/// Field-level partial update of a route's non-identity metadata.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RoutePatch {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub vehicle_type: Option<VehicleType>,
    pub route_type: Option<RouteType>,
}

impl RoutePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.vehicle_type.is_none()
            && self.route_type.is_none()
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() || name.len() > MAX_NAME_LENGTH {
                return Err(Error::bad_request("invalid name"));
            }
        }

        if let Some(price) = self.price {
            if price < 0 {
                return Err(Error::bad_request("invalid price"));
            }
        }

        Ok(())
    }
}

/// A route together with its stop sequence, in traversal order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteDetails {
    pub route: Route,
    pub waypoints: Vec<Waypoint>,
}
