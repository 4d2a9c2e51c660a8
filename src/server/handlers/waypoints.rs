use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::DynAPI;
use crate::entities::{Route, RouteConnection, RouteMembership, Waypoint};
use crate::error::Error;
use crate::server::handlers::{DEFAULT_AMOUNT, DEFAULT_LIMIT, DEFAULT_OFFSET};

#[derive(Debug, Deserialize)]
pub struct CreateParams {
    name: String,
    lat: f64,
    lon: f64,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<(StatusCode, Json<Waypoint>), Error> {
    let waypoint = api
        .create_waypoint(Waypoint::new(params.name, params.lat, params.lon))
        .await?;

    Ok((StatusCode::CREATED, Json(waypoint)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<u64>,
    offset: Option<u64>,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Waypoint>>, Error> {
    let waypoints = api
        .list_waypoints(
            params.limit.unwrap_or(DEFAULT_LIMIT),
            params.offset.unwrap_or(DEFAULT_OFFSET),
        )
        .await?;

    Ok(waypoints.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Waypoint>, Error> {
    let waypoint = api.find_waypoint(id).await?;

    Ok(waypoint.into())
}

#[derive(Debug, Deserialize)]
pub struct NearestParams {
    amount: Option<i64>,
    lat: f64,
    lon: f64,
}

pub async fn nearest(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<NearestParams>,
) -> Result<Json<Vec<Waypoint>>, Error> {
    let waypoints = api
        .nearest_waypoints(
            params.amount.unwrap_or(DEFAULT_AMOUNT),
            params.lat,
            params.lon,
        )
        .await?;

    Ok(waypoints.into())
}

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    name: String,
    lat: f64,
    lon: f64,
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<UpdateParams>,
) -> Result<StatusCode, Error> {
    api.update_waypoint(Waypoint {
        id,
        name: params.name,
        latitude: params.lat,
        longitude: params.lon,
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    api.delete_waypoint(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn routes_through(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RouteMembership>>, Error> {
    let memberships = api.routes_through_waypoint(id).await?;

    Ok(memberships.into())
}

pub async fn common_routes(
    Extension(api): Extension<DynAPI>,
    Path((id, to_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<Route>>, Error> {
    let routes = api.common_routes(id, to_id).await?;

    Ok(routes.into())
}

#[derive(Debug, Deserialize)]
pub struct CollectParams {
    amount: Option<i64>,
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
}

pub async fn collect_routes(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<CollectParams>,
) -> Result<Json<RouteConnection>, Error> {
    let connection = api
        .collect_routes(
            params.amount.unwrap_or(DEFAULT_AMOUNT),
            params.lat1,
            params.lon1,
            params.lat2,
            params.lon2,
        )
        .await?;

    Ok(connection.into())
}
