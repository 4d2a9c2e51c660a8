use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::DynAPI;
use crate::entities::{Route, RouteDetails, RoutePatch, RouteType, VehicleType};
use crate::error::Error;
use crate::server::handlers::{DEFAULT_LIMIT, DEFAULT_OFFSET};

#[derive(Debug, Deserialize)]
pub struct CreateParams {
    name: String,
    route_kind: i32,
    length: i32,
    price: i64,
    vehicle_type: VehicleType,
    route_type: RouteType,
    waypoints: Vec<Uuid>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<(StatusCode, Json<Route>), Error> {
    let route = Route::new(
        params.name,
        params.route_kind,
        params.length,
        params.price,
        params.vehicle_type,
        params.route_type,
    );

    let route = api.create_route(route, params.waypoints).await?;

    Ok((StatusCode::CREATED, Json(route)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<u64>,
    offset: Option<u64>,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Route>>, Error> {
    let routes = api
        .list_routes(
            params.limit.unwrap_or(DEFAULT_LIMIT),
            params.offset.unwrap_or(DEFAULT_OFFSET),
        )
        .await?;

    Ok(routes.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteDetails>, Error> {
    let details = api.find_route(id).await?;

    Ok(details.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(patch): Json<RoutePatch>,
) -> Result<StatusCode, Error> {
    api.update_route(id, patch).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    api.delete_route(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
