mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};

use crate::api::{DynAPI, API};
use crate::server::handlers::{routes, waypoints};

pub async fn serve<T: API + Send + Sync + 'static>(api: T, addr: SocketAddr) {
    let api = Arc::new(api) as DynAPI;

    let v1 = Router::new()
        .route(
            "/waypoints",
            get(waypoints::list).post(waypoints::create),
        )
        .route(
            "/waypoints/:id",
            get(waypoints::find)
                .put(waypoints::update)
                .delete(waypoints::delete),
        )
        .route("/waypoints/:id/routes", get(waypoints::routes_through))
        .route(
            "/waypoints/:id/routes/:to_id",
            get(waypoints::common_routes),
        )
        .route("/nearest", get(waypoints::nearest))
        .route("/connections", get(waypoints::collect_routes))
        .route("/routes", get(routes::list).post(routes::create))
        .route(
            "/routes/:id",
            get(routes::find).patch(routes::update).delete(routes::delete),
        )
        .layer(Extension(api));

    let app = Router::new().nest("/api/v1", v1);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
