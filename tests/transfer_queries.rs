use std::sync::Arc;

use itinera::api::{RouteAPI, TransferAPI, WaypointAPI};
use itinera::engine::Engine;
use itinera::entities::{Route, RouteType, VehicleType, Waypoint};
use itinera::error::ErrorKind;
use itinera::store::MemoryStore;
use uuid::Uuid;

fn engine() -> Engine {
    let store = Arc::new(MemoryStore::new());
    Engine::new(store.clone(), store.clone(), store)
}

async fn add(engine: &Engine, name: &str, lat: f64, lon: f64) -> Waypoint {
    engine
        .create_waypoint(Waypoint::new(name, lat, lon))
        .await
        .unwrap()
}

async fn connect(engine: &Engine, name: &str, kind: i32, stops: &[&Waypoint]) -> Route {
    let route = Route::new(
        name,
        kind,
        stops.len() as i32,
        35,
        VehicleType::Bus,
        RouteType::City,
    );

    engine
        .create_route(route, stops.iter().map(|w| w.id).collect())
        .await
        .unwrap()
}

#[tokio::test]
async fn common_routes_respect_stop_direction() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;
    let w2 = add(&engine, "w2", 0.0, 1.0).await;
    let w3 = add(&engine, "w3", 0.0, 2.0).await;

    let route = connect(&engine, "R", 1, &[&w1, &w2, &w3]).await;

    let details = engine.find_route(route.id).await.unwrap();
    assert_eq!(
        details.waypoints.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![w1.id, w2.id, w3.id]
    );

    let forward = engine.common_routes(w1.id, w3.id).await.unwrap();
    assert_eq!(forward.len(), 1);
    assert_eq!(forward[0].id, route.id);

    // direction matters: w3 sits after w1, so the reverse query is empty
    let backward = engine.common_routes(w3.id, w1.id).await.unwrap();
    assert!(backward.is_empty());
}

#[tokio::test]
async fn unknown_waypoints_are_not_found() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;

    let err = engine.common_routes(w1.id, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = engine.common_routes(Uuid::new_v4(), w1.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = engine.routes_through_waypoint(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn waypoint_without_routes_yields_empty_results() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;
    let w2 = add(&engine, "w2", 0.0, 1.0).await;

    // known waypoints with no memberships are an empty success, not an error
    assert!(engine.routes_through_waypoint(w1.id).await.unwrap().is_empty());
    assert!(engine.common_routes(w1.id, w2.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn revisited_stop_produces_a_single_match() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;
    let w2 = add(&engine, "w2", 0.0, 1.0).await;
    let w3 = add(&engine, "w3", 0.0, 2.0).await;

    // a loop route passes w1 twice before reaching w3, pairing up twice
    let route = connect(&engine, "loop", 1, &[&w1, &w2, &w1, &w3]).await;

    let found = engine.common_routes(w1.id, w3.id).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, route.id);
}

#[tokio::test]
async fn memberships_carry_route_metadata() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;
    let w2 = add(&engine, "w2", 0.0, 1.0).await;

    let forward = connect(&engine, "R", 1, &[&w1, &w2]).await;
    let backward = connect(&engine, "R", 2, &[&w2, &w1]).await;

    let mut memberships = engine.routes_through_waypoint(w1.id).await.unwrap();
    memberships.sort_by_key(|m| m.route_kind);

    assert_eq!(memberships.len(), 2);
    assert_eq!(memberships[0].route_id, forward.id);
    assert_eq!(memberships[0].route_kind, 1);
    assert_eq!(memberships[0].route_number, 1);
    assert_eq!(memberships[1].route_id, backward.id);
    assert_eq!(memberships[1].route_kind, 2);
    assert_eq!(memberships[1].route_number, 2);
}

#[tokio::test]
async fn collect_routes_returns_the_first_matching_pair() {
    let engine = engine();

    // two candidates around each area, ordered by distance from the centers
    let a1 = add(&engine, "a1", 55.7505, 37.61).await;
    let a2 = add(&engine, "a2", 55.76, 37.61).await;
    let b1 = add(&engine, "b1", 55.7005, 37.70).await;
    let b2 = add(&engine, "b2", 55.71, 37.70).await;

    let direct = connect(&engine, "direct", 1, &[&a1, &b2]).await;
    connect(&engine, "other", 1, &[&a2, &b1]).await;

    // scan order is (a1,b1), (a1,b2), ...; (a1,b2) is the first hit even
    // though (a2,b1) also connects the areas
    let connection = engine
        .collect_routes(2, 55.75, 37.61, 55.70, 37.70)
        .await
        .unwrap();

    assert_eq!(connection.from.id, a1.id);
    assert_eq!(connection.to.id, b2.id);
    assert_eq!(connection.routes.len(), 1);
    assert_eq!(connection.routes[0].id, direct.id);
}

#[tokio::test]
async fn collect_routes_is_bounded_by_amount() {
    let engine = engine();

    let a1 = add(&engine, "a1", 55.7505, 37.61).await;
    let a2 = add(&engine, "a2", 55.76, 37.61).await;
    let b1 = add(&engine, "b1", 55.7005, 37.70).await;
    let b2 = add(&engine, "b2", 55.71, 37.70).await;

    connect(&engine, "direct", 1, &[&a1, &b2]).await;
    connect(&engine, "other", 1, &[&a2, &b1]).await;

    // with amount = 1 only (a1, b1) is scanned, and those two never share
    // a route
    let err = engine
        .collect_routes(1, 55.75, 37.61, 55.70, 37.70)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn collect_routes_without_any_link_is_not_found() {
    let engine = engine();

    add(&engine, "a", 55.75, 37.61).await;
    add(&engine, "b", 55.70, 37.70).await;

    let err = engine
        .collect_routes(5, 55.75, 37.61, 55.70, 37.70)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn collect_routes_rejects_non_positive_amount() {
    let engine = engine();

    let err = engine
        .collect_routes(0, 55.75, 37.61, 55.70, 37.70)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::BadRequest);
}
