use std::sync::Arc;

use itinera::api::{RouteAPI, TransferAPI, WaypointAPI};
use itinera::engine::Engine;
use itinera::entities::{Route, RoutePatch, RouteType, VehicleType, Waypoint};
use itinera::error::ErrorKind;
use itinera::store::{MemoryStore, RouteStore};
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

fn route(name: &str, kind: i32, length: i32) -> Route {
    Route::new(name, kind, length, 35, VehicleType::Bus, RouteType::City)
}

#[tokio::test]
async fn creation_persists_the_stop_sequence_in_input_order() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;
    let w2 = add(&engine, "w2", 0.0, 1.0).await;
    let w3 = add(&engine, "w3", 0.0, 2.0).await;

    let created = engine
        .create_route(route("7", 1, 3), vec![w1.id, w2.id, w3.id])
        .await
        .unwrap();

    let details = engine.find_route(created.id).await.unwrap();

    assert_eq!(details.route, created);
    assert_eq!(
        details.waypoints.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![w1.id, w2.id, w3.id]
    );

    let memberships = engine.routes_through_waypoint(w2.id).await.unwrap();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].route_id, created.id);
    assert_eq!(memberships[0].route_name, "7");
    assert_eq!(memberships[0].route_kind, 1);
    assert_eq!(memberships[0].route_number, 2);
}

#[tokio::test]
async fn extra_waypoint_references_are_accepted() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;
    let w2 = add(&engine, "w2", 0.0, 1.0).await;
    let w3 = add(&engine, "w3", 0.0, 2.0).await;

    let created = engine
        .create_route(route("8", 1, 2), vec![w1.id, w2.id, w3.id])
        .await
        .unwrap();

    let details = engine.find_route(created.id).await.unwrap();
    assert_eq!(details.waypoints.len(), 3);
}

#[tokio::test]
async fn fewer_references_than_length_is_rejected() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;

    let err = engine
        .create_route(route("9", 1, 3), vec![w1.id])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::BadRequest);
}

#[tokio::test]
async fn unknown_waypoint_reference_leaves_no_trace() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;
    let w3 = add(&engine, "w3", 0.0, 2.0).await;

    let err = engine
        .create_route(route("10", 1, 3), vec![w1.id, Uuid::new_v4(), w3.id])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::BadRequest);

    // all-or-nothing: no route row, no membership rows
    assert!(engine.list_routes(10, 0).await.unwrap().is_empty());
    assert!(engine.routes_through_waypoint(w1.id).await.unwrap().is_empty());
    assert!(engine.routes_through_waypoint(w3.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_route_id_is_a_conflict() {
    let store = MemoryStore::new();

    let first = route("11", 1, 0);
    RouteStore::insert(&store, &first, &[]).await.unwrap();

    let second = Route { id: first.id, ..route("11bis", 2, 0) };
    let err = RouteStore::insert(&store, &second, &[]).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn deleting_a_route_cascades_its_memberships() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;
    let w2 = add(&engine, "w2", 0.0, 1.0).await;

    let created = engine
        .create_route(route("12", 1, 2), vec![w1.id, w2.id])
        .await
        .unwrap();

    assert_eq!(engine.routes_through_waypoint(w1.id).await.unwrap().len(), 1);

    engine.delete_route(created.id).await.unwrap();

    assert!(engine.routes_through_waypoint(w1.id).await.unwrap().is_empty());

    let err = engine.find_route(created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = engine.delete_route(created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn deleting_a_waypoint_still_on_a_route_is_rejected() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;
    let w2 = add(&engine, "w2", 0.0, 1.0).await;

    let created = engine
        .create_route(route("13", 1, 2), vec![w1.id, w2.id])
        .await
        .unwrap();

    let err = engine.delete_waypoint(w1.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    engine.delete_route(created.id).await.unwrap();
    engine.delete_waypoint(w1.id).await.unwrap();
}

#[tokio::test]
async fn patch_updates_fields_independently() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;

    let created = engine
        .create_route(route("14", 1, 1), vec![w1.id])
        .await
        .unwrap();

    engine
        .update_route(
            created.id,
            RoutePatch {
                price: Some(50),
                ..RoutePatch::default()
            },
        )
        .await
        .unwrap();

    let details = engine.find_route(created.id).await.unwrap();
    assert_eq!(details.route.price, 50);
    assert_eq!(details.route.name, "14");
    assert_eq!(details.route.vehicle_type, VehicleType::Bus);
}

#[tokio::test]
async fn rename_rewrites_denormalized_membership_rows() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;

    let created = engine
        .create_route(route("15", 1, 1), vec![w1.id])
        .await
        .unwrap();

    engine
        .update_route(
            created.id,
            RoutePatch {
                name: Some("15a".into()),
                ..RoutePatch::default()
            },
        )
        .await
        .unwrap();

    let memberships = engine.routes_through_waypoint(w1.id).await.unwrap();
    assert_eq!(memberships[0].route_name, "15a");
}

#[tokio::test]
async fn empty_patch_is_rejected() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;

    let created = engine
        .create_route(route("16", 1, 1), vec![w1.id])
        .await
        .unwrap();

    let err = engine
        .update_route(created.id, RoutePatch::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::BadRequest);
}

#[tokio::test]
async fn patching_an_unknown_route_is_not_found() {
    let engine = engine();

    let err = engine
        .update_route(
            Uuid::new_v4(),
            RoutePatch {
                price: Some(10),
                ..RoutePatch::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn invalid_metadata_is_rejected_before_any_write() {
    let engine = engine();

    let w1 = add(&engine, "w1", 0.0, 0.0).await;

    let err = engine
        .create_route(route("17", 3, 1), vec![w1.id])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    let mut negative_price = route("18", 1, 1);
    negative_price.price = -10;

    let err = engine
        .create_route(negative_price, vec![w1.id])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    assert!(engine.list_routes(10, 0).await.unwrap().is_empty());
}
