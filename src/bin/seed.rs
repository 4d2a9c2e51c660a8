//! Replays JSON waypoint/route fixtures against a running itinera server.
//!
//! Waypoints are created first; routes reference waypoints by name and are
//! resolved through the ids returned by the create calls.

use std::collections::HashMap;
use std::env;
use std::fs::File;

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use itinera::entities::Waypoint;

#[derive(Debug, Deserialize)]
struct SeedWaypoint {
    name: String,
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct SeedRoute {
    name: String,
    route_kind: i32,
    length: i32,
    price: i64,
    vehicle_type: String,
    route_type: String,
    waypoints: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url =
        env::var("SEED_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080/api/v1".into());
    let waypoints_path =
        env::var("SEED_WAYPOINTS").unwrap_or_else(|_| "seed/waypoints.json".into());
    let routes_path = env::var("SEED_ROUTES").unwrap_or_else(|_| "seed/routes.json".into());

    let waypoints: Vec<SeedWaypoint> = serde_json::from_reader(File::open(&waypoints_path)?)?;
    let routes: Vec<SeedRoute> = serde_json::from_reader(File::open(&routes_path)?)?;

    let client = reqwest::Client::new();

    let mut ids_by_name: HashMap<String, Uuid> = HashMap::new();

    for waypoint in waypoints {
        let created: Waypoint = client
            .post(format!("{}/waypoints", base_url))
            .json(&json!({
                "name": waypoint.name,
                "lat": waypoint.coordinates[0],
                "lon": waypoint.coordinates[1],
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        ids_by_name.insert(created.name.clone(), created.id);
    }

    println!("created {} waypoints", ids_by_name.len());

    let mut created_routes = 0;

    for route in routes {
        let mut waypoint_ids = Vec::with_capacity(route.waypoints.len());

        for name in &route.waypoints {
            let id = ids_by_name
                .get(name)
                .ok_or_else(|| format!("route {} references unknown waypoint {}", route.name, name))?;
            waypoint_ids.push(*id);
        }

        client
            .post(format!("{}/routes", base_url))
            .json(&json!({
                "name": route.name,
                "route_kind": route.route_kind,
                "length": route.length,
                "price": route.price,
                "vehicle_type": route.vehicle_type,
                "route_type": route.route_type,
                "waypoints": waypoint_ids,
            }))
            .send()
            .await?
            .error_for_status()?;

        created_routes += 1;
    }

    println!("created {} routes", created_routes);

    Ok(())
}
