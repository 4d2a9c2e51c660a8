use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Executor, Pool, Postgres, Row};
use uuid::Uuid;

use crate::entities::{Route, RouteMembership, RoutePatch, Waypoint};
use crate::error::Error;
use crate::store::{MembershipStore, RouteStore, WaypointStore};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL-backed store. Waypoint geometry is kept in a PostGIS column so
/// the nearest scan can order by spherical distance instead of flat degrees.
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub async fn connect(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;

        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), Error> {
        self.pool
            .execute("CREATE EXTENSION IF NOT EXISTS postgis")
            .await?;

        self.pool
            .execute(
                "CREATE TABLE IF NOT EXISTS waypoints (
                    id UUID PRIMARY KEY,
                    name VARCHAR NOT NULL,
                    latitude DOUBLE PRECISION NOT NULL,
                    longitude DOUBLE PRECISION NOT NULL,
                    geom geometry(Point, 4326) NOT NULL
                )",
            )
            .await?;

        self.pool
            .execute(
                "CREATE TABLE IF NOT EXISTS routes (
                    id UUID PRIMARY KEY,
                    name VARCHAR NOT NULL,
                    route_kind INT4 NOT NULL,
                    length INT4 NOT NULL,
                    price INT8 NOT NULL,
                    vehicle_type VARCHAR NOT NULL,
                    route_type VARCHAR NOT NULL
                )",
            )
            .await?;

        self.pool
            .execute(
                "CREATE TABLE IF NOT EXISTS waypoint_routes (
                    route_id UUID NOT NULL REFERENCES routes(id) ON DELETE CASCADE,
                    waypoint_id UUID NOT NULL REFERENCES waypoints(id),
                    route_name VARCHAR NOT NULL,
                    route_kind INT4 NOT NULL,
                    route_number INT4 NOT NULL,
                    PRIMARY KEY (route_id, route_kind, route_number)
                )",
            )
            .await?;

        Ok(())
    }
}

fn constraint_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}

fn waypoint_from_row(row: &PgRow) -> Result<Waypoint, Error> {
    Ok(Waypoint {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
    })
}

fn route_from_row(row: &PgRow) -> Result<Route, Error> {
    let vehicle_type: String = row.try_get("vehicle_type")?;
    let route_type: String = row.try_get("route_type")?;

    Ok(Route {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        route_kind: row.try_get("route_kind")?,
        length: row.try_get("length")?,
        price: row.try_get("price")?,
        vehicle_type: vehicle_type.parse()?,
        route_type: route_type.parse()?,
    })
}

#[async_trait]
impl WaypointStore for PgStore {
    async fn insert(&self, waypoint: &Waypoint) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO waypoints (id, name, latitude, longitude, geom)
                 VALUES ($1, $2, $3, $4, ST_SetSRID(ST_MakePoint($4, $3), 4326))",
            )
            .bind(&waypoint.id)
            .bind(&waypoint.name)
            .bind(waypoint.latitude)
            .bind(waypoint.longitude),
        )
        .await
        .map_err(|err| match constraint_code(&err).as_deref() {
            Some(UNIQUE_VIOLATION) => Error::conflict("waypoint already exists"),
            _ => err.into(),
        })?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Waypoint, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_row = conn
            .fetch_optional(
                sqlx::query("SELECT id, name, latitude, longitude FROM waypoints WHERE id = $1")
                    .bind(&id),
            )
            .await?;

        let row = maybe_row.ok_or_else(|| Error::not_found("waypoint not found"))?;

        waypoint_from_row(&row)
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Waypoint>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT id, name, latitude, longitude FROM waypoints
                     ORDER BY id LIMIT $1 OFFSET $2",
                )
                .bind(limit as i64)
                .bind(offset as i64),
            )
            .await?;

        rows.iter().map(waypoint_from_row).collect()
    }

    async fn nearest(
        &self,
        amount: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Waypoint>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT id, name, latitude, longitude FROM waypoints
                     ORDER BY ST_DistanceSphere(
                         geom,
                         ST_SetSRID(ST_MakePoint($1, $2), 4326)
                     ), id
                     LIMIT $3",
                )
                .bind(longitude)
                .bind(latitude)
                .bind(amount),
            )
            .await?;

        rows.iter().map(waypoint_from_row).collect()
    }

    async fn update(&self, waypoint: &Waypoint) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(
                sqlx::query(
                    "UPDATE waypoints
                     SET name = $2, latitude = $3, longitude = $4,
                         geom = ST_SetSRID(ST_MakePoint($4, $3), 4326)
                     WHERE id = $1",
                )
                .bind(&waypoint.id)
                .bind(&waypoint.name)
                .bind(waypoint.latitude)
                .bind(waypoint.longitude),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("waypoint not found"));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(sqlx::query("DELETE FROM waypoints WHERE id = $1").bind(&id))
            .await
            .map_err(|err| match constraint_code(&err).as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => {
                    Error::bad_request("waypoint is still part of a route")
                }
                _ => err.into(),
            })?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("waypoint not found"));
        }

        Ok(())
    }
}

#[async_trait]
impl RouteStore for PgStore {
    async fn insert(&self, route: &Route, waypoint_ids: &[Uuid]) -> Result<(), Error> {
        // one transaction: readers never see a route without its memberships;
        // any failure drops the transaction and rolls the route row back
        let mut tx = self.pool.begin().await?;

        tx.execute(
            sqlx::query(
                "INSERT INTO routes (id, name, route_kind, length, price, vehicle_type, route_type)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&route.id)
            .bind(&route.name)
            .bind(route.route_kind)
            .bind(route.length)
            .bind(route.price)
            .bind(route.vehicle_type.name())
            .bind(route.route_type.name()),
        )
        .await
        .map_err(|err| match constraint_code(&err).as_deref() {
            Some(UNIQUE_VIOLATION) => Error::conflict("route already exists"),
            _ => err.into(),
        })?;

        for (i, waypoint_id) in waypoint_ids.iter().enumerate() {
            tx.execute(
                sqlx::query(
                    "INSERT INTO waypoint_routes
                         (route_id, waypoint_id, route_name, route_kind, route_number)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(&route.id)
                .bind(waypoint_id)
                .bind(&route.name)
                .bind(route.route_kind)
                .bind(i as i32 + 1),
            )
            .await
            .map_err(|err| match constraint_code(&err).as_deref() {
                Some(UNIQUE_VIOLATION) => Error::conflict("route membership already exists"),
                Some(FOREIGN_KEY_VIOLATION) => {
                    Error::bad_request(format!("unknown waypoint {}", waypoint_id))
                }
                _ => err.into(),
            })?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Route, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_row = conn
            .fetch_optional(
                sqlx::query(
                    "SELECT id, name, route_kind, length, price, vehicle_type, route_type
                     FROM routes WHERE id = $1",
                )
                .bind(&id),
            )
            .await?;

        let row = maybe_row.ok_or_else(|| Error::not_found("route not found"))?;

        route_from_row(&row)
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Route>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT id, name, route_kind, length, price, vehicle_type, route_type
                     FROM routes WHERE id = ANY($1)",
                )
                .bind(ids),
            )
            .await?;

        rows.iter().map(route_from_row).collect()
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Route>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT id, name, route_kind, length, price, vehicle_type, route_type
                     FROM routes ORDER BY id LIMIT $1 OFFSET $2",
                )
                .bind(limit as i64)
                .bind(offset as i64),
            )
            .await?;

        rows.iter().map(route_from_row).collect()
    }

    async fn update(&self, id: Uuid, patch: &RoutePatch) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        let result = tx
            .execute(
                sqlx::query(
                    "UPDATE routes
                     SET name = COALESCE($2, name),
                         price = COALESCE($3, price),
                         vehicle_type = COALESCE($4, vehicle_type),
                         route_type = COALESCE($5, route_type)
                     WHERE id = $1",
                )
                .bind(&id)
                .bind(patch.name.as_deref())
                .bind(patch.price)
                .bind(patch.vehicle_type.map(|vt| vt.name()))
                .bind(patch.route_type.map(|rt| rt.name())),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("route not found"));
        }

        // route_name is denormalized into the membership rows; a rename must
        // rewrite those copies in the same transaction
        if let Some(name) = &patch.name {
            tx.execute(
                sqlx::query("UPDATE waypoint_routes SET route_name = $2 WHERE route_id = $1")
                    .bind(&id)
                    .bind(name),
            )
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        // membership rows go with the route via ON DELETE CASCADE
        let result = conn
            .execute(sqlx::query("DELETE FROM routes WHERE id = $1").bind(&id))
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("route not found"));
        }

        Ok(())
    }
}

#[async_trait]
impl MembershipStore for PgStore {
    async fn by_waypoint(&self, waypoint_id: Uuid) -> Result<Vec<RouteMembership>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT route_id, waypoint_id, route_name, route_kind, route_number
                     FROM waypoint_routes WHERE waypoint_id = $1
                     ORDER BY route_id, route_kind, route_number",
                )
                .bind(&waypoint_id),
            )
            .await?;

        let mut memberships = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            memberships.push(RouteMembership {
                route_id: row.try_get("route_id")?,
                waypoint_id: row.try_get("waypoint_id")?,
                route_name: row.try_get("route_name")?,
                route_kind: row.try_get("route_kind")?,
                route_number: row.try_get("route_number")?,
            });
        }

        Ok(memberships)
    }

    async fn waypoints_in_order(
        &self,
        route_id: Uuid,
        route_kind: i32,
    ) -> Result<Vec<Waypoint>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT w.id, w.name, w.latitude, w.longitude
                     FROM waypoints w
                     JOIN waypoint_routes wr ON w.id = wr.waypoint_id
                     WHERE wr.route_id = $1 AND wr.route_kind = $2
                     ORDER BY wr.route_number",
                )
                .bind(&route_id)
                .bind(route_kind),
            )
            .await?;

        rows.iter().map(waypoint_from_row).collect()
    }
}
