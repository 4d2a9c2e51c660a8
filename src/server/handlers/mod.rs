pub mod routes;
pub mod waypoints;

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_OFFSET: u64 = 0;
pub const DEFAULT_AMOUNT: i64 = 1;
