use std::env;
use std::net::SocketAddr;

use tracing::Level;

use crate::error::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let host = env::var("HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = env::var("HTTP_PORT").unwrap_or_else(|_| "8080".into());

        let listen_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| Error::internal("invalid HTTP_HOST/HTTP_PORT"))?;

        let database_url =
            env::var("DATABASE_URL").map_err(|_| Error::internal("DATABASE_URL is not set"))?;

        let max_connections = match env::var("PG_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .map_err(|_| Error::internal("invalid PG_MAX_CONNECTIONS"))?,
            Err(_) => 5,
        };

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "debug".into())
            .parse()
            .map_err(|_| Error::internal("invalid LOG_LEVEL"))?;

        Ok(Self {
            listen_addr,
            database_url,
            max_connections,
            log_level,
        })
    }
}
