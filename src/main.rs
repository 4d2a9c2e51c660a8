use std::sync::Arc;

use itinera::config::Config;
use itinera::engine::Engine;
use itinera::server;
use itinera::store::PgStore;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = Config::from_env().unwrap();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let store = Arc::new(
        PgStore::connect(&config.database_url, config.max_connections)
            .await
            .unwrap(),
    );

    let engine = Engine::new(store.clone(), store.clone(), store);

    server::serve(engine, config.listen_addr).await;
}
