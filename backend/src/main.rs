//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use accounts::inbound::http::session_config::{BuildMode, session_settings_from_env};
use accounts::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::settings::load_settings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings()?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(&settings, session)?;

    match settings.database_url() {
        Some(url) => {
            let migration_url = url.to_owned();
            let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
                .await
                .map_err(std::io::Error::other)?
                .map_err(std::io::Error::other)?;
            info!(applied, "database migrations complete");
            let mut pool_config = PoolConfig::new(url);
            if let Some(size) = settings.database_pool_size {
                pool_config = pool_config.with_max_size(size);
            }
            let pool = DbPool::new(pool_config)
                .await
                .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database_url configured; accounts are kept in memory"),
    }

    info!(addr = %config.bind_addr(), "starting accounts server");
    create_server(config).await?.await
}
