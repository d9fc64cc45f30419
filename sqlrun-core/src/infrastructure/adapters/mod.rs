// sqlrun-core/src/infrastructure/adapters/mod.rs

pub mod cursor;
pub mod duckdb;
pub mod postgres;
pub mod statements;

pub use cursor::{BufferedCursor, BufferedSet};
pub use self::duckdb::DuckDBConnector;
pub use postgres::PostgresConnector;

use tracing::{info, instrument, warn};

use crate::domain::settings::{Engine, RunnerConfig};
use crate::error::SqlRunError;
use crate::ports::connector::Connector;

/// Opens the configured engine and checks it answers before anything runs.
#[instrument(skip_all, fields(engine = %config.engine))]
pub async fn open_connector(config: &RunnerConfig) -> Result<Box<dyn Connector>, SqlRunError> {
    let connector: Box<dyn Connector> = match config.engine {
        Engine::Postgres => Box::new(PostgresConnector::connect(&config.connection).await?),
        Engine::DuckDB => Box::new(DuckDBConnector::new(&config.duckdb_path)?),
    };

    ensure_alive(connector).await
}

/// Pings a freshly opened connection. On failure the connection is closed and
/// the ping error is returned.
async fn ensure_alive(connector: Box<dyn Connector>) -> Result<Box<dyn Connector>, SqlRunError> {
    if let Err(e) = connector.ping().await {
        if let Err(close_err) = connector.close().await {
            warn!("Failed to close connection after a failed ping: {}", close_err);
        }
        return Err(e);
    }

    info!("🔌 {} connection ready", connector.engine_name());
    Ok(connector)
}
