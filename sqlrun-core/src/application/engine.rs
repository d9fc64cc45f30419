// sqlrun-core/src/application/engine.rs

use std::time::{Duration, Instant};
use tracing::{debug, error, instrument};

use crate::application::materialization::Materializer;
use crate::domain::error::DomainError;
use crate::domain::result::ResultSet;
use crate::error::SqlRunError;
use crate::ports::connector::{Connector, ResultCursor};

/// Sends one script to the database as a single request, with instrumentation
/// (logs + timing) and an optional deadline.
///
/// No retries: a rejection is returned as-is. A missed deadline is reported as
/// `DomainError::Timeout`. The deadline cannot interrupt a driver that blocks
/// the runtime thread (embedded engines); it only bounds awaited I/O.
#[instrument(skip(connector, script), fields(engine = connector.engine_name(), script.len = script.len()))]
pub async fn execute_script(
    connector: &dyn Connector,
    script: &str,
    timeout: Option<Duration>,
) -> Result<Box<dyn ResultCursor>, SqlRunError> {
    let start = Instant::now();
    debug!("⚡ Executing script");

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, connector.execute(script)).await {
            Ok(res) => res,
            Err(_elapsed) => Err(DomainError::Timeout(limit).into()),
        },
        None => connector.execute(script).await,
    };

    let duration = start.elapsed();

    match result {
        Ok(cursor) => {
            debug!("✅ Script accepted in {:.2?}", duration);
            Ok(cursor)
        }
        Err(e) => {
            // Logged here for the timing context, propagated to the caller.
            error!("❌ Script failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}

/// Ad-hoc query: execute, then materialize every result set.
pub async fn execute_query(
    connector: &dyn Connector,
    query: &str,
) -> Result<Vec<ResultSet>, SqlRunError> {
    let mut cursor = execute_script(connector, query, None).await?;
    Materializer::drain(cursor.as_mut())
}
