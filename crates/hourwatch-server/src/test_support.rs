use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hourwatch_pipeline::LiveMonitor;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// A pool that never connects; acquiring fails fast against a closed port.
pub(crate) fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy("postgres://hourwatch@127.0.0.1:1/hourwatch")
        .expect("lazy pool")
}

pub(crate) fn test_config() -> hourwatch_core::AppConfig {
    let env: HashMap<&str, &str> =
        HashMap::from([("DATABASE_URL", "postgres://hourwatch@127.0.0.1:1/hourwatch")]);
    hourwatch_core::config::build_app_config(|k| {
        env.get(k)
            .map(|v| (*v).to_string())
            .ok_or(std::env::VarError::NotPresent)
    })
    .expect("config")
}

/// A live monitor with no locations; a cycle touches neither network nor DB.
pub(crate) fn empty_monitor() -> Arc<LiveMonitor> {
    let monitor = hourwatch_pipeline::build_live_monitor(&test_config(), unreachable_pool(), Vec::new())
        .expect("monitor");
    Arc::new(monitor)
}
