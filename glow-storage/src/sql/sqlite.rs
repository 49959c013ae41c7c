use glow_error::GlowResult;
use glow_models::settings::Sqlite;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};
use std::time::Duration;
use tracing::{info, instrument, log::LevelFilter};

#[instrument(name = "init_sqlite_db", skip_all)]
/// Initialize SQLite database connection with auto-creation support.
/// File databases live under the data directory, which is created when missing.
pub async fn init_db(config: &Sqlite) -> GlowResult<DatabaseConnection> {
    let database_url = config.to_url();

    let mut opts = ConnectOptions::new(&database_url);
    opts.connect_timeout(Duration::from_millis(config.timeout));
    if config.is_memory() {
        // A single long-lived connection keeps the in-memory schema alive
        opts.max_connections(1).min_connections(1);
    } else {
        std::fs::create_dir_all(config.db_dir())?;
        opts.idle_timeout(Duration::from_millis(config.idle_timeout))
            .max_lifetime(Duration::from_millis(config.max_lifetime))
            .max_connections(config.max_connections);
    }

    #[cfg(debug_assertions)]
    {
        opts.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    }
    #[cfg(not(debug_assertions))]
    {
        opts.sqlx_logging(false)
            .sqlx_logging_level(LevelFilter::Off);
    }

    info!(
        "Connecting to SQLite database at: {} (auto_create: {})",
        database_url, config.auto_create
    );

    let db = Database::connect(opts).await?;
    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        "PRAGMA foreign_keys=ON;".to_string(),
    ))
    .await?;
    #[cfg(not(debug_assertions))]
    {
        let _ = db
            .execute(Statement::from_string(
                DbBackend::Sqlite,
                "PRAGMA synchronous=NORMAL;".to_string(),
            ))
            .await;
        let _ = db
            .execute(Statement::from_string(
                DbBackend::Sqlite,
                "PRAGMA temp_store=MEMORY;".to_string(),
            ))
            .await;
    }
    info!("Successfully connected to SQLite database");

    Ok(db)
}
