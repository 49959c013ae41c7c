pub mod constants;
pub mod domain;
pub mod entities;
pub mod enums;
mod idens;
pub mod initializer;
pub mod settings;
pub mod web;

use async_trait::async_trait;
use downcast_rs::{impl_downcast, DowncastSync};
use glow_error::{init::InitContextError, storage::StorageError, GlowResult};
use sea_orm::DatabaseConnection;
use settings::Settings;
use std::sync::Arc;

impl_downcast!(sync WebServer);
impl_downcast!(sync DbManager);

/// Database management interface for the catalog service.
///
/// Owns the connection pool, runs migrations on startup and releases
/// connections on shutdown.
#[async_trait]
pub trait DbManager: DowncastSync + Send + Sync + 'static {
    /// Connects to the configured database and applies pending migrations.
    async fn init(settings: &Settings) -> GlowResult<Arc<Self>, InitContextError>
    where
        Self: Sized;

    /// Retrieves a database connection from the connection pool.
    fn get_connection(&self) -> GlowResult<DatabaseConnection, StorageError>;

    /// Gracefully closes all database connections.
    async fn close(&self) -> GlowResult<()>;
}

/// Web server interface for the HTTP API.
#[async_trait]
pub trait WebServer: DowncastSync + Send + Sync + 'static {
    /// Binds the listener and spawns the server.
    ///
    /// # Arguments
    /// * `settings` - The service configuration
    /// * `db_manager` - Source of database connections for request handlers
    async fn init(
        settings: &Settings,
        db_manager: Arc<dyn DbManager>,
    ) -> GlowResult<Arc<Self>, InitContextError>
    where
        Self: Sized;

    /// Gracefully stops the web server.
    async fn stop(&self) -> GlowResult<()>;
}
