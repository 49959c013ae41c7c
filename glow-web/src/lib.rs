//! HTTP API of the Glow catalog service
mod api;
mod form;
mod middleware;
mod validation;

use actix_files::Files;
use actix_web::{
    dev::{Server, ServerHandle},
    error::Error as ActixError,
    middleware::{Compress, Logger, NormalizePath},
    web::{self, Data},
    App, HttpRequest, HttpServer,
};
use actix_web_validator::{Error as ValidatorError, PathConfig, QueryConfig};
use async_trait::async_trait;
use glow_error::{init::InitContextError, web::WebError, GlowError, GlowResult};
use glow_models::{settings::Settings, DbManager, WebServer};
use glow_storage::MediaStore;
use middleware::cors::middleware;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};
use validation::{manager::ValidationManager, prelude::create_default_manager};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub validator: Arc<ValidationManager>,
    pub media: MediaStore,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings, db: DatabaseConnection) -> Self {
        AppState {
            validator: Arc::new(create_default_manager(&db)),
            media: MediaStore::new(&settings.storage),
            db,
            settings,
        }
    }
}

/// Registers the state, the extractor error handlers and every route.
///
/// Shared by the server factory and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig, state: Arc<AppState>) {
    let router_prefix = state.settings.web.router_prefix.clone();
    let storage = state.settings.storage.clone();

    cfg.app_data(Data::new(state))
        .app_data(QueryConfig::default().error_handler(query_error))
        .app_data(PathConfig::default().error_handler(path_error))
        .configure(api::configure_public_routes);

    if storage.serve {
        cfg.service(Files::new(&storage.url_prefix, storage.public_root_path()));
    }

    cfg.service(web::scope(&router_prefix).configure(api::configure_routes));
}

/// Failed field rules become 422, unreadable query strings 400
fn query_error(err: ValidatorError, _req: &HttpRequest) -> ActixError {
    match err {
        ValidatorError::Validate(errors) => WebError::from(errors).into(),
        other => WebError::BadRequest(other.to_string()).into(),
    }
}

/// Path ids that don't parse or validate never name an existing record
fn path_error(err: ValidatorError, _req: &HttpRequest) -> ActixError {
    WebError::NotFound(err.to_string()).into()
}

/// GlowWebServer handles the web server initialization and management
#[derive(Clone)]
pub struct GlowWebServer {
    /// Server handle for graceful shutdown
    server: Arc<Mutex<Option<ServerHandle>>>,
}

impl GlowWebServer {
    /// Create and configure the HTTP server
    async fn create_server(
        settings: &Settings,
        db_manager: Arc<dyn DbManager>,
    ) -> GlowResult<Server> {
        let state = Arc::new(AppState::new(
            settings.clone(),
            db_manager.get_connection()?,
        ));
        if settings.storage.serve {
            tokio::fs::create_dir_all(state.media.root()).await?;
        }

        let addr = format!("{}:{}", settings.web.host, settings.web.port);
        let worker_count = settings.web.get_worker_count();
        let cors_config = settings.web.cors.clone();

        let server = HttpServer::new(move || {
            let state = state.clone();
            App::new()
                .wrap(middleware(&cors_config))
                .wrap(Logger::default())
                .wrap(Compress::default())
                .wrap(NormalizePath::trim())
                .configure(move |cfg| configure(cfg, state))
        })
        .workers(worker_count)
        .bind(&addr)
        .map_err(|e| GlowError::from(format!("Failed to bind HTTP server to {addr}: {e}")))?;

        info!("Listening on http://{addr} with {worker_count} workers");
        Ok(server.run())
    }
}

#[async_trait]
impl WebServer for GlowWebServer {
    #[inline]
    #[instrument(name = "init-web-server", skip_all)]
    /// Initialize and start the web server
    async fn init(
        settings: &Settings,
        db_manager: Arc<dyn DbManager>,
    ) -> GlowResult<Arc<Self>, InitContextError> {
        let server = Self::create_server(settings, db_manager)
            .await
            .map_err(|e| {
                InitContextError::Primitive(format!("Failed to create web server: {e}"))
            })?;
        let server_handle = server.handle();

        tokio::spawn(async move {
            if let Err(e) = server.await {
                error!(error=%e, "Web server failed to start");
            }
        });

        Ok(Arc::new(GlowWebServer {
            server: Arc::new(Mutex::new(Some(server_handle))),
        }))
    }

    #[inline]
    #[instrument(name = "web-server-stop", skip_all)]
    /// Gracefully stop the web server
    async fn stop(&self) -> GlowResult<()> {
        info!("Stopping web server...");
        let mut server_guard = self.server.lock().await;
        if let Some(handle) = server_guard.take() {
            handle.stop(true).await;
        }
        info!("Web server stopped");

        Ok(())
    }
}
