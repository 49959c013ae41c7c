//! Process-wide plumbing for the Glow catalog service: the application
//! context owning every component, logging, signal handling and shutdown.
mod logger;

pub use glow_error::{GlowError, GlowResult};

use glow_models::{
    constants::{DATA_DIR, LOG_DIR},
    settings::Settings,
    DbManager, WebServer,
};
use logger::Logger;
use once_cell::sync::OnceCell;
use std::{
    future::Future,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
#[cfg(windows)]
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{info, instrument, span, warn, Level};

static APP_CONTEXT: OnceCell<RwLock<GlowAppContext>> = OnceCell::new();

pub struct GlowAppContext {
    /// Global settings
    settings: Option<Settings>,
    /// Global logger
    logger: Logger,
    /// Database manager
    db_manager: Option<Arc<dyn DbManager>>,
    /// Web server, absent for maintenance commands
    web_server: Option<Arc<dyn WebServer>>,
    /// Flag to prevent duplicate shutdowns
    shutting_down: AtomicBool,
    /// Shutdown token
    shutdown_token: CancellationToken,
}

impl GlowAppContext {
    #[inline]
    pub async fn instance() -> GlowResult<RwLockReadGuard<'static, GlowAppContext>> {
        let ctx = APP_CONTEXT
            .get()
            .ok_or(GlowError::from("GlowAppContext is not initialized"))?;
        Ok(ctx.read().await)
    }

    /// Initializes the global context for serving: logger, settings,
    /// database (migrated and seeded) and the web server.
    ///
    /// # Arguments
    /// * `config` - Path of the configuration file; a missing file means defaults
    pub async fn init<D, W>(config: String) -> GlowResult<()>
    where
        D: DbManager + 'static,
        W: WebServer + 'static,
    {
        let mut ctx = Self::build::<D>(config).await?;
        ctx.init_web_server::<W>().await?;
        Self::install(ctx)
    }

    /// Initializes the global context without a web server, for one-shot
    /// maintenance commands.
    pub async fn bootstrap<D>(config: String) -> GlowResult<()>
    where
        D: DbManager + 'static,
    {
        let ctx = Self::build::<D>(config).await?;
        Self::install(ctx)
    }

    async fn build<D: DbManager + 'static>(config: String) -> GlowResult<GlowAppContext> {
        // Relative paths in the settings resolve against the runtime dir, so it
        // is applied before the file logger opens ./logs.
        let settings = Settings::new(config)?;
        apply_runtime_dir(&settings.general.runtime_dir)?;

        let mut logger = Logger::new(Some(settings.general.level()));
        logger.initialize()?;

        let span = span!(Level::INFO, "init-app");
        let _guard = span.enter();

        ensure_runtime_directories(&settings)?;

        let mut ctx = GlowAppContext {
            settings: Some(settings),
            logger,
            db_manager: None,
            web_server: None,
            shutting_down: AtomicBool::new(false),
            shutdown_token: CancellationToken::new(),
        };
        ctx.init_db_manager::<D>().await?;
        Ok(ctx)
    }

    fn install(ctx: GlowAppContext) -> GlowResult<()> {
        APP_CONTEXT
            .set(RwLock::new(ctx))
            .map_err(|_| GlowError::from("Failed to set GlowAppContext"))
    }

    async fn init_db_manager<D: DbManager + 'static>(&mut self) -> GlowResult<()> {
        self.db_manager = Some(D::init(self.settings()?).await?);
        info!("Database initialized successfully.");
        Ok(())
    }

    async fn init_web_server<W: WebServer + 'static>(&mut self) -> GlowResult<()> {
        self.web_server = Some(W::init(self.settings()?, self.db_manager()?).await?);
        info!("Web server initialized successfully.");
        Ok(())
    }

    #[inline]
    /// Gets a reference to the settings
    pub fn settings(&self) -> GlowResult<&Settings> {
        self.settings
            .as_ref()
            .ok_or(GlowError::from("Settings not initialized"))
    }

    #[inline]
    /// Gets a reference to the database manager
    pub fn db_manager(&self) -> GlowResult<Arc<dyn DbManager>> {
        self.db_manager
            .as_ref()
            .ok_or(GlowError::from("Database manager not initialized"))
            .map(Arc::clone)
    }

    #[inline]
    pub fn change_log_level(&self, level: Level) {
        self.logger.set_level(level);
        info!("Log level set to {level}");
    }

    /// Makes a pending [`run`](Self::run) return without waiting for a signal
    #[inline]
    pub fn request_shutdown(&self) {
        self.shutdown_token.cancel();
    }

    /// Waits for a termination signal, then shuts every component down.
    pub async fn run(&self) -> GlowResult<()> {
        self.listen_for_shutdown(async { self.graceful_shutdown().await })
            .await
    }

    async fn listen_for_shutdown<F>(&self, shutdown_fn: F) -> GlowResult<()>
    where
        F: Future<Output = GlowResult<()>>,
    {
        let shutdown_token = self.shutdown_token.clone();

        #[cfg(unix)]
        {
            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sighup = signal(SignalKind::hangup())?;
            let mut sigquit = signal(SignalKind::quit())?;

            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT signal");
                }
                _ = sighup.recv() => {
                    info!("Received SIGHUP signal");
                }
                _ = sigquit.recv() => {
                    info!("Received SIGQUIT signal");
                }
                _ = shutdown_token.cancelled() => {}
            }
        }

        #[cfg(windows)]
        {
            tokio::select! {
                _ = ctrl_c() => {
                    info!("Received ctrl-c signal");
                }
                _ = shutdown_token.cancelled() => {}
            }
        }

        shutdown_fn.await
    }

    #[inline]
    #[instrument(name = "graceful-shutdown", skip_all)]
    /// Stops the web server and closes the database; repeated calls are no-ops
    pub async fn graceful_shutdown(&self) -> GlowResult<()> {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        info!("Starting graceful shutdown...");

        // Stop accepting requests before the pool goes away
        if let Some(web_server) = &self.web_server {
            web_server.stop().await?;
        }

        let tracker = TaskTracker::new();
        if let Some(db_manager) = &self.db_manager {
            let db_manager = Arc::clone(db_manager);
            tracker.spawn(async move {
                if let Err(e) = db_manager.close().await {
                    warn!("Failed to close database: {e}");
                }
            });
        }

        info!("Waiting for all components to shutdown gracefully...");
        tracker.close();
        tracker.wait().await;

        info!("Graceful shutdown completed successfully");
        Ok(())
    }
}

/// Switches the process working directory to the configured runtime root.
fn apply_runtime_dir(runtime_dir: &str) -> GlowResult<()> {
    let dir = runtime_dir.trim();
    if dir.is_empty() || dir == "." {
        return Ok(());
    }

    std::fs::create_dir_all(dir)
        .map_err(|e| GlowError::from(format!("Failed to create runtime_dir {dir}: {e}")))?;

    std::env::set_current_dir(dir).map_err(|e| {
        GlowError::from(format!("Failed to set current_dir to runtime_dir {dir}: {e}"))
    })?;

    Ok(())
}

/// Creates the data, log and upload directories; safe to call repeatedly.
fn ensure_runtime_directories(settings: &Settings) -> GlowResult<()> {
    let dirs: [PathBuf; 3] = [
        Path::new(DATA_DIR).to_path_buf(),
        Path::new(LOG_DIR).to_path_buf(),
        settings.storage.public_root_path(),
    ];

    for dir in dirs {
        std::fs::create_dir_all(&dir).map_err(|e| {
            GlowError::from(format!("Failed to create directory {}: {e}", dir.display()))
        })?;
    }

    Ok(())
}
