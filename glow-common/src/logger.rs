use glow_error::{GlowError, GlowResult};
use glow_models::constants::LOG_DIR;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{subscriber::set_global_default, Level};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    filter::DynFilterFn,
    fmt::{self},
    layer::SubscriberExt,
    Layer, Registry,
};

const LOG_FILE_NAME: &str = "glow.log";

/// Console plus daily rolling file logger sharing one adjustable level
pub struct Logger {
    level: Arc<Mutex<Level>>,
    _file_guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn new(level: Option<Level>) -> Self {
        Logger {
            level: Arc::new(Mutex::new(level.unwrap_or(Level::INFO))),
            _file_guard: None,
        }
    }

    /// Sets the new logging level for both outputs.
    #[inline]
    pub fn set_level(&self, new_level: Level) {
        let mut level = self.level.lock().unwrap_or_else(PoisonError::into_inner);
        *level = new_level;
    }

    /// Installs the global subscriber: console output and `logs/glow.log`
    /// rolled daily, both filtered by the shared level.
    pub fn initialize(&mut self) -> GlowResult<()> {
        let file_appender = rolling::daily(LOG_DIR, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        self._file_guard = Some(guard);

        let console_filter = {
            let level = Arc::clone(&self.level);
            DynFilterFn::new(move |metadata, _| {
                metadata.level() <= &*level.lock().unwrap_or_else(PoisonError::into_inner)
            })
        };
        let file_filter = {
            let level = Arc::clone(&self.level);
            DynFilterFn::new(move |metadata, _| {
                metadata.level() <= &*level.lock().unwrap_or_else(PoisonError::into_inner)
            })
        };

        let console_layer = {
            #[cfg(debug_assertions)]
            let layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stdout)
                .with_file(true)
                .with_line_number(true);

            #[cfg(not(debug_assertions))]
            let layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_file(false)
                .with_line_number(false);

            layer.with_filter(console_filter)
        };

        let file_layer = {
            #[cfg(debug_assertions)]
            let layer = fmt::layer()
                .pretty()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true);

            #[cfg(not(debug_assertions))]
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(false)
                .with_line_number(false);

            layer.with_filter(file_filter)
        };

        let subscriber = Registry::default().with(console_layer).with(file_layer);
        set_global_default(subscriber).map_err(|_| GlowError::from("Failed to set logger"))?;
        Ok(())
    }
}
