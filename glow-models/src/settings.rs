use config::{Config, Environment, File};
use glow_error::GlowResult;
use serde::{self, Deserialize};
use std::{ops::Deref, path::PathBuf, sync::Arc};
use sysinfo::System;
use tracing::Level;

use crate::constants::{DATA_DIR, ENV_PREFIX};

#[derive(Debug, Clone)]
pub struct Settings(Arc<Inner>);

impl Deref for Settings {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self(Arc::new(Inner::default()))
    }
}

impl From<Inner> for Settings {
    fn from(inner: Inner) -> Self {
        Self(Arc::new(inner))
    }
}

impl Settings {
    pub fn new(config_path: String) -> GlowResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(config_path.as_str()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("web.cors.origins"),
            );
        let inner: Inner = builder.build()?.try_deserialize()?;
        Ok(Self(Arc::new(inner)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inner {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub db: Db,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub catalog: Catalog,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    /// Runtime root directory; relative paths (`./data`, `./logs`) resolve from here.
    ///
    /// Override with `GLOW_GENERAL__RUNTIME_DIR=/var/lib/glow`.
    #[serde(default = "General::runtime_dir_default")]
    pub runtime_dir: String,
    /// Initial log level: `trace`, `debug`, `info`, `warn` or `error`
    #[serde(default = "General::log_level_default")]
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            runtime_dir: General::runtime_dir_default(),
            log_level: General::log_level_default(),
        }
    }
}

impl General {
    fn runtime_dir_default() -> String {
        ".".into()
    }

    fn log_level_default() -> String {
        "info".into()
    }

    /// Parsed log level, `INFO` when the configured value is unknown
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Web {
    /// Scope all catalog routes are mounted under; empty mounts them at the root
    #[serde(default = "Web::router_prefix_default")]
    pub router_prefix: String,
    #[serde(default = "Web::host_default")]
    pub host: String,
    #[serde(default = "Web::port_default")]
    pub port: u16,
    #[serde(default = "Web::workers_default")]
    pub workers: i32,
    #[serde(default)]
    pub cors: Cors,
    #[serde(default)]
    pub jwt: Jwt,
}

impl Default for Web {
    fn default() -> Self {
        Web {
            router_prefix: Web::router_prefix_default(),
            host: Web::host_default(),
            port: Web::port_default(),
            workers: Web::workers_default(),
            cors: Default::default(),
            jwt: Default::default(),
        }
    }
}

impl Web {
    fn router_prefix_default() -> String {
        "".into()
    }

    fn port_default() -> u16 {
        8000
    }

    fn host_default() -> String {
        "0.0.0.0".into()
    }

    fn workers_default() -> i32 {
        0
    }

    /// Actual worker count: 0 means one per CPU, negative divides the CPU count
    pub fn get_worker_count(&self) -> usize {
        match self.workers {
            0 => System::new_all().cpus().len().max(1),
            n if n > 0 => n as usize,
            n => std::cmp::max(
                1,
                (System::new_all().cpus().len() as i32 / n.abs()) as usize,
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cors {
    #[serde(default)]
    pub mode: CorsMode,
    /// Allowed origins in `whitelist` mode
    #[serde(default)]
    pub origins: Vec<String>,
    #[serde(default = "Cors::max_age_default")]
    pub max_age: usize,
}

impl Default for Cors {
    fn default() -> Self {
        Cors {
            mode: Default::default(),
            origins: Vec::new(),
            max_age: Cors::max_age_default(),
        }
    }
}

impl Cors {
    fn max_age_default() -> usize {
        3600
    }
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorsMode {
    #[default]
    AllowAll,
    Whitelist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Jwt {
    #[serde(default = "Jwt::secret_default")]
    pub secret: String,
    /// Token lifetime in seconds
    #[serde(default = "Jwt::expire_default")]
    pub expire: i64,
    #[serde(default = "Jwt::issuer_default")]
    pub issuer: String,
}

impl Default for Jwt {
    fn default() -> Self {
        Jwt {
            secret: Jwt::secret_default(),
            expire: Jwt::expire_default(),
            issuer: Jwt::issuer_default(),
        }
    }
}

impl Jwt {
    fn secret_default() -> String {
        "glow-catalog".into()
    }

    fn expire_default() -> i64 {
        7 * 24 * 3600
    }

    fn issuer_default() -> String {
        "glow".into()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Db {
    #[serde(default)]
    pub sqlite: Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sqlite {
    /// Database file name under `./data`, or `:memory:`
    #[serde(default = "Sqlite::path_default")]
    pub path: String,
    #[serde(default = "Sqlite::timeout_default")]
    pub timeout: u64,
    #[serde(default = "Sqlite::idle_timeout_default")]
    pub idle_timeout: u64,
    #[serde(default = "Sqlite::max_lifetime_default")]
    pub max_lifetime: u64,
    #[serde(default = "Sqlite::max_connections_default")]
    pub max_connections: u32,
    #[serde(default = "Sqlite::auto_create_default")]
    pub auto_create: bool,
}

impl Default for Sqlite {
    fn default() -> Self {
        Sqlite {
            path: Sqlite::path_default(),
            timeout: Sqlite::timeout_default(),
            idle_timeout: Sqlite::idle_timeout_default(),
            max_lifetime: Sqlite::max_lifetime_default(),
            max_connections: Sqlite::max_connections_default(),
            auto_create: Sqlite::auto_create_default(),
        }
    }
}

impl Sqlite {
    fn path_default() -> String {
        "glow.db".into()
    }

    fn timeout_default() -> u64 {
        5000
    }

    fn idle_timeout_default() -> u64 {
        60000
    }

    fn max_lifetime_default() -> u64 {
        1_800_000
    }

    fn max_connections_default() -> u32 {
        16
    }

    fn auto_create_default() -> bool {
        true
    }

    /// In-memory database, every pooled connection would see its own copy
    #[inline]
    pub fn is_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// Connection URL; `mode=rwc` creates the file when missing
    pub fn to_url(&self) -> String {
        if self.is_memory() {
            "sqlite::memory:".into()
        } else if self.auto_create {
            format!("sqlite:{}/{}?mode=rwc", DATA_DIR, self.path)
        } else {
            format!("sqlite:{}/{}", DATA_DIR, self.path)
        }
    }

    pub fn db_dir(&self) -> String {
        DATA_DIR.into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    /// Directory uploaded files are written to
    #[serde(default = "Storage::public_root_default")]
    pub public_root: String,
    /// URL prefix stored in records and used to serve files
    #[serde(default = "Storage::url_prefix_default")]
    pub url_prefix: String,
    #[serde(default = "Storage::max_upload_bytes_default")]
    pub max_upload_bytes: usize,
    /// Serve `public_root` under `url_prefix`
    #[serde(default = "Storage::serve_default")]
    pub serve: bool,
}

impl Default for Storage {
    fn default() -> Self {
        Storage {
            public_root: Storage::public_root_default(),
            url_prefix: Storage::url_prefix_default(),
            max_upload_bytes: Storage::max_upload_bytes_default(),
            serve: Storage::serve_default(),
        }
    }
}

impl Storage {
    fn public_root_default() -> String {
        format!("{DATA_DIR}/public")
    }

    fn url_prefix_default() -> String {
        "/storage".into()
    }

    fn max_upload_bytes_default() -> usize {
        5 * 1024 * 1024
    }

    fn serve_default() -> bool {
        true
    }

    pub fn public_root_path(&self) -> PathBuf {
        PathBuf::from(&self.public_root)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Stock at or below this (and above zero) counts as low
    #[serde(default = "Catalog::low_stock_threshold_default")]
    pub low_stock_threshold: i32,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            low_stock_threshold: Catalog::low_stock_threshold_default(),
        }
    }
}

impl Catalog {
    fn low_stock_threshold_default() -> i32 {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.web.port, 8000);
        assert_eq!(settings.web.router_prefix, "");
        assert_eq!(settings.storage.url_prefix, "/storage");
        assert_eq!(settings.catalog.low_stock_threshold, 5);
        assert_eq!(settings.db.sqlite.to_url(), "sqlite:./data/glow.db?mode=rwc");
        assert_eq!(settings.general.level(), Level::INFO);
    }

    #[test]
    fn test_memory_url() {
        let sqlite = Sqlite {
            path: ":memory:".into(),
            ..Default::default()
        };
        assert!(sqlite.is_memory());
        assert_eq!(sqlite.to_url(), "sqlite::memory:");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::new("does-not-exist.toml".into()).unwrap();
        assert_eq!(settings.web.host, "0.0.0.0");
        assert_eq!(settings.web.jwt.issuer, "glow");
    }
}
