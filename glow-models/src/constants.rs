// Constants shared across the glow crates

use rust_decimal::Decimal;

/// Configuration file looked up when neither `--config` nor `GLOW_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "glow.toml";

/// Prefix of environment variables overriding configuration keys.
pub const ENV_PREFIX: &str = "GLOW";

pub const BEARER_TOKEN: &str = "Bearer";

/// Runtime-relative directory holding the database and uploaded media.
pub const DATA_DIR: &str = "./data";

/// Runtime-relative directory for rolling log files.
pub const LOG_DIR: &str = "./logs";

/// Length of generated file names for uploaded media, extension excluded.
pub const MEDIA_FILE_NAME_LEN: usize = 40;

pub const CATEGORY_MEDIA_NAMESPACE: &str = "categories";
pub const PRODUCT_MEDIA_NAMESPACE: &str = "products";

/// Field carrying the method override on multipart updates.
pub const METHOD_OVERRIDE_FIELD: &str = "_method";
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// Largest price a `decimal(10, 2)` column holds, `99999999.99`.
pub const MAX_PRICE: Decimal = Decimal::from_parts(0x540B_E3FF, 0x2, 0, false, 2);
