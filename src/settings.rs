use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_URL: &str = "https://coinmarketcap.com/";
pub const ENV_PREFIX: &str = "CRYPTO_TRACKER";
const DEFAULT_FILE: &str = "crypto_tracker";

/// Run settings. Layered: defaults, then `crypto_tracker.{toml,json,yaml}`
/// (or an explicit file), then `CRYPTO_TRACKER_*` environment variables.
/// Command-line flags are applied on top by the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub url: String,
    /// How many rows from the top of the table to parse.
    pub top: usize,
    pub output: PathBuf,
    pub min_price: Option<f64>,
    /// Page load budget, in seconds.
    pub wait_secs: u64,
    pub user_agent: String,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };

        Config::builder()
            .set_default("url", DEFAULT_URL)?
            .set_default("top", 10)?
            .set_default("output", "crypto_prices.csv")?
            .set_default("wait_secs", 15)?
            .set_default(
                "user_agent",
                concat!("crypto_tracker/", env!("CARGO_PKG_VERSION")),
            )?
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }
}
