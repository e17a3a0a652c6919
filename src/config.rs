use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_API_BASE: &str = "https://api.sleeper.app/v1";
pub const DEFAULT_TIERS_BASE: &str = "https://s3-us-west-1.amazonaws.com/fftiers/out";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub tiers_base: String,
    pub sport: String,
    pub players_max_age_hours: u64,
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
    pub proxy_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let cache_dir = default_cache_dir();
        Config {
            api_base: DEFAULT_API_BASE.to_string(),
            tiers_base: DEFAULT_TIERS_BASE.to_string(),
            sport: "nfl".to_string(),
            players_max_age_hours: 24,
            log_dir: cache_dir.join("logs"),
            cache_dir,
            proxy_port: 5001,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let cache_dir = env::var("SLEEPER_TIERS_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);
        let log_dir = env::var("SLEEPER_TIERS_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| cache_dir.join("logs"));

        Ok(Config {
            api_base: trimmed_var("SLEEPER_API_BASE").unwrap_or(defaults.api_base),
            tiers_base: trimmed_var("TIERS_BASE_URL").unwrap_or(defaults.tiers_base),
            sport: env::var("SLEEPER_SPORT").unwrap_or(defaults.sport),
            players_max_age_hours: parsed_var(
                "PLAYERS_MAX_AGE_HOURS",
                defaults.players_max_age_hours,
            )?,
            cache_dir,
            log_dir,
            proxy_port: parsed_var("PROXY_PORT", defaults.proxy_port)?,
        })
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sleeper_tiers")
}

// Base URLs are joined with "/" later, so a trailing slash would double up.
fn trimmed_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim_end_matches('/').to_string())
}

fn parsed_var<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(format!("{} has an invalid value: {:?}", key, raw))
        }),
        Err(_) => Ok(default),
    }
}
