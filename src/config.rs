// src/config.rs
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_WELCOME_MESSAGE: &str = "Xin chao! Toi co the giup gi cho ban?";
const DEV_JWT_SECRET: &str = "default_secret";
/// Tokens live at most a year.
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 365;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub seed_default_data: bool,
    pub welcome_message: String,
    pub login_rate_limit: u32,
    pub login_rate_window_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_ttl_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            seed_default_data: true,
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            login_rate_limit: 10,
            login_rate_window_secs: 60,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set. Using an insecure development secret.");
                tracing::info!("Run `cargo run --bin generate_jwt_secret` to create one");
                defaults.jwt_secret
            }
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            jwt_secret,
            jwt_ttl_hours: jwt_ttl_in_range(parse_var("JWT_TTL_HOURS", defaults.jwt_ttl_hours)?)?,
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
            seed_default_data: parse_var("SEED_DEFAULT_DATA", defaults.seed_default_data)?,
            welcome_message: env::var("WELCOME_MESSAGE").unwrap_or(defaults.welcome_message),
            login_rate_limit: parse_var("LOGIN_RATE_LIMIT", defaults.login_rate_limit)?,
            login_rate_window_secs: parse_var(
                "LOGIN_RATE_WINDOW_SECS",
                defaults.login_rate_window_secs,
            )?,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            name: "HOST",
            value: raw,
        })
    }
}

fn jwt_ttl_in_range(hours: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_JWT_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::InvalidValue {
            name: "JWT_TTL_HOURS",
            value: hours.to_string(),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}
