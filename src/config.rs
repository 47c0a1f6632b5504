// Configuration for:
// - Deployment environment (development / production)
// - Database connection string
// - Server listening address/port
// - BlockCypher endpoint, token and outbound throttle
// - Rate limiter window and threshold

use dotenv::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Production => "prod",
        }
    }

    // Unknown values fall back to development, like an unset ENVIRONMENT.
    fn parse(value: &str) -> Self {
        match value {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub debug: bool,
    pub database_url: String,
    pub db_connect_retries: usize,
    pub server_host: String,
    pub server_port: u16,
    pub blockcypher_url: String,
    pub blockcypher_token: Option<String>,
    pub upstream_timeout: Duration,
    pub upstream_rate_limit: Option<u32>,
    pub upstream_max_body_bytes: usize,
    pub rate_limit_max_requests: u64,
    pub rate_limit_window: Duration,
    pub rate_limit_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            debug: true,
            database_url: "sqlite:lookup.db".to_string(),
            db_connect_retries: 5,
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            blockcypher_url: "https://api.blockcypher.com/v1/btc/main".to_string(),
            blockcypher_token: None,
            upstream_timeout: Duration::from_secs(30),
            upstream_rate_limit: None,
            upstream_max_body_bytes: 8 * 1024 * 1024,
            rate_limit_max_requests: 10,
            rate_limit_window: Duration::from_secs(60),
            rate_limit_capacity: 10_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        let environment = env::var("ENVIRONMENT")
            .map(|v| Environment::parse(&v))
            .unwrap_or(defaults.environment);
        let debug = environment == Environment::Development;

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let db_connect_retries = env::var("DB_CONNECT_RETRIES")
            .map(|v| v.parse().unwrap_or(defaults.db_connect_retries))
            .unwrap_or(defaults.db_connect_retries);
        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(defaults.server_port);
        let blockcypher_url = env::var("BLOCKCYPHER_URL").unwrap_or(defaults.blockcypher_url);
        let blockcypher_token = env::var("BLOCKCYPHER_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        let upstream_timeout = env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(defaults.upstream_timeout);
        let upstream_rate_limit = env::var("UPSTREAM_RATE_LIMIT")
            .map(|v| v.parse().ok())
            .unwrap_or(None);
        let upstream_max_body_bytes = env::var("UPSTREAM_MAX_BODY_BYTES")
            .map(|v| v.parse().unwrap_or(defaults.upstream_max_body_bytes))
            .unwrap_or(defaults.upstream_max_body_bytes);
        let rate_limit_max_requests = env::var("RATE_LIMIT_MAX_REQUESTS")
            .map(|v| v.parse().unwrap_or(defaults.rate_limit_max_requests))
            .unwrap_or(defaults.rate_limit_max_requests);
        let rate_limit_window = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(defaults.rate_limit_window);
        let rate_limit_capacity = env::var("RATE_LIMIT_CAPACITY")
            .map(|v| v.parse().unwrap_or(defaults.rate_limit_capacity))
            .unwrap_or(defaults.rate_limit_capacity);

        Self {
            environment,
            debug,
            database_url,
            db_connect_retries,
            server_host,
            server_port,
            blockcypher_url,
            blockcypher_token,
            upstream_timeout,
            upstream_rate_limit,
            upstream_max_body_bytes,
            rate_limit_max_requests,
            rate_limit_window,
            rate_limit_capacity,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
