use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use chrono::Duration;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/billetterie";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(StoreBackend::Postgres),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub session_ttl: Duration,
    pub allowed_origins: Vec<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            lookup(key).and_then(|v| v.trim().parse().ok())
        }

        let store_backend = match lookup("DATA_STORE") {
            None => StoreBackend::Postgres,
            Some(value) => StoreBackend::parse(&value).unwrap_or_else(|| {
                tracing::warn!("Unknown DATA_STORE '{}', using postgres", value);
                StoreBackend::Postgres
            }),
        };

        let session_ttl = match lookup("SESSION_TTL_HOURS") {
            None => Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .and_then(Duration::try_hours)
                .unwrap_or_else(|| {
                    tracing::warn!(
                        "Invalid SESSION_TTL_HOURS '{}', using {}",
                        value,
                        DEFAULT_SESSION_TTL_HOURS
                    );
                    Duration::hours(DEFAULT_SESSION_TTL_HOURS)
                }),
        };

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            store_backend,
            max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS").unwrap_or(DEFAULT_MAX_CONNECTIONS),
            host: parsed(&lookup, "HOST").unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: parsed(&lookup, "PORT").unwrap_or(DEFAULT_PORT),
            session_ttl,
            allowed_origins,
            production: lookup("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
