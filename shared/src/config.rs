use std::str::FromStr;
use tracing::warn;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub max_sessions: Option<u64>,
    pub secure_cookies: bool,
    pub allowed_origins: Vec<String>,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_DATA_DIR: &str = "./data";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("NOTES_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port: parse_or(&lookup, "NOTES_HTTP_PORT", Self::DEFAULT_HTTP_PORT),
            data_dir: lookup("NOTES_DATA_DIR")
                .unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string()),
            max_sessions: lookup("NOTES_MAX_SESSIONS").and_then(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| warn!("NOTES_MAX_SESSIONS={raw:?} is not a number, sessions are unbounded"))
                    .ok()
            }),
            secure_cookies: parse_or(&lookup, "NOTES_SECURE_COOKIES", false),
            allowed_origins: lookup("NOTES_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("{key}={raw:?} could not be parsed, falling back to {default}");
            default
        }),
        None => default,
    }
}
