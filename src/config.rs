//! Process configuration, read once at startup and passed in by value.

use std::net::SocketAddr;

use crate::error::ConfigError;

/// Default close-chats window in hours when `CHAT_CLOSE_AFTER_HOURS` is unset.
const DEFAULT_CLOSE_AFTER_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb_url: String,
    pub db_name: String,
    /// Collections the admin browser may touch, in listing order.
    pub allowed_collections: Vec<String>,
    pub bind_addr: SocketAddr,
    pub chat_close_after_hours: i64,
}

impl Config {
    /// Reads the environment. Nothing here re-reads env vars after startup;
    /// handlers only ever see the resulting value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mongodb_url = env_or("MONGODB_URL", "mongodb://localhost:27017");
        let db_name = env_or("DB_NAME", "confide");
        let allowed_collections =
            split_csv(&std::env::var("ALLOWED_COLLECTIONS").unwrap_or_default());
        let bind_addr = env_or("BIND_ADDR", "0.0.0.0:3000")
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;
        let chat_close_after_hours = match std::env::var("CHAT_CLOSE_AFTER_HOURS") {
            Ok(raw) if !raw.trim().is_empty() => {
                raw.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                        name: "CHAT_CLOSE_AFTER_HOURS",
                        reason: e.to_string(),
                    })?
            }
            _ => DEFAULT_CLOSE_AFTER_HOURS,
        };
        Ok(Config {
            mongodb_url,
            db_name,
            allowed_collections,
            bind_addr,
            chat_close_after_hours,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
/// Order is preserved; it is the order the admin UI shows collections in.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_keeps_order() {
        assert_eq!(
            split_csv("users, chats ,messages"),
            vec!["users", "chats", "messages"]
        );
    }

    #[test]
    fn split_csv_drops_empty_segments() {
        assert_eq!(split_csv("users,,chats,"), vec!["users", "chats"]);
        assert_eq!(split_csv(" , "), Vec::<String>::new());
    }

    #[test]
    fn split_csv_of_empty_string_is_empty() {
        assert_eq!(split_csv(""), Vec::<String>::new());
    }
}
