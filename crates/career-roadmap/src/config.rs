use std::path::PathBuf;

use crate::error::AppError;

const DEFAULT_CATALOG_PATH: &str = "data/careers.json";
const DEFAULT_PROGRESS_PATH: &str = "progress_data.json";
const DEFAULT_TOP_K: usize = 3;

/// Application configuration loaded from environment variables.
///
/// Every setting has a default, so the server starts with an empty environment.
/// Redis URL is optional; if absent, catalog vectors are recomputed on every ranking.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON array of career records, read once at startup.
    pub catalog_path: PathBuf,
    /// JSON object mapping career name to saved task statuses.
    pub progress_path: PathBuf,
    /// Number of matches returned per ranking request.
    pub top_k: usize,
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables caching.
    pub redis_url: Option<String>,
    /// When set, serve MCP over TCP on this address instead of stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `CAREER_CATALOG_PATH` (default: "data/careers.json")
    /// - `CAREER_PROGRESS_PATH` (default: "progress_data.json")
    /// - `CAREER_TOP_K` (default: 3)
    /// - `REDIS_URL`
    /// - `MCP_TCP_LISTEN_ADDR`
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let catalog_path: PathBuf = lookup("CAREER_CATALOG_PATH")
            .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string())
            .into();
        let progress_path: PathBuf = lookup("CAREER_PROGRESS_PATH")
            .unwrap_or_else(|| DEFAULT_PROGRESS_PATH.to_string())
            .into();

        let top_k = match lookup("CAREER_TOP_K") {
            None => DEFAULT_TOP_K,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(k) if k > 0 => k,
                _ => {
                    return Err(AppError::Config(format!(
                        "CAREER_TOP_K must be a positive integer, got '{raw}'"
                    )))
                }
            },
        };

        Ok(Self {
            catalog_path,
            progress_path,
            top_k,
            redis_url: lookup("REDIS_URL"),
            tcp_listen_addr: lookup("MCP_TCP_LISTEN_ADDR"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("data/careers.json"));
        assert_eq!(config.progress_path, PathBuf::from("progress_data.json"));
        assert_eq!(config.top_k, 3);
        assert!(config.redis_url.is_none());
        assert!(config.tcp_listen_addr.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("CAREER_CATALOG_PATH", "/srv/careers.json"),
            ("CAREER_PROGRESS_PATH", "/srv/progress.json"),
            ("CAREER_TOP_K", " 5 "),
            ("REDIS_URL", "redis://127.0.0.1:6379"),
        ]))
        .unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("/srv/careers.json"));
        assert_eq!(config.progress_path, PathBuf::from("/srv/progress.json"));
        assert_eq!(config.top_k, 5);
        assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1:6379"));
    }

    #[test]
    fn rejects_zero_and_garbage_top_k() {
        for raw in ["0", "three", "-1"] {
            let err = Config::from_lookup(lookup_from(&[("CAREER_TOP_K", raw)])).unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "accepted {raw}");
        }
    }
}
