use std::{env, process};

use thiserror::Error;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MONGO_DB: &str = "urlshortener";
const DEFAULT_MONGO_COLLECTION: &str = "urls";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required but not set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub mongo_collection: String,
    /// Prefix for links handed back when the URL was already registered.
    pub base_url: String,
    /// Prefix for freshly created links and for per-user listings.
    pub redirect_url: String,
}

impl Config {
    /// Reads the process environment, exiting if anything required is missing.
    pub fn load() -> Self {
        match Self::from_lookup(|var| env::var(var).ok()) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "invalid configuration");
                process::exit(1);
            }
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: e.to_string(),
            })?,
            None => {
                tracing::warn!(
                    "PORT environment variable not set, using default: {}",
                    DEFAULT_PORT
                );
                DEFAULT_PORT
            }
        };

        let mongo_uri = get_env(&lookup, "MONGO_URI")?;
        let mongo_db = get_env_or(&lookup, "MONGO_DB", DEFAULT_MONGO_DB);
        let mongo_collection = get_env_or(&lookup, "MONGO_COLLECTION", DEFAULT_MONGO_COLLECTION);
        let base_url = get_url(&lookup, "BASE_URL")?;
        let redirect_url = get_url(&lookup, "REDIRECT_URL")?;

        Ok(Self {
            port,
            mongo_uri,
            mongo_db,
            mongo_collection,
            base_url,
            redirect_url,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn get_env<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn get_env_or<F>(lookup: &F, var: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).unwrap_or_else(|| {
        tracing::warn!(
            "{} environment variable not set, using default: {}",
            var,
            default
        );
        default.to_string()
    })
}

// The value is kept verbatim; links are built by plain concatenation.
fn get_url<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = get_env(lookup, var)?;
    url::Url::parse(&value).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("MONGO_URI", "mongodb://localhost:27017"),
        ("BASE_URL", "https://sho.rt"),
        ("REDIRECT_URL", "https://go.sho.rt/"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.mongo_db, "urlshortener");
        assert_eq!(config.mongo_collection, "urls");
        assert_eq!(config.listen_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn base_urls_are_kept_verbatim() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.base_url, "https://sho.rt");
        assert_eq!(config.redirect_url, "https://go.sho.rt/");
    }

    #[test]
    fn missing_mongo_uri_is_fatal() {
        let err = Config::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("MONGO_URI"));
    }

    #[test]
    fn missing_redirect_url_is_fatal() {
        let err = Config::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("REDIRECT_URL"));
    }

    #[test]
    fn blank_required_var_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("BASE_URL", "  ");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("BASE_URL"));
    }

    #[test]
    fn rejects_unparseable_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "http"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn rejects_relative_base_url() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("BASE_URL", "sho.rt/");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BASE_URL", .. }));
    }

    #[test]
    fn honours_explicit_port_and_database() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "8080"));
        pairs.push(("MONGO_DB", "links"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.mongo_db, "links");
    }
}
