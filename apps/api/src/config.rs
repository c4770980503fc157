use anyhow::{anyhow, Context, Result};

use crate::render::TemplateId;

const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_MINUTES: i64 = 60;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Template used when a request names none, or an unknown one.
    pub default_template: TemplateId,
    pub max_image_bytes: usize,
    pub session_idle_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            default_template: TemplateId::default(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            session_idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let default_template = match lookup("DEFAULT_TEMPLATE") {
            Some(raw) => raw
                .parse::<TemplateId>()
                .context("DEFAULT_TEMPLATE must be one of modern, classic, creative")?,
            None => defaults.default_template,
        };

        let session_idle_minutes =
            parse_or(&lookup, "SESSION_IDLE_MINUTES", defaults.session_idle_minutes)?;
        if session_idle_minutes <= 0 {
            return Err(anyhow!("SESSION_IDLE_MINUTES must be positive"));
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            default_template,
            max_image_bytes: parse_or(&lookup, "MAX_IMAGE_BYTES", defaults.max_image_bytes)?,
            session_idle_minutes,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_template, TemplateId::Modern);
        assert_eq!(config.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(config.session_idle_minutes, 60);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("DEFAULT_TEMPLATE", "Classic"),
            ("MAX_IMAGE_BYTES", "1048576"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.default_template, TemplateId::Classic);
        assert_eq!(config.max_image_bytes, 1_048_576);
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("DEFAULT_TEMPLATE", "vaporwave")]).is_err());
        assert!(config_from(&[("SESSION_IDLE_MINUTES", "0")]).is_err());
    }
}
