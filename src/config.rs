use crate::error::{MultilangError, Result};
use anyhow::Context;
use std::collections::HashSet;

/// What to do when two index documents relocate onto the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Keep the later entry in iteration order and log a warning.
    #[default]
    LastWriteWins,
    /// Abort the run with `DestinationCollision`.
    Error,
}

impl CollisionPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "last-write-wins" | "last_write_wins" | "warn" => Some(Self::LastWriteWins),
            "error" | "strict" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub default_locale: String,

    /// Ordered locale codes; the order drives `alt_files` and the locale index.
    pub locales: Vec<String>,

    pub on_collision: CollisionPolicy,
}

impl Config {
    /// Build a validated configuration.
    ///
    /// Fails with `InvalidConfig` if `locales` is empty, contains an empty or
    /// duplicated code, or does not include `default_locale`.
    pub fn new<S: Into<String>>(default_locale: impl Into<String>, locales: Vec<S>) -> Result<Self> {
        let default_locale = default_locale.into();
        let locales: Vec<String> = locales.into_iter().map(Into::into).collect();

        if locales.is_empty() {
            return Err(MultilangError::InvalidConfig(
                "at least one locale is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for locale in &locales {
            if locale.is_empty() {
                return Err(MultilangError::InvalidConfig(
                    "locale codes must not be empty".to_string(),
                ));
            }
            if !seen.insert(locale.as_str()) {
                return Err(MultilangError::InvalidConfig(format!(
                    "duplicate locale '{}'",
                    locale
                )));
            }
        }

        if !locales.contains(&default_locale) {
            return Err(MultilangError::InvalidConfig(format!(
                "default locale '{}' is not one of {:?}",
                default_locale, locales
            )));
        }

        Ok(Self {
            default_locale,
            locales,
            on_collision: CollisionPolicy::default(),
        })
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.on_collision = policy;
        self
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let default_locale = std::env::var("MULTILANG_DEFAULT_LOCALE")
            .context("MULTILANG_DEFAULT_LOCALE not set")?;
        let locales: Vec<String> = std::env::var("MULTILANG_LOCALES")
            .context("MULTILANG_LOCALES not set")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let on_collision = match std::env::var("MULTILANG_ON_COLLISION") {
            Ok(value) => CollisionPolicy::parse(&value)
                .with_context(|| format!("Invalid MULTILANG_ON_COLLISION: '{}'", value))?,
            Err(_) => CollisionPolicy::default(),
        };

        let config = Self::new(default_locale, locales)
            .context("Invalid locale configuration")?
            .with_collision_policy(on_collision);

        Ok(config)
    }

    pub fn is_default(&self, locale: &str) -> bool {
        self.default_locale == locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // ==================== Validation Tests ====================

    #[test]
    fn test_new_valid() {
        let config = Config::new("en", vec!["en", "es"]).expect("valid config");
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.locales, vec!["en", "es"]);
        assert_eq!(config.on_collision, CollisionPolicy::LastWriteWins);
        assert!(config.is_default("en"));
        assert!(!config.is_default("es"));
    }

    #[test]
    fn test_new_rejects_empty_locales() {
        let result = Config::new("en", Vec::<String>::new());
        assert!(matches!(result, Err(MultilangError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_rejects_missing_default() {
        let result = Config::new("fr", vec!["en", "es"]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let result = Config::new("en", vec!["en", "es", "en"]);
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_new_rejects_empty_code() {
        let result = Config::new("en", vec!["en", ""]);
        assert!(result.is_err());
    }

    #[test]
    fn test_collision_policy_parse() {
        assert_eq!(
            CollisionPolicy::parse("last-write-wins"),
            Some(CollisionPolicy::LastWriteWins)
        );
        assert_eq!(CollisionPolicy::parse(" ERROR "), Some(CollisionPolicy::Error));
        assert_eq!(CollisionPolicy::parse("panic"), None);
    }

    // ==================== Environment Tests ====================

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("MULTILANG_DEFAULT_LOCALE", "es");
        std::env::set_var("MULTILANG_LOCALES", "ca, es ,en");
        std::env::set_var("MULTILANG_ON_COLLISION", "error");

        let config = Config::from_env().expect("config from env");
        assert_eq!(config.default_locale, "es");
        assert_eq!(config.locales, vec!["ca", "es", "en"]);
        assert_eq!(config.on_collision, CollisionPolicy::Error);

        std::env::remove_var("MULTILANG_DEFAULT_LOCALE");
        std::env::remove_var("MULTILANG_LOCALES");
        std::env::remove_var("MULTILANG_ON_COLLISION");
    }

    #[test]
    #[serial]
    fn test_from_env_missing_default() {
        std::env::remove_var("MULTILANG_DEFAULT_LOCALE");
        std::env::set_var("MULTILANG_LOCALES", "en,es");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("MULTILANG_DEFAULT_LOCALE"));

        std::env::remove_var("MULTILANG_LOCALES");
    }

    #[test]
    #[serial]
    fn test_from_env_bad_policy() {
        std::env::set_var("MULTILANG_DEFAULT_LOCALE", "en");
        std::env::set_var("MULTILANG_LOCALES", "en");
        std::env::set_var("MULTILANG_ON_COLLISION", "sometimes");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("MULTILANG_ON_COLLISION"));

        std::env::remove_var("MULTILANG_DEFAULT_LOCALE");
        std::env::remove_var("MULTILANG_LOCALES");
        std::env::remove_var("MULTILANG_ON_COLLISION");
    }
}
