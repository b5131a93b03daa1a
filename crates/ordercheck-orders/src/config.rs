//! Configuration of the order rule sets.
//!
//! Values come from `ORDERCHECK_`-prefixed environment variables, optionally
//! seeded from a `.env` file:
//!
//! ```text
//! ORDERCHECK_ALLOWED_EMAIL_DOMAINS=example.com,mycompany.com
//! ```

use serde::{Deserialize, Serialize};

/// Prefix of every environment variable read by [`OrderRulesConfig::from_env`].
pub const ENV_PREFIX: &str = "ORDERCHECK_";

/// Error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),
    /// The email domain allow-list has no entries.
    #[error("allowed email domain list must not be empty")]
    EmptyAllowList,
}

fn default_allowed_email_domains() -> Vec<String> {
    vec!["example.com".to_string(), "mycompany.com".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRulesConfig {
    /// Domains a customer email may belong to.
    #[serde(default = "default_allowed_email_domains")]
    pub allowed_email_domains: Vec<String>,
}

impl Default for OrderRulesConfig {
    fn default() -> Self {
        Self {
            allowed_email_domains: default_allowed_email_domains(),
        }
    }
}

impl OrderRulesConfig {
    /// Load from the process environment after reading `.env` if present.
    ///
    /// Existing environment variables take precedence over `.env` values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config = envy::prefixed(ENV_PREFIX).from_env::<Self>()?;
        config.normalized()
    }

    /// Load from explicit `(KEY, value)` pairs, using the same prefix.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(pairs)?;
        config.normalized()
    }

    /// Trim entries, drop blanks and reject an empty list.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        self.allowed_email_domains = self
            .allowed_email_domains
            .into_iter()
            .map(|domain| domain.trim().to_string())
            .filter(|domain| !domain.is_empty())
            .collect();
        if self.allowed_email_domains.is_empty() {
            return Err(ConfigError::EmptyAllowList);
        }
        Ok(self)
    }
}
