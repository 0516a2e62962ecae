//! Scheduler configuration.
//!
//! Settings come from defaults, then environment variables, then CLI flags
//! (applied by the caller with the `with_*` builders).

use thiserror::Error;

/// Default upper bound on documents handed out by a single request.
const DEFAULT_MAX_BATCH_SIZE: usize = 500;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for scheduling runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Seed for reproducible draws (None = fresh randomness per call).
    pub seed: Option<u64>,
    /// Review sample size used when a review request omits `n`
    /// (None = hand out the whole eligible pool).
    pub default_review_size: Option<usize>,
    /// Largest number of documents a single request may ask for.
    pub max_batch_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            default_review_size: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl SchedulerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LABELFORGE_SEED`: Sampling seed (default: unset)
    /// - `LABELFORGE_REVIEW_SIZE`: Default review sample size (default: unset)
    /// - `LABELFORGE_MAX_BATCH`: Maximum documents per request (default: 500)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the result
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(val) = lookup("LABELFORGE_SEED") {
            config.seed = Some(parse_env_value(&val, "LABELFORGE_SEED")?);
        }

        if let Some(val) = lookup("LABELFORGE_REVIEW_SIZE") {
            config.default_review_size = Some(parse_env_value(&val, "LABELFORGE_REVIEW_SIZE")?);
        }

        if let Some(val) = lookup("LABELFORGE_MAX_BATCH") {
            config.max_batch_size = parse_env_value(&val, "LABELFORGE_MAX_BATCH")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_batch_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_batch_size must be greater than 0".to_string(),
            ));
        }

        if let Some(size) = self.default_review_size {
            if size > self.max_batch_size {
                return Err(ConfigError::ValidationFailed(format!(
                    "default_review_size ({}) cannot exceed max_batch_size ({})",
                    size, self.max_batch_size
                )));
            }
        }

        Ok(())
    }

    /// Checks a request size against `max_batch_size`.
    pub fn check_batch(&self, n: usize) -> Result<(), ConfigError> {
        if n > self.max_batch_size {
            return Err(ConfigError::ValidationFailed(format!(
                "requested {} documents, the limit is {}",
                n, self.max_batch_size
            )));
        }
        Ok(())
    }

    /// Builder method to set the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to set the default review size.
    pub fn with_default_review_size(mut self, size: usize) -> Self {
        self.default_review_size = Some(size);
        self
    }

    /// Builder method to set the maximum batch size.
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }
}

/// Parse an environment variable value.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}
