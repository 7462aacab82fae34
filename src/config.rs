//! Engine configuration
//!
//! Embedded json5 defaults, optionally overridden by a user config file in
//! the platform config directory. Unlike an end-user application, the
//! engine works fine with defaults alone, so a missing user file is not an
//! error.

use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;

use crate::domain::ranking::RankingWeights;
use crate::utils;

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Apply relevance ranking to `items()` reads
    pub enabled: bool,
    pub weights: RankingWeights,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            weights: RankingWeights::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Items requested per page; also the page-fullness threshold for `has_more`
    pub page_size: usize,
    /// Seconds between "check newer" polls
    pub poll_interval_secs: u64,
    pub ranking: RankingConfig,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            poll_interval_secs: 30,
            ranking: RankingConfig::default(),
        }
    }
}

impl FeedConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Loads the embedded defaults merged with any user config file found
    /// in the config directory.
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = utils::get_config_dir();
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
        ];
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Message(String::from(
                "page_size must be at least 1",
            )));
        }
        // A zero or negative half-life turns the decay term into NaN,
        // which would leave the ranking order unspecified
        if self.ranking.weights.half_life_hours <= 0.0 {
            return Err(ConfigError::Message(String::from(
                "ranking.weights.half_life_hours must be positive",
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let cfg: FeedConfig = json5::from_str(CONFIG).expect("embedded defaults must parse");
        assert_eq!(cfg, FeedConfig::default());
    }

    #[test]
    fn test_default_poll_interval() {
        let cfg = FeedConfig::default();
        assert_eq!(cfg.poll_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let cfg: FeedConfig = json5::from_str("{ page_size: 0 }").expect("parses");
        let err = cfg.validate().expect_err("should be rejected");
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_non_positive_half_life_is_rejected() {
        let cfg: FeedConfig =
            json5::from_str(r#"{ ranking: { weights: { half_life_hours: 0 } } }"#).expect("parses");
        let err = cfg.validate().expect_err("should be rejected");
        assert!(err.to_string().contains("half_life_hours"));

        let cfg: FeedConfig =
            json5::from_str(r#"{ ranking: { weights: { half_life_hours: -3.0 } } }"#)
                .expect("parses");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_defaults_pass_validation() {
        assert!(FeedConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_user_config_merges_over_defaults() {
        let cfg: FeedConfig =
            json5::from_str(r#"{ page_size: 50, ranking: { enabled: true } }"#).expect("valid");
        assert_eq!(cfg.page_size, 50);
        assert!(cfg.ranking.enabled);
        // Untouched sections keep their defaults
        assert_eq!(cfg.poll_interval_secs, 30);
        assert_eq!(cfg.ranking.weights, RankingWeights::default());
    }
}
