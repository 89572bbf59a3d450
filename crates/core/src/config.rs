//! Engine configuration.
//!
//! The gate thresholds and scoring constants were observed behavior in the
//! product, not stated requirements, so they are carried as configuration
//! with defaults rather than hard-coded law. Everything deserializes from
//! TOML and falls back to the documented defaults field by field.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timing::{Engagement, SuggestionStage};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        self.scoring.validate()
    }
}

/// One value per engagement level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerEngagement<T> {
    pub high: T,
    pub medium: T,
    pub low: T,
}

impl<T: Copy> PerEngagement<T> {
    pub fn for_engagement(&self, engagement: Engagement) -> T {
        match engagement {
            Engagement::High => self.high,
            Engagement::Medium => self.medium,
            Engagement::Low => self.low,
        }
    }
}

/// Per-stage suggestion caps before engagement scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageCaps {
    pub greeting: u32,
    pub search: u32,
    pub results: u32,
    pub details: u32,
    pub comparison: u32,
    pub booking: u32,
    pub confirmation: u32,
}

impl Default for StageCaps {
    fn default() -> Self {
        Self {
            greeting: 1,
            search: 2,
            results: 3,
            details: 2,
            comparison: 2,
            booking: 2,
            confirmation: 0,
        }
    }
}

impl StageCaps {
    pub fn for_stage(&self, stage: SuggestionStage) -> u32 {
        match stage {
            SuggestionStage::Greeting => self.greeting,
            SuggestionStage::Search => self.search,
            SuggestionStage::Results => self.results,
            SuggestionStage::Details => self.details,
            SuggestionStage::Comparison => self.comparison,
            SuggestionStage::Booking => self.booking,
            SuggestionStage::Confirmation | SuggestionStage::Completed => self.confirmation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Session-wide ceiling on suggestions shown.
    pub max_total_suggestions: u32,
    /// Minimum seconds between suggestions, per engagement level. Floors,
    /// not preferences.
    pub min_interval_secs: PerEngagement<u64>,
    /// Back off once this share of shown suggestions was dismissed.
    pub dismissal_rate_threshold: f64,
    /// Minimum sample before the dismissal rate is trusted.
    pub dismissal_min_shown: u32,
    /// Suppress when the user has been silent this long.
    pub idle_timeout_secs: u64,
    pub stage_caps: StageCaps,
    pub engagement_multiplier: PerEngagement<f64>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_total_suggestions: 10,
            min_interval_secs: PerEngagement { high: 5, medium: 10, low: 15 },
            dismissal_rate_threshold: 0.7,
            dismissal_min_shown: 3,
            idle_timeout_secs: 300,
            stage_caps: StageCaps::default(),
            engagement_multiplier: PerEngagement { high: 1.5, medium: 1.0, low: 0.5 },
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.dismissal_rate_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "timing.dismissal_rate_threshold",
                reason: "must be within 0.0..=1.0".to_owned(),
            });
        }
        for (label, value) in [
            ("high", self.engagement_multiplier.high),
            ("medium", self.engagement_multiplier.medium),
            ("low", self.engagement_multiplier.low),
        ] {
            if value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "timing.engagement_multiplier",
                    reason: format!("{label} multiplier must not be negative"),
                });
            }
        }
        Ok(())
    }
}

/// Savings-magnitude bonus tier: amounts strictly above `threshold` earn
/// `bonus`. Currency-unit-agnostic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavingsTier {
    pub threshold: f64,
    pub bonus: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_high: f64,
    pub base_medium: f64,
    pub base_low: f64,
    /// Bonus when the suggestion expires within the hour.
    pub expiry_urgent_bonus: f64,
    /// Bonus when the suggestion expires within the day.
    pub expiry_soon_bonus: f64,
    /// Checked in order; the first matching tier wins.
    pub savings_tiers: Vec<SavingsTier>,
    pub high_engagement_multiplier: f64,
    /// Applied to non-high-priority suggestions for low-engagement users.
    pub low_engagement_damping: f64,
    pub acceptance_boost_threshold: f64,
    pub acceptance_boost: f64,
    pub acceptance_damping_threshold: f64,
    pub acceptance_damping: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_high: 10.0,
            base_medium: 5.0,
            base_low: 2.0,
            expiry_urgent_bonus: 5.0,
            expiry_soon_bonus: 3.0,
            savings_tiers: vec![
                SavingsTier { threshold: 200.0, bonus: 4.0 },
                SavingsTier { threshold: 100.0, bonus: 2.0 },
                SavingsTier { threshold: 50.0, bonus: 1.0 },
            ],
            high_engagement_multiplier: 1.2,
            low_engagement_damping: 0.5,
            acceptance_boost_threshold: 0.5,
            acceptance_boost: 1.3,
            acceptance_damping_threshold: 0.2,
            acceptance_damping: 0.7,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut previous = f64::INFINITY;
        for tier in &self.savings_tiers {
            if tier.threshold >= previous {
                return Err(ConfigError::InvalidValue {
                    field: "scoring.savings_tiers",
                    reason: "tiers must be ordered by strictly descending threshold".to_owned(),
                });
            }
            previous = tier.threshold;
        }
        if self.acceptance_damping_threshold > self.acceptance_boost_threshold {
            return Err(ConfigError::InvalidValue {
                field: "scoring.acceptance_damping_threshold",
                reason: "must not exceed the boost threshold".to_owned(),
            });
        }
        Ok(())
    }
}
