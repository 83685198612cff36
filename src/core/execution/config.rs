//! Configuration for a single store simulation run
//!
//! This module provides the parameter record the engine is driven by, its
//! builder methods, validation, and parsing from a loose JSON parameter record.

use crate::core::errors::ConfigError;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Distribution used to draw how long a customer spends picking goods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShoppingDistribution {
    /// normal(mean, std) clamped to [min, max]
    Normal,
    /// uniform(min, max)
    Uniform,
    /// exponential(mean) clamped below at min
    Exponential,
}

impl ShoppingDistribution {
    /// Look up a distribution by its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(ShoppingDistribution::Normal),
            "uniform" => Some(ShoppingDistribution::Uniform),
            "exponential" => Some(ShoppingDistribution::Exponential),
            _ => None,
        }
    }

    /// Resolve a name, substituting the exponential branch for anything unknown
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(
                "unknown shopping distribution {:?}, falling back to exponential",
                name
            );
            ShoppingDistribution::Exponential
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShoppingDistribution::Normal => "normal",
            ShoppingDistribution::Uniform => "uniform",
            ShoppingDistribution::Exponential => "exponential",
        }
    }
}

/// Distribution used to draw checkout service durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceDistribution {
    /// exponential(mean) clamped below at the minimum service time
    Exponential,
    /// normal(mean, std) clamped below at the minimum service time
    Normal,
}

impl ServiceDistribution {
    /// Look up a distribution by its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "exponential" => Some(ServiceDistribution::Exponential),
            "normal" => Some(ServiceDistribution::Normal),
            _ => None,
        }
    }

    /// Resolve a name, substituting the exponential branch for anything unknown
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(
                "unknown service distribution {:?}, falling back to exponential",
                name
            );
            ServiceDistribution::Exponential
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServiceDistribution::Exponential => "exponential",
            ServiceDistribution::Normal => "normal",
        }
    }
}

/// Parameters of one simulation run.
///
/// Immutable once handed to a `SimulationEngine`. All durations are minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed of the run's random source
    pub seed: u64,
    /// Total simulated duration
    pub horizon: f64,
    /// Mean gap between customer arrivals
    pub arrival_mean: f64,
    pub shopping_distribution: ShoppingDistribution,
    pub shopping_mean: f64,
    pub shopping_std: f64,
    pub shopping_min: f64,
    pub shopping_max: f64,
    /// Number of checkout desks
    pub desk_count: usize,
    pub service_distribution: ServiceDistribution,
    pub service_mean: f64,
    pub service_std: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            horizon: 480.0,
            arrival_mean: 5.0,
            shopping_distribution: ShoppingDistribution::Normal,
            shopping_mean: 15.0,
            shopping_std: 5.0,
            shopping_min: 5.0,
            shopping_max: 30.0,
            desk_count: 3,
            service_distribution: ServiceDistribution::Exponential,
            service_mean: 3.0,
            service_std: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with the reference store defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_horizon(mut self, minutes: f64) -> Self {
        self.horizon = minutes;
        self
    }

    pub fn with_arrival_mean(mut self, minutes: f64) -> Self {
        self.arrival_mean = minutes;
        self
    }

    /// Set every shopping-time parameter at once
    pub fn with_shopping(
        mut self,
        distribution: ShoppingDistribution,
        mean: f64,
        std: f64,
        min: f64,
        max: f64,
    ) -> Self {
        self.shopping_distribution = distribution;
        self.shopping_mean = mean;
        self.shopping_std = std;
        self.shopping_min = min;
        self.shopping_max = max;
        self
    }

    pub fn with_desk_count(mut self, desks: usize) -> Self {
        self.desk_count = desks;
        self
    }

    /// Set every service-time parameter at once
    pub fn with_service(mut self, distribution: ServiceDistribution, mean: f64, std: f64) -> Self {
        self.service_distribution = distribution;
        self.service_mean = mean;
        self.service_std = std;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "horizon must be a non-negative number of minutes, got {}",
                self.horizon
            )));
        }

        require_positive("arrival_mean", self.arrival_mean)?;
        // Exponential branches need a positive mean; StoreRandom checks that
        require_finite("shopping_mean", self.shopping_mean)?;
        require_finite("service_mean", self.service_mean)?;
        require_non_negative("shopping_std", self.shopping_std)?;
        require_non_negative("service_std", self.service_std)?;
        require_non_negative("shopping_min", self.shopping_min)?;
        require_non_negative("shopping_max", self.shopping_max)?;

        if self.shopping_min > self.shopping_max {
            return Err(ConfigError::Invalid(format!(
                "shopping_min ({}) cannot be greater than shopping_max ({})",
                self.shopping_min, self.shopping_max
            )));
        }

        Ok(())
    }

    /// Parse a loose parameter record such as the one an input form produces.
    ///
    /// Every numeric field is required. Distribution names are free text and
    /// unknown names fall back to the phase default.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(input).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let record = value
            .as_object()
            .ok_or_else(|| ConfigError::Parse("expected a JSON object".to_string()))?;

        let desk_count = integer_field(record, "desk_count")?;
        if desk_count < 0 {
            return Err(ConfigError::Invalid(format!(
                "desk_count cannot be negative, got {}",
                desk_count
            )));
        }

        let seed = seed_field(record)?;

        let config = Self {
            seed,
            horizon: number_field(record, "horizon")?,
            arrival_mean: number_field(record, "arrival_mean")?,
            shopping_distribution: ShoppingDistribution::from_name_or_default(text_field(
                record,
                "shopping_distribution",
            )?),
            shopping_mean: number_field(record, "shopping_mean")?,
            shopping_std: number_field(record, "shopping_std")?,
            shopping_min: number_field(record, "shopping_min")?,
            shopping_max: number_field(record, "shopping_max")?,
            desk_count: desk_count as usize,
            service_distribution: ServiceDistribution::from_name_or_default(text_field(
                record,
                "service_distribution",
            )?),
            service_mean: number_field(record, "service_mean")?,
            service_std: number_field(record, "service_std")?,
        };

        config.validate()?;
        Ok(config)
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be greater than 0, got {}",
            name, value
        )))
    }
}

fn require_finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be a finite number, got {}",
            name, value
        )))
    }
}

fn require_non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )))
    }
}

fn field<'a>(record: &'a Map<String, Value>, name: &str) -> Result<&'a Value, ConfigError> {
    record
        .get(name)
        .ok_or_else(|| ConfigError::Parse(format!("missing required field `{}`", name)))
}

fn number_field(record: &Map<String, Value>, name: &str) -> Result<f64, ConfigError> {
    field(record, name)?
        .as_f64()
        .ok_or_else(|| ConfigError::Parse(format!("field `{}` must be numeric", name)))
}

fn integer_field(record: &Map<String, Value>, name: &str) -> Result<i64, ConfigError> {
    field(record, name)?
        .as_i64()
        .ok_or_else(|| ConfigError::Parse(format!("field `{}` must be an integer", name)))
}

fn seed_field(record: &Map<String, Value>) -> Result<u64, ConfigError> {
    let value = field(record, "seed")?;
    if let Some(seed) = value.as_u64() {
        return Ok(seed);
    }
    match value.as_i64() {
        Some(seed) => Err(ConfigError::Invalid(format!(
            "seed cannot be negative, got {}",
            seed
        ))),
        None => Err(ConfigError::Parse("field `seed` must be an integer".to_string())),
    }
}

fn text_field<'a>(record: &'a Map<String, Value>, name: &str) -> Result<&'a str, ConfigError> {
    field(record, name)?
        .as_str()
        .ok_or_else(|| ConfigError::Parse(format!("field `{}` must be a string", name)))
}
