//! Stochastic inputs of the store model.
//!
//! One `StoreRandom` is owned by each engine instance and every draw of a run
//! goes through it, so a seed fixes the whole sequence of samples. Nothing
//! here is shared between runs.

use crate::core::errors::ConfigError;
use crate::core::execution::config::{ServiceDistribution, ShoppingDistribution, SimulationConfig};
use crate::core::types::SimTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal, Uniform};

/// Lower bound applied to every service duration
pub const MIN_SERVICE_TIME: SimTime = 0.5;

#[derive(Debug, Clone)]
enum ShoppingSampler {
    Normal { dist: Normal<f64>, min: f64, max: f64 },
    Uniform(Uniform<f64>),
    Exponential { dist: Exp<f64>, min: f64 },
}

#[derive(Debug, Clone)]
enum ServiceSampler {
    Exponential(Exp<f64>),
    Normal(Normal<f64>),
}

/// Seeded random source plus the configured sampling distributions
#[derive(Debug, Clone)]
pub struct StoreRandom {
    rng: StdRng,
    interarrival: Exp<f64>,
    shopping: ShoppingSampler,
    service: ServiceSampler,
}

impl StoreRandom {
    /// Build the samplers for `config`, seeding a fresh random source from it
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let interarrival = exp_with_mean("arrival_mean", config.arrival_mean)?;

        let shopping = match config.shopping_distribution {
            ShoppingDistribution::Normal => ShoppingSampler::Normal {
                dist: normal("shopping", config.shopping_mean, config.shopping_std)?,
                min: config.shopping_min,
                max: config.shopping_max,
            },
            ShoppingDistribution::Uniform => {
                if !(config.shopping_min <= config.shopping_max) {
                    return Err(ConfigError::Invalid(format!(
                        "uniform shopping range [{}, {}] is empty",
                        config.shopping_min, config.shopping_max
                    )));
                }
                ShoppingSampler::Uniform(Uniform::new_inclusive(
                    config.shopping_min,
                    config.shopping_max,
                ))
            }
            ShoppingDistribution::Exponential => ShoppingSampler::Exponential {
                dist: exp_with_mean("shopping_mean", config.shopping_mean)?,
                min: config.shopping_min,
            },
        };

        let service = match config.service_distribution {
            ServiceDistribution::Exponential => {
                ServiceSampler::Exponential(exp_with_mean("service_mean", config.service_mean)?)
            }
            ServiceDistribution::Normal => {
                ServiceSampler::Normal(normal("service", config.service_mean, config.service_std)?)
            }
        };

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            interarrival,
            shopping,
            service,
        })
    }

    /// Gap until the next customer arrives (Poisson arrival stream)
    pub fn interarrival_time(&mut self) -> SimTime {
        self.interarrival.sample(&mut self.rng)
    }

    /// Time a customer spends picking goods before queueing
    pub fn shopping_time(&mut self) -> SimTime {
        match &self.shopping {
            ShoppingSampler::Normal { dist, min, max } => {
                dist.sample(&mut self.rng).max(*min).min(*max)
            }
            ShoppingSampler::Uniform(dist) => dist.sample(&mut self.rng),
            ShoppingSampler::Exponential { dist, min } => dist.sample(&mut self.rng).max(*min),
        }
    }

    /// Time a customer occupies a checkout desk
    pub fn service_time(&mut self) -> SimTime {
        let sample = match &self.service {
            ServiceSampler::Exponential(dist) => dist.sample(&mut self.rng),
            ServiceSampler::Normal(dist) => dist.sample(&mut self.rng),
        };
        sample.max(MIN_SERVICE_TIME)
    }
}

fn exp_with_mean(name: &str, mean: f64) -> Result<Exp<f64>, ConfigError> {
    if !(mean.is_finite() && mean > 0.0) {
        return Err(ConfigError::Invalid(format!(
            "{} must be greater than 0, got {}",
            name, mean
        )));
    }
    Exp::new(1.0 / mean).map_err(|err| ConfigError::Invalid(format!("{}: {}", name, err)))
}

fn normal(phase: &str, mean: f64, std: f64) -> Result<Normal<f64>, ConfigError> {
    Normal::new(mean, std)
        .map_err(|err| ConfigError::Invalid(format!("{} normal({}, {}): {}", phase, mean, std, err)))
}
