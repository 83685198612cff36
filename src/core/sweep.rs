//! Parameter sweeps over independent replications.
//!
//! Each value of the swept parameter gets its own `SimulationEngine` with its
//! own random source seeded from the base configuration, so replications can
//! run on separate threads without sharing any state.

use crate::core::errors::{ConfigError, SimulationError};
use crate::core::execution::config::SimulationConfig;
use crate::core::execution::simulation_engine::run_simulation;
use crate::core::stats::SimulationResults;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration field varied across a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    DeskCount,
    ArrivalMean,
    ShoppingMean,
    ServiceMean,
    Horizon,
}

impl SweepParameter {
    pub fn name(&self) -> &'static str {
        match self {
            SweepParameter::DeskCount => "desk_count",
            SweepParameter::ArrivalMean => "arrival_mean",
            SweepParameter::ShoppingMean => "shopping_mean",
            SweepParameter::ServiceMean => "service_mean",
            SweepParameter::Horizon => "horizon",
        }
    }

    /// Copy of `base` with this field set to `value`
    pub fn apply(&self, base: &SimulationConfig, value: f64) -> SimulationConfig {
        let config = base.clone();
        match self {
            SweepParameter::DeskCount => config.with_desk_count(value.max(0.0).round() as usize),
            SweepParameter::ArrivalMean => config.with_arrival_mean(value),
            SweepParameter::ShoppingMean => SimulationConfig {
                shopping_mean: value,
                ..config
            },
            SweepParameter::ServiceMean => SimulationConfig {
                service_mean: value,
                ..config
            },
            SweepParameter::Horizon => config.with_horizon(value),
        }
    }
}

/// Scalar extracted from each sweep point for metric-vs-parameter output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMetric {
    AvgWaitingTime,
    AvgQueueLength,
    AvgTimeInShop,
    AvgDeskUtilization,
    CustomersServed,
}

impl SweepMetric {
    pub fn value(&self, results: &SimulationResults) -> f64 {
        match self {
            SweepMetric::AvgWaitingTime => results.avg_waiting_time,
            SweepMetric::AvgQueueLength => results.avg_queue_length,
            SweepMetric::AvgTimeInShop => results.avg_time_in_shop,
            SweepMetric::AvgDeskUtilization => results.avg_cash_desk_utilization,
            SweepMetric::CustomersServed => results.total_customers_served as f64,
        }
    }

    /// Whether larger values of this metric are better
    pub fn higher_is_better(&self) -> bool {
        matches!(
            self,
            SweepMetric::AvgDeskUtilization | SweepMetric::CustomersServed
        )
    }
}

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Replications run on a Rayon thread pool
    Rayon,
}

/// How the replications of a sweep are executed
#[derive(Debug, Clone, Default)]
pub struct SweepConfig {
    pub concurrency_mode: ConcurrencyMode,
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl SweepConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}

/// Result of one replication in a sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub value: f64,
    pub results: SimulationResults,
}

/// Ordered values from `start` to `end` inclusive in steps of `step`.
///
/// Desk counts are integral, so their step is rounded down to at least 1.
pub fn sweep_values(
    parameter: SweepParameter,
    start: f64,
    end: f64,
    step: f64,
) -> Result<Vec<f64>, ConfigError> {
    if !(start.is_finite() && end.is_finite() && step.is_finite()) || start > end || step <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "sweep range {}..={} with step {} is empty",
            start, end, step
        )));
    }

    if parameter == SweepParameter::DeskCount {
        if start < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "desk_count sweep cannot start below 0, got {}",
                start
            )));
        }
        let start = start.trunc() as i64;
        let end = end.trunc() as i64;
        let step = (step.trunc() as i64).max(1) as usize;
        return Ok((start..=end).step_by(step).map(|desks| desks as f64).collect());
    }

    let limit = end + step / 2.0;
    let values = (0u64..)
        .map(|i| start + i as f64 * step)
        .take_while(|value| *value < limit)
        .collect();
    Ok(values)
}

/// Run one independent replication per value of `parameter`.
///
/// Points come back in the order of `values` regardless of how they were
/// executed. Any failing replication fails the whole sweep.
pub fn run_sweep(
    base: &SimulationConfig,
    parameter: SweepParameter,
    values: &[f64],
    execution: &SweepConfig,
) -> Result<Vec<SweepPoint>, SimulationError> {
    info!(
        "sweeping {} over {} values ({:?})",
        parameter.name(),
        values.len(),
        execution.concurrency_mode
    );

    let replicate = |&value: &f64| -> Result<SweepPoint, SimulationError> {
        let results = run_simulation(parameter.apply(base, value))?;
        Ok(SweepPoint { value, results })
    };

    match execution.concurrency_mode {
        ConcurrencyMode::Sequential => values.iter().map(replicate).collect::<Result<Vec<_>, _>>(),
        ConcurrencyMode::Rayon => match execution.thread_pool_size {
            Some(size) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(size)
                    .build()
                    .map_err(|err| SimulationError::ThreadPool(err.to_string()))?;
                pool.install(|| values.par_iter().map(replicate).collect::<Result<Vec<_>, _>>())
            }
            None => values.par_iter().map(replicate).collect::<Result<Vec<_>, _>>(),
        },
    }
}

/// Point with the best value of `metric`, if any
pub fn best_point(points: &[SweepPoint], metric: SweepMetric) -> Option<&SweepPoint> {
    let key = |point: &&SweepPoint| metric.value(&point.results);
    if metric.higher_is_better() {
        points.iter().max_by(|a, b| key(a).total_cmp(&key(b)))
    } else {
        points.iter().min_by(|a, b| key(a).total_cmp(&key(b)))
    }
}
