use shopsim::core::sweep::{best_point, ConcurrencyMode, SweepConfig};
use shopsim::{
    run_simulation, run_sweep, sweep_values, ConfigError, ServiceDistribution, ShoppingDistribution,
    SimulationConfig, SimulationError, SweepMetric, SweepParameter,
};

/// Reference store: 3 desks, customers every 5 minutes on average over an 8 hour day
fn reference_store(seed: u64) -> SimulationConfig {
    SimulationConfig::new()
        .with_seed(seed)
        .with_desk_count(3)
        .with_arrival_mean(5.0)
        .with_horizon(480.0)
        .with_shopping(ShoppingDistribution::Normal, 15.0, 5.0, 5.0, 30.0)
        .with_service(ServiceDistribution::Exponential, 3.0, 1.0)
}

#[test]
fn test_quiet_store_has_no_waiting() {
    let config = SimulationConfig::new()
        .with_desk_count(1)
        .with_arrival_mean(1000.0)
        .with_horizon(100.0);
    let results = run_simulation(config).unwrap();

    assert!(results.avg_waiting_time < 1e-9);
    assert!(results.total_customers_served <= results.total_customers_arrived);
}

#[test]
fn test_store_without_desks_serves_nobody() {
    let config = SimulationConfig::new().with_desk_count(0).with_horizon(100.0);
    let results = run_simulation(config).unwrap();

    assert!(results.total_customers_arrived > 0);
    assert_eq!(results.total_customers_served, 0);
    assert_eq!(results.avg_cash_desk_utilization, 0.0);
    assert!(results.cash_desk_utilization.is_empty());
    assert!(results.waiting_time_distribution.is_empty());
    assert!(results.time_in_shop_distribution.is_empty());
    // Everyone who finished shopping is still standing in line
    assert!(results.max_queue_length > 0);
}

#[test]
fn test_zero_horizon_gives_empty_result() {
    let results = run_simulation(SimulationConfig::new().with_horizon(0.0)).unwrap();

    assert_eq!(results.total_customers_arrived, 0);
    assert_eq!(results.total_customers_served, 0);
    assert_eq!(results.avg_waiting_time, 0.0);
    assert_eq!(results.max_waiting_time, 0.0);
    assert_eq!(results.avg_time_in_shop, 0.0);
    assert_eq!(results.avg_queue_length, 0.0);
    assert!(results.queue_length_time_series.is_empty());
    assert_eq!(results.cash_desk_utilization.len(), 3);
    assert!(results.cash_desk_utilization.values().all(|&u| u == 0.0));
    assert_eq!(results.avg_cash_desk_utilization, 0.0);
}

#[test]
fn test_fixed_seed_is_reproducible() {
    let first = run_simulation(reference_store(42)).unwrap();
    let second = run_simulation(reference_store(42)).unwrap();

    assert_eq!(first.total_customers_arrived, second.total_customers_arrived);
    assert_eq!(first.avg_waiting_time.to_bits(), second.avg_waiting_time.to_bits());
    assert_eq!(first, second);
}

#[test]
fn test_reference_store_results_are_in_range() {
    let results = run_simulation(reference_store(7)).unwrap();

    // Roughly 96 arrivals expected over the day
    assert!(results.total_customers_arrived > 50);
    assert!(results.total_customers_served <= results.total_customers_arrived);
    assert!(results.total_customers_served > 0);
    assert!(results.avg_time_in_shop >= 5.0);
    assert!(results.max_waiting_time >= results.avg_waiting_time);

    assert_eq!(results.cash_desk_utilization.len(), 3);
    for utilization in results.cash_desk_utilization.values() {
        assert!((0.0..=1.0).contains(utilization));
    }
    assert!((0.0..=1.0).contains(&results.avg_cash_desk_utilization));

    let minutes: Vec<u64> = results.queue_length_time_series.iter().map(|&(m, _)| m).collect();
    assert_eq!(minutes.len(), 480);
    assert!(minutes.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_long_horizon_serves_almost_everyone() {
    let short = run_simulation(reference_store(3).with_horizon(60.0)).unwrap();
    let long = run_simulation(reference_store(3).with_horizon(2400.0)).unwrap();

    let short_ratio = short.total_customers_served as f64 / short.total_customers_arrived as f64;
    let long_ratio = long.total_customers_served as f64 / long.total_customers_arrived as f64;
    assert!(long_ratio > short_ratio);
    assert!(long_ratio > 0.95);
}

#[test]
fn test_invalid_configs_produce_no_result() {
    let err = run_simulation(SimulationConfig::new().with_horizon(-1.0)).unwrap_err();
    assert!(matches!(err, SimulationError::Config(ConfigError::Invalid(_))));

    let err = SimulationConfig::from_json(r#"{"seed": 1, "horizon": "soon"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_zero_mean_runs_when_distribution_does_not_need_it() {
    let config = reference_store(5)
        .with_horizon(120.0)
        .with_shopping(ShoppingDistribution::Uniform, 0.0, 0.0, 2.0, 4.0)
        .with_service(ServiceDistribution::Normal, 0.0, 1.0);
    let results = run_simulation(config).unwrap();
    assert!(results.total_customers_served > 0);

    let err = run_simulation(reference_store(5).with_service(ServiceDistribution::Exponential, 0.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, SimulationError::Config(ConfigError::Invalid(_))));
}

#[test]
fn test_json_record_round_trip_through_engine() {
    let json = r#"{
        "seed": 42, "horizon": 480, "arrival_mean": 5,
        "shopping_distribution": "normal", "shopping_mean": 15, "shopping_std": 5,
        "shopping_min": 5, "shopping_max": 30,
        "desk_count": 3,
        "service_distribution": "exponential", "service_mean": 3, "service_std": 1
    }"#;
    let config = SimulationConfig::from_json(json).unwrap();
    assert_eq!(config, reference_store(42));
    assert_eq!(run_simulation(config).unwrap(), run_simulation(reference_store(42)).unwrap());
}

#[test]
fn test_desk_sweep_reduces_waiting() {
    let values = sweep_values(SweepParameter::DeskCount, 1.0, 4.0, 1.0).unwrap();
    let execution = SweepConfig::new().with_concurrency(ConcurrencyMode::Rayon);
    let points = run_sweep(&reference_store(42), SweepParameter::DeskCount, &values, &execution).unwrap();

    assert_eq!(points.len(), 4);
    let one_desk = SweepMetric::AvgWaitingTime.value(&points[0].results);
    let four_desks = SweepMetric::AvgWaitingTime.value(&points[3].results);
    assert!(four_desks <= one_desk);

    // Each point matches a standalone run of the same configuration
    let standalone = run_simulation(reference_store(42).with_desk_count(2)).unwrap();
    assert_eq!(points[1].results, standalone);

    let best = best_point(&points, SweepMetric::AvgWaitingTime).unwrap();
    assert!(best.value >= 2.0);
}
