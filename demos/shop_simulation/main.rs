use clap::{Parser, ValueEnum};
use shopsim::core::sweep::{best_point, ConcurrencyMode, SweepConfig};
use shopsim::{run_simulation, run_sweep, sweep_values, SimulationConfig, SweepMetric, SweepParameter};
use std::fs;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ParameterArg {
    Desks,
    ArrivalMean,
    ShoppingMean,
    ServiceMean,
    Horizon,
}

impl From<ParameterArg> for SweepParameter {
    fn from(arg: ParameterArg) -> Self {
        match arg {
            ParameterArg::Desks => SweepParameter::DeskCount,
            ParameterArg::ArrivalMean => SweepParameter::ArrivalMean,
            ParameterArg::ShoppingMean => SweepParameter::ShoppingMean,
            ParameterArg::ServiceMean => SweepParameter::ServiceMean,
            ParameterArg::Horizon => SweepParameter::Horizon,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    Waiting,
    QueueLength,
    TimeInShop,
    Utilization,
    Served,
}

impl From<MetricArg> for SweepMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Waiting => SweepMetric::AvgWaitingTime,
            MetricArg::QueueLength => SweepMetric::AvgQueueLength,
            MetricArg::TimeInShop => SweepMetric::AvgTimeInShop,
            MetricArg::Utilization => SweepMetric::AvgDeskUtilization,
            MetricArg::Served => SweepMetric::CustomersServed,
        }
    }
}

/// Simulate customer flow through a retail store and its checkout desks
#[derive(Debug, Parser)]
#[command(name = "shop_simulation")]
struct Args {
    /// JSON parameter record; defaults to the reference store
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    seed: Option<u64>,

    /// Simulated minutes
    #[arg(long)]
    horizon: Option<f64>,

    #[arg(long)]
    desks: Option<usize>,

    /// Vary one parameter and print the chosen metric for each value
    #[arg(long, value_enum)]
    sweep: Option<ParameterArg>,

    #[arg(long, default_value_t = 1.0)]
    from: f64,

    #[arg(long, default_value_t = 5.0)]
    to: f64,

    #[arg(long, default_value_t = 1.0)]
    step: f64,

    #[arg(long, value_enum, default_value_t = MetricArg::Waiting)]
    metric: MetricArg,

    /// Print results as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json(&fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(horizon) = args.horizon {
        config = config.with_horizon(horizon);
    }
    if let Some(desks) = args.desks {
        config = config.with_desk_count(desks);
    }

    match args.sweep {
        None => {
            let results = run_simulation(config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print!("{}", results.summary());
            }
        }
        Some(parameter) => {
            let parameter = SweepParameter::from(parameter);
            let metric = SweepMetric::from(args.metric);
            let values = sweep_values(parameter, args.from, args.to, args.step)?;
            let execution = SweepConfig::new().with_concurrency(ConcurrencyMode::Rayon);
            let points = run_sweep(&config, parameter, &values, &execution)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&points)?);
                return Ok(());
            }

            println!("{:>14} {:>14}", parameter.name(), format!("{:?}", metric));
            for point in &points {
                println!("{:>14.3} {:>14.3}", point.value, metric.value(&point.results));
            }
            if let Some(best) = best_point(&points, metric) {
                println!(
                    "best {} = {} ({:.3})",
                    parameter.name(),
                    best.value,
                    metric.value(&best.results)
                );
            }
        }
    }

    Ok(())
}
