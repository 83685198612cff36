pub mod collector;
pub mod results;

pub use collector::StatsCollector;
pub use results::SimulationResults;
