pub mod config;
pub mod simulation_engine;

// Re-export commonly used types
pub use config::{ServiceDistribution, ShoppingDistribution, SimulationConfig};
pub use simulation_engine::{run_simulation, SimulationEngine, SimulationObserver};
