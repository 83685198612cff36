pub mod core;

// Re-export commonly used types
pub use crate::core::errors::{ConfigError, SimulationError};
pub use crate::core::event::Event;
pub use crate::core::execution::{
    run_simulation, ServiceDistribution, ShoppingDistribution, SimulationConfig, SimulationEngine,
    SimulationObserver,
};
pub use crate::core::stats::SimulationResults;
pub use crate::core::sweep::{run_sweep, sweep_values, SweepMetric, SweepParameter, SweepPoint};
pub use crate::core::types::{CustomerId, DeskId, SimTime};
