use super::types::{CustomerId, DeskId};
use thiserror::Error;

/// Rejected configuration, reported before any simulation executes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("could not parse configuration: {0}")]
    Parse(String),
}

/// Failure that aborts a run without producing a result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("event for unknown customer {0}")]
    UnknownCustomer(CustomerId),

    #[error("customer {customer} cannot {action} while {state}")]
    InvalidTransition {
        customer: CustomerId,
        action: &'static str,
        state: &'static str,
    },

    #[error("desk {0} released while idle")]
    DeskNotBusy(DeskId),

    #[error("desk {0} out of range")]
    DeskOutOfRange(DeskId),

    #[error("could not start sweep thread pool: {0}")]
    ThreadPool(String),
}
