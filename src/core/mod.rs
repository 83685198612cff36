pub mod customer;
pub mod errors;
pub mod event;
pub mod event_scheduler;
pub mod execution;
pub mod generators;
pub mod resource_pool;
pub mod stats;
pub mod sweep;
pub mod types;
