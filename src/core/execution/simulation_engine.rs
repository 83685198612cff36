use crate::core::customer::{CompletedVisit, Customer};
use crate::core::errors::SimulationError;
use crate::core::event::Event;
use crate::core::event_scheduler::EventScheduler;
use crate::core::execution::config::SimulationConfig;
use crate::core::generators::StoreRandom;
use crate::core::resource_pool::{Admission, DeskPool, PoolSnapshot};
use crate::core::stats::{SimulationResults, StatsCollector};
use crate::core::types::{CustomerId, SimTime};
use log::{debug, info};
use std::collections::HashMap;

/// Interval between periodic queue-length samples
pub const MONITOR_INTERVAL: SimTime = 1.0;

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called after an event has been dispatched, with the pool as it stands afterwards
    fn on_event(&mut self, time: SimTime, event: &Event, pool: &PoolSnapshot);

    /// Called when a customer completes service and leaves
    fn on_departure(&mut self, _visit: &CompletedVisit) {}

    /// Called once when the horizon is reached
    fn on_halt(&mut self, _time: SimTime, _discarded_events: usize, _dropped_customers: usize) {}
}

/// Discrete-event engine for one store run.
///
/// Owns the clock, the event queue, the desk pool, the random source and the
/// statistics of a single replication. Nothing is shared between engines.
pub struct SimulationEngine {
    config: SimulationConfig,
    scheduler: EventScheduler,
    random: StoreRandom,
    pool: DeskPool,
    customers: HashMap<CustomerId, Customer>,
    stats: StatsCollector,
    now: SimTime,
    last_customer_id: CustomerId,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl SimulationEngine {
    /// Validate `config` and prepare a run starting at time 0
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let random = StoreRandom::from_config(&config)?;

        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at(Event::ArrivalsStart, 0.0);
        scheduler.schedule_at(Event::MonitorTick, 0.0);

        Ok(Self {
            pool: DeskPool::new(config.desk_count),
            config,
            scheduler,
            random,
            customers: HashMap::new(),
            stats: StatsCollector::new(),
            now: 0.0,
            last_customer_id: 0,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Run to the horizon and reduce the observations into a result
    pub fn run(mut self) -> Result<SimulationResults, SimulationError> {
        info!(
            "starting store simulation: horizon={} desks={} seed={}",
            self.config.horizon, self.config.desk_count, self.config.seed
        );

        while self.step()? {}
        self.halt();

        let results =
            SimulationResults::from_stats(&self.stats, self.config.horizon, self.config.desk_count);
        info!(
            "simulation finished: arrived={} served={} avg_wait={:.3} utilization={:.3}",
            results.total_customers_arrived,
            results.total_customers_served,
            results.avg_waiting_time,
            results.avg_cash_desk_utilization
        );
        Ok(results)
    }

    /// Dispatch the next event due before the horizon.
    ///
    /// Returns false once nothing is left to do before the horizon.
    pub fn step(&mut self) -> Result<bool, SimulationError> {
        match self.scheduler.peek_next_time() {
            Some(time) if time < self.config.horizon => {}
            _ => return Ok(false),
        }
        let Some(scheduled) = self.scheduler.pop_next() else {
            return Ok(false);
        };

        self.now = scheduled.time;
        debug!("t={:.3} {:?}", self.now, scheduled.event);
        self.dispatch(scheduled.event)?;

        let snapshot = self.pool.snapshot();
        for observer in &mut self.observers {
            observer.on_event(self.now, &scheduled.event, &snapshot);
        }
        Ok(true)
    }

    fn dispatch(&mut self, event: Event) -> Result<(), SimulationError> {
        match event {
            Event::ArrivalsStart => {
                let gap = self.random.interarrival_time();
                self.scheduler.schedule_at(Event::Arrival, self.now + gap);
            }
            Event::Arrival => {
                self.stats.record_arrival();
                self.last_customer_id += 1;
                self.scheduler
                    .schedule_at(Event::CustomerEnter(self.last_customer_id), self.now);

                let gap = self.random.interarrival_time();
                self.scheduler.schedule_at(Event::Arrival, self.now + gap);
            }
            Event::CustomerEnter(id) => {
                self.customers.insert(id, Customer::arrive(id, self.now));
                self.sample_queue_length();

                let shopping = self.random.shopping_time();
                self.scheduler
                    .schedule_at(Event::ShoppingDone(id), self.now + shopping);
            }
            Event::ShoppingDone(id) => {
                let customer = self
                    .customers
                    .get_mut(&id)
                    .ok_or(SimulationError::UnknownCustomer(id))?;
                customer.join_queue(self.now)?;
                self.stats
                    .record_queue_length(self.now, self.pool.queue_length());

                match self.pool.request(id) {
                    Admission::Granted(grant) => {
                        let desk = grant.desk();
                        customer.hold(grant)?;
                        self.scheduler
                            .schedule_at(Event::DeskGranted { customer: id, desk }, self.now);
                    }
                    Admission::Queued { position } => {
                        debug!("customer {} waits at position {}", id, position);
                    }
                }
            }
            Event::DeskGranted { customer: id, desk } => {
                let customer = self
                    .customers
                    .get_mut(&id)
                    .ok_or(SimulationError::UnknownCustomer(id))?;
                let waiting_time = customer.start_service(self.now)?;
                let service = self.random.service_time();
                let end = self.now + service;

                self.stats
                    .record_service_start(waiting_time, desk, self.now, end);
                self.scheduler.schedule_at(Event::ServiceDone(id), end);
            }
            Event::ServiceDone(id) => {
                let mut customer = self
                    .customers
                    .remove(&id)
                    .ok_or(SimulationError::UnknownCustomer(id))?;
                let (grant, visit) = customer.depart(self.now)?;

                if let Some(next) = self.pool.release(grant)? {
                    let next_id = next.customer();
                    let desk = next.desk();
                    self.customers
                        .get_mut(&next_id)
                        .ok_or(SimulationError::UnknownCustomer(next_id))?
                        .hold(next)?;
                    self.scheduler.schedule_at(
                        Event::DeskGranted {
                            customer: next_id,
                            desk,
                        },
                        self.now,
                    );
                }

                self.stats.record_departure(&visit);
                self.sample_queue_length();
                for observer in &mut self.observers {
                    observer.on_departure(&visit);
                }
            }
            Event::MonitorTick => {
                self.sample_queue_length();
                self.scheduler
                    .schedule_at(Event::MonitorTick, self.now + MONITOR_INTERVAL);
            }
        }
        Ok(())
    }

    fn sample_queue_length(&mut self) {
        self.stats
            .record_queue_length(self.now, self.pool.queue_length());
    }

    /// Stop at the horizon: pending events are discarded and customers still
    /// in the shop are dropped without contributing statistics.
    fn halt(&mut self) {
        let discarded = self.scheduler.clear();
        let dropped = self.customers.len();
        self.customers.clear();
        self.now = self.config.horizon;

        debug!(
            "halted at t={}: discarded {} events, dropped {} customers",
            self.now, discarded, dropped
        );
        for observer in &mut self.observers {
            observer.on_halt(self.now, discarded, dropped);
        }
    }

    /// Get current simulation time
    pub fn current_time(&self) -> SimTime {
        self.now
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Observations gathered so far
    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    pub fn pool(&self) -> &DeskPool {
        &self.pool
    }

    /// Customers currently in the shop
    pub fn customers_in_shop(&self) -> usize {
        self.customers.len()
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }
}

/// Run one simulation for `config` on a fresh engine
pub fn run_simulation(config: SimulationConfig) -> Result<SimulationResults, SimulationError> {
    SimulationEngine::new(config)?.run()
}
