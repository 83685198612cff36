use crate::core::customer::CompletedVisit;
use crate::core::types::{minute_bucket, DeskId, SimTime};
use std::collections::BTreeMap;

/// Busy interval of a desk as (start, end)
pub type BusyInterval = (SimTime, SimTime);

/// Observations accumulated while a run is in progress
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    /// Customers who walked in
    pub customers_arrived: u64,
    /// Customers who completed service
    pub customers_served: u64,
    /// Waiting time of every customer granted a desk, in grant order
    pub waiting_times: Vec<SimTime>,
    /// Time in shop of every departed customer, in departure order
    pub times_in_shop: Vec<SimTime>,
    /// Latest checkout queue length seen in each integer minute
    pub queue_lengths: BTreeMap<u64, usize>,
    /// Busy intervals per desk
    pub desk_usage: BTreeMap<DeskId, Vec<BusyInterval>>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_arrival(&mut self) {
        self.customers_arrived += 1;
    }

    /// Store `length` under the minute containing `now`, replacing any
    /// earlier sample from the same minute.
    pub fn record_queue_length(&mut self, now: SimTime, length: usize) {
        self.queue_lengths.insert(minute_bucket(now), length);
    }

    /// A customer reached a desk after `waiting_time` and will hold it
    /// from `start` until `end`
    pub fn record_service_start(&mut self, waiting_time: SimTime, desk: DeskId, start: SimTime, end: SimTime) {
        self.waiting_times.push(waiting_time);
        self.desk_usage.entry(desk).or_default().push((start, end));
    }

    pub fn record_departure(&mut self, visit: &CompletedVisit) {
        self.times_in_shop.push(visit.time_in_shop());
        self.customers_served += 1;
    }
}
