use super::collector::StatsCollector;
use crate::core::types::{DeskId, SimTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Summary of a finished run.
///
/// Built once, after the engine halts, and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResults {
    pub total_customers_arrived: u64,
    pub total_customers_served: u64,

    pub avg_waiting_time: f64,
    pub max_waiting_time: f64,
    pub waiting_time_distribution: Vec<f64>,

    pub avg_time_in_shop: f64,
    pub max_time_in_shop: f64,
    pub time_in_shop_distribution: Vec<f64>,

    pub avg_queue_length: f64,
    pub max_queue_length: usize,
    /// (minute, customers at checkout) sorted by minute
    pub queue_length_time_series: Vec<(u64, usize)>,

    /// Fraction of the horizon each desk spent serving; every desk present
    pub cash_desk_utilization: BTreeMap<DeskId, f64>,
    pub avg_cash_desk_utilization: f64,
}

impl SimulationResults {
    /// Reduce the observations of a run over `horizon` minutes with `desk_count` desks
    pub fn from_stats(stats: &StatsCollector, horizon: SimTime, desk_count: usize) -> Self {
        let (avg_waiting_time, max_waiting_time) = mean_and_max(&stats.waiting_times);
        let (avg_time_in_shop, max_time_in_shop) = mean_and_max(&stats.times_in_shop);

        let queue_length_time_series: Vec<(u64, usize)> = stats
            .queue_lengths
            .iter()
            .map(|(&minute, &length)| (minute, length))
            .collect();
        let max_queue_length = stats.queue_lengths.values().copied().max().unwrap_or(0);
        let avg_queue_length = if stats.queue_lengths.is_empty() {
            0.0
        } else {
            stats.queue_lengths.values().sum::<usize>() as f64 / stats.queue_lengths.len() as f64
        };

        let mut cash_desk_utilization: BTreeMap<DeskId, f64> =
            (0..desk_count).map(|desk| (desk, 0.0)).collect();
        let mut total_busy_time = 0.0;
        for (&desk, intervals) in &stats.desk_usage {
            if desk >= desk_count {
                continue;
            }
            let busy: f64 = intervals
                .iter()
                .map(|&(start, end)| (end.min(horizon) - start).max(0.0))
                .sum();
            cash_desk_utilization.insert(desk, ratio(busy, horizon));
            total_busy_time += busy;
        }

        let avg_cash_desk_utilization = if desk_count == 0 {
            0.0
        } else {
            ratio(total_busy_time, horizon * desk_count as f64)
        };

        Self {
            total_customers_arrived: stats.customers_arrived,
            total_customers_served: stats.customers_served,
            avg_waiting_time,
            max_waiting_time,
            waiting_time_distribution: stats.waiting_times.clone(),
            avg_time_in_shop,
            max_time_in_shop,
            time_in_shop_distribution: stats.times_in_shop.clone(),
            avg_queue_length,
            max_queue_length,
            queue_length_time_series,
            cash_desk_utilization,
            avg_cash_desk_utilization,
        }
    }

    /// Headline numbers as plain text
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Customers arrived:      {}", self.total_customers_arrived);
        let _ = writeln!(out, "Customers served:       {}", self.total_customers_served);
        let _ = writeln!(
            out,
            "Waiting time (min):     avg {:.2}, max {:.2}",
            self.avg_waiting_time, self.max_waiting_time
        );
        let _ = writeln!(
            out,
            "Time in shop (min):     avg {:.2}, max {:.2}",
            self.avg_time_in_shop, self.max_time_in_shop
        );
        let _ = writeln!(
            out,
            "Queue length:           avg {:.2}, max {}",
            self.avg_queue_length, self.max_queue_length
        );
        for (desk, utilization) in &self.cash_desk_utilization {
            let _ = writeln!(out, "Desk {} utilization:    {:.1}%", desk + 1, utilization * 100.0);
        }
        let _ = writeln!(
            out,
            "Overall utilization:    {:.1}%",
            self.avg_cash_desk_utilization * 100.0
        );
        out
    }
}

fn mean_and_max(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (mean, max)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats_give_zero_defaults() {
        let results = SimulationResults::from_stats(&StatsCollector::new(), 0.0, 2);
        assert_eq!(results.total_customers_arrived, 0);
        assert_eq!(results.avg_waiting_time, 0.0);
        assert_eq!(results.max_time_in_shop, 0.0);
        assert_eq!(results.avg_queue_length, 0.0);
        assert_eq!(results.max_queue_length, 0);
        assert!(results.queue_length_time_series.is_empty());
        assert_eq!(results.cash_desk_utilization.len(), 2);
        assert_eq!(results.avg_cash_desk_utilization, 0.0);
    }

    #[test]
    fn test_averages_and_maxima() {
        let mut stats = StatsCollector::new();
        stats.waiting_times = vec![0.0, 2.0, 4.0];
        stats.times_in_shop = vec![10.0, 20.0];
        stats.record_queue_length(0.0, 1);
        stats.record_queue_length(1.0, 3);
        stats.record_queue_length(1.5, 2);

        let results = SimulationResults::from_stats(&stats, 60.0, 1);
        assert_eq!(results.avg_waiting_time, 2.0);
        assert_eq!(results.max_waiting_time, 4.0);
        assert_eq!(results.avg_time_in_shop, 15.0);
        assert_eq!(results.max_time_in_shop, 20.0);
        assert_eq!(results.queue_length_time_series, vec![(0, 1), (1, 2)]);
        assert_eq!(results.avg_queue_length, 1.5);
        assert_eq!(results.max_queue_length, 2);
    }

    #[test]
    fn test_utilization_defaults_and_clipping() {
        let mut stats = StatsCollector::new();
        stats.record_service_start(0.0, 0, 0.0, 30.0);
        stats.record_service_start(0.0, 0, 90.0, 130.0);
        stats.record_service_start(0.0, 2, 50.0, 60.0);

        let results = SimulationResults::from_stats(&stats, 100.0, 3);
        assert_eq!(results.cash_desk_utilization[&0], 0.4);
        assert_eq!(results.cash_desk_utilization[&1], 0.0);
        assert_eq!(results.cash_desk_utilization[&2], 0.1);
        assert!((results.avg_cash_desk_utilization - 50.0 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_desks_means_zero_utilization() {
        let results = SimulationResults::from_stats(&StatsCollector::new(), 100.0, 0);
        assert!(results.cash_desk_utilization.is_empty());
        assert_eq!(results.avg_cash_desk_utilization, 0.0);
    }

    #[test]
    fn test_summary_lists_every_desk() {
        let results = SimulationResults::from_stats(&StatsCollector::new(), 10.0, 2);
        let text = results.summary();
        assert!(text.contains("Desk 1 utilization"));
        assert!(text.contains("Desk 2 utilization"));
        assert!(text.contains("Customers served:       0"));
    }
}
