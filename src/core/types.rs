/// Simulated time in minutes since the store opened
pub type SimTime = f64;

/// Sequential identifier handed to each arriving customer, starting at 1
pub type CustomerId = u64;

/// Index of a checkout desk in `[0, desk_count)`
pub type DeskId = usize;

/// Truncate a simulated instant to its integer-minute bucket
pub fn minute_bucket(time: SimTime) -> u64 {
    if time <= 0.0 {
        0
    } else {
        time.trunc() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_bucket_truncates() {
        assert_eq!(minute_bucket(0.0), 0);
        assert_eq!(minute_bucket(0.999), 0);
        assert_eq!(minute_bucket(1.0), 1);
        assert_eq!(minute_bucket(479.5), 479);
    }
}
