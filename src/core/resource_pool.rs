use super::errors::SimulationError;
use super::types::{CustomerId, DeskId};
use log::trace;
use std::collections::VecDeque;

/// Proof of holding one checkout desk.
///
/// Only the pool creates grants and `DeskPool::release` consumes them, so a
/// desk cannot be released twice.
#[derive(Debug, PartialEq, Eq)]
pub struct DeskGrant {
    desk: DeskId,
    customer: CustomerId,
}

impl DeskGrant {
    pub fn desk(&self) -> DeskId {
        self.desk
    }

    pub fn customer(&self) -> CustomerId {
        self.customer
    }
}

/// Outcome of asking the pool for a desk
#[derive(Debug, PartialEq, Eq)]
pub enum Admission {
    /// A desk was free and nobody was waiting ahead
    Granted(DeskGrant),
    /// The customer joined the back of the waiting line
    Queued { position: usize },
}

/// Fixed-capacity pool of checkout desks with a FIFO waiting line.
///
/// `busy` holds the customer currently served at each desk. The number of
/// occupied entries always equals `active`.
#[derive(Debug, Clone)]
pub struct DeskPool {
    waiters: VecDeque<CustomerId>,
    busy: Vec<Option<CustomerId>>,
    active: usize,
}

impl DeskPool {
    /// Create a pool of `capacity` idle desks
    pub fn new(capacity: usize) -> Self {
        Self {
            waiters: VecDeque::new(),
            busy: vec![None; capacity],
            active: 0,
        }
    }

    /// Request a desk for `customer`, granting immediately when possible
    pub fn request(&mut self, customer: CustomerId) -> Admission {
        if self.waiters.is_empty() {
            if let Some(grant) = self.grant_free_desk(customer) {
                return Admission::Granted(grant);
            }
        }

        self.waiters.push_back(customer);
        trace!(
            "customer {} queued at position {}",
            customer,
            self.waiters.len()
        );
        Admission::Queued {
            position: self.waiters.len(),
        }
    }

    /// Give a desk back and hand it to the longest waiter, if any.
    ///
    /// Returns the grant made to that waiter.
    pub fn release(&mut self, grant: DeskGrant) -> Result<Option<DeskGrant>, SimulationError> {
        let slot = self
            .busy
            .get_mut(grant.desk)
            .ok_or(SimulationError::DeskOutOfRange(grant.desk))?;
        if slot.take().is_none() {
            return Err(SimulationError::DeskNotBusy(grant.desk));
        }
        self.active -= 1;
        trace!("customer {} released desk {}", grant.customer, grant.desk);

        match self.waiters.pop_front() {
            Some(next) => Ok(self.grant_free_desk(next)),
            None => Ok(None),
        }
    }

    fn grant_free_desk(&mut self, customer: CustomerId) -> Option<DeskGrant> {
        let desk = self.busy.iter().position(Option::is_none)?;
        self.busy[desk] = Some(customer);
        self.active += 1;
        trace!("desk {} granted to customer {}", desk, customer);
        Some(DeskGrant { desk, customer })
    }

    /// Number of desks
    pub fn capacity(&self) -> usize {
        self.busy.len()
    }

    /// Customers waiting for a desk
    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }

    /// Desks currently serving a customer
    pub fn active(&self) -> usize {
        self.active
    }

    /// Customers at checkout: waiting plus in service
    pub fn queue_length(&self) -> usize {
        self.waiters.len() + self.active
    }

    pub fn is_busy(&self, desk: DeskId) -> bool {
        matches!(self.busy.get(desk), Some(Some(_)))
    }

    /// Count busy flags directly, independent of the active counter
    pub fn busy_desks(&self) -> usize {
        self.busy.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            capacity: self.capacity(),
            waiting: self.waiting(),
            active: self.active,
            busy_desks: self.busy_desks(),
        }
    }
}

/// Point-in-time view of the pool, handed to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub capacity: usize,
    pub waiting: usize,
    pub active: usize,
    pub busy_desks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(admission: Admission) -> DeskGrant {
        match admission {
            Admission::Granted(grant) => grant,
            Admission::Queued { position } => panic!("expected a grant, queued at {}", position),
        }
    }

    #[test]
    fn test_grants_lowest_free_desk() {
        let mut pool = DeskPool::new(3);
        let a = granted(pool.request(1));
        let b = granted(pool.request(2));
        assert_eq!((a.desk(), b.desk()), (0, 1));

        assert_eq!(pool.release(a).unwrap(), None);
        let c = granted(pool.request(3));
        assert_eq!(c.desk(), 0);
        assert_eq!(pool.active(), 2);
        assert_eq!(pool.busy_desks(), 2);
    }

    #[test]
    fn test_waiters_served_in_fifo_order() {
        let mut pool = DeskPool::new(1);
        let first = granted(pool.request(1));
        assert_eq!(pool.request(2), Admission::Queued { position: 1 });
        assert_eq!(pool.request(3), Admission::Queued { position: 2 });
        assert_eq!(pool.queue_length(), 3);

        let second = pool.release(first).unwrap().expect("waiter 2 should be granted");
        assert_eq!(second.customer(), 2);
        assert_eq!(second.desk(), 0);
        assert_eq!(pool.waiting(), 1);

        let third = pool.release(second).unwrap().expect("waiter 3 should be granted");
        assert_eq!(third.customer(), 3);
        assert_eq!(pool.release(third).unwrap(), None);
        assert_eq!(pool.queue_length(), 0);
    }

    #[test]
    fn test_new_request_does_not_jump_the_line() {
        let mut pool = DeskPool::new(1);
        let held = granted(pool.request(1));
        assert!(matches!(pool.request(2), Admission::Queued { .. }));

        let next = pool.release(held).unwrap().unwrap();
        assert_eq!(next.customer(), 2);
        assert!(matches!(pool.request(3), Admission::Queued { position: 1 }));
    }

    #[test]
    fn test_zero_capacity_never_grants() {
        let mut pool = DeskPool::new(0);
        assert_eq!(pool.request(1), Admission::Queued { position: 1 });
        assert_eq!(pool.request(2), Admission::Queued { position: 2 });
        assert_eq!(pool.active(), 0);
        assert_eq!(pool.queue_length(), 2);
    }

    #[test]
    fn test_snapshot_counts_agree() {
        let mut pool = DeskPool::new(2);
        let _a = granted(pool.request(1));
        let _b = granted(pool.request(2));
        pool.request(3);

        let snapshot = pool.snapshot();
        assert_eq!(snapshot.capacity, 2);
        assert_eq!(snapshot.active, 2);
        assert_eq!(snapshot.busy_desks, 2);
        assert_eq!(snapshot.waiting, 1);
        assert!(pool.is_busy(0) && pool.is_busy(1));
        assert!(!pool.is_busy(2));
    }
}
