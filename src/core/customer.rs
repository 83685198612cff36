use super::errors::SimulationError;
use super::resource_pool::DeskGrant;
use super::types::{CustomerId, DeskId, SimTime};

/// Where a customer is in their visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerState {
    Shopping,
    Queueing,
    InService,
    Departed,
}

impl CustomerState {
    pub fn name(&self) -> &'static str {
        match self {
            CustomerState::Shopping => "shopping",
            CustomerState::Queueing => "queueing",
            CustomerState::InService => "in service",
            CustomerState::Departed => "departed",
        }
    }
}

/// Timeline of a customer who completed service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedVisit {
    pub customer: CustomerId,
    pub desk: DeskId,
    pub arrival_time: SimTime,
    pub queue_join_time: SimTime,
    pub queue_exit_time: SimTime,
    pub departure_time: SimTime,
}

impl CompletedVisit {
    /// Time between joining the checkout line and reaching a desk
    pub fn waiting_time(&self) -> SimTime {
        self.queue_exit_time - self.queue_join_time
    }

    /// Time from walking in to leaving
    pub fn time_in_shop(&self) -> SimTime {
        self.departure_time - self.arrival_time
    }
}

/// One customer's visit, owned by the engine until it departs or the run halts
#[derive(Debug)]
pub struct Customer {
    id: CustomerId,
    state: CustomerState,
    arrival_time: SimTime,
    queue_join_time: Option<SimTime>,
    queue_exit_time: Option<SimTime>,
    grant: Option<DeskGrant>,
}

impl Customer {
    /// Customer walks in at `now` and starts shopping
    pub fn arrive(id: CustomerId, now: SimTime) -> Self {
        Self {
            id,
            state: CustomerState::Shopping,
            arrival_time: now,
            queue_join_time: None,
            queue_exit_time: None,
            grant: None,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn state(&self) -> CustomerState {
        self.state
    }

    pub fn arrival_time(&self) -> SimTime {
        self.arrival_time
    }

    /// Desk held by this customer, once granted
    pub fn desk(&self) -> Option<DeskId> {
        self.grant.as_ref().map(DeskGrant::desk)
    }

    /// Shopping finished: join the checkout line
    pub fn join_queue(&mut self, now: SimTime) -> Result<(), SimulationError> {
        self.expect_state(CustomerState::Shopping, "join the queue")?;
        self.queue_join_time = Some(now);
        self.state = CustomerState::Queueing;
        Ok(())
    }

    /// Record the desk the pool granted. The customer keeps queueing until
    /// its resumption is dispatched.
    pub fn hold(&mut self, grant: DeskGrant) -> Result<(), SimulationError> {
        self.expect_state(CustomerState::Queueing, "hold a desk")?;
        if self.grant.is_some() {
            return Err(self.invalid("hold a second desk"));
        }
        self.grant = Some(grant);
        Ok(())
    }

    /// Leave the line and start service at the held desk.
    ///
    /// Returns the time spent waiting.
    pub fn start_service(&mut self, now: SimTime) -> Result<SimTime, SimulationError> {
        self.expect_state(CustomerState::Queueing, "start service")?;
        if self.grant.is_none() {
            return Err(self.invalid("start service without a desk"));
        }
        let joined = self
            .queue_join_time
            .ok_or_else(|| self.invalid("start service before joining the queue"))?;
        self.queue_exit_time = Some(now);
        self.state = CustomerState::InService;
        Ok(now - joined)
    }

    /// Service finished: give back the desk and leave the shop
    pub fn depart(&mut self, now: SimTime) -> Result<(DeskGrant, CompletedVisit), SimulationError> {
        self.expect_state(CustomerState::InService, "depart")?;
        let (Some(queue_join_time), Some(queue_exit_time)) =
            (self.queue_join_time, self.queue_exit_time)
        else {
            return Err(self.invalid("depart without a queue record"));
        };
        let grant = self
            .grant
            .take()
            .ok_or_else(|| self.invalid("depart without a desk"))?;

        self.state = CustomerState::Departed;
        let visit = CompletedVisit {
            customer: self.id,
            desk: grant.desk(),
            arrival_time: self.arrival_time,
            queue_join_time,
            queue_exit_time,
            departure_time: now,
        };
        Ok((grant, visit))
    }

    fn expect_state(&self, expected: CustomerState, action: &'static str) -> Result<(), SimulationError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> SimulationError {
        SimulationError::InvalidTransition {
            customer: self.id,
            action,
            state: self.state.name(),
        }
    }
}
