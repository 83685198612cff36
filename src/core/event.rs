use super::types::{CustomerId, DeskId};

/// A resumption point on the event queue.
///
/// Every suspension of the arrival stream, the queue monitor or a customer
/// is represented by exactly one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Arrival stream starts and draws its first interarrival gap
    ArrivalsStart,
    /// Interarrival gap elapsed: a new customer walks in
    Arrival,
    /// Customer process starts running
    CustomerEnter(CustomerId),
    /// Shopping finished, customer joins the checkout queue
    ShoppingDone(CustomerId),
    /// Customer reached the head of the queue and holds a desk
    DeskGranted { customer: CustomerId, desk: DeskId },
    /// Service finished, customer leaves the shop
    ServiceDone(CustomerId),
    /// Periodic queue-length sample
    MonitorTick,
}

impl Event {
    /// Customer this event belongs to, if any
    pub fn customer(&self) -> Option<CustomerId> {
        match *self {
            Event::CustomerEnter(id)
            | Event::ShoppingDone(id)
            | Event::ServiceDone(id)
            | Event::DeskGranted { customer: id, .. } => Some(id),
            Event::ArrivalsStart | Event::Arrival | Event::MonitorTick => None,
        }
    }
}
