//! Implementation of the ticket scheduler
use std::collections::VecDeque;

use hypercar_core::{Error, QueueCounts, Result, ServiceType, Ticket};
use parking_lot::Mutex;
use tracing::debug;

/// Counters describing the scheduler's lifetime
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct SchedulerStats {
    /// Tickets issued so far
    pub issued: u32,
    /// Tickets moved to processing so far
    pub called: u32,
}

impl SchedulerStats {
    /// Tickets that are still queued
    #[inline]
    pub fn waiting(&self) -> u32 {
        self.issued - self.called
    }
}

struct State {
    /// one FIFO queue per service type, indexed by [`ServiceType::index()`]
    queues: [VecDeque<Ticket>; ServiceType::COUNT],
    next_ticket_number: u32,
    /// ticket the operator is currently serving
    processing: Option<Ticket>,
    called: u32,
}

impl State {
    fn queue(&self, service_type: ServiceType) -> &VecDeque<Ticket> {
        &self.queues[service_type.index()]
    }

    fn counts(&self) -> QueueCounts {
        ServiceType::ALL.map(|ty| self.queue(ty).len())
    }
}

/// Minutes needed to serve every queued ticket of equal or higher priority
/// than `service_type`
///
/// Saturates at `u32::MAX` minutes.
fn estimated_wait(counts: QueueCounts, service_type: ServiceType) -> u32 {
    let minutes: u64 = ServiceType::ALL
        .into_iter()
        .take_while(|ty| *ty <= service_type)
        .map(|ty| counts[ty.index()] as u64 * u64::from(ty.duration_minutes()))
        .sum();
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Shared queue state of the service counter
///
/// All operations lock the whole state, so numbering, wait estimation and
/// dequeuing never interleave.
pub struct Scheduler {
    state: Mutex<State>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create a new [`Scheduler`] with empty queues
    ///
    /// The first issued ticket gets number 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    fn starting_at(next_ticket_number: u32) -> Self {
        Self {
            state: Mutex::new(State {
                queues: Default::default(),
                next_ticket_number,
                processing: None,
                called: 0,
            }),
        }
    }

    /// Issue a ticket for `service_type` and put it at the end of its queue.
    ///
    /// Returns the ticket number and the estimated wait in minutes, computed
    /// from the queues as they were before this ticket was added.
    ///
    /// Fails with [`Error::TicketNumbersExhausted`] once `u32::MAX - 1`
    /// tickets have been issued; the state is left untouched then.
    pub fn enqueue(&self, service_type: ServiceType) -> Result<(u32, u32)> {
        let mut ticket = Ticket::new(service_type);

        let mut state = self.state.lock();
        let number = state.next_ticket_number;
        let next = number
            .checked_add(1)
            .ok_or(Error::TicketNumbersExhausted)?;
        ticket.assign_number(number)?;
        let wait = estimated_wait(state.counts(), service_type);
        state.next_ticket_number = next;
        state.queues[service_type.index()].push_back(ticket);
        drop(state);

        debug!(ticket = number, %service_type, wait, "ticket issued");
        Ok((number, wait))
    }

    /// Number of waiting tickets per service, highest priority first
    pub fn status(&self) -> QueueCounts {
        self.state.lock().counts()
    }

    /// Take the next ticket by priority out of its queue and stage it for
    /// processing.
    ///
    /// Returns [`None`] if all queues are empty. The previously staged
    /// ticket is kept in that case.
    pub fn advance_to_processing(&self) -> Option<Ticket> {
        let mut state = self.state.lock();
        let ticket = state
            .queues
            .iter_mut()
            .find_map(|queue| queue.pop_front())?;
        state.processing = Some(ticket);
        state.called += 1;
        drop(state);

        debug!(
            ticket = ticket.number(),
            service_type = %ticket.service_type(),
            "ticket staged for processing"
        );
        Some(ticket)
    }

    /// The ticket currently staged for processing
    pub fn current_processing_ticket(&self) -> Option<Ticket> {
        self.state.lock().processing
    }

    /// Lifetime counters of the scheduler
    pub fn stats(&self) -> SchedulerStats {
        let state = self.state.lock();
        SchedulerStats {
            issued: state.next_ticket_number - 1,
            called: state.called,
        }
    }
}
