//! :car: The service counter: ticket scheduling and request handling.
//!
//! The [scheduler] keeps one queue per [`ServiceType`], hands out ticket
//! numbers with a wait estimate and moves tickets to processing in priority
//! order. The [counter] answers browser requests using a shared scheduler.
//!
//! [`ServiceType`]: hypercar_core::ServiceType

#![allow(rustdoc::private_intra_doc_links)]
use std::sync::Arc;

mod counter;
mod scheduler;

pub use counter::Counter;
pub use scheduler::{Scheduler, SchedulerStats};

/// Entrypoint of the counter
///
/// Creates the process-wide scheduler and the counter serving it. Every
/// thread of the surrounding infrastructure shares the returned counter.
pub fn launch() -> Counter {
    let scheduler = Arc::new(Scheduler::new());
    tracing::info!("counter opened");
    Counter::new(scheduler)
}
