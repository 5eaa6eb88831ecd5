//! Implementation of the service counter answering browser requests
use std::fmt::Write;
use std::sync::Arc;

use hypercar_core::{Request, RequestHandler, RequestKind, ServiceType};
use tracing::{debug, info, warn};

use crate::scheduler::Scheduler;

const WELCOME: &str = "<h2>Welcome to the Hypercar Service!</h2>";

/// The service counter
///
/// ⚠️ This struct must implement the [`RequestHandler`] trait, it is shared by
/// all threads of the HTTP server.
pub struct Counter {
    scheduler: Arc<Scheduler>,
}

impl Counter {
    /// Create a new [`Counter`] serving the tickets of `scheduler`
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }
}

/// Render the menu of offered services
fn menu() -> String {
    let mut s = String::from("<h2>Menu</h2>\n");
    for ty in ServiceType::ALL {
        // writing into a String never fails
        let _ = writeln!(s, "<a href=\"/get_ticket/{}\">{}</a><br>", ty.slug(), ty.label());
    }
    s
}

impl RequestHandler for Counter {
    fn handle(&self, rq: Request) {
        debug!(
            id = %rq.id(),
            method = ?rq.method(),
            url = rq.url(),
            "handling request"
        );

        match *rq.kind() {
            RequestKind::Welcome => rq.respond_with_string(WELCOME),
            RequestKind::Menu => rq.respond_with_string(menu()),
            RequestKind::GetTicket(service_type) => match self.scheduler.enqueue(service_type) {
                Ok((number, wait)) => rq.respond_with_ticket(number, wait),
                Err(e) => {
                    warn!(%service_type, "could not issue ticket: {e}");
                    rq.respond_with_err(e.to_string());
                }
            },
            RequestKind::ProcessingStatus => {
                rq.respond_with_queue_status(self.scheduler.status());
            }
            RequestKind::CallNext => {
                let ticket = self.scheduler.advance_to_processing();
                match ticket {
                    Some(ticket) => info!(
                        ticket = ticket.number(),
                        service_type = %ticket.service_type(),
                        "calling next client"
                    ),
                    None => info!("no client waiting"),
                }
                rq.respond_with_next(ticket.map(|t| t.number()));
            }
            RequestKind::NextTicket => {
                let ticket = self.scheduler.current_processing_ticket();
                rq.respond_with_next(ticket.map(|t| t.number()));
            }
            RequestKind::Debug => {
                let stats = self.scheduler.stats();
                let [oil, tires, diagnostic] = self.scheduler.status();
                rq.respond_with_string(format!(
                    "issued: {}\ncalled: {}\nwaiting: {oil} change_oil, {tires} inflate_tires, {diagnostic} diagnostic",
                    stats.issued, stats.called,
                ));
            }
        }
    }

    fn shutdown(self) {
        let stats = self.scheduler.stats();
        info!(
            issued = stats.issued,
            called = stats.called,
            waiting = stats.waiting(),
            "counter closed"
        );
    }
}
