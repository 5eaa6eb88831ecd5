//! 🏗 Infrastructure shared by the counter, the HTTP server and the tests:
//! service types, tickets and request handling.
#![warn(missing_docs)]

mod error;
mod request;
mod ticket;

pub use error::{Error, Result};
pub use request::{RawRequest, Request, RequestHandler, RequestKind, RequestMethod};
pub use ticket::{ServiceType, Ticket};

/// Queue lengths in priority order, see [`ServiceType::ALL`]
pub type QueueCounts = [usize; ServiceType::COUNT];
