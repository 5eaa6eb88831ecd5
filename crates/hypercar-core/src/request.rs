use uuid::Uuid;

use crate::{QueueCounts, ServiceType};

/// Kind of the request
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum RequestKind {
    /// Show the welcome page
    Welcome,

    /// Show the menu of offered services
    Menu,

    /// Issue a ticket for the given service
    ///
    /// The response carries the ticket number and the estimated wait in
    /// minutes.
    GetTicket(ServiceType),

    /// Show the operator menu with the number of waiting tickets per service
    ProcessingStatus,

    /// Move the next ticket (by priority) to processing
    ///
    /// The response carries the number of the called ticket, if any ticket was
    /// waiting.
    CallNext,

    /// Show the ticket currently being processed
    NextTicket,

    /// Useful for sending information for debugging
    Debug,
}

/// Request sent from a web browser
pub struct Request {
    kind: RequestKind,
    id: Uuid,
    raw: Box<dyn RawRequest + Send>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("raw", &format_args!(".."))
            .finish()
    }
}

/// HTTP request method
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum RequestMethod {
    /// GET request
    Get,
    /// POST request, may have a payload
    Post,
}

/// Interface for handling requests from a web browser
pub trait RequestHandler {
    /// Handle a request from a web browser
    ///
    /// This method may be called concurrently from different threads.
    fn handle(&self, request: Request);

    /// Shut the handler down
    fn shutdown(self);
}

/// A raw request, implemented by the HTTP server and the test harness
pub trait RawRequest {
    /// Get the URL
    fn url(&self) -> &str;
    /// Get the request method
    fn method(&self) -> RequestMethod;

    /// Respond with an error message
    fn respond_with_err(self: Box<Self>, err: String, id: Uuid);
    /// Respond with a page of text
    fn respond_with_string(self: Box<Self>, s: String, id: Uuid);
    /// Respond with a freshly issued ticket
    fn respond_with_ticket(self: Box<Self>, number: u32, wait_minutes: u32, id: Uuid);
    /// Respond with the number of waiting tickets per service
    fn respond_with_queue_status(self: Box<Self>, counts: QueueCounts, id: Uuid);
    /// Respond with the number of the ticket to be served, if any
    fn respond_with_next(self: Box<Self>, ticket: Option<u32>, id: Uuid);
}

impl Request {
    /// Get the request's kind
    #[inline]
    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    /// Get the request's id
    ///
    /// Taken from the `X-Request-Id` header if the client sent one, randomly
    /// generated otherwise.
    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the request URL
    #[inline]
    pub fn url(&self) -> &str {
        self.raw.url()
    }

    /// Get the request method
    #[inline]
    pub fn method(&self) -> RequestMethod {
        self.raw.method()
    }

    /// Respond with an error the client cannot fix by retrying right away
    ///
    /// This method blocks until the response has been sent.
    #[inline]
    pub fn respond_with_err(self, err: impl Into<String>) {
        self.raw.respond_with_err(err.into(), self.id);
    }

    /// Respond with a page of text
    ///
    /// This method blocks until the response has been sent.
    #[inline]
    pub fn respond_with_string(self, s: impl Into<String>) {
        self.raw.respond_with_string(s.into(), self.id);
    }

    /// Respond with the number and estimated wait of an issued ticket
    ///
    /// This method blocks until the response has been sent.
    #[inline]
    pub fn respond_with_ticket(self, number: u32, wait_minutes: u32) {
        self.raw.respond_with_ticket(number, wait_minutes, self.id);
    }

    /// Respond with the queue lengths, highest priority first
    ///
    /// This method blocks until the response has been sent.
    #[inline]
    pub fn respond_with_queue_status(self, counts: QueueCounts) {
        self.raw.respond_with_queue_status(counts, self.id);
    }

    /// Respond with the ticket the operator has to serve
    ///
    /// [`None`] means that no client is waiting.
    ///
    /// This method blocks until the response has been sent.
    #[inline]
    pub fn respond_with_next(self, ticket: Option<u32>) {
        self.raw.respond_with_next(ticket, self.id);
    }

    /// Create a new request from a [`RawRequest`]
    #[inline]
    pub fn from_raw(kind: RequestKind, id: Uuid, raw: Box<dyn RawRequest + Send>) -> Self {
        Self { kind, id, raw }
    }
}
