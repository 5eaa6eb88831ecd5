use thiserror::Error;

/// Errors raised by tickets and service types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The given name is not one of the offered services
    #[error("invalid service type `{0}`, expected one of change_oil, inflate_tires, diagnostic")]
    InvalidServiceType(String),

    /// The ticket already carries a number
    #[error("ticket #{ticket} already has a number")]
    NumberAlreadyAssigned {
        /// Number the ticket already carries
        ticket: u32,
    },

    /// Ticket numbers start at 1, `0` marks an unassigned ticket
    #[error("ticket numbers must be positive")]
    InvalidTicketNumber,

    /// Every ticket number up to `u32::MAX - 1` has been handed out
    #[error("no ticket numbers left")]
    TicketNumbersExhausted,
}

/// Shorthand for results carrying an [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;
