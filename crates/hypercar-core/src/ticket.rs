use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Kind of work a customer can request at the counter
///
/// The declaration order is the serving priority: oil changes are always
/// served before tire inflations, which are served before diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum ServiceType {
    /// Change the oil, takes 2 minutes
    ChangeOil,
    /// Inflate the tires, takes 5 minutes
    InflateTires,
    /// Run a diagnostic test, takes 30 minutes
    Diagnostic,
}

impl ServiceType {
    /// Number of service types
    pub const COUNT: usize = 3;

    /// All service types, highest priority first
    pub const ALL: [ServiceType; Self::COUNT] = [
        ServiceType::ChangeOil,
        ServiceType::InflateTires,
        ServiceType::Diagnostic,
    ];

    /// Minutes the counter needs to serve one ticket of this type
    #[inline]
    pub const fn duration_minutes(self) -> u32 {
        match self {
            ServiceType::ChangeOil => 2,
            ServiceType::InflateTires => 5,
            ServiceType::Diagnostic => 30,
        }
    }

    /// Position in [`Self::ALL`], `0` being the highest priority
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name used in URLs, e.g. `change_oil`
    pub const fn slug(self) -> &'static str {
        match self {
            ServiceType::ChangeOil => "change_oil",
            ServiceType::InflateTires => "inflate_tires",
            ServiceType::Diagnostic => "diagnostic",
        }
    }

    /// Human readable label shown on the menu
    pub const fn label(self) -> &'static str {
        match self {
            ServiceType::ChangeOil => "Change oil",
            ServiceType::InflateTires => "Inflate tires",
            ServiceType::Diagnostic => "Get diagnostic test",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ServiceType::ALL
            .into_iter()
            .find(|ty| ty.slug() == s)
            .ok_or_else(|| Error::InvalidServiceType(s.to_owned()))
    }
}

/// A numbered request for one service
///
/// Tickets are created unnumbered (number `0`) and receive their number once,
/// when the scheduler puts them into a queue.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Ticket {
    number: u32,
    service_type: ServiceType,
}

impl Ticket {
    /// Create a new, unnumbered ticket
    #[inline]
    pub fn new(service_type: ServiceType) -> Self {
        Self {
            number: 0,
            service_type,
        }
    }

    /// Assign the ticket's number
    ///
    /// Fails if the ticket already has a number or if `number` is `0`. The
    /// ticket is left untouched in both cases.
    pub fn assign_number(&mut self, number: u32) -> Result<()> {
        if self.is_numbered() {
            return Err(Error::NumberAlreadyAssigned {
                ticket: self.number,
            });
        }
        if number == 0 {
            return Err(Error::InvalidTicketNumber);
        }
        self.number = number;
        Ok(())
    }

    /// The ticket's number, `0` while unassigned
    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Whether a number has been assigned
    #[inline]
    pub fn is_numbered(&self) -> bool {
        self.number != 0
    }

    /// The requested service
    #[inline]
    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    /// Minutes needed to serve this ticket
    #[inline]
    pub fn service_duration(&self) -> u32 {
        self.service_type.duration_minutes()
    }
}
