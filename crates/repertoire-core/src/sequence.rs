//! Sequence numbers for "latest request wins" lookups.

/// Tag attached to an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and decides which responses may still be applied.
///
/// Only the most recently issued ticket is current. A response carrying an
/// older ticket arrived after something superseded it and must be dropped.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: u64,
    accepted: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Mark everything in flight as stale without issuing a new request.
    pub fn invalidate(&mut self) {
        self.issued += 1;
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Returns true if a response for `ticket` should be applied, and records it.
    pub fn accept(&mut self, ticket: RequestTicket) -> bool {
        if self.is_current(ticket) && ticket.0 > self.accepted {
            self.accepted = ticket.0;
            true
        } else {
            false
        }
    }
}
