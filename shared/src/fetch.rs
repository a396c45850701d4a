//! Fetch generations
//!
//! Each fetch that populates a store takes a ticket. Only the ticket of the
//! latest generation may write its result; anything older is stale and
//! dropped. Invalidating (view discarded, parameters changed) bumps the
//! generation without issuing a ticket.

/// Proof that a fetch was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    /// Ticket that is never current, for fetches whose store is gone.
    pub const DETACHED: FetchTicket = FetchTicket(0);

    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchGuard {
    generation: u64,
}

impl FetchGuard {
    /// Starts a new fetch; all earlier tickets become stale.
    pub fn issue(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket != FetchTicket::DETACHED && ticket.0 == self.generation
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let mut guard = FetchGuard::default();
        let first = guard.issue();
        let second = guard.issue();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[test]
    fn test_invalidate_stales_outstanding_ticket() {
        let mut guard = FetchGuard::default();
        let ticket = guard.issue();
        guard.invalidate();
        assert!(!guard.is_current(ticket));
        let fresh = guard.issue();
        assert!(guard.is_current(fresh));
    }

    #[test]
    fn test_detached_ticket_never_current() {
        let guard = FetchGuard::default();
        assert!(!guard.is_current(FetchTicket::DETACHED));
    }
}
