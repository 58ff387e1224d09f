// src/session/sequencer.rs

use crate::error::{MediaError, Result};

/// Token attached to one upload request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTicket(u64);

impl UploadTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Orders upload results without cancelling anything.
///
/// A result is accepted only if its ticket is newer than every result already
/// settled and newer than the last invalidation. Requests completing in issue
/// order all apply; an older request finishing after a newer one is dropped.
#[derive(Debug, Default)]
pub struct UploadSequencer {
    issued: u64,
    floor: u64,
}

impl UploadSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> UploadTicket {
        self.issued += 1;
        UploadTicket(self.issued)
    }

    /// Makes every ticket issued so far stale.
    pub fn invalidate(&mut self) {
        self.floor = self.issued;
    }

    pub fn latest(&self) -> u64 {
        self.issued
    }

    pub fn check(&self, ticket: UploadTicket) -> Result<()> {
        if ticket.0 > self.floor {
            Ok(())
        } else {
            Err(MediaError::StaleResultDiscarded {
                ticket: ticket.0,
                latest: self.issued,
            })
        }
    }

    /// Checks the ticket and, if current, records it as settled. Call this
    /// for failed decodes too, so older requests cannot land afterwards.
    pub fn settle(&mut self, ticket: UploadTicket) -> Result<()> {
        self.check(ticket)?;
        self.floor = ticket.0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_completions_all_apply() {
        let mut seq = UploadSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        assert!(seq.settle(a).is_ok());
        assert!(seq.settle(b).is_ok());
    }

    #[test]
    fn older_result_after_newer_is_stale() {
        let mut seq = UploadSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        seq.settle(b).unwrap();
        let err = seq.settle(a).unwrap_err();
        assert!(matches!(err, MediaError::StaleResultDiscarded { ticket: 1, latest: 2 }));
    }

    #[test]
    fn invalidate_drops_everything_pending() {
        let mut seq = UploadSequencer::new();
        let a = seq.issue();
        seq.invalidate();
        assert!(seq.check(a).is_err());
        let b = seq.issue();
        assert!(seq.settle(b).is_ok());
    }

    #[test]
    fn settling_newer_ticket_retires_older_ones() {
        let mut seq = UploadSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        // The newer request failed to decode but still settles.
        seq.settle(b).unwrap();
        assert!(seq.check(a).is_err());
    }

    #[test]
    fn a_ticket_applies_once() {
        let mut seq = UploadSequencer::new();
        let a = seq.issue();
        seq.settle(a).unwrap();
        assert!(seq.settle(a).is_err());
    }
}
