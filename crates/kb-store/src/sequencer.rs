//! Request sequencing for load actions
//!
//! Each load takes a ticket for its resource before calling the backend. Only a response
//! carrying the latest ticket may touch the cache.

use kb_core::Id;
use parking_lot::Mutex;

/// Cached resources that are loaded as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Projects,
    Project,
    Board,
}

/// Sequence number issued for one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    resource: Resource,
    seq: u64,
}

impl Ticket {
    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Latest ticket of one resource and the record it asked for
#[derive(Debug, Default)]
struct Slot {
    seq: u64,
    target: Option<Id>,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    projects: Mutex<Slot>,
    project: Mutex<Slot>,
    board: Mutex<Slot>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, resource: Resource) -> &Mutex<Slot> {
        match resource {
            Resource::Projects => &self.projects,
            Resource::Project => &self.project,
            Resource::Board => &self.board,
        }
    }

    fn bump(&self, resource: Resource, target: Option<Id>) -> Ticket {
        let mut slot = self.slot(resource).lock();
        slot.seq += 1;
        slot.target = target;
        Ticket {
            resource,
            seq: slot.seq,
        }
    }

    /// Issue the next ticket, superseding every earlier one for the resource
    pub fn issue(&self, resource: Resource) -> Ticket {
        self.bump(resource, None)
    }

    /// Issue the next ticket for a load of one record
    pub fn issue_for(&self, resource: Resource, target: Id) -> Ticket {
        self.bump(resource, Some(target))
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.slot(ticket.resource).lock().seq == ticket.seq
    }

    /// Supersede in-flight loads without starting a new one
    pub fn invalidate(&self, resource: Resource) {
        self.bump(resource, None);
    }

    /// Supersede the in-flight load only if it asked for `target`.
    ///
    /// Returns whether a load was superseded.
    pub fn invalidate_target(&self, resource: Resource, target: Id) -> bool {
        let mut slot = self.slot(resource).lock();
        if slot.target != Some(target) {
            return false;
        }
        slot.seq += 1;
        slot.target = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.issue(Resource::Project);
        let second = sequencer.issue(Resource::Project);

        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
        assert!(second.seq() > first.seq());
    }

    #[test]
    fn test_resources_are_independent() {
        let sequencer = RequestSequencer::new();
        let board = sequencer.issue(Resource::Board);
        sequencer.issue(Resource::Project);
        sequencer.issue(Resource::Projects);

        assert!(sequencer.is_current(board));
        assert_eq!(board.resource(), Resource::Board);
    }

    #[test]
    fn test_invalidate_supersedes_in_flight() {
        let sequencer = RequestSequencer::new();
        let ticket = sequencer.issue(Resource::Board);
        sequencer.invalidate(Resource::Board);
        assert!(!sequencer.is_current(ticket));
    }

    #[test]
    fn test_invalidate_target_only_hits_matching_load() {
        let sequencer = RequestSequencer::new();
        let ticket = sequencer.issue_for(Resource::Project, 2);

        assert!(!sequencer.invalidate_target(Resource::Project, 1));
        assert!(sequencer.is_current(ticket));

        assert!(sequencer.invalidate_target(Resource::Project, 2));
        assert!(!sequencer.is_current(ticket));
        // Already superseded, nothing left to hit
        assert!(!sequencer.invalidate_target(Resource::Project, 2));
    }
}
