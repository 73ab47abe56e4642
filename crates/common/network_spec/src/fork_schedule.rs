use std::slice::Iter;

use ream_consensus_misc::fork::Fork;

/// Every fork of a network in activation order, including those not yet scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkSchedule(pub [Fork; ForkSchedule::TOTAL]);

impl ForkSchedule {
    pub const TOTAL: usize = 6;

    pub fn iter(&self) -> Iter<'_, Fork> {
        self.0.iter()
    }

    pub fn scheduled(&self) -> impl Iterator<Item = &Fork> {
        self.iter()
            .filter(|fork| fork.epoch != Fork::UNSCHEDULED_EPOCH)
    }

    /// Return the latest fork activated at or before ``epoch``.
    pub fn fork_at_epoch(&self, epoch: u64) -> Fork {
        self.scheduled()
            .filter(|fork| fork.epoch <= epoch)
            .last()
            .copied()
            .unwrap_or(self.0[0])
    }
}
