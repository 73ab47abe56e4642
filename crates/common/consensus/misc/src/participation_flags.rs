use crate::constants::beacon::{
    NUM_FLAG_INDICES, PARTICIPATION_FLAG_WEIGHTS, TIMELY_HEAD_FLAG_INDEX,
    TIMELY_SOURCE_FLAG_INDEX, TIMELY_TARGET_FLAG_INDEX,
};

/// A single participation flag index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ParticipationFlag {
    TimelySource = TIMELY_SOURCE_FLAG_INDEX,
    TimelyTarget = TIMELY_TARGET_FLAG_INDEX,
    TimelyHead = TIMELY_HEAD_FLAG_INDEX,
}

impl ParticipationFlag {
    /// Every flag, in ascending flag index order.
    pub const ALL: [ParticipationFlag; NUM_FLAG_INDICES] = [
        ParticipationFlag::TimelySource,
        ParticipationFlag::TimelyTarget,
        ParticipationFlag::TimelyHead,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn weight(self) -> u64 {
        PARTICIPATION_FLAG_WEIGHTS[self as usize]
    }
}

/// The participation flags of one validator for one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ParticipationFlags(u8);

impl ParticipationFlags {
    pub const fn new(flags: u8) -> Self {
        Self(flags)
    }

    pub const fn into_inner(self) -> u8 {
        self.0
    }

    /// Return whether ``flags`` has ``flag_index`` set.
    pub const fn has_flag(self, flag: ParticipationFlag) -> bool {
        let flag = 1 << flag.index();
        self.0 & flag == flag
    }

    /// Return a new ``ParticipationFlags`` adding ``flag_index`` to ``flags``.
    #[must_use]
    pub const fn add_flag(self, flag: ParticipationFlag) -> Self {
        Self(self.0 | 1 << flag.index())
    }

}

impl From<u8> for ParticipationFlags {
    fn from(flags: u8) -> Self {
        Self(flags)
    }
}

impl From<ParticipationFlags> for u8 {
    fn from(flags: ParticipationFlags) -> Self {
        flags.0
    }
}
