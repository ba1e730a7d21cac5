//! Data structures for scoring: formats, sets, match-ups, participants and results.

mod error;
pub(crate) mod match_format;
mod match_up;
mod participant;
mod set;

pub use error::{ScoringError, SideNumberError};
pub use match_format::{MatchFormat, SetFormat, SetKind, TiebreakFormat, TimedBasis, TimedFormat};
pub use match_up::{
    MatchUp, MatchUpId, MatchUpStatus, PositionAssignment, Side, SideNumber, SideParticipant,
    Structure,
};
pub use participant::{
    DrawEntry, EntryStatus, EventType, Participant, ParticipantId, ParticipantResult,
    ParticipantType, ScaleItem, DYNAMIC_SCALE_SUFFIX,
};
pub use set::{effective_no_ad, sorted_sets, SetScore};
