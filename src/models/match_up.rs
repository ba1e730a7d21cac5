//! MatchUp, sides, statuses and the draw structure they live in.

use crate::models::error::{ScoringError, SideNumberError};
use crate::models::participant::ParticipantId;
use crate::models::set::SetScore;
use serde::{Deserialize, Serialize};

/// Unique identifier for a match-up.
pub type MatchUpId = String;

/// Which side of a match-up. Serialized as `1` / `2`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SideNumber {
    One,
    Two,
}

impl SideNumber {
    pub fn opponent(self) -> Self {
        match self {
            SideNumber::One => SideNumber::Two,
            SideNumber::Two => SideNumber::One,
        }
    }

    /// 0 for side 1, 1 for side 2; for indexing `[T; 2]` score pairs.
    pub fn index(self) -> usize {
        match self {
            SideNumber::One => 0,
            SideNumber::Two => 1,
        }
    }
}

impl From<SideNumber> for u8 {
    fn from(side: SideNumber) -> Self {
        match side {
            SideNumber::One => 1,
            SideNumber::Two => 2,
        }
    }
}

impl TryFrom<u8> for SideNumber {
    type Error = SideNumberError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SideNumber::One),
            2 => Ok(SideNumber::Two),
            other => Err(SideNumberError(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchUpStatus {
    #[default]
    ToBePlayed,
    InProgress,
    Completed,
    Retired,
    Walkover,
    DoubleWalkover,
    Defaulted,
    DoubleDefault,
    Suspended,
    Abandoned,
    Cancelled,
    Incomplete,
    DeadRubber,
    Bye,
    NotPlayed,
    AwaitingResult,
}

impl MatchUpStatus {
    /// Endings that do not require the sets to be played out.
    pub fn is_irregular_ending(self) -> bool {
        use MatchUpStatus::*;
        matches!(
            self,
            Retired
                | Walkover
                | DoubleWalkover
                | Defaulted
                | DoubleDefault
                | Abandoned
                | Cancelled
                | Suspended
                | Incomplete
                | DeadRubber
        )
    }

    /// The loser is removed from contention without the match being played out.
    pub fn is_disqualifying(self) -> bool {
        matches!(self, MatchUpStatus::Walkover | MatchUpStatus::Defaulted)
    }

    /// Finished without a winner; both sides are credited a cancelled match-up.
    pub fn is_cancelled_outcome(self) -> bool {
        use MatchUpStatus::*;
        matches!(self, DoubleWalkover | DoubleDefault | Cancelled | Abandoned)
    }

    /// Short display token appended to score strings.
    pub fn outcome_token(self) -> Option<&'static str> {
        use MatchUpStatus::*;
        match self {
            Retired => Some("RET"),
            Walkover => Some("WO"),
            DoubleWalkover => Some("WO/WO"),
            Suspended => Some("SUS"),
            Abandoned => Some("ABN"),
            Defaulted => Some("DEF"),
            DeadRubber => Some("DR"),
            _ => None,
        }
    }

    pub fn from_outcome_token(token: &str) -> Option<Self> {
        use MatchUpStatus::*;
        match token {
            "RET" => Some(Retired),
            "WO" => Some(Walkover),
            "WO/WO" => Some(DoubleWalkover),
            "SUS" => Some(Suspended),
            "ABN" => Some(Abandoned),
            "DEF" => Some(Defaulted),
            "DR" => Some(DeadRubber),
            _ => None,
        }
    }
}

/// Embedded participant reference, as some documents carry the participant instead of its id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideParticipant {
    pub participant_id: ParticipantId,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Side {
    pub side_number: SideNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<ParticipantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<SideParticipant>,
}

impl Side {
    pub fn new(side_number: SideNumber, participant_id: impl Into<ParticipantId>) -> Self {
        Self {
            side_number,
            participant_id: Some(participant_id.into()),
            participant: None,
        }
    }

    /// The participant id, whether given directly or through an embedded participant.
    pub fn participant_id(&self) -> Option<&str> {
        self.participant_id
            .as_deref()
            .or_else(|| self.participant.as_ref().map(|p| p.participant_id.as_str()))
    }
}

/// A single match between two sides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchUp {
    pub match_up_id: MatchUpId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_up_format: Option<String>,
    #[serde(default)]
    pub sets: Vec<SetScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_side: Option<SideNumber>,
    #[serde(default)]
    pub match_up_status: MatchUpStatus,
    #[serde(default)]
    pub sides: Vec<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_number: Option<u32>,
}

impl MatchUp {
    /// Unscored match-up between two participants.
    pub fn new(
        match_up_id: impl Into<MatchUpId>,
        side1: impl Into<ParticipantId>,
        side2: impl Into<ParticipantId>,
    ) -> Self {
        Self {
            match_up_id: match_up_id.into(),
            sides: vec![Side::new(SideNumber::One, side1), Side::new(SideNumber::Two, side2)],
            ..Self::default()
        }
    }

    pub fn side(&self, side_number: SideNumber) -> Option<&Side> {
        self.sides.iter().find(|s| s.side_number == side_number)
    }

    pub fn participant_id(&self, side_number: SideNumber) -> Option<&str> {
        self.side(side_number).and_then(Side::participant_id)
    }

    /// Both participant ids, in side order, when both sides are assigned.
    pub fn participant_ids(&self) -> Option<(&str, &str)> {
        Some((
            self.participant_id(SideNumber::One)?,
            self.participant_id(SideNumber::Two)?,
        ))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionAssignment {
    pub draw_position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<ParticipantId>,
    #[serde(default)]
    pub bye: bool,
}

/// A draw structure (or round robin group): its match-ups and who sits at which position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure {
    pub structure_id: String,
    #[serde(default)]
    pub match_ups: Vec<MatchUp>,
    #[serde(default)]
    pub position_assignments: Vec<PositionAssignment>,
}

impl Structure {
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        serde_json::from_str(json).map_err(|e| ScoringError::InvalidDocument(e.to_string()))
    }

    /// Participants placed in the structure (byes excluded).
    pub fn assigned_participant_ids(&self) -> Vec<&str> {
        self.position_assignments
            .iter()
            .filter(|a| !a.bye)
            .filter_map(|a| a.participant_id.as_deref())
            .collect()
    }
}
