//! Participant, draw entries and rating scale items.

use serde::{Deserialize, Serialize};

/// Unique identifier for a participant (individual, pair or team).
pub type ParticipantId = String;

/// Suffix of the scale name under which per-event dynamic ratings are stored.
pub const DYNAMIC_SCALE_SUFFIX: &str = "DYNAMIC";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantType {
    #[default]
    Individual,
    Pair,
    Team,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    #[default]
    Singles,
    Doubles,
    Team,
}

/// A rating or ranking value for one scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleItem {
    pub scale_name: String,
    #[serde(default)]
    pub event_type: EventType,
    pub scale_value: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub participant_name: String,
    #[serde(default)]
    pub participant_type: ParticipantType,
    /// Members of a team or pair.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub individual_participant_ids: Vec<ParticipantId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ratings: Vec<ScaleItem>,
}

impl Participant {
    pub fn new(participant_id: impl Into<ParticipantId>) -> Self {
        Self {
            participant_id: participant_id.into(),
            ..Self::default()
        }
    }

    pub fn with_rating(mut self, scale_name: &str, event_type: EventType, value: f64) -> Self {
        self.ratings.push(ScaleItem {
            scale_name: scale_name.to_string(),
            event_type,
            scale_value: value,
        });
        self
    }

    fn scale_value(&self, scale_name: &str, event_type: EventType) -> Option<f64> {
        self.ratings
            .iter()
            .find(|item| item.scale_name == scale_name && item.event_type == event_type)
            .map(|item| item.scale_value)
    }

    /// Rating for a scale: the per-event dynamic rating (`<scale>.DYNAMIC`) wins over the static one.
    pub fn rating(&self, scale_name: &str, event_type: EventType) -> Option<f64> {
        let dynamic = format!("{}.{}", scale_name, DYNAMIC_SCALE_SUFFIX);
        self.scale_value(&dynamic, event_type)
            .or_else(|| self.scale_value(scale_name, event_type))
    }
}

/// Entry status of a participant in a draw.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    #[default]
    DirectAcceptance,
    Confirmed,
    JuniorExempt,
    LuckyLoser,
    Qualifier,
    OrganiserAcceptance,
    SpecialExempt,
    Wildcard,
    Alternate,
    Ungrouped,
    Unpaired,
    Withdrawn,
}

impl EntryStatus {
    /// Statuses that place a participant into a structure.
    pub fn is_selected(self) -> bool {
        use EntryStatus::*;
        matches!(
            self,
            DirectAcceptance
                | Confirmed
                | JuniorExempt
                | LuckyLoser
                | Qualifier
                | OrganiserAcceptance
                | SpecialExempt
                | Wildcard
        )
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawEntry {
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub entry_status: EntryStatus,
}

impl DrawEntry {
    pub fn new(participant_id: impl Into<ParticipantId>) -> Self {
        Self {
            participant_id: participant_id.into(),
            entry_status: EntryStatus::DirectAcceptance,
        }
    }
}

/// Round robin standing of one participant within a bracket or group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResult {
    pub match_ups_won: u32,
    pub match_ups_lost: u32,
    pub match_ups_cancelled: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub points_won: u32,
    pub points_lost: u32,
    /// Opponents beaten.
    pub victories: Vec<ParticipantId>,
    /// Opponents lost to.
    pub defeats: Vec<ParticipantId>,
    pub matches_ratio: f64,
    pub sets_ratio: f64,
    pub games_ratio: f64,
    pub games_difference: i64,
    pub points_ratio: f64,
    /// Competitive rank; unset until every participant has played every other.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket_order: Option<u32>,
    /// Manual order among participants sharing a rank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_order: Option<u32>,
    /// Rank used for awarding points; ignores disqualification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_order: Option<u32>,
}

impl ParticipantResult {
    pub fn has_beaten(&self, opponent: &str) -> bool {
        self.victories.iter().any(|v| v == opponent)
    }
}
