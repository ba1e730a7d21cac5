//! SetScore: one set's game, tiebreak and point scores.

use crate::models::match_up::SideNumber;
use serde::{Deserialize, Serialize};

/// Scores for one set. Fields are filled in incrementally while a set is in progress.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScore {
    /// 1-based; sets are ordered by this, not by their position in a list.
    pub set_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side1_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side2_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side1_tiebreak_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side2_tiebreak_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side1_point_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side2_point_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_side: Option<SideNumber>,
    /// Set-level no-advantage flag, written by score-string parsers. Overrides the format's flag.
    #[serde(default, rename = "NoAD", skip_serializing_if = "Option::is_none")]
    pub no_ad: Option<bool>,
}

impl SetScore {
    /// A game-scored set.
    pub fn games(set_number: u32, side1: u32, side2: u32) -> Self {
        Self {
            set_number,
            side1_score: Some(side1),
            side2_score: Some(side2),
            ..Self::default()
        }
    }

    /// A tiebreak-only set (e.g. a match tiebreak to 10).
    pub fn tiebreak(set_number: u32, side1: u32, side2: u32) -> Self {
        Self {
            set_number,
            side1_tiebreak_score: Some(side1),
            side2_tiebreak_score: Some(side2),
            ..Self::default()
        }
    }

    pub fn with_tiebreak(mut self, side1: u32, side2: u32) -> Self {
        self.side1_tiebreak_score = Some(side1);
        self.side2_tiebreak_score = Some(side2);
        self
    }

    pub fn with_winner(mut self, side: SideNumber) -> Self {
        self.winning_side = Some(side);
        self
    }

    pub fn game_scores(&self) -> [Option<u32>; 2] {
        [self.side1_score, self.side2_score]
    }

    pub fn tiebreak_scores(&self) -> [Option<u32>; 2] {
        [self.side1_tiebreak_score, self.side2_tiebreak_score]
    }

    pub fn point_scores(&self) -> [Option<u32>; 2] {
        [self.side1_point_score, self.side2_point_score]
    }

    pub fn has_game_scores(&self) -> bool {
        self.side1_score.is_some() || self.side2_score.is_some()
    }

    pub fn has_tiebreak_scores(&self) -> bool {
        self.side1_tiebreak_score.is_some() || self.side2_tiebreak_score.is_some()
    }

    /// Carries tiebreak scores but no game scores.
    pub fn is_tiebreak_set(&self) -> bool {
        self.has_tiebreak_scores() && !self.has_game_scores()
    }

    pub fn is_empty(&self) -> bool {
        self.game_scores()
            .iter()
            .chain(self.tiebreak_scores().iter())
            .chain(self.point_scores().iter())
            .all(Option::is_none)
    }
}

/// Effective no-advantage flag: the set instance wins over the format.
pub fn effective_no_ad(instance: Option<bool>, format: bool) -> bool {
    instance.unwrap_or(format)
}

/// Sort a copy of the sets by set number.
pub fn sorted_sets(sets: &[SetScore]) -> Vec<&SetScore> {
    let mut sorted: Vec<&SetScore> = sets.iter().collect();
    sorted.sort_by_key(|s| s.set_number);
    sorted
}
