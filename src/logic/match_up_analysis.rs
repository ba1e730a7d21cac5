//! MatchUp analysis: the active set, the value already at an edit target, and whether the
//! recorded winner agrees with the sets.

use crate::logic::set_analysis::{analyze_set, SetAnalysis};
use crate::models::{sorted_sets, MatchFormat, MatchUp, ScoringError, SetScore, SideNumber};

/// The score cell a caller is about to edit.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScoreTarget {
    pub side_number: Option<SideNumber>,
    pub set_number: Option<u32>,
    pub is_tiebreak_value: bool,
    pub is_point_value: bool,
}

impl ScoreTarget {
    pub fn game(side_number: SideNumber, set_number: u32) -> Self {
        Self {
            side_number: Some(side_number),
            set_number: Some(set_number),
            ..Self::default()
        }
    }

    pub fn tiebreak(side_number: SideNumber, set_number: u32) -> Self {
        Self {
            is_tiebreak_value: true,
            ..Self::game(side_number, set_number)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchUpAnalysis {
    pub match_format: MatchFormat,
    /// One analysis per set, ordered by set number.
    pub set_analyses: Vec<SetAnalysis>,
    pub completed_sets_count: usize,
    /// Completed sets won by side 1 and side 2.
    pub sets_win_counts: [u32; 2],
    pub calculated_winning_side: Option<SideNumber>,
    pub match_up_winning_side: Option<SideNumber>,
    pub valid_match_up_outcome: bool,
    pub is_completed_match_up: bool,
    pub active_set_number: Option<u32>,

    pub is_valid_side_number: bool,
    pub is_existing_set: bool,
    pub is_active_set: bool,
    pub existing_value: Option<u32>,
    pub has_existing_value: bool,
    pub is_last_set_with_values: bool,
    pub sets_following_current: usize,
    /// The target is a completed set other than the active one.
    pub modifies_completed_set: bool,
    pub specified_set_analysis: Option<SetAnalysis>,
}

fn resolve_format(match_up: &MatchUp, match_up_format: Option<&str>) -> Result<MatchFormat, ScoringError> {
    let code = match_up_format
        .or(match_up.match_up_format.as_deref())
        .ok_or(ScoringError::MissingMatchUpFormat)?;
    MatchFormat::parse(code)
}

/// Side that has won the match on completed sets, if any.
fn decided_side(match_format: &MatchFormat, wins: [u32; 2], completed: usize) -> Option<SideNumber> {
    let [w1, w2] = wins;
    if w1 == w2 {
        return None;
    }
    let (leader, leader_wins) = if w1 > w2 {
        (SideNumber::One, w1)
    } else {
        (SideNumber::Two, w2)
    };
    let decided = if match_format.exactly {
        completed as u32 >= match_format.best_of
    } else {
        leader_wins >= match_format.sets_to_win()
    };
    decided.then_some(leader)
}

fn cell_value(set: &SetScore, side: SideNumber, target: &ScoreTarget) -> Option<u32> {
    let scores = if target.is_point_value {
        set.point_scores()
    } else if target.is_tiebreak_value {
        set.tiebreak_scores()
    } else {
        set.game_scores()
    };
    scores[side.index()]
}

/// Analyze a match-up's sets, optionally focused on one score cell.
///
/// `match_up_format` overrides the format recorded on the match-up.
pub fn analyze_match_up(
    match_up: &MatchUp,
    match_up_format: Option<&str>,
    target: &ScoreTarget,
) -> Result<MatchUpAnalysis, ScoringError> {
    let match_format = resolve_format(match_up, match_up_format)?;
    if let Some(set_number) = target.set_number {
        if set_number == 0 || set_number > match_format.best_of {
            return Err(ScoringError::InvalidSetNumber(set_number));
        }
    }

    let sets = sorted_sets(&match_up.sets);
    let set_analyses: Vec<SetAnalysis> =
        sets.iter().map(|set| analyze_set(set, &match_format)).collect();

    let completed: Vec<&SetAnalysis> = set_analyses.iter().filter(|a| a.is_completed_set).collect();
    let mut sets_win_counts = [0u32; 2];
    for analysis in &completed {
        if let Some(side) = analysis.winning_side {
            sets_win_counts[side.index()] += 1;
        }
    }
    let completed_sets_valid = completed.iter().all(|a| a.is_valid_set);
    let calculated_winning_side = decided_side(&match_format, sets_win_counts, completed.len());

    let valid_match_up_outcome = completed_sets_valid
        && if match_up.match_up_status.is_irregular_ending() {
            true
        } else {
            calculated_winning_side == match_up.winning_side
        };

    let is_completed_match_up =
        match_up.winning_side.is_some() || match_up.match_up_status.is_cancelled_outcome();

    let active_set_number = if is_completed_match_up || calculated_winning_side.is_some() {
        None
    } else {
        match sets.iter().find(|s| s.winning_side.is_none()) {
            Some(open) => Some(open.set_number),
            None => {
                let next = sets.last().map_or(1, |s| s.set_number + 1);
                (next <= match_format.best_of).then_some(next)
            }
        }
    };

    let target_set = target
        .set_number
        .and_then(|n| sets.iter().find(|s| s.set_number == n).copied());
    let specified_set_analysis = target
        .set_number
        .and_then(|n| set_analyses.iter().find(|a| a.set_number == n).cloned());

    let existing_value = match (target_set, target.side_number) {
        (Some(set), Some(side)) => cell_value(set, side, target),
        _ => None,
    };
    let last_set_with_values = sets.iter().rev().find(|s| !s.is_empty()).map(|s| s.set_number);
    let is_active_set = target.set_number.is_some() && target.set_number == active_set_number;
    let modifies_completed_set = target_set.is_some_and(|s| s.winning_side.is_some()) && !is_active_set;

    Ok(MatchUpAnalysis {
        completed_sets_count: completed.len(),
        sets_win_counts,
        calculated_winning_side,
        match_up_winning_side: match_up.winning_side,
        valid_match_up_outcome,
        is_completed_match_up,
        active_set_number,
        is_valid_side_number: target.side_number.is_some(),
        is_existing_set: target_set.is_some(),
        is_active_set,
        existing_value,
        has_existing_value: existing_value.is_some(),
        is_last_set_with_values: target.set_number.is_some() && target.set_number == last_set_with_values,
        sets_following_current: target
            .set_number
            .map_or(0, |n| sets.iter().filter(|s| s.set_number > n).count()),
        modifies_completed_set,
        specified_set_analysis,
        set_analyses,
        match_format,
    })
}

/// Gate a score edit: edits to a completed, non-active set alter history and are
/// rejected unless the caller allows it.
pub fn check_score_edit(analysis: &MatchUpAnalysis, allow_history_edit: bool) -> Result<(), ScoringError> {
    if analysis.modifies_completed_set && !allow_history_edit {
        let set_number = analysis
            .specified_set_analysis
            .as_ref()
            .map_or(0, |a| a.set_number);
        log::debug!("rejecting edit of completed set {}", set_number);
        return Err(ScoringError::HistoryEdit { set_number });
    }
    Ok(())
}
