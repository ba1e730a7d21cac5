//! Set analysis: completeness, validity and winner of a single set against its format.
//!
//! Rule violations are reported as [`SetScoreError`] values inside [`SetAnalysis`]; a live
//! scoring screen keeps working while it shows the invalid state.

use crate::models::{
    effective_no_ad, MatchFormat, SetFormat, SetKind, SetScore, SideNumber, TiebreakFormat,
    TimedBasis,
};

/// Games per set when nothing else is known.
pub const DEFAULT_SET_TO: u32 = 6;
/// Tiebreak target when nothing else is known.
pub const DEFAULT_TIEBREAK_TO: u32 = 7;

/// Why a set's scores are not a valid (completed) set. The `Display` text of each
/// variant is a stable reason string; the numbered tiebreak variants map one-to-one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SetScoreError {
    InvalidSetNumber,
    MissingGameScores,
    TiedGameScores,
    WinningGameScoreNotHigh,
    WinningGameScoreTooHigh,
    InsufficientGameMargin,
    /// Tiebreak required but scores absent.
    MissingTiebreakScores,
    /// Tiebreak winner is not the game winner.
    TiebreakWinnerMismatch,
    /// Tiebreak winner did not reach the tiebreak target.
    TiebreakScoreNotHigh,
    /// Tiebreak won by less than the required margin.
    InsufficientTiebreakMargin,
    /// Extended tiebreak must be won by exactly the margin.
    ExtendedTiebreakMargin,
    UnexpectedTiebreakScores,
    MissingTiebreakSetScores,
    TiedTiebreakSetScores,
    TiebreakSetScoreNotHigh,
    InsufficientTiebreakSetMargin,
    ExtendedTiebreakSetMargin,
    UnexpectedGameScores,
    MissingTimedScores,
    TiedTimedScores,
    UnexpectedTimedTiebreakScores,
    WinningSideMismatch,
}

impl SetScoreError {
    pub fn reason(&self) -> &'static str {
        use SetScoreError::*;
        match self {
            InvalidSetNumber => "invalid set number",
            MissingGameScores => "missing game scores",
            TiedGameScores => "game scores are tied",
            WinningGameScoreNotHigh => "winning game score is not high",
            WinningGameScoreTooHigh => "winning game score is too high",
            InsufficientGameMargin => "insufficient game score margin",
            MissingTiebreakScores => "invalid tiebreak scores (1)",
            TiebreakWinnerMismatch => "invalid tiebreak scores (2)",
            TiebreakScoreNotHigh => "invalid tiebreak scores (3)",
            InsufficientTiebreakMargin => "invalid tiebreak scores (4)",
            ExtendedTiebreakMargin => "invalid tiebreak scores (5)",
            UnexpectedTiebreakScores => "tiebreak scores not expected",
            MissingTiebreakSetScores => "missing tiebreak set scores",
            TiedTiebreakSetScores => "tiebreak set scores are tied",
            TiebreakSetScoreNotHigh => "winning tiebreak score is not high",
            InsufficientTiebreakSetMargin => "insufficient tiebreak set margin",
            ExtendedTiebreakSetMargin => "invalid tiebreak set score",
            UnexpectedGameScores => "tiebreak set has game scores",
            MissingTimedScores => "missing timed set scores",
            TiedTimedScores => "timed set scores are tied",
            UnexpectedTimedTiebreakScores => "timed set has tiebreak scores",
            WinningSideMismatch => "winning side does not match scores",
        }
    }
}

impl std::fmt::Display for SetScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for SetScoreError {}

/// Thresholds a set is judged against. Built from a parsed [`SetFormat`] here and from
/// raw format tokens by the standalone validator, so both judge sets the same way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SetRules {
    Standard {
        set_to: u32,
        no_ad: bool,
        tiebreak_at: Option<u32>,
        tiebreak: Option<TiebreakFormat>,
    },
    TiebreakOnly(TiebreakFormat),
    Timed(TimedBasis),
}

impl SetRules {
    pub(crate) fn from_format(format: &SetFormat) -> Self {
        match format.kind() {
            SetKind::Timed => {
                SetRules::Timed(format.timed.map(|t| t.based_on).unwrap_or_default())
            }
            SetKind::TiebreakOnly => SetRules::TiebreakOnly(format.tiebreak_set.unwrap_or(
                TiebreakFormat {
                    tiebreak_to: DEFAULT_TIEBREAK_TO,
                    no_ad: false,
                },
            )),
            SetKind::Standard => SetRules::Standard {
                set_to: format.set_to.unwrap_or(DEFAULT_SET_TO),
                no_ad: format.no_ad,
                tiebreak_at: format.effective_tiebreak_at(),
                tiebreak: format.tiebreak_format,
            },
        }
    }

    pub(crate) fn kind(&self) -> SetKind {
        match self {
            SetRules::Standard { .. } => SetKind::Standard,
            SetRules::TiebreakOnly(_) => SetKind::TiebreakOnly,
            SetRules::Timed(_) => SetKind::Timed,
        }
    }
}

fn margin(no_ad: bool) -> u32 {
    if no_ad {
        1
    } else {
        2
    }
}

/// Winner and loser values of a score pair, or `None` when either is missing.
fn ordered(scores: [Option<u32>; 2]) -> Option<(u32, u32)> {
    Some((scores[0]?, scores[1]?))
}

/// Judge a set's scores as a completed set. Returns the side that won it.
pub(crate) fn check_outcome(rules: &SetRules, set: &SetScore) -> Result<SideNumber, SetScoreError> {
    match *rules {
        SetRules::Standard {
            set_to,
            no_ad,
            tiebreak_at,
            tiebreak,
        } => check_standard_outcome(set, set_to, no_ad, tiebreak_at, tiebreak),
        SetRules::TiebreakOnly(tiebreak) => check_tiebreak_set_outcome(set, tiebreak),
        SetRules::Timed(basis) => check_timed_outcome(set, basis),
    }
}

fn check_standard_outcome(
    set: &SetScore,
    set_to: u32,
    no_ad: bool,
    tiebreak_at: Option<u32>,
    tiebreak: Option<TiebreakFormat>,
) -> Result<SideNumber, SetScoreError> {
    let (s1, s2) = ordered(set.game_scores()).ok_or(SetScoreError::MissingGameScores)?;
    if s1.max(s2) < set_to {
        return Err(SetScoreError::WinningGameScoreNotHigh);
    }
    if s1 == s2 {
        return Err(SetScoreError::TiedGameScores);
    }
    let winner = if s1 > s2 { SideNumber::One } else { SideNumber::Two };
    let (high, low) = (s1.max(s2), s1.min(s2));

    if let Some(at) = tiebreak_at {
        let cap = if at < set_to { set_to } else { set_to + 1 };
        if high > cap {
            return Err(SetScoreError::WinningGameScoreTooHigh);
        }
    }

    let tiebreak_required = matches!(tiebreak_at, Some(at) if low >= at);
    if tiebreak_required {
        let format = tiebreak.unwrap_or(TiebreakFormat {
            tiebreak_to: DEFAULT_TIEBREAK_TO,
            no_ad: false,
        });
        let no_ad = effective_no_ad(set.no_ad, format.no_ad);
        check_set_tiebreak(set.tiebreak_scores(), winner, format.tiebreak_to, no_ad)?;
        return Ok(winner);
    }

    if set.has_tiebreak_scores() {
        return Err(SetScoreError::UnexpectedTiebreakScores);
    }
    if high - low < margin(no_ad) {
        return Err(SetScoreError::InsufficientGameMargin);
    }
    Ok(winner)
}

fn check_set_tiebreak(
    scores: [Option<u32>; 2],
    game_winner: SideNumber,
    tiebreak_to: u32,
    no_ad: bool,
) -> Result<(), SetScoreError> {
    if ordered(scores).is_none() {
        return Err(SetScoreError::MissingTiebreakScores);
    }
    let won = scores[game_winner.index()].unwrap_or_default();
    let lost = scores[game_winner.opponent().index()].unwrap_or_default();
    if won <= lost {
        return Err(SetScoreError::TiebreakWinnerMismatch);
    }
    if won < tiebreak_to {
        return Err(SetScoreError::TiebreakScoreNotHigh);
    }
    let required = margin(no_ad);
    if won - lost < required {
        return Err(SetScoreError::InsufficientTiebreakMargin);
    }
    if !no_ad && lost + 1 >= tiebreak_to && won - lost != required {
        return Err(SetScoreError::ExtendedTiebreakMargin);
    }
    Ok(())
}

fn check_tiebreak_set_outcome(
    set: &SetScore,
    format: TiebreakFormat,
) -> Result<SideNumber, SetScoreError> {
    if set.has_game_scores() {
        return Err(SetScoreError::UnexpectedGameScores);
    }
    let (t1, t2) =
        ordered(set.tiebreak_scores()).ok_or(SetScoreError::MissingTiebreakSetScores)?;
    if t1 == t2 {
        return Err(SetScoreError::TiedTiebreakSetScores);
    }
    let (high, low) = (t1.max(t2), t1.min(t2));
    if high < format.tiebreak_to {
        return Err(SetScoreError::TiebreakSetScoreNotHigh);
    }
    let no_ad = effective_no_ad(set.no_ad, format.no_ad);
    let required = margin(no_ad);
    if high - low < required {
        return Err(SetScoreError::InsufficientTiebreakSetMargin);
    }
    if !no_ad && low + 1 >= format.tiebreak_to && high - low != required {
        return Err(SetScoreError::ExtendedTiebreakSetMargin);
    }
    Ok(if t1 > t2 { SideNumber::One } else { SideNumber::Two })
}

fn check_timed_outcome(set: &SetScore, basis: TimedBasis) -> Result<SideNumber, SetScoreError> {
    if set.has_tiebreak_scores() {
        return Err(SetScoreError::UnexpectedTimedTiebreakScores);
    }
    let scores = match basis {
        TimedBasis::Points => set.point_scores(),
        TimedBasis::Games | TimedBasis::Aggregate => set.game_scores(),
    };
    let (s1, s2) = ordered(scores).ok_or(SetScoreError::MissingTimedScores)?;
    match s1.cmp(&s2) {
        std::cmp::Ordering::Greater => Ok(SideNumber::One),
        std::cmp::Ordering::Less => Ok(SideNumber::Two),
        std::cmp::Ordering::Equal => Err(SetScoreError::TiedTimedScores),
    }
}

/// Checks that hold while a set is still being played.
pub(crate) fn check_partial(rules: &SetRules, set: &SetScore) -> Result<(), SetScoreError> {
    match *rules {
        SetRules::TiebreakOnly(_) if set.has_game_scores() => Err(SetScoreError::UnexpectedGameScores),
        SetRules::Timed(_) if set.has_tiebreak_scores() => {
            Err(SetScoreError::UnexpectedTimedTiebreakScores)
        }
        SetRules::Standard {
            set_to,
            tiebreak_at: Some(at),
            ..
        } => {
            let cap = if at < set_to { set_to } else { set_to + 1 };
            if set.game_scores().into_iter().flatten().any(|g| g > cap) {
                Err(SetScoreError::WinningGameScoreTooHigh)
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

/// Lifecycle of a set as seen by the scoring screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SetState {
    Empty,
    InProgress,
    Complete,
    Invalid,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetAnalysis {
    pub set_number: u32,
    pub kind: SetKind,
    pub is_deciding_set: bool,
    pub is_tiebreak_set: bool,
    pub is_timed_set: bool,
    pub is_valid_set_number: bool,
    /// A winning side has been recorded on the set.
    pub is_completed_set: bool,
    /// The scores form a legally finished set.
    pub is_valid_set_outcome: bool,
    pub is_valid_set: bool,
    /// Recorded winning side.
    pub winning_side: Option<SideNumber>,
    /// Winning side derived from the scores.
    pub analysis_winning_side: Option<SideNumber>,
    pub side_game_scores: [Option<u32>; 2],
    pub side_tiebreak_scores: [Option<u32>; 2],
    pub side_point_scores: [Option<u32>; 2],
    pub side_game_scores_count: usize,
    pub side_tiebreak_scores_count: usize,
    pub side_point_scores_count: usize,
    /// Why the scores are not a finished set (also set while a set is in progress).
    pub outcome_error: Option<SetScoreError>,
    /// Why the set is invalid; `None` whenever `is_valid_set`.
    pub set_error: Option<SetScoreError>,
    pub state: SetState,
}

fn present(scores: &[Option<u32>; 2]) -> usize {
    scores.iter().filter(|s| s.is_some()).count()
}

/// Analyze one set against a parsed match format.
///
/// The deciding set (`set_number == best_of`) is judged with the final-set format when
/// the match format has one.
pub fn analyze_set(set: &SetScore, match_format: &MatchFormat) -> SetAnalysis {
    let set_format = match_format.set_format_for(set.set_number);
    let rules = SetRules::from_format(set_format);
    let kind = rules.kind();
    let is_valid_set_number = set.set_number >= 1 && set.set_number <= match_format.best_of;

    let outcome = check_outcome(&rules, set);
    let analysis_winning_side = outcome.ok();
    let outcome_error = outcome.err();

    let set_error = if !is_valid_set_number {
        Some(SetScoreError::InvalidSetNumber)
    } else if let Some(recorded) = set.winning_side {
        match outcome {
            Ok(side) if side == recorded => None,
            Ok(_) => Some(SetScoreError::WinningSideMismatch),
            Err(e) => Some(e),
        }
    } else {
        check_partial(&rules, set).err()
    };
    let is_valid_set = set_error.is_none();

    let state = if !is_valid_set {
        SetState::Invalid
    } else if set.winning_side.is_some() {
        SetState::Complete
    } else if set.is_empty() {
        SetState::Empty
    } else {
        SetState::InProgress
    };

    let side_game_scores = set.game_scores();
    let side_tiebreak_scores = set.tiebreak_scores();
    let side_point_scores = set.point_scores();

    SetAnalysis {
        set_number: set.set_number,
        kind,
        is_deciding_set: match_format.is_deciding_set(set.set_number),
        is_tiebreak_set: kind == SetKind::TiebreakOnly,
        is_timed_set: kind == SetKind::Timed,
        is_valid_set_number,
        is_completed_set: set.winning_side.is_some(),
        is_valid_set_outcome: analysis_winning_side.is_some(),
        is_valid_set,
        winning_side: set.winning_side,
        analysis_winning_side,
        side_game_scores_count: present(&side_game_scores),
        side_tiebreak_scores_count: present(&side_tiebreak_scores),
        side_point_scores_count: present(&side_point_scores),
        side_game_scores,
        side_tiebreak_scores,
        side_point_scores,
        outcome_error,
        set_error,
        state,
    }
}

/// The side that won the set according to its scores, if they form a finished set.
pub fn get_set_winning_side(set: &SetScore, match_format: &MatchFormat) -> Option<SideNumber> {
    let rules = SetRules::from_format(match_format.set_format_for(set.set_number));
    check_outcome(&rules, set).ok()
}

/// Whether the scores form a legally finished set.
pub fn check_set_is_complete(set: &SetScore, match_format: &MatchFormat) -> bool {
    get_set_winning_side(set, match_format).is_some()
}
