//! Standalone score validation for scores ingested from outside (e.g. parsed score strings).
//!
//! Reads the format code by light token inspection rather than the full parser, so a
//! partly unknown code still validates against what can be read. Set outcomes are judged
//! with the same rules as [`crate::analyze_set`].

use crate::logic::set_analysis::{
    check_outcome, check_partial, SetRules, SetScoreError, DEFAULT_SET_TO, DEFAULT_TIEBREAK_TO,
};
use crate::models::match_format::split_digits;
use crate::models::{sorted_sets, MatchUpStatus, SetScore, TiebreakFormat, TimedBasis};

const DEFAULT_BEST_OF: u32 = 3;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchUpScoreError {
    InvalidSet { set_number: u32, error: SetScoreError },
    TooManySets { count: usize, best_of: u32 },
    /// A completed match-up whose sets do not produce a winner.
    Undecided,
    /// Sets recorded after one side already won the match.
    SetsAfterDecision { set_number: u32 },
}

impl std::fmt::Display for MatchUpScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchUpScoreError::InvalidSet { set_number, error } => {
                write!(f, "set {}: {}", set_number, error)
            }
            MatchUpScoreError::TooManySets { count, best_of } => {
                write!(f, "{} sets exceed best of {}", count, best_of)
            }
            MatchUpScoreError::Undecided => write!(f, "match winner not determined"),
            MatchUpScoreError::SetsAfterDecision { set_number } => {
                write!(f, "set {} follows a decided match", set_number)
            }
        }
    }
}

impl std::error::Error for MatchUpScoreError {}

struct FormatTokens {
    best_of: u32,
    set: SetRules,
    final_set: Option<SetRules>,
}

fn default_rules() -> SetRules {
    SetRules::Standard {
        set_to: DEFAULT_SET_TO,
        no_ad: false,
        tiebreak_at: Some(DEFAULT_SET_TO),
        tiebreak: Some(TiebreakFormat {
            tiebreak_to: DEFAULT_TIEBREAK_TO,
            no_ad: false,
        }),
    }
}

fn leading_number(s: &str) -> Option<u32> {
    split_digits(s).0.parse().ok()
}

fn inspect_section(section: &str) -> SetRules {
    if let Some(rest) = section.strip_prefix("TB") {
        return SetRules::TiebreakOnly(TiebreakFormat {
            tiebreak_to: leading_number(rest).unwrap_or(DEFAULT_TIEBREAK_TO),
            no_ad: rest.contains("NOAD"),
        });
    }
    if let Some(rest) = section.strip_prefix('T') {
        let basis = if rest.ends_with('P') {
            TimedBasis::Points
        } else if rest.ends_with('A') {
            TimedBasis::Aggregate
        } else {
            TimedBasis::Games
        };
        return SetRules::Timed(basis);
    }

    let (games, tiebreak) = match section.split_once('/') {
        Some((games, tiebreak)) => (games, Some(tiebreak)),
        None => (section, None),
    };
    let set_to = leading_number(games).unwrap_or(DEFAULT_SET_TO);
    let tiebreak = tiebreak.and_then(|t| t.strip_prefix("TB"));
    SetRules::Standard {
        set_to,
        no_ad: games.contains("NOAD"),
        tiebreak_at: tiebreak.map(|t| {
            t.split_once('@')
                .and_then(|(_, at)| leading_number(at))
                .unwrap_or(set_to)
        }),
        tiebreak: tiebreak.map(|t| TiebreakFormat {
            tiebreak_to: leading_number(t).unwrap_or(DEFAULT_TIEBREAK_TO),
            no_ad: t.split('@').next().is_some_and(|tb| tb.contains("NOAD")),
        }),
    }
}

fn inspect_format(match_up_format: Option<&str>) -> FormatTokens {
    let mut tokens = FormatTokens {
        best_of: DEFAULT_BEST_OF,
        set: default_rules(),
        final_set: None,
    };
    let Some(code) = match_up_format else {
        return tokens;
    };
    for part in code.trim().split('-') {
        if let Some(sets) = part.strip_prefix("SET") {
            tokens.best_of = leading_number(sets).unwrap_or(DEFAULT_BEST_OF);
        } else if let Some(section) = part.strip_prefix("S:") {
            tokens.set = inspect_section(section);
        } else if let Some(section) = part.strip_prefix("F:") {
            tokens.final_set = Some(inspect_section(section));
        }
    }
    tokens
}

fn validate_with(rules: &SetRules, set: &SetScore, allow_incomplete: bool) -> Result<(), SetScoreError> {
    if allow_incomplete {
        return check_partial(rules, set);
    }
    let winner = check_outcome(rules, set)?;
    match set.winning_side {
        Some(recorded) if recorded != winner => Err(SetScoreError::WinningSideMismatch),
        _ => Ok(()),
    }
}

/// Validate one set against a format code (`SET3-S:6/TB7` when absent).
///
/// With `allow_incomplete` only the checks that hold for a set in progress apply.
pub fn validate_set_score(
    set: &SetScore,
    match_up_format: Option<&str>,
    is_deciding_set: bool,
    allow_incomplete: bool,
) -> Result<(), SetScoreError> {
    let tokens = inspect_format(match_up_format);
    let rules = match tokens.final_set {
        Some(final_set) if is_deciding_set => final_set,
        _ => tokens.set,
    };
    validate_with(&rules, set, allow_incomplete)
}

/// Validate all sets of a match-up.
///
/// Only `COMPLETED` demands a decided match. Irregular endings (retired, walkover, ...)
/// skip completion checks entirely, and any other status (or none) accepts a match in
/// progress: every set but the last must be complete. Empty placeholder sets are ignored.
pub fn validate_match_up_score(
    sets: &[SetScore],
    match_up_format: Option<&str>,
    match_up_status: Option<MatchUpStatus>,
) -> Result<(), MatchUpScoreError> {
    let tokens = inspect_format(match_up_format);
    let mut sorted = sorted_sets(sets);
    sorted.retain(|set| !set.is_empty());
    if sorted.len() > tokens.best_of as usize {
        return Err(MatchUpScoreError::TooManySets {
            count: sorted.len(),
            best_of: tokens.best_of,
        });
    }

    let irregular = match_up_status.is_some_and(MatchUpStatus::is_irregular_ending);
    let completed = match_up_status == Some(MatchUpStatus::Completed);
    let sets_to_win = tokens.best_of.div_ceil(2);
    let mut wins = [0u32; 2];

    for (i, set) in sorted.iter().enumerate() {
        let is_last = i + 1 == sorted.len();
        let is_deciding_set = set.set_number == tokens.best_of;
        let rules = match tokens.final_set {
            Some(final_set) if is_deciding_set => final_set,
            _ => tokens.set,
        };
        let allow_incomplete = irregular || (!completed && is_last);
        validate_with(&rules, set, allow_incomplete).map_err(|error| MatchUpScoreError::InvalidSet {
            set_number: set.set_number,
            error,
        })?;

        if wins.iter().any(|w| *w >= sets_to_win) {
            return Err(MatchUpScoreError::SetsAfterDecision {
                set_number: set.set_number,
            });
        }
        if let Ok(side) = check_outcome(&rules, set) {
            wins[side.index()] += 1;
        }
    }

    if completed && wins.iter().all(|w| *w < sets_to_win) {
        return Err(MatchUpScoreError::Undecided);
    }
    Ok(())
}
