//! Score strings: `6-4 3-6 7-6(5)`, `[10-8]` for tiebreak-only sets, plus outcome tokens
//! such as `RET` or `WO`. Display layers consume these byte for byte.

use crate::models::{sorted_sets, MatchUpStatus, ScoringError, SetScore, SideNumber};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoreStringOptions {
    pub winning_side: Option<SideNumber>,
    pub match_up_status: Option<MatchUpStatus>,
    /// Flip the rendered orientation.
    pub reversed: bool,
    /// Render the winner's scores first when the winner is known.
    pub winner_first: bool,
    /// Render missing values as `0` instead of leaving them blank.
    pub auto_complete: bool,
    /// Add the outcome token (`RET`, `WO`, ...) for irregular endings.
    pub add_outcome_string: bool,
}

impl Default for ScoreStringOptions {
    fn default() -> Self {
        Self {
            winning_side: None,
            match_up_status: None,
            reversed: false,
            winner_first: true,
            auto_complete: false,
            add_outcome_string: false,
        }
    }
}

fn value(score: Option<u32>, auto_complete: bool) -> String {
    match score {
        Some(v) => v.to_string(),
        None if auto_complete => "0".to_string(),
        None => String::new(),
    }
}

fn set_token(set: &SetScore, swap: bool, auto_complete: bool) -> String {
    let orient = |pair: [Option<u32>; 2]| if swap { [pair[1], pair[0]] } else { pair };

    if set.is_tiebreak_set() {
        let [t1, t2] = orient(set.tiebreak_scores());
        return format!("[{}-{}]", value(t1, auto_complete), value(t2, auto_complete));
    }

    let [g1, g2] = orient(set.game_scores());
    let low_tiebreak = set.tiebreak_scores().into_iter().flatten().min();
    let tiebreak = match low_tiebreak {
        Some(low) if low > 0 => format!("({})", low),
        _ => String::new(),
    };
    format!(
        "{}-{}{}",
        value(g1, auto_complete),
        value(g2, auto_complete),
        tiebreak
    )
}

/// Render sets (sorted by set number) as a score string.
pub fn generate_score_string(sets: &[SetScore], options: &ScoreStringOptions) -> String {
    let swap = (options.winner_first && options.winning_side == Some(SideNumber::Two))
        != options.reversed;

    let scores = sorted_sets(sets)
        .into_iter()
        .filter(|set| options.auto_complete || !set.is_empty())
        .map(|set| set_token(set, swap, options.auto_complete))
        .collect::<Vec<_>>()
        .join(" ");

    let outcome = options
        .match_up_status
        .filter(|_| options.add_outcome_string)
        .and_then(MatchUpStatus::outcome_token);

    let parts: Vec<&str> = match outcome {
        Some(token) if options.winning_side == Some(SideNumber::Two) => vec![token, scores.as_str()],
        Some(token) => vec![scores.as_str(), token],
        None => vec![scores.as_str()],
    };
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Score strings from each side's point of view.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchUpScoreStrings {
    pub score_string_side1: String,
    pub score_string_side2: String,
}

pub fn match_up_score(
    sets: &[SetScore],
    winning_side: Option<SideNumber>,
    match_up_status: Option<MatchUpStatus>,
) -> MatchUpScoreStrings {
    let options = ScoreStringOptions {
        winning_side,
        match_up_status,
        winner_first: false,
        add_outcome_string: true,
        ..ScoreStringOptions::default()
    };
    MatchUpScoreStrings {
        score_string_side1: generate_score_string(sets, &options),
        score_string_side2: generate_score_string(
            sets,
            &ScoreStringOptions {
                reversed: true,
                ..options
            },
        ),
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedScore {
    pub sets: Vec<SetScore>,
    pub match_up_status: Option<MatchUpStatus>,
}

fn parse_pair(token: &str, whole: &str) -> Result<(u32, u32), ScoringError> {
    let invalid = || ScoringError::InvalidScoreString(whole.to_string());
    let (a, b) = token.split_once('-').ok_or_else(invalid)?;
    let a = a.parse::<u32>().map_err(|_| invalid())?;
    let b = b.parse::<u32>().map_err(|_| invalid())?;
    Ok((a, b))
}

/// Read a score string back into sets, in the string's orientation.
///
/// A parenthesized tiebreak score belongs to the set loser; the winner gets
/// `max(tiebreak_to, low + 2)`. A tiebreak-only set won by one point is flagged `NoAD`.
pub fn parse_score_string(score: &str, tiebreak_to: u32) -> Result<ParsedScore, ScoringError> {
    let mut parsed = ParsedScore::default();

    for token in score.split_whitespace() {
        if let Some(status) = MatchUpStatus::from_outcome_token(token) {
            parsed.match_up_status = Some(status);
            continue;
        }
        let set_number = parsed.sets.len() as u32 + 1;

        if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            let (t1, t2) = parse_pair(inner, token)?;
            let mut set = SetScore::tiebreak(set_number, t1, t2);
            if t1.abs_diff(t2) == 1 {
                set.no_ad = Some(true);
            }
            parsed.sets.push(set);
            continue;
        }

        let (games, tiebreak) = match token.split_once('(') {
            Some((games, rest)) => {
                let low = rest
                    .strip_suffix(')')
                    .and_then(|t| t.parse::<u32>().ok())
                    .ok_or_else(|| ScoringError::InvalidScoreString(token.to_string()))?;
                (games, Some(low))
            }
            None => (token, None),
        };
        let (g1, g2) = parse_pair(games, token)?;
        let mut set = SetScore::games(set_number, g1, g2);
        if let Some(low) = tiebreak {
            let high = tiebreak_to.max(low + 2);
            set = if g1 > g2 {
                set.with_tiebreak(high, low)
            } else {
                set.with_tiebreak(low, high)
            };
        }
        parsed.sets.push(set);
    }

    Ok(parsed)
}
