//! Round robin tally: per-participant win/loss, set, game and point totals, and ranking.
//!
//! Two rankings come out of a tally. `bracket_order` is the competitive rank, in which a
//! disqualified participant (lost by walkover or default) drops to the bottom.
//! `points_order` is the rank used to award points and ignores disqualification. Both
//! share the composite score and the ordering flow; only the hash they sort by differs.

use crate::logic::set_analysis::get_set_winning_side;
use crate::models::{
    sorted_sets, MatchFormat, MatchUp, MatchUpStatus, ParticipantId, ParticipantResult,
    ScoringError, SetFormat, SetKind, SideNumber, Structure,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Weights of the composite rank score; each criterion dominates everything after it.
const MATCHES_WEIGHT: f64 = 1e16;
const SETS_WEIGHT: f64 = 1e12;
const GAMES_WEIGHT: f64 = 1e8;
const POINTS_WEIGHT: f64 = 1e3;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyOptions {
    /// Rank by wins first; a two-way tie on wins is broken by the match between them.
    #[serde(default)]
    pub head_to_head_priority: bool,
    /// Manual order for participants still tied after ranking.
    #[serde(default)]
    pub sub_order_map: HashMap<ParticipantId, u32>,
}

/// Something in the input that was skipped rather than tallied.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TallyWarning {
    /// A match-up without two assigned participants.
    MissingSides { match_up_id: String },
    /// A match-up whose own format code could not be parsed; the bracket format was used.
    InvalidMatchUpFormat { match_up_id: String, format: String },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TallyReport {
    pub participant_results: BTreeMap<ParticipantId, ParticipantResult>,
    pub participants_count: usize,
    /// Every non-bye match-up has a recorded winner.
    pub bracket_complete: bool,
    /// Every participant has played every other; ranks are only assigned when true.
    pub complete_round: bool,
    pub disqualified: BTreeSet<ParticipantId>,
    pub warnings: Vec<TallyWarning>,
}

/// Tally a flat list of match-ups (already scoped to one bracket or group).
///
/// `match_up_format` is the bracket's expected format; a match-up's own format wins.
pub fn tally_participant_results(
    match_ups: &[MatchUp],
    match_up_format: Option<&str>,
    options: &TallyOptions,
) -> Result<TallyReport, ScoringError> {
    tally(std::iter::empty(), match_ups, match_up_format, options)
}

/// Tally a structure. Participants placed in the structure are included even before
/// they play, so an unfinished round is never ranked.
pub fn tally_bracket(
    structure: &Structure,
    match_up_format: Option<&str>,
    options: &TallyOptions,
) -> Result<TallyReport, ScoringError> {
    tally(
        structure.assigned_participant_ids(),
        &structure.match_ups,
        match_up_format,
        options,
    )
}

struct Tally {
    results: BTreeMap<ParticipantId, ParticipantResult>,
    opponents: HashMap<ParticipantId, HashSet<ParticipantId>>,
}

impl Tally {
    fn entry(&mut self, id: &str) -> &mut ParticipantResult {
        self.results.entry(id.to_string()).or_default()
    }

    fn met(&mut self, a: &str, b: &str) {
        self.opponents
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.opponents
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    fn credit_games(&mut self, winner: &str, loser: &str, games: u32) {
        self.entry(winner).games_won += games;
        self.entry(loser).games_lost += games;
    }

    fn credit_points(&mut self, winner: &str, loser: &str, points: u32) {
        self.entry(winner).points_won += points;
        self.entry(loser).points_lost += points;
    }

    fn credit_set(&mut self, winner: &str, loser: &str) {
        self.entry(winner).sets_won += 1;
        self.entry(loser).sets_lost += 1;
    }

    /// A set the winner is awarded without it being played.
    fn award_set(&mut self, format: &SetFormat, winner: &str, loser: &str) {
        self.credit_set(winner, loser);
        match format.kind() {
            SetKind::Standard => {
                self.credit_games(winner, loser, format.set_to.unwrap_or_default())
            }
            SetKind::TiebreakOnly => {
                self.credit_games(winner, loser, 1);
                let points = format.tiebreak_set.map_or(0, |t| t.tiebreak_to);
                self.credit_points(winner, loser, points);
            }
            SetKind::Timed => {}
        }
    }

    fn tally_scores(&mut self, match_up: &MatchUp, ids: [&str; 2], winning_side: SideNumber, format: &MatchFormat) {
        let winner = ids[winning_side.index()];
        let loser = ids[winning_side.opponent().index()];
        let sets_to_win = format.sets_to_win();

        if match_up.match_up_status.is_disqualifying() {
            for set_number in 1..=sets_to_win {
                self.award_set(format.set_format_for(set_number), winner, loser);
            }
            return;
        }

        let retired = match_up.match_up_status == MatchUpStatus::Retired;
        let mut set_wins = [0u32; 2];
        let mut last_set_number = 0;
        for set in sorted_sets(&match_up.sets) {
            // Placeholder sets created with the match-up carry no scores
            if set.is_empty() {
                continue;
            }
            last_set_number = set.set_number;
            let games = set.game_scores();
            let tiebreaks = set.tiebreak_scores();
            let points = set.point_scores();
            for side in [SideNumber::One, SideNumber::Two] {
                let i = side.index();
                let o = side.opponent().index();
                if !set.is_tiebreak_set() {
                    self.credit_games(ids[i], ids[o], games[i].unwrap_or_default());
                }
                let scored = tiebreaks[i].unwrap_or_default() + points[i].unwrap_or_default();
                self.credit_points(ids[i], ids[o], scored);
            }

            let set_winner = set
                .winning_side
                .or_else(|| get_set_winning_side(set, format));
            match set_winner {
                Some(side) => {
                    if set.is_tiebreak_set() {
                        self.credit_games(ids[side.index()], ids[side.opponent().index()], 1);
                    }
                    self.credit_set(ids[side.index()], ids[side.opponent().index()]);
                    set_wins[side.index()] += 1;
                }
                None if retired => {
                    // The unfinished set goes to the winner at the set target.
                    let set_format = format.set_format_for(set.set_number);
                    if set_format.kind() == SetKind::Standard {
                        let have = games[winning_side.index()].unwrap_or_default();
                        let target = set_format.set_to.unwrap_or_default();
                        self.credit_games(winner, loser, target.saturating_sub(have));
                    }
                    self.credit_set(winner, loser);
                    set_wins[winning_side.index()] += 1;
                }
                None => {}
            }
        }

        if retired {
            let mut set_number = last_set_number;
            while set_wins[winning_side.index()] < sets_to_win {
                set_number += 1;
                self.award_set(format.set_format_for(set_number), winner, loser);
                set_wins[winning_side.index()] += 1;
            }
        }
    }
}

fn tally<'a>(
    seed_ids: impl IntoIterator<Item = &'a str>,
    match_ups: &[MatchUp],
    match_up_format: Option<&str>,
    options: &TallyOptions,
) -> Result<TallyReport, ScoringError> {
    let bracket_format = match_up_format.map(MatchFormat::parse).transpose()?;
    let mut tally = Tally {
        results: seed_ids
            .into_iter()
            .map(|id| (id.to_string(), ParticipantResult::default()))
            .collect(),
        opponents: HashMap::new(),
    };
    let mut disqualified = BTreeSet::new();
    let mut warnings = Vec::new();

    let relevant: Vec<&MatchUp> = match_ups
        .iter()
        .filter(|m| m.match_up_status != MatchUpStatus::Bye)
        .collect();
    let bracket_complete = relevant.iter().all(|m| m.winning_side.is_some());

    for match_up in relevant {
        let Some((side1, side2)) = match_up.participant_ids() else {
            log::warn!("match-up {} is missing side participants", match_up.match_up_id);
            warnings.push(TallyWarning::MissingSides {
                match_up_id: match_up.match_up_id.clone(),
            });
            continue;
        };
        let ids = [side1, side2];
        tally.entry(side1);
        tally.entry(side2);

        let Some(winning_side) = match_up.winning_side else {
            if match_up.match_up_status.is_cancelled_outcome() {
                tally.entry(side1).match_ups_cancelled += 1;
                tally.entry(side2).match_ups_cancelled += 1;
                tally.met(side1, side2);
            }
            continue;
        };

        let winner = ids[winning_side.index()];
        let loser = ids[winning_side.opponent().index()];
        tally.entry(winner).match_ups_won += 1;
        tally.entry(winner).victories.push(loser.to_string());
        tally.entry(loser).match_ups_lost += 1;
        tally.entry(loser).defeats.push(winner.to_string());
        tally.met(winner, loser);
        if match_up.match_up_status.is_disqualifying() {
            disqualified.insert(loser.to_string());
        }

        let own_format = match match_up.match_up_format.as_deref() {
            Some(code) => match MatchFormat::parse(code) {
                Ok(format) => Some(format),
                Err(_) => {
                    log::warn!("match-up {} has invalid format {}", match_up.match_up_id, code);
                    warnings.push(TallyWarning::InvalidMatchUpFormat {
                        match_up_id: match_up.match_up_id.clone(),
                        format: code.to_string(),
                    });
                    None
                }
            },
            None => None,
        };
        if let Some(format) = own_format.as_ref().or(bracket_format.as_ref()) {
            tally.tally_scores(match_up, ids, winning_side, format);
        }
    }

    let participants_count = tally.results.len();
    let expected_match_ups = (bracket_complete && participants_count > 1)
        .then(|| participants_count as u32 - 1);
    for result in tally.results.values_mut() {
        compute_ratios(result, expected_match_ups);
    }

    let complete_round = participants_count > 1
        && tally.results.keys().all(|id| {
            tally.opponents.get(id).map_or(0, HashSet::len) == participants_count - 1
        });

    let mut results = tally.results;
    if complete_round {
        let h2h = options.head_to_head_priority;
        let competitive = rank_buckets(&results, &order_hashes(&results, &disqualified, h2h), h2h);
        let awarding = rank_buckets_for_points(&results, h2h);

        for (i, bucket) in competitive.iter().enumerate() {
            for id in bucket {
                if let Some(result) = results.get_mut(id) {
                    result.bracket_order = Some(i as u32 + 1);
                    if bucket.len() > 1 {
                        result.sub_order = options.sub_order_map.get(id).copied();
                    }
                }
            }
        }
        for (i, bucket) in awarding.iter().enumerate() {
            for id in bucket {
                if let Some(result) = results.get_mut(id) {
                    result.points_order = Some(i as u32 + 1);
                }
            }
        }
    } else {
        log::debug!("round incomplete for {} participants; ranks not assigned", participants_count);
    }

    Ok(TallyReport {
        participant_results: results,
        participants_count,
        bracket_complete,
        complete_round,
        disqualified,
        warnings,
    })
}

/// `won / lost` rounded to three decimals; the numerator itself when that is not finite.
fn ratio(won: u32, lost: u32) -> f64 {
    let value = won as f64 / lost as f64;
    let value = if value.is_finite() { value } else { won as f64 };
    (value * 1000.0).round() / 1000.0
}

fn compute_ratios(result: &mut ParticipantResult, expected_match_ups: Option<u32>) {
    result.matches_ratio = match expected_match_ups {
        Some(expected) => ratio(result.match_ups_won, expected),
        None => ratio(result.match_ups_won, result.match_ups_lost),
    };
    result.sets_ratio = ratio(result.sets_won, result.sets_lost);
    result.games_ratio = ratio(result.games_won, result.games_lost);
    result.games_difference = result.games_won as i64 - result.games_lost as i64;
    result.points_ratio = ratio(result.points_won, result.points_lost);
}

/// Single sortable scalar combining match, set, game and point ratios.
/// With head-to-head priority the game difference replaces the game ratio.
pub fn composite_score(result: &ParticipantResult, head_to_head_priority: bool) -> f64 {
    let games = if head_to_head_priority {
        result.games_difference as f64
    } else {
        result.games_ratio
    };
    result.matches_ratio * MATCHES_WEIGHT
        + result.sets_ratio * SETS_WEIGHT
        + games * GAMES_WEIGHT
        + result.points_ratio * POINTS_WEIGHT
}

/// Competitive hash: zero for a disqualified participant.
pub fn order_hash(result: &ParticipantResult, disqualified: bool, head_to_head_priority: bool) -> f64 {
    if disqualified {
        0.0
    } else {
        composite_score(result, head_to_head_priority)
    }
}

/// Points-award hash: the composite score regardless of disqualification.
pub fn ratio_hash(result: &ParticipantResult, head_to_head_priority: bool) -> f64 {
    composite_score(result, head_to_head_priority)
}

fn order_hashes(
    results: &BTreeMap<ParticipantId, ParticipantResult>,
    disqualified: &BTreeSet<ParticipantId>,
    h2h: bool,
) -> BTreeMap<ParticipantId, f64> {
    results
        .iter()
        .map(|(id, r)| (id.clone(), order_hash(r, disqualified.contains(id), h2h)))
        .collect()
}

fn rank_buckets_for_points(
    results: &BTreeMap<ParticipantId, ParticipantResult>,
    h2h: bool,
) -> Vec<Vec<ParticipantId>> {
    let hashes = results
        .iter()
        .map(|(id, r)| (id.clone(), ratio_hash(r, h2h)))
        .collect();
    rank_buckets(results, &hashes, h2h)
}

/// Participants sorted by hash (descending) and grouped where hashes are equal.
fn group_by_hash(mut ids: Vec<&ParticipantId>, hashes: &BTreeMap<ParticipantId, f64>) -> Vec<Vec<ParticipantId>> {
    let hash = |id: &ParticipantId| hashes.get(id).copied().unwrap_or_default();
    ids.sort_by(|a, b| hash(*b).total_cmp(&hash(*a)).then_with(|| a.cmp(b)));

    let mut buckets: Vec<Vec<ParticipantId>> = Vec::new();
    let mut last: Option<f64> = None;
    for id in ids {
        let h = hash(id);
        match buckets.last_mut() {
            Some(bucket) if last == Some(h) => bucket.push(id.clone()),
            _ => buckets.push(vec![id.clone()]),
        }
        last = Some(h);
    }
    buckets
}

/// Ordered groups of equally ranked participants; rank = group index + 1.
fn rank_buckets(
    results: &BTreeMap<ParticipantId, ParticipantResult>,
    hashes: &BTreeMap<ParticipantId, f64>,
    head_to_head_priority: bool,
) -> Vec<Vec<ParticipantId>> {
    if !head_to_head_priority {
        return group_by_hash(results.keys().collect(), hashes);
    }

    let mut by_wins: BTreeMap<std::cmp::Reverse<u32>, Vec<&ParticipantId>> = BTreeMap::new();
    for (id, result) in results {
        by_wins
            .entry(std::cmp::Reverse(result.match_ups_won))
            .or_default()
            .push(id);
    }

    let mut buckets = Vec::new();
    for group in by_wins.into_values() {
        if let [a, b] = group[..] {
            let a_beat_b = results.get(a).is_some_and(|r| r.has_beaten(b));
            let b_beat_a = results.get(b).is_some_and(|r| r.has_beaten(a));
            if a_beat_b != b_beat_a {
                let (first, second) = if a_beat_b { (a, b) } else { (b, a) };
                buckets.push(vec![first.clone()]);
                buckets.push(vec![second.clone()]);
                continue;
            }
        }
        buckets.extend(group_by_hash(group, hashes));
    }
    buckets
}

/// Competitive rank of each participant (1-based, ties share a rank, no gaps).
///
/// Ranks are dense: after two participants tied first the next one is 2, not 3.
pub fn determine_team_order(
    results: &BTreeMap<ParticipantId, ParticipantResult>,
    disqualified: &BTreeSet<ParticipantId>,
    head_to_head_priority: bool,
) -> BTreeMap<ParticipantId, u32> {
    let hashes = order_hashes(results, disqualified, head_to_head_priority);
    to_ranks(rank_buckets(results, &hashes, head_to_head_priority))
}

/// Points-award rank of each participant; disqualification does not lower it.
pub fn determine_points_order(
    results: &BTreeMap<ParticipantId, ParticipantResult>,
    head_to_head_priority: bool,
) -> BTreeMap<ParticipantId, u32> {
    to_ranks(rank_buckets_for_points(results, head_to_head_priority))
}

fn to_ranks(buckets: Vec<Vec<ParticipantId>>) -> BTreeMap<ParticipantId, u32> {
    buckets
        .into_iter()
        .enumerate()
        .flat_map(|(i, bucket)| bucket.into_iter().map(move |id| (id, i as u32 + 1)))
        .collect()
}
