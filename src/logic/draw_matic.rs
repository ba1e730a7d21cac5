//! DrawMatic: ad hoc rounds paired by rating proximity while avoiding repeat encounters
//! and teammates.

use crate::logic::pairing::{search_pairings, PairingWeights};
use crate::models::{
    DrawEntry, EventType, MatchUp, Participant, ParticipantId, ScoringError,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const MAX_ITERATIONS: u32 = 4000;
pub const ENCOUNTER_VALUE: f64 = 100.0;
pub const SAME_TEAM_VALUE: f64 = 100.0;
pub const DEFAULT_SALTED: f64 = 0.5;
pub const DEFAULT_SCALE_NAME: &str = "WTN";

fn default_max_iterations() -> u32 {
    MAX_ITERATIONS
}

fn default_encounter_value() -> f64 {
    ENCOUNTER_VALUE
}

fn default_same_team_value() -> f64 {
    SAME_TEAM_VALUE
}

fn default_salted() -> f64 {
    DEFAULT_SALTED
}

fn default_scale_name() -> String {
    DEFAULT_SCALE_NAME.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawMaticConfig {
    /// Upper bound on proposals evaluated per round.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Penalty added for each previous meeting of a pair.
    #[serde(default = "default_encounter_value")]
    pub encounter_value: f64,
    /// Penalty for pairing members of the same team.
    #[serde(default = "default_same_team_value")]
    pub same_team_value: f64,
    /// Amplitude of the random perturbation applied while pairing.
    #[serde(default = "default_salted")]
    pub salted: f64,
    #[serde(default = "default_scale_name")]
    pub scale_name: String,
    #[serde(default)]
    pub event_type: EventType,
    /// Only pair entries whose status places them in the draw.
    #[serde(default = "default_true")]
    pub restrict_entry_status: bool,
    /// Format code stamped on generated match-ups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_up_format: Option<String>,
}

impl Default for DrawMaticConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            encounter_value: ENCOUNTER_VALUE,
            same_team_value: SAME_TEAM_VALUE,
            salted: DEFAULT_SALTED,
            scale_name: default_scale_name(),
            event_type: EventType::default(),
            restrict_entry_status: true,
            match_up_format: None,
        }
    }
}

/// Inputs for generating a round.
#[derive(Clone, Copy, Debug)]
pub struct DrawMaticParams<'a> {
    pub entries: &'a [DrawEntry],
    /// Participant records carrying ratings and team membership.
    pub participants: &'a [Participant],
    /// Match-ups already played or scheduled in the draw.
    pub match_ups: &'a [MatchUp],
    /// Ratings that override anything on the participant records.
    pub ad_hoc_ratings: &'a HashMap<ParticipantId, f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawMaticRound {
    pub round_number: u32,
    pub match_ups: Vec<MatchUp>,
    pub participant_id_pairings: Vec<[ParticipantId; 2]>,
    /// Left out of an odd pool.
    pub unpaired: Option<ParticipantId>,
    pub iterations: u32,
    pub candidates_count: u32,
    pub max_delta: f64,
    pub max_diff: f64,
}

/// Participant ids to pair, in entry order and without duplicates.
pub fn resolve_participant_ids(entries: &[DrawEntry], restrict_entry_status: bool) -> Vec<ParticipantId> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|e| !restrict_entry_status || e.entry_status.is_selected())
        .filter(|e| seen.insert(e.participant_id.as_str()))
        .map(|e| e.participant_id.clone())
        .collect()
}

/// Rating per participant: ad hoc value first, then the participant's dynamic rating,
/// then the static one. Unrated participants are absent from the map.
pub fn resolve_ratings(
    participant_ids: &[ParticipantId],
    participants: &[Participant],
    ad_hoc_ratings: &HashMap<ParticipantId, f64>,
    scale_name: &str,
    event_type: EventType,
) -> HashMap<ParticipantId, f64> {
    let records: HashMap<&str, &Participant> = participants
        .iter()
        .map(|p| (p.participant_id.as_str(), p))
        .collect();
    participant_ids
        .iter()
        .filter_map(|id| {
            let rating = ad_hoc_ratings.get(id).copied().or_else(|| {
                records
                    .get(id.as_str())
                    .and_then(|p| p.rating(scale_name, event_type))
            })?;
            Some((id.clone(), rating))
        })
        .collect()
}

/// Encounter and teammate penalties for the existing match-ups.
pub fn build_pairing_weights(
    match_ups: &[MatchUp],
    participants: &[Participant],
    config: &DrawMaticConfig,
) -> PairingWeights {
    let mut weights = PairingWeights::new();
    weights.add_encounters(match_ups, config.encounter_value);
    weights.add_teammates(participants, config.same_team_value);
    weights
}

fn next_round_number(match_ups: &[MatchUp]) -> u32 {
    match_ups
        .iter()
        .filter_map(|m| m.round_number)
        .max()
        .unwrap_or_default()
        + 1
}

fn generated_match_up_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    uuid::Builder::from_random_bytes(rng.gen())
        .into_uuid()
        .to_string()
}

/// Generate the next round.
///
/// 1. Resolve entries to distinct participant ids.
/// 2. Resolve ratings (ad hoc, dynamic, static).
/// 3. Search for the pairing that minimizes rating deltas plus accumulated weights.
/// 4. Build a match-up per pairing, numbered after the latest existing round.
pub fn generate_draw_matic_round<R: Rng + ?Sized>(
    params: &DrawMaticParams<'_>,
    weights: &PairingWeights,
    config: &DrawMaticConfig,
    rng: &mut R,
) -> Result<DrawMaticRound, ScoringError> {
    if params.entries.is_empty() {
        return Err(ScoringError::MissingParticipantIds);
    }
    let participant_ids = resolve_participant_ids(params.entries, config.restrict_entry_status);
    let ratings = resolve_ratings(
        &participant_ids,
        params.participants,
        params.ad_hoc_ratings,
        &config.scale_name,
        config.event_type,
    );

    let outcome = search_pairings(
        &participant_ids,
        &ratings,
        weights,
        config.salted,
        config.max_iterations,
        rng,
    )
    .ok_or(ScoringError::NoCandidates)?;
    log::debug!(
        "drawMatic: {} participants, {} iterations, {} candidates, value {}",
        participant_ids.len(),
        outcome.iterations,
        outcome.candidates_count,
        outcome.candidate.value
    );

    let round_number = next_round_number(params.match_ups);
    let candidate = outcome.candidate;
    let match_ups = candidate
        .pairings
        .iter()
        .map(|[a, b]| MatchUp {
            round_number: Some(round_number),
            match_up_format: config.match_up_format.clone(),
            ..MatchUp::new(generated_match_up_id(rng), a.as_str(), b.as_str())
        })
        .collect();

    Ok(DrawMaticRound {
        round_number,
        match_ups,
        participant_id_pairings: candidate.pairings,
        unpaired: candidate.unpaired,
        iterations: outcome.iterations,
        candidates_count: outcome.candidates_count,
        max_delta: candidate.max_delta,
        max_diff: candidate.max_diff,
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawMaticRounds {
    pub rounds: Vec<DrawMaticRound>,
    /// Existing match-ups followed by every generated one.
    pub match_ups: Vec<MatchUp>,
    pub weights: PairingWeights,
}

/// Generate `rounds_count` consecutive rounds; each round's pairings count as encounters
/// for the rounds after it.
pub fn generate_draw_matic<R: Rng + ?Sized>(
    params: &DrawMaticParams<'_>,
    rounds_count: u32,
    config: &DrawMaticConfig,
    rng: &mut R,
) -> Result<DrawMaticRounds, ScoringError> {
    let mut weights = build_pairing_weights(params.match_ups, params.participants, config);
    let mut match_ups = params.match_ups.to_vec();
    let mut rounds = Vec::with_capacity(rounds_count as usize);

    for _ in 0..rounds_count {
        let round = generate_draw_matic_round(
            &DrawMaticParams {
                match_ups: &match_ups,
                ..*params
            },
            &weights,
            config,
            rng,
        )?;
        weights.add_encounters(&round.match_ups, config.encounter_value);
        match_ups.extend(round.match_ups.iter().cloned());
        rounds.push(round);
    }

    Ok(DrawMaticRounds {
        rounds,
        match_ups,
        weights,
    })
}
