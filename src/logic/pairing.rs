//! Pairing weights and the randomized search for a low-cost set of pairings.

use crate::models::{MatchUp, Participant, ParticipantId, ParticipantType};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Order-independent key for a pair of participants: `(a, b)` and `(b, a)` collide.
pub fn pairing_hash(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}|{}", a, b)
    } else {
        format!("{}|{}", b, a)
    }
}

/// Accumulated penalties per pair (previous encounters, teammates).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PairingWeights {
    weights: HashMap<String, f64>,
}

impl PairingWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, a: &str, b: &str, value: f64) {
        *self.weights.entry(pairing_hash(a, b)).or_default() += value;
    }

    pub fn get(&self, a: &str, b: &str) -> f64 {
        self.weights
            .get(&pairing_hash(a, b))
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Add `encounter_value` for every match-up with two assigned sides.
    pub fn add_encounters(&mut self, match_ups: &[MatchUp], encounter_value: f64) {
        for (a, b) in match_ups.iter().filter_map(MatchUp::participant_ids) {
            self.add(a, b, encounter_value);
        }
    }

    /// Add `same_team_value` for every pair of members of the same team.
    pub fn add_teammates(&mut self, participants: &[Participant], same_team_value: f64) {
        for team in participants
            .iter()
            .filter(|p| p.participant_type == ParticipantType::Team)
        {
            let members = &team.individual_participant_ids;
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    self.add(a, b, same_team_value);
                }
            }
        }
    }
}

/// A full round of pairings and its cost.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub pairings: Vec<[ParticipantId; 2]>,
    pub unpaired: Option<ParticipantId>,
    /// Sum of pair weights plus rating deltas.
    pub value: f64,
    /// Largest rating difference in the round.
    pub max_delta: f64,
    /// Largest encounter/teammate weight in the round.
    pub max_diff: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub candidate: Candidate,
    pub iterations: u32,
    pub candidates_count: u32,
}

#[derive(Clone, Copy)]
struct ScoredPair {
    a: usize,
    b: usize,
    delta: f64,
    weight: f64,
}

impl ScoredPair {
    fn value(&self) -> f64 {
        self.weight + self.delta
    }
}

struct RoundCandidate {
    pairs: Vec<(usize, usize)>,
    value: f64,
}

impl RoundCandidate {
    fn key(&self) -> Vec<(usize, usize)> {
        let mut key: Vec<(usize, usize)> = self
            .pairs
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect();
        key.sort_unstable();
        key
    }
}

struct Search<'a> {
    size: usize,
    /// All unique pairs, cheapest first.
    ranked: Vec<ScoredPair>,
    by_pair: HashMap<(usize, usize), ScoredPair>,
    salted: f64,
    ids: &'a [ParticipantId],
}

impl<'a> Search<'a> {
    fn pair(&self, a: usize, b: usize) -> Option<&ScoredPair> {
        self.by_pair.get(&(a.min(b), a.max(b)))
    }

    /// Greedy round: stipulated pairs first, then the cheapest remaining pairs. Pairs are
    /// shuffled within blocks and lightly salted so repeated calls explore different rounds.
    fn round<R: Rng + ?Sized>(&self, stipulated: &[(usize, usize)], rng: &mut R) -> RoundCandidate {
        let mut paired = vec![false; self.size];
        let mut pairs = Vec::with_capacity(self.size / 2);
        for &(a, b) in stipulated {
            if a != b && !paired[a] && !paired[b] {
                paired[a] = true;
                paired[b] = true;
                pairs.push((a, b));
            }
        }

        let mut considered: Vec<(f64, ScoredPair)> = Vec::with_capacity(self.ranked.len());
        for block in self.ranked.chunks(self.size.max(1)) {
            let mut block: Vec<(f64, ScoredPair)> = block
                .iter()
                .map(|p| {
                    let salt = if rng.gen_bool(0.5) { self.salted } else { 0.0 };
                    (p.value() + rng.gen::<f64>() * salt, *p)
                })
                .collect();
            block.shuffle(rng);
            block.sort_by(|x, y| x.0.total_cmp(&y.0));
            considered.extend(block);
        }

        for (_, p) in considered {
            if !paired[p.a] && !paired[p.b] {
                paired[p.a] = true;
                paired[p.b] = true;
                pairs.push((p.a, p.b));
            }
        }

        let value = pairs
            .iter()
            .filter_map(|&(a, b)| self.pair(a, b))
            .map(ScoredPair::value)
            .sum();
        RoundCandidate { pairs, value }
    }

    fn finish(&self, round: &RoundCandidate) -> Candidate {
        let mut paired = vec![false; self.size];
        let mut max_delta: f64 = 0.0;
        let mut max_diff: f64 = 0.0;
        let mut pairings = Vec::with_capacity(round.pairs.len());
        for &(a, b) in &round.pairs {
            paired[a] = true;
            paired[b] = true;
            if let Some(p) = self.pair(a, b) {
                max_delta = max_delta.max(p.delta);
                max_diff = max_diff.max(p.weight);
            }
            pairings.push([self.ids[a].clone(), self.ids[b].clone()]);
        }
        Candidate {
            pairings,
            unpaired: paired
                .iter()
                .position(|p| !p)
                .map(|i| self.ids[i].clone()),
            value: round.value,
            max_delta,
            max_diff,
        }
    }
}

/// Alternative stipulations around the current best round: for every two pairs, the two
/// ways of swapping partners; for an odd pool, the unpaired participant taking either
/// place in each pair.
fn variations(round: &RoundCandidate, size: usize) -> Vec<Vec<(usize, usize)>> {
    let mut variations = Vec::new();
    let pairs = &round.pairs;
    for (x, &(a, b)) in pairs.iter().enumerate() {
        for &(c, d) in &pairs[x + 1..] {
            variations.push(vec![(a, c), (b, d)]);
            variations.push(vec![(a, d), (b, c)]);
        }
    }
    let mut seated = vec![false; size];
    for &(a, b) in pairs {
        seated[a] = true;
        seated[b] = true;
    }
    if let Some(unpaired) = seated.iter().position(|s| !s) {
        for &(a, b) in pairs {
            variations.push(vec![(unpaired, a)]);
            variations.push(vec![(unpaired, b)]);
        }
    }
    variations
}

/// Search for the lowest-cost round of pairings within `max_iterations` proposals.
///
/// Cost of a pair is its accumulated weight plus the absolute rating difference (zero
/// when either rating is unknown). Returns `None` when no pair can be formed.
pub fn search_pairings<R: Rng + ?Sized>(
    participant_ids: &[ParticipantId],
    ratings: &HashMap<ParticipantId, f64>,
    weights: &PairingWeights,
    salted: f64,
    max_iterations: u32,
    rng: &mut R,
) -> Option<SearchOutcome> {
    let size = participant_ids.len();
    if size < 2 {
        return None;
    }

    let mut ranked = Vec::with_capacity(size * (size - 1) / 2);
    for a in 0..size {
        for b in a + 1..size {
            let (ida, idb) = (&participant_ids[a], &participant_ids[b]);
            let delta = match (ratings.get(ida), ratings.get(idb)) {
                (Some(ra), Some(rb)) => (ra - rb).abs(),
                _ => 0.0,
            };
            ranked.push(ScoredPair {
                a,
                b,
                delta,
                weight: weights.get(ida, idb),
            });
        }
    }
    ranked.sort_by(|x, y| x.value().total_cmp(&y.value()));
    let search = Search {
        size,
        by_pair: ranked.iter().map(|p| ((p.a, p.b), *p)).collect(),
        ranked,
        salted,
        ids: participant_ids,
    };

    let mut best = search.round(&[], rng);
    if best.pairs.is_empty() {
        return None;
    }
    let mut seen: HashSet<Vec<(usize, usize)>> = HashSet::new();
    seen.insert(best.key());
    let mut iterations = 1;

    while iterations < max_iterations {
        let mut improved = false;
        for stipulated in variations(&best, size) {
            if iterations >= max_iterations {
                break;
            }
            iterations += 1;
            let proposal = search.round(&stipulated, rng);
            seen.insert(proposal.key());
            if proposal.value < best.value {
                best = proposal;
                improved = true;
                break;
            }
        }
        if !improved {
            break;
        }
    }

    Some(SearchOutcome {
        candidate: search.finish(&best),
        iterations,
        candidates_count: seen.len() as u32,
    })
}
