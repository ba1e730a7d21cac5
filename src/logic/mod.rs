//! Scoring logic: set and match-up analysis, score strings, validation, tallies, drawMatic.

mod complement;
mod draw_matic;
mod match_up_analysis;
mod pairing;
mod score_string;
pub(crate) mod set_analysis;
mod tally;
mod validate_score;

pub use complement::{get_set_complement, get_tiebreak_complement, parse_score_value};
pub use draw_matic::{
    build_pairing_weights, generate_draw_matic, generate_draw_matic_round, resolve_participant_ids,
    resolve_ratings, DrawMaticConfig, DrawMaticParams, DrawMaticRound, DrawMaticRounds,
    ENCOUNTER_VALUE, MAX_ITERATIONS, SAME_TEAM_VALUE,
};
pub use match_up_analysis::{analyze_match_up, check_score_edit, MatchUpAnalysis, ScoreTarget};
pub use pairing::{pairing_hash, search_pairings, Candidate, PairingWeights, SearchOutcome};
pub use score_string::{
    generate_score_string, match_up_score, parse_score_string, MatchUpScoreStrings, ParsedScore,
    ScoreStringOptions,
};
pub use set_analysis::{
    analyze_set, check_set_is_complete, get_set_winning_side, SetAnalysis, SetScoreError,
    SetState, DEFAULT_SET_TO, DEFAULT_TIEBREAK_TO,
};
pub use tally::{
    composite_score, determine_points_order, determine_team_order, order_hash, ratio_hash,
    tally_bracket, tally_participant_results, TallyOptions, TallyReport, TallyWarning,
};
pub use validate_score::{validate_match_up_score, validate_set_score, MatchUpScoreError};
