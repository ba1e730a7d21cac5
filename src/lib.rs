//! Competition scoring engine: score analysis and validation, score strings,
//! round robin tallies and drawMatic pairings.

pub mod logic;
pub mod models;

pub use logic::{
    analyze_match_up, analyze_set, check_score_edit, check_set_is_complete, generate_draw_matic,
    generate_draw_matic_round, generate_score_string, get_set_complement, get_set_winning_side,
    get_tiebreak_complement, match_up_score, parse_score_string, parse_score_value,
    tally_bracket, tally_participant_results, validate_match_up_score, validate_set_score,
    DrawMaticConfig, DrawMaticParams, DrawMaticRound, DrawMaticRounds, MatchUpAnalysis,
    MatchUpScoreError, PairingWeights, ScoreStringOptions, ScoreTarget, SetAnalysis,
    SetScoreError, SetState, TallyOptions, TallyReport, TallyWarning,
};
pub use models::{
    DrawEntry, EntryStatus, EventType, MatchFormat, MatchUp, MatchUpStatus, Participant,
    ParticipantId, ParticipantResult, ScoringError, SetFormat, SetKind, SetScore, SideNumber,
    Structure,
};
