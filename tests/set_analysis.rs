//! Integration tests for set analysis: winners, stable reason strings, set kinds and states.

use competition_scoring::{
    analyze_set, check_set_is_complete, get_set_winning_side, validate_set_score, MatchFormat,
    SetKind, SetScore, SetScoreError, SetState, SideNumber,
};

fn format(code: &str) -> MatchFormat {
    MatchFormat::parse(code).unwrap()
}

fn outcome_error(set: &SetScore, code: &str) -> Option<SetScoreError> {
    analyze_set(set, &format(code)).outcome_error
}

#[test]
fn completed_standard_set() {
    let set = SetScore::games(1, 6, 4).with_winner(SideNumber::One);
    let analysis = analyze_set(&set, &format("SET3-S:6/TB7"));
    assert!(analysis.is_valid_set);
    assert!(analysis.is_valid_set_outcome);
    assert!(analysis.is_completed_set);
    assert_eq!(analysis.analysis_winning_side, Some(SideNumber::One));
    assert_eq!(analysis.kind, SetKind::Standard);
    assert_eq!(analysis.state, SetState::Complete);
    assert_eq!(analysis.side_game_scores, [Some(6), Some(4)]);
    assert_eq!(analysis.side_game_scores_count, 2);
    assert_eq!(analysis.side_tiebreak_scores_count, 0);
}

#[test]
fn winner_needs_set_target() {
    let set = SetScore::games(1, 5, 3);
    let err = outcome_error(&set, "SET3-S:6/TB7").unwrap();
    assert_eq!(err, SetScoreError::WinningGameScoreNotHigh);
    assert_eq!(err.to_string(), "winning game score is not high");
}

#[test]
fn standard_margin_invariant() {
    // No tiebreak threshold crossed: valid iff winner reached setTo and margin >= 2
    let f = format("SET3-S:6/TB7");
    for w in 0..=7u32 {
        for l in 0..=5u32 {
            let set = SetScore::games(1, w, l);
            let expected = w >= 6 && w >= l + 2;
            assert_eq!(
                check_set_is_complete(&set, &f),
                expected,
                "{w}-{l} expected complete = {expected}"
            );
        }
    }
}

#[test]
fn game_score_above_cap_is_rejected() {
    let set = SetScore::games(1, 8, 6);
    assert_eq!(
        outcome_error(&set, "SET3-S:6/TB7"),
        Some(SetScoreError::WinningGameScoreTooHigh)
    );
}

#[test]
fn numbered_tiebreak_reasons() {
    let f = "SET3-S:6/TB7";
    let cases = [
        (SetScore::games(1, 7, 6), "invalid tiebreak scores (1)"),
        (SetScore::games(1, 7, 6).with_tiebreak(5, 7), "invalid tiebreak scores (2)"),
        (SetScore::games(1, 7, 6).with_tiebreak(6, 4), "invalid tiebreak scores (3)"),
        (SetScore::games(1, 7, 6).with_tiebreak(8, 7), "invalid tiebreak scores (4)"),
        (SetScore::games(1, 7, 6).with_tiebreak(10, 7), "invalid tiebreak scores (5)"),
    ];
    for (set, reason) in cases {
        assert_eq!(outcome_error(&set, f).unwrap().reason(), reason);
    }
}

#[test]
fn valid_tiebreak_sets() {
    let f = format("SET3-S:6/TB7");
    assert_eq!(
        get_set_winning_side(&SetScore::games(1, 7, 6).with_tiebreak(7, 5), &f),
        Some(SideNumber::One)
    );
    assert_eq!(
        get_set_winning_side(&SetScore::games(1, 6, 7).with_tiebreak(10, 12), &f),
        Some(SideNumber::Two)
    );
}

#[test]
fn tiebreak_scores_without_tiebreak_are_unexpected() {
    let set = SetScore::games(1, 6, 3).with_tiebreak(7, 2);
    assert_eq!(
        outcome_error(&set, "SET3-S:6/TB7"),
        Some(SetScoreError::UnexpectedTiebreakScores)
    );
}

#[test]
fn early_tiebreak_threshold() {
    let f = format("SET3-S:6/TB7@5");
    // Tiebreak played at 5-5, the winner finishes on 6
    assert!(check_set_is_complete(&SetScore::games(1, 6, 5).with_tiebreak(7, 3), &f));
    assert_eq!(
        analyze_set(&SetScore::games(1, 7, 5), &f).outcome_error,
        Some(SetScoreError::WinningGameScoreTooHigh)
    );
}

#[test]
fn noad_set_is_won_by_one_game() {
    let f = format("SET3-S:4NOAD");
    assert!(check_set_is_complete(&SetScore::games(1, 4, 3), &f));
    assert!(!check_set_is_complete(&SetScore::games(1, 4, 3), &format("SET3-S:4")));
}

#[test]
fn deciding_tiebreak_only_set() {
    let f = format("SET3-S:6/TB7-F:TB10");
    let analysis = analyze_set(&SetScore::tiebreak(3, 10, 8).with_winner(SideNumber::One), &f);
    assert!(analysis.is_deciding_set);
    assert!(analysis.is_tiebreak_set);
    assert!(analysis.is_valid_set);

    assert_eq!(
        analyze_set(&SetScore::tiebreak(3, 10, 9), &f).outcome_error,
        Some(SetScoreError::InsufficientTiebreakSetMargin)
    );
    assert_eq!(
        analyze_set(&SetScore::tiebreak(3, 12, 9), &f).outcome_error,
        Some(SetScoreError::ExtendedTiebreakSetMargin)
    );
    assert_eq!(
        analyze_set(&SetScore::tiebreak(3, 8, 5), &f).outcome_error,
        Some(SetScoreError::TiebreakSetScoreNotHigh)
    );
}

#[test]
fn tiebreak_only_margin_invariant() {
    let f = format("SET1-S:TB10");
    for w in 0..=14u32 {
        for l in 0..w {
            let set = SetScore::tiebreak(1, w, l);
            let expected = w >= 10 && if l + 1 >= 10 { w - l == 2 } else { w - l >= 2 };
            assert_eq!(check_set_is_complete(&set, &f), expected, "[{w}-{l}]");
        }
    }
}

#[test]
fn set_noad_flag_overrides_format() {
    let f = format("SET3-S:6/TB7-F:TB10");
    let mut set = SetScore::tiebreak(3, 10, 9);
    set.no_ad = Some(true);
    assert_eq!(get_set_winning_side(&set, &f), Some(SideNumber::One));

    // An explicit false wins over a NOAD format
    let mut strict = SetScore::tiebreak(1, 10, 9);
    strict.no_ad = Some(false);
    assert!(!check_set_is_complete(&strict, &format("SET1-S:TB10NOAD")));
}

#[test]
fn tiebreak_only_set_rejects_game_scores() {
    let f = format("SET3-S:6/TB7-F:TB10");
    let mut set = SetScore::tiebreak(3, 10, 5);
    set.side1_score = Some(1);
    let analysis = analyze_set(&set, &f);
    assert!(!analysis.is_valid_set);
    assert_eq!(analysis.set_error, Some(SetScoreError::UnexpectedGameScores));
    assert_eq!(analysis.state, SetState::Invalid);
}

#[test]
fn timed_sets() {
    let games = format("SET1-S:T10");
    let analysis = analyze_set(&SetScore::games(1, 3, 2), &games);
    assert!(analysis.is_timed_set);
    assert_eq!(analysis.analysis_winning_side, Some(SideNumber::One));
    assert_eq!(
        analyze_set(&SetScore::games(1, 2, 2), &games).outcome_error,
        Some(SetScoreError::TiedTimedScores)
    );

    let points = format("SET1-S:T10P");
    let mut set = SetScore {
        set_number: 1,
        ..SetScore::default()
    };
    set.side1_point_score = Some(21);
    set.side2_point_score = Some(25);
    assert_eq!(get_set_winning_side(&set, &points), Some(SideNumber::Two));
}

#[test]
fn states_follow_set_lifecycle() {
    let f = format("SET3-S:6/TB7");
    let empty = SetScore {
        set_number: 2,
        ..SetScore::default()
    };
    assert_eq!(analyze_set(&empty, &f).state, SetState::Empty);

    let in_progress = analyze_set(&SetScore::games(2, 3, 2), &f);
    assert_eq!(in_progress.state, SetState::InProgress);
    assert!(in_progress.is_valid_set);
    assert!(in_progress.set_error.is_none());
    assert!(in_progress.outcome_error.is_some());

    let mismatch = analyze_set(&SetScore::games(2, 6, 2).with_winner(SideNumber::Two), &f);
    assert_eq!(mismatch.state, SetState::Invalid);
    assert_eq!(mismatch.set_error, Some(SetScoreError::WinningSideMismatch));
}

#[test]
fn set_number_beyond_best_of_is_invalid() {
    let analysis = analyze_set(&SetScore::games(4, 6, 1), &format("SET3-S:6/TB7"));
    assert!(!analysis.is_valid_set_number);
    assert_eq!(analysis.set_error, Some(SetScoreError::InvalidSetNumber));
}

#[test]
fn impossible_score_in_progress_is_invalid() {
    let code = "SET3-S:6/TB7";
    let analysis = analyze_set(&SetScore::games(1, 9, 0), &format(code));
    assert!(!analysis.is_valid_set);
    assert_eq!(analysis.state, SetState::Invalid);
    assert_eq!(analysis.set_error, Some(SetScoreError::WinningGameScoreTooHigh));
    assert_eq!(
        validate_set_score(&SetScore::games(1, 9, 0), Some(code), false, true),
        Err(SetScoreError::WinningGameScoreTooHigh)
    );

    // Both surfaces accept a plausible score in progress
    assert!(analyze_set(&SetScore::games(1, 7, 6), &format(code)).is_valid_set);
    assert_eq!(validate_set_score(&SetScore::games(1, 7, 6), Some(code), false, true), Ok(()));
}
