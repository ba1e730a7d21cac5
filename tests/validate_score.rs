//! Integration tests for the standalone score validator.

use competition_scoring::{
    validate_match_up_score, validate_set_score, MatchUpScoreError, MatchUpStatus, SetScore,
    SetScoreError, SideNumber,
};

#[test]
fn set_noad_flag_wins_over_format() {
    let mut set = SetScore::tiebreak(1, 10, 9);
    assert_eq!(
        validate_set_score(&set, Some("SET3-S:TB10"), false, false),
        Err(SetScoreError::InsufficientTiebreakSetMargin)
    );

    set.no_ad = Some(true);
    assert_eq!(validate_set_score(&set, Some("SET3-S:TB10"), false, false), Ok(()));
}

#[test]
fn defaults_to_six_game_sets_with_tiebreak_to_seven() {
    let set = SetScore::games(1, 7, 6).with_tiebreak(7, 5);
    assert_eq!(validate_set_score(&set, None, false, false), Ok(()));
    assert_eq!(
        validate_set_score(&SetScore::games(1, 7, 6), None, false, false),
        Err(SetScoreError::MissingTiebreakScores)
    );
}

#[test]
fn allow_incomplete_skips_completion_checks() {
    let set = SetScore::games(1, 3, 2);
    assert_eq!(
        validate_set_score(&set, Some("SET3-S:6/TB7"), false, false),
        Err(SetScoreError::WinningGameScoreNotHigh)
    );
    assert_eq!(validate_set_score(&set, Some("SET3-S:6/TB7"), false, true), Ok(()));

    // Impossible values still fail while in progress
    assert_eq!(
        validate_set_score(&SetScore::games(1, 9, 2), Some("SET3-S:6/TB7"), false, true),
        Err(SetScoreError::WinningGameScoreTooHigh)
    );
}

#[test]
fn timed_set_rejects_tiebreak_scores() {
    let mut set = SetScore::games(1, 5, 3);
    set.side1_tiebreak_score = Some(2);
    assert_eq!(
        validate_set_score(&set, Some("SET1-S:T10"), false, true),
        Err(SetScoreError::UnexpectedTimedTiebreakScores)
    );
    assert_eq!(
        validate_set_score(&SetScore::games(1, 5, 3), Some("SET1-S:T10"), false, false),
        Ok(())
    );
}

#[test]
fn deciding_set_uses_final_set_token() {
    let set = SetScore::tiebreak(3, 10, 8);
    let format = Some("SET3-S:6/TB7-F:TB10");
    assert_eq!(validate_set_score(&set, format, true, false), Ok(()));
    assert_eq!(
        validate_set_score(&set, format, false, false),
        Err(SetScoreError::MissingGameScores)
    );
}

#[test]
fn recorded_winner_must_match_scores() {
    let set = SetScore::games(1, 6, 4).with_winner(SideNumber::Two);
    assert_eq!(
        validate_set_score(&set, Some("SET3-S:6/TB7"), false, false),
        Err(SetScoreError::WinningSideMismatch)
    );
}

#[test]
fn match_in_progress_is_not_an_error() {
    let format = Some("SET3-S:6/TB7");
    assert_eq!(validate_match_up_score(&[SetScore::games(1, 3, 2)], format, None), Ok(()));
    assert_eq!(
        validate_match_up_score(
            &[SetScore::games(1, 6, 4), SetScore::games(2, 2, 2)],
            format,
            Some(MatchUpStatus::InProgress)
        ),
        Ok(())
    );
    assert_eq!(validate_match_up_score(&[], format, None), Ok(()));
}

#[test]
fn earlier_sets_must_be_complete() {
    let sets = [SetScore::games(1, 5, 4), SetScore::games(2, 1, 0)];
    assert_eq!(
        validate_match_up_score(&sets, Some("SET3-S:6/TB7"), None),
        Err(MatchUpScoreError::InvalidSet {
            set_number: 1,
            error: SetScoreError::WinningGameScoreNotHigh
        })
    );
}

#[test]
fn completed_match_needs_a_winner() {
    let format = Some("SET3-S:6/TB7");
    let completed = Some(MatchUpStatus::Completed);
    assert_eq!(
        validate_match_up_score(&[SetScore::games(1, 6, 4)], format, completed),
        Err(MatchUpScoreError::Undecided)
    );
    assert_eq!(
        validate_match_up_score(
            &[SetScore::games(1, 6, 4), SetScore::games(2, 6, 3)],
            format,
            completed
        ),
        Ok(())
    );
}

#[test]
fn irregular_endings_bypass_completion() {
    let format = Some("SET3-S:6/TB7");
    assert_eq!(
        validate_match_up_score(&[], format, Some(MatchUpStatus::Walkover)),
        Ok(())
    );
    assert_eq!(
        validate_match_up_score(
            &[SetScore::games(1, 5, 3), SetScore::games(2, 1, 0)],
            format,
            Some(MatchUpStatus::Retired)
        ),
        Ok(())
    );
}

#[test]
fn rejects_extra_sets() {
    let format = Some("SET3-S:6/TB7");
    let four = [
        SetScore::games(1, 6, 4),
        SetScore::games(2, 4, 6),
        SetScore::games(3, 6, 4),
        SetScore::games(4, 6, 4),
    ];
    assert_eq!(
        validate_match_up_score(&four, format, None),
        Err(MatchUpScoreError::TooManySets { count: 4, best_of: 3 })
    );

    let after = [
        SetScore::games(1, 6, 4),
        SetScore::games(2, 6, 4),
        SetScore::games(3, 6, 4),
    ];
    assert_eq!(
        validate_match_up_score(&after, format, None),
        Err(MatchUpScoreError::SetsAfterDecision { set_number: 3 })
    );
}

#[test]
fn error_messages_carry_reason_strings() {
    let err = MatchUpScoreError::InvalidSet {
        set_number: 2,
        error: SetScoreError::InsufficientTiebreakMargin,
    };
    assert_eq!(err.to_string(), "set 2: invalid tiebreak scores (4)");
}

#[test]
fn placeholder_sets_do_not_fail_a_match_in_progress() {
    let format = Some("SET3-S:6/TB7");
    let empty = |set_number| SetScore {
        set_number,
        ..SetScore::default()
    };

    let in_progress = [
        SetScore::games(1, 6, 4).with_winner(SideNumber::One),
        SetScore::games(2, 3, 2),
        empty(3),
    ];
    assert_eq!(validate_match_up_score(&in_progress, format, None), Ok(()));

    let fresh = [empty(1), empty(2), empty(3)];
    assert_eq!(validate_match_up_score(&fresh, format, None), Ok(()));

    let decided = [
        SetScore::games(1, 6, 4).with_winner(SideNumber::One),
        SetScore::games(2, 6, 3).with_winner(SideNumber::One),
        empty(3),
    ];
    assert_eq!(
        validate_match_up_score(&decided, format, Some(MatchUpStatus::Completed)),
        Ok(())
    );
}
