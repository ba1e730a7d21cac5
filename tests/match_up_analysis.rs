//! Integration tests for match-up analysis: active set, edit targets and outcome consistency.

use competition_scoring::{
    analyze_match_up, check_score_edit, MatchUp, MatchUpStatus, ScoreTarget, ScoringError,
    SetScore, SideNumber,
};

const FORMAT: &str = "SET3-S:6/TB7";

fn match_up_with_sets(sets: Vec<SetScore>) -> MatchUp {
    MatchUp {
        match_up_format: Some(FORMAT.to_string()),
        sets,
        ..MatchUp::new("m1", "p1", "p2")
    }
}

#[test]
fn active_set_is_first_incomplete_set() {
    let match_up = match_up_with_sets(vec![
        SetScore::games(1, 6, 4).with_winner(SideNumber::One),
        SetScore::games(2, 3, 2),
    ]);
    let analysis =
        analyze_match_up(&match_up, None, &ScoreTarget::game(SideNumber::One, 2)).unwrap();

    assert_eq!(analysis.active_set_number, Some(2));
    assert!(analysis.is_active_set);
    assert!(analysis.is_existing_set);
    assert_eq!(analysis.existing_value, Some(3));
    assert!(analysis.has_existing_value);
    assert!(analysis.is_last_set_with_values);
    assert_eq!(analysis.sets_following_current, 0);
    assert!(!analysis.modifies_completed_set);
    assert_eq!(analysis.completed_sets_count, 1);
    assert_eq!(analysis.sets_win_counts, [1, 0]);
    assert!(check_score_edit(&analysis, false).is_ok());
}

#[test]
fn next_set_is_active_after_completed_sets() {
    let match_up = match_up_with_sets(vec![
        SetScore::games(1, 6, 4).with_winner(SideNumber::One),
        SetScore::games(2, 4, 6).with_winner(SideNumber::Two),
    ]);
    let analysis =
        analyze_match_up(&match_up, None, &ScoreTarget::game(SideNumber::Two, 3)).unwrap();
    assert_eq!(analysis.active_set_number, Some(3));
    assert!(analysis.is_active_set);
    assert!(!analysis.is_existing_set);
    assert_eq!(analysis.existing_value, None);
    assert!(analysis.calculated_winning_side.is_none());
}

#[test]
fn editing_completed_set_is_history_edit() {
    let match_up = match_up_with_sets(vec![
        SetScore::games(1, 6, 4).with_winner(SideNumber::One),
        SetScore::games(2, 3, 2),
    ]);
    let analysis =
        analyze_match_up(&match_up, None, &ScoreTarget::game(SideNumber::Two, 1)).unwrap();
    assert!(analysis.modifies_completed_set);
    assert_eq!(analysis.sets_following_current, 1);
    assert_eq!(analysis.existing_value, Some(4));

    let err = check_score_edit(&analysis, false).unwrap_err();
    assert_eq!(err, ScoringError::HistoryEdit { set_number: 1 });
    assert_eq!(err.code(), "HISTORY_EDIT");
    assert!(check_score_edit(&analysis, true).is_ok());
}

#[test]
fn tiebreak_target_reads_tiebreak_value() {
    let match_up = match_up_with_sets(vec![SetScore::games(1, 7, 6).with_tiebreak(7, 5)]);
    let analysis =
        analyze_match_up(&match_up, None, &ScoreTarget::tiebreak(SideNumber::Two, 1)).unwrap();
    assert_eq!(analysis.existing_value, Some(5));
    let set = analysis.specified_set_analysis.unwrap();
    assert_eq!(set.analysis_winning_side, Some(SideNumber::One));
}

#[test]
fn recorded_winner_consistent_with_sets() {
    let mut match_up = match_up_with_sets(vec![
        SetScore::games(1, 6, 4).with_winner(SideNumber::One),
        SetScore::games(2, 6, 3).with_winner(SideNumber::One),
    ]);
    match_up.winning_side = Some(SideNumber::One);
    match_up.match_up_status = MatchUpStatus::Completed;

    let analysis = analyze_match_up(&match_up, None, &ScoreTarget::default()).unwrap();
    assert!(analysis.valid_match_up_outcome);
    assert!(analysis.is_completed_match_up);
    assert_eq!(analysis.calculated_winning_side, Some(SideNumber::One));
    assert_eq!(analysis.active_set_number, None);

    match_up.winning_side = Some(SideNumber::Two);
    let analysis = analyze_match_up(&match_up, None, &ScoreTarget::default()).unwrap();
    assert!(!analysis.valid_match_up_outcome);
}

#[test]
fn invalid_completed_set_invalidates_outcome() {
    let mut match_up = match_up_with_sets(vec![
        SetScore::games(1, 6, 5).with_winner(SideNumber::One),
        SetScore::games(2, 6, 3).with_winner(SideNumber::One),
    ]);
    match_up.winning_side = Some(SideNumber::One);
    let analysis = analyze_match_up(&match_up, None, &ScoreTarget::default()).unwrap();
    assert!(!analysis.valid_match_up_outcome);
    assert!(!analysis.set_analyses[0].is_valid_set);
}

#[test]
fn retirement_does_not_need_decided_sets() {
    let mut match_up = match_up_with_sets(vec![
        SetScore::games(1, 6, 4).with_winner(SideNumber::One),
        SetScore::games(2, 2, 1),
    ]);
    match_up.winning_side = Some(SideNumber::One);
    match_up.match_up_status = MatchUpStatus::Retired;
    let analysis = analyze_match_up(&match_up, None, &ScoreTarget::default()).unwrap();
    assert!(analysis.valid_match_up_outcome);
    assert!(analysis.calculated_winning_side.is_none());
}

#[test]
fn explicit_format_overrides_recorded_format() {
    let match_up = match_up_with_sets(vec![SetScore::tiebreak(1, 10, 8).with_winner(SideNumber::One)]);
    let analysis =
        analyze_match_up(&match_up, Some("SET1-S:TB10"), &ScoreTarget::default()).unwrap();
    assert_eq!(analysis.match_format.best_of, 1);
    assert_eq!(analysis.calculated_winning_side, Some(SideNumber::One));
    assert!(analysis.set_analyses[0].is_valid_set);
}

#[test]
fn input_contract_errors() {
    let no_format = MatchUp::new("m1", "p1", "p2");
    assert_eq!(
        analyze_match_up(&no_format, None, &ScoreTarget::default()).unwrap_err(),
        ScoringError::MissingMatchUpFormat
    );

    let match_up = match_up_with_sets(vec![]);
    assert_eq!(
        analyze_match_up(&match_up, None, &ScoreTarget::game(SideNumber::One, 4)).unwrap_err(),
        ScoringError::InvalidSetNumber(4)
    );
    assert!(matches!(
        analyze_match_up(&match_up, Some("SET4-S:6"), &ScoreTarget::default()),
        Err(ScoringError::InvalidMatchUpFormat { .. })
    ));
}

#[test]
fn side_numbers_are_one_or_two() {
    assert_eq!(SideNumber::try_from(2u8), Ok(SideNumber::Two));
    assert_eq!(u8::from(SideNumber::One), 1);
    let err = ScoringError::from(SideNumber::try_from(3u8).unwrap_err());
    assert_eq!(err, ScoringError::InvalidSideNumber(3));
    assert_eq!(err.code(), "INVALID_SIDE_NUMBER");

    let side: SideNumber = serde_json::from_str("2").unwrap();
    assert_eq!(side, SideNumber::Two);
    assert!(serde_json::from_str::<SideNumber>("0").is_err());
}
