//! Integration tests for match format codes: parsing, stringifying, deciding-set overrides.

use competition_scoring::{MatchFormat, ScoringError, SetKind};
use competition_scoring::models::TimedBasis;

#[test]
fn parses_standard_format_with_final_set_tiebreak() {
    let format = MatchFormat::parse("SET3-S:6/TB7-F:TB10").unwrap();
    assert_eq!(format.best_of, 3);
    assert!(!format.exactly);
    assert_eq!(format.set_format.set_to, Some(6));
    assert_eq!(format.set_format.effective_tiebreak_at(), Some(6));
    assert_eq!(format.set_format.tiebreak_format.unwrap().tiebreak_to, 7);

    let final_set = format.final_set_format.unwrap();
    assert_eq!(final_set.kind(), SetKind::TiebreakOnly);
    assert_eq!(final_set.tiebreak_set.unwrap().tiebreak_to, 10);
    assert_eq!(format.sets_to_win(), 2);
}

#[test]
fn deciding_set_uses_final_set_format() {
    let format = MatchFormat::parse("SET3-S:6/TB7-F:TB10").unwrap();
    assert_eq!(format.set_format_for(1).kind(), SetKind::Standard);
    assert_eq!(format.set_format_for(2).kind(), SetKind::Standard);
    assert!(format.is_deciding_set(3));
    assert_eq!(format.set_format_for(3).kind(), SetKind::TiebreakOnly);
}

#[test]
fn parses_timed_and_noad_sections() {
    let timed = MatchFormat::parse("SET1-S:T10A").unwrap();
    let t = timed.set_format.timed.unwrap();
    assert_eq!(t.minutes, 10);
    assert_eq!(t.based_on, TimedBasis::Aggregate);
    assert_eq!(timed.set_format.kind(), SetKind::Timed);

    let noad = MatchFormat::parse("SET5-S:4NOAD/TB7NOAD@3").unwrap();
    assert!(noad.set_format.no_ad);
    assert_eq!(noad.set_format.tiebreak_at, Some(3));
    assert!(noad.set_format.tiebreak_format.unwrap().no_ad);
    assert_eq!(noad.sets_to_win(), 3);
}

#[test]
fn display_round_trips_codes() {
    for code in [
        "SET3-S:6/TB7",
        "SET3-S:6/TB7-F:TB10",
        "SET1-S:T10A",
        "SET1-S:T20P",
        "SET5-S:6/TB7@5",
        "SET3-S:4NOAD/TB7NOAD",
        "SET2X-S:6",
        "SET1-S:TB10NOAD",
    ] {
        let format: MatchFormat = code.parse().unwrap();
        assert_eq!(format.to_string(), code);
    }
}

#[test]
fn tiebreak_at_equal_to_set_to_is_not_repeated() {
    let format = MatchFormat::parse("SET3-S:6/TB7@6").unwrap();
    assert_eq!(format.to_string(), "SET3-S:6/TB7");
}

#[test]
fn rejects_invalid_codes() {
    for code in [
        "",
        "bogus",
        "SET2-S:6",
        "SET0-S:6",
        "SET3",
        "SET3-S:0",
        "SET3-S:6/TB7@8",
        "SET3-S:6/XX7",
        "SET3-S:6-Q:4",
        "SET1-S:T10Z",
    ] {
        let err = MatchFormat::parse(code).unwrap_err();
        assert!(
            matches!(err, ScoringError::InvalidMatchUpFormat { .. }),
            "{code} should be rejected"
        );
        assert_eq!(err.code(), "INVALID_MATCHUP_FORMAT");
    }
}

#[test]
fn exactly_format_allows_even_set_count() {
    let format = MatchFormat::parse("SET2X-S:6").unwrap();
    assert!(format.exactly);
    assert_eq!(format.best_of, 2);
    assert!(format.final_set_format.is_none());
}
