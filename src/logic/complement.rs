//! Set and tiebreak complements: given the losing side's score, the score the other side
//! needs for the set (or tiebreak) to be exactly complete. Used to pre-fill the obvious value.

/// Largest value a single score entry may hold.
const MAX_ENTRY: u32 = 99;

/// Parse a typed score value. Anything that is not a number becomes 0.
pub fn parse_score_value(value: &str) -> u32 {
    value.trim().parse::<u32>().unwrap_or(0).min(MAX_ENTRY)
}

fn side_order(is_side1: bool, low: u32, high: u32) -> [u32; 2] {
    if is_side1 {
        [low, high]
    } else {
        [high, low]
    }
}

/// `[side1, side2]` game scores completing a set where the side named by `is_side1`
/// holds `low_value` games.
///
/// A `low_value` above `tiebreak_at` is clamped to it for any tiebreak threshold,
/// including one equal to `set_to`, so 9 games under `6/TB7` complete as 6-7.
pub fn get_set_complement(
    is_side1: bool,
    low_value: u32,
    set_to: u32,
    tiebreak_at: Option<u32>,
) -> [u32; 2] {
    let mut low = low_value.min(MAX_ENTRY);
    if let Some(at) = tiebreak_at {
        if low > at {
            low = at;
        }
    }

    let high = if low + 1 < set_to {
        set_to
    } else {
        match tiebreak_at {
            Some(at) if at < set_to && low == at => set_to,
            Some(_) => set_to + 1,
            None => low + 2,
        }
    };
    side_order(is_side1, low, high)
}

/// `[side1, side2]` tiebreak scores completing a tiebreak where the side named by
/// `is_side1` holds `low_value` points.
pub fn get_tiebreak_complement(
    is_side1: bool,
    low_value: u32,
    tiebreak_to: u32,
    tiebreak_no_ad: bool,
) -> [u32; 2] {
    let mut low = low_value.min(MAX_ENTRY);
    if tiebreak_no_ad && tiebreak_to > 0 && low > tiebreak_to - 1 {
        low = tiebreak_to - 1;
    }

    let high = if low + 1 >= tiebreak_to {
        low + if tiebreak_no_ad { 1 } else { 2 }
    } else {
        tiebreak_to
    };
    side_order(is_side1, low, high)
}
