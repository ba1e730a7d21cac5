//! MatchFormat: parsed match format codes such as `SET3-S:6/TB7-F:TB10`.

use crate::models::error::ScoringError;
use serde::{Deserialize, Serialize};

/// Tiebreak target, used both for tiebreaks inside a set and for tiebreak-only sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiebreakFormat {
    pub tiebreak_to: u32,
    #[serde(default, rename = "NoAD")]
    pub no_ad: bool,
}

/// What a timed set is decided on.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimedBasis {
    #[default]
    Games,
    Points,
    Aggregate,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedFormat {
    pub minutes: u32,
    #[serde(default)]
    pub based_on: TimedBasis,
}

/// How a single set is scored. Exactly one of game-scored (`set_to`),
/// `tiebreak_set` or `timed` is present in a parsed format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_to: Option<u32>,
    #[serde(default, rename = "NoAD")]
    pub no_ad: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak_at: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak_format: Option<TiebreakFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak_set: Option<TiebreakFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timed: Option<TimedFormat>,
}

/// Classification of a set, driven by its format rather than by which scores are filled in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    Standard,
    TiebreakOnly,
    Timed,
}

impl SetFormat {
    pub fn kind(&self) -> SetKind {
        if self.timed.is_some() {
            SetKind::Timed
        } else if self.tiebreak_set.is_some() {
            SetKind::TiebreakOnly
        } else {
            SetKind::Standard
        }
    }

    /// Game count at which the set tiebreak is played, if the set has one.
    pub fn effective_tiebreak_at(&self) -> Option<u32> {
        self.tiebreak_format?;
        self.tiebreak_at.or(self.set_to)
    }

    fn parse(code: &str) -> Result<Self, String> {
        if let Some(rest) = code.strip_prefix("TB") {
            let tiebreak = parse_tiebreak(rest)?;
            return Ok(SetFormat {
                tiebreak_set: Some(tiebreak),
                ..SetFormat::default()
            });
        }
        if let Some(rest) = code.strip_prefix('T') {
            let (digits, suffix) = split_digits(rest);
            let minutes = digits
                .parse::<u32>()
                .map_err(|_| format!("invalid timed set '{}'", code))?;
            let based_on = match suffix {
                "" | "G" => TimedBasis::Games,
                "P" => TimedBasis::Points,
                "A" => TimedBasis::Aggregate,
                _ => return Err(format!("invalid timed basis '{}'", suffix)),
            };
            return Ok(SetFormat {
                timed: Some(TimedFormat { minutes, based_on }),
                ..SetFormat::default()
            });
        }

        let (games, tiebreak) = match code.split_once('/') {
            Some((games, tiebreak)) => (games, Some(tiebreak)),
            None => (code, None),
        };
        let (digits, suffix) = split_digits(games);
        let set_to = digits
            .parse::<u32>()
            .map_err(|_| format!("invalid set target '{}'", games))?;
        if set_to == 0 {
            return Err("setTo must be greater than 0".to_string());
        }
        let no_ad = match suffix {
            "" => false,
            "NOAD" => true,
            _ => return Err(format!("unexpected set modifier '{}'", suffix)),
        };

        let mut format = SetFormat {
            set_to: Some(set_to),
            no_ad,
            ..SetFormat::default()
        };
        if let Some(tiebreak) = tiebreak {
            let body = tiebreak
                .strip_prefix("TB")
                .ok_or_else(|| format!("invalid tiebreak '{}'", tiebreak))?;
            let (body, at) = match body.split_once('@') {
                Some((body, at)) => {
                    let at = at
                        .parse::<u32>()
                        .map_err(|_| format!("invalid tiebreakAt '{}'", at))?;
                    (body, Some(at))
                }
                None => (body, None),
            };
            if let Some(at) = at {
                if at > set_to {
                    return Err(format!("tiebreakAt {} exceeds setTo {}", at, set_to));
                }
            }
            format.tiebreak_format = Some(parse_tiebreak(body)?);
            format.tiebreak_at = Some(at.unwrap_or(set_to));
        }
        Ok(format)
    }
}

impl std::fmt::Display for SetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(timed) = self.timed {
            let basis = match timed.based_on {
                TimedBasis::Games => "",
                TimedBasis::Points => "P",
                TimedBasis::Aggregate => "A",
            };
            return write!(f, "T{}{}", timed.minutes, basis);
        }
        if let Some(tiebreak) = self.tiebreak_set {
            return write!(f, "TB{}{}", tiebreak.tiebreak_to, noad(tiebreak.no_ad));
        }
        let set_to = self.set_to.unwrap_or_default();
        write!(f, "{}{}", set_to, noad(self.no_ad))?;
        if let Some(tiebreak) = self.tiebreak_format {
            write!(f, "/TB{}{}", tiebreak.tiebreak_to, noad(tiebreak.no_ad))?;
            if let Some(at) = self.tiebreak_at.filter(|at| *at != set_to) {
                write!(f, "@{}", at)?;
            }
        }
        Ok(())
    }
}

/// A parsed match format code.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFormat {
    pub best_of: u32,
    /// `SET<n>X`: exactly n sets are played, regardless of the score.
    #[serde(default)]
    pub exactly: bool,
    pub set_format: SetFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_set_format: Option<SetFormat>,
}

impl MatchFormat {
    /// Parse a format code such as `SET3-S:6/TB7`, `SET3-S:6/TB7-F:TB10` or `SET1-S:T10A`.
    pub fn parse(code: &str) -> Result<Self, ScoringError> {
        let invalid = |reason: String| ScoringError::InvalidMatchUpFormat {
            format: code.to_string(),
            reason,
        };

        let mut parts = code.trim().split('-');
        let head = parts.next().unwrap_or_default();
        let sets = head
            .strip_prefix("SET")
            .ok_or_else(|| invalid("missing SET<n> prefix".to_string()))?;
        let (digits, suffix) = split_digits(sets);
        let best_of = digits
            .parse::<u32>()
            .map_err(|_| invalid(format!("invalid set count '{}'", sets)))?;
        let exactly = match suffix {
            "" => false,
            "X" => true,
            _ => return Err(invalid(format!("unexpected modifier '{}'", suffix))),
        };
        if best_of == 0 {
            return Err(invalid("bestOf must be greater than 0".to_string()));
        }
        if !exactly && best_of % 2 == 0 {
            return Err(invalid("bestOf must be odd".to_string()));
        }

        let mut set_format = None;
        let mut final_set_format = None;
        for part in parts {
            if let Some(s) = part.strip_prefix("S:") {
                set_format = Some(SetFormat::parse(s).map_err(&invalid)?);
            } else if let Some(s) = part.strip_prefix("F:") {
                final_set_format = Some(SetFormat::parse(s).map_err(&invalid)?);
            } else {
                return Err(invalid(format!("unrecognized section '{}'", part)));
            }
        }
        let set_format = set_format.ok_or_else(|| invalid("missing S: section".to_string()))?;

        Ok(MatchFormat {
            best_of,
            exactly,
            set_format,
            final_set_format,
        })
    }

    /// Number of sets a side must win to take the match.
    pub fn sets_to_win(&self) -> u32 {
        self.best_of.div_ceil(2)
    }

    /// The deciding set (`set_number == best_of`) uses the final-set override when present.
    pub fn is_deciding_set(&self, set_number: u32) -> bool {
        set_number == self.best_of
    }

    pub fn set_format_for(&self, set_number: u32) -> &SetFormat {
        match &self.final_set_format {
            Some(final_set) if self.is_deciding_set(set_number) => final_set,
            _ => &self.set_format,
        }
    }
}

impl std::str::FromStr for MatchFormat {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchFormat::parse(s)
    }
}

impl std::fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let exactly = if self.exactly { "X" } else { "" };
        write!(f, "SET{}{}-S:{}", self.best_of, exactly, self.set_format)?;
        if let Some(final_set) = &self.final_set_format {
            write!(f, "-F:{}", final_set)?;
        }
        Ok(())
    }
}

fn parse_tiebreak(body: &str) -> Result<TiebreakFormat, String> {
    let (digits, suffix) = split_digits(body);
    let tiebreak_to = digits
        .parse::<u32>()
        .map_err(|_| format!("invalid tiebreak target '{}'", body))?;
    let no_ad = match suffix {
        "" => false,
        "NOAD" => true,
        _ => return Err(format!("unexpected tiebreak modifier '{}'", suffix)),
    };
    Ok(TiebreakFormat { tiebreak_to, no_ad })
}

/// Split a token into its leading ASCII digits and the remainder.
pub(crate) fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

fn noad(flag: bool) -> &'static str {
    if flag {
        "NOAD"
    } else {
        ""
    }
}
