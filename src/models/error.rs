//! ScoringError: input contract violations and search failures.

/// Errors returned by the public scoring, tally and pairing operations.
///
/// Scoring-rule violations are not errors: they are reported as data in
/// [`crate::SetAnalysis`] or by the standalone validators.
#[derive(Clone, Debug, PartialEq)]
pub enum ScoringError {
    /// No match format code was supplied and none is recorded on the match-up.
    MissingMatchUpFormat,
    /// The match format code could not be parsed.
    InvalidMatchUpFormat { format: String, reason: String },
    /// Set number is zero or exceeds the best-of count.
    InvalidSetNumber(u32),
    /// Side numbers are 1 or 2.
    InvalidSideNumber(u8),
    /// No draw entries were supplied.
    MissingParticipantIds,
    /// Fewer than two distinct participants; no pairing can be formed.
    NoCandidates,
    /// Edit targets a completed set that is not the active set.
    HistoryEdit { set_number: u32 },
    /// A document could not be deserialized.
    InvalidDocument(String),
    /// A score string token could not be read.
    InvalidScoreString(String),
}

impl ScoringError {
    /// Stable machine-readable code for callers that match on strings.
    pub fn code(&self) -> &'static str {
        match self {
            ScoringError::MissingMatchUpFormat => "MISSING_MATCHUP_FORMAT",
            ScoringError::InvalidMatchUpFormat { .. } => "INVALID_MATCHUP_FORMAT",
            ScoringError::InvalidSetNumber(_) => "INVALID_SET_NUMBER",
            ScoringError::InvalidSideNumber(_) => "INVALID_SIDE_NUMBER",
            ScoringError::MissingParticipantIds => "MISSING_PARTICIPANT_IDS",
            ScoringError::NoCandidates => "NO_CANDIDATES",
            ScoringError::HistoryEdit { .. } => "HISTORY_EDIT",
            ScoringError::InvalidDocument(_) => "INVALID_DOCUMENT",
            ScoringError::InvalidScoreString(_) => "INVALID_SCORE_STRING",
        }
    }
}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::MissingMatchUpFormat => write!(f, "Missing matchUpFormat"),
            ScoringError::InvalidMatchUpFormat { format, reason } => {
                write!(f, "Invalid matchUpFormat '{}': {}", format, reason)
            }
            ScoringError::InvalidSetNumber(n) => write!(f, "Invalid set number {}", n),
            ScoringError::InvalidSideNumber(n) => write!(f, "Invalid side number {}", n),
            ScoringError::MissingParticipantIds => write!(f, "Missing participantIds"),
            ScoringError::NoCandidates => write!(f, "No pairing candidates could be generated"),
            ScoringError::HistoryEdit { set_number } => {
                write!(f, "Set {} is already complete and is not the active set", set_number)
            }
            ScoringError::InvalidDocument(reason) => write!(f, "Invalid document: {}", reason),
            ScoringError::InvalidScoreString(token) => write!(f, "Invalid score token '{}'", token),
        }
    }
}

impl std::error::Error for ScoringError {}

impl From<SideNumberError> for ScoringError {
    fn from(e: SideNumberError) -> Self {
        ScoringError::InvalidSideNumber(e.0)
    }
}

/// Conversion failure for [`crate::SideNumber`] from a raw integer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SideNumberError(pub u8);

impl std::fmt::Display for SideNumberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "side number must be 1 or 2, got {}", self.0)
    }
}

impl std::error::Error for SideNumberError {}

