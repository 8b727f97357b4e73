//! Tournament header record, format/status tags, and the crate error type.

use crate::models::game::MatchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors from the store, match validation, and section capture.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// No tournament with this id.
    TournamentNotFound(TournamentId),
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
    /// A completed match is missing a team or a score.
    IncompleteResult(MatchId),
    /// The winner is not one of the match's two teams.
    InvalidWinner(MatchId),
    /// Unknown bracket section name in a request.
    UnknownSection(String),
    /// No group with this name in the tournament.
    UnknownGroup(String),
    /// Seed data could not be read or parsed.
    Seed(String),
    /// The live-data subscription could not be established.
    Subscription(String),
    /// Fetching matches from the backend failed.
    Fetch(String),
    /// Encoding a bracket section or group table as an image failed.
    Capture(String),
    /// Writing an export (CSV) failed.
    Export(String),
    /// Shared state lock was poisoned.
    Lock,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::IncompleteResult(_) => {
                write!(f, "A completed match needs both teams and both scores")
            }
            TournamentError::InvalidWinner(_) => {
                write!(f, "Winner must be one of the two teams in the match")
            }
            TournamentError::UnknownSection(name) => write!(f, "Unknown bracket section: {}", name),
            TournamentError::UnknownGroup(name) => write!(f, "Unknown group: {}", name),
            TournamentError::Seed(reason) => write!(f, "Could not load tournament data: {}", reason),
            TournamentError::Subscription(reason) => write!(f, "Subscription failed: {}", reason),
            TournamentError::Fetch(reason) => write!(f, "Fetching matches failed: {}", reason),
            TournamentError::Capture(_) => {
                write!(f, "Failed to capture screenshot. Please try again.")
            }
            TournamentError::Export(reason) => write!(f, "Export failed: {}", reason),
            TournamentError::Lock => write!(f, "lock error"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Tournament format. Parsed case-insensitively; unrecognised tags are kept verbatim.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TournamentFormat {
    #[default]
    GroupKnockout,
    SingleElimination,
    DoubleElimination,
    Other(String),
}

impl TournamentFormat {
    pub fn is_double_elimination(&self) -> bool {
        matches!(self, TournamentFormat::DoubleElimination)
    }

    /// Human-readable label for headers.
    pub fn label(&self) -> &str {
        match self {
            TournamentFormat::GroupKnockout => "Group Stage + Knockout",
            TournamentFormat::SingleElimination => "Single Elimination",
            TournamentFormat::DoubleElimination => "Double Elimination",
            TournamentFormat::Other(tag) => tag,
        }
    }
}

impl From<String> for TournamentFormat {
    fn from(tag: String) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "group_knockout" => TournamentFormat::GroupKnockout,
            "single_elimination" => TournamentFormat::SingleElimination,
            "double_elimination" => TournamentFormat::DoubleElimination,
            _ => TournamentFormat::Other(tag),
        }
    }
}

impl From<TournamentFormat> for String {
    fn from(format: TournamentFormat) -> Self {
        match format {
            TournamentFormat::GroupKnockout => "group_knockout".to_string(),
            TournamentFormat::SingleElimination => "single_elimination".to_string(),
            TournamentFormat::DoubleElimination => "double_elimination".to_string(),
            TournamentFormat::Other(tag) => tag,
        }
    }
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Registration open; no matches yet.
    #[default]
    Setup,
    GroupStage,
    Knockout,
    Completed,
}

impl TournamentStatus {
    pub fn label(self) -> &'static str {
        match self {
            TournamentStatus::Setup => "Setup",
            TournamentStatus::GroupStage => "Group Stage",
            TournamentStatus::Knockout => "Knockout",
            TournamentStatus::Completed => "Completed",
        }
    }
}

/// Tournament header: name, format, schedule. Teams and matches are served alongside it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub format: TournamentFormat,
    #[serde(default)]
    pub status: TournamentStatus,
    pub max_teams: u32,
    #[serde(default)]
    pub group_size: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a tournament in Setup with no schedule details.
    pub fn new(name: impl Into<String>, format: TournamentFormat, max_teams: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            status: TournamentStatus::Setup,
            max_teams,
            group_size: None,
            description: None,
            location: None,
            start_date: None,
            end_date: None,
        }
    }
}
