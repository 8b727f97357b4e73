//! Team data structure.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (referenced from matches).
pub type TeamId = Uuid;

/// A registered team. Immutable once created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub tournament_id: TournamentId,
    #[serde(default)]
    pub captain: Option<String>,
    #[serde(default)]
    pub players: Vec<String>,
}

impl Team {
    /// Create a team with the given name and no roster details.
    pub fn new(tournament_id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tournament_id,
            captain: None,
            players: Vec::new(),
        }
    }
}

/// Display name for an optional team reference: the team's name, or "TBD".
pub fn team_label(teams: &[Team], id: Option<TeamId>) -> &str {
    id.and_then(|id| teams.iter().find(|t| t.id == id))
        .map(|t| t.name.as_str())
        .unwrap_or("TBD")
}
