//! Match (game) record as served by the backend, plus status/type tags and write validation.

use crate::models::team::TeamId;
use crate::models::tournament::{TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Group-stage or knockout match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    Group,
    Knockout,
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl MatchStatus {
    /// Display priority for match lists: live first, finished last.
    pub fn list_priority(self) -> u8 {
        match self {
            MatchStatus::InProgress => 1,
            MatchStatus::Pending => 2,
            MatchStatus::Completed => 3,
        }
    }
}

/// A single match. Everything except identity, type and status may be missing
/// while the match is pending or in progress.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub match_type: MatchType,
    /// Group name for group matches; bracket section or round label for knockout matches.
    #[serde(default)]
    pub round_name: Option<String>,
    #[serde(default)]
    pub round_number: Option<u32>,
    #[serde(default)]
    pub match_number: Option<u32>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub team1_id: Option<TeamId>,
    #[serde(default)]
    pub team2_id: Option<TeamId>,
    #[serde(default)]
    pub team1_score: Option<u32>,
    #[serde(default)]
    pub team2_score: Option<u32>,
    /// Secondary metric used as the standings tie-break.
    #[serde(default)]
    pub team1_balls: Option<u32>,
    #[serde(default)]
    pub team2_balls: Option<u32>,
    #[serde(default)]
    pub table_number: Option<u32>,
    #[serde(default)]
    pub winner_id: Option<TeamId>,
    /// Match the winner advances to.
    #[serde(default)]
    pub next_match_id: Option<MatchId>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GameMatch {
    /// New pending match with a fresh id; remaining fields empty.
    pub fn new(tournament_id: TournamentId, match_type: MatchType) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            match_type,
            ..Self::default()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// True when `team` is one of the two sides.
    pub fn involves(&self, team: TeamId) -> bool {
        self.team1_id == Some(team) || self.team2_id == Some(team)
    }

    /// Check the write-side invariants: a completed match carries both teams and both
    /// scores, and any winner is one of the two teams.
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.is_completed() {
            let complete = self.team1_id.is_some()
                && self.team2_id.is_some()
                && self.team1_score.is_some()
                && self.team2_score.is_some();
            if !complete {
                return Err(TournamentError::IncompleteResult(self.id));
            }
        }
        if let Some(winner) = self.winner_id {
            if !self.involves(winner) {
                return Err(TournamentError::InvalidWinner(self.id));
            }
        }
        Ok(())
    }

    /// Apply a partial update, then validate. On error the match is left untouched.
    ///
    /// A completed match without an explicit winner in the update takes the higher score's
    /// team (none on a tie).
    pub fn apply_update(&mut self, update: &MatchUpdate) -> Result<(), TournamentError> {
        let mut next = self.clone();
        if let Some(status) = update.status {
            next.status = status;
        }
        next.team1_score = update.team1_score.or(next.team1_score);
        next.team2_score = update.team2_score.or(next.team2_score);
        next.team1_balls = update.team1_balls.or(next.team1_balls);
        next.team2_balls = update.team2_balls.or(next.team2_balls);
        next.table_number = update.table_number.or(next.table_number);
        next.winner_id = update.winner_id.or(next.winner_id);
        if update.note.is_some() {
            next.note = update.note.clone();
        }
        if next.is_completed() && update.winner_id.is_none() {
            next.winner_id = match (next.team1_score, next.team2_score) {
                (Some(a), Some(b)) if a > b => next.team1_id,
                (Some(a), Some(b)) if b > a => next.team2_id,
                _ => None,
            };
        }
        next.validate()?;
        next.updated_at = Some(Utc::now());
        *self = next;
        Ok(())
    }
}

/// Partial match update (scores, status, winner) as sent by the score-keeping client.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MatchUpdate {
    #[serde(default)]
    pub status: Option<MatchStatus>,
    #[serde(default)]
    pub team1_score: Option<u32>,
    #[serde(default)]
    pub team2_score: Option<u32>,
    #[serde(default)]
    pub team1_balls: Option<u32>,
    #[serde(default)]
    pub team2_balls: Option<u32>,
    #[serde(default)]
    pub table_number: Option<u32>,
    #[serde(default)]
    pub winner_id: Option<TeamId>,
    #[serde(default)]
    pub note: Option<String>,
}
