//! In-memory stand-in for the managed backend: tournaments, teams and matches seeded from a
//! JSON file, with match writes published to the change hub.

use crate::live::{ChangeEvent, MatchHub, MatchSource};
use crate::models::{
    GameMatch, MatchId, MatchUpdate, Team, Tournament, TournamentError, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// One tournament as served by `GET /api/tournament/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentData {
    pub tournament: Tournament,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<GameMatch>,
}

/// Tournament list entry with its registered team count.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TournamentSummary {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub current_teams: usize,
}

/// Seed file layout: `{"tournaments": [...]}`.
#[derive(Deserialize)]
struct SeedFile {
    tournaments: Vec<TournamentData>,
}

pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, TournamentData>>,
    hub: MatchHub,
}

impl TournamentStore {
    pub fn new(tournaments: Vec<TournamentData>, hub: MatchHub) -> Self {
        let map = tournaments
            .into_iter()
            .map(|t| (t.tournament.id, t))
            .collect();
        Self {
            tournaments: RwLock::new(map),
            hub,
        }
    }

    /// Parse seed JSON.
    pub fn from_json(json: &str, hub: MatchHub) -> Result<Self, TournamentError> {
        let seed: SeedFile =
            serde_json::from_str(json).map_err(|e| TournamentError::Seed(e.to_string()))?;
        Ok(Self::new(seed.tournaments, hub))
    }

    /// Read and parse a seed file.
    pub fn load(path: &Path, hub: MatchHub) -> Result<Self, TournamentError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| TournamentError::Seed(format!("{}: {}", path.display(), e)))?;
        let store = Self::from_json(&json, hub)?;
        log::info!(
            "Loaded {} tournament(s) from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn hub(&self) -> &MatchHub {
        &self.hub
    }

    pub fn len(&self) -> usize {
        self.tournaments.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All tournaments, by start date (undated last) then name.
    pub fn all(&self) -> Result<Vec<TournamentData>, TournamentError> {
        let g = self.tournaments.read().map_err(|_| TournamentError::Lock)?;
        let mut all: Vec<TournamentData> = g.values().cloned().collect();
        all.sort_by(|a, b| {
            let (a, b) = (&a.tournament, &b.tournament);
            match (a.start_date, b.start_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
        });
        Ok(all)
    }

    pub fn summaries(&self) -> Result<Vec<TournamentSummary>, TournamentError> {
        Ok(self
            .all()?
            .into_iter()
            .map(|t| TournamentSummary {
                current_teams: t.teams.len(),
                tournament: t.tournament,
            })
            .collect())
    }

    pub fn get(&self, id: TournamentId) -> Result<TournamentData, TournamentError> {
        let g = self.tournaments.read().map_err(|_| TournamentError::Lock)?;
        g.get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    pub fn matches(&self, id: TournamentId) -> Result<Vec<GameMatch>, TournamentError> {
        let g = self.tournaments.read().map_err(|_| TournamentError::Lock)?;
        g.get(&id)
            .map(|t| t.matches.clone())
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Apply a score/status update to one match and publish the new row.
    pub fn update_match(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
        update: &MatchUpdate,
    ) -> Result<GameMatch, TournamentError> {
        let updated = {
            let mut g = self.tournaments.write().map_err(|_| TournamentError::Lock)?;
            let data = g
                .get_mut(&tournament_id)
                .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
            let m = data
                .matches
                .iter_mut()
                .find(|m| m.id == match_id)
                .ok_or(TournamentError::MatchNotFound(match_id))?;
            m.apply_update(update)?;
            m.clone()
        };
        self.hub
            .publish(tournament_id, ChangeEvent::Update(updated.clone()));
        Ok(updated)
    }
}

impl MatchSource for TournamentStore {
    async fn fetch_matches(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<GameMatch>, TournamentError> {
        self.matches(tournament_id)
    }
}
