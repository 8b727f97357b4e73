//! Data structures for the billiards tournament: teams, matches, tournament header.

mod game;
mod team;
mod tournament;

pub use game::{GameMatch, MatchId, MatchStatus, MatchType, MatchUpdate};
pub use team::{team_label, Team, TeamId};
pub use tournament::{
    Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStatus,
};
