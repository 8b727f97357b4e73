//! Billiards tournament dashboard: library with models, standings and bracket logic,
//! rendering, and live match refresh.

pub mod config;
pub mod export;
pub mod live;
pub mod logic;
pub mod models;
pub mod render;
pub mod store;

pub use logic::{
    all_group_standings, bracket_sections, build_connectors, build_rounds, calculate_group_standings,
    group_names, layout_bracket, layout_rounds, layout_section, order_group_matches,
    order_knockout_rounds, recent_results, upcoming_matches, BracketLayout, BracketSection,
    Connector, DashboardMatch, GroupStanding, GroupTable, KnockoutRound, LayoutConfig, Point,
    PositionedMatch, RoundColumn, SectionKind, SectionLayout,
};
pub use models::{
    GameMatch, MatchId, MatchStatus, MatchType, MatchUpdate, Team, TeamId, Tournament,
    TournamentError, TournamentFormat, TournamentId, TournamentStatus,
};
