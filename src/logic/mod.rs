//! Tournament presentation logic: standings, bracket structure, layout, connectors.

mod bracket;
mod connectors;
mod layout;
mod schedule;
mod section;
mod standings;

pub use bracket::{
    bracket_sections, build_rounds, build_section, section_matches, BracketSection, RoundColumn,
    SectionKind,
};
pub use connectors::{build_connectors, Connector};
pub use layout::{layout_rounds, BracketLayout, LayoutConfig, Point, PositionedMatch};
pub use schedule::{
    order_group_matches, order_knockout_rounds, recent_results, upcoming_matches, DashboardMatch,
    KnockoutRound,
};
pub use section::{layout_bracket, layout_section, SectionLayout};
pub use standings::{
    all_group_standings, calculate_group_standings, group_names, GroupStanding, GroupTable,
    POINTS_DRAW, POINTS_WIN,
};
