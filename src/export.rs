//! CSV export of group standings.

use crate::logic::GroupTable;
use crate::models::TournamentError;

const HEADER: [&str; 14] = [
    "group",
    "rank",
    "team",
    "played",
    "won",
    "drawn",
    "lost",
    "score_for",
    "score_against",
    "score_difference",
    "balls_for",
    "balls_against",
    "ball_difference",
    "points",
];

/// One row per team, groups in table order, ranks starting at 1.
pub fn standings_csv(groups: &[GroupTable]) -> Result<String, TournamentError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADER)
        .map_err(|e| TournamentError::Export(e.to_string()))?;
    for group in groups {
        for (i, s) in group.standings.iter().enumerate() {
            wtr.write_record([
                group.name.clone(),
                (i + 1).to_string(),
                s.team_name.clone(),
                s.played.to_string(),
                s.won.to_string(),
                s.drawn.to_string(),
                s.lost.to_string(),
                s.score_for.to_string(),
                s.score_against.to_string(),
                s.score_difference.to_string(),
                s.balls_for.to_string(),
                s.balls_against.to_string(),
                s.ball_difference.to_string(),
                s.points.to_string(),
            ])
            .map_err(|e| TournamentError::Export(e.to_string()))?;
        }
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| TournamentError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TournamentError::Export(e.to_string()))
}
