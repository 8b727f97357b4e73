//! Connector geometry: right-angle lines from a match to the match its winner advances to.

use crate::logic::bracket::RoundColumn;
use crate::logic::layout::{BracketLayout, LayoutConfig, Point};
use crate::models::MatchId;
use serde::Serialize;

/// Lines for one (feeders, target) relationship. Each polyline runs left to right.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Connector {
    /// Single feeder: horizontal, vertical, horizontal.
    Elbow {
        from: MatchId,
        to: MatchId,
        points: Vec<Point>,
    },
    /// Two feeders joined on a shared midline, then one trunk into the target.
    Merge {
        feeders: [MatchId; 2],
        to: MatchId,
        branches: [Vec<Point>; 2],
        trunk: Vec<Point>,
    },
}

impl Connector {
    pub fn target(&self) -> MatchId {
        match self {
            Connector::Elbow { to, .. } | Connector::Merge { to, .. } => *to,
        }
    }

    pub fn feeders(&self) -> Vec<MatchId> {
        match self {
            Connector::Elbow { from, .. } => vec![*from],
            Connector::Merge { feeders, .. } => feeders.to_vec(),
        }
    }

    /// Every polyline to stroke.
    pub fn polylines(&self) -> Vec<&[Point]> {
        match self {
            Connector::Elbow { points, .. } => vec![points.as_slice()],
            Connector::Merge {
                branches, trunk, ..
            } => vec![branches[0].as_slice(), branches[1].as_slice(), trunk.as_slice()],
        }
    }
}

/// Right-edge anchor of a card.
fn exit_point(card: Point, config: &LayoutConfig) -> Point {
    Point::new(card.x + config.card_width, card.y + config.card_center())
}

/// Left-edge anchor of a card.
fn entry_point(card: Point, config: &LayoutConfig) -> Point {
    Point::new(card.x, card.y + config.card_center())
}

fn elbow(from: Point, to: Point, config: &LayoutConfig) -> Vec<Point> {
    let start = exit_point(from, config);
    let end = entry_point(to, config);
    let mid_x = start.x + config.connector_stub;
    vec![start, Point::new(mid_x, start.y), Point::new(mid_x, end.y), end]
}

fn merge(first: Point, second: Point, to: Point, config: &LayoutConfig) -> ([Vec<Point>; 2], Vec<Point>) {
    let a = exit_point(first, config);
    let b = exit_point(second, config);
    let end = entry_point(to, config);
    let mid_x = b.x + config.connector_stub;
    let join = Point::new(mid_x, (a.y + b.y) / 2.0);
    let branch = |p: Point| vec![p, Point::new(mid_x, p.y), join];
    (
        [branch(a), branch(b)],
        vec![join, Point::new(mid_x, end.y), end],
    )
}

/// Connectors for every match in a column with a following column whose next-match link
/// resolves to a placed match of this section.
///
/// Exactly two feeders of one target produce a single `Merge`, emitted when the second of
/// them (in column order) is visited. One feeder, or more than two, produce one `Elbow`
/// per feeder. Unknown targets produce nothing.
pub fn build_connectors(
    rounds: &[RoundColumn],
    layout: &BracketLayout,
    config: &LayoutConfig,
) -> Vec<Connector> {
    let mut connectors = Vec::new();
    if rounds.len() < 2 {
        return connectors;
    }
    for round in &rounds[..rounds.len() - 1] {
        for (idx, m) in round.matches.iter().enumerate() {
            let Some(target) = m.next_match_id else {
                continue;
            };
            let (Some(from), Some(to)) = (layout.position(m.id), layout.position(target)) else {
                continue;
            };
            let feeders: Vec<(usize, Point)> = round
                .matches
                .iter()
                .enumerate()
                .filter(|(_, f)| f.next_match_id == Some(target))
                .filter_map(|(i, f)| layout.position(f.id).map(|p| (i, p)))
                .collect();

            if let &[(first_idx, first), (second_idx, _)] = feeders.as_slice() {
                if idx != second_idx {
                    continue;
                }
                let (branches, trunk) = merge(first, from, to, config);
                connectors.push(Connector::Merge {
                    feeders: [round.matches[first_idx].id, m.id],
                    to: target,
                    branches,
                    trunk,
                });
            } else {
                connectors.push(Connector::Elbow {
                    from: m.id,
                    to: target,
                    points: elbow(from, to, config),
                });
            }
        }
    }
    connectors
}
