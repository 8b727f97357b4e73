//! Bracket layout: pixel positions for every match of a section.
//!
//! The round with the most matches is the benchmark column and is spread evenly. Earlier
//! columns are placed walking backward from it (each match next to the match it feeds),
//! later columns walking forward (each match at the mean height of its feeders). Matches
//! whose link cannot be resolved are stacked at the bottom of their column.

use crate::logic::bracket::RoundColumn;
use crate::models::MatchId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Geometry constants for layout and connectors, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Height of one match card; benchmark rows are two card heights apart.
    pub card_height: f64,
    pub card_width: f64,
    /// Horizontal distance between round columns.
    pub column_width: f64,
    /// Space above the first row for round headers.
    pub header_height: f64,
    /// Length of the horizontal stub from a card's right edge to the connector midline.
    pub connector_stub: f64,
    /// Added below the lowest card.
    pub height_margin: f64,
    /// Added to the right of the last column.
    pub width_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_height: 100.0,
            card_width: 280.0,
            column_width: 340.0,
            header_height: 60.0,
            connector_stub: 30.0,
            height_margin: 150.0,
            width_margin: 10.0,
        }
    }
}

impl LayoutConfig {
    pub fn row_spacing(&self) -> f64 {
        self.card_height * 2.0
    }

    /// Vertical offset of a card's connector anchor from its top edge.
    pub fn card_center(&self) -> f64 {
        self.card_height / 2.0
    }

    pub fn column_x(&self, round_index: usize) -> f64 {
        round_index as f64 * self.column_width
    }
}

/// A point in section pixel space (origin top-left).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Top-left corner of one match card.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PositionedMatch {
    pub match_id: MatchId,
    pub round_index: usize,
    pub position: Point,
}

/// Positions for every match of a section, in column then match order, plus the size of
/// the area that holds them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BracketLayout {
    pub positions: Vec<PositionedMatch>,
    pub benchmark_round: Option<usize>,
    pub width: f64,
    pub height: f64,
}

impl BracketLayout {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, id: MatchId) -> Option<Point> {
        self.positions
            .iter()
            .find(|p| p.match_id == id)
            .map(|p| p.position)
    }
}

struct Placer<'a> {
    config: &'a LayoutConfig,
    positions: HashMap<MatchId, Point>,
    /// Lowest y placed so far in each column.
    column_bottom: Vec<Option<f64>>,
}

impl<'a> Placer<'a> {
    fn new(config: &'a LayoutConfig, columns: usize) -> Self {
        Self {
            config,
            positions: HashMap::new(),
            column_bottom: vec![None; columns],
        }
    }

    fn get(&self, id: MatchId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    fn is_placed(&self, id: MatchId) -> bool {
        self.positions.contains_key(&id)
    }

    fn place(&mut self, round_index: usize, id: MatchId, y: f64) {
        let bottom = &mut self.column_bottom[round_index];
        *bottom = Some(bottom.map_or(y, |b| b.max(y)));
        self.positions
            .insert(id, Point::new(self.config.column_x(round_index), y));
    }

    /// Below the lowest card in the column, or one row below the header when empty.
    fn stack(&mut self, round_index: usize, id: MatchId) {
        let last = self.column_bottom[round_index].unwrap_or(self.config.header_height);
        self.place(round_index, id, last + self.config.row_spacing());
    }
}

/// First column holding the most matches.
fn benchmark_round(rounds: &[RoundColumn]) -> Option<usize> {
    let widest = rounds.iter().map(|r| r.matches.len()).max()?;
    rounds.iter().position(|r| r.matches.len() == widest)
}

/// Assign a position to every match in `rounds`. Deterministic; never fails.
///
/// Assumes at most two matches share a next-match target. With more, the third and later
/// feeders of a target land on the second feeder's row.
pub fn layout_rounds(rounds: &[RoundColumn], config: &LayoutConfig) -> BracketLayout {
    let Some(bench) = benchmark_round(rounds) else {
        return BracketLayout::default();
    };
    let mut placer = Placer::new(config, rounds.len());

    for (i, m) in rounds[bench].matches.iter().enumerate() {
        let y = config.header_height + i as f64 * config.row_spacing();
        placer.place(bench, m.id, y);
    }

    for ri in (0..bench).rev() {
        let round = &rounds[ri];
        let next_round = &rounds[ri + 1];
        for m in &round.matches {
            let target = m
                .next_match_id
                .filter(|id| next_round.matches.iter().any(|n| n.id == *id))
                .and_then(|id| placer.get(id));
            let Some(target) = target else {
                placer.stack(ri, m.id);
                continue;
            };
            let sibling = round
                .matches
                .iter()
                .find(|s| s.id != m.id && s.next_match_id == m.next_match_id);
            let y = match sibling {
                Some(s) if !placer.is_placed(s.id) => target.y - config.card_height,
                Some(_) => target.y + config.card_height,
                None => target.y,
            };
            placer.place(ri, m.id, y);
        }
    }

    for ri in bench + 1..rounds.len() {
        let prev_round = &rounds[ri - 1];
        for m in &rounds[ri].matches {
            let feeder_ys: Vec<f64> = prev_round
                .matches
                .iter()
                .filter(|f| f.next_match_id == Some(m.id))
                .filter_map(|f| placer.get(f.id))
                .map(|p| p.y)
                .collect();
            if feeder_ys.is_empty() {
                placer.stack(ri, m.id);
            } else {
                let y = feeder_ys.iter().sum::<f64>() / feeder_ys.len() as f64;
                placer.place(ri, m.id, y);
            }
        }
    }

    let mut positions = Vec::with_capacity(placer.positions.len());
    for (ri, round) in rounds.iter().enumerate() {
        for m in &round.matches {
            if let Some(position) = placer.get(m.id) {
                positions.push(PositionedMatch {
                    match_id: m.id,
                    round_index: ri,
                    position,
                });
            }
        }
    }
    let max_y = positions
        .iter()
        .map(|p| p.position.y)
        .fold(config.header_height, f64::max);

    BracketLayout {
        positions,
        benchmark_round: Some(bench),
        width: rounds.len() as f64 * config.column_width + config.width_margin,
        height: max_y + config.height_margin,
    }
}
