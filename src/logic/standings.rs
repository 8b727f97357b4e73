//! Group stage standings: a round-robin scoring reducer over completed matches.

use crate::models::{GameMatch, MatchType, Team, TeamId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Points for a win.
pub const POINTS_WIN: u32 = 3;
/// Points for each side on a draw.
pub const POINTS_DRAW: u32 = 1;

/// One row of a group table. Derived fresh from the match list, never stored.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct GroupStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub score_for: u32,
    pub score_against: u32,
    pub score_difference: i64,
    pub balls_for: u32,
    pub balls_against: u32,
    pub ball_difference: i64,
    pub points: u32,
}

impl GroupStanding {
    fn new(team: &Team) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            ..Self::default()
        }
    }

    fn record(&mut self, score_for: u32, score_against: u32, balls_for: u32, balls_against: u32) {
        self.played = self.played.saturating_add(1);
        self.score_for = self.score_for.saturating_add(score_for);
        self.score_against = self.score_against.saturating_add(score_against);
        self.balls_for = self.balls_for.saturating_add(balls_for);
        self.balls_against = self.balls_against.saturating_add(balls_against);
        match score_for.cmp(&score_against) {
            Ordering::Greater => {
                self.won = self.won.saturating_add(1);
                self.points = self.points.saturating_add(POINTS_WIN);
            }
            Ordering::Less => self.lost = self.lost.saturating_add(1),
            Ordering::Equal => {
                self.drawn = self.drawn.saturating_add(1);
                self.points = self.points.saturating_add(POINTS_DRAW);
            }
        }
        self.score_difference = i64::from(self.score_for) - i64::from(self.score_against);
        self.ball_difference = i64::from(self.balls_for) - i64::from(self.balls_against);
    }
}

/// A named group and its ordered table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GroupTable {
    pub name: String,
    pub standings: Vec<GroupStanding>,
}

fn in_group(m: &GameMatch, group_name: &str) -> bool {
    m.match_type == MatchType::Group && m.round_name.as_deref() == Some(group_name)
}

/// Standings for one group.
///
/// Members are the teams that appear in any group match of `group_name`. Only completed
/// matches between two members are scored; missing scores count as zero. Ordered by
/// points, then balls difference, then team name (case-insensitive), all independent of
/// input order.
pub fn calculate_group_standings(
    group_name: &str,
    matches: &[GameMatch],
    teams: &[Team],
) -> Vec<GroupStanding> {
    let group_matches: Vec<&GameMatch> = matches.iter().filter(|m| in_group(m, group_name)).collect();

    let mut standings: Vec<GroupStanding> = teams
        .iter()
        .filter(|t| group_matches.iter().any(|m| m.involves(t.id)))
        .map(GroupStanding::new)
        .collect();
    let index: HashMap<TeamId, usize> = standings
        .iter()
        .enumerate()
        .map(|(i, s)| (s.team_id, i))
        .collect();

    for m in group_matches.iter().filter(|m| m.is_completed()) {
        let (Some(t1), Some(t2)) = (m.team1_id, m.team2_id) else {
            continue;
        };
        let (Some(&i1), Some(&i2)) = (index.get(&t1), index.get(&t2)) else {
            continue;
        };
        let s1 = m.team1_score.unwrap_or(0);
        let s2 = m.team2_score.unwrap_or(0);
        let b1 = m.team1_balls.unwrap_or(0);
        let b2 = m.team2_balls.unwrap_or(0);
        standings[i1].record(s1, s2, b1, b2);
        standings[i2].record(s2, s1, b2, b1);
    }

    standings.sort_by(compare_standings);
    standings
}

fn compare_standings(a: &GroupStanding, b: &GroupStanding) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.ball_difference.cmp(&a.ball_difference))
        .then_with(|| a.team_name.to_lowercase().cmp(&b.team_name.to_lowercase()))
        .then_with(|| a.team_name.cmp(&b.team_name))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

/// Distinct group names of the group matches, in display order.
///
/// Names ending in a number sort by that number ("Group 2" before "Group 10") and come
/// before names without one; the rest sort case-insensitively.
pub fn group_names(matches: &[GameMatch]) -> Vec<String> {
    let distinct: BTreeSet<&str> = matches
        .iter()
        .filter(|m| m.match_type == MatchType::Group)
        .filter_map(|m| m.round_name.as_deref())
        .filter(|name| !name.is_empty())
        .collect();
    let mut names: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    names.sort_by(|a, b| compare_group_names(a, b));
    names
}

fn trailing_number(name: &str) -> Option<u64> {
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    name[name.len() - digits..].parse().ok()
}

fn compare_group_names(a: &str, b: &str) -> Ordering {
    let by_name = || a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b));
    match (trailing_number(a), trailing_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(by_name),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => by_name(),
    }
}

/// Tables for every group, in `group_names` order.
pub fn all_group_standings(matches: &[GameMatch], teams: &[Team]) -> Vec<GroupTable> {
    group_names(matches)
        .into_iter()
        .map(|name| {
            let standings = calculate_group_standings(&name, matches, teams);
            GroupTable { name, standings }
        })
        .collect()
}
