//! Match list ordering for group views and the dashboard's upcoming/recent lists.

use crate::models::{team_label, GameMatch, MatchId, MatchStatus, MatchType, Team, TournamentId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::{Ordering, Reverse};

/// Missing values sort after present ones.
fn some_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_group_matches(a: &GameMatch, b: &GameMatch) -> Ordering {
    a.status
        .list_priority()
        .cmp(&b.status.list_priority())
        .then_with(|| some_first(a.scheduled_at, b.scheduled_at))
        .then_with(|| some_first(a.table_number, b.table_number))
        .then_with(|| some_first(a.match_number, b.match_number))
        .then_with(|| a.id.cmp(&b.id))
}

/// Matches of one group: live first, then pending, then completed; within a status by
/// scheduled time, table, match number and finally id.
pub fn order_group_matches(group_name: &str, matches: &[GameMatch]) -> Vec<GameMatch> {
    let mut list: Vec<GameMatch> = matches
        .iter()
        .filter(|m| m.match_type == MatchType::Group && m.round_name.as_deref() == Some(group_name))
        .cloned()
        .collect();
    list.sort_by(compare_group_matches);
    list
}

/// A match flattened with team names for dashboard lists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub team1_name: String,
    pub team2_name: String,
    pub team1_score: Option<u32>,
    pub team2_score: Option<u32>,
    pub status: MatchStatus,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub table_number: Option<u32>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DashboardMatch {
    pub fn from_match(m: &GameMatch, teams: &[Team]) -> Self {
        Self {
            id: m.id,
            tournament_id: m.tournament_id,
            team1_name: team_label(teams, m.team1_id).to_string(),
            team2_name: team_label(teams, m.team2_id).to_string(),
            team1_score: m.team1_score,
            team2_score: m.team2_score,
            status: m.status,
            scheduled_time: m.scheduled_at,
            table_number: m.table_number,
            updated_at: m.updated_at,
        }
    }
}

/// Pending matches, soonest first (unscheduled last), at most `limit`.
pub fn upcoming_matches(matches: &[GameMatch], teams: &[Team], limit: usize) -> Vec<DashboardMatch> {
    let mut pending: Vec<&GameMatch> = matches
        .iter()
        .filter(|m| m.status == MatchStatus::Pending)
        .collect();
    pending.sort_by(|a, b| {
        some_first(a.scheduled_at, b.scheduled_at).then_with(|| a.id.cmp(&b.id))
    });
    pending
        .into_iter()
        .take(limit)
        .map(|m| DashboardMatch::from_match(m, teams))
        .collect()
}

/// Completed matches, most recently updated first, at most `limit`.
pub fn recent_results(matches: &[GameMatch], teams: &[Team], limit: usize) -> Vec<DashboardMatch> {
    let mut done: Vec<&GameMatch> = matches.iter().filter(|m| m.is_completed()).collect();
    done.sort_by(|a, b| {
        some_first(a.updated_at.map(Reverse), b.updated_at.map(Reverse))
            .then_with(|| a.id.cmp(&b.id))
    });
    done.into_iter()
        .take(limit)
        .map(|m| DashboardMatch::from_match(m, teams))
        .collect()
}

/// One knockout round of the match schedule.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KnockoutRound {
    pub name: String,
    pub matches: Vec<GameMatch>,
}

/// Chronological rank of a knockout round tag; unrecognised tags sort first.
fn round_priority(name: &str) -> u8 {
    let name = name.to_lowercase();
    if name.contains("round-of-16") || name.contains("16-besar") {
        1
    } else if name.contains("quarter") || name.contains("8-besar") {
        2
    } else if name.contains("semi") || name.contains("4-besar") {
        3
    } else if name.contains("3rd") || name.contains("3-4") || name.contains("peringkat-3") {
        4
    } else if name.contains("final") && !name.contains("grand") {
        5
    } else if name.contains("grand") {
        6
    } else {
        0
    }
}

fn compare_knockout_matches(a: &GameMatch, b: &GameMatch) -> Ordering {
    a.status
        .list_priority()
        .cmp(&b.status.list_priority())
        .then_with(|| some_first(a.scheduled_at, b.scheduled_at))
        .then_with(|| a.match_number.unwrap_or(0).cmp(&b.match_number.unwrap_or(0)))
        .then_with(|| a.id.cmp(&b.id))
}

/// Knockout matches grouped by round name, rounds in bracket order (round of 16 through
/// grand final, first appearance breaking ties). Within a round: live, pending, completed,
/// then scheduled time and match number. Matches without a round name are left out.
pub fn order_knockout_rounds(matches: &[GameMatch]) -> Vec<KnockoutRound> {
    let mut rounds: Vec<KnockoutRound> = Vec::new();
    for m in matches.iter().filter(|m| m.match_type == MatchType::Knockout) {
        let Some(name) = m.round_name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        match rounds.iter_mut().find(|r| r.name == name) {
            Some(round) => round.matches.push(m.clone()),
            None => rounds.push(KnockoutRound {
                name: name.to_string(),
                matches: vec![m.clone()],
            }),
        }
    }
    // Stable sort keeps first-appearance order among equal priorities.
    rounds.sort_by_key(|r| round_priority(&r.name));
    for round in &mut rounds {
        round.matches.sort_by(compare_knockout_matches);
    }
    rounds
}
