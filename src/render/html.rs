//! Server-rendered HTML pages: the dashboard and the tournament detail view.

use crate::logic::{
    all_group_standings, layout_bracket, order_group_matches, order_knockout_rounds,
    DashboardMatch, GroupTable, KnockoutRound, LayoutConfig, SectionLayout,
};
use crate::models::{team_label, GameMatch, MatchStatus, Team, TournamentId};
use crate::render::group_title;
use crate::render::svg::render_section_svg;
use crate::store::{TournamentData, TournamentSummary};
use chrono::{DateTime, Utc};
use hypertext::{maud, prelude::*, Raw, Renderable};

/// Group and knockout match lists show this many rows.
const GROUP_MATCH_PREVIEW: usize = 3;
/// Dashboard upcoming/latest lists show this many rows.
const DASHBOARD_PREVIEW: usize = 3;

const STYLE: &str = "body{font-family:sans-serif;background:#1c1208;color:#fef3c7;margin:0;padding:2rem}\
a{color:#fbbf24}table{border-collapse:collapse;width:100%}\
th,td{padding:.4rem .6rem;border-bottom:1px solid #78350f;text-align:left}\
.card{background:#2a1a0c;border:2px solid #92400e;border-radius:14px;padding:1rem;margin-bottom:1.5rem}\
.pos{color:#16a34a}.neg{color:#dc2626}.bracket{overflow-x:auto}";

/// Document shell shared by every page.
struct Page<'a, R: Renderable> {
    title: &'a str,
    body: R,
}

impl<R: Renderable> Renderable for Page<'_, R> {
    fn render_to(&self, buffer: &mut hypertext::Buffer<hypertext::context::Node>) {
        maud! {
            (Raw::dangerously_create("<!DOCTYPE html>"))
            html {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (self.title) }
                    style { (STYLE) }
                }
                body {
                    (self.body)
                }
            }
        }
        .render_to(buffer);
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M").to_string()
}

fn signed(n: i64) -> String {
    if n > 0 {
        format!("+{}", n)
    } else {
        n.to_string()
    }
}

fn diff_class(n: i64) -> &'static str {
    match n.signum() {
        1 => "pos",
        -1 => "neg",
        _ => "",
    }
}

/// Score when finished, otherwise a status or schedule hint.
fn score_display(m: &GameMatch) -> String {
    match (m.status, m.team1_score, m.team2_score) {
        (MatchStatus::Completed, Some(a), Some(b)) => format!("{} - {}", a, b),
        (MatchStatus::InProgress, _, _) => "In progress".to_string(),
        _ => m
            .scheduled_at
            .map(format_date)
            .unwrap_or_else(|| "Scheduled".to_string()),
    }
}

fn table_suffix(table_number: Option<u32>) -> String {
    table_number
        .map(|t| format!(" · Table {}", t))
        .unwrap_or_default()
}

fn dashboard_score(m: &DashboardMatch) -> String {
    match (m.team1_score, m.team2_score) {
        (Some(a), Some(b)) => format!("{} - {}", a, b),
        _ => m
            .scheduled_time
            .map(format_date)
            .unwrap_or_else(|| "TBD".to_string()),
    }
}

struct DashboardList<'a> {
    heading: &'a str,
    matches: &'a [DashboardMatch],
}

impl Renderable for DashboardList<'_> {
    fn render_to(&self, buffer: &mut hypertext::Buffer<hypertext::context::Node>) {
        maud! {
            div class="card" {
                h2 { (self.heading) }
                ul {
                    @for m in self.matches.iter().take(DASHBOARD_PREVIEW) {
                        li {
                            (m.team1_name) " vs " (m.team2_name) " "
                            strong { (dashboard_score(m)) }
                            (table_suffix(m.table_number))
                        }
                    }
                }
            }
        }
        .render_to(buffer);
    }
}

/// Landing page: tournament list, upcoming matches, latest results.
pub fn render_dashboard(
    tournaments: &[TournamentSummary],
    upcoming: &[DashboardMatch],
    recent: &[DashboardMatch],
) -> String {
    let body = maud! {
        h1 { "Billiards Tournament" }
        div class="card" {
            h2 { "Active tournaments" }
            ul {
                @for t in tournaments {
                    li {
                        a href=(format!("/tournament/{}", t.tournament.id)) { (t.tournament.name) }
                        " (" (t.tournament.status.label()) ") · "
                        (t.current_teams) "/" (t.tournament.max_teams) " teams"
                    }
                }
            }
        }
        DashboardList heading=("Upcoming matches") matches=(upcoming);
        DashboardList heading=("Latest results") matches=(recent);
    };
    Page {
        title: "Billiards Tournament",
        body,
    }
    .render()
    .into_inner()
}

struct StandingsCard<'a> {
    tournament_id: TournamentId,
    group: &'a GroupTable,
    matches: &'a [GameMatch],
    teams: &'a [Team],
}

impl Renderable for StandingsCard<'_> {
    fn render_to(&self, buffer: &mut hypertext::Buffer<hypertext::context::Node>) {
        let ordered = order_group_matches(&self.group.name, self.matches);
        maud! {
            div class="card" {
                h2 { (group_title(&self.group.name)) }
                p {
                    a href=(format!("/tournament/{}/groups/{}/capture?download=1", self.tournament_id, self.group.name)) {
                        "Download image"
                    }
                }
                table {
                    thead {
                        tr {
                            th { "#" } th { "Team" } th { "P" } th { "W" }
                            th { "D" } th { "L" } th { "Pts" } th { "Balls" }
                        }
                    }
                    tbody {
                        @for (i, s) in self.group.standings.iter().enumerate() {
                            tr {
                                td { (i + 1) }
                                td { (s.team_name) }
                                td { (s.played) }
                                td { (s.won) }
                                td { (s.drawn) }
                                td { (s.lost) }
                                td { (s.points) }
                                td class=(diff_class(s.ball_difference)) { (signed(s.ball_difference)) }
                            }
                        }
                    }
                }
                MatchList matches=(&ordered) teams=(self.teams);
            }
        }
        .render_to(buffer);
    }
}

/// First few matches of an ordered list plus a count of the rest.
struct MatchList<'a> {
    matches: &'a [GameMatch],
    teams: &'a [Team],
}

impl Renderable for MatchList<'_> {
    fn render_to(&self, buffer: &mut hypertext::Buffer<hypertext::context::Node>) {
        maud! {
            ul {
                @for m in self.matches.iter().take(GROUP_MATCH_PREVIEW) {
                    li {
                        (team_label(self.teams, m.team1_id)) " vs " (team_label(self.teams, m.team2_id)) " "
                        strong { (score_display(m)) }
                        (table_suffix(m.table_number))
                    }
                }
            }
            @if self.matches.len() > GROUP_MATCH_PREVIEW {
                p { "and " (self.matches.len() - GROUP_MATCH_PREVIEW) " more" }
            }
        }
        .render_to(buffer);
    }
}

struct KnockoutSchedule<'a> {
    rounds: &'a [KnockoutRound],
    teams: &'a [Team],
}

impl Renderable for KnockoutSchedule<'_> {
    fn render_to(&self, buffer: &mut hypertext::Buffer<hypertext::context::Node>) {
        maud! {
            div class="card" {
                h2 { "Knockout Schedule" }
                @for round in self.rounds {
                    // "quarter-final" reads as "Quarter Final".
                    h3 { (group_title(&round.name)) }
                    MatchList matches=(&round.matches) teams=(self.teams);
                }
            }
        }
        .render_to(buffer);
    }
}

struct BracketCard<'a> {
    tournament_id: TournamentId,
    section: &'a SectionLayout,
    svg: &'a str,
}

impl Renderable for BracketCard<'_> {
    fn render_to(&self, buffer: &mut hypertext::Buffer<hypertext::context::Node>) {
        maud! {
            div class="card" {
                h2 { (self.section.section.title()) }
                p {
                    a href=(format!("/tournament/{}/bracket/{}/capture?download=1", self.tournament_id, self.section.section.kind.slug())) {
                        "Download image"
                    }
                }
                div class="bracket" {
                    (Raw::dangerously_create(self.svg))
                }
            }
        }
        .render_to(buffer);
    }
}

fn date_range(data: &TournamentData) -> Option<String> {
    let t = &data.tournament;
    let start = t.start_date?;
    Some(match t.end_date.filter(|end| *end != start) {
        Some(end) => format!("{} - {}", start.format("%d %B %Y"), end.format("%d %B %Y")),
        None => start.format("%d %B %Y").to_string(),
    })
}

/// Detail page: header, participants, group tables with match lists, bracket sections and
/// the knockout schedule. Everything derived is recomputed from `data` on each call.
pub fn render_tournament_page(data: &TournamentData, config: &LayoutConfig) -> String {
    let t = &data.tournament;
    let groups = all_group_standings(&data.matches, &data.teams);
    let brackets: Vec<(SectionLayout, String)> = layout_bracket(&t.format, &data.matches, config)
        .into_iter()
        .filter_map(|section| {
            let svg = render_section_svg(&section, &data.teams, config)?;
            Some((section, svg))
        })
        .collect();
    let knockout_rounds = order_knockout_rounds(&data.matches);

    let body = maud! {
        p { a href="/" { "← Back" } }
        div class="card" {
            h1 { (t.name) }
            p { (t.format.label()) " · Max " (t.max_teams) " teams · " (t.status.label()) }
            @if let Some(location) = &t.location {
                p { (location) }
            }
            @if let Some(dates) = date_range(data) {
                p { (dates) }
            }
            @if let Some(description) = &t.description {
                p { (description) }
            }
        }
        @if !data.teams.is_empty() {
            div class="card" {
                h2 { "Participants (" (data.teams.len()) ")" }
                ul {
                    @for team in &data.teams {
                        li { (team.name) }
                    }
                }
            }
        }
        @for group in &groups {
            StandingsCard tournament_id=(t.id) group=(group) matches=(&data.matches) teams=(&data.teams);
        }
        @for (section, svg) in &brackets {
            BracketCard tournament_id=(t.id) section=(section) svg=(svg);
        }
        @if !knockout_rounds.is_empty() {
            KnockoutSchedule rounds=(&knockout_rounds) teams=(&data.teams);
        }
    };
    Page {
        title: &t.name,
        body,
    }
    .render()
    .into_inner()
}
