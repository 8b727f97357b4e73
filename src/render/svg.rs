//! SVG rendering of a laid-out bracket section: round headers, match cards, connector lines.

use crate::logic::{GroupTable, LayoutConfig, Point, SectionKind, SectionLayout};
use crate::models::{team_label, GameMatch, MatchStatus, Team, TeamId};
use crate::render::{escape_xml, group_title};

const BACKGROUND: &str = "#1c1208";
const LINE_COLOR: &str = "#D2691E";
const LINE_WIDTH: f64 = 3.0;
const CARD_FILL: &str = "#fef3c7";
const WINNER_FILL: &str = "#fef9c3";
const WINNER_RING: &str = "#facc15";
const TEXT_COLOR: &str = "#78350f";
const NOTE_COLOR: &str = "#fde68a";
const LIVE_COLOR: &str = "#dc2626";
const MAX_NAME_CHARS: usize = 22;

/// Each card has two team rows separated by a gap; the connector anchor sits in the gap.
/// Rows and gap fill `card_height` exactly, so cards never overlap their neighbours.
#[derive(Clone, Copy, Debug)]
struct CardGeometry {
    row: f64,
    gap: f64,
}

impl CardGeometry {
    fn new(config: &LayoutConfig) -> Self {
        let gap = config.card_height * 3.0 / 25.0;
        Self {
            row: (config.card_height - gap) / 2.0,
            gap,
        }
    }
}

/// Round header band drawn inside the space reserved above the first row.
fn header_band(config: &LayoutConfig) -> f64 {
    config.header_height * 2.0 / 3.0
}

/// Minimum canvas height; a one-match grand final gets a short canvas.
fn min_height(section: &SectionLayout) -> f64 {
    let single_final = section.section.kind == SectionKind::GrandFinal
        && section
            .section
            .rounds
            .first()
            .is_some_and(|r| r.matches.len() == 1);
    if single_final {
        100.0
    } else {
        400.0
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_CHARS {
        return name.to_string();
    }
    let mut short: String = name.chars().take(MAX_NAME_CHARS - 1).collect();
    short.push('…');
    short
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_winner(m: &GameMatch, team: Option<TeamId>) -> bool {
    team.is_some() && m.winner_id.is_some() && m.winner_id == team
}

fn team_row(
    svg: &mut String,
    at: Point,
    width: f64,
    height: f64,
    name: &str,
    score: Option<u32>,
    winner: bool,
) {
    let (fill, stroke) = if winner {
        (WINNER_FILL, WINNER_RING)
    } else {
        (CARD_FILL, CARD_FILL)
    };
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"14\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
        at.x, at.y, width, height, fill, stroke
    ));
    let label = if winner {
        format!("👑 {}", truncate_name(name))
    } else {
        truncate_name(name)
    };
    let text_y = at.y + height / 2.0 + 5.0;
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"14\" font-weight=\"bold\" fill=\"{}\"><title>{}</title>{}</text>",
        at.x + 16.0,
        text_y,
        TEXT_COLOR,
        escape_xml(name),
        escape_xml(&label)
    ));
    let score = score.map_or_else(|| "-".to_string(), |s| s.to_string());
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-family=\"sans-serif\" font-size=\"22\" font-weight=\"900\" fill=\"{}\">{}</text>",
        at.x + width - 16.0,
        text_y + 3.0,
        TEXT_COLOR,
        score
    ));
}

fn match_card(svg: &mut String, m: &GameMatch, at: Point, teams: &[Team], config: &LayoutConfig) {
    let card = CardGeometry::new(config);
    if let Some(note) = m.note.as_deref().filter(|n| !n.is_empty()) {
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"12\" fill=\"{}\">{}</text>",
            at.x + config.card_width / 2.0,
            at.y - 6.0,
            NOTE_COLOR,
            escape_xml(note)
        ));
    }
    team_row(
        svg,
        at,
        config.card_width,
        card.row,
        team_label(teams, m.team1_id),
        m.team1_score,
        is_winner(m, m.team1_id),
    );
    team_row(
        svg,
        Point::new(at.x, at.y + card.row + card.gap),
        config.card_width,
        card.row,
        team_label(teams, m.team2_id),
        m.team2_score,
        is_winner(m, m.team2_id),
    );
    if m.status == MatchStatus::InProgress {
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"11\" font-weight=\"bold\" fill=\"{}\">LIVE MATCH</text>",
            at.x + config.card_width / 2.0,
            at.y + config.card_height + 14.0,
            LIVE_COLOR
        ));
    }
}

/// Render a section as a standalone SVG document. Empty sections render nothing.
pub fn render_section_svg(
    section: &SectionLayout,
    teams: &[Team],
    config: &LayoutConfig,
) -> Option<String> {
    if section.is_empty() {
        return None;
    }
    let width = section.layout.width;
    let height = section.layout.height.max(min_height(section));
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    ));
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"{BACKGROUND}\"/>"
    ));

    let band = header_band(config);
    for (ri, round) in section.section.rounds.iter().enumerate() {
        let x = config.column_x(ri);
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"0\" width=\"{}\" height=\"{}\" rx=\"14\" fill=\"{}\"/>",
            x, config.card_width, band, CARD_FILL
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"18\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            x + 16.0,
            band / 2.0 + 6.0,
            TEXT_COLOR,
            escape_xml(&round.header(section.section.kind))
        ));
    }

    for connector in &section.connectors {
        for line in connector.polylines() {
            svg.push_str(&format!(
                "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                points_attr(line),
                LINE_COLOR,
                LINE_WIDTH
            ));
        }
    }

    for round in &section.section.rounds {
        for m in &round.matches {
            if let Some(at) = section.layout.position(m.id) {
                match_card(&mut svg, m, at, teams, config);
            }
        }
    }

    svg.push_str("</svg>");
    Some(svg)
}

const GROUP_WIDTH: f64 = 560.0;
const GROUP_TITLE_HEIGHT: f64 = 48.0;
const GROUP_ROW_HEIGHT: f64 = 32.0;
/// Column label and left edge of each standings column.
const GROUP_COLUMNS: [(&str, f64); 8] = [
    ("#", 16.0),
    ("Team", 48.0),
    ("P", 300.0),
    ("W", 340.0),
    ("D", 380.0),
    ("L", 420.0),
    ("Pts", 460.0),
    ("Balls", 500.0),
];

fn group_text(svg: &mut String, x: f64, y: f64, weight: &str, fill: &str, text: &str) {
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"14\" font-weight=\"{}\" fill=\"{}\">{}</text>",
        x,
        y,
        weight,
        fill,
        escape_xml(text)
    ));
}

/// Render one group's standings table as a standalone SVG document. Groups without
/// members render nothing.
pub fn render_group_svg(group: &GroupTable) -> Option<String> {
    if group.standings.is_empty() {
        return None;
    }
    let height = GROUP_TITLE_HEIGHT + GROUP_ROW_HEIGHT * (group.standings.len() + 1) as f64 + 16.0;
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{GROUP_WIDTH}\" height=\"{height}\" viewBox=\"0 0 {GROUP_WIDTH} {height}\">"
    );
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{GROUP_WIDTH}\" height=\"{height}\" fill=\"{BACKGROUND}\"/>"
    ));
    svg.push_str(&format!(
        "<text x=\"16\" y=\"32\" font-family=\"sans-serif\" font-size=\"20\" font-weight=\"bold\" fill=\"{}\">{}</text>",
        CARD_FILL,
        escape_xml(&group_title(&group.name))
    ));

    let header_y = GROUP_TITLE_HEIGHT;
    svg.push_str(&format!(
        "<rect x=\"8\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"8\" fill=\"{}\"/>",
        header_y,
        GROUP_WIDTH - 16.0,
        GROUP_ROW_HEIGHT,
        CARD_FILL
    ));
    for (label, x) in GROUP_COLUMNS {
        group_text(&mut svg, x, header_y + 21.0, "bold", TEXT_COLOR, label);
    }

    for (i, s) in group.standings.iter().enumerate() {
        let y = header_y + GROUP_ROW_HEIGHT * (i + 1) as f64 + 21.0;
        let balls = if s.ball_difference > 0 {
            format!("+{}", s.ball_difference)
        } else {
            s.ball_difference.to_string()
        };
        let cells = [
            (i + 1).to_string(),
            truncate_name(&s.team_name),
            s.played.to_string(),
            s.won.to_string(),
            s.drawn.to_string(),
            s.lost.to_string(),
            s.points.to_string(),
            balls,
        ];
        for ((_, x), cell) in GROUP_COLUMNS.iter().zip(&cells) {
            group_text(&mut svg, *x, y, "normal", NOTE_COLOR, cell);
        }
    }

    svg.push_str("</svg>");
    Some(svg)
}
