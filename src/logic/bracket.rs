//! Knockout bracket structure: split matches into sections and group each into round columns.

use crate::models::{GameMatch, MatchType, TournamentFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A connected sub-tournament of knockout matches.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    /// Winners' bracket of a double elimination.
    Upper,
    /// Losers' bracket of a double elimination.
    Lower,
    GrandFinal,
    /// The whole knockout tree for any other format.
    Knockout,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Upper,
        SectionKind::Lower,
        SectionKind::GrandFinal,
        SectionKind::Knockout,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Upper => "Upper Bracket (Winners)",
            SectionKind::Lower => "Lower Bracket (Losers)",
            SectionKind::GrandFinal => "Grand Final",
            SectionKind::Knockout => "Knockout",
        }
    }

    /// URL path segment.
    pub fn slug(self) -> &'static str {
        match self {
            SectionKind::Upper => "upper",
            SectionKind::Lower => "lower",
            SectionKind::GrandFinal => "grand-final",
            SectionKind::Knockout => "knockout",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        SectionKind::ALL.into_iter().find(|k| k.slug() == slug)
    }

    /// Whether a knockout match belongs to this section under `format`.
    fn contains(self, format: &TournamentFormat, m: &GameMatch) -> bool {
        let round_name = m.round_name.as_deref().unwrap_or("").to_lowercase();
        match (format.is_double_elimination(), self) {
            (true, SectionKind::Upper) => round_name == "upper",
            (true, SectionKind::Lower) => round_name == "lower",
            (true, SectionKind::GrandFinal) => {
                matches!(round_name.as_str(), "grand-final" | "grand_final" | "grandfinal")
            }
            (false, SectionKind::Knockout) => true,
            _ => false,
        }
    }
}

/// Matches sharing a round number within a section, sorted by match number.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundColumn {
    pub name: String,
    pub round: u32,
    pub matches: Vec<GameMatch>,
}

impl RoundColumn {
    /// Column header text. Double elimination round names carry the section tag rather than
    /// a round label, so those columns are numbered instead.
    pub fn header(&self, kind: SectionKind) -> String {
        match kind {
            SectionKind::GrandFinal => "Final".to_string(),
            SectionKind::Upper | SectionKind::Lower => format!("Round {}", self.round),
            SectionKind::Knockout => self.name.clone(),
        }
    }
}

/// One bracket section and its round columns (empty when the section has no matches).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BracketSection {
    pub kind: SectionKind,
    pub rounds: Vec<RoundColumn>,
}

impl BracketSection {
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Group a section's matches into columns ordered by round number; within a column, by
/// match number. Missing numbers count as 0; equal keys keep input order.
pub fn build_rounds(matches: &[GameMatch]) -> Vec<RoundColumn> {
    let mut by_round: BTreeMap<u32, Vec<GameMatch>> = BTreeMap::new();
    for m in matches {
        by_round.entry(m.round_number.unwrap_or(0)).or_default().push(m.clone());
    }
    by_round
        .into_iter()
        .map(|(round, mut matches)| {
            matches.sort_by_key(|m| m.match_number.unwrap_or(0));
            let name = matches
                .first()
                .and_then(|m| m.round_name.clone())
                .unwrap_or_else(|| format!("Round {}", round));
            RoundColumn {
                name,
                round,
                matches,
            }
        })
        .collect()
}

/// The knockout matches of one section.
pub fn section_matches(
    kind: SectionKind,
    format: &TournamentFormat,
    matches: &[GameMatch],
) -> Vec<GameMatch> {
    matches
        .iter()
        .filter(|m| m.match_type == MatchType::Knockout && kind.contains(format, m))
        .cloned()
        .collect()
}

/// One section, possibly empty.
pub fn build_section(
    kind: SectionKind,
    format: &TournamentFormat,
    matches: &[GameMatch],
) -> BracketSection {
    BracketSection {
        kind,
        rounds: build_rounds(&section_matches(kind, format, matches)),
    }
}

/// All non-empty sections in display order: upper, lower, grand final for double
/// elimination; a single knockout section otherwise.
pub fn bracket_sections(format: &TournamentFormat, matches: &[GameMatch]) -> Vec<BracketSection> {
    SectionKind::ALL
        .into_iter()
        .map(|kind| build_section(kind, format, matches))
        .filter(|s| !s.is_empty())
        .collect()
}
