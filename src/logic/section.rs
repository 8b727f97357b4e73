//! A bracket section with its layout and connectors, ready for the renderer.

use crate::logic::bracket::{bracket_sections, BracketSection};
use crate::logic::connectors::{build_connectors, Connector};
use crate::logic::layout::{layout_rounds, BracketLayout, LayoutConfig};
use crate::models::{GameMatch, TournamentFormat};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionLayout {
    pub section: BracketSection,
    pub layout: BracketLayout,
    pub connectors: Vec<Connector>,
}

impl SectionLayout {
    pub fn is_empty(&self) -> bool {
        self.section.is_empty()
    }
}

/// Lay out one section. Recomputed from scratch on every call.
pub fn layout_section(section: BracketSection, config: &LayoutConfig) -> SectionLayout {
    let layout = layout_rounds(&section.rounds, config);
    let connectors = build_connectors(&section.rounds, &layout, config);
    SectionLayout {
        section,
        layout,
        connectors,
    }
}

/// Every non-empty section of the knockout stage, laid out.
pub fn layout_bracket(
    format: &TournamentFormat,
    matches: &[GameMatch],
    config: &LayoutConfig,
) -> Vec<SectionLayout> {
    bracket_sections(format, matches)
        .into_iter()
        .map(|section| layout_section(section, config))
        .collect()
}
