//! Screenshot export: capture a bracket section or a group table as a downloadable image.

use crate::logic::{GroupTable, LayoutConfig, SectionLayout};
use crate::models::{Team, TournamentError};
use crate::render::group_title;
use crate::render::svg::{render_group_svg, render_section_svg};

/// An encoded section image and the name it should download as.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Download name for a capture: whitespace runs become "-", lower-cased, plus extension.
pub fn download_file_name(title: &str, extension: &str) -> String {
    let stem = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("{}.{}", stem, extension)
}

/// Image encoder for rendered sections.
pub trait SectionCapture {
    fn content_type(&self) -> &'static str;

    fn extension(&self) -> &'static str;

    /// Encode a rendered SVG document.
    fn encode(&self, svg: &str) -> Result<Vec<u8>, TournamentError>;

    /// Encode an already rendered document; `None` means there was nothing to draw.
    fn capture_rendered(
        &self,
        title: &str,
        svg: Option<String>,
    ) -> Result<CapturedImage, TournamentError> {
        let svg = svg.ok_or_else(|| TournamentError::Capture(format!("{} has no matches", title)))?;
        Ok(CapturedImage {
            bytes: self.encode(&svg)?,
            content_type: self.content_type(),
            file_name: download_file_name(title, self.extension()),
        })
    }

    /// Render and encode `section`. Fails for empty sections and encoder errors.
    fn capture(
        &self,
        title: &str,
        section: &SectionLayout,
        teams: &[Team],
        config: &LayoutConfig,
    ) -> Result<CapturedImage, TournamentError> {
        self.capture_rendered(title, render_section_svg(section, teams, config))
    }

    /// Render and encode one group's standings table, named after the group.
    fn capture_group(&self, group: &GroupTable) -> Result<CapturedImage, TournamentError> {
        self.capture_rendered(&group_title(&group.name), render_group_svg(group))
    }
}

/// Captures sections as the SVG document itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvgCapture;

impl SectionCapture for SvgCapture {
    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn extension(&self) -> &'static str {
        "svg"
    }

    fn encode(&self, svg: &str) -> Result<Vec<u8>, TournamentError> {
        let mut bytes = Vec::with_capacity(svg.len() + 40);
        bytes.extend_from_slice(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        bytes.extend_from_slice(svg.as_bytes());
        Ok(bytes)
    }
}
