//! Output side: SVG brackets, section capture, HTML pages.

mod capture;
mod html;
mod svg;

pub use capture::{download_file_name, CapturedImage, SectionCapture, SvgCapture};
pub use html::{render_dashboard, render_tournament_page};
pub use svg::{render_group_svg, render_section_svg};

/// Escape text for XML/HTML content and attribute values.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// "group-a" → "Group A".
pub(crate) fn group_title(name: &str) -> String {
    name.replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
