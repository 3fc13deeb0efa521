// ABOUTME: Outline handling for the slidecraft application
// ABOUTME: Parses generated outlines and post-processes generated content maps

use crate::errors::{DeckError, Result};
use crate::model::{Body, Comparison, ComparisonSide, ContentMap, Slide, SlideFields};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Outline titles containing any of these (case-insensitive) call for a
/// comparison slide.
const COMPARISON_MARKERS: &[&str] = &[
    "vs",
    "versus",
    "comparison",
    "pros",
    "cons",
    "advantages",
    "disadvantages",
];

/// Default number of outline entries passed on to content-map generation.
pub const DEFAULT_OUTLINE_LIMIT: usize = 5;

/// One planned slide: a title and its talking points.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutlineItem {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// Produces an outline for a subject, typically by asking a language model.
pub trait OutlineGenerator {
    fn generate_outline(&self, subject: &str) -> Result<Vec<OutlineItem>>;
}

/// Expands an outline into a full content map.
pub trait ContentMapGenerator {
    fn generate_content_map(&self, outline: &[OutlineItem]) -> Result<ContentMap>;
}

/// Extract an outline from a generator response: either a ```json fenced block or
/// a bare JSON array.
pub fn parse_outline_response(raw: &str) -> Result<Vec<OutlineItem>> {
    let json = fenced_json(raw).unwrap_or(raw).trim();
    let items: Vec<OutlineItem> = serde_json::from_str(json)
        .map_err(|e| DeckError::GeneratorError(format!("Invalid outline JSON: {}", e)))?;

    if let Some(pos) = items.iter().position(|item| item.title.trim().is_empty()) {
        return Err(DeckError::GeneratorError(format!(
            "Outline entry {} has no title",
            pos + 1
        )));
    }

    debug!("Parsed outline with {} entries", items.len());
    Ok(items)
}

fn fenced_json(raw: &str) -> Option<&str> {
    let start = raw.find("```json")? + "```json".len();
    let rest = &raw[start..];
    let end = rest.find("```")?;
    Some(&rest[..end])
}

/// Keep only the first `limit` outline entries.
pub fn limit_outline(outline: &[OutlineItem], limit: usize) -> Vec<OutlineItem> {
    outline.iter().take(limit).cloned().collect()
}

/// Append the closing slides every generated deck is expected to have.
pub fn finalize_content_map(content_map: &mut ContentMap, outline: &[OutlineItem]) {
    ensure_conclusion(content_map);
    ensure_comparison(content_map, outline);
}

fn ensure_conclusion(content_map: &mut ContentMap) {
    if content_map.has_layout("conclusion") {
        return;
    }
    info!("Appending conclusion slide");
    content_map.slides.push(Slide::Conclusion(SlideFields {
        title: Some("Conclusion".to_string()),
        conclusion: Some(
            "This presentation gave an overview of the topics discussed.".to_string(),
        ),
        ..SlideFields::default()
    }));
}

fn ensure_comparison(content_map: &mut ContentMap, outline: &[OutlineItem]) {
    let needs_comparison = outline.iter().any(|item| {
        let title = item.title.to_lowercase();
        COMPARISON_MARKERS.iter().any(|marker| title.contains(marker))
    });
    if !needs_comparison || content_map.has_layout("comparison") {
        return;
    }

    info!("Appending comparison slide");
    let side = |name: &str| ComparisonSide {
        title: Some(format!("Option {}", name)),
        description: Some(format!("Strengths and weaknesses of option {}.", name)),
    };
    content_map.slides.push(Slide::Comparison {
        fields: SlideFields {
            title: Some("Comparison".to_string()),
            ..SlideFields::default()
        },
        comparison: Some(Body::Parsed(Comparison {
            left: Some(side("A")),
            right: Some(side("B")),
        })),
    });
}
