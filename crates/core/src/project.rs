//! Pure projections from a cached [`AnalysisResult`] into display-ready
//! shapes. No I/O, no state: every view recomputes these from the cached
//! payload on render.

use crate::model::{AnalysisResult, Category, Match, Region};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGroup {
    pub length: u32,
    pub words: Vec<String>,
}

/// Group candidate words by length, longest first. Lengths with no words are
/// dropped entirely rather than rendered as empty groups.
pub fn word_groups(result: &AnalysisResult) -> Vec<WordGroup> {
    result
        .words
        .iter()
        .rev()
        .filter(|(_, words)| !words.is_empty())
        .map(|(length, words)| WordGroup {
            length: *length,
            words: words.clone(),
        })
        .collect()
}

/// The authoritative letter of every region in a category, in region order.
/// An unmatched region contributes `None`, not an error.
pub fn category_letters(result: &AnalysisResult, category: Category) -> Vec<Option<String>> {
    result
        .debug_info
        .categories
        .get(category)
        .iter()
        .map(|region| region.best_letter().map(str::to_string))
        .collect()
}

/// Space-joined display form of [`category_letters`]; unmatched regions show
/// as empty slots, preserving position.
pub fn category_letter_line(result: &AnalysisResult, category: Category) -> String {
    category_letters(result, category)
        .into_iter()
        .map(|letter| letter.unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    /// 1-based sequential display id, independent of the region's own id.
    pub display_id: usize,
    pub region_id: String,
    pub location: String,
    pub size: String,
    pub preview: String,
    pub matches: Vec<Match>,
}

pub fn region_rows(result: &AnalysisResult, category: Category) -> Vec<RegionRow> {
    result
        .debug_info
        .categories
        .get(category)
        .iter()
        .enumerate()
        .map(|(index, region)| RegionRow {
            display_id: index + 1,
            region_id: region.id.clone(),
            location: format!("x={}, y={}", region.bbox.x, region.bbox.y),
            size: format!("{} x {}", region.bbox.width, region.bbox.height),
            preview: region.preview.clone(),
            matches: region.matches.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRow {
    pub rank: usize,
    pub template: String,
    pub letter: String,
    pub similarity: String,
}

pub fn match_rows(region: &Region) -> Vec<MatchRow> {
    region
        .matches
        .iter()
        .enumerate()
        .map(|(index, m)| MatchRow {
            rank: index + 1,
            template: m.template.clone(),
            letter: m.letter.clone(),
            similarity: format_percent(m.score),
        })
        .collect()
}

/// Score as a percentage with two fractional digits, round-half-up:
/// `0.8734` renders as `"87.34%"`.
pub fn format_percent(score: f64) -> String {
    format!("{:.2}%", (score * 10_000.0).round() / 100.0)
}
