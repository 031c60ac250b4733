use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One analysis response from the backend, decoded as received. The value is
/// immutable after decode: a re-fetch replaces it wholesale, nothing merges
/// into it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub original_image: String,
    pub debug_info: DebugInfo,
    /// Sparse map of word length to candidate words. The backend emits an
    /// object with stringified integer keys; `BTreeMap` pins the iteration
    /// order so downstream grouping is deterministic.
    #[serde(default)]
    pub words: BTreeMap<u32, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebugInfo {
    pub original_image: String,
    pub debug_image: String,
    pub categories: CategorySet,
    pub max_length: u32,
}

/// The three fixed detection classes. Every region belongs to exactly one of
/// them within a single result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Regular,
    Improved,
    Special,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Regular, Category::Improved, Category::Special];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Regular => "Regular",
            Category::Improved => "Improved",
            Category::Special => "Special",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategorySet {
    #[serde(rename = "Regular", default)]
    pub regular: Vec<Region>,
    #[serde(rename = "Improved", default)]
    pub improved: Vec<Region>,
    #[serde(rename = "Special", default)]
    pub special: Vec<Region>,
}

impl CategorySet {
    pub fn get(&self, category: Category) -> &[Region] {
        match category {
            Category::Regular => &self.regular,
            Category::Improved => &self.improved,
            Category::Special => &self.special,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Region {
    /// Server-assigned id, unique within one result (e.g. "R-1").
    pub id: String,
    pub bbox: BoundingBox,
    /// Filename of the region preview image, served from the upload path.
    pub preview: String,
    /// Ranked best-first; `matches[0]` is the authoritative letter. Empty for
    /// an unmatched region.
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl Region {
    pub fn best_letter(&self) -> Option<&str> {
        self.matches.first().map(|m| m.letter.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub template: String,
    /// Intersection-over-union similarity in [0, 1].
    pub score: f64,
    pub letter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontStyle>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Bold,
    Italic,
    Underline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_backend_response() {
        let raw = r#"{
            "original_image": "shot1.png",
            "debug_info": {
                "original_image": "shot1.png",
                "debug_image": "debug_shot1.png",
                "categories": {
                    "Regular": [
                        {
                            "id": "R-1",
                            "bbox": {"x": 10, "y": 20, "width": 32, "height": 40},
                            "preview": "shot1_R1.png",
                            "matches": [
                                {"template": "regular_A.png", "score": 0.8734, "letter": "A", "font": "bold"},
                                {"template": "regular_B.png", "score": 0.41, "letter": "B"}
                            ]
                        }
                    ],
                    "Improved": [],
                    "Special": []
                },
                "max_length": 9
            },
            "words": {"3": ["cat", "dog"], "5": []}
        }"#;
        let result: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.original_image, "shot1.png");
        assert_eq!(result.debug_info.debug_image, "debug_shot1.png");
        assert_eq!(result.debug_info.max_length, 9);

        let regular = result.debug_info.categories.get(Category::Regular);
        assert_eq!(regular.len(), 1);
        assert_eq!(regular[0].best_letter(), Some("A"));
        assert_eq!(regular[0].matches[0].font, Some(FontStyle::Bold));
        assert_eq!(regular[0].matches[1].font, None);
        assert_eq!(regular[0].bbox.width, 32);

        assert_eq!(result.words[&3], vec!["cat", "dog"]);
        assert!(result.words[&5].is_empty());
    }

    #[test]
    fn unmatched_region_has_no_letter() {
        let raw = r#"{"id": "S-2", "bbox": {"x": 0, "y": 0, "width": 8, "height": 8}, "preview": "p.png"}"#;
        let region: Region = serde_json::from_str(raw).unwrap();
        assert!(region.matches.is_empty());
        assert_eq!(region.best_letter(), None);
    }

    #[test]
    fn category_order_is_fixed() {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, ["Regular", "Improved", "Special"]);
    }
}
