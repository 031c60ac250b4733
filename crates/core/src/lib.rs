mod backend;
mod cache;
mod catalog;
mod error;
mod flow;
mod key;
mod model;
mod prefs;
mod project;
mod session;
mod state;

pub use backend::AnalysisBackend;
pub use cache::{CacheEvent, CacheOutcome, RequestCache};
pub use catalog::{validate_key, validate_selection, CatalogCache};
pub use error::{HelperError, Result, SelectionKind};
pub use flow::{Route, UploadFlow, UploadStage};
pub use key::RequestKey;
pub use model::{
    AnalysisResult, BoundingBox, Category, CategorySet, DebugInfo, FontStyle, Match, Region,
};
pub use prefs::{PreferenceStore, Preferences};
pub use project::{
    category_letter_line, category_letters, format_percent, match_rows, region_rows, word_groups,
    MatchRow, RegionRow, WordGroup,
};
pub use session::SessionState;
pub use state::ClientState;
