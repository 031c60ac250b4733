use crate::error::{HelperError, Result};

/// Canonical identity of one analysis request. Two keys address the same
/// cache entry iff all three fields are equal; an absent dictionary or
/// strategy is distinct from an empty string and participates in equality as
/// `None`. No normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub filename: String,
    pub dictionary: Option<String>,
    pub strategy: Option<String>,
}

impl RequestKey {
    /// A missing filename is a precondition violation, not a cache miss:
    /// callers must have a stored filename before a key can exist.
    pub fn compose(
        filename: impl Into<String>,
        dictionary: Option<String>,
        strategy: Option<String>,
    ) -> Result<Self> {
        let filename = filename.into();
        if filename.is_empty() {
            return Err(HelperError::MissingFilename);
        }
        Ok(Self {
            filename,
            dictionary,
            strategy,
        })
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}?dictionary={}&strategy={}",
            self.filename,
            self.dictionary.as_deref().unwrap_or("-"),
            self.strategy.as_deref().unwrap_or("-")
        )
    }
}
