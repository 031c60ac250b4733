use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::cache::CacheOutcome;
use crate::error::{HelperError, Result, SelectionKind};
use crate::key::RequestKey;

type SharedFetch<V> = Shared<BoxFuture<'static, CacheOutcome<V>>>;

/// Key-less read-through cache for a server-advertised option catalog
/// (dictionaries or strategies): a single entry with the same
/// at-most-once-in-flight guarantee as the analysis cache, refreshed only on
/// demand.
pub struct CatalogCache<V> {
    slot: Mutex<Option<SharedFetch<V>>>,
}

impl<V> CatalogCache<V>
where
    V: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub async fn get<F, Fut>(&self, loader: F) -> CacheOutcome<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let fetch = {
            let mut slot = self.slot.lock().unwrap();
            match slot.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let fut = loader();
                    let shared = async move { fut.await.map(Arc::new) }.boxed().shared();
                    *slot = Some(shared.clone());
                    shared
                }
            }
        };
        fetch.await
    }

    /// Drop the cached catalog; the next `get` fetches again.
    pub fn refresh(&self) {
        self.slot.lock().unwrap().take();
    }
}

impl<V> Default for CatalogCache<V>
where
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Submission gate: both selections must be non-empty and currently offered.
/// An empty selection is reported as a validation failure on the same footing
/// as an unknown one, so callers can disable submission up front.
pub fn validate_selection(
    dictionary: &str,
    strategy: &str,
    dictionaries: &[String],
    strategies: &[String],
) -> Result<()> {
    if dictionary.is_empty() || !dictionaries.iter().any(|d| d == dictionary) {
        return Err(HelperError::Validation {
            kind: SelectionKind::Dictionary,
            value: dictionary.to_string(),
        });
    }
    if strategy.is_empty() || !strategies.iter().any(|s| s == strategy) {
        return Err(HelperError::Validation {
            kind: SelectionKind::Strategy,
            value: strategy.to_string(),
        });
    }
    Ok(())
}

/// Results-view gate: a cached result fetched under this key may only be
/// rendered if the key's selections are still offered. Absent selections are
/// not validated (the server applied its defaults).
pub fn validate_key(key: &RequestKey, dictionaries: &[String], strategies: &[String]) -> Result<()> {
    if let Some(dictionary) = &key.dictionary {
        if !dictionaries.iter().any(|d| d == dictionary) {
            return Err(HelperError::Validation {
                kind: SelectionKind::Dictionary,
                value: dictionary.clone(),
            });
        }
    }
    if let Some(strategy) = &key.strategy {
        if !strategies.iter().any(|s| s == strategy) {
            return Err(HelperError::Validation {
                kind: SelectionKind::Strategy,
                value: strategy.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogs() -> (Vec<String>, Vec<String>) {
        (
            vec!["YAWL".to_string(), "TWL".to_string()],
            vec!["bold97".to_string()],
        )
    }

    #[test]
    fn known_selection_passes() {
        let (dicts, strats) = catalogs();
        assert!(validate_selection("YAWL", "bold97", &dicts, &strats).is_ok());
    }

    #[test]
    fn unknown_dictionary_is_a_validation_failure() {
        let (dicts, strats) = catalogs();
        let err = validate_selection("FOO", "bold97", &dicts, &strats).unwrap_err();
        assert!(matches!(
            err,
            HelperError::Validation {
                kind: SelectionKind::Dictionary,
                ..
            }
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn empty_strategy_is_rejected_up_front() {
        let (dicts, strats) = catalogs();
        assert!(validate_selection("YAWL", "", &dicts, &strats).is_err());
    }

    #[test]
    fn key_without_selections_needs_no_validation() {
        let (dicts, strats) = catalogs();
        let key = RequestKey::compose("shot1.png", None, None).unwrap();
        assert!(validate_key(&key, &dicts, &strats).is_ok());
    }

    #[test]
    fn key_with_stale_dictionary_is_rejected() {
        let (dicts, strats) = catalogs();
        let key = RequestKey::compose("shot1.png", Some("FOO".into()), None).unwrap();
        assert!(validate_key(&key, &dicts, &strats).is_err());
    }
}
