use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::AnalysisBackend;
use crate::catalog::validate_selection;
use crate::error::{HelperError, Result};
use crate::key::RequestKey;
use crate::prefs::Preferences;
use crate::state::ClientState;

/// Stages of the upload/trigger flow. `Uploading -> Uploaded` requires the
/// upload call to succeed; a failed upload drops back to `FileSelected` with
/// the selection intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStage {
    Idle,
    FileSelected { name: String },
    Uploading,
    Uploaded { filename: String },
}

/// Where the flow lands after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Analyze {
        filename: String,
        dictionary: Option<String>,
        strategy: Option<String>,
    },
}

/// Orchestrates file upload, cache seeding and navigation: the home-view
/// submit path. Preference changes are independent of the upload stages and
/// persist immediately.
pub struct UploadFlow<B> {
    backend: B,
    state: Arc<ClientState>,
    stage: UploadStage,
    file: Option<(String, Vec<u8>)>,
}

impl<B> UploadFlow<B>
where
    B: AnalysisBackend + Clone + 'static,
{
    pub fn new(backend: B, state: Arc<ClientState>) -> Self {
        Self {
            backend,
            state,
            stage: UploadStage::Idle,
            file: None,
        }
    }

    pub fn stage(&self) -> &UploadStage {
        &self.stage
    }

    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        let name = name.into();
        self.stage = UploadStage::FileSelected { name: name.clone() };
        self.file = Some((name, bytes));
    }

    /// Explicit user selection of dictionary/strategy; persisted right away,
    /// independent of the upload stages.
    pub fn set_preferences(&self, prefs: Preferences) -> Result<()> {
        self.state.prefs.update(prefs)
    }

    /// The submission gate: a file must be selected and both selections must
    /// be non-empty members of the given catalogs. Violations disable
    /// submission up front rather than rejecting it after the fact.
    pub fn can_submit(&self, dictionaries: &[String], strategies: &[String]) -> Result<()> {
        if self.file.is_none() {
            return Err(HelperError::MissingFilename);
        }
        let prefs = self.state.prefs.current();
        validate_selection(&prefs.dictionary, &prefs.strategy, dictionaries, strategies)
    }

    /// Upload the selected file, seed the analysis cache under the composed
    /// key so the destination view joins the already-started fetch, persist
    /// the preferences and hand back the destination route.
    pub async fn submit(&mut self) -> Result<Route> {
        let dictionaries = self.state.dictionary_catalog(&self.backend).await?;
        let strategies = self.state.strategy_catalog(&self.backend).await?;
        self.can_submit(&dictionaries, &strategies)?;

        let (name, bytes) = self.file.clone().ok_or(HelperError::MissingFilename)?;
        self.stage = UploadStage::Uploading;
        let filename = match self.backend.upload(&name, bytes).await {
            Ok(filename) => filename,
            Err(err) => {
                warn!("upload of {name} failed: {err}");
                self.stage = UploadStage::FileSelected { name };
                return Err(err);
            }
        };
        self.stage = UploadStage::Uploaded {
            filename: filename.clone(),
        };
        debug!("uploaded {name} as {filename}");

        let prefs = self.state.prefs.current();
        let key = RequestKey::compose(
            filename.clone(),
            Some(prefs.dictionary.clone()),
            Some(prefs.strategy.clone()),
        )?;
        // Seed the cache. A failed analysis is cached too and surfaces in the
        // destination view, so the outcome is not an upload failure.
        if let Err(err) = self.state.analysis(&self.backend, key.clone()).await {
            debug!("seed fetch for {key} failed: {err}");
        }

        self.state.prefs.update(prefs.clone())?;
        self.state.session.set_filename(&filename);
        Ok(Route::Analyze {
            filename,
            dictionary: Some(prefs.dictionary),
            strategy: Some(prefs.strategy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisResult, CategorySet, DebugInfo};
    use crate::prefs::PreferenceStore;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            original_image: "shot1.png".to_string(),
            debug_info: DebugInfo {
                original_image: "shot1.png".to_string(),
                debug_image: "debug_shot1.png".to_string(),
                categories: CategorySet::default(),
                max_length: 9,
            },
            words: BTreeMap::new(),
        }
    }

    #[derive(Clone, Default)]
    struct FakeBackend {
        uploads: Arc<AtomicUsize>,
        analyzes: Arc<AtomicUsize>,
        fail_upload: bool,
        seen_keys: Arc<std::sync::Mutex<Vec<RequestKey>>>,
    }

    impl AnalysisBackend for FakeBackend {
        async fn upload(&self, original_name: &str, _bytes: Vec<u8>) -> Result<String> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            if self.fail_upload {
                return Err(HelperError::transport("upload refused"));
            }
            Ok(original_name.to_string())
        }

        async fn analyze(&self, key: &RequestKey) -> Result<AnalysisResult> {
            self.analyzes.fetch_add(1, Ordering::SeqCst);
            self.seen_keys.lock().unwrap().push(key.clone());
            Ok(sample_result())
        }

        async fn dictionaries(&self) -> Result<Vec<String>> {
            Ok(vec!["YAWL".to_string()])
        }

        async fn strategies(&self) -> Result<Vec<String>> {
            Ok(vec!["bold97".to_string()])
        }
    }

    fn state_with_defaults() -> (Arc<ClientState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferenceStore::open(dir.path().join("prefs.json")).unwrap();
        (Arc::new(ClientState::new(prefs)), dir)
    }

    #[tokio::test]
    async fn submit_uploads_seeds_and_navigates() {
        let backend = FakeBackend::default();
        let (state, _dir) = state_with_defaults();
        let mut flow = UploadFlow::new(backend.clone(), state.clone());

        flow.select_file("shot1.png", vec![1, 2, 3]);
        let route = flow.submit().await.unwrap();

        assert_eq!(
            route,
            Route::Analyze {
                filename: "shot1.png".to_string(),
                dictionary: Some("YAWL".to_string()),
                strategy: Some("bold97".to_string()),
            }
        );
        assert_eq!(
            *flow.stage(),
            UploadStage::Uploaded {
                filename: "shot1.png".to_string()
            }
        );
        assert_eq!(state.session.filename().as_deref(), Some("shot1.png"));

        let expected_key = RequestKey::compose(
            "shot1.png",
            Some("YAWL".to_string()),
            Some("bold97".to_string()),
        )
        .unwrap();
        assert_eq!(backend.seen_keys.lock().unwrap().as_slice(), &[expected_key.clone()]);

        // Destination view joins the seeded entry; no second analyze call.
        let outcome = state.analysis(&backend, expected_key).await.unwrap();
        assert_eq!(outcome.original_image, "shot1.png");
        assert_eq!(backend.analyzes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn submission_is_gated_on_file_selection() {
        let backend = FakeBackend::default();
        let (state, _dir) = state_with_defaults();
        let mut flow = UploadFlow::new(backend.clone(), state);

        let err = flow.submit().await.unwrap_err();
        assert_eq!(err, HelperError::MissingFilename);
        assert_eq!(backend.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submission_is_gated_on_catalog_membership() {
        let backend = FakeBackend::default();
        let (state, _dir) = state_with_defaults();
        state
            .prefs
            .update(Preferences {
                dictionary: "FOO".to_string(),
                strategy: "bold97".to_string(),
            })
            .unwrap();
        let mut flow = UploadFlow::new(backend.clone(), state);
        flow.select_file("shot1.png", vec![0]);

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, HelperError::Validation { .. }));
        assert!(!err.is_retryable());
        assert_eq!(backend.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_upload_returns_to_file_selected() {
        let backend = FakeBackend {
            fail_upload: true,
            ..FakeBackend::default()
        };
        let (state, _dir) = state_with_defaults();
        let mut flow = UploadFlow::new(backend.clone(), state);
        flow.select_file("shot1.png", vec![0]);

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, HelperError::Transport(_)));
        assert!(err.is_retryable());
        assert_eq!(
            *flow.stage(),
            UploadStage::FileSelected {
                name: "shot1.png".to_string()
            }
        );
        assert_eq!(backend.analyzes.load(Ordering::SeqCst), 0);
    }
}
