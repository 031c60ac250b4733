use crate::backend::AnalysisBackend;
use crate::cache::{CacheOutcome, RequestCache};
use crate::catalog::CatalogCache;
use crate::key::RequestKey;
use crate::model::AnalysisResult;
use crate::prefs::PreferenceStore;
use crate::session::SessionState;

/// Process-wide shared client state: the analysis cache, the two option
/// catalogs, the durable preference record and the transient session
/// selector. Every view reads through this so results fetched by one view
/// are visible to all others; entries live until invalidated or the process
/// exits.
pub struct ClientState {
    pub analyses: RequestCache<RequestKey, AnalysisResult>,
    pub dictionaries: CatalogCache<Vec<String>>,
    pub strategies: CatalogCache<Vec<String>>,
    pub prefs: PreferenceStore,
    pub session: SessionState,
}

impl ClientState {
    pub fn new(prefs: PreferenceStore) -> Self {
        Self {
            analyses: RequestCache::new(),
            dictionaries: CatalogCache::new(),
            strategies: CatalogCache::new(),
            prefs,
            session: SessionState::new(),
        }
    }

    /// Read-through analysis fetch: joins an in-flight request for the same
    /// key or starts the single fetch for it.
    pub async fn analysis<B>(&self, backend: &B, key: RequestKey) -> CacheOutcome<AnalysisResult>
    where
        B: AnalysisBackend + Clone + 'static,
    {
        let backend = backend.clone();
        self.analyses
            .get(key, move |key| async move { backend.analyze(&key).await })
            .await
    }

    pub async fn dictionary_catalog<B>(&self, backend: &B) -> CacheOutcome<Vec<String>>
    where
        B: AnalysisBackend + Clone + 'static,
    {
        let backend = backend.clone();
        self.dictionaries
            .get(move || async move { backend.dictionaries().await })
            .await
    }

    pub async fn strategy_catalog<B>(&self, backend: &B) -> CacheOutcome<Vec<String>>
    where
        B: AnalysisBackend + Clone + 'static,
    {
        let backend = backend.clone();
        self.strategies
            .get(move || async move { backend.strategies().await })
            .await
    }
}
