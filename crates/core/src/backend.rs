use std::future::Future;

use crate::error::Result;
use crate::key::RequestKey;
use crate::model::AnalysisResult;

/// The backend contract consumed by the flow and the caches. The HTTP
/// implementation lives in `wordatro_client`; tests use in-memory fakes.
///
/// Returned futures are `Send + 'static`-compatible once the implementor is
/// cloned into them, which is what the cache loaders do.
pub trait AnalysisBackend: Send + Sync {
    /// Upload raw image bytes; returns the filename the server stored the
    /// image under (which may differ from `original_name`).
    fn upload(
        &self,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<String>> + Send;

    fn analyze(&self, key: &RequestKey) -> impl Future<Output = Result<AnalysisResult>> + Send;

    fn dictionaries(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn strategies(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
}
