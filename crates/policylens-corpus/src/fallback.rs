//! Loader that substitutes a second corpus when the first fails

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use policylens_core::{CorpusLoader, PolicyCorpus, Result};

/// Tries `primary` and falls back to `fallback` on any error.
///
/// The returned corpus keeps the source of whichever loader produced it.
pub struct FallbackCorpusLoader {
    primary: Arc<dyn CorpusLoader>,
    fallback: Arc<dyn CorpusLoader>,
}

impl FallbackCorpusLoader {
    pub fn new(primary: Arc<dyn CorpusLoader>, fallback: Arc<dyn CorpusLoader>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl CorpusLoader for FallbackCorpusLoader {
    async fn load(&self) -> Result<PolicyCorpus> {
        match self.primary.load().await {
            Ok(corpus) => Ok(corpus),
            Err(e) => {
                warn!(
                    "Failed to load corpus from {}: {}. Using {}",
                    self.primary.source(),
                    e,
                    self.fallback.source()
                );
                self.fallback.load().await
            }
        }
    }

    fn source(&self) -> String {
        format!("{} (fallback: {})", self.primary.source(), self.fallback.source())
    }
}
