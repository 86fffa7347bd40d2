//! Corpus loader trait and the load-once corpus provider

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{PolicyCorpus, Result};

/// Trait for policy corpus loaders
///
/// A loader produces a complete corpus or fails; substituting a fallback
/// corpus is the job of a wrapping loader, not of the caller.
#[async_trait]
pub trait CorpusLoader: Send + Sync {
    /// Load and parse the full corpus
    async fn load(&self) -> Result<PolicyCorpus>;

    /// Human-readable description of where passages come from
    fn source(&self) -> String;
}

/// Shared, lazily loaded corpus.
///
/// The first successful load is cached and handed out to every later
/// caller. Failed loads are not cached, so the next call retries.
pub struct CorpusProvider {
    loader: Arc<dyn CorpusLoader>,
    cached: RwLock<Option<Arc<PolicyCorpus>>>,
}

impl CorpusProvider {
    pub fn new(loader: Arc<dyn CorpusLoader>) -> Self {
        Self {
            loader,
            cached: RwLock::new(None),
        }
    }

    /// Get the corpus, loading it on first use
    pub async fn corpus(&self) -> Result<Arc<PolicyCorpus>> {
        if let Some(corpus) = self.cached.read().await.as_ref() {
            return Ok(Arc::clone(corpus));
        }

        let mut slot = self.cached.write().await;
        // Another caller may have loaded while we waited for the lock
        if let Some(corpus) = slot.as_ref() {
            return Ok(Arc::clone(corpus));
        }

        debug!("Loading policy corpus from {}", self.loader.source());
        let corpus = Arc::new(self.loader.load().await?);
        info!(
            "Loaded {} policy passages from {}",
            corpus.len(),
            corpus.source()
        );
        *slot = Some(Arc::clone(&corpus));
        Ok(corpus)
    }

    pub async fn is_loaded(&self) -> bool {
        self.cached.read().await.is_some()
    }

    /// Drop the cached corpus so the next call reloads it
    pub async fn reset(&self) {
        self.cached.write().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ImpactLevel, PolicyCategory, PolicyPassage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader {
        calls: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl CorpusLoader for CountingLoader {
        async fn load(&self) -> Result<PolicyCorpus> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                return Err(Error::Corpus("disk unavailable".to_string()));
            }
            Ok(PolicyCorpus::new(
                vec![PolicyPassage {
                    id: "p1".to_string(),
                    category: PolicyCategory::Housing,
                    title: "Test".to_string(),
                    content: "Content".to_string(),
                    summary: "Summary".to_string(),
                    target_demographics: vec![],
                    impact: ImpactLevel::Low,
                    timeline: "2025".to_string(),
                    budget: None,
                    key_benefits: vec![],
                    eligibility_criteria: None,
                }],
                "test",
            ))
        }

        fn source(&self) -> String {
            "counting".to_string()
        }
    }

    #[tokio::test]
    async fn test_corpus_is_loaded_once() {
        let loader = Arc::new(CountingLoader {
            calls: AtomicUsize::new(0),
            fail_first: false,
        });
        let provider = CorpusProvider::new(loader.clone());

        assert!(!provider.is_loaded().await);
        let first = provider.corpus().await.unwrap();
        let second = provider.corpus().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert!(provider.is_loaded().await);
    }

    #[tokio::test]
    async fn test_reset_forces_reload() {
        let loader = Arc::new(CountingLoader {
            calls: AtomicUsize::new(0),
            fail_first: false,
        });
        let provider = CorpusProvider::new(loader.clone());

        provider.corpus().await.unwrap();
        provider.reset().await;
        assert!(!provider.is_loaded().await);
        provider.corpus().await.unwrap();

        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let loader = Arc::new(CountingLoader {
            calls: AtomicUsize::new(0),
            fail_first: true,
        });
        let provider = CorpusProvider::new(loader.clone());

        assert!(provider.corpus().await.is_err());
        assert!(!provider.is_loaded().await);
        assert_eq!(provider.corpus().await.unwrap().len(), 1);
    }
}
