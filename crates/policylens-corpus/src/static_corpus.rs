//! Built-in policy corpus compiled into the binary

use async_trait::async_trait;

use crate::markdown::{MarkdownParser, dedupe_ids};
use policylens_core::{CorpusLoader, Error, PolicyCorpus, Result};

const POLICY_ADDRESS: &str = include_str!("../corpus/policy-address.md");

pub const STATIC_SOURCE: &str = "static";

/// Loads the policy address passages bundled with the crate
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCorpusLoader;

impl StaticCorpusLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CorpusLoader for StaticCorpusLoader {
    async fn load(&self) -> Result<PolicyCorpus> {
        let mut passages = MarkdownParser::new()?.parse(POLICY_ADDRESS);
        if passages.is_empty() {
            return Err(Error::Corpus("built-in corpus is empty".to_string()));
        }
        dedupe_ids(&mut passages);
        Ok(PolicyCorpus::new(passages, STATIC_SOURCE))
    }

    fn source(&self) -> String {
        STATIC_SOURCE.to_string()
    }
}
