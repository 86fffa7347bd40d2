//! Policy corpus loaders for PolicyLens
//!
//! Passages come from markdown documents on disk, from the policy address
//! bundled into the binary, or from a primary loader backed by a fallback.

mod fallback;
mod markdown;
mod static_corpus;


pub use fallback::FallbackCorpusLoader;
pub use markdown::{MarkdownCorpusLoader, MarkdownParser};
pub use static_corpus::{STATIC_SOURCE, StaticCorpusLoader};

pub use policylens_core::{CorpusLoader, CorpusProvider, Error, PolicyCorpus, Result};
