//! Relevance scoring and summary synthesis for PolicyLens
//!
//! The pipeline is deterministic up to the optional text-enhancement step:
//! classify the profile, score every passage, rank and aggregate, derive
//! recommended actions, then assemble a personalized summary.

pub mod aggregator;
pub mod classifier;
pub mod prompts;
pub mod recommender;
pub mod scorer;
pub mod synthesizer;

#[cfg(test)]
mod tests;

pub use aggregator::{aggregate, AnalysisResult, OVERALL_SCORE_FLOOR, RELEVANCE_THRESHOLD};
pub use classifier::classify;
pub use recommender::{recommend, ActionSource, GenericAction, RecommendedAction};
pub use scorer::{score, score_with_tags};
pub use synthesizer::{analyze, SummarySynthesizer, SynthesizerConfig};

// Re-export core types
pub use policylens_core::{Error, Result, SynthesisError};
