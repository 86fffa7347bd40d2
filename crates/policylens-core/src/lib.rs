//! Core traits and types for PolicyLens
//!
//! This crate defines the fundamental types used across the PolicyLens system:
//! demographic profiles, policy passages, scoring and summary output, and the
//! capability-facing interfaces for text-generation providers and corpus
//! loaders, keeping the engine test-friendly and free of hidden state.

pub mod corpus;
pub mod error;
pub mod llm;
pub mod policy;
pub mod profile;
pub mod types;


pub use corpus::{CorpusLoader, CorpusProvider};
pub use error::{Error, Result, SynthesisError};
pub use llm::{GenerationConfig, OfflineGenerator, TextGenerator};
pub use policy::{ImpactLevel, PolicyCategory, PolicyCorpus, PolicyPassage};
pub use profile::{
    DemographicTag, EducationLevel, EmploymentStatus, Gender, HousingType, IncomeBand,
    MaritalStatus, Profile, TransportMode,
};
pub use types::*;
