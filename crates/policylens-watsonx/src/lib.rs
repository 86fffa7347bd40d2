//! WatsonX AI integration for PolicyLens
//!
//! This crate provides the WatsonX implementation of the TextGenerator trait.

mod client;
mod config;


pub use client::WatsonxClient;
pub use config::WatsonxConfig;

// Re-export core types for convenience
pub use policylens_core::{Error, GenerationConfig, Result, TextGenerator};
