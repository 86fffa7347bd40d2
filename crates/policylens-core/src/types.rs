//! Analysis and summary types shared across the PolicyLens system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{DemographicTag, Error, ImpactLevel, PolicyCategory, PolicyPassage};

/// Relevance of one passage to one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceScore {
    pub passage_id: String,
    /// Always within `0.0..=100.0`
    pub score: f64,
    pub reasons: Vec<String>,
    pub matched_demographics: Vec<DemographicTag>,
    pub impact_assessment: String,
}

/// A passage that passed the relevance filter, paired with its score
#[derive(Debug, Clone)]
pub struct RelevantSection {
    pub passage: Arc<PolicyPassage>,
    pub relevance: RelevanceScore,
}

impl RelevantSection {
    pub fn score(&self) -> f64 {
        self.relevance.score
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: PolicyCategory,
    pub total_score: f64,
}

/// Response language requested for generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-hk")]
    ZhHk,
    #[serde(rename = "zh-cn")]
    ZhCn,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::ZhHk => "zh-hk",
            Self::ZhCn => "zh-cn",
        }
    }

    pub fn response_instruction(&self) -> &'static str {
        match self {
            Self::En => "Respond in English.",
            Self::ZhHk => "Respond in Traditional Chinese as written in Hong Kong.",
            Self::ZhCn => "Respond in Simplified Chinese.",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "en" => Ok(Self::En),
            "zh-hk" => Ok(Self::ZhHk),
            "zh-cn" => Ok(Self::ZhCn),
            other => Err(Error::InvalidInput(format!("unsupported language: {}", other))),
        }
    }
}

/// Per-request synthesis options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesisOptions {
    pub include_detailed_analysis: bool,
    pub max_recommendations: usize,
    pub language: Language,
    pub focus_categories: Option<Vec<PolicyCategory>>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            include_detailed_analysis: true,
            max_recommendations: 5,
            language: Language::En,
            focus_categories: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Priority bucket for the recommendation at `rank` (0-based)
    pub fn from_rank(rank: usize) -> Self {
        if rank < 2 {
            Self::High
        } else if rank < 4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevantArea {
    pub category: PolicyCategory,
    pub title: String,
    pub relevance_score: u8,
    pub summary: String,
    pub details: String,
    pub action_items: Vec<String>,
    pub impact: ImpactLevel,
    pub key_benefits: Vec<String>,
}

/// Large-scale initiative, projected as a city-plan entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorUpdate {
    pub id: String,
    pub title: String,
    pub category: PolicyCategory,
    pub description: String,
    pub timeline: String,
    pub impact: ImpactLevel,
    pub relevance_to_user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: PolicyCategory,
    pub action_steps: Vec<String>,
    pub expected_benefit: String,
    pub timeframe: String,
}

/// Final personalized output of a synthesis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedSummary {
    /// Always within `70..=100`
    pub overall_score: u8,
    pub relevant_areas: Vec<RelevantArea>,
    pub major_updates: Vec<MajorUpdate>,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
    pub provider: String,
    pub processing_time_ms: u64,
}

/// Counters for text-enhancement calls made during one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementStats {
    pub attempted: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Diagnostics returned alongside a summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisMetadata {
    pub processing_steps: Vec<String>,
    pub corpus_source: String,
    pub passages_scored: usize,
    pub relevant_sections: usize,
    pub top_categories: Vec<CategoryScore>,
    pub enhancements: EnhancementStats,
    pub provider: String,
    pub processing_time_ms: u64,
}
