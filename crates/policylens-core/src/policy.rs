//! Policy passages and the corpus they belong to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::Error;

/// Policy area a passage belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyCategory {
    Housing,
    Transportation,
    Healthcare,
    Education,
    Employment,
    SocialWelfare,
    Environment,
    Economy,
    Technology,
}

impl PolicyCategory {
    pub const ALL: [PolicyCategory; 9] = [
        Self::Housing,
        Self::Transportation,
        Self::Healthcare,
        Self::Education,
        Self::Employment,
        Self::SocialWelfare,
        Self::Environment,
        Self::Economy,
        Self::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Transportation => "transportation",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Employment => "employment",
            Self::SocialWelfare => "social-welfare",
            Self::Environment => "environment",
            Self::Economy => "economy",
            Self::Technology => "technology",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Transportation => "Transportation",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Employment => "Employment",
            Self::SocialWelfare => "Social Welfare",
            Self::Environment => "Environment",
            Self::Economy => "Economy",
            Self::Technology => "Technology",
        }
    }
}

impl fmt::Display for PolicyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyCategory {
    type Err = Error;

    /// Accepts the kebab-case id or the label, case-insensitively
    /// (`social-welfare`, `Social Welfare`, `social_welfare`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("unknown policy category: {}", s)))
    }
}

/// Scale of a policy's effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpactLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(Error::InvalidInput(format!("unknown impact level: {}", other))),
        }
    }
}

/// One scoreable unit of policy text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPassage {
    pub id: String,
    pub category: PolicyCategory,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub target_demographics: Vec<String>,
    pub impact: ImpactLevel,
    pub timeline: String,
    pub budget: Option<f64>,
    pub key_benefits: Vec<String>,
    pub eligibility_criteria: Option<Vec<String>>,
}

/// Immutable set of passages produced by a corpus loader
#[derive(Debug, Clone, Default)]
pub struct PolicyCorpus {
    passages: Vec<Arc<PolicyPassage>>,
    source: String,
}

impl PolicyCorpus {
    pub fn new(passages: Vec<PolicyPassage>, source: impl Into<String>) -> Self {
        Self {
            passages: passages.into_iter().map(Arc::new).collect(),
            source: source.into(),
        }
    }

    pub fn passages(&self) -> &[Arc<PolicyPassage>] {
        &self.passages
    }

    pub fn get(&self, id: &str) -> Option<&Arc<PolicyPassage>> {
        self.passages.iter().find(|p| p.id == id)
    }

    /// Where the corpus came from (a path, or `static`)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}
