//! Relevance scoring of one profile against one policy passage
//!
//! A score is the sum of four capped components:
//!
//! | component            | range  |
//! |----------------------|--------|
//! | demographic overlap  | 0–40   |
//! | category affinity    | 0–30   |
//! | impact bonus         | 8–20   |
//! | eligibility bonus    | 0–10   |
//!
//! The total is clamped to `0..=100`.

use std::collections::BTreeSet;

use tracing::debug;

use policylens_core::{
    DemographicTag, EmploymentStatus, ImpactLevel, PolicyCategory, PolicyPassage, Profile,
    RelevanceScore,
};

use crate::classifier::classify;

pub const DEMOGRAPHIC_WEIGHT: f64 = 40.0;
pub const CATEGORY_WEIGHT: f64 = 30.0;
pub const ELIGIBILITY_WEIGHT: f64 = 10.0;

const NEUTRAL_AFFINITY: f64 = 0.5;
const ELIGIBILITY_BASE: f64 = 0.8;

/// Score `passage` for `profile`
pub fn score(profile: &Profile, passage: &PolicyPassage) -> RelevanceScore {
    score_with_tags(profile, &classify(profile), passage)
}

/// Score with tags already derived, so a corpus run classifies only once
pub fn score_with_tags(
    profile: &Profile,
    tags: &BTreeSet<DemographicTag>,
    passage: &PolicyPassage,
) -> RelevanceScore {
    let mut reasons = Vec::new();

    let matched: Vec<DemographicTag> = tags
        .iter()
        .copied()
        .filter(|tag| passage.target_demographics.iter().any(|t| tag.matches(t)))
        .collect();
    let overlap = if passage.target_demographics.is_empty() {
        0.0
    } else {
        matched.len() as f64 / passage.target_demographics.len() as f64
    };
    let demographic_score = (overlap * DEMOGRAPHIC_WEIGHT).clamp(0.0, DEMOGRAPHIC_WEIGHT);
    if !matched.is_empty() {
        let names: Vec<_> = matched.iter().map(DemographicTag::as_str).collect();
        reasons.push(format!("Targets your demographic group: {}", names.join(", ")));
    }

    let affinity = category_affinity(profile, passage.category);
    let category_score = (affinity * CATEGORY_WEIGHT).clamp(0.0, CATEGORY_WEIGHT);
    if affinity > 0.5 {
        reasons.push(format!(
            "{} policies closely match your circumstances",
            passage.category.label()
        ));
    }

    let impact_score = impact_bonus(passage.impact);
    if passage.impact == ImpactLevel::High {
        reasons.push("High-impact policy with significant benefits".to_string());
    }

    let eligibility_score = match eligibility_factor(profile, passage) {
        Some(factor) => {
            if factor > 0.7 {
                reasons.push("You are likely to meet the eligibility criteria".to_string());
            }
            factor * ELIGIBILITY_WEIGHT
        }
        None => 0.0,
    };

    let total = (demographic_score + category_score + impact_score + eligibility_score)
        .clamp(0.0, 100.0);

    debug!(
        passage = %passage.id,
        demographic_score,
        category_score,
        impact_score,
        eligibility_score,
        total,
        "Scored passage"
    );

    RelevanceScore {
        passage_id: passage.id.clone(),
        score: total,
        reasons,
        matched_demographics: matched,
        impact_assessment: impact_assessment(total).to_string(),
    }
}

/// How strongly a policy area applies to a profile, in `0.0..=1.0`
pub fn category_affinity(profile: &Profile, category: PolicyCategory) -> f64 {
    match category {
        PolicyCategory::Housing => {
            if profile.age <= 40
                || profile.has_children
                || profile.housing_type.is_public_or_subsidized()
            {
                1.0
            } else {
                0.6
            }
        }
        PolicyCategory::Transportation => {
            if profile.uses_public_transport() {
                0.9
            } else if !profile.transportation_modes.is_empty() {
                0.7
            } else {
                0.6
            }
        }
        PolicyCategory::Healthcare => {
            if profile.age >= 60 || !profile.health_conditions.is_empty() {
                1.0
            } else if profile.has_children {
                0.8
            } else {
                0.5
            }
        }
        PolicyCategory::Education => {
            if profile.has_children || profile.employment_status == EmploymentStatus::Student {
                1.0
            } else if profile.age <= 30 {
                0.8
            } else {
                0.4
            }
        }
        PolicyCategory::Employment => match profile.employment_status {
            EmploymentStatus::Unemployed | EmploymentStatus::Student => 1.0,
            status if status.is_working() => 0.8,
            _ => 0.4,
        },
        PolicyCategory::SocialWelfare => {
            if profile.age >= 65
                || profile.income_band.is_low()
                || !profile.health_conditions.is_empty()
            {
                1.0
            } else if profile.has_children {
                0.7
            } else {
                0.4
            }
        }
        PolicyCategory::Environment | PolicyCategory::Economy | PolicyCategory::Technology => {
            NEUTRAL_AFFINITY
        }
    }
}

pub fn impact_bonus(impact: ImpactLevel) -> f64 {
    match impact {
        ImpactLevel::High => 20.0,
        ImpactLevel::Medium => 12.0,
        ImpactLevel::Low => 8.0,
    }
}

/// Likelihood that the profile meets the passage's declared criteria.
///
/// `None` when the passage declares no criteria.
pub fn eligibility_factor(profile: &Profile, passage: &PolicyPassage) -> Option<f64> {
    let criteria = passage.eligibility_criteria.as_ref()?;
    if criteria.is_empty() {
        return None;
    }

    let mentions = |needle: &str| criteria.iter().any(|c| c.to_lowercase().contains(needle));

    let mut factor = ELIGIBILITY_BASE;
    if mentions("income") && !profile.income_band.is_top() {
        factor += 0.2;
    }
    if mentions("age") {
        factor += 0.1;
    }

    Some(factor.min(1.0))
}

/// One-sentence assessment for a score band
pub fn impact_assessment(score: f64) -> &'static str {
    if score >= 80.0 {
        "This policy is highly relevant and likely to have a direct impact on your daily life."
    } else if score >= 60.0 {
        "This policy is relevant to your situation and may bring noticeable benefits."
    } else if score >= 40.0 {
        "This policy may affect you indirectly or in specific circumstances."
    } else {
        "This policy has limited direct relevance to your current situation."
    }
}
