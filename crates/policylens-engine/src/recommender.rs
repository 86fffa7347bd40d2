//! Plain recommended actions from ranked passages and profile heuristics

use std::sync::Arc;

use policylens_core::{HousingType, PolicyCategory, PolicyPassage, Profile, RelevantSection};

pub const MAX_ACTIONS: usize = 5;

/// Ranked sections consulted for passage-derived actions
const SECTION_ACTIONS: usize = 3;

/// Generic action kinds appended after passage-derived actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericAction {
    FirstTimeBuyer,
    EducationPrograms,
    ElderlyServices,
}

impl GenericAction {
    pub fn title(&self) -> &'static str {
        match self {
            Self::FirstTimeBuyer => "First-time home ownership",
            Self::EducationPrograms => "Education support for your children",
            Self::ElderlyServices => "Elderly care and support services",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::FirstTimeBuyer => {
                "Check your eligibility for first-time buyer schemes and subsidized sale flats"
            }
            Self::EducationPrograms => {
                "Review education programs and school subsidies available for your children"
            }
            Self::ElderlyServices => {
                "Register for elderly health care vouchers and community care services"
            }
        }
    }

    pub fn category(&self) -> PolicyCategory {
        match self {
            Self::FirstTimeBuyer => PolicyCategory::Housing,
            Self::EducationPrograms => PolicyCategory::Education,
            Self::ElderlyServices => PolicyCategory::SocialWelfare,
        }
    }

    pub fn action_steps(&self) -> Vec<String> {
        let steps: &[&str] = match self {
            Self::FirstTimeBuyer => &[
                "Review the income and asset limits for subsidized sale flats",
                "Prepare proof of income and residency",
                "Submit an application during the next sale exercise",
            ],
            Self::EducationPrograms => &[
                "List the school levels your children will enter in the coming years",
                "Check fee remission and subsidy schemes for each level",
                "Apply before the school-year deadlines",
            ],
            Self::ElderlyServices => &[
                "Confirm your health care voucher balance",
                "Register with a District Health Centre near you",
                "Ask a social worker about community care services",
            ],
        };
        steps.iter().map(|s| s.to_string()).collect()
    }

    pub fn expected_benefit(&self) -> &'static str {
        match self {
            Self::FirstTimeBuyer => "A clearer path to affordable home ownership",
            Self::EducationPrograms => "Lower education costs and better learning support",
            Self::ElderlyServices => "Easier access to subsidized health and care services",
        }
    }

    /// Generic actions that apply to `profile`, in insertion order
    pub fn applicable(profile: &Profile) -> Vec<Self> {
        let mut actions = Vec::new();
        if profile.age <= 35 && profile.housing_type != HousingType::PrivateOwned {
            actions.push(Self::FirstTimeBuyer);
        }
        if profile.has_children {
            actions.push(Self::EducationPrograms);
        }
        if profile.age >= 60 {
            actions.push(Self::ElderlyServices);
        }
        actions
    }

}

/// Where a recommended action came from
#[derive(Debug, Clone)]
pub enum ActionSource {
    /// Derived from a ranked passage
    Passage(Arc<PolicyPassage>),
    /// Profile-conditioned guidance
    Generic(GenericAction),
}

/// Plain recommended action, with the policy area it came from
#[derive(Debug, Clone)]
pub struct RecommendedAction {
    pub title: String,
    pub text: String,
    pub category: PolicyCategory,
    pub source: ActionSource,
}

impl RecommendedAction {
    /// The passage this action was derived from, if any
    pub fn passage(&self) -> Option<&PolicyPassage> {
        match &self.source {
            ActionSource::Passage(passage) => Some(passage),
            ActionSource::Generic(_) => None,
        }
    }

    pub fn generic(&self) -> Option<GenericAction> {
        match self.source {
            ActionSource::Generic(action) => Some(action),
            ActionSource::Passage(_) => None,
        }
    }
}

/// Build at most [`MAX_ACTIONS`] actions: one per top-ranked section with key
/// benefits, then profile-conditioned generic actions.
pub fn recommend(profile: &Profile, top_sections: &[RelevantSection]) -> Vec<RecommendedAction> {
    let section_actions = top_sections
        .iter()
        .take(SECTION_ACTIONS)
        .filter_map(|section| {
            let passage = &section.passage;
            let benefit = passage.key_benefits.first()?;
            Some(RecommendedAction {
                title: passage.title.clone(),
                text: format!(
                    "Explore {} to access {}",
                    passage.title.to_lowercase(),
                    benefit.to_lowercase()
                ),
                category: passage.category,
                source: ActionSource::Passage(Arc::clone(passage)),
            })
        });

    let generic_actions = GenericAction::applicable(profile)
        .into_iter()
        .map(|action| RecommendedAction {
            title: action.title().to_string(),
            text: action.text().to_string(),
            category: action.category(),
            source: ActionSource::Generic(action),
        });

    section_actions
        .chain(generic_actions)
        .take(MAX_ACTIONS)
        .collect()
}
