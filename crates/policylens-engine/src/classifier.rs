//! Demographic classification of profiles

use std::collections::BTreeSet;

use policylens_core::{DemographicTag, EmploymentStatus, MaritalStatus, Profile};

/// Derive the demographic tags a profile carries.
///
/// Rules are independent and additive; a profile can carry many tags at once.
pub fn classify(profile: &Profile) -> BTreeSet<DemographicTag> {
    let mut tags = BTreeSet::new();

    if (18..=35).contains(&profile.age) {
        tags.insert(DemographicTag::YoungAdults);
    }
    if profile.age >= 65 {
        tags.insert(DemographicTag::Elderly);
    }

    if profile.has_children || profile.marital_status == MaritalStatus::Married {
        tags.insert(DemographicTag::Families);
    }

    let band = profile.income_band;
    if band.is_low() {
        tags.insert(DemographicTag::LowIncome);
    } else if band.is_middle() {
        tags.insert(DemographicTag::MiddleIncome);
    } else if band.is_high() {
        tags.insert(DemographicTag::HighIncome);
    }

    match profile.employment_status {
        EmploymentStatus::Unemployed => {
            tags.insert(DemographicTag::Unemployed);
        }
        EmploymentStatus::Student => {
            tags.insert(DemographicTag::Students);
        }
        status if status.is_working() => {
            tags.insert(DemographicTag::Professionals);
        }
        _ => {}
    }

    if !profile.health_conditions.is_empty() {
        tags.insert(DemographicTag::Disabled);
    }

    tags
}
