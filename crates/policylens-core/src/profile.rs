//! Demographic profile submitted by a resident, and the tags derived from it

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Married => "married",
            Self::Divorced => "divorced",
            Self::Widowed => "widowed",
        }
    }
}

/// Monthly household income band, in HKD.
///
/// Declaration order is ascending; the lowest three bands are treated as
/// low income, the next two as middle income and the top two as high income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum IncomeBand {
    #[serde(rename = "below-10k")]
    Below10k,
    #[serde(rename = "10k-20k")]
    From10kTo20k,
    #[serde(rename = "20k-30k")]
    From20kTo30k,
    #[default]
    #[serde(rename = "30k-40k")]
    From30kTo40k,
    #[serde(rename = "40k-60k")]
    From40kTo60k,
    #[serde(rename = "60k-80k")]
    From60kTo80k,
    #[serde(rename = "above-80k")]
    Above80k,
}

impl IncomeBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Below10k => "below HK$10,000",
            Self::From10kTo20k => "HK$10,000-20,000",
            Self::From20kTo30k => "HK$20,000-30,000",
            Self::From30kTo40k => "HK$30,000-40,000",
            Self::From40kTo60k => "HK$40,000-60,000",
            Self::From60kTo80k => "HK$60,000-80,000",
            Self::Above80k => "above HK$80,000",
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, Self::Below10k | Self::From10kTo20k | Self::From20kTo30k)
    }

    pub fn is_middle(&self) -> bool {
        matches!(self, Self::From30kTo40k | Self::From40kTo60k)
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Self::From60kTo80k | Self::Above80k)
    }

    /// Whether this is the single highest band
    pub fn is_top(&self) -> bool {
        *self == Self::Above80k
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentStatus {
    #[default]
    FullTime,
    PartTime,
    SelfEmployed,
    Unemployed,
    Student,
    Retired,
    Homemaker,
}

impl EmploymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullTime => "employed full-time",
            Self::PartTime => "employed part-time",
            Self::SelfEmployed => "self-employed",
            Self::Unemployed => "unemployed",
            Self::Student => "a student",
            Self::Retired => "retired",
            Self::Homemaker => "a homemaker",
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self, Self::FullTime | Self::PartTime | Self::SelfEmployed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HousingType {
    PublicRental,
    SubsidizedSale,
    #[default]
    PrivateRental,
    PrivateOwned,
    LivingWithFamily,
    Other,
}

impl HousingType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PublicRental => "public rental housing",
            Self::SubsidizedSale => "a subsidized sale flat",
            Self::PrivateRental => "a private rental flat",
            Self::PrivateOwned => "a privately owned home",
            Self::LivingWithFamily => "the family home",
            Self::Other => "other housing",
        }
    }

    pub fn is_public_or_subsidized(&self) -> bool {
        matches!(self, Self::PublicRental | Self::SubsidizedSale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EducationLevel {
    Primary,
    #[default]
    Secondary,
    PostSecondary,
    Bachelor,
    Postgraduate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportMode {
    Mtr,
    Bus,
    Minibus,
    Tram,
    Ferry,
    Taxi,
    PrivateCar,
    Bicycle,
    Walking,
}

impl TransportMode {
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Mtr | Self::Bus | Self::Minibus | Self::Tram | Self::Ferry
        )
    }
}

/// Structured demographic profile.
///
/// Validation happens upstream; the engine assumes a well-formed profile and
/// never mutates it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub age: u8,
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub district: String,
    pub income_band: IncomeBand,
    pub employment_status: EmploymentStatus,
    pub housing_type: HousingType,
    pub has_children: bool,
    pub children_ages: Vec<u8>,
    pub education_level: EducationLevel,
    pub health_conditions: Vec<String>,
    pub transportation_modes: Vec<TransportMode>,
}

impl Profile {
    pub fn uses_public_transport(&self) -> bool {
        self.transportation_modes.iter().any(TransportMode::is_public)
    }
}

/// Coarse audience label matched against a passage's declared targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemographicTag {
    YoungAdults,
    Elderly,
    Families,
    LowIncome,
    MiddleIncome,
    HighIncome,
    Unemployed,
    Professionals,
    Students,
    Disabled,
}

impl DemographicTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YoungAdults => "young-adults",
            Self::Elderly => "elderly",
            Self::Families => "families",
            Self::LowIncome => "low-income",
            Self::MiddleIncome => "middle-income",
            Self::HighIncome => "high-income",
            Self::Unemployed => "unemployed",
            Self::Professionals => "professionals",
            Self::Students => "students",
            Self::Disabled => "disabled",
        }
    }

    /// Whether a declared passage target names this tag
    pub fn matches(&self, target: &str) -> bool {
        target.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for DemographicTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
