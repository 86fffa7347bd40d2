//! Deterministic prompt construction for text enhancement

use policylens_core::{Language, PolicyPassage, Profile};

use crate::recommender::RecommendedAction;

/// A user prompt together with its system instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub user: String,
    pub system: String,
}

const AREA_SYSTEM_PROMPT: &str = "You explain government policies to residents. \
Write a concise, friendly summary of 2-3 sentences that tells this person how the policy \
benefits them specifically. Focus on concrete benefits. Do not invent figures or \
eligibility rules that are not in the policy text. Do not use headings or lists.";

const RECOMMENDATION_SYSTEM_PROMPT: &str = "You help residents act on government policies. \
Rewrite the recommended action as 2-3 concise sentences that explain what the person should \
do next and what they gain. Focus on benefits and practical next steps. Do not invent \
figures or deadlines. Do not use headings or lists.";

/// Profile attributes that make generated text relatable
pub fn describe_profile(profile: &Profile) -> String {
    let district = if profile.district.trim().is_empty() {
        "not specified"
    } else {
        profile.district.trim()
    };

    let mut lines = vec![
        format!("- Age: {}", profile.age),
        format!("- Marital status: {}", profile.marital_status.label()),
        format!("- District: {}", district),
        format!("- Monthly household income: {}", profile.income_band.label()),
        format!("- Employment: {}", profile.employment_status.label()),
        format!("- Housing: lives in {}", profile.housing_type.label()),
    ];
    if profile.has_children {
        lines.push("- Has children".to_string());
    }

    lines.join("\n")
}

fn system_prompt(base: &str, language: Language) -> String {
    format!("{} {}", base, language.response_instruction())
}

/// Prompt for an enhanced relevant-area summary
pub fn area_prompt(
    profile: &Profile,
    passage: &PolicyPassage,
    relevance_score: u8,
    language: Language,
) -> Prompt {
    let user = format!(
        "Policy: {}\n\
        Summary: {}\n\
        Relevance to this resident: {}/100\n\
        \n\
        Resident profile:\n{}\n\
        \n\
        Explain how this policy benefits this resident.",
        passage.title,
        passage.summary,
        relevance_score,
        describe_profile(profile),
    );

    Prompt {
        user,
        system: system_prompt(AREA_SYSTEM_PROMPT, language),
    }
}

/// Prompt for an enhanced recommendation description
pub fn recommendation_prompt(
    profile: &Profile,
    action: &RecommendedAction,
    passage: Option<&PolicyPassage>,
    language: Language,
) -> Prompt {
    let mut user = format!("Recommended action: {}\n", action.text);
    if let Some(passage) = passage {
        user.push_str(&format!(
            "Related policy: {}\nPolicy summary: {}\n",
            passage.title, passage.summary
        ));
    }
    user.push_str(&format!(
        "\nResident profile:\n{}\n\nDescribe this action for this resident.",
        describe_profile(profile)
    ));

    Prompt {
        user,
        system: system_prompt(RECOMMENDATION_SYSTEM_PROMPT, language),
    }
}
