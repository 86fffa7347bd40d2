//! Aggregation of per-passage scores into an analysis result

use policylens_core::{CategoryScore, PolicyCategory, RelevantSection};

use crate::recommender::RecommendedAction;

/// Passages scoring below this are not relevant to the user
pub const RELEVANCE_THRESHOLD: f64 = 30.0;

/// Business floor for the overall score, independent of the weighting
pub const OVERALL_SCORE_FLOOR: u8 = 70;

pub const MAX_TOP_CATEGORIES: usize = 5;

const MIN_RANK_WEIGHT: f64 = 0.1;
const RANK_WEIGHT_DECAY: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Always within `70..=100`
    pub overall_score: u8,
    /// Descending by score; ties keep corpus order
    pub relevant_sections: Vec<RelevantSection>,
    pub top_categories: Vec<CategoryScore>,
    pub recommended_actions: Vec<RecommendedAction>,
}

/// Filter, rank and summarize scored passages.
///
/// Each section keeps the passage it was scored against, so passages that
/// share an id are never confused. `recommended_actions` is left empty; the
/// recommender fills it.
pub fn aggregate(scored: Vec<RelevantSection>) -> AnalysisResult {
    let mut relevant_sections: Vec<RelevantSection> = scored
        .into_iter()
        .filter(|s| s.score() >= RELEVANCE_THRESHOLD)
        .collect();

    // sort_by is stable, so equal scores keep corpus order
    relevant_sections.sort_by(|a, b| b.score().total_cmp(&a.score()));

    let overall_score = overall_score(&relevant_sections);
    let top_categories = top_categories(&relevant_sections);

    AnalysisResult {
        overall_score,
        relevant_sections,
        top_categories,
        recommended_actions: Vec::new(),
    }
}

/// Rank-decayed weighted mean of section scores, floored at
/// [`OVERALL_SCORE_FLOOR`]
pub fn overall_score(sections: &[RelevantSection]) -> u8 {
    let (weighted_sum, weight_sum) = sections.iter().enumerate().fold(
        (0.0, 0.0),
        |(weighted_sum, weight_sum), (rank, section)| {
            let weight = rank_weight(rank);
            (weighted_sum + section.score() * weight, weight_sum + weight)
        },
    );

    if weight_sum <= 0.0 {
        return OVERALL_SCORE_FLOOR;
    }

    let mean = (weighted_sum / weight_sum).round().clamp(0.0, 100.0) as u8;
    mean.max(OVERALL_SCORE_FLOOR)
}

fn rank_weight(rank: usize) -> f64 {
    (1.0 - rank as f64 * RANK_WEIGHT_DECAY).max(MIN_RANK_WEIGHT)
}

/// Categories ranked by summed section score, first appearance breaking ties
fn top_categories(sections: &[RelevantSection]) -> Vec<CategoryScore> {
    let mut totals: Vec<(PolicyCategory, f64)> = Vec::new();
    for section in sections {
        let category = section.passage.category;
        match totals.iter_mut().find(|(c, _)| *c == category) {
            Some((_, total)) => *total += section.score(),
            None => totals.push((category, section.score())),
        }
    }

    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals
        .into_iter()
        .take(MAX_TOP_CATEGORIES)
        .map(|(category, total_score)| CategoryScore {
            category,
            total_score,
        })
        .collect()
}
