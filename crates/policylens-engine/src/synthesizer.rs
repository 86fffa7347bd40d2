//! Summary synthesis: scoring, ranking and optional text enhancement

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use policylens_core::{
    CorpusProvider, EnhancementStats, ImpactLevel, MajorUpdate, PersonalizedSummary,
    PolicyCorpus, PolicyPassage, Priority, Profile, Recommendation, RelevantArea,
    RelevantSection, SynthesisError, SynthesisMetadata, SynthesisOptions, TextGenerator,
};

use crate::aggregator::{AnalysisResult, aggregate};
use crate::classifier::classify;
use crate::prompts::{Prompt, area_prompt, recommendation_prompt};
use crate::recommender::{ActionSource, RecommendedAction, recommend};
use crate::scorer::score_with_tags;

/// Minimum length of an accepted enhanced area summary
pub const AREA_SUMMARY_MIN_CHARS: usize = 50;
/// Minimum length of an accepted enhanced recommendation description
pub const RECOMMENDATION_MIN_CHARS: usize = 30;

/// Tuning for the synthesizer, independent of any single request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    pub area_min_chars: usize,
    pub recommendation_min_chars: usize,
    pub enhancement_timeout: Duration,
    /// Upper bound on text-generation calls in flight at once
    pub max_concurrent_enhancements: usize,
    pub max_relevant_areas: usize,
    pub max_major_updates: usize,
    pub major_update_threshold: f64,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            area_min_chars: AREA_SUMMARY_MIN_CHARS,
            recommendation_min_chars: RECOMMENDATION_MIN_CHARS,
            enhancement_timeout: Duration::from_secs(20),
            max_concurrent_enhancements: 1,
            max_relevant_areas: 6,
            max_major_updates: 3,
            major_update_threshold: 70.0,
        }
    }
}

const STEP_PREPARE: &str = "prepare_request";
const STEP_LOAD_CORPUS: &str = "load_corpus";
const STEP_SCORE: &str = "score_passages";
const STEP_RELEVANT_AREAS: &str = "build_relevant_areas";
const STEP_MAJOR_UPDATES: &str = "build_major_updates";
const STEP_RECOMMENDATIONS: &str = "build_recommendations";
const STEP_ASSEMBLE: &str = "assemble_summary";

/// Outcome of one enhancement call
#[derive(Debug, Clone, PartialEq, Eq)]
enum Enhancement {
    Accepted(String),
    Rejected,
    Failed,
    Skipped,
}

impl Enhancement {
    fn text_or(self, fallback: &str) -> String {
        match self {
            Self::Accepted(text) => text,
            _ => fallback.to_string(),
        }
    }

    fn record(&self, stats: &mut EnhancementStats) {
        match self {
            Self::Accepted(_) => stats.accepted += 1,
            Self::Rejected => stats.rejected += 1,
            Self::Failed => stats.failed += 1,
            Self::Skipped => return,
        }
        stats.attempted += 1;
    }
}

/// Score every passage for `profile` and rank the results
pub fn analyze(profile: &Profile, corpus: &PolicyCorpus) -> AnalysisResult {
    let tags = classify(profile);
    // Each score stays paired with the passage it was computed from
    let sections = corpus
        .passages()
        .iter()
        .map(|passage| RelevantSection {
            passage: Arc::clone(passage),
            relevance: score_with_tags(profile, &tags, passage),
        })
        .collect();

    let mut analysis = aggregate(sections);
    analysis.recommended_actions = recommend(profile, &analysis.relevant_sections);
    analysis
}

/// Builds personalized summaries from a shared corpus and a text generator
pub struct SummarySynthesizer {
    corpus: Arc<CorpusProvider>,
    generator: Arc<dyn TextGenerator>,
    config: SynthesizerConfig,
}

impl SummarySynthesizer {
    pub fn new(corpus: Arc<CorpusProvider>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            corpus,
            generator,
            config: SynthesizerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SynthesizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Produce a personalized summary for `profile`.
    ///
    /// Only a corpus failure is fatal. Enhancement failures, timeouts and
    /// short outputs fall back to the deterministic passage-derived text.
    pub async fn synthesize(
        &self,
        profile: &Profile,
        options: &SynthesisOptions,
    ) -> Result<(PersonalizedSummary, SynthesisMetadata), SynthesisError> {
        let started = Instant::now();
        let mut steps = vec![STEP_PREPARE.to_string()];
        let provider = self.generator.provider_id().to_string();

        let corpus = match self.corpus.corpus().await {
            Ok(corpus) => corpus,
            Err(e) => {
                warn!("Policy corpus unavailable: {}", e);
                return Err(SynthesisError::new(steps, e));
            }
        };
        steps.push(STEP_LOAD_CORPUS.to_string());

        let analysis = analyze(profile, &corpus);
        steps.push(STEP_SCORE.to_string());
        info!(
            "Scored {} passages: {} relevant, overall score {}",
            corpus.len(),
            analysis.relevant_sections.len(),
            analysis.overall_score
        );

        let mut stats = EnhancementStats::default();

        let relevant_areas = self
            .build_relevant_areas(profile, options, &analysis, &mut stats)
            .await;
        steps.push(STEP_RELEVANT_AREAS.to_string());

        let major_updates = self.build_major_updates(&analysis);
        steps.push(STEP_MAJOR_UPDATES.to_string());

        let recommendations = self
            .build_recommendations(profile, options, &analysis, &mut stats)
            .await;
        steps.push(STEP_RECOMMENDATIONS.to_string());

        let processing_time_ms = started.elapsed().as_millis() as u64;
        steps.push(STEP_ASSEMBLE.to_string());

        let summary = PersonalizedSummary {
            overall_score: analysis.overall_score,
            relevant_areas,
            major_updates,
            recommendations,
            generated_at: Utc::now(),
            provider: provider.clone(),
            processing_time_ms,
        };

        let metadata = SynthesisMetadata {
            processing_steps: steps,
            corpus_source: corpus.source().to_string(),
            passages_scored: corpus.len(),
            relevant_sections: analysis.relevant_sections.len(),
            top_categories: analysis.top_categories.clone(),
            enhancements: stats,
            provider,
            processing_time_ms,
        };

        info!(
            "Synthesized summary in {}ms ({} enhancements accepted of {})",
            processing_time_ms, metadata.enhancements.accepted, metadata.enhancements.attempted
        );

        Ok((summary, metadata))
    }

    async fn build_relevant_areas(
        &self,
        profile: &Profile,
        options: &SynthesisOptions,
        analysis: &AnalysisResult,
        stats: &mut EnhancementStats,
    ) -> Vec<RelevantArea> {
        let sections = self.select_area_sections(&analysis.relevant_sections, options);

        let enhancements = if options.include_detailed_analysis {
            let prompts = sections
                .iter()
                .map(|section| {
                    let prompt = area_prompt(
                        profile,
                        &section.passage,
                        rounded(section.score()),
                        options.language,
                    );
                    (section.passage.id.clone(), prompt)
                })
                .collect();
            self.enhance_all(prompts, self.config.area_min_chars).await
        } else {
            vec![Enhancement::Skipped; sections.len()]
        };

        sections
            .into_iter()
            .zip(enhancements)
            .map(|(section, enhancement)| {
                enhancement.record(stats);
                let passage = &section.passage;
                RelevantArea {
                    category: passage.category,
                    title: passage.title.clone(),
                    relevance_score: rounded(section.score()),
                    summary: enhancement.text_or(&passage.summary),
                    details: passage.content.clone(),
                    action_items: area_action_items(passage),
                    impact: impact_bucket(section.score()),
                    key_benefits: passage.key_benefits.clone(),
                }
            })
            .collect()
    }

    /// Top sections for relevant areas, focus categories first
    fn select_area_sections<'a>(
        &self,
        sections: &'a [RelevantSection],
        options: &SynthesisOptions,
    ) -> Vec<&'a RelevantSection> {
        let focus = options.focus_categories.as_deref().unwrap_or_default();
        let (mut selected, rest): (Vec<_>, Vec<_>) = sections
            .iter()
            .partition(|s| focus.contains(&s.passage.category));
        selected.extend(rest);
        selected.truncate(self.config.max_relevant_areas);
        selected
    }

    fn build_major_updates(&self, analysis: &AnalysisResult) -> Vec<MajorUpdate> {
        analysis
            .relevant_sections
            .iter()
            .filter(|s| s.score() >= self.config.major_update_threshold)
            .take(self.config.max_major_updates)
            .map(|section| {
                let passage = &section.passage;
                MajorUpdate {
                    id: passage.id.clone(),
                    title: passage.title.clone(),
                    category: passage.category,
                    description: passage.summary.clone(),
                    timeline: passage.timeline.clone(),
                    impact: passage.impact,
                    relevance_to_user: section.relevance.impact_assessment.clone(),
                }
            })
            .collect()
    }

    async fn build_recommendations(
        &self,
        profile: &Profile,
        options: &SynthesisOptions,
        analysis: &AnalysisResult,
        stats: &mut EnhancementStats,
    ) -> Vec<Recommendation> {
        let actions: Vec<&RecommendedAction> = analysis
            .recommended_actions
            .iter()
            .take(options.max_recommendations)
            .collect();

        // Generic actions borrow context from the best section in their category
        let related: Vec<Option<&PolicyPassage>> = actions
            .iter()
            .map(|action| match &action.source {
                ActionSource::Passage(passage) => Some(passage.as_ref()),
                ActionSource::Generic(_) => analysis
                    .relevant_sections
                    .iter()
                    .find(|s| s.passage.category == action.category)
                    .map(|s| s.passage.as_ref()),
            })
            .collect();

        let enhancements = if options.include_detailed_analysis {
            let prompts = actions
                .iter()
                .zip(&related)
                .enumerate()
                .map(|(rank, (action, passage))| {
                    let prompt =
                        recommendation_prompt(profile, action, *passage, options.language);
                    (format!("recommendation {}", rank + 1), prompt)
                })
                .collect();
            self.enhance_all(prompts, self.config.recommendation_min_chars)
                .await
        } else {
            vec![Enhancement::Skipped; actions.len()]
        };

        actions
            .into_iter()
            .zip(related)
            .zip(enhancements)
            .enumerate()
            .map(|(rank, ((action, passage), enhancement))| {
                enhancement.record(stats);
                let priority = Priority::from_rank(rank);
                let (action_steps, expected_benefit) = match action.source {
                    ActionSource::Generic(generic) => (
                        generic.action_steps(),
                        generic.expected_benefit().to_string(),
                    ),
                    ActionSource::Passage(_) => match passage {
                        Some(passage) => (
                            passage_action_steps(passage),
                            passage
                                .key_benefits
                                .first()
                                .cloned()
                                .unwrap_or_else(|| passage.summary.clone()),
                        ),
                        None => (Vec::new(), String::new()),
                    },
                };

                Recommendation {
                    id: format!("rec-{}", rank + 1),
                    title: action.title.clone(),
                    description: enhancement.text_or(&action.text),
                    priority,
                    category: action.category,
                    action_steps,
                    expected_benefit,
                    timeframe: timeframe(priority).to_string(),
                }
            })
            .collect()
    }

    /// Run enhancement calls through a bounded pool, keeping input order
    async fn enhance_all(&self, prompts: Vec<(String, Prompt)>, min_chars: usize) -> Vec<Enhancement> {
        let limit = self.config.max_concurrent_enhancements.max(1);
        stream::iter(prompts)
            .map(|(label, prompt)| async move { self.enhance(&label, &prompt, min_chars).await })
            .buffered(limit)
            .collect()
            .await
    }

    async fn enhance(&self, label: &str, prompt: &Prompt, min_chars: usize) -> Enhancement {
        let call = self.generator.complete(&prompt.user, &prompt.system);
        match timeout(self.config.enhancement_timeout, call).await {
            Ok(Ok(text)) => {
                let text = text.trim();
                if !text.is_empty() && text.chars().count() >= min_chars {
                    Enhancement::Accepted(text.to_string())
                } else {
                    debug!(
                        "Rejected enhancement for {}: {} chars, need {}",
                        label,
                        text.chars().count(),
                        min_chars
                    );
                    Enhancement::Rejected
                }
            }
            Ok(Err(e)) => {
                warn!("Enhancement failed for {}, keeping original text: {}", label, e);
                Enhancement::Failed
            }
            Err(_) => {
                warn!(
                    "Enhancement for {} timed out after {:?}, keeping original text",
                    label, self.config.enhancement_timeout
                );
                Enhancement::Failed
            }
        }
    }
}

fn rounded(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

/// Impact bucket of a relevant area, from its relevance score
fn impact_bucket(score: f64) -> ImpactLevel {
    if score >= 80.0 {
        ImpactLevel::High
    } else if score >= 60.0 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}

fn area_action_items(passage: &PolicyPassage) -> Vec<String> {
    let mut items: Vec<String> = passage
        .eligibility_criteria
        .iter()
        .flatten()
        .take(2)
        .map(|criterion| format!("Check eligibility: {}", criterion))
        .collect();
    items.push(format!("Learn more about {}", passage.title));
    if items.len() < 2 {
        items.push("Contact the responsible department for application details".to_string());
    }
    items
}

fn passage_action_steps(passage: &PolicyPassage) -> Vec<String> {
    let mut steps: Vec<String> = passage
        .eligibility_criteria
        .iter()
        .flatten()
        .take(2)
        .map(|criterion| format!("Confirm you meet: {}", criterion))
        .collect();
    steps.push(format!(
        "Gather the documents needed for {}",
        passage.title
    ));
    steps.push("Submit your application or enquiry to the responsible department".to_string());
    steps
}

fn timeframe(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "Within 1 month",
        Priority::Medium => "Within 3 months",
        Priority::Low => "Within 6 months",
    }
}
