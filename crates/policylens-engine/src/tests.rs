//! End-to-end synthesis tests against the bundled corpus

#[cfg(test)]
mod synthesis_tests {
    use crate::{GenericAction, SummarySynthesizer, SynthesizerConfig};
    use async_trait::async_trait;
    use insta::assert_yaml_snapshot;
    use policylens_core::{
        CorpusLoader, CorpusProvider, EmploymentStatus, Error, HousingType, ImpactLevel,
        IncomeBand, Language, OfflineGenerator, PolicyCategory, PolicyCorpus, PolicyPassage,
        Priority, Profile, Result, SynthesisOptions, TextGenerator, TransportMode,
    };
    use policylens_corpus::StaticCorpusLoader;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Returns the same text for every prompt
    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn complete(&self, _prompt: &str, _system_prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }

        fn provider_id(&self) -> &str {
            "fixed"
        }
    }

    /// Counts calls and always fails
    #[derive(Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn complete(&self, _prompt: &str, _system_prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::TextGeneration("unavailable".to_string()))
        }

        fn provider_id(&self) -> &str {
            "counting"
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn complete(&self, _prompt: &str, _system_prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("This answer arrives far too late to be used by anyone at all.".to_string())
        }

        fn provider_id(&self) -> &str {
            "slow"
        }
    }

    /// Echoes the first prompt line after a prompt-dependent delay
    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn complete(&self, prompt: &str, _system_prompt: &str) -> Result<String> {
            let delay = (prompt.len() % 7) as u64 * 5;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let first_line = prompt.lines().next().unwrap_or_default();
            Ok(format!("{} | explained in enough detail to be accepted.", first_line))
        }

        fn provider_id(&self) -> &str {
            "echo"
        }
    }

    struct InlineLoader(Vec<PolicyPassage>);

    #[async_trait]
    impl CorpusLoader for InlineLoader {
        async fn load(&self) -> Result<PolicyCorpus> {
            Ok(PolicyCorpus::new(self.0.clone(), "inline"))
        }

        fn source(&self) -> String {
            "inline".to_string()
        }
    }

    struct FailingLoader;

    #[async_trait]
    impl CorpusLoader for FailingLoader {
        async fn load(&self) -> Result<PolicyCorpus> {
            Err(Error::Corpus("corpus store unreachable".to_string()))
        }

        fn source(&self) -> String {
            "failing".to_string()
        }
    }

    fn elderly() -> Profile {
        Profile {
            age: 72,
            district: "Sham Shui Po".to_string(),
            income_band: IncomeBand::Below10k,
            employment_status: EmploymentStatus::Retired,
            housing_type: HousingType::PublicRental,
            health_conditions: vec!["diabetes".to_string()],
            transportation_modes: vec![TransportMode::Bus],
            ..Default::default()
        }
    }

    fn young_professional() -> Profile {
        Profile {
            age: 26,
            district: "Kwun Tong".to_string(),
            income_band: IncomeBand::From30kTo40k,
            employment_status: EmploymentStatus::FullTime,
            housing_type: HousingType::PrivateRental,
            transportation_modes: vec![TransportMode::Mtr],
            ..Default::default()
        }
    }

    fn synthesizer(generator: Arc<dyn TextGenerator>) -> SummarySynthesizer {
        let corpus = Arc::new(CorpusProvider::new(Arc::new(StaticCorpusLoader::new())));
        SummarySynthesizer::new(corpus, generator)
    }

    fn unrelated_passage(id: &str, category: PolicyCategory) -> PolicyPassage {
        PolicyPassage {
            id: id.to_string(),
            category,
            title: format!("Unrelated {}", id),
            content: "Details.".to_string(),
            summary: "Summary.".to_string(),
            target_demographics: vec!["elderly".to_string()],
            impact: ImpactLevel::Low,
            timeline: "2026".to_string(),
            budget: None,
            key_benefits: vec!["Something".to_string()],
            eligibility_criteria: None,
        }
    }

    #[tokio::test]
    async fn test_elderly_summary() {
        let synthesizer = synthesizer(Arc::new(OfflineGenerator));
        let (summary, metadata) = synthesizer
            .synthesize(&elderly(), &SynthesisOptions::default())
            .await
            .unwrap();

        assert!((70..=100).contains(&summary.overall_score));
        assert_eq!(summary.relevant_areas[0].title, "Old Age Living Allowance Increase");
        assert_eq!(summary.relevant_areas[0].relevance_score, 100);
        assert_eq!(summary.relevant_areas[0].impact, ImpactLevel::High);
        assert_eq!(
            summary.relevant_areas[1].title,
            "Elderly Health Care Voucher Enhancement"
        );

        let update_ids: Vec<_> = summary.major_updates.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(
            update_ids,
            vec![
                "welfare-old-age-allowance",
                "healthcare-elderly-voucher",
                "transport-fare-concession"
            ]
        );

        let titles: Vec<_> = summary.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_yaml_snapshot!(titles, @r"
        - Old Age Living Allowance Increase
        - Elderly Health Care Voucher Enhancement
        - Public Transport Fare Concession
        - Elderly care and support services
        ");

        let elderly_services = &summary.recommendations[3];
        assert_eq!(elderly_services.id, "rec-4");
        assert_eq!(elderly_services.priority, Priority::Medium);
        assert_eq!(elderly_services.timeframe, "Within 3 months");
        assert_eq!(
            elderly_services.expected_benefit,
            GenericAction::ElderlyServices.expected_benefit()
        );
        assert_eq!(summary.recommendations[0].priority, Priority::High);

        assert_eq!(metadata.corpus_source, "static");
        assert_eq!(metadata.passages_scored, 14);
        assert_eq!(metadata.provider, "offline");
        assert_eq!(summary.provider, "offline");
    }

    #[tokio::test]
    async fn test_young_professional_summary() {
        let synthesizer = synthesizer(Arc::new(OfflineGenerator));
        let (summary, _) = synthesizer
            .synthesize(&young_professional(), &SynthesisOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.relevant_areas[0].title, "Starter Homes for Young Families");
        assert_eq!(summary.relevant_areas[0].relevance_score, 87);
        assert_eq!(
            summary.relevant_areas[1].title,
            "Northern Metropolis Railway Expansion"
        );
        assert!(
            summary
                .recommendations
                .iter()
                .any(|r| r.title == GenericAction::FirstTimeBuyer.title())
        );
        assert!(
            !summary
                .recommendations
                .iter()
                .any(|r| r.title == GenericAction::ElderlyServices.title())
        );
    }

    #[tokio::test]
    async fn test_processing_steps() {
        let synthesizer = synthesizer(Arc::new(OfflineGenerator));
        let (_, metadata) = synthesizer
            .synthesize(&young_professional(), &SynthesisOptions::default())
            .await
            .unwrap();

        assert_yaml_snapshot!(metadata.processing_steps, @r"
        - prepare_request
        - load_corpus
        - score_passages
        - build_relevant_areas
        - build_major_updates
        - build_recommendations
        - assemble_summary
        ");
    }

    #[tokio::test]
    async fn test_no_relevant_passages() {
        let loader = InlineLoader(vec![
            unrelated_passage("economy-a", PolicyCategory::Economy),
            unrelated_passage("technology-b", PolicyCategory::Technology),
        ]);
        let corpus = Arc::new(CorpusProvider::new(Arc::new(loader)));
        let synthesizer = SummarySynthesizer::new(corpus, Arc::new(OfflineGenerator));

        let (summary, metadata) = synthesizer
            .synthesize(&Profile::default(), &SynthesisOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.overall_score, 70);
        assert!(summary.relevant_areas.is_empty());
        assert!(summary.major_updates.is_empty());
        assert_eq!(metadata.relevant_sections, 0);
        assert!(metadata.top_categories.is_empty());

        // Generic guidance still applies without any matching passage
        assert_eq!(summary.recommendations.len(), 1);
        assert_eq!(summary.recommendations[0].title, GenericAction::FirstTimeBuyer.title());
        assert_eq!(summary.recommendations[0].description, GenericAction::FirstTimeBuyer.text());
    }

    #[tokio::test]
    async fn test_failed_enhancements_keep_original_text() {
        let synthesizer = synthesizer(Arc::new(OfflineGenerator));
        let (summary, metadata) = synthesizer
            .synthesize(&elderly(), &SynthesisOptions::default())
            .await
            .unwrap();

        let corpus = StaticCorpusLoader::new().load().await.unwrap();
        for area in &summary.relevant_areas {
            let passage = corpus
                .passages()
                .iter()
                .find(|p| p.title == area.title)
                .unwrap();
            assert_eq!(area.summary, passage.summary);
        }
        assert_eq!(
            summary.recommendations[0].description,
            "Explore old age living allowance increase to access higher monthly living allowance"
        );

        let stats = metadata.enhancements;
        assert_eq!(
            stats.attempted,
            summary.relevant_areas.len() + summary.recommendations.len()
        );
        assert_eq!(stats.failed, stats.attempted);
        assert_eq!(stats.accepted, 0);
    }

    #[tokio::test]
    async fn test_enhancement_length_thresholds() {
        // 40 chars: long enough for recommendations, too short for areas
        let text = "Apply early to secure your benefit slot.";
        assert_eq!(text.chars().count(), 40);

        let synthesizer = synthesizer(Arc::new(FixedGenerator(format!("  {}  ", text))));
        let (summary, metadata) = synthesizer
            .synthesize(&elderly(), &SynthesisOptions::default())
            .await
            .unwrap();

        assert!(summary.relevant_areas.iter().all(|a| a.summary != text));
        assert!(summary.recommendations.iter().all(|r| r.description == text));
        assert_eq!(metadata.enhancements.rejected, summary.relevant_areas.len());
        assert_eq!(metadata.enhancements.accepted, summary.recommendations.len());
    }

    #[tokio::test]
    async fn test_short_and_long_enhancements() {
        let short = synthesizer(Arc::new(FixedGenerator("Too short.".to_string())));
        let (summary, _) = short
            .synthesize(&young_professional(), &SynthesisOptions::default())
            .await
            .unwrap();
        assert!(summary.relevant_areas.iter().all(|a| a.summary != "Too short."));
        assert!(summary.recommendations.iter().all(|r| r.description != "Too short."));

        let long_text = "This policy lowers your housing costs and shortens commutes.";
        assert_eq!(long_text.chars().count(), 60);
        let long = synthesizer(Arc::new(FixedGenerator(long_text.to_string())));
        let (summary, metadata) = long
            .synthesize(&young_professional(), &SynthesisOptions::default())
            .await
            .unwrap();
        assert!(summary.relevant_areas.iter().all(|a| a.summary == long_text));
        assert!(summary.recommendations.iter().all(|r| r.description == long_text));
        assert_eq!(metadata.enhancements.accepted, metadata.enhancements.attempted);
        assert_eq!(summary.provider, "fixed");
    }

    #[tokio::test]
    async fn test_detailed_analysis_disabled_makes_no_calls() {
        let generator = Arc::new(CountingGenerator::default());
        let synthesizer = synthesizer(generator.clone());
        let options = SynthesisOptions {
            include_detailed_analysis: false,
            ..Default::default()
        };

        let (summary, metadata) = synthesizer.synthesize(&elderly(), &options).await.unwrap();
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(metadata.enhancements.attempted, 0);
        assert!(!summary.relevant_areas.is_empty());

        let options = SynthesisOptions::default();
        let (summary, _) = synthesizer.synthesize(&elderly(), &options).await.unwrap();
        assert_eq!(
            generator.calls.load(Ordering::SeqCst),
            summary.relevant_areas.len() + summary.recommendations.len()
        );
    }

    #[tokio::test]
    async fn test_enhancement_timeout_falls_back() {
        let config = SynthesizerConfig {
            enhancement_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let synthesizer = synthesizer(Arc::new(SlowGenerator)).with_config(config);
        let options = SynthesisOptions {
            max_recommendations: 1,
            ..Default::default()
        };

        let (summary, metadata) = synthesizer.synthesize(&elderly(), &options).await.unwrap();
        assert_eq!(summary.recommendations.len(), 1);
        assert!(
            summary.recommendations[0]
                .description
                .starts_with("Explore old age living allowance increase")
        );
        assert_eq!(metadata.enhancements.failed, metadata.enhancements.attempted);
    }

    #[tokio::test]
    async fn test_concurrent_enhancements_keep_rank_order() {
        let config = SynthesizerConfig {
            max_concurrent_enhancements: 4,
            ..Default::default()
        };
        let synthesizer = synthesizer(Arc::new(EchoGenerator)).with_config(config);
        let (summary, metadata) = synthesizer
            .synthesize(&elderly(), &SynthesisOptions::default())
            .await
            .unwrap();

        assert_eq!(metadata.enhancements.accepted, metadata.enhancements.attempted);
        for area in &summary.relevant_areas {
            assert!(
                area.summary.starts_with(&format!("Policy: {} |", area.title)),
                "{}",
                area.summary
            );
        }
        let scores: Vec<_> = summary.relevant_areas.iter().map(|a| a.relevance_score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);
    }

    #[tokio::test]
    async fn test_focus_categories_come_first() {
        let synthesizer = synthesizer(Arc::new(OfflineGenerator));
        let options = SynthesisOptions {
            focus_categories: Some(vec![PolicyCategory::Economy]),
            ..Default::default()
        };

        let (summary, _) = synthesizer
            .synthesize(&young_professional(), &options)
            .await
            .unwrap();
        assert_eq!(summary.relevant_areas[0].category, PolicyCategory::Economy);
        assert_eq!(summary.relevant_areas[1].title, "Starter Homes for Young Families");
    }

    #[tokio::test]
    async fn test_output_bounds() {
        let synthesizer = synthesizer(Arc::new(OfflineGenerator));
        let families = Profile {
            age: 38,
            has_children: true,
            children_ages: vec![4, 9],
            income_band: IncomeBand::From20kTo30k,
            employment_status: EmploymentStatus::PartTime,
            transportation_modes: vec![TransportMode::Mtr, TransportMode::Bus],
            ..Default::default()
        };

        for profile in [elderly(), young_professional(), families, Profile::default()] {
            for max_recommendations in [0, 2, 5, 10] {
                let options = SynthesisOptions {
                    max_recommendations,
                    language: Language::ZhHk,
                    ..Default::default()
                };
                let (summary, _) = synthesizer.synthesize(&profile, &options).await.unwrap();

                assert!((70..=100).contains(&summary.overall_score));
                assert!(summary.relevant_areas.len() <= 6);
                assert!(summary.major_updates.len() <= 3);
                assert!(summary.recommendations.len() <= max_recommendations.min(5));
                assert!(summary.relevant_areas.iter().all(|a| a.relevance_score >= 30));
                assert!(summary.relevant_areas.iter().all(|a| a.relevance_score <= 100));
                for (rank, rec) in summary.recommendations.iter().enumerate() {
                    assert_eq!(rec.id, format!("rec-{}", rank + 1));
                    assert_eq!(rec.priority, Priority::from_rank(rank));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let synthesizer = synthesizer(Arc::new(OfflineGenerator));
        let options = SynthesisOptions::default();

        let (first, _) = synthesizer.synthesize(&elderly(), &options).await.unwrap();
        let (second, _) = synthesizer.synthesize(&elderly(), &options).await.unwrap();

        assert_eq!(first.overall_score, second.overall_score);
        assert_eq!(first.relevant_areas, second.relevant_areas);
        assert_eq!(first.major_updates, second.major_updates);
        assert_eq!(first.recommendations, second.recommendations);
    }

    #[tokio::test]
    async fn test_corpus_failure_reports_completed_steps() {
        let corpus = Arc::new(CorpusProvider::new(Arc::new(FailingLoader)));
        let synthesizer = SummarySynthesizer::new(corpus, Arc::new(OfflineGenerator));

        let err = synthesizer
            .synthesize(&elderly(), &SynthesisOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.completed_steps, vec!["prepare_request".to_string()]);
        assert!(matches!(err.source, Error::Corpus(_)));
        assert!(
            err.to_string()
                .starts_with("summary synthesis failed after [prepare_request]")
        );
    }
}
