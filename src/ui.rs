//! Terminal rendering of a personalized summary

use colored::*;

use policylens_core::{ImpactLevel, PersonalizedSummary, Priority, SynthesisMetadata};

fn score_label(score: u8) -> ColoredString {
    let text = format!("{}/100", score);
    if score >= 80 {
        text.green().bold()
    } else if score >= 60 {
        text.yellow()
    } else {
        text.normal()
    }
}

fn impact_label(impact: ImpactLevel) -> ColoredString {
    let text = format!("{} impact", impact.as_str());
    match impact {
        ImpactLevel::High => text.red(),
        ImpactLevel::Medium => text.yellow(),
        ImpactLevel::Low => text.dimmed(),
    }
}

fn priority_label(priority: Priority) -> ColoredString {
    let text = format!("[{}]", priority.as_str().to_uppercase());
    match priority {
        Priority::High => text.red().bold(),
        Priority::Medium => text.yellow(),
        Priority::Low => text.cyan(),
    }
}

pub fn render_summary(summary: &PersonalizedSummary, metadata: &SynthesisMetadata) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{} (overall relevance {})\n",
        "📋 Your policy summary".blue().bold(),
        score_label(summary.overall_score)
    ));
    out.push_str(&format!(
        "{}\n",
        format!(
            "Provider: {} • Corpus: {} • {}ms",
            summary.provider, metadata.corpus_source, summary.processing_time_ms
        )
        .dimmed()
    ));

    out.push_str(&format!("\n{}\n", "Relevant areas".bold()));
    if summary.relevant_areas.is_empty() {
        out.push_str("  No policy areas matched your profile closely.\n");
    }
    for (i, area) in summary.relevant_areas.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} [{}] {} {}\n",
            i + 1,
            area.title.bold(),
            area.category,
            score_label(area.relevance_score),
            impact_label(area.impact)
        ));
        out.push_str(&format!("     {}\n", area.summary));
        for item in &area.action_items {
            out.push_str(&format!("     {} {}\n", "•".cyan(), item));
        }
    }

    if !summary.major_updates.is_empty() {
        out.push_str(&format!("\n{}\n", "Major updates".bold()));
        for update in &summary.major_updates {
            out.push_str(&format!(
                "  {} {} ({})\n",
                "▸".blue(),
                update.title.bold(),
                update.timeline
            ));
            out.push_str(&format!("    {}\n", update.description));
            out.push_str(&format!("    {}\n", update.relevance_to_user.dimmed()));
        }
    }

    if !summary.recommendations.is_empty() {
        out.push_str(&format!("\n{}\n", "Recommendations".bold()));
        for rec in &summary.recommendations {
            out.push_str(&format!(
                "  {} {} {}\n",
                priority_label(rec.priority),
                rec.title.bold(),
                format!("({})", rec.timeframe).dimmed()
            ));
            out.push_str(&format!("    {}\n", rec.description));
            for step in &rec.action_steps {
                out.push_str(&format!("    {} {}\n", "→".green(), step));
            }
            if !rec.expected_benefit.is_empty() {
                out.push_str(&format!("    Expected benefit: {}\n", rec.expected_benefit));
            }
        }
    }

    out
}
