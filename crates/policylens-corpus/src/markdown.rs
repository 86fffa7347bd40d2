//! Markdown policy corpus parsing and loading
//!
//! Layout understood by the parser:
//!
//! ```markdown
//! # Housing
//!
//! ## Starter Homes for Young Families
//! - id: housing-starter-homes
//! - impact: high
//! - timeline: 2025-2027
//! - budget: 8 billion
//! - targets: young-adults, families, middle-income
//! - benefits: Purchase prices below market level; Lower down payment
//! - eligibility: Household income within the middle-income bracket
//!
//! Starter Homes offer middle-income families a first step ...
//! ```
//!
//! `#` headings set the category for the passages below them, `##` headings
//! start a passage, `key: value` bullets carry metadata and paragraphs form
//! the content. The first paragraph doubles as the summary unless a
//! `summary` bullet is given.

use async_trait::async_trait;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use policylens_core::{
    CorpusLoader, Error, ImpactLevel, PolicyCategory, PolicyCorpus, PolicyPassage, Result,
};

const DEFAULT_TIMELINE: &str = "Not specified";

/// Metadata bullet keys and the aliases accepted for them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Id,
    Category,
    Impact,
    Timeline,
    Budget,
    Targets,
    Benefits,
    Eligibility,
    Summary,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase().replace([' ', '_'], "-");
        match key.as_str() {
            "id" => Some(Self::Id),
            "category" => Some(Self::Category),
            "impact" | "impact-level" => Some(Self::Impact),
            "timeline" => Some(Self::Timeline),
            "budget" => Some(Self::Budget),
            "targets" | "target-demographics" | "audience" => Some(Self::Targets),
            "benefits" | "key-benefits" => Some(Self::Benefits),
            "eligibility" | "eligibility-criteria" => Some(Self::Eligibility),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct PassageDraft {
    title: String,
    category: Option<PolicyCategory>,
    fields: HashMap<Field, String>,
    paragraphs: Vec<String>,
}

/// Parser for the markdown policy layout
pub struct MarkdownParser {
    field_pattern: Regex,
    amount_pattern: Regex,
}

impl MarkdownParser {
    pub fn new() -> Result<Self> {
        let field_pattern = Regex::new(r"^\s*([A-Za-z][A-Za-z _-]*?)\s*:\s*(.+?)\s*$")
            .map_err(|e| Error::Corpus(format!("invalid field pattern: {}", e)))?;
        let amount_pattern =
            Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(billion|bn|million|m)?\b")
                .map_err(|e| Error::Corpus(format!("invalid amount pattern: {}", e)))?;

        Ok(Self {
            field_pattern,
            amount_pattern,
        })
    }

    /// Parse one markdown document into passages, in document order
    pub fn parse(&self, markdown: &str) -> Vec<PolicyPassage> {
        let mut passages = Vec::new();
        let mut category: Option<PolicyCategory> = None;
        let mut draft: Option<PassageDraft> = None;
        let mut text = String::new();
        let mut item_depth = 0usize;

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading { .. }) => {
                    text.clear();
                }
                Event::End(TagEnd::Heading(level)) => {
                    let title = text.trim().to_string();
                    match level {
                        HeadingLevel::H1 => {
                            self.finish(draft.take(), &mut passages);
                            category = title.parse().ok();
                            if category.is_none() {
                                warn!("Unknown policy category heading: {}", title);
                            }
                        }
                        HeadingLevel::H2 => {
                            self.finish(draft.take(), &mut passages);
                            draft = Some(PassageDraft {
                                title,
                                category,
                                ..Default::default()
                            });
                        }
                        _ => {
                            if let Some(d) = draft.as_mut() {
                                d.paragraphs.push(title);
                            }
                        }
                    }
                    text.clear();
                }
                Event::Start(Tag::Item) => {
                    if item_depth == 0 {
                        text.clear();
                    }
                    item_depth += 1;
                }
                Event::End(TagEnd::Item) => {
                    item_depth = item_depth.saturating_sub(1);
                    if item_depth == 0 {
                        if let Some(d) = draft.as_mut() {
                            self.apply_item(d, text.trim());
                        }
                        text.clear();
                    }
                }
                Event::Start(Tag::Paragraph) if item_depth == 0 => {
                    text.clear();
                }
                Event::End(TagEnd::Paragraph) if item_depth == 0 => {
                    let paragraph = text.trim();
                    if let Some(d) = draft.as_mut() {
                        if !paragraph.is_empty() {
                            d.paragraphs.push(paragraph.to_string());
                        }
                    }
                    text.clear();
                }
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                _ => {}
            }
        }

        self.finish(draft, &mut passages);
        passages
    }

    fn apply_item(&self, draft: &mut PassageDraft, item: &str) {
        if let Some(captures) = self.field_pattern.captures(item) {
            if let Some(field) = Field::from_key(&captures[1]) {
                draft.fields.insert(field, captures[2].to_string());
                return;
            }
        }
        if !item.is_empty() {
            draft.paragraphs.push(item.to_string());
        }
    }

    fn finish(&self, draft: Option<PassageDraft>, passages: &mut Vec<PolicyPassage>) {
        let Some(draft) = draft else {
            return;
        };
        match self.build(draft) {
            Ok(passage) => passages.push(passage),
            Err(e) => warn!("Skipping policy passage: {}", e),
        }
    }

    fn build(&self, mut draft: PassageDraft) -> Result<PolicyPassage> {
        let category = match draft.fields.remove(&Field::Category) {
            Some(value) => value.parse()?,
            None => draft.category.ok_or_else(|| {
                Error::Corpus(format!("passage '{}' has no category", draft.title))
            })?,
        };

        let impact = match draft.fields.remove(&Field::Impact) {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("Passage '{}': {}, using medium", draft.title, e);
                ImpactLevel::Medium
            }),
            None => ImpactLevel::Medium,
        };

        let budget = draft
            .fields
            .remove(&Field::Budget)
            .and_then(|value| self.parse_amount(&value));

        let summary = draft
            .fields
            .remove(&Field::Summary)
            .or_else(|| draft.paragraphs.first().cloned())
            .unwrap_or_else(|| draft.title.clone());

        let content = if draft.paragraphs.is_empty() {
            summary.clone()
        } else {
            draft.paragraphs.join("\n\n")
        };

        let eligibility = draft
            .fields
            .remove(&Field::Eligibility)
            .map(|value| split_list(&value, ';'))
            .filter(|criteria| !criteria.is_empty());

        let id = draft
            .fields
            .remove(&Field::Id)
            .unwrap_or_else(|| slug(category, &draft.title));

        Ok(PolicyPassage {
            id,
            category,
            title: draft.title,
            content,
            summary,
            target_demographics: draft
                .fields
                .remove(&Field::Targets)
                .map(|value| {
                    split_list(&value, ',')
                        .into_iter()
                        .map(|t| t.to_lowercase())
                        .collect()
                })
                .unwrap_or_default(),
            impact,
            timeline: draft
                .fields
                .remove(&Field::Timeline)
                .unwrap_or_else(|| DEFAULT_TIMELINE.to_string()),
            budget,
            key_benefits: draft
                .fields
                .remove(&Field::Benefits)
                .map(|value| split_list(&value, ';'))
                .unwrap_or_default(),
            eligibility_criteria: eligibility,
        })
    }

    /// Parse amounts such as `31.5 billion`, `HK$450 million` or `1,200,000`
    fn parse_amount(&self, value: &str) -> Option<f64> {
        let captures = self.amount_pattern.captures(value)?;
        let number: f64 = captures[1].replace(',', "").parse().ok()?;
        let multiplier = match captures.get(2).map(|m| m.as_str().to_lowercase()) {
            Some(unit) if unit == "billion" || unit == "bn" => 1e9,
            Some(unit) if unit == "million" || unit == "m" => 1e6,
            _ => 1.0,
        };
        Some(number * multiplier)
    }
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Stable id from category and title, e.g. `housing-starter-homes`
fn slug(category: PolicyCategory, title: &str) -> String {
    let words: Vec<String> = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
        .collect();
    format!("{}-{}", category.as_str(), words.join("-"))
}

/// Give repeated ids a numeric suffix, keeping the first occurrence as is.
/// Suffixed ids never collide with any id emitted before them.
pub(crate) fn dedupe_ids(passages: &mut [PolicyPassage]) {
    let mut emitted: HashSet<String> = HashSet::new();
    for passage in passages.iter_mut() {
        if emitted.insert(passage.id.clone()) {
            continue;
        }
        let mut suffix = 2;
        let renamed = loop {
            let candidate = format!("{}-{}", passage.id, suffix);
            if !emitted.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        debug!("Renaming duplicate passage id {} to {}", passage.id, renamed);
        emitted.insert(renamed.clone());
        passage.id = renamed;
    }
}

/// Loads passages from a markdown file or a directory of markdown files
pub struct MarkdownCorpusLoader {
    path: PathBuf,
}

impl MarkdownCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn markdown_files(&self) -> Result<Vec<PathBuf>> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        if metadata.is_file() {
            return Ok(vec![self.path.clone()]);
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_markdown(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

#[async_trait]
impl CorpusLoader for MarkdownCorpusLoader {
    async fn load(&self) -> Result<PolicyCorpus> {
        let parser = MarkdownParser::new()?;
        let mut passages = Vec::new();

        for file in self.markdown_files().await? {
            let markdown = tokio::fs::read_to_string(&file).await?;
            let parsed = parser.parse(&markdown);
            debug!("Parsed {} passages from {}", parsed.len(), file.display());
            passages.extend(parsed);
        }

        if passages.is_empty() {
            return Err(Error::Corpus(format!(
                "no policy passages found in {}",
                self.path.display()
            )));
        }

        dedupe_ids(&mut passages);
        Ok(PolicyCorpus::new(passages, self.source()))
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}
