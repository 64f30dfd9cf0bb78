//! Job description keyword matching and scoring
//!
//! Two modes share one matcher:
//! - `Keyword`: the job description is a comma separated list of phrases, each
//!   looked up as a whole word in the resume.
//! - `Frequency`: both texts become word multisets and the score is the share
//!   of job description word occurrences covered by the resume.

use crate::error::ResumeParserError;
use crate::processing::text_processor::{contains_whole_word, WordMultiset};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Keyword,
    #[default]
    Frequency,
}

impl FromStr for MatchMode {
    type Err = ResumeParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyword" | "keywords" | "boolean" => Ok(MatchMode::Keyword),
            "frequency" | "freq" => Ok(MatchMode::Frequency),
            _ => Err(ResumeParserError::InvalidInput(format!(
                "Invalid match mode: {}. Supported: keyword, frequency",
                s
            ))),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Keyword => write!(f, "keyword"),
            MatchMode::Frequency => write!(f, "frequency"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub mode: MatchMode,
    /// 0-100
    pub score: u8,
    pub matched_keywords: Vec<String>,
    pub unmatched_keywords: Vec<String>,
}

impl MatchResult {
    pub fn total_keywords(&self) -> usize {
        self.matched_keywords.len() + self.unmatched_keywords.len()
    }
}

pub struct KeywordMatcher {
    mode: MatchMode,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(MatchMode::default())
    }
}

impl KeywordMatcher {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Match resume text against a job description using the configured mode
    pub fn match_text(&self, resume_text: &str, job_description: &str) -> MatchResult {
        match self.mode {
            MatchMode::Keyword => {
                Self::match_keywords(resume_text, &Self::split_keywords(job_description))
            }
            MatchMode::Frequency => Self::match_multisets(
                &WordMultiset::from_text(resume_text),
                &WordMultiset::from_text(job_description),
            ),
        }
    }

    /// Comma separated phrases, trimmed, without blanks or case-insensitive repeats
    pub fn split_keywords(job_description: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        job_description
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .filter(|keyword| seen.insert(keyword.to_lowercase()))
            .map(str::to_string)
            .collect()
    }

    /// Whole-word presence test for each keyword; order of the input is kept
    pub fn match_keywords(resume_text: &str, keywords: &[String]) -> MatchResult {
        let (matched_keywords, unmatched_keywords): (Vec<String>, Vec<String>) = keywords
            .iter()
            .cloned()
            .partition(|keyword| contains_whole_word(resume_text, keyword));

        MatchResult {
            mode: MatchMode::Keyword,
            score: percentage(matched_keywords.len(), keywords.len()),
            matched_keywords,
            unmatched_keywords,
        }
    }

    /// Multiset overlap score; keyword lists in ascending order
    pub fn match_multisets(resume: &WordMultiset, job: &WordMultiset) -> MatchResult {
        let (matched_keywords, unmatched_keywords): (Vec<String>, Vec<String>) = job
            .tokens()
            .map(str::to_string)
            .partition(|token| resume.contains(token));

        MatchResult {
            mode: MatchMode::Frequency,
            score: percentage(job.overlap(resume), job.total()),
            matched_keywords,
            unmatched_keywords,
        }
    }
}

/// floor(100 * part / total), 0 for an empty total
fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (part.min(total) * 100 / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_mode_example() {
        let matcher = KeywordMatcher::new(MatchMode::Keyword);
        let result = matcher.match_text("I know Python and SQL very well", "python, java, sql");

        assert_eq!(result.mode, MatchMode::Keyword);
        assert_eq!(result.matched_keywords, strings(&["python", "sql"]));
        assert_eq!(result.unmatched_keywords, strings(&["java"]));
        assert_eq!(result.score, 66);
    }

    #[test]
    fn test_keyword_mode_whole_words_only() {
        let result = KeywordMatcher::match_keywords(
            "Senior JavaScript developer, machine learning hobbyist",
            &strings(&["Java", "JavaScript", "Machine Learning", "learn"]),
        );
        assert_eq!(result.matched_keywords, strings(&["JavaScript", "Machine Learning"]));
        assert_eq!(result.unmatched_keywords, strings(&["Java", "learn"]));
    }

    #[test]
    fn test_split_keywords_trims_and_deduplicates() {
        let keywords = KeywordMatcher::split_keywords(" Rust , rust,, SQL ,  ,Docker,");
        assert_eq!(keywords, strings(&["Rust", "SQL", "Docker"]));
        assert!(KeywordMatcher::split_keywords(" , ,").is_empty());
    }

    #[test]
    fn test_keyword_mode_without_keywords_scores_zero() {
        let result = KeywordMatcher::new(MatchMode::Keyword).match_text("python", "");
        assert_eq!(result.score, 0);
        assert_eq!(result.total_keywords(), 0);
    }

    #[test]
    fn test_frequency_mode_example() {
        let resume: WordMultiset = [("python", 2), ("sql", 1)].into_iter().collect();
        let job: WordMultiset = [("python", 1), ("sql", 1), ("java", 1)].into_iter().collect();

        let result = KeywordMatcher::match_multisets(&resume, &job);

        assert_eq!(result.score, 66);
        assert_eq!(result.matched_keywords, strings(&["python", "sql"]));
        assert_eq!(result.unmatched_keywords, strings(&["java"]));
    }

    #[test]
    fn test_frequency_mode_weights_repeated_words() {
        let matcher = KeywordMatcher::new(MatchMode::Frequency);
        // job: rust x3, go x1 -> resume covers rust once and go once = 2 of 4
        let result = matcher.match_text("Rust and Go", "rust rust rust go");
        assert_eq!(result.score, 50);
        assert_eq!(result.matched_keywords, strings(&["go", "rust"]));
        assert!(result.unmatched_keywords.is_empty());
    }

    #[test]
    fn test_frequency_mode_normalizes_text() {
        let matcher = KeywordMatcher::new(MatchMode::Frequency);
        let result = matcher.match_text("PYTHON!!! sql.", "Python, SQL; Java 8");
        assert_eq!(result.matched_keywords, strings(&["python", "sql"]));
        assert_eq!(result.unmatched_keywords, strings(&["java"]));
        assert_eq!(result.score, 66);
    }

    #[test]
    fn test_empty_job_description_scores_zero() {
        let matcher = KeywordMatcher::new(MatchMode::Frequency);
        assert_eq!(matcher.match_text("python sql", "").score, 0);
        assert_eq!(matcher.match_text("python sql", "123 !!!").score, 0);
    }

    #[test]
    fn test_identical_multisets_score_hundred() {
        let matcher = KeywordMatcher::new(MatchMode::Frequency);
        let text = "rust rust python sql";
        assert_eq!(matcher.match_text(text, text).score, 100);
    }

    #[test]
    fn test_frequency_score_is_idempotent() {
        let matcher = KeywordMatcher::default();
        let resume = "Built APIs in Rust and Python; tuned SQL queries.";
        let job = "Looking for Rust, Python, SQL and Kubernetes experience";
        assert_eq!(matcher.match_text(resume, job), matcher.match_text(resume, job));
    }

    #[test]
    fn test_partition_is_disjoint_and_complete() {
        let matcher = KeywordMatcher::new(MatchMode::Frequency);
        let job = "rust go rust python kotlin go";
        let result = matcher.match_text("python and go", job);

        let matched: HashSet<_> = result.matched_keywords.iter().collect();
        let unmatched: HashSet<_> = result.unmatched_keywords.iter().collect();
        assert!(matched.is_disjoint(&unmatched));

        let all: HashSet<String> = WordMultiset::from_text(job).tokens().map(str::to_string).collect();
        let covered: HashSet<String> = matched.union(&unmatched).map(|s| s.to_string()).collect();
        assert_eq!(covered, all);
    }

    #[test]
    fn test_match_mode_parsing() {
        assert_eq!("Keyword".parse::<MatchMode>().unwrap(), MatchMode::Keyword);
        assert_eq!("frequency".parse::<MatchMode>().unwrap(), MatchMode::Frequency);
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }
}
