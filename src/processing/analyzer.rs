//! Analysis engine: plain text + job description -> structured report

use crate::config::Config;
use crate::error::{Result, ResumeParserError};
use crate::input::{extract_text, DocumentFormat};
use crate::processing::field_extractor::{FieldExtractor, ResumeFields};
use crate::processing::keyword_matcher::{KeywordMatcher, MatchMode, MatchResult};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

/// Everything computed for one resume against one job description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub source: String,
    pub format: DocumentFormat,
    pub fields: ResumeFields,
    pub match_result: MatchResult,
    /// Characters of extracted resume text
    pub text_length: usize,
    pub generated_at: DateTime<Utc>,
}

pub struct AnalysisEngine {
    field_extractor: FieldExtractor,
    matcher: KeywordMatcher,
}

impl AnalysisEngine {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            field_extractor: FieldExtractor::new(&config.extraction)?,
            matcher: KeywordMatcher::new(config.matching.mode),
        })
    }

    /// Override the configured match mode
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.matcher = KeywordMatcher::new(mode);
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.matcher.mode()
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.field_extractor.rule_names()
    }

    /// Extract text from raw document bytes, then analyze it
    pub fn analyze_document(
        &self,
        source: &str,
        bytes: &[u8],
        format: DocumentFormat,
        job_description: &str,
    ) -> Result<AnalysisReport> {
        validate_job_description(job_description)?;
        let text = extract_text(bytes, format)?;
        self.analyze_text(source, format, &text, job_description)
    }

    pub fn analyze_text(
        &self,
        source: &str,
        format: DocumentFormat,
        text: &str,
        job_description: &str,
    ) -> Result<AnalysisReport> {
        validate_job_description(job_description)?;

        info!("Extracting resume fields from {} ({} characters)", source, text.chars().count());
        let fields = self.field_extractor.extract(text);

        info!("Matching against job description in {} mode", self.matcher.mode());
        let match_result = self.matcher.match_text(text, job_description);

        Ok(AnalysisReport {
            source: source.to_string(),
            format,
            fields,
            match_result,
            text_length: text.chars().count(),
            generated_at: Utc::now(),
        })
    }
}

/// A job description must contain something other than whitespace
pub fn validate_job_description(job_description: &str) -> Result<()> {
    if job_description.trim().is_empty() {
        return Err(ResumeParserError::InvalidInput(
            "Job description or keyword list must not be empty".to_string(),
        ));
    }
    Ok(())
}
