//! Configuration management for the resume parser

use crate::error::{Result, ResumeParserError};
use crate::processing::field_extractor::{NameStrategy, SkillsStrategy};
use crate::processing::keyword_matcher::MatchMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub matching: MatchingConfig,
    pub storage: StorageConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub name_strategy: NameStrategy,
    pub skills_strategy: SkillsStrategy,
    pub skill_vocabulary: Vec<String>,
    /// Maximum number of characters captured after a roles header
    pub role_body_limit: usize,
    /// Reuse extracted text when the same path is read twice in one run
    #[serde(default = "default_cache_text")]
    pub cache_text: bool,
}

fn default_cache_text() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub mode: MatchMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub default_owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let database_path = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-parser")
            .join("resumes.db");

        Self {
            extraction: ExtractionConfig {
                name_strategy: NameStrategy::LabelThenHeuristic,
                skills_strategy: SkillsStrategy::Vocabulary,
                skill_vocabulary: default_skill_vocabulary(),
                role_body_limit: 1000,
                cache_text: true,
            },
            matching: MatchingConfig {
                mode: MatchMode::Frequency,
            },
            storage: StorageConfig {
                database_path,
                default_owner: "local".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

/// Skill terms recognised by the vocabulary strategy out of the box
pub fn default_skill_vocabulary() -> Vec<String> {
    vec![
        "python", "java", "c++", "sql", "flask", "django", "aws",
        "javascript", "excel", "pandas", "react", "machine learning",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    /// Load from an explicit path, writing defaults there if it does not exist yet
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeParserError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Overwrite `config_path` with defaults without reading what is there
    pub fn reset(config_path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(config_path)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeParserError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-parser")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.extraction.role_body_limit == 0 {
            return Err(ResumeParserError::Configuration(
                "extraction.role_body_limit must be greater than zero".to_string(),
            ));
        }
        if self.storage.default_owner.trim().is_empty() {
            return Err(ResumeParserError::Configuration(
                "storage.default_owner must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn database_path(&self) -> &Path {
        &self.storage.database_path
    }
}
