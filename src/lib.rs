//! Resume parser library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod storage;

pub use config::Config;
pub use error::{Result, ResumeParserError};
pub use processing::{AnalysisEngine, AnalysisReport, MatchMode};
pub use storage::{ResumeStore, SavedRecord};
