//! Text processing and analysis module

pub mod text_processor;
pub mod field_extractor;
pub mod keyword_matcher;
pub mod analyzer;

pub use analyzer::{AnalysisEngine, AnalysisReport};
pub use field_extractor::{FieldExtractor, ResumeFields};
pub use keyword_matcher::{KeywordMatcher, MatchMode, MatchResult};
pub use text_processor::WordMultiset;
