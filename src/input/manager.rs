//! Input manager for handling different file types

use crate::error::{Result, ResumeParserError};
use crate::input::file_detector::DocumentFormat;
use crate::input::text_extractor;
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeParserError::InvalidInput(
                format!("File does not exist: {}", path.display())
            ));
        }

        let format = DocumentFormat::from_path(path);
        info!("Extracting {} text from: {}", format, path.display());

        // Unsupported formats degrade to empty text without touching the file
        let text = if format.is_supported() {
            let bytes = fs::read(path).await?;
            text_extractor::extract_text(&bytes, format)?
        } else {
            text_extractor::extract_text(&[], format)?
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
