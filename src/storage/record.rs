//! Saved resume records and their flat column encoding

use crate::processing::analyzer::AnalysisReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Values to persist for one explicit save action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub owner: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub roles: Option<String>,
    pub matched_keywords: Vec<String>,
    pub unmatched_keywords: Vec<String>,
    pub score: u8,
}

impl NewRecord {
    pub fn from_report(owner: &str, report: &AnalysisReport) -> Self {
        let fields = &report.fields;
        let result = &report.match_result;
        Self {
            owner: owner.to_string(),
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            skills: fields.skills.iter().cloned().collect(),
            roles: fields.roles.clone(),
            matched_keywords: result.matched_keywords.clone(),
            unmatched_keywords: result.unmatched_keywords.clone(),
            score: result.score,
        }
    }
}

/// A persisted row. Never updated after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub id: i64,
    pub owner: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub roles: Option<String>,
    pub matched_keywords: Vec<String>,
    pub unmatched_keywords: Vec<String>,
    pub score: u8,
    pub created_at: DateTime<Utc>,
}

impl SavedRecord {
    pub fn from_new(id: i64, record: NewRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner: record.owner,
            name: record.name,
            email: record.email,
            phone: record.phone,
            skills: record.skills,
            roles: record.roles,
            matched_keywords: record.matched_keywords,
            unmatched_keywords: record.unmatched_keywords,
            score: record.score,
            created_at,
        }
    }
}

/// Comma-join list items, escaping `\` and `,` so `split_list` restores them exactly.
///
/// Empty items are not representable: an empty list and `[""]` both encode to `""`.
pub fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.replace('\\', "\\\\").replace(',', "\\,"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn split_list(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = joined.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ',' => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_lists_are_comma_joined() {
        assert_eq!(join_list(&strings(&["python", "sql"])), "python,sql");
        assert_eq!(split_list("python,sql"), strings(&["python", "sql"]));
        assert_eq!(join_list(&[]), "");
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_items_with_separators_survive() {
        let items = strings(&["C, C++", r"back\slash", "trailing,", " spaced "]);
        let joined = join_list(&items);
        assert_eq!(joined, r"C\, C++,back\\slash,trailing\,, spaced ");
        assert_eq!(split_list(&joined), items);
    }
}
