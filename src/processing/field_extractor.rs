//! Rule-based extraction of identity fields, skills and role history
//!
//! Every rule is a pure function from plain text to an optional value. Rules
//! are kept in priority order; for each field the first rule that finds
//! something wins and later rules for that field are skipped. Nothing in here
//! can fail once the extractor is built.

use crate::config::ExtractionConfig;
use crate::error::{Result, ResumeParserError};
use crate::processing::text_processor::has_word_boundaries;
use aho_corasick::AhoCorasick;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Structured fields recovered from a resume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub roles: Option<String>,
}

impl ResumeFields {
    fn is_set(&self, field: Field) -> bool {
        match field {
            Field::Name => self.name.is_some(),
            Field::Email => self.email.is_some(),
            Field::Phone => self.phone.is_some(),
            Field::Skills => !self.skills.is_empty(),
            Field::Roles => self.roles.is_some(),
        }
    }

    fn set(&mut self, field: Field, value: FieldValue) {
        match field {
            Field::Name => self.name = Some(value.into_text()),
            Field::Email => self.email = Some(value.into_text()),
            Field::Phone => self.phone = Some(value.into_text()),
            Field::Skills => self.skills = value.into_set(),
            Field::Roles => self.roles = Some(value.into_text()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Skills,
    Roles,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Email => write!(f, "email"),
            Field::Phone => write!(f, "phone"),
            Field::Skills => write!(f, "skills"),
            Field::Roles => write!(f, "roles"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Set(BTreeSet<String>),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Set(items) => items.into_iter().collect::<Vec<_>>().join(", "),
        }
    }

    fn into_set(self) -> BTreeSet<String> {
        match self {
            FieldValue::Text(text) => BTreeSet::from([text]),
            FieldValue::Set(items) => items,
        }
    }
}

/// How the candidate name is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameStrategy {
    /// Text after a `Name:` label
    Label,
    /// First line of 2-4 words without digits
    Heuristic,
    LabelThenHeuristic,
}

/// How the skills set is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillsStrategy {
    /// Items listed after a `Skills:` label
    Label,
    /// Known skill terms found anywhere in the text
    Vocabulary,
    LabelThenVocabulary,
}

/// One independent extraction rule
pub trait FieldRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn field(&self) -> Field;
    fn apply(&self, text: &str) -> Option<FieldValue>;
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ResumeParserError::TextProcessing(format!("Invalid pattern '{}': {}", pattern, e)))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub struct EmailRule {
    pattern: Regex,
}

impl EmailRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(r"(?i)[\w.-]+@[\w.-]+\.\w+")?,
        })
    }
}

impl FieldRule for EmailRule {
    fn name(&self) -> &'static str {
        "email-pattern"
    }

    fn field(&self) -> Field {
        Field::Email
    }

    fn apply(&self, text: &str) -> Option<FieldValue> {
        self.pattern
            .find(text)
            .map(|m| FieldValue::Text(m.as_str().to_string()))
    }
}

/// Digit runs on a single line, optionally led by `+` or `(`, holding 9-13 digits
pub struct PhoneRule {
    pattern: Regex,
    min_digits: usize,
    max_digits: usize,
}

impl PhoneRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(r"\+?\(?\d[\d \-()]*\d")?,
            min_digits: 9,
            max_digits: 13,
        })
    }

    /// Longest prefix of a candidate that ends on a whole digit group and holds an
    /// allowed number of digits. A gap with more than one space (`555 - 2`) ends
    /// the number, so trailing years or counts on the same line are cut off.
    fn longest_number<'a>(&self, candidate: &'a str) -> Option<&'a str> {
        let mut best = None;
        let mut digits = 0;
        let mut gap_spaces = 0;
        let mut chars = candidate.char_indices().peekable();

        while let Some((index, c)) = chars.next() {
            if c.is_ascii_digit() {
                digits += 1;
                gap_spaces = 0;
                if digits > self.max_digits {
                    break;
                }
                let group_ends = chars.peek().map_or(true, |(_, next)| !next.is_ascii_digit());
                if group_ends && digits >= self.min_digits {
                    best = Some(&candidate[..index + c.len_utf8()]);
                }
            } else if c == ' ' {
                gap_spaces += 1;
                if gap_spaces > 1 {
                    break;
                }
            }
        }

        best
    }
}

impl FieldRule for PhoneRule {
    fn name(&self) -> &'static str {
        "phone-pattern"
    }

    fn field(&self) -> Field {
        Field::Phone
    }

    fn apply(&self, text: &str) -> Option<FieldValue> {
        self.pattern
            .find_iter(text)
            .find_map(|m| self.longest_number(m.as_str()))
            .map(|number| FieldValue::Text(number.to_string()))
    }
}

pub struct NameLabelRule {
    pattern: Regex,
}

impl NameLabelRule {
    pub fn new() -> Result<Self> {
        // The label may sit on its own line with the value below it
        Ok(Self {
            pattern: compile(r"(?im)^[ \t]*name[ \t]*[:\-]\s*([^\n]+)")?,
        })
    }
}

impl FieldRule for NameLabelRule {
    fn name(&self) -> &'static str {
        "name-label"
    }

    fn field(&self) -> Field {
        Field::Name
    }

    fn apply(&self, text: &str) -> Option<FieldValue> {
        let captures = self.pattern.captures(text)?;
        non_empty(captures.get(1)?.as_str()).map(FieldValue::Text)
    }
}

pub struct NameHeuristicRule;

impl NameHeuristicRule {
    fn looks_like_name(line: &str) -> bool {
        let words = line.split_whitespace().count();
        (2..=4).contains(&words) && !line.chars().any(char::is_numeric)
    }
}

impl FieldRule for NameHeuristicRule {
    fn name(&self) -> &'static str {
        "name-heuristic"
    }

    fn field(&self) -> Field {
        Field::Name
    }

    fn apply(&self, text: &str) -> Option<FieldValue> {
        text.lines()
            .map(str::trim)
            .find(|line| Self::looks_like_name(line))
            .map(|line| FieldValue::Text(line.to_string()))
    }
}

pub struct SkillsLabelRule {
    pattern: Regex,
}

impl SkillsLabelRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(r"(?i)\bskills[ \t]*[:\-]\s*([^\n]+)")?,
        })
    }
}

impl FieldRule for SkillsLabelRule {
    fn name(&self) -> &'static str {
        "skills-label"
    }

    fn field(&self) -> Field {
        Field::Skills
    }

    fn apply(&self, text: &str) -> Option<FieldValue> {
        let line = self.pattern.captures(text)?.get(1)?.as_str();
        let items: BTreeSet<String> = line
            .split([',', ';'])
            .filter_map(non_empty)
            .collect();
        (!items.is_empty()).then_some(FieldValue::Set(items))
    }
}

/// Matches a fixed skill vocabulary as whole words, case-insensitively
pub struct SkillsVocabularyRule {
    matcher: Option<AhoCorasick>,
    vocabulary: Vec<String>,
}

impl SkillsVocabularyRule {
    pub fn new(terms: &[String]) -> Result<Self> {
        let vocabulary: Vec<String> = terms
            .iter()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let matcher = if vocabulary.is_empty() {
            None
        } else {
            let matcher = AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(&vocabulary)
                .map_err(|e| ResumeParserError::TextProcessing(format!("Failed to build skill matcher: {}", e)))?;
            Some(matcher)
        };

        Ok(Self { matcher, vocabulary })
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}

impl FieldRule for SkillsVocabularyRule {
    fn name(&self) -> &'static str {
        "skills-vocabulary"
    }

    fn field(&self) -> Field {
        Field::Skills
    }

    fn apply(&self, text: &str) -> Option<FieldValue> {
        let matcher = self.matcher.as_ref()?;

        // Overlapping search so "java" inside "javascript" cannot hide a later hit
        let found: BTreeSet<String> = matcher
            .find_overlapping_iter(text)
            .filter(|m| has_word_boundaries(text, m.start(), m.end()))
            .map(|m| self.vocabulary[m.pattern().as_usize()].clone())
            .collect();

        (!found.is_empty()).then_some(FieldValue::Set(found))
    }
}

/// Longest body following a responsibilities/experience/roles header
pub struct RolesSectionRule {
    header: Regex,
    body_limit: usize,
}

impl RolesSectionRule {
    pub fn new(body_limit: usize) -> Result<Self> {
        Ok(Self {
            header: compile(r"(?i)(?:responsibilities|experience|work experience|roles)[^\n]*\n")?,
            body_limit,
        })
    }
}

impl FieldRule for RolesSectionRule {
    fn name(&self) -> &'static str {
        "roles-section"
    }

    fn field(&self) -> Field {
        Field::Roles
    }

    fn apply(&self, text: &str) -> Option<FieldValue> {
        let mut best: Option<(&str, usize)> = None;
        let mut position = 0;

        while let Some(header) = self.header.find_at(text, position) {
            let body_start = header.end();
            let body_end = text[body_start..]
                .char_indices()
                .nth(self.body_limit)
                .map_or(text.len(), |(offset, _)| body_start + offset);
            let body = &text[body_start..body_end];
            let length = body.chars().count();

            // Strictly longer only: the earliest of equally long bodies wins
            if best.map_or(true, |(_, best_length)| length > best_length) {
                best = Some((body, length));
            }

            // Matches never overlap: the next header is searched after this body
            position = body_end;
        }

        best.and_then(|(body, _)| non_empty(body)).map(FieldValue::Text)
    }
}

/// Applies the configured rules to plain text
pub struct FieldExtractor {
    rules: Vec<Box<dyn FieldRule>>,
}

impl FieldExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let mut rules: Vec<Box<dyn FieldRule>> = vec![
            Box::new(EmailRule::new()?),
            Box::new(PhoneRule::new()?),
        ];

        match config.name_strategy {
            NameStrategy::Label => rules.push(Box::new(NameLabelRule::new()?)),
            NameStrategy::Heuristic => rules.push(Box::new(NameHeuristicRule)),
            NameStrategy::LabelThenHeuristic => {
                rules.push(Box::new(NameLabelRule::new()?));
                rules.push(Box::new(NameHeuristicRule));
            }
        }

        match config.skills_strategy {
            SkillsStrategy::Label => rules.push(Box::new(SkillsLabelRule::new()?)),
            SkillsStrategy::Vocabulary => {
                rules.push(Box::new(SkillsVocabularyRule::new(&config.skill_vocabulary)?))
            }
            SkillsStrategy::LabelThenVocabulary => {
                rules.push(Box::new(SkillsLabelRule::new()?));
                rules.push(Box::new(SkillsVocabularyRule::new(&config.skill_vocabulary)?));
            }
        }

        rules.push(Box::new(RolesSectionRule::new(config.role_body_limit)?));

        Ok(Self::with_rules(rules))
    }

    /// Build from an explicit, already prioritized rule list
    pub fn with_rules(rules: Vec<Box<dyn FieldRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn extract(&self, text: &str) -> ResumeFields {
        let mut fields = ResumeFields::default();

        for rule in &self.rules {
            let field = rule.field();
            if fields.is_set(field) {
                continue;
            }
            if let Some(value) = rule.apply(text) {
                debug!("Rule '{}' filled {}", rule.name(), field);
                fields.set(field, value);
            }
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const SAMPLE: &str = "John A Smith\n\
        Email: john.smith@example.com | Phone: +1 (555) 123-4567\n\
        \n\
        Summary\n\
        Backend developer who enjoys Python, SQL and AWS.\n\
        \n\
        Skills: Python, SQL; Docker\n\
        \n\
        Work Experience\n\
        Built data pipelines with pandas and Django.\n";

    fn extractor_with(name: NameStrategy, skills: SkillsStrategy) -> FieldExtractor {
        let mut config = Config::default().extraction;
        config.name_strategy = name;
        config.skills_strategy = skills;
        FieldExtractor::new(&config).unwrap()
    }

    fn default_extractor() -> FieldExtractor {
        FieldExtractor::new(&Config::default().extraction).unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extracts_all_fields_from_sample() {
        let fields = default_extractor().extract(SAMPLE);

        assert_eq!(fields.name.as_deref(), Some("John A Smith"));
        assert_eq!(fields.email.as_deref(), Some("john.smith@example.com"));
        assert_eq!(fields.phone.as_deref(), Some("+1 (555) 123-4567"));
        assert_eq!(fields.skills, set(&["aws", "django", "pandas", "python", "sql"]));
        assert_eq!(
            fields.roles.as_deref(),
            Some("Built data pipelines with pandas and Django.")
        );
    }

    #[test]
    fn test_empty_text_yields_absent_fields() {
        let fields = default_extractor().extract("");
        assert_eq!(fields, ResumeFields::default());
    }

    #[test]
    fn test_email_is_case_insensitive_and_first_wins() {
        let rule = EmailRule::new().unwrap();
        let value = rule.apply("Contact: JANE.DOE@Mail.Example.ORG or jane@other.io.");
        assert_eq!(value, Some(FieldValue::Text("JANE.DOE@Mail.Example.ORG".to_string())));
        assert_eq!(rule.apply("no address here"), None);
    }

    #[test]
    fn test_phone_digit_count_bounds() {
        let rule = PhoneRule::new().unwrap();

        assert_eq!(
            rule.apply("Call 555-123-4567 today"),
            Some(FieldValue::Text("555-123-4567".to_string()))
        );
        // 8 digits is too short, the 10 digit number after it is taken
        assert_eq!(
            rule.apply("Worked 2015-2019\nPhone: (555) 987 6543"),
            Some(FieldValue::Text("(555) 987 6543".to_string()))
        );
        assert_eq!(rule.apply("ID 12345678901234"), None);
        assert_eq!(rule.apply("nothing numeric"), None);
    }

    #[test]
    fn test_phone_followed_by_other_numbers_on_the_line() {
        let rule = PhoneRule::new().unwrap();
        let phone = |number: &str| Some(FieldValue::Text(number.to_string()));

        assert_eq!(rule.apply("Phone: 555-123-4567 (2019 - 2024)"), phone("555-123-4567"));
        assert_eq!(rule.apply("Tel 555 123 4567 2020"), phone("555 123 4567"));
        assert_eq!(rule.apply("Call 555-123-4567 - 2 yrs"), phone("555-123-4567"));
        assert_eq!(rule.apply("+1 (555) 123-4567 ext"), phone("+1 (555) 123-4567"));
    }

    #[test]
    fn test_phone_does_not_span_lines() {
        let rule = PhoneRule::new().unwrap();
        assert_eq!(rule.apply("12345\n6789012"), None);
    }

    #[test]
    fn test_name_label() {
        let rule = NameLabelRule::new().unwrap();
        assert_eq!(
            rule.apply("Resume\nNAME: Jane Q. Public\nEmail: x@y.z"),
            Some(FieldValue::Text("Jane Q. Public".to_string()))
        );
        assert_eq!(
            rule.apply("Name:\n  Ada Lovelace\n"),
            Some(FieldValue::Text("Ada Lovelace".to_string()))
        );
        assert_eq!(rule.apply("Company Name: Acme"), None);
    }

    #[test]
    fn test_name_heuristic_skips_lines_with_digits() {
        let rule = NameHeuristicRule;
        let text = "Resume\nExperience: 5 years\nJohn A Smith\nSenior Backend Engineer";
        assert_eq!(rule.apply(text), Some(FieldValue::Text("John A Smith".to_string())));
        assert!(!NameHeuristicRule::looks_like_name("Experience: 5 years"));
        assert!(!NameHeuristicRule::looks_like_name("Madonna"));
        assert!(!NameHeuristicRule::looks_like_name("one two three four five"));
    }

    #[test]
    fn test_name_strategies() {
        let text = "Curriculum Vitae\nName: Grace Hopper\n";

        let label = extractor_with(NameStrategy::Label, SkillsStrategy::Vocabulary);
        assert_eq!(label.extract(text).name.as_deref(), Some("Grace Hopper"));

        let heuristic = extractor_with(NameStrategy::Heuristic, SkillsStrategy::Vocabulary);
        assert_eq!(heuristic.extract(text).name.as_deref(), Some("Curriculum Vitae"));

        let chained = extractor_with(NameStrategy::LabelThenHeuristic, SkillsStrategy::Vocabulary);
        assert_eq!(chained.extract(text).name.as_deref(), Some("Grace Hopper"));
        assert_eq!(
            chained.extract("Alan Turing\nMathematician").name.as_deref(),
            Some("Alan Turing")
        );
    }

    #[test]
    fn test_skills_label_keeps_items_verbatim() {
        let rule = SkillsLabelRule::new().unwrap();
        let value = rule.apply("Technical Skills: Rust, Node.js ; PostgreSQL,, \nOther: x");
        assert_eq!(value, Some(FieldValue::Set(set(&["Node.js", "PostgreSQL", "Rust"]))));
        assert_eq!(rule.apply("no label"), None);
    }

    #[test]
    fn test_skills_vocabulary_respects_word_boundaries() {
        let rule = SkillsVocabularyRule::new(&crate::config::default_skill_vocabulary()).unwrap();
        let value = rule.apply("JavaScript, C++ and MACHINE LEARNING; reactive systems; Python3");
        assert_eq!(
            value,
            Some(FieldValue::Set(set(&["c++", "javascript", "machine learning"])))
        );
    }

    #[test]
    fn test_skills_vocabulary_is_deduplicated() {
        let terms = vec!["SQL".to_string(), "sql ".to_string(), String::new()];
        let rule = SkillsVocabularyRule::new(&terms).unwrap();
        assert_eq!(rule.vocabulary(), ["sql".to_string()]);
        assert_eq!(rule.apply("SQL sql Sql"), Some(FieldValue::Set(set(&["sql"]))));
    }

    #[test]
    fn test_empty_vocabulary_finds_nothing() {
        let rule = SkillsVocabularyRule::new(&[]).unwrap();
        assert_eq!(rule.apply("python sql"), None);
    }

    #[test]
    fn test_skills_label_then_vocabulary_fallback() {
        let extractor = extractor_with(NameStrategy::Heuristic, SkillsStrategy::LabelThenVocabulary);
        assert_eq!(extractor.extract("Skills: Rust, Go").skills, set(&["Go", "Rust"]));
        assert_eq!(extractor.extract("I write python daily").skills, set(&["python"]));
    }

    #[test]
    fn test_roles_longest_body_wins() {
        let rule = RolesSectionRule::new(1000).unwrap();
        let text = "Roles:\nshort\n";
        assert_eq!(rule.apply(text), Some(FieldValue::Text("short".to_string())));

        let rule = RolesSectionRule::new(10).unwrap();
        let text = "Experience\nabc\nResponsibilities\n0123456789ABC";
        // first body is "abc\nRespon" (10 chars), the scan resumes inside the header
        // line, so the second header is never seen as a header
        assert_eq!(rule.apply(text), Some(FieldValue::Text("abc\nRespon".to_string())));
    }

    #[test]
    fn test_roles_picks_longer_of_separate_sections() {
        let rule = RolesSectionRule::new(8).unwrap();
        let text = "Roles\nab\n\n\n\n\n\n\nExperience\nlong body text";
        // first body: "ab\n\n\n\n\n\n" (8 chars) trims to "ab"; second body "long bod" is
        // also 8 chars, so the first one is kept
        assert_eq!(rule.apply(text), Some(FieldValue::Text("ab".to_string())));

        let text = "Roles\nab\nExperience\nlong body text";
        // "ab\nExper" swallows the second header
        assert_eq!(rule.apply(text), Some(FieldValue::Text("ab\nExper".to_string())));
    }

    #[test]
    fn test_roles_absent_without_header_or_body() {
        let rule = RolesSectionRule::new(1000).unwrap();
        assert_eq!(rule.apply("No relevant headers here"), None);
        assert_eq!(rule.apply("Experience"), None);
        assert_eq!(rule.apply("Experience\n   \n"), None);
    }

    #[test]
    fn test_custom_rule_list() {
        let extractor = FieldExtractor::with_rules(vec![Box::new(NameHeuristicRule)]);
        let fields = extractor.extract("Ada Lovelace\nada@example.com");
        assert_eq!(fields.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(fields.email, None);
        assert_eq!(extractor.rule_names(), vec!["name-heuristic"]);
    }
}
