//! Policy document segmentation
//!
//! Policy wordings (German and English) are split into logical sections by
//! recognising heading lines. A line becomes a heading when it is short and
//! either mentions a known section keyword or looks like a numbered heading
//! such as `2.3 Ausschlüsse`. Text before the first heading is dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Headings longer than this are treated as body text
const MAX_HEADING_CHARS: usize = 100;

/// Kind of policy section, derived from its heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Coverage,
    Exclusions,
    Deductibles,
    Limits,
    WaitingPeriods,
    PreAuthorization,
    /// Numbered heading without a recognised keyword
    General,
}

impl SectionType {
    /// Keyword table, checked in this order
    const KEYWORDS: [(SectionType, &'static [&'static str]); 6] = [
        (SectionType::Coverage, &["leistungen", "coverage", "erstattung", "benefits"]),
        (SectionType::Exclusions, &["ausschlüsse", "exclusions", "nicht erstattungsfähig"]),
        (SectionType::Deductibles, &["selbstbehalt", "eigenanteil", "deductible"]),
        (SectionType::Limits, &["höchstbeträge", "limits", "jahreshöchst", "maximum"]),
        (SectionType::WaitingPeriods, &["wartezeiten", "waiting period", "karenzzeit"]),
        (SectionType::PreAuthorization, &["genehmigung", "vorherige", "pre-authorization"]),
    ];

    /// Returns the snake_case name used in index metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Coverage => "coverage",
            SectionType::Exclusions => "exclusions",
            SectionType::Deductibles => "deductibles",
            SectionType::Limits => "limits",
            SectionType::WaitingPeriods => "waiting_periods",
            SectionType::PreAuthorization => "pre_authorization",
            SectionType::General => "general",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text of one page of a policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyPage {
    /// 1-based page number
    pub page_num: u32,
    /// Extracted page text
    pub text: String,
}

impl PolicyPage {
    pub fn new(page_num: u32, text: impl Into<String>) -> Self {
        Self {
            page_num,
            text: text.into(),
        }
    }
}

/// A logical section of a policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySection {
    pub policy_id: String,
    /// `{policy_id}_section_{n}`, numbered from 1
    pub section_id: String,
    pub section_type: SectionType,
    /// The heading line, trimmed
    pub title: String,
    /// Heading plus body lines, newline terminated
    pub text: String,
    /// Pages the section spans, in order of first appearance
    pub page_numbers: Vec<u32>,
}

/// Classifies a line as a section heading
///
/// Returns `None` for body text.
pub fn identify_section_type(line: &str) -> Option<SectionType> {
    if line.chars().count() >= MAX_HEADING_CHARS {
        return None;
    }

    let lower = line.trim().to_lowercase();
    let keyword_match = SectionType::KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(section_type, _)| *section_type);

    if keyword_match.is_some() {
        return keyword_match;
    }

    if is_numbered_heading(line) {
        return Some(SectionType::General);
    }

    None
}

/// Matches `^\d+\.?\d*\s+[A-Z]`
fn is_numbered_heading(line: &str) -> bool {
    let mut chars = line.chars().peekable();

    let mut leading_digits = 0;
    while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
        leading_digits += 1;
    }
    if leading_digits == 0 {
        return false;
    }

    if chars.peek() == Some(&'.') {
        chars.next();
    }
    while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
    }

    let mut whitespace = 0;
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
        whitespace += 1;
    }

    whitespace > 0 && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Splits policy pages into sections
pub fn segment_policy(pages: &[PolicyPage], policy_id: &str) -> Vec<PolicySection> {
    let mut sections: Vec<PolicySection> = Vec::new();
    let mut current: Option<PolicySection> = None;

    for page in pages {
        for line in page.text.split('\n') {
            if let Some(section_type) = identify_section_type(line) {
                if let Some(done) = current.take() {
                    sections.push(done);
                }

                let number = sections.len() + 1;
                current = Some(PolicySection {
                    policy_id: policy_id.to_string(),
                    section_id: format!("{policy_id}_section_{number}"),
                    section_type,
                    title: line.trim().to_string(),
                    text: format!("{line}\n"),
                    page_numbers: vec![page.page_num],
                });
            } else if let Some(section) = current.as_mut() {
                section.text.push_str(line);
                section.text.push('\n');
                if !section.page_numbers.contains(&page.page_num) {
                    section.page_numbers.push(page.page_num);
                }
            }
        }
    }

    if let Some(done) = current {
        sections.push(done);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_headings() {
        assert_eq!(identify_section_type("Leistungen"), Some(SectionType::Coverage));
        assert_eq!(identify_section_type("§ 4 Ausschlüsse"), Some(SectionType::Exclusions));
        assert_eq!(identify_section_type("Annual Deductible"), Some(SectionType::Deductibles));
        assert_eq!(identify_section_type("Wartezeiten"), Some(SectionType::WaitingPeriods));
    }

    #[test]
    fn test_first_keyword_table_entry_wins() {
        // "benefits" (coverage) is checked before "maximum" (limits)
        assert_eq!(identify_section_type("Maximum benefits"), Some(SectionType::Coverage));
    }

    #[test]
    fn test_numbered_heading_without_keyword_is_general() {
        assert_eq!(identify_section_type("3.1 Allgemeines"), Some(SectionType::General));
        assert_eq!(identify_section_type("12 Beitragszahlung"), Some(SectionType::General));
        assert_eq!(identify_section_type("3.1 allgemeines"), None);
        assert_eq!(identify_section_type("3.1Allgemeines"), None);
    }

    #[test]
    fn test_long_lines_are_body_text() {
        let line = format!("Leistungen {}", "x".repeat(100));
        assert_eq!(identify_section_type(&line), None);
    }
}
