//! Affiliation keyword heuristics
//!
//! Both predicates are independent substring checks over the lowercased
//! affiliation. A string may match neither, one, or both.

use std::sync::LazyLock;

use regex::Regex;

/// Substrings marking a pharmaceutical/biotech company affiliation
pub const COMPANY_KEYWORDS: &[&str] = &["pharma", "pharmaceutical", "biotech", "biotechnology"];

/// Substrings marking an academic or clinical affiliation
pub const ACADEMIC_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "hospital",
    "academy",
    "school",
];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("invalid email pattern"));

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// Affiliation looks like a pharmaceutical/biotech company
pub fn is_company_affiliation(affiliation: &str) -> bool {
    contains_any(affiliation, COMPANY_KEYWORDS)
}

/// Affiliation looks like an academic institution
pub fn is_academic_affiliation(affiliation: &str) -> bool {
    contains_any(affiliation, ACADEMIC_KEYWORDS)
}

/// First email-shaped substring in `text`
pub fn extract_email(text: &str) -> Option<&str> {
    EMAIL_RE.find(text).map(|m| m.as_str())
}
