//! Qualifying-article records
//!
//! An [`ArticleRecord`] exists only for articles with at least one
//! company-classified author affiliation.

use crate::classify::{extract_email, is_academic_affiliation, is_company_affiliation};
use crate::fetch::RawArticle;
use crate::parser::{PubmedArticle, parse_article};

/// Placeholder for a missing identifier, title, or publication date
pub const NOT_AVAILABLE: &str = "N/A";

/// One qualifying article, ready for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub pmid: String,
    pub title: String,
    pub publication_date: String,
    /// One entry per non-academic affiliation, in author then affiliation order.
    /// An author with two non-academic affiliations appears twice.
    pub non_academic_authors: Vec<String>,
    /// Distinct company affiliations in first-seen order; never empty
    pub company_affiliations: Vec<String>,
    pub corresponding_email: Option<String>,
}

impl ArticleRecord {
    /// Classify the authors of `article`.
    ///
    /// Returns `None` if no affiliation is company-classified. Authors
    /// without both fore and last name contribute nothing. An affiliation
    /// matching both keyword sets counts as company and non-academic at
    /// the same time.
    pub fn from_article(article: PubmedArticle) -> Option<Self> {
        let mut non_academic_authors = Vec::new();
        let mut company_affiliations: Vec<String> = Vec::new();
        let mut corresponding_email = None;

        for author in &article.authors {
            let Some(full_name) = author.full_name() else {
                continue;
            };

            for affiliation in &author.affiliations {
                if !is_academic_affiliation(affiliation) {
                    non_academic_authors.push(full_name.clone());
                }
                if is_company_affiliation(affiliation) && !company_affiliations.contains(affiliation)
                {
                    company_affiliations.push(affiliation.clone());
                }
                if corresponding_email.is_none() {
                    corresponding_email = extract_email(affiliation).map(String::from);
                }
            }
        }

        if company_affiliations.is_empty() {
            return None;
        }

        Some(Self {
            pmid: article.pmid.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            title: article.title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            publication_date: article
                .pub_date
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            non_academic_authors,
            company_affiliations,
            corresponding_email,
        })
    }
}

/// Parse and classify one raw record.
///
/// Parse failures are logged at debug level and treated like a
/// non-qualifying record, so one bad record never stops the batch.
pub fn parse_record(raw: &RawArticle) -> Option<ArticleRecord> {
    match parse_article(raw.as_str()) {
        Ok(Some(article)) => ArticleRecord::from_article(article),
        Ok(None) => None,
        Err(e) => {
            log::debug!("Error parsing article: {e:#}");
            None
        }
    }
}
