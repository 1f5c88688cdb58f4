//! CSV output of qualifying records

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::record::ArticleRecord;

/// Column names, in output order
pub const HEADERS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Separator for multi-valued cells
const LIST_SEPARATOR: &str = "; ";

#[derive(Serialize)]
struct Row<'a> {
    #[serde(rename = "PubmedID")]
    pmid: &'a str,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Publication Date")]
    publication_date: &'a str,
    #[serde(rename = "Non-academic Author(s)")]
    non_academic_authors: String,
    #[serde(rename = "Company Affiliation(s)")]
    company_affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    corresponding_email: &'a str,
}

impl<'a> From<&'a ArticleRecord> for Row<'a> {
    fn from(r: &'a ArticleRecord) -> Self {
        Self {
            pmid: &r.pmid,
            title: &r.title,
            publication_date: &r.publication_date,
            non_academic_authors: r.non_academic_authors.join(LIST_SEPARATOR),
            company_affiliations: r.company_affiliations.join(LIST_SEPARATOR),
            corresponding_email: r.corresponding_email.as_deref().unwrap_or(""),
        }
    }
}

/// Write header plus one row per record.
///
/// Fields are quoted only when needed, embedded quotes are doubled, and
/// rows end with `\n`. Nothing at all is written for an empty slice.
pub fn write_csv<W: Write>(records: &[ArticleRecord], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    for record in records {
        wtr.serialize(Row::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Result of [`write_output`], for the caller to report
#[derive(Debug)]
pub enum Outcome {
    /// Empty input; nothing written
    NoResults,
    /// Rows written to stdout
    Printed(usize),
    /// Rows written to this file
    Saved(PathBuf),
    /// Destination could not be written
    Failed {
        target: Option<PathBuf>,
        error: anyhow::Error,
    },
}

impl Outcome {
    /// User-facing status line, if any
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NoResults => Some("No papers found matching the criteria.".to_string()),
            Self::Printed(_) => None,
            Self::Saved(path) => Some(format!("Results saved to {}", path.display())),
            Self::Failed {
                target: Some(_),
                error,
            } => Some(format!("Error writing to file: {error:#}")),
            Self::Failed {
                target: None,
                error,
            } => Some(format!("Error writing output: {error:#}")),
        }
    }
}

/// Write `records` to `path`, or to stdout when `path` is `None`.
///
/// Never fails: I/O problems come back as [`Outcome::Failed`].
pub fn write_output(records: &[ArticleRecord], path: Option<&Path>) -> Outcome {
    if records.is_empty() {
        return Outcome::NoResults;
    }

    match path {
        Some(path) => match write_file(records, path) {
            Ok(()) => Outcome::Saved(path.to_path_buf()),
            Err(error) => Outcome::Failed {
                target: Some(path.to_path_buf()),
                error,
            },
        },
        None => match write_csv(records, std::io::stdout().lock()) {
            Ok(()) => Outcome::Printed(records.len()),
            Err(error) => Outcome::Failed {
                target: None,
                error,
            },
        },
    }
}

fn write_file(records: &[ArticleRecord], path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    write_csv(records, file).with_context(|| format!("cannot write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(pmid: &str) -> ArticleRecord {
        ArticleRecord {
            pmid: pmid.to_string(),
            title: "Research Involving Industry".to_string(),
            publication_date: "2021".to_string(),
            non_academic_authors: vec!["Jane Doe".to_string(), "Rich Roe".to_string()],
            company_affiliations: vec!["Acme Pharma Inc.".to_string()],
            corresponding_email: Some("jane@acme.com".to_string()),
        }
    }

    fn to_string(records: &[ArticleRecord]) -> String {
        let mut out = Vec::new();
        write_csv(records, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn header_and_rows() {
        let csv = to_string(&[record("67890")]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(HEADERS.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some("67890,Research Involving Industry,2021,Jane Doe; Rich Roe,Acme Pharma Inc.,jane@acme.com")
        );
        assert_eq!(lines.next(), None);
        assert!(csv.ends_with('\n'));
        assert!(!csv.contains('\r'));
    }

    #[test]
    fn quotes_only_when_needed() {
        let mut r = record("1");
        r.title = r#"Drugs, "biologics" and more"#.to_string();
        r.company_affiliations = vec!["Acme Pharma, Inc.".to_string(), "Beta Biotech".to_string()];
        r.corresponding_email = None;

        let csv = to_string(&[r]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            r#"1,"Drugs, ""biologics"" and more",2021,Jane Doe; Rich Roe,"Acme Pharma, Inc.; Beta Biotech","#
        );
    }

    #[test]
    fn utf8_passthrough() {
        let mut r = record("2");
        r.non_academic_authors = vec!["Zoë Müller".to_string()];
        let csv = to_string(&[r]);
        assert!(csv.contains("Zoë Müller"));
    }

    #[test]
    fn empty_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let outcome = write_output(&[], Some(&path));

        assert!(matches!(outcome, Outcome::NoResults));
        assert_eq!(
            outcome.message().as_deref(),
            Some("No papers found matching the criteria.")
        );
        assert!(!path.exists());
    }

    #[test]
    fn saves_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let outcome = write_output(&[record("1"), record("2")], Some(&path));

        assert!(matches!(&outcome, Outcome::Saved(p) if p == &path));
        assert_eq!(
            outcome.message(),
            Some(format!("Results saved to {}", path.display()))
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.starts_with("PubmedID,Title,"));
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let outcome = write_output(&[record("1")], Some(&path));

        assert!(matches!(outcome, Outcome::Failed { target: Some(_), .. }));
        assert!(outcome.message().unwrap().starts_with("Error writing to file:"));
    }
}
