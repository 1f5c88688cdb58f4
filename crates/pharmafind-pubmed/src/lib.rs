//! Pharmafind PubMed - industry-affiliated literature search
//!
//! Searches PubMed through the NCBI E-utilities, fetches the matching
//! records, and keeps articles with at least one author affiliated with a
//! pharmaceutical or biotech company.
//!
//! # Pipeline
//!
//! - ESearch (JSON) for up to 100 PMIDs
//! - One EFetch (XML) for all of them
//! - Streaming XML parsing with quick-xml, one record at a time
//! - Keyword classification of author affiliations
//! - CSV output
//!
//! # Example
//!
//! ```ignore
//! use indicatif::ProgressBar;
//! use pharmafind_pubmed::{Config, get_papers, write_output};
//!
//! let records = get_papers(&Config::default(), "cancer immunotherapy", &ProgressBar::hidden());
//! let outcome = write_output(&records, None);
//! ```

pub mod classify;
pub mod config;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod record;
pub mod runner;
pub mod search;

// Re-exports
pub use config::{Config, MAX_RESULTS};
pub use output::{Outcome, write_csv, write_output};
pub use record::{ArticleRecord, parse_record};
pub use runner::{Papers, Summary, get_papers, try_get_papers};
