//! Main runner: search, fetch, parse, filter

use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::ProgressBar;
use pharmafind_core::fmt_num;

use crate::config::Config;
use crate::fetch::fetch_details;
use crate::record::{ArticleRecord, parse_record};
use crate::search::search;

/// Pipeline execution summary
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// PMIDs returned by the search
    pub identifiers: usize,
    /// `<PubmedArticle>` records returned by the fetch
    pub fetched: usize,
    /// Records with at least one company affiliation
    pub qualifying: usize,
    pub elapsed: Duration,
}

/// Qualifying records plus run statistics
#[derive(Debug, Default)]
pub struct Papers {
    pub records: Vec<ArticleRecord>,
    pub summary: Summary,
}

/// Run the pipeline, propagating search and fetch failures.
pub fn try_get_papers(config: &Config, query: &str, pb: &ProgressBar) -> Result<Papers> {
    let start = Instant::now();

    pb.set_message(format!("searching \"{query}\""));
    let pmids = search(config, query)?;

    let mut summary = Summary {
        identifiers: pmids.len(),
        ..Default::default()
    };

    if pmids.is_empty() {
        log::debug!("No articles found for query.");
        summary.elapsed = start.elapsed();
        return Ok(Papers {
            records: Vec::new(),
            summary,
        });
    }

    pb.set_message(format!("fetching {} records", fmt_num(pmids.len())));
    let articles = fetch_details(config, &pmids)?;
    summary.fetched = articles.len();

    pb.set_message(format!("parsing {} records", fmt_num(articles.len())));
    let records: Vec<ArticleRecord> = articles.iter().filter_map(parse_record).collect();

    summary.qualifying = records.len();
    summary.elapsed = start.elapsed();
    log_summary(&summary);

    Ok(Papers { records, summary })
}

/// Run the pipeline, degrading any search or fetch failure to no results.
pub fn get_papers(config: &Config, query: &str, pb: &ProgressBar) -> Vec<ArticleRecord> {
    match try_get_papers(config, query, pb) {
        Ok(papers) => papers.records,
        Err(e) => {
            log::debug!("Error in get_papers: {e:#}");
            Vec::new()
        }
    }
}

fn log_summary(summary: &Summary) {
    log::debug!("=== PubMed Query Summary ===");
    log::debug!(
        "Records: {} found, {} fetched",
        fmt_num(summary.identifiers),
        fmt_num(summary.fetched)
    );
    log::debug!(
        "Total papers found with company affiliation: {}",
        fmt_num(summary.qualifying)
    );
    log::debug!("Time: {:.1}s", summary.elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const EFETCH_XML: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>12345</PMID>
      <Article>
        <ArticleTitle>Test Article</ArticleTitle>
        <AuthorList>
          <Author>
            <LastName>Smith</LastName>
            <ForeName>John</ForeName>
            <AffiliationInfo><Affiliation>Department of Biology, Harvard University</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>67890</PMID>
      <Article>
        <ArticleTitle>Research Involving Industry</ArticleTitle>
        <AuthorList>
          <Author>
            <LastName>Doe</LastName>
            <ForeName>Jane</ForeName>
            <AffiliationInfo><Affiliation>Acme Pharma Inc.</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>24680</PMID>
      <CommentsCorrectionsList/>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>11111</PMID>
      <Article>
        <ArticleTitle>Second Industry Paper</ArticleTitle>
        <AuthorList>
          <Author>
            <LastName>Roe</LastName>
            <ForeName>Rich</ForeName>
            <AffiliationInfo><Affiliation>Beta Biotech GmbH</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    fn config_for(server: &mockito::Server) -> Config {
        Config {
            esearch_url: format!("{}/esearch.fcgi", server.url()),
            efetch_url: format!("{}/efetch.fcgi", server.url()),
            ..Default::default()
        }
    }

    #[test]
    fn pipeline_filters_and_keeps_order() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"esearchresult": {"idlist": ["12345", "67890", "24680", "11111"]}}"#)
            .create();
        let fetch = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::UrlEncoded("id".into(), "12345,67890,24680,11111".into()))
            .with_status(200)
            .with_body(EFETCH_XML)
            .create();

        let papers = try_get_papers(&config_for(&server), "industry", &ProgressBar::hidden()).unwrap();

        fetch.assert();
        let pmids: Vec<&str> = papers.records.iter().map(|r| r.pmid.as_str()).collect();
        assert_eq!(pmids, vec!["67890", "11111"]);
        assert_eq!(papers.summary.identifiers, 4);
        assert_eq!(papers.summary.fetched, 4);
        assert_eq!(papers.summary.qualifying, 2);
    }

    #[test]
    fn zero_ids_skips_fetch() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"esearchresult": {"count": "0", "idlist": []}}"#)
            .create();
        let fetch = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .expect(0)
            .create();

        let records = get_papers(&config_for(&server), "nothing", &ProgressBar::hidden());

        assert!(records.is_empty());
        fetch.assert();
    }

    #[test]
    fn search_failure_degrades_to_empty() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::Any)
            .with_status(500)
            .create();
        let fetch = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .expect(0)
            .create();

        let config = config_for(&server);
        assert!(try_get_papers(&config, "x", &ProgressBar::hidden()).is_err());
        assert!(get_papers(&config, "x", &ProgressBar::hidden()).is_empty());
        fetch.assert();
    }

    #[test]
    fn fetch_failure_degrades_to_empty() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"esearchresult": {"idlist": ["1"]}}"#)
            .create();
        let _fetch = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .with_status(502)
            .create();

        assert!(get_papers(&config_for(&server), "x", &ProgressBar::hidden()).is_empty());
    }

    #[test]
    fn malformed_fetch_xml_degrades_to_empty() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"esearchresult": {"idlist": ["1"]}}"#)
            .create();
        let _fetch = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<PubmedArticleSet><PubmedArticle></PubmedArticleSet>")
            .create();

        assert!(get_papers(&config_for(&server), "x", &ProgressBar::hidden()).is_empty());
    }
}
