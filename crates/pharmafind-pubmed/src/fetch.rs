//! EFetch client: PMIDs to raw `<PubmedArticle>` records

use anyhow::{Context, Result};
use pharmafind_core::get_text;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::config::Config;

/// One `<PubmedArticle>` element, kept as its exact XML text.
///
/// Parsing is deferred to [`crate::record::parse_record`] so a broken
/// record can be dropped without losing its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    xml: String,
}

impl RawArticle {
    pub fn new(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.xml
    }
}

/// Fetch full records for `pmids` in a single EFetch request.
///
/// Fails on a non-200 response or if the returned document is not
/// well-formed XML.
pub fn fetch_details(config: &Config, pmids: &[String]) -> Result<Vec<RawArticle>> {
    anyhow::ensure!(!pmids.is_empty(), "EFetch called with no PMIDs");

    let mut params = vec![
        ("db", "pubmed".to_string()),
        ("id", pmids.join(",")),
        ("retmode", "xml".to_string()),
    ];
    params.extend(config.identity_params());

    log::debug!("Fetching details for IDs: {pmids:?}");
    let xml = get_text(&config.efetch_url, &params)
        .with_context(|| format!("EFetch failed for {} PMIDs", pmids.len()))?;

    split_articles(&xml).context("Malformed EFetch XML")
}

/// Split a `<PubmedArticleSet>` document into its top-level `<PubmedArticle>` children.
///
/// The whole document is read, so any well-formedness error fails the
/// call. Elements with other names, and `PubmedArticle` elements nested
/// deeper than the root's direct children, are not returned.
pub fn split_articles(xml: &str) -> Result<Vec<RawArticle>> {
    // No text trimming: whitespace must stay a separate event so that the
    // position before each `Start` is exactly its `<`
    let mut reader = Reader::from_str(xml);

    let mut articles = Vec::new();
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut article_start = None;

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf).context("XML parse error")? {
            Event::Start(e) => {
                check_attributes(&e)?;
                if depth == 0 {
                    anyhow::ensure!(!seen_root, "multiple root elements");
                    seen_root = true;
                }
                if depth == 1 && e.name().as_ref() == b"PubmedArticle" {
                    article_start = Some(pos);
                }
                depth += 1;
            }
            Event::Empty(e) => {
                check_attributes(&e)?;
                if depth == 0 {
                    anyhow::ensure!(!seen_root, "multiple root elements");
                    seen_root = true;
                }
                if depth == 1 && e.name().as_ref() == b"PubmedArticle" {
                    let end = reader.buffer_position() as usize;
                    articles.push(RawArticle::new(&xml[pos..end]));
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    if let Some(start) = article_start.take() {
                        let end = reader.buffer_position() as usize;
                        articles.push(RawArticle::new(&xml[start..end]));
                    }
                }
            }
            Event::Text(e) => {
                e.unescape().context("invalid character data")?;
                anyhow::ensure!(
                    depth > 0 || e.iter().all(|b| b.is_ascii_whitespace()),
                    "text outside the root element"
                );
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    anyhow::ensure!(seen_root, "no root element");
    anyhow::ensure!(depth == 0, "unexpected end of document inside an element");

    Ok(articles)
}

/// Decode every attribute of `e`, failing on bad syntax or an unknown entity
fn check_attributes(e: &BytesStart) -> Result<()> {
    for attr in e.attributes() {
        attr.context("malformed attribute")?
            .unescape_value()
            .context("invalid attribute value")?;
    }
    Ok(())
}
