//! PubMed record parser using quick-xml
//!
//! Walks one `<PubmedArticle>` and keeps only the fields the affiliation
//! filter needs. Every lookup is a direct-child lookup and the first
//! matching child wins; everything else is skipped wholesale, so e.g. a
//! `<PMID>` inside `<CommentsCorrectionsList>` never shadows the
//! article's own PMID.

use anyhow::Result;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Fields of one PubMed record relevant to affiliation filtering
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PubmedArticle {
    pub pmid: Option<String>,
    pub title: Option<String>,
    /// `PubDate/Year`, falling back to `PubDate/MedlineDate`
    pub pub_date: Option<String>,
    pub authors: Vec<Author>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Author {
    pub last_name: Option<String>,
    pub fore_name: Option<String>,
    pub affiliations: Vec<String>,
}

impl Author {
    /// "ForeName LastName", or `None` if either part is missing
    /// (collective/group authors have neither).
    pub fn full_name(&self) -> Option<String> {
        match (&self.fore_name, &self.last_name) {
            (Some(fore), Some(last)) => Some(format!("{fore} {last}")),
            _ => None,
        }
    }
}

/// Parse one `<PubmedArticle>` element.
///
/// Returns `Ok(None)` when the record has no `MedlineCitation` or no
/// `Article` (nothing to classify).
pub fn parse_article(xml: &str) -> Result<Option<PubmedArticle>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"PubmedArticle" => {
                return parse_pubmed_article(&mut reader);
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

fn parse_pubmed_article(reader: &mut Reader<&[u8]>) -> Result<Option<PubmedArticle>> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"MedlineCitation" => return parse_medline_citation(reader),
                _ => skip_element(reader)?,
            },
            Event::End(e) if e.name().as_ref() == b"PubmedArticle" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}

fn parse_medline_citation(reader: &mut Reader<&[u8]>) -> Result<Option<PubmedArticle>> {
    let mut article = PubmedArticle::default();
    let mut has_article = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"PMID" if article.pmid.is_none() => article.pmid = Some(read_text(reader)?),
                b"Article" if !has_article => {
                    has_article = true;
                    parse_article_element(reader, &mut article)?;
                }
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"PMID" if article.pmid.is_none() => article.pmid = Some(String::new()),
                b"Article" => has_article = true,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"MedlineCitation" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(has_article.then_some(article))
}

fn parse_article_element(reader: &mut Reader<&[u8]>, article: &mut PubmedArticle) -> Result<()> {
    let mut seen_journal = false;
    let mut seen_authors = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"ArticleTitle" if article.title.is_none() => {
                    article.title = Some(read_text(reader)?)
                }
                b"Journal" if !seen_journal => {
                    seen_journal = true;
                    article.pub_date = parse_journal(reader)?;
                }
                b"AuthorList" if !seen_authors => {
                    seen_authors = true;
                    article.authors = parse_author_list(reader)?;
                }
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"ArticleTitle" if article.title.is_none() => article.title = Some(String::new()),
                b"Journal" => seen_journal = true,
                b"AuthorList" => seen_authors = true,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Article" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// `Journal/JournalIssue/PubDate`, `None` if the path breaks anywhere
fn parse_journal(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut pub_date = None;
    let mut seen_issue = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"JournalIssue" if !seen_issue => {
                    seen_issue = true;
                    pub_date = parse_journal_issue(reader)?;
                }
                _ => skip_element(reader)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"JournalIssue" => seen_issue = true,
            Event::End(e) if e.name().as_ref() == b"Journal" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(pub_date)
}

fn parse_journal_issue(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut pub_date = None;
    let mut seen_pub_date = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"PubDate" if !seen_pub_date => {
                    seen_pub_date = true;
                    pub_date = parse_pub_date(reader)?;
                }
                _ => skip_element(reader)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"PubDate" => seen_pub_date = true,
            Event::End(e) if e.name().as_ref() == b"JournalIssue" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(pub_date)
}

/// Prefer `<Year>`; fall back to free-form `<MedlineDate>` ("1998 Dec-1999 Jan")
fn parse_pub_date(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut year = None;
    let mut medline_date = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Year" if year.is_none() => year = Some(read_text(reader)?),
                b"MedlineDate" if medline_date.is_none() => medline_date = Some(read_text(reader)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"Year" if year.is_none() => year = Some(String::new()),
                b"MedlineDate" if medline_date.is_none() => medline_date = Some(String::new()),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"PubDate" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(year.or(medline_date))
}

fn parse_author_list(reader: &mut Reader<&[u8]>) -> Result<Vec<Author>> {
    let mut authors = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Author" => authors.push(parse_author(reader)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"Author" => authors.push(Author::default()),
            Event::End(e) if e.name().as_ref() == b"AuthorList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(authors)
}

fn parse_author(reader: &mut Reader<&[u8]>) -> Result<Author> {
    let mut author = Author::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"LastName" if author.last_name.is_none() => {
                    author.last_name = Some(read_text(reader)?)
                }
                b"ForeName" if author.fore_name.is_none() => {
                    author.fore_name = Some(read_text(reader)?)
                }
                b"AffiliationInfo" => {
                    if let Some(aff) = parse_affiliation(reader)? {
                        author.affiliations.push(aff);
                    }
                }
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"LastName" if author.last_name.is_none() => author.last_name = Some(String::new()),
                b"ForeName" if author.fore_name.is_none() => author.fore_name = Some(String::new()),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Author" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(author)
}

/// Trimmed text of the first `<Affiliation>` of an `<AffiliationInfo>`.
///
/// `None` when that element has no text at all. Whitespace-only text
/// yields `Some("")`.
fn parse_affiliation(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut affiliation = None;
    let mut seen = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Affiliation" if !seen => {
                    seen = true;
                    let mut text = String::new();
                    collect_text(reader, &mut text)?;
                    if !text.is_empty() {
                        affiliation = Some(text.trim().to_string());
                    }
                }
                _ => skip_element(reader)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"Affiliation" => seen = true,
            Event::End(e) if e.name().as_ref() == b"AffiliationInfo" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(affiliation)
}

/// Consume the rest of the element whose start tag was just read
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Read trimmed text content until the matching end tag.
///
/// Text of nested inline markup (`<i>`, `<sup>`, ...) is included.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    collect_text(reader, &mut text)?;
    Ok(text.trim().to_string())
}

fn collect_text(reader: &mut Reader<&[u8]>, text: &mut String) -> Result<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(_) => collect_text(reader, text)?,
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
