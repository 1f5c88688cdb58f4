//! ESearch client: query term to PMIDs

use pharmafind_core::{RequestError, get_text};

use crate::config::{Config, MAX_RESULTS};

/// Search PubMed and return up to [`MAX_RESULTS`] PMIDs.
///
/// A non-200 response is an error. A body that is not JSON, or lacks
/// `esearchresult.idlist`, yields an empty list.
pub fn search(config: &Config, query: &str) -> Result<Vec<String>, RequestError> {
    let mut params = vec![
        ("db", "pubmed".to_string()),
        ("term", query.to_string()),
        ("retmode", "json".to_string()),
        ("retmax", MAX_RESULTS.to_string()),
    ];
    params.extend(config.identity_params());

    log::debug!("Searching PubMed with query: {query}");
    let body = get_text(&config.esearch_url, &params)?;
    let ids = parse_id_list(&body);
    log::debug!("Found IDs: {ids:?}");
    Ok(ids)
}

/// Extract `esearchresult.idlist` from an ESearch JSON body
pub fn parse_id_list(body: &str) -> Vec<String> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("ESearch returned invalid JSON: {e}");
            return Vec::new();
        }
    };

    match value["esearchresult"]["idlist"].as_array() {
        Some(ids) => ids
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        None => {
            log::debug!("ESearch response has no esearchresult.idlist");
            Vec::new()
        }
    }
}
