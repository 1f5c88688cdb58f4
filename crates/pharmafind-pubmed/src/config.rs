//! PubMed client configuration

/// Maximum number of identifiers requested per search
pub const MAX_RESULTS: usize = 100;

/// Runtime configuration for the PubMed E-utilities client
#[derive(Debug, Clone)]
pub struct Config {
    /// ESearch endpoint (JSON identifier search)
    pub esearch_url: String,
    /// EFetch endpoint (XML record retrieval)
    pub efetch_url: String,
    /// NCBI API key, sent as `api_key` when set
    pub api_key: Option<String>,
    /// Registered tool name, sent as `tool` when set
    pub tool: Option<String>,
    /// Contact address, sent as `email` when set
    pub email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            esearch_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi".to_string(),
            efetch_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi".to_string(),
            api_key: None,
            tool: None,
            email: None,
        }
    }
}

impl Config {
    /// Optional identity parameters shared by both endpoints
    pub(crate) fn identity_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        if let Some(tool) = &self.tool {
            params.push(("tool", tool.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email", email.clone()));
        }
        params
    }
}
