//! Blocking HTTP GET over a shared async client.
//!
//! Uses async reqwest internally on a shared tokio runtime, but presents a
//! sync interface: the pipeline makes exactly two sequential requests and
//! has nothing to overlap them with.

use std::sync::LazyLock;

/// User agent sent with every request
const USER_AGENT: &str = concat!("pharmafind/", env!("CARGO_PKG_VERSION"));

/// Error types for request operations
#[derive(Debug)]
pub enum RequestError {
    /// Server answered with anything other than 200 OK
    Status { status: u16, url: String },
    /// Connection, DNS, or body read failure (no status available)
    Transport { message: String },
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { status, url } => write!(f, "HTTP {status} from {url}"),
            Self::Transport { message } => write!(f, "HTTP error: {message}"),
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    /// Create transport error from reqwest error.
    ///
    /// The URL is stripped from the message so query parameters such as
    /// `api_key` never end up in logs.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self::Transport {
            message: e.without_url().to_string(),
        }
    }

    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

/// Shared async HTTP client with connection pooling.
///
/// No explicit timeouts: a stalled upstream blocks the run, relying on
/// transport defaults.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// HTTP GET with query parameters, returning the body as text.
///
/// Any status other than 200 is an error carrying the status code.
/// Must not be called from inside an async context.
pub fn get_text(url: &str, params: &[(&str, String)]) -> Result<String, RequestError> {
    SHARED_RUNTIME.handle().block_on(async {
        let response = http_client()
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(RequestError::from_reqwest)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RequestError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(RequestError::from_reqwest)
    })
}
