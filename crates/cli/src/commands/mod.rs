//! Subcommands and the HTTP client they share.

pub mod products;
pub mod rewrite;

use homare_core::{GidError, TemplateError};
use thiserror::Error;

/// Errors that can occur while talking to the admin server.
#[derive(Debug, Error)]
pub enum CliError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// A product ID argument is malformed.
    #[error("invalid product ID: {0}")]
    InvalidId(#[from] GidError),

    /// The template name is unknown.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Admin server the commands talk to.
pub struct AdminServer {
    client: reqwest::Client,
    base_url: String,
}

impl AdminServer {
    /// Create a client for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Turn a non-success response into `CliError::Status`.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, CliError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(CliError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}
