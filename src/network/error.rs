//! Error type for student API calls

use thiserror::Error;

/// Failure of a single API call
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL could not be parsed or cannot carry a path
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The request never produced a response
    #[error("{}", describe_transport(.0))]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("Server returned {}{}", .status, format_body(.body))]
    Status { status: u16, body: String },

    /// The response body was not what the endpoint promises
    #[error("Unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn describe_transport(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    }
}

fn format_body(body: &str) -> String {
    const MAX_BODY: usize = 120;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match trimmed.char_indices().nth(MAX_BODY) {
        Some((cut, _)) => format!(": {}...", &trimmed[..cut]),
        None => format!(": {}", trimmed),
    }
}
