//! Error handling for the dashboard API module

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response: offline, DNS, TLS, timeout.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The body was not the JSON shape the endpoint promises.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("Unknown status");
        // json-server answers errors with `{}`; the body is only worth a debug line.
        if let Ok(body) = response.text().await {
            let body = body.trim();
            if !body.is_empty() && body != "{}" {
                log::debug!("HTTP {} body: {}", status.as_u16(), body);
            }
        }

        ApiError::Http {
            status: status.as_u16(),
            message: reason.to_string(),
        }
    }

    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
