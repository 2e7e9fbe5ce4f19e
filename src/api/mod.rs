use crate::api::error::ApiError;
use serde_json::Value;

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// Read-only view of the dashboard JSON server.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// Fetch the raw tool records, un-normalized.
    async fn get_tools(&self) -> Result<Vec<Value>, ApiError>;

    /// Fetch the analytics document. Its shape is owned by the server.
    async fn get_analytics(&self) -> Result<Value, ApiError>;
}
