//! Fetch-and-cache stores backing the dashboard pages.

pub mod analytics;
pub mod resource;
pub mod search;
pub mod tools;

pub use analytics::AnalyticsStore;
pub use search::SearchQuery;
pub use tools::ToolsStore;
