//! Analytics store. The document is kept exactly as the server sent it.

use crate::api::DashboardApi;
use crate::store::resource::{LoadOutcome, Resource};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct AnalyticsStore {
    api: Arc<dyn DashboardApi>,
    analytics: Resource<Option<Value>>,
}

impl AnalyticsStore {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            analytics: Resource::new("analytics", None),
        }
    }

    /// The last successfully fetched document, if any.
    pub fn analytics(&self) -> Option<Value> {
        self.analytics.read(|analytics| analytics.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.analytics.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.analytics.error()
    }

    pub async fn refresh(&self) -> LoadOutcome {
        let api = Arc::clone(&self.api);
        self.analytics
            .load(async move { api.get_analytics().await.map(Some) })
            .await
    }
}
