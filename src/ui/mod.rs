//! Page host
//!
//! Resolves a path through the route table, mounts the page (refreshing the
//! stores it reads) and renders it.

mod format;
pub mod pages;

pub use pages::SettingsView;

use crate::api::DashboardApi;
use crate::router::{Page, Router};
use crate::store::{AnalyticsStore, SearchQuery, ToolsStore};
use std::sync::Arc;

pub struct App {
    router: Router,
    tools: ToolsStore,
    analytics: AnalyticsStore,
    search: SearchQuery,
    settings: SettingsView,
}

impl App {
    /// `search` is shared with whoever else needs the query, e.g. a search flag.
    pub fn new(api: Arc<dyn DashboardApi>, search: SearchQuery, settings: SettingsView) -> Self {
        Self {
            router: Router::new(),
            tools: ToolsStore::new(Arc::clone(&api)),
            analytics: AnalyticsStore::new(api),
            search,
            settings,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn tools(&self) -> &ToolsStore {
        &self.tools
    }

    pub fn search(&self) -> &SearchQuery {
        &self.search
    }

    pub fn api_url(&self) -> String {
        self.settings.environment.api_url()
    }

    /// Refreshes the stores `page` reads, concurrently when there are several.
    pub async fn mount(&self, page: Page) {
        log::debug!("Mounting {} page", page);
        match page {
            Page::Dashboard => {
                tokio::join!(self.tools.refresh(), self.analytics.refresh());
            }
            Page::Tools => {
                self.tools.refresh().await;
            }
            Page::Analytics => {
                self.analytics.refresh().await;
            }
            Page::Settings => {}
        }
    }

    pub fn render(&self, page: Page) -> String {
        match page {
            Page::Dashboard => pages::render_dashboard(&self.tools, &self.analytics),
            Page::Tools => pages::render_tools(&self.tools, &self.search),
            Page::Analytics => pages::render_analytics(&self.analytics),
            Page::Settings => pages::render_settings(&self.settings),
        }
    }

    /// Navigates to `path`. `None` when no route matches.
    pub async fn open(&self, path: &str) -> Option<String> {
        let page = self.router.resolve(path)?;
        self.mount(page).await;
        Some(self.render(page))
    }

    /// Whether any store mounted so far holds an error.
    pub fn has_errors(&self) -> bool {
        self.tools.error().is_some() || self.analytics.error().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::config::Config;
    use crate::environment::Environment;
    use serde_json::json;

    fn settings() -> SettingsView {
        SettingsView {
            environment: Environment::Production,
            config_path: None,
            config: Config::default(),
        }
    }

    fn mock_api() -> MockDashboardApi {
        let mut mock = MockDashboardApi::new();
        mock.expect_get_tools()
            .returning(|| Ok(vec![json!({"id": 1, "name": "Slack", "monthly_cost": "20"})]));
        mock.expect_get_analytics()
            .returning(|| Ok(json!({"budget_overview": {"monthly_limit": 100}})));
        mock
    }

    #[tokio::test]
    /// `/` renders the same page as `/dashboard`.
    async fn test_root_renders_dashboard() {
        let app = App::new(Arc::new(mock_api()), SearchQuery::new(), settings());
        let root = app.open("/").await.unwrap();
        let dashboard = app.open("/dashboard").await.unwrap();
        assert_eq!(root, dashboard);
        assert!(root.starts_with("Dashboard"));
        assert!(root.contains("€20.00"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let app = App::new(Arc::new(MockDashboardApi::new()), SearchQuery::new(), settings());
        assert_eq!(app.open("/billing").await, None);
    }

    #[tokio::test]
    /// The settings page never touches the network.
    async fn test_settings_page_does_not_fetch() {
        let mut mock = MockDashboardApi::new();
        mock.expect_get_tools().times(0);
        mock.expect_get_analytics().times(0);
        let app = App::new(Arc::new(mock), SearchQuery::new(), settings());

        let page = app.open("/settings").await.unwrap();
        assert!(page.contains("tt-jsonserver-01.alt-tools.tech"));
        assert!(!app.has_errors());
    }

    #[tokio::test]
    /// Each mount fetches exactly the stores the page reads.
    async fn test_mount_fetches_only_needed_stores() {
        let mut mock = MockDashboardApi::new();
        mock.expect_get_tools()
            .times(1)
            .returning(|| Ok(vec![json!({"id": 1, "name": "Slack"})]));
        mock.expect_get_analytics().times(0);
        let search = SearchQuery::new();
        let app = App::new(Arc::new(mock), search.clone(), settings());

        search.set("slack");
        let page = app.open("/tools").await.unwrap();
        assert!(page.contains("Search: \"slack\" (1 of 1)"));
    }

    #[tokio::test]
    async fn test_failed_mount_reports_errors() {
        let mut mock = MockDashboardApi::new();
        mock.expect_get_analytics().returning(|| {
            Err(crate::api::error::ApiError::Http {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        });
        let app = App::new(Arc::new(mock), SearchQuery::new(), settings());

        let page = app.open("/analytics").await.unwrap();
        assert!(page.contains("HTTP error 500"));
        assert!(app.has_errors());
    }
}
