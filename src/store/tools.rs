//! Tools store
//!
//! Caches the normalized tool list and applies optimistic local edits that
//! never reach the server.

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::store::resource::{LoadOutcome, Resource};
use crate::store::search::SearchQuery;
use crate::tool::{NewTool, Tool, ToolUpdate, normalize, timestamp_now};
use std::sync::Arc;

#[derive(Clone)]
pub struct ToolsStore {
    api: Arc<dyn DashboardApi>,
    tools: Resource<Vec<Tool>>,
}

impl ToolsStore {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            tools: Resource::new("tools", Vec::new()),
        }
    }

    /// Snapshot of the cached tools, newest local additions first.
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.read(|tools| tools.clone())
    }

    pub fn len(&self) -> usize {
        self.tools.read(|tools| tools.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.tools.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.tools.error()
    }

    /// Fetches `/tools`, normalizes every record and replaces the list.
    ///
    /// Failures are recorded in [`ToolsStore::error`]; the previous list stays.
    pub async fn refresh(&self) -> LoadOutcome {
        let api = Arc::clone(&self.api);
        self.tools
            .load(async move {
                let raw = api.get_tools().await?;
                raw.into_iter()
                    .map(normalize)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(ApiError::from)
            })
            .await
    }

    /// Prepends a locally created tool and returns its id.
    pub fn add_local_tool(&self, new: NewTool) -> i64 {
        let now = timestamp_now();
        self.tools.write(|tools| {
            let max_id = tools.iter().filter_map(|t| t.id).fold(0, i64::max);
            let id = match max_id.checked_add(1) {
                Some(id) => id,
                None => {
                    let id = lowest_free_id(tools);
                    log::warn!("Tool ids are exhausted above {}; using #{}", max_id, id);
                    id
                }
            };
            tools.insert(0, Tool::from_new(id, new, &now));
            log::info!("Added local tool #{}", id);
            id
        })
    }

    /// Shallow-merges `update` onto the tool with `id`.
    ///
    /// Returns `false`, leaving the list untouched, when no tool has that id.
    pub fn update_local_tool(&self, id: i64, update: ToolUpdate) -> bool {
        let now = timestamp_now();
        self.tools.write(|tools| {
            match tools.iter_mut().find(|t| t.id == Some(id)) {
                Some(tool) => {
                    tool.apply(update, &now);
                    log::info!("Updated local tool #{}", id);
                    true
                }
                None => {
                    log::debug!("No local tool #{} to update", id);
                    false
                }
            }
        })
    }

    pub fn update_local_status(&self, id: i64, status: impl Into<String>) -> bool {
        self.update_local_tool(id, ToolUpdate::status(status))
    }

    /// Tools whose name, vendor or category contain the shared query.
    pub fn filtered(&self, query: &SearchQuery) -> Vec<Tool> {
        self.tools.read(|tools| {
            tools
                .iter()
                .filter(|tool| {
                    query.matches(
                        [&tool.name, &tool.vendor, &tool.category]
                            .into_iter()
                            .filter_map(|field| field.as_deref()),
                    )
                })
                .cloned()
                .collect()
        })
    }
}

/// Smallest positive id no tool uses. There are fewer tools than positive
/// ids, so the search always ends before overflowing.
fn lowest_free_id(tools: &[Tool]) -> i64 {
    let mut ids: Vec<i64> = tools.iter().filter_map(|t| t.id).filter(|id| *id > 0).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut candidate = 1;
    for id in ids {
        if id != candidate {
            break;
        }
        candidate += 1;
    }
    candidate
}
