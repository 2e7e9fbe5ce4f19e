//! Page renderers
//!
//! Each page is rendered from the current store state. A store error shows as a
//! banner above whatever data is still cached.

use super::format::{fit, format_change, format_compact_timestamp, format_count, format_money};
use crate::config::Config;
use crate::environment::Environment;
use crate::store::{AnalyticsStore, SearchQuery, ToolsStore};
use crate::tool::Tool;
use serde_json::Value;
use std::fmt::Write;
use std::path::PathBuf;

/// How many of the most expensive tools the dashboard lists.
const TOP_SPENDERS: usize = 3;

/// Everything the settings page shows.
#[derive(Debug, Clone)]
pub struct SettingsView {
    pub environment: Environment,
    pub config_path: Option<PathBuf>,
    pub config: Config,
}

fn banner(out: &mut String, error: Option<String>, is_loading: bool) {
    if is_loading {
        let _ = writeln!(out, "Loading…");
    }
    if let Some(error) = error {
        let _ = writeln!(out, "⚠ {} (showing last known data)", error);
    }
}

fn title(out: &mut String, text: &str) {
    let _ = writeln!(out, "{}\n{}", text, "=".repeat(text.chars().count()));
}

pub fn render_dashboard(tools: &ToolsStore, analytics: &AnalyticsStore) -> String {
    let mut out = String::new();
    title(&mut out, "Dashboard");
    banner(&mut out, tools.error(), tools.is_loading());
    banner(&mut out, analytics.error(), analytics.is_loading());

    let snapshot = tools.tools();
    let monthly: f64 = snapshot.iter().map(|t| t.monthly_cost).sum();
    let previous: f64 = snapshot.iter().map(|t| t.previous_month_cost).sum();
    let users: f64 = snapshot.iter().map(|t| t.active_users_count).sum();
    let active = snapshot
        .iter()
        .filter(|t| t.status.as_deref() == Some("active"))
        .count();

    let _ = writeln!(out, "Tools tracked:  {} ({} active)", snapshot.len(), active);
    let _ = write!(out, "Monthly spend:  {}", format_money(monthly));
    match format_change(monthly, previous) {
        Some(change) => {
            let _ = writeln!(out, " ({} vs last month)", change);
        }
        None => out.push('\n'),
    }
    let _ = writeln!(out, "Active users:   {}", format_count(users));

    let mut spenders: Vec<&Tool> = snapshot.iter().collect();
    spenders.sort_by(|a, b| b.monthly_cost.total_cmp(&a.monthly_cost));
    if !spenders.is_empty() {
        let _ = writeln!(out, "\nTop spend");
        for tool in spenders.into_iter().take(TOP_SPENDERS) {
            let _ = writeln!(
                out,
                "  {} {}",
                fit(tool.display_name(), 24),
                format_money(tool.monthly_cost)
            );
        }
    }

    if let Some(Value::Object(sections)) = analytics.analytics() {
        let names: Vec<&str> = sections.keys().map(String::as_str).collect();
        let _ = writeln!(out, "\nAnalytics sections: {}", names.join(", "));
    }
    out
}

pub fn render_tools(tools: &ToolsStore, query: &SearchQuery) -> String {
    let mut out = String::new();
    title(&mut out, "Tools");
    banner(&mut out, tools.error(), tools.is_loading());

    let search = query.get();
    let rows = tools.filtered(query);
    if !search.trim().is_empty() {
        let _ = writeln!(out, "Search: \"{}\" ({} of {})", search.trim(), rows.len(), tools.len());
    }
    if rows.is_empty() {
        if tools.is_empty() {
            let _ = writeln!(out, "No tools to show.");
        } else {
            let _ = writeln!(out, "No tools match the search.");
        }
        return out;
    }

    let _ = writeln!(
        out,
        "{} {} {} {} {} {:>12} {:>7} {}",
        fit("ID", 5),
        fit("Name", 20),
        fit("Vendor", 14),
        fit("Category", 14),
        fit("Status", 10),
        "Monthly",
        "Users",
        "Updated"
    );
    for tool in rows {
        let id = tool.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
        let _ = writeln!(
            out,
            "{} {} {} {} {} {:>12} {:>7} {}",
            fit(&id, 5),
            fit(tool.display_name(), 20),
            fit(tool.vendor.as_deref().unwrap_or(""), 14),
            fit(tool.category.as_deref().unwrap_or(""), 14),
            fit(tool.status.as_deref().unwrap_or(""), 10),
            format_money(tool.monthly_cost),
            format_count(tool.active_users_count),
            tool.updated_at
                .as_deref()
                .map(format_compact_timestamp)
                .unwrap_or_default()
        );
    }
    out
}

pub fn render_analytics(analytics: &AnalyticsStore) -> String {
    let mut out = String::new();
    title(&mut out, "Analytics");
    banner(&mut out, analytics.error(), analytics.is_loading());

    match analytics.analytics() {
        Some(document) => match serde_json::to_string_pretty(&document) {
            Ok(pretty) => {
                let _ = writeln!(out, "{}", pretty);
            }
            Err(e) => {
                let _ = writeln!(out, "Unprintable analytics document: {}", e);
            }
        },
        None => {
            let _ = writeln!(out, "No analytics loaded.");
        }
    }
    out
}

pub fn render_settings(settings: &SettingsView) -> String {
    let mut out = String::new();
    title(&mut out, "Settings");
    let _ = writeln!(out, "Environment:    {}", settings.environment);
    let _ = writeln!(out, "API base URL:   {}", settings.environment.api_url());
    let pinned = settings.config.api_base_url.as_deref().unwrap_or("(none)");
    let _ = writeln!(out, "Pinned URL:     {}", pinned);
    match &settings.config_path {
        Some(path) => {
            let _ = writeln!(out, "Settings file:  {}", path.display());
        }
        None => {
            let _ = writeln!(out, "Settings file:  (unavailable)");
        }
    }
    out
}
