//! Tool records
//!
//! The record type cached by the tools store, the inputs of the local mutation
//! helpers, and the normalization applied to raw server records.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

/// Numeric fields coerced to numbers on every fetched record.
const NUMERIC_FIELDS: [&str; 3] = ["monthly_cost", "previous_month_cost", "active_users_count"];

/// Fields typed as text on [`Tool`]. Other JSON values there are kept in `extra`.
const TEXT_FIELDS: [&str; 10] = [
    "name",
    "description",
    "vendor",
    "category",
    "owner_department",
    "status",
    "website_url",
    "icon_url",
    "created_at",
    "updated_at",
];

/// A tracked SaaS tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Integer id. Records whose id is not an integer keep `None`.
    #[serde(default, deserialize_with = "integer_id")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub monthly_cost: f64,
    #[serde(default)]
    pub previous_month_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default)]
    pub active_users_count: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Server fields this client does not know about, carried verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input for creating a tool locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTool {
    pub name: String,
    pub category: String,
    pub monthly_cost: f64,
    pub owner_department: String,
    pub status: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    /// Falls back to `monthly_cost` when not given.
    pub previous_month_cost: Option<f64>,
    pub website_url: Option<String>,
    pub active_users_count: Option<f64>,
    pub icon_url: Option<String>,
}

/// Shallow patch for an existing tool. Only fields that are `Some` overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub monthly_cost: Option<f64>,
    pub previous_month_cost: Option<f64>,
    pub owner_department: Option<String>,
    pub status: Option<String>,
    pub website_url: Option<String>,
    pub active_users_count: Option<f64>,
    pub icon_url: Option<String>,
}

impl ToolUpdate {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

impl Tool {
    /// Builds the full record for a locally created tool.
    pub fn from_new(id: i64, new: NewTool, now: &str) -> Self {
        Self {
            id: Some(id),
            name: Some(new.name),
            description: Some(new.description.unwrap_or_default()),
            vendor: Some(new.vendor.unwrap_or_default()),
            category: Some(new.category),
            monthly_cost: new.monthly_cost,
            previous_month_cost: new.previous_month_cost.unwrap_or(new.monthly_cost),
            owner_department: Some(new.owner_department),
            status: Some(new.status),
            website_url: Some(new.website_url.unwrap_or_default()),
            active_users_count: new.active_users_count.unwrap_or(0.0),
            icon_url: Some(new.icon_url.unwrap_or_default()),
            created_at: Some(now.to_string()),
            updated_at: Some(now.to_string()),
            extra: Map::new(),
        }
    }

    /// Merges every set field of `update` onto the record and stamps `updated_at`.
    pub fn apply(&mut self, update: ToolUpdate, now: &str) {
        fn merge<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        for (field, set) in [
            ("name", update.name.is_some()),
            ("description", update.description.is_some()),
            ("vendor", update.vendor.is_some()),
            ("category", update.category.is_some()),
            ("owner_department", update.owner_department.is_some()),
            ("status", update.status.is_some()),
            ("website_url", update.website_url.is_some()),
            ("icon_url", update.icon_url.is_some()),
            ("updated_at", true),
        ] {
            if set {
                self.extra.remove(field);
            }
        }

        merge(&mut self.name, update.name.map(Some));
        merge(&mut self.description, update.description.map(Some));
        merge(&mut self.vendor, update.vendor.map(Some));
        merge(&mut self.category, update.category.map(Some));
        merge(&mut self.monthly_cost, update.monthly_cost);
        merge(&mut self.previous_month_cost, update.previous_month_cost);
        merge(&mut self.owner_department, update.owner_department.map(Some));
        merge(&mut self.status, update.status.map(Some));
        merge(&mut self.website_url, update.website_url.map(Some));
        merge(&mut self.active_users_count, update.active_users_count);
        merge(&mut self.icon_url, update.icon_url.map(Some));
        self.updated_at = Some(now.to_string());
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

impl Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{} {}", id, self.display_name()),
            None => write!(f, "#? {}", self.display_name()),
        }
    }
}

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalizes one raw server record into a [`Tool`].
///
/// The three numeric fields are coerced to numbers (0 when absent or null);
/// everything else passes through. A text field holding a non-string value
/// leaves the typed field empty and keeps the value in `extra`.
pub fn normalize(raw: Value) -> Result<Tool, serde_json::Error> {
    let mut record = match raw {
        Value::Object(map) => map,
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a tool object, got {}",
                json_kind(&other)
            )));
        }
    };

    for field in NUMERIC_FIELDS {
        let coerced = coerce_number(field, record.get(field));
        record.insert(field.to_string(), Value::from(coerced));
    }

    let mut untyped = Map::new();
    for field in TEXT_FIELDS {
        if matches!(record.get(field), Some(v) if !v.is_string() && !v.is_null()) {
            if let Some(value) = record.remove(field) {
                log::debug!("Field `{}` is {}; keeping it untyped", field, json_kind(&value));
                untyped.insert(field.to_string(), value);
            }
        }
    }

    let mut tool: Tool = serde_json::from_value(Value::Object(record))?;
    tool.extra.extend(untyped);
    Ok(tool)
}

/// Coerces a JSON value to a finite number.
///
/// Numbers stay as they are, numeric strings are parsed, booleans become 0/1,
/// and absent, null or empty-string values become 0. Anything else also
/// becomes 0, with a warning.
pub fn coerce_number(field: &str, value: Option<&Value>) -> f64 {
    let coerced = match value {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) if s.trim().is_empty() => Some(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => None,
    };

    match coerced {
        Some(n) if n.is_finite() => n,
        _ => {
            log::warn!("Field `{}` is not numeric ({:?}); using 0", field, value);
            0.0
        }
    }
}

fn integer_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    /// Missing numeric fields become zero.
    fn test_normalize_defaults_missing_numbers_to_zero() {
        let tool = normalize(json!({"id": 1, "name": "Figma"})).unwrap();
        assert_eq!(tool.monthly_cost, 0.0);
        assert_eq!(tool.previous_month_cost, 0.0);
        assert_eq!(tool.active_users_count, 0.0);
    }

    #[test]
    /// Null numeric fields become zero.
    fn test_normalize_null_cost_is_zero() {
        let tool = normalize(json!({"id": 1, "monthly_cost": null})).unwrap();
        assert_eq!(tool.id, Some(1));
        assert_eq!(tool.monthly_cost, 0.0);
    }

    #[test]
    /// Numeric strings are parsed.
    fn test_normalize_parses_numeric_strings() {
        let tool = normalize(json!({
            "id": 2,
            "monthly_cost": "12.5",
            "previous_month_cost": " 10 ",
            "active_users_count": "42"
        }))
        .unwrap();
        assert_eq!(tool.monthly_cost, 12.5);
        assert_eq!(tool.previous_month_cost, 10.0);
        assert_eq!(tool.active_users_count, 42.0);
    }

    #[test]
    /// Fetched records do not borrow previous_month_cost from monthly_cost.
    fn test_normalize_previous_cost_defaults_to_zero_not_monthly() {
        let tool = normalize(json!({"id": 3, "monthly_cost": 99})).unwrap();
        assert_eq!(tool.previous_month_cost, 0.0);
    }

    #[test]
    fn test_normalize_keeps_unknown_fields() {
        let raw = json!({"id": 4, "name": "Notion", "tags": ["docs"], "seats": {"max": 10}});
        let tool = normalize(raw).unwrap();
        assert_eq!(tool.extra["tags"], json!(["docs"]));
        assert_eq!(tool.extra["seats"], json!({"max": 10}));

        let back = serde_json::to_value(&tool).unwrap();
        assert_eq!(back["tags"], json!(["docs"]));
        assert_eq!(back["name"], "Notion");
    }

    #[test]
    /// Non-string text values do not fail the record and survive serialization.
    fn test_normalize_keeps_non_string_text_fields() {
        let tool = normalize(json!({
            "id": 1,
            "name": "Slack",
            "status": true,
            "vendor": 42,
            "created_at": 1700000000
        }))
        .unwrap();
        assert_eq!(tool.name.as_deref(), Some("Slack"));
        assert_eq!(tool.status, None);
        assert_eq!(tool.vendor, None);

        let back = serde_json::to_value(&tool).unwrap();
        assert_eq!(back["status"], json!(true));
        assert_eq!(back["vendor"], json!(42));
        assert_eq!(back["created_at"], json!(1700000000));
    }

    #[test]
    /// Setting a field replaces its untyped value instead of duplicating the key.
    fn test_apply_replaces_untyped_text_field() {
        let mut tool = normalize(json!({"id": 1, "status": 0})).unwrap();
        tool.apply(ToolUpdate::status("active"), "2026-10-17T09:30:00.000Z");

        assert!(!tool.extra.contains_key("status"));
        let back = serde_json::to_value(&tool).unwrap();
        assert_eq!(back["status"], "active");
    }

    #[test]
    fn test_normalize_rejects_non_objects() {
        assert!(normalize(json!("tool")).is_err());
        assert!(normalize(json!([1])).is_err());
    }

    #[test]
    fn test_non_integer_id_is_none() {
        let tool = normalize(json!({"id": "abc"})).unwrap();
        assert_eq!(tool.id, None);
        assert_eq!(tool.to_string(), "#? (unnamed)");
    }

    #[test]
    fn test_coerce_number_edge_cases() {
        assert_eq!(coerce_number("x", Some(&json!(true))), 1.0);
        assert_eq!(coerce_number("x", Some(&json!(false))), 0.0);
        assert_eq!(coerce_number("x", Some(&json!(""))), 0.0);
        assert_eq!(coerce_number("x", Some(&json!("abc"))), 0.0);
        assert_eq!(coerce_number("x", Some(&json!("inf"))), 0.0);
        assert_eq!(coerce_number("x", Some(&json!([1]))), 0.0);
        assert_eq!(coerce_number("x", Some(&json!(-3.25))), -3.25);
    }

    #[test]
    /// A new tool fills optional text with empty strings and previous cost with the current one.
    fn test_from_new_fills_defaults() {
        let new = NewTool {
            name: "X".to_string(),
            category: "SaaS".to_string(),
            monthly_cost: 10.0,
            owner_department: "Eng".to_string(),
            status: "active".to_string(),
            ..NewTool::default()
        };
        let tool = Tool::from_new(1, new, "2026-10-17T09:30:00.000Z");
        assert_eq!(tool.id, Some(1));
        assert_eq!(tool.previous_month_cost, 10.0);
        assert_eq!(tool.active_users_count, 0.0);
        assert_eq!(tool.description.as_deref(), Some(""));
        assert_eq!(tool.vendor.as_deref(), Some(""));
        assert_eq!(tool.website_url.as_deref(), Some(""));
        assert_eq!(tool.icon_url.as_deref(), Some(""));
        assert_eq!(tool.created_at, tool.updated_at);
    }

    #[test]
    fn test_apply_overwrites_only_set_fields() {
        let mut tool = normalize(json!({
            "id": 5, "name": "Jira", "status": "active", "monthly_cost": 20,
            "updated_at": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();

        tool.apply(
            ToolUpdate {
                monthly_cost: Some(25.0),
                ..ToolUpdate::status("expiring")
            },
            "2026-10-17T09:30:00.000Z",
        );

        assert_eq!(tool.name.as_deref(), Some("Jira"));
        assert_eq!(tool.status.as_deref(), Some("expiring"));
        assert_eq!(tool.monthly_cost, 25.0);
        assert_eq!(tool.updated_at.as_deref(), Some("2026-10-17T09:30:00.000Z"));
    }

    #[test]
    fn test_timestamp_now_is_iso_utc_millis() {
        let now = timestamp_now();
        assert!(now.ends_with('Z'));
        assert_eq!(now.len(), "2026-10-17T09:30:00.000Z".len());
    }
}
