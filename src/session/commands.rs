//! Session command parsing
//!
//! One line of input becomes one [`SessionCommand`]. Field lists use
//! `key=value` pairs; values containing spaces can be double-quoted.

use crate::tool::{NewTool, ToolUpdate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Unknown field `{0}`")]
    UnknownField(String),

    #[error("Field `{field}` expects a number, got `{value}`")]
    InvalidNumber { field: String, value: String },

    #[error("`{0}` is not a tool id")]
    InvalidId(String),

    #[error("Expected key=value, got `{0}`")]
    MalformedPair(String),

    #[error("Unterminated quote")]
    UnterminatedQuote,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Navigate to a path and mount its page.
    Open(String),
    /// Re-mount the current page.
    Refresh,
    /// Set the shared search query; empty clears it.
    Search(String),
    Add(NewTool),
    Edit(i64, ToolUpdate),
    Status(i64, String),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  open <path>                 navigate, e.g. `open /tools` (or just `/tools`)
  refresh                     reload the current page
  search [text]               filter tools; no text clears the filter
  add key=value ...           add a tool locally (name, category, cost, dept, status required)
  edit <id> key=value ...     change fields of a local tool
  status <id> <status>        change a tool's status
  help                        show this help
  quit                        leave the session
Fields: name description vendor category cost previous dept status url users icon";

pub fn parse(line: &str) -> Result<Option<SessionCommand>, CommandError> {
    let tokens = tokenize(line)?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.as_str() {
        path if path.starts_with('/') => SessionCommand::Open(path.to_string()),
        "open" | "go" => {
            let path = rest.first().ok_or(CommandError::MissingArgument("open"))?;
            SessionCommand::Open(path.clone())
        }
        "refresh" | "r" => SessionCommand::Refresh,
        "search" => SessionCommand::Search(rest.join(" ")),
        "add" => SessionCommand::Add(parse_new_tool(rest)?),
        "edit" => {
            let (id, fields) = rest
                .split_first()
                .ok_or(CommandError::MissingArgument("edit"))?;
            SessionCommand::Edit(parse_id(id)?, parse_update(fields)?)
        }
        "status" => match rest {
            [id, status, ..] => SessionCommand::Status(parse_id(id)?, status.clone()),
            _ => return Err(CommandError::MissingArgument("status")),
        },
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_id(token: &str) -> Result<i64, CommandError> {
    token
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidId(token.to_string()))
}

fn parse_number(field: &str, value: &str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn pairs(tokens: &[String]) -> Result<Vec<(&str, &str)>, CommandError> {
    tokens
        .iter()
        .map(|token| {
            token
                .split_once('=')
                .ok_or_else(|| CommandError::MalformedPair(token.clone()))
        })
        .collect()
}

fn parse_update(tokens: &[String]) -> Result<ToolUpdate, CommandError> {
    let mut update = ToolUpdate::default();
    for (key, value) in pairs(tokens)? {
        let text = Some(value.to_string());
        match key {
            "name" => update.name = text,
            "description" => update.description = text,
            "vendor" => update.vendor = text,
            "category" => update.category = text,
            "cost" | "monthly_cost" => update.monthly_cost = Some(parse_number(key, value)?),
            "previous" | "previous_month_cost" => {
                update.previous_month_cost = Some(parse_number(key, value)?)
            }
            "dept" | "owner_department" => update.owner_department = text,
            "status" => update.status = text,
            "url" | "website_url" => update.website_url = text,
            "users" | "active_users_count" => {
                update.active_users_count = Some(parse_number(key, value)?)
            }
            "icon" | "icon_url" => update.icon_url = text,
            other => return Err(CommandError::UnknownField(other.to_string())),
        }
    }
    Ok(update)
}

fn parse_new_tool(tokens: &[String]) -> Result<NewTool, CommandError> {
    let update = parse_update(tokens)?;
    Ok(NewTool {
        name: update.name.ok_or(CommandError::MissingField("name"))?,
        category: update.category.ok_or(CommandError::MissingField("category"))?,
        monthly_cost: update.monthly_cost.ok_or(CommandError::MissingField("cost"))?,
        owner_department: update
            .owner_department
            .ok_or(CommandError::MissingField("dept"))?,
        status: update.status.ok_or(CommandError::MissingField("status"))?,
        description: update.description,
        vendor: update.vendor,
        previous_month_cost: update.previous_month_cost,
        website_url: update.website_url,
        active_users_count: update.active_users_count,
        icon_url: update.icon_url,
    })
}

/// Splits on whitespace, keeping double-quoted runs together (quotes removed).
fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}
