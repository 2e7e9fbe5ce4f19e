mod api;
mod cli_messages;
mod config;
mod consts;
mod environment;
mod error_classifier;
mod logging;
mod router;
mod session;
mod store;
mod tool;
mod ui;

use crate::api::ApiClient;
use crate::config::{Config, get_config_path, parse_api_url, resolve_environment};
use crate::consts::cli_consts::ENVIRONMENT_VAR;
use crate::router::{Router, RouteTarget};
use crate::store::SearchQuery;
use crate::ui::{App, SettingsView};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Track SaaS tools, their spend and their usage.
struct Args {
    /// API base URL for this run, overriding settings and environment.
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a dashboard path, e.g. `/`, `/tools` or `/analytics`.
    View {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show the tools page.
    Tools {
        /// Only show tools whose name, vendor or category contain this text.
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,
    },
    /// Show the analytics page.
    Analytics,
    /// Print the route table.
    Routes,
    /// Start an interactive session: navigate, search and edit tools locally.
    Shell {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Inspect or change client settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the effective settings.
    Show,
    /// Pin the API base URL.
    SetApiUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Delete the settings file.
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config_path = get_config_path().ok();
    let api_url = args.api_url.as_deref();

    match args.command {
        Command::Routes => {
            print_routes(&Router::new());
            Ok(())
        }
        Command::Settings { action } => settings(action, api_url, config_path),
        Command::View { path } => {
            let app = build_app(api_url, config_path, SearchQuery::new())?;
            show(&app, &path).await
        }
        Command::Tools { search } => {
            let query = SearchQuery::new();
            if let Some(search) = search {
                query.set(search);
            }
            let app = build_app(api_url, config_path, query)?;
            show(&app, "/tools").await
        }
        Command::Analytics => {
            let app = build_app(api_url, config_path, SearchQuery::new())?;
            show(&app, "/analytics").await
        }
        Command::Shell { path } => {
            let app = build_app(api_url, config_path, SearchQuery::new())?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session::run_session(&app, &path, stdin).await
        }
    }
}

/// Reads the settings file for the commands that use it.
fn load_config(config_path: Option<&Path>) -> Result<Config, config::ConfigError> {
    match config_path {
        Some(path) => Config::load_or_default(path),
        None => Ok(Config::default()),
    }
}

fn build_app(
    api_url: Option<&str>,
    config_path: Option<PathBuf>,
    search: SearchQuery,
) -> Result<App, Box<dyn Error>> {
    let config = load_config(config_path.as_deref())?;
    let env_var = std::env::var(ENVIRONMENT_VAR).ok();
    let environment = resolve_environment(api_url, &config, env_var.as_deref())?;
    log::debug!("Using {:?}", environment);

    let client = ApiClient::new(environment.clone())?;
    let settings = SettingsView {
        environment,
        config_path,
        config,
    };
    Ok(App::new(Arc::new(client), search, settings))
}

/// Renders `path`; a missing route or a failed fetch ends the run with an error.
async fn show(app: &App, path: &str) -> Result<(), Box<dyn Error>> {
    match app.open(path).await {
        Some(page) => {
            print!("{}", page);
            if app.has_errors() {
                print_cmd_warn!("Showing last known data", "a refresh failed; see above");
                return Err(Box::from("Some data could not be loaded"));
            }
            Ok(())
        }
        None => {
            print_cmd_error!("Page not found", path);
            Err(Box::from(format!("No route matches {}", path)))
        }
    }
}

fn print_routes(router: &Router) {
    for route in router.routes() {
        match route.target {
            RouteTarget::Page(page) => println!("{:<12} {}", route.path, page),
            RouteTarget::Redirect(to) => println!("{:<12} -> {}", route.path, to),
        }
    }
}

/// `reset` never reads the file, so it also clears a corrupt one.
fn settings(
    action: SettingsAction,
    api_url: Option<&str>,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let path = config_path.ok_or(config::ConfigError::NoHomeDir)?;
    match action {
        SettingsAction::Show => {
            let config = load_config(Some(&path))?;
            let env_var = std::env::var(ENVIRONMENT_VAR).ok();
            let environment = resolve_environment(api_url, &config, env_var.as_deref())?;
            let view = SettingsView {
                environment,
                config_path: Some(path),
                config,
            };
            print!("{}", ui::pages::render_settings(&view));
            Ok(())
        }
        SettingsAction::SetApiUrl { url } => {
            let environment = parse_api_url(&url)?;
            Config::new(Some(environment.api_url())).save(&path)?;
            print_cmd_success!("API URL pinned", "{}", environment.api_url());
            Ok(())
        }
        SettingsAction::Reset => {
            print_cmd_info!("Clearing settings", "{}", path.display());
            Config::clear(&path)?;
            Ok(())
        }
    }
}
