//! Interactive session
//!
//! Reads one command per line, applies it to the [`App`] and re-renders the
//! current page. Local edits live only as long as the session.

pub mod commands;
pub mod messages;

use crate::router::Page;
use crate::ui::App;
use crate::{print_cmd_error, print_cmd_success, print_cmd_warn};
use commands::{HELP, SessionCommand};
use messages::{print_session_exit, print_session_starting};
use std::error::Error;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// What the loop does after a command.
#[derive(Debug, PartialEq)]
enum Flow {
    /// Print this, if anything, and wait for the next line.
    Continue(Option<String>),
    Quit,
}

struct Session<'a> {
    app: &'a App,
    page: Page,
}

impl<'a> Session<'a> {
    async fn execute(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::Open(path) => match self.app.router().resolve(&path) {
                Some(page) => {
                    self.page = page;
                    self.app.mount(page).await;
                    Flow::Continue(Some(self.render()))
                }
                None => {
                    print_cmd_error!("Page not found", &path);
                    Flow::Continue(None)
                }
            },
            SessionCommand::Refresh => {
                self.app.mount(self.page).await;
                Flow::Continue(Some(self.render()))
            }
            SessionCommand::Search(text) => {
                if text.trim().is_empty() {
                    self.app.search().clear();
                } else {
                    self.app.search().set(text);
                }
                Flow::Continue(Some(self.render()))
            }
            SessionCommand::Add(new) => {
                let id = self.app.tools().add_local_tool(new);
                print_cmd_success!("Tool added", "#{}", id);
                Flow::Continue(Some(self.render()))
            }
            SessionCommand::Edit(id, update) => {
                let updated = self.app.tools().update_local_tool(id, update);
                self.updated(id, updated)
            }
            SessionCommand::Status(id, status) => {
                let updated = self.app.tools().update_local_status(id, status);
                self.updated(id, updated)
            }
            SessionCommand::Help => Flow::Continue(Some(format!("{}\n", HELP))),
            SessionCommand::Quit => Flow::Quit,
        }
    }

    fn updated(&self, id: i64, updated: bool) -> Flow {
        if updated {
            print_cmd_success!("Tool updated", "#{}", id);
            Flow::Continue(Some(self.render()))
        } else {
            print_cmd_warn!("No tool with that id", "#{}", id);
            Flow::Continue(None)
        }
    }

    fn render(&self) -> String {
        self.app.render(self.page)
    }

    fn prompt(&self) {
        let path = self.app.router().path_of(self.page).unwrap_or("/");
        print!("{}> ", path);
        let _ = std::io::stdout().flush();
    }
}

/// Runs commands from `input` until `quit`, end of input or Ctrl+C.
pub async fn run_session<R>(app: &App, start_path: &str, input: R) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
{
    let page = app
        .router()
        .resolve(start_path)
        .ok_or_else(|| format!("No route matches {}", start_path))?;
    print_session_starting(&app.api_url());

    let mut session = Session { app, page };
    app.mount(page).await;
    print!("{}", session.render());

    let mut lines = input.lines();
    loop {
        session.prompt();
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                print_cmd_error!("Invalid command", &e.to_string());
                continue;
            }
        };
        log::debug!("Session command: {:?}", command);

        match session.execute(command).await {
            Flow::Continue(Some(output)) => print!("{}", output),
            Flow::Continue(None) => {}
            Flow::Quit => break,
        }
    }

    print_session_exit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::config::Config;
    use crate::environment::Environment;
    use crate::store::SearchQuery;
    use crate::tool::{NewTool, ToolUpdate};
    use crate::ui::SettingsView;
    use serde_json::json;
    use std::sync::Arc;

    fn app() -> App {
        let mut mock = MockDashboardApi::new();
        mock.expect_get_tools()
            .returning(|| Ok(vec![json!({"id": 4, "name": "Slack", "status": "active"})]));
        mock.expect_get_analytics().returning(|| Ok(json!({})));
        let settings = SettingsView {
            environment: Environment::Local,
            config_path: None,
            config: Config::default(),
        };
        App::new(Arc::new(mock), SearchQuery::new(), settings)
    }

    fn new_tool(name: &str) -> NewTool {
        NewTool {
            name: name.to_string(),
            category: "Design".to_string(),
            monthly_cost: 30.0,
            owner_department: "Product".to_string(),
            status: "active".to_string(),
            ..NewTool::default()
        }
    }

    #[tokio::test]
    async fn test_open_switches_page() {
        let app = app();
        let mut session = Session { app: &app, page: Page::Dashboard };

        let flow = session.execute(SessionCommand::Open("/tools/".to_string())).await;
        assert_eq!(session.page, Page::Tools);
        let Flow::Continue(Some(page)) = flow else {
            panic!("expected a rendered page, got {:?}", flow);
        };
        assert!(page.starts_with("Tools"));
        assert!(page.contains("Slack"));
    }

    #[tokio::test]
    async fn test_unknown_path_keeps_page() {
        let app = app();
        let mut session = Session { app: &app, page: Page::Settings };

        let flow = session.execute(SessionCommand::Open("/billing".to_string())).await;
        assert_eq!(flow, Flow::Continue(None));
        assert_eq!(session.page, Page::Settings);
    }

    #[tokio::test]
    async fn test_local_edits_show_on_current_page() {
        let app = app();
        let mut session = Session { app: &app, page: Page::Tools };
        app.mount(Page::Tools).await;

        session.execute(SessionCommand::Add(new_tool("Figma"))).await;
        assert_eq!(app.tools().len(), 2);
        assert_eq!(app.tools().tools()[0].id, Some(5));

        let flow = session
            .execute(SessionCommand::Status(5, "expiring".to_string()))
            .await;
        let Flow::Continue(Some(page)) = flow else {
            panic!("expected a rendered page, got {:?}", flow);
        };
        assert!(page.contains("expiring"));

        let flow = session
            .execute(SessionCommand::Edit(99, ToolUpdate::status("active")))
            .await;
        assert_eq!(flow, Flow::Continue(None));
    }

    #[tokio::test]
    async fn test_search_sets_and_clears_shared_query() {
        let app = app();
        let mut session = Session { app: &app, page: Page::Tools };

        session.execute(SessionCommand::Search("sla".to_string())).await;
        assert_eq!(app.search().get(), "sla");
        session.execute(SessionCommand::Search("  ".to_string())).await;
        assert_eq!(app.search().get(), "");
    }

    #[tokio::test]
    /// The loop stops at `quit` and ignores blank and malformed lines on the way.
    async fn test_run_session_reads_until_quit() {
        let app = app();
        let input: &[u8] = b"\nbogus\nadd name=Figma category=Design cost=30 dept=Product status=active\nquit\nadd name=Late category=X cost=1 dept=Y status=active\n";

        run_session(&app, "/tools", input).await.unwrap();
        let names: Vec<String> = app
            .tools()
            .tools()
            .iter()
            .map(|t| t.display_name().to_string())
            .collect();
        assert_eq!(names, vec!["Figma", "Slack"]);
    }

    #[tokio::test]
    async fn test_run_session_rejects_unknown_start_path() {
        let app = app();
        let input: &[u8] = b"";
        assert!(run_session(&app, "/nowhere", input).await.is_err());
    }
}
