//! Serializable view of the whole server.

use std::fmt::Write as _;

use serde::Serialize;

use tmux_model::{PaneField, Result, Server, Value, WindowField};

/// One session with its windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionNode {
    /// Session identifier (`$N`)
    pub id: String,
    /// Session name
    pub name: Option<String>,
    /// Windows in index order
    pub windows: Vec<WindowNode>,
}

/// One window with its panes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowNode {
    /// Window identifier (`@N`)
    pub id: String,
    /// Window index
    pub index: Option<i64>,
    /// Window name
    pub name: Option<String>,
    /// Focused in its session
    pub active: bool,
    /// Panes in index order
    pub panes: Vec<PaneNode>,
}

/// One pane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneNode {
    /// Pane identifier (`%N`)
    pub id: String,
    /// Pane index
    pub index: Option<i64>,
    /// Focused in its window
    pub active: bool,
    /// Foreground command
    pub command: Option<String>,
}

/// Walk every session, window and pane, refreshing each level.
pub fn collect(server: &Server) -> Result<Vec<SessionNode>> {
    let mut tree = Vec::new();
    for session in server.list_sessions()? {
        let mut windows = Vec::new();
        for window in session.list_windows()? {
            let panes = window
                .list_panes()?
                .iter()
                .map(|pane| PaneNode {
                    id: pane.id().to_string(),
                    index: pane.index(),
                    active: flag(pane.get(PaneField::PaneActive)),
                    command: pane.current_command(),
                })
                .collect();
            windows.push(WindowNode {
                id: window.id().to_string(),
                index: window.index(),
                name: window.name(),
                active: flag(window.get(WindowField::WindowActive)),
                panes,
            });
        }
        tree.push(SessionNode {
            id: session.id().to_string(),
            name: session.name(),
            windows,
        });
    }
    Ok(tree)
}

/// Indented text rendering, `*` marking focused windows and panes.
pub fn render(tree: &[SessionNode]) -> String {
    let mut out = String::new();
    for session in tree {
        let _ = writeln!(
            out,
            "{} {}",
            session.id,
            session.name.as_deref().unwrap_or("-")
        );
        for window in &session.windows {
            let _ = writeln!(
                out,
                "  {}{} {} {}",
                marker(window.active),
                opt(window.index),
                window.id,
                window.name.as_deref().unwrap_or("-")
            );
            for pane in &window.panes {
                let _ = writeln!(
                    out,
                    "    {}{} {} {}",
                    marker(pane.active),
                    opt(pane.index),
                    pane.id,
                    pane.command.as_deref().unwrap_or("-")
                );
            }
        }
    }
    out
}

fn flag(value: Option<Value>) -> bool {
    value.as_ref().is_some_and(Value::as_flag)
}

fn marker(active: bool) -> char {
    if active {
        '*'
    } else {
        ' '
    }
}

fn opt(index: Option<i64>) -> String {
    index.map_or_else(|| "?".to_string(), |i| i.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let tree = vec![SessionNode {
            id: "$0".to_string(),
            name: Some("work".to_string()),
            windows: vec![WindowNode {
                id: "@0".to_string(),
                index: Some(0),
                name: Some("bash".to_string()),
                active: true,
                panes: vec![PaneNode {
                    id: "%0".to_string(),
                    index: Some(0),
                    active: false,
                    command: None,
                }],
            }],
        }];

        assert_eq!(render(&tree), "$0 work\n  *0 @0 bash\n     0 %0 -\n");
    }
}
