//! Integration tests for the tmux-model binary's library half.

use std::sync::Arc;

use clap::Parser;

use tmux_model::testing::FakeTmux;
use tmux_model::{Server, SessionOptions, DEFAULT_FIELD_SEPARATOR};
use tmux_model_cli::{collect, run, CliArgs};

fn populated() -> Server {
    let server = Server::with_executor(Arc::new(FakeTmux::new()), DEFAULT_FIELD_SEPARATOR);
    let session = server.new_session(SessionOptions::named("work")).unwrap();
    session.new_window("editor").unwrap();
    server.new_session(SessionOptions::named("play")).unwrap();
    server
}

fn run_with(server: &Server, args: &[&str]) -> (bool, String) {
    let args = CliArgs::try_parse_from(std::iter::once("tmux-model").chain(args.iter().copied()))
        .unwrap();
    let mut out = Vec::new();
    let success = run(&args, server, &mut out).unwrap();
    (success, String::from_utf8(out).unwrap())
}

#[test]
fn test_collect_walks_every_level() {
    let server = populated();
    let tree = collect(&server).unwrap();

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].name.as_deref(), Some("work"));
    assert_eq!(tree[0].windows.len(), 2);
    assert!(tree[0].windows[1].active);
    assert!(!tree[0].windows[0].active);
    assert_eq!(tree[0].windows[1].panes.len(), 1);
    assert!(tree[0].windows[1].panes[0].active);
}

#[test]
fn test_list_text() {
    let server = populated();
    let (success, out) = run_with(&server, &["ls"]);

    assert!(success);
    assert!(out.contains("$0 work"));
    assert!(out.contains("*1 @1 editor"));
    assert!(out.contains("$1 play"));
}

#[test]
fn test_list_json() {
    let server = populated();
    let (_, out) = run_with(&server, &["--json"]);

    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json[0]["name"], "work");
    assert_eq!(json[0]["windows"][1]["name"], "editor");
    assert_eq!(json[1]["windows"][0]["panes"][0]["id"], "%2");
}

#[test]
fn test_has_session_exit_status() {
    let server = populated();

    let (success, _) = run_with(&server, &["has-session", "work"]);
    assert!(success);

    let (success, out) = run_with(&server, &["--json", "has-session", "nope"]);
    assert!(!success);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["exists"], false);
}

#[test]
fn test_empty_server_lists_nothing() {
    let server = Server::with_executor(Arc::new(FakeTmux::new()), DEFAULT_FIELD_SEPARATOR);
    let (success, out) = run_with(&server, &["ls"]);
    assert!(success);
    assert!(out.is_empty());
}
