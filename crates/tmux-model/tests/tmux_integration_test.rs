//! Integration tests against a real tmux server.
//!
//! Each test starts its own server on a throwaway socket and kills it at the
//! end, so a developer's running tmux is never touched.

use std::sync::Arc;

use tmux_model::{ClientConfig, Error, Server, SessionOptions, Value};

struct Isolated {
    server: Server,
}

impl Isolated {
    fn start() -> Self {
        let mut config = ClientConfig::default();
        config.tmux.socket_name = Some(format!("tmux-model-{}", uuid::Uuid::new_v4()));
        config.tmux.config_file = Some("/dev/null".to_string());
        config.validate().unwrap();
        Self {
            server: Server::new(&config),
        }
    }
}

impl Drop for Isolated {
    fn drop(&mut self) {
        let _ = self.server.kill_server();
    }
}

#[test]
#[ignore = "Requires a tmux binary (run locally with --ignored)"]
fn test_real_window_lifecycle() {
    let tmux = Isolated::start();
    let session = tmux
        .server
        .new_session(SessionOptions {
            name: Some("model".to_string()),
            width: Some(120),
            height: Some(40),
            ..SessionOptions::default()
        })
        .unwrap();

    let before = session.list_windows().unwrap().len();
    let window = session.new_window("second").unwrap();
    assert_eq!(session.list_windows().unwrap().len(), before + 1);
    assert_eq!(window.name().as_deref(), Some("second"));

    let index = window.index().unwrap();
    let selected = session.select_window(index).unwrap();
    let attached = session.attached_window().unwrap();
    assert!(Arc::ptr_eq(&selected, &attached));
    assert_eq!(selected.snapshot(), attached.snapshot());
}

#[test]
#[ignore = "Requires a tmux binary (run locally with --ignored)"]
fn test_real_options() {
    let tmux = Isolated::start();
    let session = tmux
        .server
        .new_session(SessionOptions::named("options"))
        .unwrap();

    session.set_option("history-limit", 20).unwrap();
    assert_eq!(
        session.show_option("history-limit").unwrap(),
        Some(Value::Int(20))
    );
    session.set_option("history-limit", 40).unwrap();
    assert_eq!(session.show_options().unwrap()["history-limit"], 40_i64);

    let err = session.set_option("afewewfew", 43).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { .. }), "{err:?}");
}

#[test]
#[ignore = "Requires a tmux binary (run locally with --ignored)"]
fn test_real_has_session_and_rename() {
    let tmux = Isolated::start();
    let session = tmux
        .server
        .new_session(SessionOptions::named("original"))
        .unwrap();

    assert!(tmux.server.has_session("original").unwrap());
    assert!(!tmux
        .server
        .has_session(&uuid::Uuid::new_v4().to_string())
        .unwrap());

    session.rename_session("renamed").unwrap();
    assert_eq!(session.name().as_deref(), Some("renamed"));
    session.refresh().unwrap();
    assert_eq!(session.name().as_deref(), Some("renamed"));
}

#[test]
#[ignore = "Requires a tmux binary (run locally with --ignored)"]
fn test_real_split_and_send_keys() {
    let tmux = Isolated::start();
    let session = tmux
        .server
        .new_session(SessionOptions::named("panes"))
        .unwrap();
    let window = session.attached_window().unwrap();

    let pane = window.split_window(Default::default()).unwrap();
    assert_eq!(window.list_panes().unwrap().len(), 2);
    assert!(Arc::ptr_eq(&window.attached_pane().unwrap(), &pane));

    pane.send_keys("echo tmux-model", true).unwrap();
    pane.refresh().unwrap();
}
