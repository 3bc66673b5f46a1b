//! In-memory stand-in for a tmux server.
//!
//! [`FakeTmux`] understands the subset of tmux commands this crate issues,
//! keeps its own sessions/windows/panes and answers with the same text
//! tmux would print, including the failure messages the error mapping
//! relies on. Tests can also drive it directly, playing the part of another
//! client mutating the server behind the object model's back.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use tmux_model_core::Result;

use crate::executor::{CommandExecutor, CommandOutput};

const SESSION_OPTIONS: &[&str] = &[
    "base-index",
    "default-command",
    "default-shell",
    "destroy-unattached",
    "history-limit",
    "mouse",
    "prefix",
    "renumber-windows",
    "set-titles",
    "status",
    "status-left",
    "status-right",
];

const WINDOW_OPTIONS: &[&str] = &[
    "aggressive-resize",
    "allow-rename",
    "automatic-rename",
    "mode-keys",
    "monitor-activity",
    "pane-base-index",
    "remain-on-exit",
    "synchronize-panes",
    "window-status-format",
];

const VALUE_FLAGS: &[&str] = &["-t", "-F", "-s", "-n", "-c", "-x", "-y"];

type Reply = std::result::Result<Vec<String>, String>;

#[derive(Debug)]
struct FakePane {
    id: u32,
    command: String,
    path: String,
    pid: i64,
    title: String,
    input: Vec<String>,
}

#[derive(Debug)]
struct FakeWindow {
    id: u32,
    index: i64,
    name: String,
    current: u32,
    panes: Vec<FakePane>,
    options: BTreeMap<String, String>,
}

#[derive(Debug)]
struct FakeSession {
    id: u32,
    name: String,
    created: i64,
    current: u32,
    windows: Vec<FakeWindow>,
    options: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct FakeState {
    next_session: u32,
    next_window: u32,
    next_pane: u32,
    base_index: i64,
    clock: i64,
    sessions: Vec<FakeSession>,
    history: Vec<Vec<String>>,
    fail_next: Option<String>,
}

/// In-memory tmux server implementing [`CommandExecutor`].
#[derive(Debug, Default)]
pub struct FakeTmux {
    state: Mutex<FakeState>,
}

impl FakeTmux {
    /// Empty server numbering windows from 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty server numbering windows from `base_index`, as a user's
    /// `base-index` setting would.
    pub fn with_base_index(base_index: i64) -> Self {
        let fake = Self::default();
        fake.lock().base_index = base_index;
        fake
    }

    /// Every command received so far, in order.
    pub fn history(&self) -> Vec<Vec<String>> {
        self.lock().history.clone()
    }

    /// Number of commands received so far.
    pub fn command_count(&self) -> usize {
        self.lock().history.len()
    }

    /// Make the next command fail with `stderr`.
    pub fn fail_next(&self, stderr: impl Into<String>) {
        self.lock().fail_next = Some(stderr.into());
    }

    /// Keys typed into a pane, one entry per `send-keys` argument.
    pub fn sent_keys(&self, pane_id: &str) -> Vec<String> {
        let state = self.lock();
        state
            .sessions
            .iter()
            .flat_map(|s| &s.windows)
            .flat_map(|w| &w.panes)
            .find(|p| format!("%{}", p.id) == pane_id)
            .map(|p| p.input.clone())
            .unwrap_or_default()
    }

    /// Run a command as another client would, outside the object model.
    pub fn external(&self, args: &[&str]) -> CommandOutput {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut state = self.lock();
        to_output(state.dispatch(&args))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandExecutor for FakeTmux {
    fn run(&self, args: &[String]) -> Result<CommandOutput> {
        let mut state = self.lock();
        state.history.push(args.to_vec());
        if let Some(stderr) = state.fail_next.take() {
            return Ok(CommandOutput::failed(stderr));
        }
        Ok(to_output(state.dispatch(args)))
    }
}

fn to_output(reply: Reply) -> CommandOutput {
    match reply {
        Ok(lines) => CommandOutput::ok(lines),
        Err(message) => CommandOutput::failed(message),
    }
}

/// Parsed command line: flags with their values, then positionals.
struct Args<'a> {
    flags: BTreeMap<&'a str, Option<&'a str>>,
    positional: Vec<&'a str>,
}

impl<'a> Args<'a> {
    fn parse(args: &'a [String]) -> Self {
        let mut flags = BTreeMap::new();
        let mut positional = Vec::new();
        let mut iter = args.iter().map(String::as_str);
        while let Some(arg) = iter.next() {
            if !positional.is_empty() || !arg.starts_with('-') || arg == "-" {
                positional.push(arg);
            } else if VALUE_FLAGS.contains(&arg) {
                flags.insert(arg, iter.next());
            } else {
                flags.insert(arg, None);
            }
        }
        Self { flags, positional }
    }

    fn has(&self, flag: &str) -> bool {
        self.flags.contains_key(flag)
    }

    fn value(&self, flag: &str) -> Option<&'a str> {
        self.flags.get(flag).copied().flatten()
    }

    fn target(&self) -> &'a str {
        self.value("-t").unwrap_or("")
    }
}

type Loc = (usize, usize, usize);

impl FakeState {
    fn dispatch(&mut self, args: &[String]) -> Reply {
        let Some((command, rest)) = args.split_first() else {
            return Err("no command".to_string());
        };
        let args = Args::parse(rest);

        if self.sessions.is_empty() && !matches!(command.as_str(), "new-session" | "kill-server")
        {
            return Err("no server running on /tmp/tmux-fake/default".to_string());
        }

        match command.as_str() {
            "list-sessions" => Ok(self.list_sessions(&args)),
            "has-session" => self.find_session(args.target()).map(|_| Vec::new()),
            "new-session" => self.new_session(&args),
            "kill-session" => self.kill_session(&args),
            "kill-server" => {
                self.sessions.clear();
                Ok(Vec::new())
            }
            "rename-session" => self.rename_session(&args),
            "list-windows" => self.list_windows(&args),
            "new-window" => self.new_window(&args),
            "select-window" => self.select_window(&args),
            "kill-window" => self.kill_window(&args),
            "rename-window" => self.rename_window(&args),
            "list-panes" => self.list_panes(&args),
            "split-window" => self.split_window(&args),
            "select-pane" => self.select_pane(&args),
            "send-keys" => self.send_keys(&args),
            "set-option" => self.set_option(&args, false),
            "set-window-option" => self.set_option(&args, true),
            "show-options" => self.show_options(&args, false),
            "show-window-options" => self.show_options(&args, true),
            other => Err(format!("unknown command: {other}")),
        }
    }

    // Target resolution

    fn find_session(&self, target: &str) -> std::result::Result<usize, String> {
        let not_found = || format!("can't find session: {target}");
        let target = target.split(':').next().unwrap_or("");

        if let Some(id) = target.strip_prefix('$') {
            return self
                .sessions
                .iter()
                .position(|s| s.id.to_string() == id)
                .ok_or_else(not_found);
        }
        if target.starts_with('@') || target.starts_with('%') {
            return self.find_window(target).map(|(si, _)| si);
        }
        if let Some(name) = target.strip_prefix('=') {
            return self
                .sessions
                .iter()
                .position(|s| s.name == name)
                .ok_or_else(not_found);
        }
        if let Some(si) = self.sessions.iter().position(|s| s.name == target) {
            return Ok(si);
        }
        let mut prefixed = self
            .sessions
            .iter()
            .enumerate()
            .filter(|(_, s)| !target.is_empty() && s.name.starts_with(target));
        match (prefixed.next(), prefixed.next()) {
            (Some((si, _)), None) => Ok(si),
            _ => Err(not_found()),
        }
    }

    fn find_window(&self, target: &str) -> std::result::Result<(usize, usize), String> {
        if let Some(id) = target.strip_prefix('@') {
            let id = id.split('.').next().unwrap_or("");
            return self
                .locate(|w, _| w.id.to_string() == id)
                .map(|(si, wi, _)| (si, wi))
                .ok_or_else(|| format!("can't find window: @{id}"));
        }
        if let Some(id) = target.strip_prefix('%') {
            return self
                .locate(|_, p| p.is_some_and(|p| p.id.to_string() == id))
                .map(|(si, wi, _)| (si, wi))
                .ok_or_else(|| format!("can't find pane: %{id}"));
        }

        let (session_part, window_part) = target.split_once(':').unwrap_or((target, ""));
        let si = self.find_session(session_part)?;
        let session = &self.sessions[si];
        let window_part = window_part.split('.').next().unwrap_or("");

        let wi = if window_part.is_empty() {
            session.windows.iter().position(|w| w.id == session.current)
        } else if let Some(id) = window_part.strip_prefix('@') {
            session.windows.iter().position(|w| w.id.to_string() == id)
        } else if let Ok(index) = window_part.parse::<i64>() {
            session.windows.iter().position(|w| w.index == index)
        } else {
            session.windows.iter().position(|w| w.name == window_part)
        };
        wi.map(|wi| (si, wi))
            .ok_or_else(|| format!("can't find window: {window_part}"))
    }

    fn find_pane(&self, target: &str) -> std::result::Result<Loc, String> {
        if let Some(id) = target.strip_prefix('%') {
            return self
                .locate(|_, p| p.is_some_and(|p| p.id.to_string() == id))
                .ok_or_else(|| format!("can't find pane: %{id}"));
        }

        let window_target = target.rsplit_once(':').map_or(target, |(_, w)| w);
        if let Some((_, pane_part)) = window_target.rsplit_once('.') {
            let (si, wi) = self.find_window(target)?;
            let window = &self.sessions[si].windows[wi];
            return pane_part
                .parse::<usize>()
                .ok()
                .filter(|pi| *pi < window.panes.len())
                .map(|pi| (si, wi, pi))
                .ok_or_else(|| format!("can't find pane: {pane_part}"));
        }

        let (si, wi) = self.find_window(target)?;
        let window = &self.sessions[si].windows[wi];
        let pi = window
            .panes
            .iter()
            .position(|p| p.id == window.current)
            .unwrap_or(0);
        Ok((si, wi, pi))
    }

    fn locate<P>(&self, predicate: P) -> Option<Loc>
    where
        P: Fn(&FakeWindow, Option<&FakePane>) -> bool,
    {
        for (si, session) in self.sessions.iter().enumerate() {
            for (wi, window) in session.windows.iter().enumerate() {
                if predicate(window, None) {
                    return Some((si, wi, 0));
                }
                for (pi, pane) in window.panes.iter().enumerate() {
                    if predicate(window, Some(pane)) {
                        return Some((si, wi, pi));
                    }
                }
            }
        }
        None
    }

    // Format expansion

    fn session_vars(&self, si: usize) -> BTreeMap<&'static str, String> {
        let s = &self.sessions[si];
        BTreeMap::from([
            ("session_id", format!("${}", s.id)),
            ("session_name", s.name.clone()),
            ("session_windows", s.windows.len().to_string()),
            ("session_attached", "0".to_string()),
            ("session_created", s.created.to_string()),
        ])
    }

    fn window_vars(&self, si: usize, wi: usize) -> BTreeMap<&'static str, String> {
        let s = &self.sessions[si];
        let w = &s.windows[wi];
        let mut vars = self.session_vars(si);
        vars.extend([
            ("window_id", format!("@{}", w.id)),
            ("window_index", w.index.to_string()),
            ("window_name", w.name.clone()),
            ("window_active", flag(w.id == s.current)),
            ("window_panes", w.panes.len().to_string()),
            ("window_layout", format!("b25d,80x24,0,0,{}", w.id)),
            ("window_width", "80".to_string()),
            ("window_height", "24".to_string()),
        ]);
        vars
    }

    fn pane_vars(&self, (si, wi, pi): Loc) -> BTreeMap<&'static str, String> {
        let w = &self.sessions[si].windows[wi];
        let p = &w.panes[pi];
        let mut vars = self.window_vars(si, wi);
        vars.extend([
            ("pane_id", format!("%{}", p.id)),
            ("pane_index", pi.to_string()),
            ("pane_active", flag(p.id == w.current)),
            ("pane_current_command", p.command.clone()),
            ("pane_current_path", p.path.clone()),
            ("pane_pid", p.pid.to_string()),
            ("pane_title", p.title.clone()),
            ("pane_width", "80".to_string()),
            ("pane_height", "24".to_string()),
        ]);
        vars
    }

    // Commands

    fn list_sessions(&self, args: &Args<'_>) -> Vec<String> {
        let format = args.value("-F").unwrap_or("#{session_name}: #{session_windows} windows");
        (0..self.sessions.len())
            .map(|si| expand(format, &self.session_vars(si)))
            .collect()
    }

    fn new_session(&mut self, args: &Args<'_>) -> Reply {
        let id = self.next_session;
        let name = args.value("-s").map_or_else(|| id.to_string(), session_name);
        if self.sessions.iter().any(|s| s.name == name) {
            return Err(format!("duplicate session: {name}"));
        }
        self.next_session += 1;
        self.clock += 1;

        let window = self.make_window(self.base_index, args.value("-n"), args.value("-c"));
        self.sessions.push(FakeSession {
            id,
            name,
            created: 1_700_000_000 + self.clock,
            current: window.id,
            windows: vec![window],
            options: BTreeMap::new(),
        });

        let si = self.sessions.len() - 1;
        Ok(printed(args, "#{session_name}:", &self.session_vars(si)))
    }

    fn kill_session(&mut self, args: &Args<'_>) -> Reply {
        let si = self.find_session(args.target())?;
        self.sessions.remove(si);
        Ok(Vec::new())
    }

    fn rename_session(&mut self, args: &Args<'_>) -> Reply {
        let si = self.find_session(args.target())?;
        let name = session_name(args.positional.first().copied().unwrap_or(""));
        if self
            .sessions
            .iter()
            .enumerate()
            .any(|(i, s)| i != si && s.name == name)
        {
            return Err(format!("duplicate session: {name}"));
        }
        self.sessions[si].name = name;
        Ok(Vec::new())
    }

    fn list_windows(&self, args: &Args<'_>) -> Reply {
        let si = self.find_session(args.target())?;
        let format = args.value("-F").unwrap_or("#{window_index}: #{window_name}");
        let mut order: Vec<usize> = (0..self.sessions[si].windows.len()).collect();
        order.sort_by_key(|wi| self.sessions[si].windows[*wi].index);
        Ok(order
            .into_iter()
            .map(|wi| expand(format, &self.window_vars(si, wi)))
            .collect())
    }

    fn new_window(&mut self, args: &Args<'_>) -> Reply {
        let target = args.target();
        let si = self.find_session(target)?;
        let requested = target
            .split_once(':')
            .map(|(_, w)| w)
            .filter(|w| !w.is_empty());

        let index = match requested {
            Some(raw) => {
                let index = raw
                    .parse::<i64>()
                    .map_err(|_| format!("can't find window: {raw}"))?;
                if self.sessions[si].windows.iter().any(|w| w.index == index) {
                    return Err(format!("index in use: {index}"));
                }
                index
            }
            None => self.free_index(si),
        };

        let mut window = self.make_window(index, args.value("-n"), args.value("-c"));
        if let Some(command) = args.positional.first() {
            if let Some(pane) = window.panes.first_mut() {
                pane.command = command.split_whitespace().next().unwrap_or("").to_string();
            }
        }
        let window_id = window.id;
        let session = &mut self.sessions[si];
        session.windows.push(window);
        if !args.has("-d") {
            session.current = window_id;
        }

        let wi = session.windows.len() - 1;
        Ok(printed(args, "#{session_name}:#{window_index}.#{pane_index}", &self.window_vars(si, wi)))
    }

    fn select_window(&mut self, args: &Args<'_>) -> Reply {
        let (si, wi) = self.find_window(args.target())?;
        let session = &mut self.sessions[si];
        session.current = session.windows[wi].id;
        Ok(Vec::new())
    }

    fn kill_window(&mut self, args: &Args<'_>) -> Reply {
        let (si, wi) = self.find_window(args.target())?;
        let session = &mut self.sessions[si];
        let removed = session.windows.remove(wi);
        if session.windows.is_empty() {
            self.sessions.remove(si);
        } else if removed.id == session.current {
            session.current = session.windows[0].id;
        }
        Ok(Vec::new())
    }

    fn rename_window(&mut self, args: &Args<'_>) -> Reply {
        let (si, wi) = self.find_window(args.target())?;
        let name = args.positional.first().copied().unwrap_or("");
        self.sessions[si].windows[wi].name = name.to_string();
        Ok(Vec::new())
    }

    fn list_panes(&self, args: &Args<'_>) -> Reply {
        let (si, wi) = self.find_window(args.target())?;
        let format = args.value("-F").unwrap_or("#{pane_index}: #{pane_id}");
        Ok((0..self.sessions[si].windows[wi].panes.len())
            .map(|pi| expand(format, &self.pane_vars((si, wi, pi))))
            .collect())
    }

    fn split_window(&mut self, args: &Args<'_>) -> Reply {
        let (si, wi, pi) = self.find_pane(args.target())?;
        let pane = self.make_pane(args.value("-c"));
        let pane_id = pane.id;
        let window = &mut self.sessions[si].windows[wi];
        window.panes.insert(pi + 1, pane);
        if !args.has("-d") {
            window.current = pane_id;
        }
        Ok(printed(args, "#{session_name}:#{window_index}.#{pane_index}", &self.pane_vars((si, wi, pi + 1))))
    }

    fn select_pane(&mut self, args: &Args<'_>) -> Reply {
        let (si, wi, pi) = self.find_pane(args.target())?;
        let window = &mut self.sessions[si].windows[wi];
        window.current = window.panes[pi].id;
        Ok(Vec::new())
    }

    fn send_keys(&mut self, args: &Args<'_>) -> Reply {
        let (si, wi, pi) = self.find_pane(args.target())?;
        let pane = &mut self.sessions[si].windows[wi].panes[pi];
        pane.input
            .extend(args.positional.iter().map(|key| key.to_string()));
        Ok(Vec::new())
    }

    fn set_option(&mut self, args: &Args<'_>, window_scope: bool) -> Reply {
        let key = args.positional.first().copied().unwrap_or("");
        let value = args.positional.get(1).copied().unwrap_or("");
        check_option(key, window_scope)?;
        let options = self.options_mut(args.target(), window_scope)?;
        options.insert(key.to_string(), value.to_string());
        Ok(Vec::new())
    }

    fn show_options(&mut self, args: &Args<'_>, window_scope: bool) -> Reply {
        let key = args.positional.first().copied();
        if let Some(key) = key {
            check_option(key, window_scope)?;
        }
        let options = self.options_mut(args.target(), window_scope)?;
        Ok(options
            .iter()
            .filter(|(name, _)| key.map_or(true, |key| key == name.as_str()))
            .map(|(name, value)| format!("{name} {}", quote(value)))
            .collect())
    }

    // Helpers

    fn options_mut(
        &mut self,
        target: &str,
        window_scope: bool,
    ) -> std::result::Result<&mut BTreeMap<String, String>, String> {
        if window_scope {
            let (si, wi) = self.find_window(target)?;
            Ok(&mut self.sessions[si].windows[wi].options)
        } else {
            let si = self.find_session(target)?;
            Ok(&mut self.sessions[si].options)
        }
    }

    fn free_index(&self, si: usize) -> i64 {
        let session = &self.sessions[si];
        let base = session
            .options
            .get("base-index")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(self.base_index);
        let mut index = base;
        while session.windows.iter().any(|w| w.index == index) {
            index += 1;
        }
        index
    }

    fn make_window(&mut self, index: i64, name: Option<&str>, dir: Option<&str>) -> FakeWindow {
        let id = self.next_window;
        self.next_window += 1;
        let pane = self.make_pane(dir);
        FakeWindow {
            id,
            index,
            name: name.unwrap_or(&pane.command).to_string(),
            current: pane.id,
            panes: vec![pane],
            options: BTreeMap::new(),
        }
    }

    fn make_pane(&mut self, dir: Option<&str>) -> FakePane {
        let id = self.next_pane;
        self.next_pane += 1;
        FakePane {
            id,
            command: "bash".to_string(),
            path: dir.unwrap_or("/tmp").to_string(),
            pid: 4000 + i64::from(id),
            title: "fake".to_string(),
            input: Vec::new(),
        }
    }
}

/// tmux does not allow `.` or `:` in session names.
fn session_name(raw: &str) -> String {
    raw.replace(['.', ':'], "_")
}

fn check_option(key: &str, window_scope: bool) -> std::result::Result<(), String> {
    let known = if window_scope {
        WINDOW_OPTIONS
    } else {
        SESSION_OPTIONS
    };
    if known.contains(&key) {
        Ok(())
    } else {
        Err(format!("invalid option: {key}"))
    }
}

fn printed(args: &Args<'_>, default: &str, vars: &BTreeMap<&'static str, String>) -> Vec<String> {
    if !args.has("-P") {
        return Vec::new();
    }
    vec![expand(args.value("-F").unwrap_or(default), vars)]
}

fn flag(on: bool) -> String {
    String::from(if on { "1" } else { "0" })
}

fn quote(value: &str) -> String {
    if value.is_empty() || value.contains(' ') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Replace every `#{name}` with its value; unknown names expand to nothing.
fn expand(format: &str, vars: &BTreeMap<&'static str, String>) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;
    while let Some(start) = rest.find("#{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                if let Some(value) = vars.get(&after[..end]) {
                    out.push_str(value);
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
