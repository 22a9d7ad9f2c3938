// SPDX-License-Identifier: MIT
//
// n-line — demo REPL over the n-readline line editor.
//
// Wires the crates together the way a host program would:
//
//   n-term     → Tty over stdin/stdout, raw mode, width
//   n-readline → Session, key bindings, history, completion
//
// Each line flows through:
//
//   stdin → Session::readline → command dispatch → echo / setting change
//
// Tab completes the word under the cursor against a fixed word list.
// Lines starting with `/` are commands:
//
//   /mask          toggle mask mode (echo `*` instead of text)
//   /history       list history
//   /history N     keep at most N history entries
//   /clear         clear the screen
//
// Environment:
//
//   N_LINE_CONFIG     TOML file with a `[readline]` table and `words`
//   N_LINE_LOG        write tracing output to this file
//   N_LINE_LOG_LEVEL  EnvFilter directives for the log (default `debug`)

use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Mutex;

use n_readline::{Config, Editor, KeyHandler, ReadlineError, Session};
use n_term::{Terminal, Tty};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const PROMPT: &str = "n-line> ";

const DEFAULT_WORDS: &[&str] = &[
    "/clear", "/history", "/mask", "commit", "checkout", "cherry-pick", "status", "stash", "stop",
];

// ─── Configuration ──────────────────────────────────────────────────────────

/// Contents of the `N_LINE_CONFIG` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    readline: Config,
    /// Completion candidates. Empty means the built-in list.
    words: Vec<String>,
}

impl DemoConfig {
    /// Load from `path`, falling back to defaults on any problem.
    fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
                Self::default()
            }
        }
    }

    fn words(&self) -> Vec<String> {
        if self.words.is_empty() {
            DEFAULT_WORDS.iter().map(|w| (*w).to_owned()).collect()
        } else {
            self.words.clone()
        }
    }
}

// ─── Completion ─────────────────────────────────────────────────────────────

/// Tab handler: complete the word under the cursor from a word list.
struct WordCompleter {
    words: Vec<String>,
}

impl WordCompleter {
    /// Start of the word that ends at `point`.
    fn word_start(line: &[u8], point: usize) -> usize {
        line[..point]
            .iter()
            .rposition(|&b| b == b' ')
            .map_or(0, |i| i + 1)
    }

    fn candidates(&self, prefix: &[u8]) -> Vec<&str> {
        self.words
            .iter()
            .map(String::as_str)
            .filter(|w| w.as_bytes().starts_with(prefix))
            .collect()
    }
}

impl KeyHandler for WordCompleter {
    fn handle(&self, editor: &mut Editor<'_>, _key: &[u8]) -> n_readline::Result<()> {
        let point = editor.point();
        let start = Self::word_start(editor.line(), point);
        let candidates = self.candidates(&editor.line()[start..point]);
        if editor.complete(start, &candidates, true)? {
            editor.insert_text(b" ")?;
        }
        Ok(())
    }
}

// ─── Commands ───────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Echo(&'a str),
    ToggleMask,
    ListHistory,
    HistoryLen(usize),
    Clear,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim_end();
    let Some(cmd) = line.strip_prefix('/') else {
        return Command::Echo(line);
    };
    let mut parts = cmd.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("mask"), None) => Command::ToggleMask,
        (Some("history"), None) => Command::ListHistory,
        (Some("history"), Some(n)) => n.parse().map_or(Command::Unknown(line), Command::HistoryLen),
        (Some("clear"), None) => Command::Clear,
        _ => Command::Unknown(line),
    }
}

/// Handle one submitted line. Output goes through the session so it lands
/// on the same terminal as the prompt.
fn run_command<T: Terminal>(session: &mut Session<T>, line: &str) -> n_readline::Result<()> {
    // Raw mode does not echo the Enter key.
    if !line.is_empty() {
        session.print(b"\n")?;
    }

    match parse_command(line) {
        Command::Echo("") => {}
        Command::Echo(text) => {
            session.print(format!("echo: '{text}'\n").as_bytes())?;
            session.history_add(text);
        }
        Command::ToggleMask => {
            let enable = !session.config().mask_mode;
            session.set_mask_mode(enable);
            let state = if enable { "on" } else { "off" };
            session.print(format!("mask mode {state}\n").as_bytes())?;
        }
        Command::ListHistory => {
            let listing: String = session
                .history()
                .iter()
                .enumerate()
                .map(|(i, entry)| format!("{:>4}  {entry}\n", i + 1))
                .collect();
            session.print(listing.as_bytes())?;
        }
        Command::HistoryLen(n) => match session.history_set_max_len(n) {
            Ok(()) => session.print(format!("history length {n}\n").as_bytes())?,
            Err(ReadlineError::InvalidHistoryLength) => {
                session.print(b"history length must be at least 1\n")?;
            }
            Err(e) => return Err(e),
        },
        Command::Clear => session.clear_screen()?,
        Command::Unknown(cmd) => {
            session.print(format!("unknown command: {cmd}\n").as_bytes())?;
        }
    }
    Ok(())
}

// ─── Entry ──────────────────────────────────────────────────────────────────

/// Send tracing output to the file named by `N_LINE_LOG`, if set. Never to
/// the terminal being edited.
fn init_logging() {
    let Some(path) = env::var_os("N_LINE_LOG") else {
        return;
    };
    let file = match fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("n-line: cannot open log file: {e}");
            return;
        }
    };
    let filter =
        EnvFilter::try_from_env("N_LINE_LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("debug"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn repl<T: Terminal>(session: &mut Session<T>) -> n_readline::Result<()> {
    while let Some(line) = session.readline(PROMPT)? {
        run_command(session, &line)?;
    }
    Ok(())
}

fn main() {
    init_logging();

    let config = env::var_os("N_LINE_CONFIG")
        .map(|path| DemoConfig::load(Path::new(&path)))
        .unwrap_or_default();
    info!(?config, "n-line starting");

    let tty = Tty::stdio().unwrap_or_else(|e| {
        eprintln!("n-line: failed to open terminal: {e}");
        process::exit(1);
    });

    let words = config.words();
    let mut session = Session::with_config(tty, config.readline).unwrap_or_else(|e| {
        eprintln!("n-line: {e}");
        process::exit(1);
    });
    if let Err(e) = session.bind_key(b'\t', WordCompleter { words }) {
        eprintln!("n-line: {e}");
        process::exit(1);
    }

    let result = repl(&mut session).and_then(|()| session.close());
    if let Err(e) = result {
        eprintln!("n-line: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
