//! Session configuration.
//!
//! Plain data with serde support so a host application can keep these
//! settings next to its own (a `[readline]` table in a TOML file, say).
//! Every field has a default; missing keys fall back to it.

use std::time::Duration;

use serde::Deserialize;

use crate::history::DEFAULT_HISTORY_MAX_LEN;

/// How long to wait for the next byte of a partially matched key sequence.
pub const DEFAULT_ESCAPE_TIMEOUT_MS: u64 = 300;

/// Configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// History capacity. Zero disables history.
    pub history_max_len: usize,

    /// Bounded wait, in milliseconds, for continuation bytes of an escape
    /// sequence. A slow serial line needs a few hundred.
    pub escape_timeout_ms: u64,

    /// Echo `mask_char` instead of the typed text.
    pub mask_mode: bool,

    /// Character echoed per typed byte in mask mode.
    pub mask_char: char,

    /// Treat the input as interactive even when it is not a tty and even
    /// when `$TERM` names an incapable terminal.
    pub force_tty: bool,

    /// Extra `$TERM` names to treat as incapable, on top of the built-in
    /// list (`dumb`, `cons25`, `emacs`).
    pub incapable_terms: Vec<String>,
}

impl Config {
    /// The continuation-byte wait as a [`Duration`].
    #[must_use]
    pub const fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    /// Whether `term` is an incapable terminal under this configuration.
    #[must_use]
    pub fn is_incapable(&self, term: &str) -> bool {
        n_term::is_incapable_terminal(term)
            || self
                .incapable_terms
                .iter()
                .any(|t| t.eq_ignore_ascii_case(term))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_max_len: DEFAULT_HISTORY_MAX_LEN,
            escape_timeout_ms: DEFAULT_ESCAPE_TIMEOUT_MS,
            mask_mode: false,
            mask_char: '*',
            force_tty: false,
            incapable_terms: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.history_max_len, 100);
        assert_eq!(config.escape_timeout(), Duration::from_millis(300));
        assert_eq!(config.mask_char, '*');
        assert!(!config.mask_mode);
        assert!(!config.force_tty);
    }

    #[test]
    fn builtin_incapable_terms() {
        let config = Config::default();
        assert!(config.is_incapable("dumb"));
        assert!(!config.is_incapable("xterm"));
    }

    #[test]
    fn extra_incapable_terms() {
        let config = Config {
            incapable_terms: vec!["vt52".to_string()],
            ..Config::default()
        };
        assert!(config.is_incapable("VT52"));
        assert!(config.is_incapable("emacs"));
    }

    #[test]
    fn deserialize_partial_toml() {
        let config: Config = toml::from_str(
            r##"
            history_max_len = 500
            mask_char = "#"
            "##,
        )
        .unwrap();
        assert_eq!(config.history_max_len, 500);
        assert_eq!(config.mask_char, '#');
        assert_eq!(config.escape_timeout_ms, DEFAULT_ESCAPE_TIMEOUT_MS);
    }

    #[test]
    fn deserialize_empty_toml_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }
}
