//! Key events in `Send` syntax
//!
//! A key event renders as `{Key}` or `{Key State}`, the brace syntax used by the `Send`
//! family of commands. The key name itself is taken verbatim.

use super::args::{Arg, IntoArgs};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Press state attached to a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    Down,
    Up,
    /// Down, but let the key's native auto-repeat run
    DownR,
    /// Down, without the modifier being released by later sends
    DownTemp,
}

impl KeyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyState::Down => "Down",
            KeyState::Up => "Up",
            KeyState::DownR => "DownR",
            KeyState::DownTemp => "DownTemp",
        }
    }
}

/// A single key, optionally with a press state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub state: Option<KeyState>,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        KeyEvent {
            key: key.into(),
            state: None,
        }
    }

    pub fn with_state(mut self, state: KeyState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn down(self) -> Self {
        self.with_state(KeyState::Down)
    }

    pub fn up(self) -> Self {
        self.with_state(KeyState::Up)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            Some(state) => write!(f, "{{{} {}}}", self.key, state.as_str()),
            None => write!(f, "{{{}}}", self.key),
        }
    }
}

impl From<KeyEvent> for Arg {
    fn from(event: KeyEvent) -> Self {
        Arg::Text(event.to_string())
    }
}

impl IntoArgs for KeyEvent {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}
