//! Panel toggle hotkey.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HotkeyError {
    #[error("Hotkey is empty")]
    Empty,

    #[error("Unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("Hotkey '{0}' has no key")]
    MissingKey(String),
}

/// A key press as seen by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    /// Focus is in an input, textarea, select or content-editable element.
    pub target_editable: bool,
}

/// Modifier+key chord such as `Alt+A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    key: String,
    alt: bool,
    ctrl: bool,
    meta: bool,
    shift: bool,
}

impl Hotkey {
    pub fn parse(chord: &str) -> Result<Self, HotkeyError> {
        let event = parse_chord(chord)?;
        Ok(Self {
            key: event.key.to_lowercase(),
            alt: event.alt,
            ctrl: event.ctrl,
            meta: event.meta,
            shift: event.shift,
        })
    }

    /// Modifiers must match exactly; the key is compared
    /// case-insensitively. Presses in editable fields never match.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        !event.target_editable
            && event.alt == self.alt
            && event.ctrl == self.ctrl
            && event.meta == self.meta
            && event.shift == self.shift
            && event.key.to_lowercase() == self.key
    }
}

impl KeyEvent {
    /// Build a key event from chord text, e.g. a host that reads key
    /// presses as `Alt+A`.
    pub fn from_chord(chord: &str) -> Result<Self, HotkeyError> {
        parse_chord(chord)
    }
}

fn parse_chord(chord: &str) -> Result<KeyEvent, HotkeyError> {
    let parts: Vec<&str> = chord.split('+').map(str::trim).collect();
    if parts.iter().all(|p| p.is_empty()) {
        return Err(HotkeyError::Empty);
    }
    let (key, modifiers) = parts
        .split_last()
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| HotkeyError::MissingKey(chord.to_string()))?;

    let mut event = KeyEvent {
        key: key.to_string(),
        ..Default::default()
    };
    for modifier in modifiers {
        match modifier.to_ascii_lowercase().as_str() {
            "alt" | "option" => event.alt = true,
            "ctrl" | "control" => event.ctrl = true,
            "meta" | "cmd" | "super" => event.meta = true,
            "shift" => event.shift = true,
            other => return Err(HotkeyError::UnknownModifier(other.to_string())),
        }
    }
    Ok(event)
}
