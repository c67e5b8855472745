//! Key bindings.
//!
//! Keys are mapped to [`Action`]s so the event loop only has to carry
//! them out. `gg` and `zz` are two-key sequences; any other key clears a
//! half-typed prefix.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    Quit,
    SwitchPane,
    CursorDown,
    CursorUp,
    CursorFirst,
    CursorLast,
    CursorToPlaying,
    /// Play the selected track, or open the selected album.
    Activate,
    TogglePlayPause,
    Next,
    Previous,
    /// Scrub by this many seconds (negative is backwards).
    SeekBy(i64),
    /// Jump to a fraction of the track.
    SeekTo(f64),
    VolumeUp,
    VolumeDown,
    ToggleMute,
    Reload,
}

/// Half-typed two-key sequence.
#[derive(Debug, Default)]
pub struct InputState {
    pending: Option<char>,
}

impl InputState {
    pub fn action_for_key(&mut self, key: KeyEvent, scrub_seconds: u64) -> Option<Action> {
        let pending = self.pending.take();
        let scrub = scrub_seconds.min(i64::MAX as u64) as i64;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Action::Quit),
                _ => None,
            };
        }

        let action = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Tab | KeyCode::BackTab => Action::SwitchPane,
            KeyCode::Char('j') | KeyCode::Down => Action::CursorDown,
            KeyCode::Char('k') | KeyCode::Up => Action::CursorUp,
            KeyCode::Char('G') | KeyCode::End => Action::CursorLast,
            KeyCode::Home => Action::CursorFirst,
            KeyCode::Char(c @ ('g' | 'z')) => {
                if pending == Some(c) {
                    if c == 'g' {
                        Action::CursorFirst
                    } else {
                        Action::CursorToPlaying
                    }
                } else {
                    self.pending = Some(c);
                    return None;
                }
            }
            KeyCode::Enter => Action::Activate,
            KeyCode::Char(' ') | KeyCode::Char('p') => Action::TogglePlayPause,
            KeyCode::Char('l') => Action::Next,
            KeyCode::Char('h') => Action::Previous,
            KeyCode::Char('L') | KeyCode::Right => Action::SeekBy(scrub),
            KeyCode::Char('H') | KeyCode::Left => Action::SeekBy(-scrub),
            KeyCode::Char(d @ '0'..='9') => {
                let tenth = d.to_digit(10).unwrap_or(0);
                Action::SeekTo(f64::from(tenth) / 10.0)
            }
            KeyCode::Char('+') | KeyCode::Char('=') => Action::VolumeUp,
            KeyCode::Char('-') => Action::VolumeDown,
            KeyCode::Char('m') => Action::ToggleMute,
            KeyCode::Char('r') => Action::Reload,
            _ => return None,
        };
        Some(action)
    }
}
