/// Keyboard handling: turns raw terminal events into one snapshot per tick.
///
/// Input model: instead of acting on each key event as it arrives, we keep a
/// `key_frame` map recording the tick of the last press/repeat event for
/// every key.  A key is "held" while that tick is fresh.  Discrete edges
/// (fire presses, close requests) are counted separately and handed out once.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper
///   `Press` / `Repeat` / `Release` events, so keys drop on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows up as
///   repeated presses).  Keys expire after `hold_window` ticks of silence.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the game sees of the keyboard during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    /// Fire key presses since the previous snapshot.
    pub fire_presses: u32,
    pub close_requested: bool,
}

#[derive(Debug)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    hold_window: u64,
    fire_presses: u32,
    close_requested: bool,
}

impl KeyTracker {
    pub fn new(hold_window: u64) -> Self {
        Self {
            key_frame: HashMap::new(),
            frame: 0,
            hold_window,
            fire_presses: 0,
            close_requested: false,
        }
    }

    /// Call once at the start of each tick, before feeding events.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = event
        else {
            return;
        };

        match kind {
            KeyEventKind::Press => {
                self.key_frame.insert(*code, self.frame);
                match code {
                    KeyCode::Char(' ') => self.fire_presses += 1,
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.close_requested = true;
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        self.close_requested = true;
                    }
                    _ => {}
                }
            }
            // Repeat keeps a key held but is never a fresh edge
            KeyEventKind::Repeat => {
                self.key_frame.insert(*code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(code);
            }
        }
    }

    fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= self.hold_window)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_held(k))
    }

    /// Current held state plus the edges collected since the last call.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            up: self.any_held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
            down: self.any_held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
            fire_presses: self.fire_presses,
            close_requested: self.close_requested,
        };
        self.fire_presses = 0;
        snapshot
    }
}
