use crate::error::Result;
use crate::keypad::KEY_COUNT;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// map of keys on the left-hand side of a qwerty keyboard to the COSMAC hex
/// keypad it stands in for:
///   1 2 3 4        1 2 3 C
///   q w e r   =>   4 5 6 D
///   a s d f        7 8 9 E
///   z x c v        A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// what the input source saw since it was last polled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputState {
    /// held state of every logical key
    Keys([bool; KEY_COUNT]),
    /// the user wants out
    Quit,
}

/// reads keypresses
pub trait Input {
    /// drain pending host events and report the keypad; must not block
    fn poll(&mut self) -> Result<InputState>;
}

/// keyboard input from the terminal, via crossterm
pub struct TermInput {
    keymap: HashMap<char, u8>,
    held_until: [Option<Instant>; KEY_COUNT],
    hold: Duration,
}

impl TermInput {
    pub fn new(hold: Duration) -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held_until: [None; KEY_COUNT],
            hold,
        })
    }

    /// returns false if the user asked to quit
    fn handle_key(&mut self, evt: KeyEvent, now: Instant) -> bool {
        match evt.code {
            KeyCode::Esc => return false,
            KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                Some(&mapped) => {
                    self.held_until[mapped as usize] = match evt.kind {
                        KeyEventKind::Release => None,
                        _ => Some(now + self.hold),
                    }
                }
                None => warn!("can't map {:?} to a COSMAC key", key),
            },
            _ => {}
        }
        true
    }

    fn keys(&self, now: Instant) -> [bool; KEY_COUNT] {
        let mut keys = [false; KEY_COUNT];
        for (key, until) in keys.iter_mut().zip(self.held_until.iter()) {
            *key = until.map_or(false, |t| t > now);
        }
        keys
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll(&mut self) -> Result<InputState> {
        let now = Instant::now();
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                if !self.handle_key(evt, now) {
                    return Ok(InputState::Quit);
                }
            }
        }
        Ok(InputState::Keys(self.keys(now)))
    }
}

/// dummy Input implementation for testing; replays a script, then reports
/// nothing held
pub struct DummyInput {
    script: VecDeque<InputState>,
    pub polls: usize,
}

impl DummyInput {
    pub fn new(script: &[InputState]) -> Self {
        DummyInput {
            script: script.iter().copied().collect(),
            polls: 0,
        }
    }

    /// key map with just `key` held
    pub fn tap(key: u8) -> [bool; KEY_COUNT] {
        let mut keys = [false; KEY_COUNT];
        keys[(key & 0x0f) as usize] = true;
        keys
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<InputState> {
        self.polls += 1;
        Ok(self
            .script
            .pop_front()
            .unwrap_or(InputState::Keys([false; KEY_COUNT])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key_event(c: char, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn term_input() -> TermInput {
        // skip raw mode, tests don't own a terminal
        TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held_until: [None; KEY_COUNT],
            hold: Duration::from_millis(100),
        }
    }

    #[test]
    fn test_keymap_covers_every_key() {
        let mut codes: Vec<u8> = CHIP8_CONVENTIONAL_KEYMAP.iter().map(|&(_, k)| k).collect();
        codes.sort_unstable();
        assert_eq!(codes, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_press_held_for_hold_time() {
        let mut input = term_input();
        let now = Instant::now();
        assert!(input.handle_key(key_event('4', KeyEventKind::Press), now));
        assert!(input.keys(now)[0xc]);
        assert!(input.keys(now + Duration::from_millis(50))[0xc]);
        assert!(!input.keys(now + Duration::from_millis(150))[0xc]);
    }

    #[test]
    fn test_release_event_lets_go() {
        let mut input = term_input();
        let now = Instant::now();
        input.handle_key(key_event('V', KeyEventKind::Press), now);
        assert!(input.keys(now)[0xf]);
        input.handle_key(key_event('v', KeyEventKind::Release), now);
        assert!(!input.keys(now)[0xf]);
    }

    #[test]
    fn test_escape_quits() {
        let mut input = term_input();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(!input.handle_key(esc, Instant::now()));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!input.handle_key(ctrl_c, Instant::now()));
    }

    #[test]
    fn test_unmapped_key_ignored() {
        let mut input = term_input();
        let now = Instant::now();
        assert!(input.handle_key(key_event('p', KeyEventKind::Press), now));
        assert_eq!(input.keys(now), [false; KEY_COUNT]);
    }

    #[test]
    fn test_dummy_replays_script() -> Result<()> {
        let mut input = DummyInput::new(&[
            InputState::Keys(DummyInput::tap(0x5)),
            InputState::Quit,
        ]);
        assert_eq!(input.poll()?, InputState::Keys(DummyInput::tap(0x5)));
        assert_eq!(input.poll()?, InputState::Quit);
        assert_eq!(input.poll()?, InputState::Keys([false; KEY_COUNT]));
        assert_eq!(input.polls, 3);
        Ok(())
    }
}
