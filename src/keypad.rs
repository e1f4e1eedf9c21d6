/// number of keys on the COSMAC VIP hex keypad
pub const KEY_COUNT: usize = 16;

/// Which of the 16 logical keys (0x0-0xF) are held down. Written by the
/// input source, read by EX9E, EXA1 and FX0A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// key codes are masked to a nibble
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0f) as usize]
    }

    /// returns true if this was a fresh press, i.e. the key was up before
    pub fn press(&mut self, key: u8) -> bool {
        let slot = &mut self.keys[(key & 0x0f) as usize];
        let fresh = !*slot;
        *slot = true;
        fresh
    }

    pub fn release(&mut self, key: u8) {
        self.keys[(key & 0x0f) as usize] = false;
    }

    /// replace the whole key map; returns the lowest key code that went from up to down
    pub fn update(&mut self, keys: [bool; KEY_COUNT]) -> Option<u8> {
        let fresh = (0..KEY_COUNT).find(|&k| keys[k] && !self.keys[k]);
        self.keys = keys;
        fresh.map(|k| k as u8)
    }
}
