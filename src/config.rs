use std::time::Duration;

/// How the environment drives the interpreter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// instructions executed per wall-clock second; the timers tick once per
    /// instruction so this is also their rate
    pub cycles_per_second: u32,
    /// upper bound on redraws and input polls per second
    pub frames_per_second: u32,
    /// terminals report key presses but not releases, so a press counts as
    /// held for this long
    pub key_hold: Duration,
    /// fixed seed for CXKK, otherwise seeded from the OS
    pub seed: Option<u64>,
    pub mute: bool,
    /// stop after this many executed instructions
    pub max_cycles: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cycles_per_second: 500,
            frames_per_second: 60,
            key_hold: Duration::from_millis(150),
            seed: None,
            mute: false,
            max_cycles: None,
        }
    }
}

impl Config {
    pub fn cycle_period(&self) -> Duration {
        Duration::from_secs(1) / self.cycles_per_second.max(1)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.frames_per_second.max(1)
    }
}
