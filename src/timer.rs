use log::debug;

/// The delay and sound counters. Both count down by one per completed
/// instruction cycle and stop at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count both timers down. Returns true exactly when the sound timer
    /// went from 1 to 0, which is when the host should beep.
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        let beep = self.sound == 1;
        self.sound = self.sound.saturating_sub(1);
        if beep {
            debug!("sound timer expired");
        }
        beep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_counts_down_and_stops() {
        let mut t = Timers { delay: 5, sound: 0 };
        for expected in (0..5).rev() {
            t.tick();
            assert_eq!(t.delay, expected);
        }
        t.tick();
        assert_eq!(t.delay, 0);
    }

    #[test]
    fn test_single_beep_on_expiry() {
        let mut t = Timers { delay: 0, sound: 3 };
        let beeps: Vec<bool> = (0..6).map(|_| t.tick()).collect();
        assert_eq!(beeps, [false, false, true, false, false, false]);
        assert_eq!(t.sound, 0);
    }

    #[test]
    fn test_idle_timers_stay_quiet() {
        let mut t = Timers::new();
        assert!(!t.tick());
        assert_eq!(t, Timers::new());
    }
}
