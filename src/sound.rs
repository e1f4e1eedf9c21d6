use crate::error::{Chip8Error, Result};
use beep::beep;
use log::debug;

/// makes the noise when the sound timer runs out
pub trait Sound {
    /// start the tone
    fn beep(&mut self) -> Result<()>;
    /// silence it again
    fn stop(&mut self) -> Result<()>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker tone via the beep crate
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<()> {
        beep(SIMPLEBEEP_PITCH).map_err(|e| Chip8Error::Sound(e.to_string()))?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.is_beeping {
            beep(0).map_err(|e| Chip8Error::Sound(e.to_string()))?;
            self.is_beeping = false;
        }
        Ok(())
    }
}

pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Default for Mute {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<()> {
        debug!("beep (muted)");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

/// dummy Sound implementation for testing; counts what it was asked to do
#[derive(Default)]
pub struct DummySound {
    pub beeps: usize,
    pub stops: usize,
}

impl DummySound {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sound for DummySound {
    fn beep(&mut self) -> Result<()> {
        self.beeps += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.stops += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_is_silent() -> Result<()> {
        let mut m = Mute::new();
        m.beep()?;
        m.stop()
    }

    #[test]
    fn test_simple_beep_stop_without_beep_is_noop() -> Result<()> {
        // never touches the speaker unless a tone is playing
        let mut b = SimpleBeep::new();
        b.stop()
    }

    #[test]
    fn test_dummy_counts() -> Result<()> {
        let mut d = DummySound::new();
        d.beep()?;
        d.stop()?;
        d.stop()?;
        assert_eq!((d.beeps, d.stops), (1, 2));
        Ok(())
    }
}
