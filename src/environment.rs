/// # environment
///
/// The host loop: owns the interpreter, borrows the display, input and sound
/// devices, and decides when each of them gets called.
///
///  main loop
///   |-- every frame: poll input, push the keypad into the interpreter
///   |-- interpreter.cycle()
///   |     `-- AwaitingKey: keep polling input every cycle until FX0A resolves
///   |-- on a beep: start the tone, stop it BEEP_LENGTH later; a sound
///   |   device that fails is logged and left alone from then on
///   |-- every frame: redraw if the interpreter asked for it
///   `-- sleep off the rest of the cycle period
use crate::config::Config;
use crate::display::Display;
use crate::error::{Chip8Error, Result};
use crate::input::{Input, InputState};
use crate::interpreter::{Chip8Interpreter, Cycle};
use crate::sound::Sound;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

const BEEP_LENGTH: Duration = Duration::from_millis(120);

/// what happened during a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// instructions executed
    pub cycles: u64,
    /// frames sent to the display
    pub frames: u64,
    /// the input source asked to stop
    pub quit: bool,
}

pub struct Environment<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    sound_failed: bool,
    config: Config,
}

impl<'a> Environment<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: Config,
    ) -> Self {
        Environment {
            interpreter,
            display,
            input,
            sound,
            sound_failed: false,
            config,
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    /// Run until the user quits or `max_cycles` instructions have executed.
    /// Interpreter, display and input errors end the run. Sound is not worth
    /// stopping for, so a failing sound device just goes quiet.
    pub fn run(&mut self) -> Result<RunSummary> {
        let cycle_period = self.config.cycle_period();
        let frame_period = self.config.frame_period();
        let mut summary = RunSummary::default();
        let mut last_frame: Option<Instant> = None;
        let mut beep_until: Option<Instant> = None;

        info!(
            "running at {} cycles/s, {} frames/s",
            self.config.cycles_per_second, self.config.frames_per_second
        );

        loop {
            if let Some(max) = self.config.max_cycles {
                if summary.cycles >= max {
                    break;
                }
            }

            let started = Instant::now();
            let frame_due = last_frame.map_or(true, |t| started.duration_since(t) >= frame_period);

            if frame_due || self.interpreter.is_waiting_for_key() {
                match self.input.poll()? {
                    InputState::Quit => {
                        summary.quit = true;
                        break;
                    }
                    InputState::Keys(keys) => self.interpreter.set_keys(keys),
                }
            }

            let beep = match self.interpreter.cycle()? {
                Cycle::Executed { beep, .. } => {
                    summary.cycles += 1;
                    beep
                }
                Cycle::AwaitingKey { beep, .. } => beep,
            };
            if beep && self.start_beep() {
                beep_until = Some(started + BEEP_LENGTH);
            }

            if frame_due {
                if self.interpreter.take_draw_request() {
                    self.display.draw(self.interpreter.framebuffer())?;
                    summary.frames += 1;
                }
                last_frame = Some(started);
            }

            if beep_until.map_or(false, |t| started >= t) {
                self.stop_beep();
                beep_until = None;
            }

            let elapsed = started.elapsed();
            if elapsed < cycle_period {
                spin_sleep::sleep(cycle_period - elapsed);
            }
        }

        if beep_until.is_some() {
            self.stop_beep();
        }
        info!(
            "stopped after {} cycles, {} frames",
            summary.cycles, summary.frames
        );
        debug!("{:?}", summary);
        Ok(summary)
    }

    /// returns true if the tone started
    fn start_beep(&mut self) -> bool {
        if self.sound_failed {
            return false;
        }
        match self.sound.beep() {
            Ok(()) => true,
            Err(e) => {
                self.give_up_on_sound(e);
                false
            }
        }
    }

    fn stop_beep(&mut self) {
        if self.sound_failed {
            return;
        }
        if let Err(e) = self.sound.stop() {
            self.give_up_on_sound(e);
        }
    }

    fn give_up_on_sound(&mut self, e: Chip8Error) {
        warn!("sound device failed, carrying on muted: {}", e);
        self.sound_failed = true;
    }
}
