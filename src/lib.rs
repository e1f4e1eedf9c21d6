//! ## Design
//!
//! * one interpreter instance owns the whole machine; nothing global, so any
//!   number of them can coexist (handy for tests)
//! * timers tick once per executed instruction, not against a wall clock;
//!   the environment paces instructions with a sleep so wall-clock speed is
//!   only approximately right
//! * abstract display, input and sound behind traits so the core doesn't
//!   care how any of them work; starting with TUI in-console
//! * fatal conditions (bad opcode, stack over/underflow, oversized program)
//!   come back as `Chip8Error`; the binary decides to exit
//!
//! Model
//!
//! Environment
//!  |-- display, input, sound, config
//!  |-- interpreter
//!  |    |-- memory (font + program)
//!  |    |-- instruction decoder
//!  |    |-- registers, stack, timers, keypad, framebuffer
//!  |    `-- cycle() -> Executed { beep } | AwaitingKey { beep }
//!  `-- main loop
//!       |-- poll input once per frame (every cycle while FX0A waits)
//!       |-- interpreter.cycle()
//!       |-- beep on the sound timer running out
//!       |-- redraw once per frame if the framebuffer changed
//!       `-- sleep(cycle period - time taken)
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod sound;
pub mod timer;

pub use config::Config;
pub use environment::{Environment, RunSummary};
pub use error::{Chip8Error, Result};
pub use framebuffer::Framebuffer;
pub use instruction::Instruction;
pub use interpreter::{Chip8Interpreter, Cycle};
