use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use log::error;

use chip8::display::MonoTermDisplay;
use chip8::input::TermInput;
use chip8::sound::{Mute, SimpleBeep, Sound};
use chip8::{Chip8Interpreter, Config, Environment, Result, RunSummary};

/// CHIP-8 interpreter in the terminal. Keys 1234/qwer/asdf/zxcv are the hex
/// keypad, Esc quits.
#[derive(Parser, Debug)]
#[command(name = "chip8", version)]
struct Args {
    /// Path to a raw CHIP-8 program image
    rom: PathBuf,

    /// Instructions per second (timers tick once per instruction)
    #[arg(long, default_value_t = 500)]
    hz: u32,

    /// Maximum redraws per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// How long a key press counts as held, in milliseconds
    #[arg(long, default_value_t = 150)]
    hold_ms: u64,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// No beeping
    #[arg(short, long)]
    mute: bool,

    /// Stop after this many instructions
    #[arg(long)]
    max_cycles: Option<u64>,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            cycles_per_second: args.hz,
            frames_per_second: args.fps,
            key_hold: Duration::from_millis(args.hold_ms),
            seed: args.seed,
            mute: args.mute,
            max_cycles: args.max_cycles,
        }
    }
}

fn run(config: Config, interpreter: Chip8Interpreter) -> Result<RunSummary> {
    // input first so raw mode is on before the display takes the screen
    let mut input = TermInput::new(config.key_hold)?;
    let mut display = MonoTermDisplay::new()?;
    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };
    let mut env = Environment::new(
        interpreter,
        &mut display,
        &mut input,
        sound.as_mut(),
        config,
    );
    env.run()
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let config = Config::from(&args);

    // load a program; nothing runs if this fails
    let mut interpreter = match config.seed {
        Some(seed) => Chip8Interpreter::with_seed(seed),
        None => Chip8Interpreter::new(),
    };
    let loaded = File::open(&args.rom)
        .map_err(Into::into)
        .and_then(|mut f| interpreter.load_program(&mut f));
    if let Err(e) = loaded {
        error!("can't load {}: {}", args.rom.display(), e);
        eprintln!("can't load {}: {}", args.rom.display(), e);
        process::exit(2);
    }

    // the terminal is restored by the time run() returns
    match run(config, interpreter) {
        Ok(summary) => {
            println!(
                "ran {} instructions, drew {} frames",
                summary.cycles, summary.frames
            );
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("chip8: {}", e);
            process::exit(1);
        }
    }
}
