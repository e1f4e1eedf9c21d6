use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Everything that can stop the interpreter. None of these are recoverable;
/// the host decides how to report them and shut down.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("unsupported opcode 0x{opcode:04X} at pc 0x{pc:03X}")]
    UnsupportedOpcode { opcode: u16, pc: u16 },
    #[error("call stack overflow at pc 0x{pc:03X}")]
    StackOverflow { pc: u16 },
    #[error("return with empty call stack at pc 0x{pc:03X}")]
    StackUnderflow { pc: u16 },
    #[error("program is {len} bytes but only {max} fit in memory")]
    ProgramTooLarge { len: usize, max: usize },
    #[error("sound device: {0}")]
    Sound(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_names_opcode_and_pc() {
        let e = Chip8Error::UnsupportedOpcode {
            opcode: 0x0123,
            pc: 0x204,
        };
        assert_eq!(e.to_string(), "unsupported opcode 0x0123 at pc 0x204");
    }

    #[test]
    fn test_io_errors_convert() {
        let e: Chip8Error = io::Error::new(io::ErrorKind::NotFound, "no rom").into();
        assert!(matches!(e, Chip8Error::Io(_)));
        assert_eq!(e.to_string(), "no rom");
    }
}
