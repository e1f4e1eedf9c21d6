/// # instruction
///
/// Decoding happens in two steps: two bytes from memory become a raw opcode
/// word, then the word is parsed into one of the variants below. Anything
/// that isn't a variant is rejected before it gets near the machine state.
///
/// Operand naming follows the usual CHIP-8 notation:
///  * NNN - low 12 bits, an address
///  * KK  - low 8 bits, an immediate byte
///  * N   - low 4 bits
///  * X   - bits 8-11, a register index
///  * Y   - bits 4-7, a register index
use std::fmt;

/// combine the two bytes at pc and pc+1 into an opcode word
#[inline(always)]
pub fn fetch(high: u8, low: u8) -> u16 {
    (high as u16) << 8 | low as u16
}

/// raw opcode word with field accessors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            (self.0 >> 12) as u8 & 0xf,
            (self.0 >> 8) as u8 & 0xf,
            (self.0 >> 4) as u8 & 0xf,
            self.0 as u8 & 0xf,
        )
    }
    pub fn x(self) -> u8 {
        (self.0 >> 8) as u8 & 0xf
    }
    pub fn y(self) -> u8 {
        (self.0 >> 4) as u8 & 0xf
    }
    pub fn n(self) -> u8 {
        self.0 as u8 & 0xf
    }
    pub fn kk(self) -> u8 {
        self.0 as u8
    }
    pub fn nnn(self) -> u16 {
        self.0 & 0x0fff
    }
}

/// The closed set of CHIP-8 instructions. Register operands are already
/// masked to 0x0-0xF and addresses to 12 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN - call a native RCA 1802 routine
    Sys(u16),
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XKK
    SkipIfEqualImm(u8, u8),
    /// 4XKK
    SkipIfNotEqualImm(u8, u8),
    /// 5XY0
    SkipIfEqual(u8, u8),
    /// 6XKK
    LoadImm(u8, u8),
    /// 7XKK
    AddImm(u8, u8),
    /// 8XY0
    Move(u8, u8),
    /// 8XY1
    Or(u8, u8),
    /// 8XY2
    And(u8, u8),
    /// 8XY3
    Xor(u8, u8),
    /// 8XY4
    Add(u8, u8),
    /// 8XY5
    Sub(u8, u8),
    /// 8XY6
    ShiftRight(u8, u8),
    /// 8XY7
    SubReverse(u8, u8),
    /// 8XYE
    ShiftLeft(u8, u8),
    /// 9XY0
    SkipIfNotEqual(u8, u8),
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXKK
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipIfKeyPressed(u8),
    /// EXA1
    SkipIfKeyNotPressed(u8),
    /// FX07
    LoadDelayTimer(u8),
    /// FX0A
    WaitForKey(u8),
    /// FX15
    SetDelayTimer(u8),
    /// FX18
    SetSoundTimer(u8),
    /// FX1E
    AddIndex(u8),
    /// FX29
    LoadGlyph(u8),
    /// FX33
    StoreBcd(u8),
    /// FX55
    StoreRegisters(u8),
    /// FX65
    LoadRegisters(u8),
}

impl Instruction {
    /// Parse an opcode word. Dispatch is on the top nibble first, then on the
    /// low nibble or low byte where several instructions share it. Returns
    /// `None` for bit patterns that aren't instructions.
    pub fn decode(word: u16) -> Option<Self> {
        use Instruction::*;
        let op = Opcode(word);
        let (x, y, n, kk, nnn) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());

        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xe, 0x0) => ClearScreen,
            (0x0, 0x0, 0xe, 0xe) => Return,
            (0x0, _, _, _) => Sys(nnn),
            (0x1, _, _, _) => Jump(nnn),
            (0x2, _, _, _) => Call(nnn),
            (0x3, _, _, _) => SkipIfEqualImm(x, kk),
            (0x4, _, _, _) => SkipIfNotEqualImm(x, kk),
            (0x5, _, _, 0x0) => SkipIfEqual(x, y),
            (0x6, _, _, _) => LoadImm(x, kk),
            (0x7, _, _, _) => AddImm(x, kk),
            (0x8, _, _, 0x0) => Move(x, y),
            (0x8, _, _, 0x1) => Or(x, y),
            (0x8, _, _, 0x2) => And(x, y),
            (0x8, _, _, 0x3) => Xor(x, y),
            (0x8, _, _, 0x4) => Add(x, y),
            (0x8, _, _, 0x5) => Sub(x, y),
            (0x8, _, _, 0x6) => ShiftRight(x, y),
            (0x8, _, _, 0x7) => SubReverse(x, y),
            (0x8, _, _, 0xe) => ShiftLeft(x, y),
            (0x9, _, _, 0x0) => SkipIfNotEqual(x, y),
            (0xa, _, _, _) => LoadIndex(nnn),
            (0xb, _, _, _) => JumpOffset(nnn),
            (0xc, _, _, _) => Random(x, kk),
            (0xd, _, _, _) => Draw(x, y, n),
            (0xe, _, 0x9, 0xe) => SkipIfKeyPressed(x),
            (0xe, _, 0xa, 0x1) => SkipIfKeyNotPressed(x),
            (0xf, _, 0x0, 0x7) => LoadDelayTimer(x),
            (0xf, _, 0x0, 0xa) => WaitForKey(x),
            (0xf, _, 0x1, 0x5) => SetDelayTimer(x),
            (0xf, _, 0x1, 0x8) => SetSoundTimer(x),
            (0xf, _, 0x1, 0xe) => AddIndex(x),
            (0xf, _, 0x2, 0x9) => LoadGlyph(x),
            (0xf, _, 0x3, 0x3) => StoreBcd(x),
            (0xf, _, 0x5, 0x5) => StoreRegisters(x),
            (0xf, _, 0x6, 0x5) => LoadRegisters(x),
            _ => return None,
        };
        Some(instruction)
    }
}

/// disassembly, in the mnemonics of Cowgod's technical reference
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Sys(nnn) => write!(f, "SYS 0x{:03X}", nnn),
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(nnn) => write!(f, "JP 0x{:03X}", nnn),
            Call(nnn) => write!(f, "CALL 0x{:03X}", nnn),
            SkipIfEqualImm(x, kk) => write!(f, "SE V{:X}, 0x{:02X}", x, kk),
            SkipIfNotEqualImm(x, kk) => write!(f, "SNE V{:X}, 0x{:02X}", x, kk),
            SkipIfEqual(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm(x, kk) => write!(f, "LD V{:X}, 0x{:02X}", x, kk),
            AddImm(x, kk) => write!(f, "ADD V{:X}, 0x{:02X}", x, kk),
            Move(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            Add(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight(x, y) => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubReverse(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft(x, y) => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipIfNotEqual(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(nnn) => write!(f, "LD I, 0x{:03X}", nnn),
            JumpOffset(nnn) => write!(f, "JP V0, 0x{:03X}", nnn),
            Random(x, kk) => write!(f, "RND V{:X}, 0x{:02X}", x, kk),
            Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipIfKeyPressed(x) => write!(f, "SKP V{:X}", x),
            SkipIfKeyNotPressed(x) => write!(f, "SKNP V{:X}", x),
            LoadDelayTimer(x) => write!(f, "LD V{:X}, DT", x),
            WaitForKey(x) => write!(f, "LD V{:X}, K", x),
            SetDelayTimer(x) => write!(f, "LD DT, V{:X}", x),
            SetSoundTimer(x) => write!(f, "LD ST, V{:X}", x),
            AddIndex(x) => write!(f, "ADD I, V{:X}", x),
            LoadGlyph(x) => write!(f, "LD F, V{:X}", x),
            StoreBcd(x) => write!(f, "LD B, V{:X}", x),
            StoreRegisters(x) => write!(f, "LD [I], V{:X}", x),
            LoadRegisters(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
