/// # interpreter
///
/// Machine state, as seen by a CHIP-8 program:
///  * V0-VF     sixteen 8-bit registers; VF doubles as the carry, borrow and
///              collision flag, so programs can't rely on it surviving 8XY4,
///              8XY5, 8XY6, 8XY7, 8XYE or DXYN
///  * I         16-bit index register, an address for the memory opcodes
///  * PC        starts at 0x200, moves on by 2 per instruction, 4 on a skip
///  * stack     sixteen return addresses, only touched by 2NNN and 00EE
///  * DT, ST    delay and sound timers, see `timer`
///  * keypad    written from outside, read by EX9E, EXA1 and FX0A
///  * display   64x32 plane plus a flag telling the renderer it changed
///
/// One call to `cycle` runs exactly one instruction then ticks the timers.
/// FX0A doesn't block: it parks the interpreter and every `cycle` reports
/// `Cycle::AwaitingKey` until a fresh key press comes in through
/// `press_key` or `set_keys`. Parked cycles still tick the timers.
use crate::error::{Chip8Error, Result};
use crate::framebuffer::Framebuffer;
use crate::instruction::Instruction;
use crate::keypad::{Keypad, KEY_COUNT};
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_ADDR_MASK};
use crate::timer::Timers;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

pub const REG_COUNT: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const VFLAG: usize = 0xf;

/// sprites are at most 15 rows tall
const MAX_SPRITE_ROWS: usize = 15;

/// What a call to `cycle` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cycle {
    /// one instruction ran and the timers ticked; `beep` is set on the cycle
    /// the sound timer ran out
    Executed { instruction: Instruction, beep: bool },
    /// FX0A is waiting for a key to store in `register`; nothing ran but the
    /// timers ticked all the same
    AwaitingKey { register: u8, beep: bool },
}

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    framebuffer: Framebuffer,
    keypad: Keypad,
    timers: Timers,
    v: [u8; REG_COUNT],
    i: u16,
    pc: u16,
    stack: [u16; STACK_SIZE],
    sp: usize,
    draw_requested: bool,
    waiting_for_key: Option<u8>,
    rng: StdRng,
}

impl Chip8Interpreter {
    /// fresh machine, random numbers seeded from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// fresh machine with a reproducible CXKK sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let memory = Chip8MemoryMap::new();
        let pc = memory.program_addr;
        Chip8Interpreter {
            memory,
            framebuffer: Framebuffer::new(),
            keypad: Keypad::new(),
            timers: Timers::new(),
            v: [0; REG_COUNT],
            i: 0,
            pc,
            stack: [0; STACK_SIZE],
            sp: 0,
            draw_requested: false,
            waiting_for_key: None,
            rng,
        }
    }

    /// load a chip8 program
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        self.memory.load_program(reader)
    }

    /// Fetch, decode and execute one instruction, then tick the timers.
    /// Errors are fatal: the machine is left as it was before the
    /// offending instruction.
    pub fn cycle(&mut self) -> Result<Cycle> {
        if let Some(register) = self.waiting_for_key {
            let beep = self.timers.tick();
            return Ok(Cycle::AwaitingKey { register, beep });
        }

        let pc = self.pc;
        let opcode = self.memory.get_word(pc);
        let instruction =
            Instruction::decode(opcode).ok_or(Chip8Error::UnsupportedOpcode { opcode, pc })?;
        trace!("0x{:03x}: {:04x}  {}", pc, opcode, instruction);

        self.execute(instruction, opcode)?;
        let beep = self.timers.tick();

        if let Some(register) = self.waiting_for_key {
            debug!("waiting for a key press into V{:X}", register);
            return Ok(Cycle::AwaitingKey { register, beep });
        }
        Ok(Cycle::Executed { instruction, beep })
    }

    fn execute(&mut self, instruction: Instruction, opcode: u16) -> Result<()> {
        use Instruction::*;
        match instruction {
            Sys(_) => {
                return Err(Chip8Error::UnsupportedOpcode {
                    opcode,
                    pc: self.pc,
                })
            }
            ClearScreen => {
                self.framebuffer.clear();
                self.draw_requested = true;
                self.next();
            }
            Return => {
                if self.sp == 0 {
                    return Err(Chip8Error::StackUnderflow { pc: self.pc });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
                debug!("return to 0x{:03x}, depth {}", self.pc, self.sp);
                self.next();
            }
            Jump(nnn) => self.pc = nnn,
            Call(nnn) => {
                if self.sp == STACK_SIZE {
                    return Err(Chip8Error::StackOverflow { pc: self.pc });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                debug!("call 0x{:03x} from 0x{:03x}, depth {}", nnn, self.pc, self.sp);
                self.pc = nnn;
            }
            SkipIfEqualImm(x, kk) => self.skip_if(self.reg(x) == kk),
            SkipIfNotEqualImm(x, kk) => self.skip_if(self.reg(x) != kk),
            SkipIfEqual(x, y) => self.skip_if(self.reg(x) == self.reg(y)),
            LoadImm(x, kk) => self.set_and_next(x, kk),
            AddImm(x, kk) => self.set_and_next(x, self.reg(x).wrapping_add(kk)),
            Move(x, y) => self.set_and_next(x, self.reg(y)),
            Or(x, y) => self.set_and_next(x, self.reg(x) | self.reg(y)),
            And(x, y) => self.set_and_next(x, self.reg(x) & self.reg(y)),
            Xor(x, y) => self.set_and_next(x, self.reg(x) ^ self.reg(y)),
            Add(x, y) => {
                let sum = self.reg(x) as u16 + self.reg(y) as u16;
                self.flag_and_set(x, (sum > 0xff) as u8, sum as u8);
            }
            Sub(x, y) => {
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.flag_and_set(x, (vx >= vy) as u8, vx.wrapping_sub(vy));
            }
            ShiftRight(x, _) => {
                let vx = self.reg(x);
                self.flag_and_set(x, vx & 0x01, vx >> 1);
            }
            SubReverse(x, y) => {
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.flag_and_set(x, (vy >= vx) as u8, vy.wrapping_sub(vx));
            }
            ShiftLeft(x, _) => {
                let vx = self.reg(x);
                self.flag_and_set(x, vx >> 7, vx << 1);
            }
            SkipIfNotEqual(x, y) => self.skip_if(self.reg(x) != self.reg(y)),
            LoadIndex(nnn) => {
                self.i = nnn;
                self.next();
            }
            JumpOffset(nnn) => self.pc = (nnn + self.v[0] as u16) & CHIP8_ADDR_MASK,
            Random(x, kk) => {
                let r: u8 = self.rng.gen();
                self.set_and_next(x, r & kk);
            }
            Draw(x, y, n) => {
                let rows = n as usize;
                let mut sprite = [0u8; MAX_SPRITE_ROWS];
                for (row, byte) in sprite.iter_mut().take(rows).enumerate() {
                    *byte = self.memory.get_byte(self.i.wrapping_add(row as u16));
                }
                let (vx, vy) = (self.reg(x), self.reg(y));
                let collision = self.framebuffer.draw_sprite(vx, vy, &sprite[..rows]);
                self.v[VFLAG] = collision as u8;
                self.draw_requested = true;
                self.next();
            }
            SkipIfKeyPressed(x) => self.skip_if(self.keypad.is_pressed(self.reg(x))),
            SkipIfKeyNotPressed(x) => self.skip_if(!self.keypad.is_pressed(self.reg(x))),
            LoadDelayTimer(x) => self.set_and_next(x, self.timers.delay),
            // pc stays put until the key arrives; see `resolve_key`
            WaitForKey(x) => self.waiting_for_key = Some(x),
            SetDelayTimer(x) => {
                self.timers.delay = self.reg(x);
                self.next();
            }
            SetSoundTimer(x) => {
                self.timers.sound = self.reg(x);
                self.next();
            }
            AddIndex(x) => {
                self.i = self.i.wrapping_add(self.reg(x) as u16);
                self.next();
            }
            LoadGlyph(x) => {
                self.i = self.memory.glyph_addr(self.reg(x));
                self.next();
            }
            StoreBcd(x) => {
                let vx = self.reg(x);
                self.memory.set_byte(self.i, vx / 100);
                self.memory.set_byte(self.i.wrapping_add(1), vx / 10 % 10);
                self.memory.set_byte(self.i.wrapping_add(2), vx % 10);
                self.next();
            }
            StoreRegisters(x) => {
                for r in 0..=x {
                    self.memory
                        .set_byte(self.i.wrapping_add(r as u16), self.reg(r));
                }
                self.i = self.i.wrapping_add(x as u16 + 1);
                self.next();
            }
            LoadRegisters(x) => {
                for r in 0..=x {
                    self.v[r as usize] = self.memory.get_byte(self.i.wrapping_add(r as u16));
                }
                self.i = self.i.wrapping_add(x as u16 + 1);
                self.next();
            }
        }
        Ok(())
    }

    fn reg(&self, r: u8) -> u8 {
        self.v[(r & 0x0f) as usize]
    }

    /// pc stays inside the 12-bit address space
    fn next(&mut self) {
        self.pc = (self.pc + 2) & CHIP8_ADDR_MASK;
    }

    fn skip_if(&mut self, condition: bool) {
        self.pc = (self.pc + if condition { 4 } else { 2 }) & CHIP8_ADDR_MASK;
    }

    fn set_and_next(&mut self, x: u8, value: u8) {
        self.v[(x & 0x0f) as usize] = value;
        self.next();
    }

    /// VF is written first, so when X is F the result wins over the flag
    fn flag_and_set(&mut self, x: u8, flag: u8, value: u8) {
        self.v[VFLAG] = flag;
        self.set_and_next(x, value);
    }

    /// hand a freshly pressed key to a pending FX0A
    fn resolve_key(&mut self, key: u8) {
        if let Some(x) = self.waiting_for_key.take() {
            debug!("key 0x{:x} pressed, stored in V{:X}", key, x);
            self.v[x as usize] = key & 0x0f;
            self.next();
        }
    }

    /// input source reports a key going down
    pub fn press_key(&mut self, key: u8) {
        if self.keypad.press(key) {
            self.resolve_key(key);
        }
    }

    /// input source reports a key coming up
    pub fn release_key(&mut self, key: u8) {
        self.keypad.release(key);
    }

    /// input source reports the whole keypad at once
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        if let Some(key) = self.keypad.update(keys) {
            self.resolve_key(key);
        }
    }

    /// Checks and clears the redraw flag
    pub fn take_draw_request(&mut self) -> bool {
        std::mem::take(&mut self.draw_requested)
    }

    pub fn draw_requested(&self) -> bool {
        self.draw_requested
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.waiting_for_key.is_some()
    }

    pub fn registers(&self) -> &[u8; REG_COUNT] {
        &self.v
    }

    pub fn index_register(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.pc
    }

    pub fn stack_depth(&self) -> usize {
        self.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
