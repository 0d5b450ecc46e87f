//! Opcode abstractions, functionality and constants.
use std::convert::TryFrom;

use crate::{
    definitions::memory, MemoryError, OpcodeError, ProcessError,
};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a nibble
const NIBBLE: u16 = 0x4;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given point, the two bytes are
/// combined big-endian.
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up
///
/// # Example
/// ```rust
/// # use chip8vm::opcode::*;
/// # use chip8vm::MemoryError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # assert_eq!(
/// #    Err(MemoryError::OutOfBounds { address: 4, len: 4 }),
/// #    build_opcode(&SPLIT_OPCODE, 3)
/// # );
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, MemoryError> {
    match (data.get(pointer), data.get(pointer + 1)) {
        (Some(high), Some(low)) => Ok(Opcode::from_be_bytes([*high, *low])),
        (None, _) => Err(MemoryError::OutOfBounds {
            address: pointer,
            len: data.len(),
        }),
        (Some(_), None) => Err(MemoryError::OutOfBounds {
            address: pointer + 1,
            len: data.len(),
        }),
    }
}

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// the leading nibble, selects the opcode group
    fn t(&self) -> u8;

    /// this is an opcode extractor for the opcode type `TNNN`
    /// - `T` is the opcode type
    /// - `NNN` is an address
    fn nnn(&self) -> u16;

    /// this is an opcode extractor for the opcode type `TXNN`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `NN` is a constant
    fn xnn(&self) -> (usize, u8);

    /// this is an opcode extractor for the opcode type `TXYN`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `Y` is a register index
    /// - `N` is a opcode subtype (or the sprite height)
    fn xyn(&self) -> (usize, usize, u8);

    /// this is an opcode extractor for the opcode type `TXYT`
    fn xy(&self) -> (usize, usize);

    /// this is an opcode extractor for the opcode type `TXTT`
    fn x(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip8vm::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> u8 {
        ((self & OPCODE_MASK_F000) >> (3 * NIBBLE)) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip8vm::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }

    /// # Example
    /// ```rust
    /// # use chip8vm::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xnn(), (0xE, 0xDA));
    /// ```
    fn xnn(&self) -> (usize, u8) {
        (self.x(), (self & OPCODE_MASK_00FF) as u8)
    }

    /// ```rust
    /// # use chip8vm::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn xyn(&self) -> (usize, usize, u8) {
        let (x, y) = self.xy();
        (x, y, (self & OPCODE_MASK_000F) as u8)
    }

    fn xy(&self) -> (usize, usize) {
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        (self.x(), ((self & MASK) >> NIBBLE) as usize)
    }

    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> (2 * NIBBLE)) as usize
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the program steps that the chip
/// can take after an instruction was executed.
pub enum ProgramCounterStep {
    /// Will not change the program counter
    None,
    /// Will move to the next instruction
    Next,
    /// Will skip the next instruction
    Skip,
    /// Will simply move the program counter to the given location.
    Jump(u16),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip8vm::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Will calculate the new program counter from the current one.
    ///
    /// ```rust
    /// # use chip8vm::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Skip.apply(0x200), 0x204);
    /// assert_eq!(ProgramCounterStep::Jump(0x123).apply(0x200), 0x123);
    /// ```
    #[inline]
    pub fn apply(&self, pc: u16) -> u16 {
        match *self {
            ProgramCounterStep::None => pc,
            ProgramCounterStep::Next => pc.wrapping_add(memory::opcodes::SIZE),
            ProgramCounterStep::Skip => pc.wrapping_add(2 * memory::opcodes::SIZE),
            ProgramCounterStep::Jump(pointer) => pointer,
        }
    }
}

/// Opcodes of the `0NNN` group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zero {
    /// Clears the display
    Clear,
    /// Returns from the subroutine
    Return,
}

/// Opcodes of the shape `TNNN`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub nnn: u16,
}

/// Opcodes of the shape `TXNN`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterConst {
    pub x: usize,
    pub nn: u8,
}

/// Opcodes of the shape `TXY0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterPair {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EightOpcode {
    /// 8XY0 `Vx = Vy`
    Assign,
    /// 8XY1 `Vx |= Vy`
    Or,
    /// 8XY2 `Vx &= Vy`
    And,
    /// 8XY3 `Vx ^= Vy`
    Xor,
    /// 8XY4 `Vx += Vy` with carry
    Add,
    /// 8XY5 `Vx -= Vy` with borrow
    Sub,
    /// 8XY6 `Vx = operand >> 1`
    ShiftRight,
    /// 8XY7 `Vx = Vy - Vx` with borrow
    SubReverse,
    /// 8XYE `Vx = operand << 1`
    ShiftLeft,
}

impl TryFrom<u8> for EightOpcode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let ops = match value {
            0x0 => EightOpcode::Assign,
            0x1 => EightOpcode::Or,
            0x2 => EightOpcode::And,
            0x3 => EightOpcode::Xor,
            0x4 => EightOpcode::Add,
            0x5 => EightOpcode::Sub,
            0x6 => EightOpcode::ShiftRight,
            0x7 => EightOpcode::SubReverse,
            0xE => EightOpcode::ShiftLeft,
            _ => return Err(()),
        };
        Ok(ops)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eight {
    pub ops: EightOpcode,
    pub x: usize,
    pub y: usize,
}

/// The `DXYN` opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub x: usize,
    pub y: usize,
    pub n: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FourteenOpcode {
    Pressed,
    NotPressed,
}

impl TryFrom<u8> for FourteenOpcode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x9E => Ok(FourteenOpcode::Pressed),
            0xA1 => Ok(FourteenOpcode::NotPressed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fourteen {
    pub ops: FourteenOpcode,
    pub x: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FifteenOpcode {
    GetDelayTimer,
    AwaitKeyPress,
    SetDelayTimer,
    SetSoundTimer,
    AddVxToI,
    SetIToSprite,
    StoreBCD,
    StoreV0ToVx,
    FillV0ToVx,
}

impl TryFrom<u8> for FifteenOpcode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let ops = match value {
            0x07 => FifteenOpcode::GetDelayTimer,
            0x0A => FifteenOpcode::AwaitKeyPress,
            0x15 => FifteenOpcode::SetDelayTimer,
            0x18 => FifteenOpcode::SetSoundTimer,
            0x1E => FifteenOpcode::AddVxToI,
            0x29 => FifteenOpcode::SetIToSprite,
            0x33 => FifteenOpcode::StoreBCD,
            0x55 => FifteenOpcode::StoreV0ToVx,
            0x65 => FifteenOpcode::FillV0ToVx,
            _ => return Err(()),
        };
        Ok(ops)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fifteen {
    pub ops: FifteenOpcode,
    pub x: usize,
}

/// A decoded instruction, grouped by the leading nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcodes {
    Zero(Zero),
    One(Address),
    Two(Address),
    Three(RegisterConst),
    Four(RegisterConst),
    Five(RegisterPair),
    Six(RegisterConst),
    Seven(RegisterConst),
    Eight(Eight),
    Nine(RegisterPair),
    A(Address),
    B(Address),
    C(RegisterConst),
    D(Sprite),
    E(Fourteen),
    F(Fifteen),
}

impl TryFrom<Opcode> for Opcodes {
    type Error = OpcodeError;

    /// Every opcode outside of the known table (`0NNN` other then `00E0`
    /// and `00EE`, `5XY1`, `8XY8`, `EX00`, ...) is rejected.
    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let err = |_| OpcodeError::InvalidOpcode(value);
        let address = Address { nnn: value.nnn() };
        let (x, nn) = value.xnn();
        let constant = RegisterConst { x, nn };
        let (_, y, n) = value.xyn();

        let res = match value.t() {
            0x0 => match value {
                0x00E0 => Opcodes::Zero(Zero::Clear),
                0x00EE => Opcodes::Zero(Zero::Return),
                _ => return Err(OpcodeError::InvalidOpcode(value)),
            },
            0x1 => Opcodes::One(address),
            0x2 => Opcodes::Two(address),
            0x3 => Opcodes::Three(constant),
            0x4 => Opcodes::Four(constant),
            0x5 if n == 0 => Opcodes::Five(RegisterPair { x, y }),
            0x6 => Opcodes::Six(constant),
            0x7 => Opcodes::Seven(constant),
            0x8 => Opcodes::Eight(Eight {
                ops: EightOpcode::try_from(n).map_err(err)?,
                x,
                y,
            }),
            0x9 if n == 0 => Opcodes::Nine(RegisterPair { x, y }),
            0xA => Opcodes::A(address),
            0xB => Opcodes::B(address),
            0xC => Opcodes::C(constant),
            0xD => Opcodes::D(Sprite { x, y, n }),
            0xE => Opcodes::E(Fourteen {
                ops: FourteenOpcode::try_from(nn).map_err(err)?,
                x,
            }),
            0xF => Opcodes::F(Fifteen {
                ops: FifteenOpcode::try_from(nn).map_err(err)?,
                x,
            }),
            _ => return Err(OpcodeError::InvalidOpcode(value)),
        };
        Ok(res)
    }
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub trait ProgramCounter {
    /// will move the program counter forward by a step.
    fn step(&mut self, step: ProgramCounterStep);
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the outcome of a single tick, reported up to the host.
pub enum Operation {
    /// The program counter advanced, nothing else to do.
    None,
    /// The program counter advanced and the display bitmap was changed.
    Draw,
    /// Halted waiting for a key press, the same instruction will run again
    /// on the next tick. Neither the program counter nor the timers moved.
    Wait,
}

/// These are the traits that have to be full filled for a working opcode
/// table.
///
/// This trait requires the implementation of the  [`ProgramCounter`](ProgramCounter) trait for the step
/// functionality has to be implemented as well.
pub trait ChipOpcodes: ProgramCounter {
    /// will execute a single decoded instruction and move the program counter
    fn calc(&mut self, opcode: &Opcodes) -> Result<Operation, ProcessError> {
        let mut operation = Operation::None;
        let step_op = |(step, op)| {
            operation = op;
            step
        };

        let step = match opcode {
            Opcodes::Zero(opcode) => self.zero(opcode).map(step_op),
            Opcodes::One(opcode) => self.one(opcode),
            Opcodes::Two(opcode) => self.two(opcode),
            Opcodes::Three(opcode) => self.three(opcode),
            Opcodes::Four(opcode) => self.four(opcode),
            Opcodes::Five(opcode) => self.five(opcode),
            Opcodes::Six(opcode) => self.six(opcode),
            Opcodes::Seven(opcode) => self.seven(opcode),
            Opcodes::Eight(opcode) => self.eight(opcode),
            Opcodes::Nine(opcode) => self.nine(opcode),
            Opcodes::A(opcode) => self.a(opcode),
            Opcodes::B(opcode) => self.b(opcode),
            Opcodes::C(opcode) => self.c(opcode),
            Opcodes::D(opcode) => self.d(opcode).map(step_op),
            Opcodes::E(opcode) => self.e(opcode),
            Opcodes::F(opcode) => self.f(opcode).map(step_op),
        }?;

        self.step(step);
        Ok(operation)
    }

    /// - `00E0` - Display  - `disp_clear()`        - Clears the screen.
    /// - `00EE` - Flow     - `return;`             - Returns from a subroutine.
    fn zero(&mut self, opcode: &Zero) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `1NNN` - Flow     - `goto NNN;`           - Jumps to address `NNN`.
    fn one(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `2NNN` - Flow     - `*(0xNNN)()`          - Calls subroutine at `NNN`.
    fn two(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `3XNN` - Cond     - `if(Vx==NN)`          - Skips the next instruction if `VX` equals `NN`.
    fn three(&self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `4XNN` - Cond     - `if(Vx!=NN)`          - Skips the next instruction if `VX` doesn't equal `NN`.
    fn four(&self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `5XY0` - Cond     - `if(Vx==Vy)`          - Skips the next instruction if `VX` equals `VY`.
    fn five(&self, opcode: &RegisterPair) -> Result<ProgramCounterStep, ProcessError>;

    /// - `6XNN` - Const    - `Vx = NN`             - Sets `VX` to `NN`.
    fn six(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `7XNN` - Const    - `Vx += NN`            - Adds `NN` to `VX`. (Carry flag is not changed)
    fn seven(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// A mutiuse opcode base for type `8XYT` (T is a sub opcode)
    ///
    /// - `8XY0` - Assign   - `Vx=Vy`               - Sets `VX` to the value of `VY`.
    /// - `8XY1` - BitOp    - `Vx=Vx|Vy`            - Sets `VX` to `VX` or `VY`.
    /// - `8XY2` - BitOp    - `Vx=Vx&Vy`            - Sets `VX` to `VX` and `VY`.
    /// - `8XY3` - BitOp    - `Vx=Vx^Vy`            - Sets `VX` to `VX` xor `VY`.
    /// - `8XY4` - Math     - `Vx += Vy`            - `VF` is set to `1` when there's a carry, and to `0` when there isn't.
    /// - `8XY5` - Math     - `Vx -= Vy`            - `VF` is set to `0` when there's a borrow, and `1` when there isn't.
    /// - `8XY6` - BitOp    - `Vx=Vy>>1`            - `VF` receives the shifted out bit. Shifts `VX` itself in schip mode.
    /// - `8XY7` - Math     - `Vx=Vy-Vx`            - `VF` is set to `0` when there's a borrow, and `1` when there isn't.
    /// - `8XYE` - BitOp    - `Vx=Vy<<1`            - `VF` receives the shifted out bit. Shifts `VX` itself in schip mode.
    fn eight(&mut self, opcode: &Eight) -> Result<ProgramCounterStep, ProcessError>;

    /// - `9XY0` - Cond     - `if(Vx!=Vy)`          - Skips the next instruction if `VX` doesn't equal `VY`.
    fn nine(&self, opcode: &RegisterPair) -> Result<ProgramCounterStep, ProcessError>;

    /// - `ANNN` - MEM      - `I = NNN`             - Sets `I` to the address `NNN`.
    fn a(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `BNNN` - Flow     - `PC=V0+NNN`           - Jumps to the address `NNN` plus `V0`.
    fn b(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `CXNN` - Rand     - `Vx=rand()&NN`        - Sets `VX` to a random byte masked with `NN`.
    fn c(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `DXYN` - Disp     - `draw(Vx,Vy,N)`       - Xors an `8xN` sprite read from `I` into the display, `VF` is set on collision.
    fn d(&mut self, opcode: &Sprite) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `EX9E` - KeyOp    - `if(key()==Vx)`       - Skips the next instruction if the key stored in `VX` is pressed.
    /// - `EXA1` - KeyOp    - `if(key()!=Vx)`       - Skips the next instruction if the key stored in `VX` isn't pressed.
    fn e(&self, opcode: &Fourteen) -> Result<ProgramCounterStep, ProcessError>;

    /// A multiuse opcode base for type `FXTT` (T is a sub opcode)
    ///
    /// - `FX07` - Timer    - `Vx = get_delay()`    - Sets `VX` to the value of the delay timer.
    /// - `FX0A` - KeyOp    - `Vx = get_key()`      - A key press is awaited, and then stored in `VX`.
    /// - `FX15` - Timer    - `delay_timer(Vx)`     - Sets the delay timer to `VX`.
    /// - `FX18` - Sound    - `sound_timer(Vx)`     - Sets the sound timer to `VX`.
    /// - `FX1E` - MEM      - `I +=Vx`              - Adds `VX` to `I`. `VF` is not affected.
    /// - `FX29` - MEM      - `I=sprite_addr[Vx]`   - Sets `I` to the font glyph of `VX`.
    /// - `FX33` - BCD      - `set_BCD(Vx)`         - Stores hundreds, tens and ones of `VX` at `I`, `I+1`, `I+2`.
    /// - `FX55` - MEM      - `reg_dump(Vx,&I)`     - Stores `V0` to `VX` at `I`, then `I += X + 1`.
    /// - `FX65` - MEM      - `reg_load(Vx,&I)`     - Fills `V0` to `VX` from `I`, then `I += X + 1`.
    fn f(&mut self, opcode: &Fifteen) -> Result<(ProgramCounterStep, Operation), ProcessError>;
}
