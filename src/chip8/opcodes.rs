use crate::{
    definitions::{cpu, display::fontset},
    gpu::Blit,
    opcode::{
        Address, ChipOpcodes, Eight, EightOpcode, Fifteen, FifteenOpcode, Fourteen,
        FourteenOpcode, Operation, ProgramCounterStep, RegisterConst, RegisterPair, Sprite, Zero,
    },
    ProcessError,
};

use super::cpu::{next_instruction, Cpu};

impl<G> ChipOpcodes for Cpu<G>
where
    G: Blit,
{
    fn zero(&mut self, opcode: &Zero) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        match opcode {
            Zero::Clear => {
                // 00E0
                self.gpu.clear(&mut self.state);
                Ok((ProgramCounterStep::Next, Operation::Draw))
            }
            Zero::Return => {
                // 00EE
                // the stack holds the address of the call itself
                let pc = self.state.pop_stack()?;
                log::debug!("return to {:#06X}", pc);
                Ok((
                    ProgramCounterStep::Jump(next_instruction(pc)),
                    Operation::None,
                ))
            }
        }
    }

    fn one(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        // 1NNN
        Ok(ProgramCounterStep::Jump(opcode.nnn))
    }

    fn two(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        // 2NNN
        self.state.push_stack(self.state.program_counter)?;
        log::debug!(
            "call {:#06X} from {:#06X}",
            opcode.nnn,
            self.state.program_counter
        );
        Ok(ProgramCounterStep::Jump(opcode.nnn))
    }

    fn three(&self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        // 3XNN
        let RegisterConst { x, nn } = *opcode;
        Ok(ProgramCounterStep::cond(self.state.registers[x] == nn))
    }

    fn four(&self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        // 4XNN
        let RegisterConst { x, nn } = *opcode;
        Ok(ProgramCounterStep::cond(self.state.registers[x] != nn))
    }

    fn five(&self, opcode: &RegisterPair) -> Result<ProgramCounterStep, ProcessError> {
        // 5XY0
        let RegisterPair { x, y } = *opcode;
        let registers = &self.state.registers;
        Ok(ProgramCounterStep::cond(registers[x] == registers[y]))
    }

    fn six(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        // 6XNN
        self.state.registers[opcode.x] = opcode.nn;
        Ok(ProgramCounterStep::Next)
    }

    fn seven(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        // 7XNN
        // let VX overflow, but ignore carry
        let RegisterConst { x, nn } = *opcode;
        self.state.registers[x] = self.state.registers[x].wrapping_add(nn);
        Ok(ProgramCounterStep::Next)
    }

    fn eight(&mut self, opcode: &Eight) -> Result<ProgramCounterStep, ProcessError> {
        let Eight { ops, x, y } = *opcode;
        let schip = self.state.schip;
        let registers = &mut self.state.registers;
        let vx = registers[x];
        let vy = registers[y];
        // the shift source
        let operand = if schip { vx } else { vy };

        // the flag is always written last, so it wins if X is F
        match ops {
            EightOpcode::Assign => registers[x] = vy,
            EightOpcode::Or => registers[x] = vx | vy,
            EightOpcode::And => registers[x] = vx & vy,
            EightOpcode::Xor => registers[x] = vx ^ vy,
            EightOpcode::Add => {
                let (res, carry) = vx.overflowing_add(vy);
                registers[x] = res;
                registers[cpu::register::LAST] = carry as u8;
            }
            EightOpcode::Sub => {
                let (res, borrow) = vx.overflowing_sub(vy);
                registers[x] = res;
                registers[cpu::register::LAST] = !borrow as u8;
            }
            EightOpcode::ShiftRight => {
                registers[x] = operand >> 1;
                registers[cpu::register::LAST] = operand & 0x01;
            }
            EightOpcode::SubReverse => {
                let (res, borrow) = vy.overflowing_sub(vx);
                registers[x] = res;
                registers[cpu::register::LAST] = !borrow as u8;
            }
            EightOpcode::ShiftLeft => {
                registers[x] = operand << 1;
                registers[cpu::register::LAST] = operand >> 7;
            }
        }
        Ok(ProgramCounterStep::Next)
    }

    fn nine(&self, opcode: &RegisterPair) -> Result<ProgramCounterStep, ProcessError> {
        // 9XY0
        let RegisterPair { x, y } = *opcode;
        let registers = &self.state.registers;
        Ok(ProgramCounterStep::cond(registers[x] != registers[y]))
    }

    fn a(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        // ANNN
        self.state.index_register = opcode.nnn;
        Ok(ProgramCounterStep::Next)
    }

    fn b(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        // BNNN
        let v0 = self.state.registers[0] as u16;
        Ok(ProgramCounterStep::Jump(opcode.nnn + v0))
    }

    fn c(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        // CXNN
        // using a fill bytes call here, as the trait RngCore does not
        // support random u8.
        let mut rand: [u8; 1] = [0];
        self.rng.fill_bytes(&mut rand);
        self.state.registers[opcode.x] = opcode.nn & rand[0];
        Ok(ProgramCounterStep::Next)
    }

    fn d(&mut self, opcode: &Sprite) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        // DXYN
        let Sprite { x, y, n } = *opcode;
        let coorx = self.state.registers[x] & 0x3F;
        let coory = self.state.registers[y] & 0x1F;
        let index = self.state.index_register;

        self.gpu.draw(&mut self.state, index, coorx, coory, n)?;
        Ok((ProgramCounterStep::Next, Operation::Draw))
    }

    fn e(&self, opcode: &Fourteen) -> Result<ProgramCounterStep, ProcessError> {
        let Fourteen { ops, x } = *opcode;
        let pressed = self
            .state
            .keyboard
            .is_pressed(self.state.registers[x] as usize);
        let step = match ops {
            // EX9E
            FourteenOpcode::Pressed => ProgramCounterStep::cond(pressed),
            // EXA1
            FourteenOpcode::NotPressed => ProgramCounterStep::cond(!pressed),
        };
        Ok(step)
    }

    fn f(&mut self, opcode: &Fifteen) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        let Fifteen { ops, x } = *opcode;
        let vx = self.state.registers[x];
        let index = self.state.index_register;

        match ops {
            FifteenOpcode::GetDelayTimer => {
                // FX07
                self.state.registers[x] = self.state.timers.delay;
            }
            FifteenOpcode::AwaitKeyPress => {
                // FX0A
                // halt until a key is pressed, the lowest key wins
                match self.state.keyboard.first_pressed() {
                    Some(key) => self.state.registers[x] = key as u8,
                    None => return Ok((ProgramCounterStep::None, Operation::Wait)),
                }
            }
            FifteenOpcode::SetDelayTimer => {
                // FX15
                self.state.timers.delay = vx;
            }
            FifteenOpcode::SetSoundTimer => {
                // FX18
                self.state.timers.sound = vx;
            }
            FifteenOpcode::AddVxToI => {
                // FX1E
                // VF is not affected, I is not masked.
                self.state.index_register = index.wrapping_add(vx as u16);
            }
            FifteenOpcode::SetIToSprite => {
                // FX29
                self.state.index_register =
                    (fontset::LOCATION + fontset::GLYPH_SIZE * vx as usize) as u16;
            }
            FifteenOpcode::StoreBCD => {
                // FX33
                // 254 => [2, 5, 4]
                let bcd = [vx / 100, vx / 10 % 10, vx % 10];
                self.state
                    .memory_range_mut(index as usize, bcd.len())?
                    .copy_from_slice(&bcd);
            }
            FifteenOpcode::StoreV0ToVx => {
                // FX55
                let registers = self.state.registers;
                self.state
                    .memory_range_mut(index as usize, x + 1)?
                    .copy_from_slice(&registers[..=x]);
                self.state.index_register = index.wrapping_add(x as u16 + 1);
            }
            FifteenOpcode::FillV0ToVx => {
                // FX65
                let data = self.state.memory_range(index as usize, x + 1)?;
                let mut registers = self.state.registers;
                registers[..=x].copy_from_slice(data);
                self.state.registers = registers;
                self.state.index_register = index.wrapping_add(x as u16 + 1);
            }
        }
        Ok((ProgramCounterStep::Next, Operation::None))
    }
}
