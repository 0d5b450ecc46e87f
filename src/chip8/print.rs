//! The pretty print implementation for the [`Cpu`](super::Cpu), used by hosts
//! when single stepping through a program.
//! This implementation was split up into this file for smaller file sizes and higher
//! cohesion.

use super::Cpu;
use crate::{definitions::cpu, gpu::Blit};
use once_cell::sync::Lazy;
use std::fmt;

/// The amount of entries printed on a single line
const HEX_PRINT_STEP: usize = 8;

const END_OF_LINE: char = '\n';
const INDENT_FILLAMENT: char = '\t';
const INDENT_SIZE: usize = 2;

#[doc(hidden)]
macro_rules! intformat {
    () => {
        // 2 symbols for the prefix (0x) and 4 for the rest.
        "{:#06X}"
    };
}

/// The length of a single formatted integer
static INTEGER_LEN: Lazy<usize> = Lazy::new(|| format!(intformat!(), 0u8).len());

/// Will add an indent post processing
fn indent_helper(text: &mut String, indent: usize) {
    for _ in 0..indent {
        text.push(INDENT_FILLAMENT);
    }
}

/// Removes the trailing new line of a block
fn trim_block(mut text: String) -> String {
    if text.ends_with(END_OF_LINE) {
        text.pop();
    }
    text
}

/// Handles all the printing of the pointer values.
mod pointer_print {
    use std::fmt::Write;

    /// will format the pointers according to definition
    pub(super) fn formatter(line: &mut String, from: usize, to: usize) -> std::fmt::Result {
        write!(
            line,
            concat!(intformat!(), " - ", intformat!(), " :"),
            from, to
        )
    }
}

/// handles printing of any and all of integers.
mod integer_print {
    use super::{pointer_print, END_OF_LINE, HEX_PRINT_STEP};
    use num_traits::Unsigned;
    use std::fmt::{self, Write};

    /// will format all integer types
    pub(super) fn formatter<T>(line: &mut String, data: T) -> fmt::Result
    where
        T: fmt::UpperHex + Unsigned + Copy,
    {
        write!(line, intformat!(), data)
    }

    /// a single indented value
    pub(super) fn single<T>(data: T, indent: usize) -> Result<String, fmt::Error>
    where
        T: fmt::UpperHex + Unsigned + Copy,
    {
        let mut res = String::new();
        super::indent_helper(&mut res, indent);
        formatter(&mut res, data)?;
        Ok(res)
    }

    /// will pretty print all the integer data given
    pub(super) fn printer<T>(data: &[T], indent: usize) -> Result<String, fmt::Error>
    where
        T: fmt::UpperHex + Unsigned + Copy,
    {
        let mut res = String::new();
        for (row, chunk) in data.chunks(HEX_PRINT_STEP).enumerate() {
            let from = row * HEX_PRINT_STEP;
            super::indent_helper(&mut res, indent);
            pointer_print::formatter(&mut res, from, from + chunk.len() - 1)?;
            for entry in chunk {
                res.push(' ');
                formatter(&mut res, *entry)?;
            }
            res.push(END_OF_LINE);
        }
        Ok(super::trim_block(res))
    }
}

/// Handles all the boolean data types.
mod bool_print {
    use super::{pointer_print, END_OF_LINE, HEX_PRINT_STEP};

    /// keeps the booleans aligned with the integers
    fn formatter(value: bool) -> String {
        format!("{:width$}", value, width = *super::INTEGER_LEN)
    }

    /// will pretty print all the boolean data given
    pub(super) fn printer(data: &[bool], indent: usize) -> Result<String, std::fmt::Error> {
        let mut res = String::new();
        for (row, chunk) in data.chunks(HEX_PRINT_STEP).enumerate() {
            let from = row * HEX_PRINT_STEP;
            super::indent_helper(&mut res, indent);
            pointer_print::formatter(&mut res, from, from + chunk.len() - 1)?;

            let line = chunk
                .iter()
                .map(|value| formatter(*value))
                .collect::<Vec<_>>()
                .join(" ");
            res.push(' ');
            res.push_str(line.trim_end());
            res.push(END_OF_LINE);
        }
        Ok(super::trim_block(res))
    }
}

/// Handles the memory dump, shown as opcodes.
mod opcode_print {
    use super::{integer_print, pointer_print, END_OF_LINE, HEX_PRINT_STEP};
    use crate::opcode::Opcode;
    use std::fmt;

    /// The amount of bytes shown per row
    const ROW_BYTES: usize = HEX_PRINT_STEP * 2;
    /// The placeholder for rows, that only contain zeros
    const FILLER_BASE: &str = "...";

    struct Row {
        from: usize,
        to: usize,
        data: Vec<Opcode>,
        only_null: bool,
    }

    impl Row {
        fn write(&self, res: &mut String) -> fmt::Result {
            pointer_print::formatter(res, self.from, self.to)?;
            if self.only_null {
                res.push(' ');
                integer_print::formatter(res, 0u16)?;
                res.push(' ');
                res.push_str(FILLER_BASE);
                res.push(' ');
                integer_print::formatter(res, 0u16)?;
            } else {
                for entry in &self.data {
                    res.push(' ');
                    integer_print::formatter(res, *entry)?;
                }
            }
            Ok(())
        }
    }

    /// will pretty print the content of the raw memory, consecutive rows of
    /// zeros are merged into one
    pub(super) fn printer(memory: &[u8], indent: usize) -> Result<String, fmt::Error> {
        let mut rows: Vec<Row> = Vec::with_capacity(memory.len() / ROW_BYTES);

        for (index, chunk) in memory.chunks(ROW_BYTES).enumerate() {
            let from = index * ROW_BYTES;
            let data: Vec<Opcode> = chunk
                .chunks(2)
                .map(|pair| match *pair {
                    [high, low] => Opcode::from_be_bytes([high, low]),
                    [high] => Opcode::from_be_bytes([high, 0]),
                    _ => 0,
                })
                .collect();
            let only_null = data.iter().all(|opcode| *opcode == 0);

            let mut row = Row {
                from,
                to: from + chunk.len() - 1,
                data,
                only_null,
            };

            if only_null {
                if let Some(last) = rows.last() {
                    if last.only_null {
                        row.from = last.from;
                        rows.pop();
                    }
                }
            }
            rows.push(row);
        }

        let mut res = String::new();
        for row in rows {
            super::indent_helper(&mut res, indent);
            row.write(&mut res)?;
            res.push(END_OF_LINE);
        }
        Ok(super::trim_block(res))
    }
}

impl<G: Blit> fmt::Display for Cpu<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = &self.state;

        // handle stack specially as it needs to be filled up if empty
        let mut stack = [0u16; cpu::stack::SIZE];
        stack[..state.stack.len()].copy_from_slice(&state.stack);

        let opc = integer_print::single(self.opcode, INDENT_SIZE)?;
        let prc = integer_print::single(state.program_counter, INDENT_SIZE)?;
        let idx = integer_print::single(state.index_register, INDENT_SIZE)?;
        let stp = integer_print::single(state.stack_pointer(), INDENT_SIZE)?;
        let tim = integer_print::printer(
            &[
                state.timers.delay,
                state.timers.sound,
                state.timers.counter,
            ],
            INDENT_SIZE,
        )?;
        let mem = opcode_print::printer(&state.memory, INDENT_SIZE)?;
        let key = bool_print::printer(state.keyboard.get_keys(), INDENT_SIZE)?;
        let sta = integer_print::printer(&stack, INDENT_SIZE)?;
        let reg = integer_print::printer(&state.registers, INDENT_SIZE)?;

        write!(
            f,
            "Cpu {{\n\
                \tOpcode :\n{}\n\
                \tProgram Counter :\n{}\n\
                \tIndex Register :\n{}\n\
                \tStack Pointer :\n{}\n\
                \tTimers (Delay Sound Divider) :\n{}\n\
                \tMemory :\n{}\n\
                \tKeyboard :\n{}\n\
                \tStack :\n{}\n\
                \tRegister :\n{}\n\
                }}",
            opc, prc, idx, stp, tim, mem, key, sta, reg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests;
    use crate::definitions::keyboard;

    #[test]
    /// tests if the pretty print output is as expected
    fn test_full_print() {
        let mut chip = tests::get_default_chip();
        tests::write_slice_to_memory(&mut chip.state.memory, 0x200, &[0x00, 0xE0, 0x6C, 0x17]);
        chip.state.push_stack(0x0234).unwrap();

        let mut keys = [false; keyboard::SIZE];
        for (index, key) in keys.iter_mut().enumerate() {
            *key = index % 2 != 0;
        }
        chip.set_keyboard(&keys);

        let actual = format!("{}", chip);
        let lines: Vec<&str> = actual.split('\n').collect();

        let expected_start = [
            "Cpu {",
            "\tOpcode :",
            "\t\t0x0000",
            "\tProgram Counter :",
            "\t\t0x0200",
            "\tIndex Register :",
            "\t\t0x0000",
            "\tStack Pointer :",
            "\t\t0x0001",
            "\tTimers (Delay Sound Divider) :",
            "\t\t0x0000 - 0x0002 : 0x0000 0x0000 0x0009",
            "\tMemory :",
            "\t\t0x0000 - 0x000F : 0xF090 0x9090 0xF020 0x6020 0x2070 0xF010 0xF080 0xF0F0",
        ];
        assert_eq!(&lines[..expected_start.len()], &expected_start[..]);

        let expected_lines = [
            "\t\t0x0050 - 0x01FF : 0x0000 ... 0x0000",
            "\t\t0x0200 - 0x020F : 0x00E0 0x6C17 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000",
            "\t\t0x0210 - 0x0FFF : 0x0000 ... 0x0000",
            "\tKeyboard :",
            "\t\t0x0000 - 0x0007 : false  true   false  true   false  true   false  true",
            "\t\t0x0008 - 0x000F : false  true   false  true   false  true   false  true",
            "\tStack :",
            "\t\t0x0000 - 0x0007 : 0x0234 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000",
            "\t\t0x0010 - 0x0013 : 0x0000 0x0000 0x0000 0x0000",
            "\tRegister :",
            "\t\t0x0008 - 0x000F : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000",
        ];
        for line in expected_lines.iter() {
            assert!(lines.contains(line), "missing line {:?}", line);
        }
        assert_eq!(lines.last(), Some(&"}"));
    }
}
