use std::fmt;

use crate::brackets::{self, JumpTable};
use crate::error::VmError;
use crate::seq::ByteSeq;

/// One of the eight commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Increment,
    Decrement,
    MoveRight,
    MoveLeft,
    Output,
    Input,
    LoopStart,
    LoopEnd,
}

impl Instruction {
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'+' => Instruction::Increment,
            b'-' => Instruction::Decrement,
            b'>' => Instruction::MoveRight,
            b'<' => Instruction::MoveLeft,
            b'.' => Instruction::Output,
            b',' => Instruction::Input,
            b'[' => Instruction::LoopStart,
            b']' => Instruction::LoopEnd,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::MoveRight => '>',
            Instruction::MoveLeft => '<',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopStart => '[',
            Instruction::LoopEnd => ']',
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A validated, immutable program.
///
/// Construction runs the bracket pre-pass, so a `Program` value is proof that
/// every loop is balanced and every byte is an instruction. The end marker is
/// the index one past the last instruction.
#[derive(Debug, Clone)]
pub struct Program {
    instructions: Vec<Instruction>,
    jumps: JumpTable,
}

impl Program {
    pub fn parse(source: impl Into<ByteSeq>) -> Result<Self, VmError> {
        let source = source.into();
        let jumps = brackets::validate(source.as_bytes())?;
        let instructions = source
            .as_bytes()
            .iter()
            .filter_map(|&b| Instruction::from_byte(b))
            .collect();
        Ok(Self { instructions, jumps })
    }

    /// Instruction at `ip`; `None` at the end marker.
    pub fn get(&self, ip: usize) -> Option<Instruction> {
        self.instructions.get(ip).copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn jumps(&self) -> &JumpTable {
        &self.jumps
    }
}
