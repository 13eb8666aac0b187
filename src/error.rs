use crate::seq::ByteSeq;

/// Errors that can occur while validating or running a program.
#[derive(Debug, thiserror::Error)]
pub enum VmError {
    /// A `[` was never closed.
    #[error("Unmatched bracket '[' at instruction {ip}")]
    UnmatchedOpenBracket { ip: usize },

    /// A `]` appeared with no open loop to close.
    #[error("Unmatched bracket ']' at instruction {ip}")]
    UnmatchedCloseBracket { ip: usize },

    /// Encountered a character outside the instruction set `><+-.,[]`.
    #[error("Invalid character: '{ch}' at instruction {ip}")]
    InvalidCharacter { ch: char, ip: usize },

    /// `,` ran with nothing left in the input queue. `output` holds what the
    /// program had written before that point.
    #[error("Input exhausted at instruction {ip}")]
    InputExhausted { ip: usize, output: ByteSeq },

    /// `<` ran with the data pointer already at cell 0.
    #[error("Pointer underflow at instruction {ip}")]
    PointerUnderflow { ip: usize },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (e.g., timeout)
    #[error("Execution aborted: cancelled")]
    Canceled,
}

impl VmError {
    /// Instruction index the error points at, when it has one.
    pub fn ip(&self) -> Option<usize> {
        match self {
            VmError::UnmatchedOpenBracket { ip }
            | VmError::UnmatchedCloseBracket { ip }
            | VmError::InvalidCharacter { ip, .. }
            | VmError::InputExhausted { ip, .. }
            | VmError::PointerUnderflow { ip } => Some(*ip),
            VmError::StepLimitExceeded { .. } | VmError::Canceled => None,
        }
    }

    /// True for errors raised by the validation pre-pass, before anything runs.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            VmError::UnmatchedOpenBracket { .. }
                | VmError::UnmatchedCloseBracket { .. }
                | VmError::InvalidCharacter { .. }
        )
    }
}
