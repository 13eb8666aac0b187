//! A small Brainfuck virtual machine.
//!
//! Programs run against a pre-supplied input queue and produce an in-memory
//! output buffer. The machine has:
//! - a tape of signed 8-bit cells that starts empty and grows to the right on
//!   write (unwritten cells read as 0), with wrapping arithmetic;
//! - a bracket pre-pass that rejects unbalanced loops and stray characters
//!   before anything executes;
//! - an explicit loop stack for `[`/`]`;
//! - hard errors for reading past the end of input and for moving left of
//!   cell 0;
//! - optional step limits and cooperative cancellation.
//!
//! Quick start:
//!
//! ```
//! use bf_vm::run_for_output;
//!
//! let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
//! let output = run_for_output(code, "").expect("program should run");
//! assert_eq!(output, "Hello World!\n");
//! ```

pub mod brackets;
pub mod cli_util;
pub mod commands;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod program;
pub mod seq;
pub mod tape;

pub use driver::{
    run_for_output, run_for_output_with_control, run_with_stats, run_with_stats_with_control,
    RunStats,
};
pub use engine::{Engine, StepControl, StepOutcome, StepRecord};
pub use error::VmError;
pub use program::{Instruction, Program};
pub use seq::ByteSeq;
pub use tape::Tape;
