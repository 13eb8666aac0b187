//! Entry points that validate a program and run it to completion.
//!
//! Both entry points parse first, so a structural defect is reported before a
//! single instruction executes.

use crate::engine::{Engine, StepControl};
use crate::error::VmError;
use crate::program::Program;
use crate::seq::ByteSeq;

/// Output of a completed run plus the final tape length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub output: ByteSeq,
    /// Materialized tape length at the end of the run.
    pub memory_usage: usize,
}

/// Run `source` against `input` and return the output buffer.
pub fn run_for_output(
    source: impl Into<ByteSeq>,
    input: impl Into<ByteSeq>,
) -> Result<ByteSeq, VmError> {
    run_with_stats(source, input).map(|stats| stats.output)
}

/// Run `source` against `input` and return the output buffer and memory usage.
pub fn run_with_stats(
    source: impl Into<ByteSeq>,
    input: impl Into<ByteSeq>,
) -> Result<RunStats, VmError> {
    execute(source.into(), input.into(), None)
}

/// [`run_for_output`] with a step limit and cancellation flag.
pub fn run_for_output_with_control(
    source: impl Into<ByteSeq>,
    input: impl Into<ByteSeq>,
    control: &StepControl,
) -> Result<ByteSeq, VmError> {
    run_with_stats_with_control(source, input, control).map(|stats| stats.output)
}

/// [`run_with_stats`] with a step limit and cancellation flag.
pub fn run_with_stats_with_control(
    source: impl Into<ByteSeq>,
    input: impl Into<ByteSeq>,
    control: &StepControl,
) -> Result<RunStats, VmError> {
    execute(source.into(), input.into(), Some(control))
}

fn execute(
    source: ByteSeq,
    input: ByteSeq,
    control: Option<&StepControl>,
) -> Result<RunStats, VmError> {
    let program = Program::parse(source)?;
    let mut engine = Engine::new(&program, input);
    engine.run(control)?;
    let (output, memory_usage) = engine.into_parts();
    Ok(RunStats { output, memory_usage })
}
