//! The instruction-dispatch state machine.
//!
//! An [`Engine`] owns one run's state: instruction pointer, data pointer, tape,
//! remaining input, output buffer and loop stack. Each call to [`Engine::step`]
//! dispatches exactly one instruction. Loop handling:
//! - `[` on a zero cell jumps one past its matching `]` and leaves the loop
//!   stack alone; on a nonzero cell it pushes its own index (unless it is
//!   already on top, i.e. we arrived here from its `]`).
//! - `]` on a nonzero cell jumps back to the index on top of the loop stack
//!   without popping; on a zero cell it pops and falls through.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::{debug, trace};

use crate::error::VmError;
use crate::program::{Instruction, Program};
use crate::seq::ByteSeq;
use crate::tape::Tape;

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone, Debug, Default)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }

    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Result of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction ran; more may follow.
    Continue,
    /// The instruction pointer sits on the end marker.
    Halted,
}

/// What one dispatched instruction did, handed to the step observer.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: usize,
    pub ip: usize,
    pub dp: usize,
    pub cell_before: i8,
    pub instruction: Instruction,
    pub action: String,
}

type StepObserver<'p> = Box<dyn FnMut(&StepRecord) + 'p>;

pub struct Engine<'p> {
    program: &'p Program,
    ip: usize,
    dp: usize,
    tape: Tape,
    input: ByteSeq,
    input_pos: usize,
    output: ByteSeq,
    loop_stack: Vec<usize>,
    steps: usize,
    observer: Option<StepObserver<'p>>,
}

impl<'p> Engine<'p> {
    /// Fresh state: everything zero or empty, input queue set to `input`.
    pub fn new(program: &'p Program, input: impl Into<ByteSeq>) -> Self {
        Self {
            program,
            ip: 0,
            dp: 0,
            tape: Tape::new(),
            input: input.into(),
            input_pos: 0,
            output: ByteSeq::new(),
            loop_stack: Vec::new(),
            steps: 0,
            observer: None,
        }
    }

    /// Register a callback invoked after every dispatched instruction.
    pub fn set_step_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&StepRecord) + 'p,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn dp(&self) -> usize {
        self.dp
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn output(&self) -> &ByteSeq {
        &self.output
    }

    pub fn loop_depth(&self) -> usize {
        self.loop_stack.len()
    }

    /// Instructions dispatched so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Input bytes not yet consumed.
    pub fn remaining_input(&self) -> usize {
        self.input.size() - self.input_pos
    }

    pub fn is_halted(&self) -> bool {
        self.ip >= self.program.len()
    }

    /// Dispatch the instruction at the current IP.
    ///
    /// On error the state is left as it was before the failing instruction, so
    /// calling again fails the same way without making progress.
    pub fn step(&mut self) -> Result<StepOutcome, VmError> {
        let Some(instr) = self.program.get(self.ip) else {
            return Ok(StepOutcome::Halted);
        };

        let ip = self.ip;
        let (dp_before, cell_before) = (self.dp, self.tape.get(self.dp));
        let mut action: Option<String> = self.observer.as_ref().map(|_| String::new());

        let next_ip = match instr {
            Instruction::Increment => {
                let after = self.tape.increment(self.dp);
                if let Some(a) = action.as_mut() { *a = format!("Increment cell[{}] from {} to {}", dp_before, cell_before, after); }
                ip + 1
            }
            Instruction::Decrement => {
                let after = self.tape.decrement(self.dp);
                if let Some(a) = action.as_mut() { *a = format!("Decrement cell[{}] from {} to {}", dp_before, cell_before, after); }
                ip + 1
            }
            Instruction::MoveRight => {
                self.dp += 1;
                if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.dp); }
                ip + 1
            }
            Instruction::MoveLeft => {
                if self.dp == 0 {
                    return Err(VmError::PointerUnderflow { ip });
                }
                self.dp -= 1;
                if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.dp); }
                ip + 1
            }
            Instruction::Output => {
                let byte = cell_before as u8;
                self.output.push(byte);
                if let Some(a) = action.as_mut() { *a = format!("Output byte {:#04x}", byte); }
                ip + 1
            }
            Instruction::Input => {
                let Some(byte) = self.input.at(self.input_pos) else {
                    return Err(VmError::InputExhausted {
                        ip,
                        output: self.output.clone(),
                    });
                };
                self.input_pos += 1;
                self.tape.set(self.dp, byte as i8);
                if let Some(a) = action.as_mut() { *a = format!("Read byte {:#04x} into cell[{}]", byte, self.dp); }
                ip + 1
            }
            Instruction::LoopStart => {
                let reentry = self.loop_stack.last() == Some(&ip);
                if cell_before == 0 {
                    if reentry {
                        self.loop_stack.pop();
                    }
                    let target = self.program.jumps().skip_target(ip).expect("validated bracket");
                    trace!(ip, target, "loop skipped");
                    if let Some(a) = action.as_mut() { *a = format!("Cell is 0; jump past matching ']' to IP {}", target); }
                    target
                } else {
                    if !reentry {
                        self.loop_stack.push(ip);
                    }
                    if let Some(a) = action.as_mut() { *a = format!("Enter loop (depth {})", self.loop_stack.len()); }
                    ip + 1
                }
            }
            Instruction::LoopEnd => {
                if cell_before != 0 {
                    let header = *self.loop_stack.last().expect("loop end runs inside an entered loop");
                    trace!(ip, header, "loop repeat");
                    if let Some(a) = action.as_mut() { *a = format!("Cell != 0; jump back to loop header at IP {}", header); }
                    header
                } else {
                    self.loop_stack.pop();
                    if let Some(a) = action.as_mut() { *a = "Exit loop (cell is 0)".to_string(); }
                    ip + 1
                }
            }
        };

        self.ip = next_ip;

        if let (Some(observer), Some(action)) = (self.observer.as_mut(), action) {
            (observer)(&StepRecord {
                step: self.steps,
                ip,
                dp: dp_before,
                cell_before,
                instruction: instr,
                action,
            });
        }

        self.steps += 1;
        Ok(StepOutcome::Continue)
    }

    /// Step until the end marker, an error, or a limit in `control` trips.
    pub fn run(&mut self, control: Option<&StepControl>) -> Result<(), VmError> {
        debug!(
            instructions = self.program.len(),
            input = self.input.size(),
            "run starting"
        );

        while !self.is_halted() {
            if let Some(ctrl) = control {
                // Cooperative cancellation check
                if ctrl.is_canceled() {
                    debug!(steps = self.steps, "run cancelled");
                    return Err(VmError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if self.steps >= max {
                        debug!(limit = max, "step limit reached");
                        return Err(VmError::StepLimitExceeded { limit: max });
                    }
                }
            }

            if let Err(err) = self.step() {
                debug!(error = %err, steps = self.steps, "run aborted");
                return Err(err);
            }
        }

        debug!(
            steps = self.steps,
            memory_usage = self.tape.len(),
            output = self.output.size(),
            "run finished"
        );
        Ok(())
    }

    /// Consume the engine, keeping the output buffer and the final tape length.
    pub fn into_parts(self) -> (ByteSeq, usize) {
        (self.output, self.tape.len())
    }
}
