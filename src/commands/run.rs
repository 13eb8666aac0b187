use clap::Args;
use std::{fs, thread};
use std::io::{self, Write};
use std::sync::{mpsc, Arc};
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cli_util::{decode_escapes, print_vm_error};
use crate::config;
use crate::driver::{self, RunStats};
use crate::{ByteSeq, Engine, Program, StepControl, VmError};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print a step-by-step table of operations instead of the result line
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Also report the final tape length (memory usage)
    #[arg(short = 's', long = "stats")]
    pub stats: bool,

    /// Input queue contents; supports \xHH, \n, \r, \t, \0 and \\ escapes
    #[arg(short = 'i', long = "input", value_name = "TEXT")]
    pub input: Option<String>,

    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Wall-clock timeout in milliseconds (fallback BF_TIMEOUT_MS, then bf.toml; default 2_000)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback BF_MAX_STEPS, then bf.toml; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        debug,
        stats,
        input,
        file,
        code,
        timeout_ms,
        max_steps,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let code_str = if let Some(path) = file {
        match fs::read_to_string(&path) {
            // Editors like to leave a trailing newline behind
            Ok(s) => s.trim_end().to_string(),
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("")
    };

    let input_bytes = match input.as_deref().map(decode_escapes).transpose() {
        Ok(bytes) => bytes.unwrap_or_default(),
        Err(msg) => {
            eprintln!("{program}: bad --input: {msg}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let (timeout_ms, max_steps) = config::resolve(timeout_ms, max_steps);
    debug!(timeout_ms, ?max_steps, "limits resolved");

    // Execute on a worker thread with cooperative cancellation
    let cancel = Arc::new(AtomicBool::new(false));
    let ctrl = StepControl::new(
        max_steps.map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
        cancel.clone(),
    );

    // ctrl+c flips the same flag the timeout does
    let sigint = ctrl.clone();
    if let Err(e) = ctrlc::set_handler(move || sigint.cancel()) {
        warn!(error = %e, "failed to install ctrl+c handler");
    }

    let (tx, rx) = mpsc::channel::<Result<RunStats, VmError>>();
    let program_owned = code_str.clone();
    let worker_ctrl = ctrl.clone();

    thread::spawn(move || {
        let res = if debug {
            run_traced(program_owned, input_bytes, &worker_ctrl)
        } else {
            driver::run_with_stats_with_control(program_owned, input_bytes, &worker_ctrl)
        };
        let _ = tx.send(res);
    });

    let timeout = Duration::from_millis(timeout_ms);
    let exit_code = match rx.recv_timeout(timeout) {
        Ok(Ok(result)) => {
            // The step table stands in for the result line
            if !debug {
                print_result("brainfuck result", &result.output, stats.then_some(result.memory_usage));
            }
            0
        }
        Ok(Err(VmError::StepLimitExceeded { limit })) => {
            eprintln!("Execution aborted: step limit exceeded ({limit})");
            let _ = io::stderr().flush();
            1
        }
        Ok(Err(VmError::Canceled)) => {
            eprintln!("Execution aborted: cancelled");
            let _ = io::stderr().flush();
            1
        }
        Ok(Err(err)) => {
            if let VmError::InputExhausted { output, .. } = &err {
                if !debug && !output.is_empty() {
                    print_result("partial brainfuck result", output, None);
                }
            }
            print_vm_error(Some(program), &code_str, &err);
            1
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            ctrl.cancel();
            eprintln!("Execution aborted: wall-clock timeout exceeded ({timeout_ms} ms)");
            let _ = io::stderr().flush();
            1
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => 1,
    };

    let _ = io::stdout().flush();
    exit_code
}

/// Run with a step observer that prints one table row per dispatch.
fn run_traced(source: String, input: Vec<u8>, ctrl: &StepControl) -> Result<RunStats, VmError> {
    let program = Program::parse(source)?;
    let mut engine = Engine::new(&program, input);

    println!("STEP | IP  | PTR | CELL | INSTR | ACTION");
    println!("-----+-----+-----+------+-------+------------------------------------------------");
    engine.set_step_observer(|r| {
        println!(
            "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
            r.step, r.ip, r.dp, r.cell_before, r.instruction, r.action
        );
    });

    engine.run(Some(ctrl))?;
    let (output, memory_usage) = engine.into_parts();
    Ok(RunStats { output, memory_usage })
}

/// Print the decoded output line, with memory usage when requested.
/// `label` names the line, e.g. "brainfuck result".
pub fn print_result(label: &str, output: &ByteSeq, memory_usage: Option<usize>) {
    let text = output.to_string_lossy();
    match memory_usage {
        Some(n) => print!("{label}: {text} using {n} bytes of memory"),
        None => print!("{label}: {text}"),
    }
    // For readability, ensure output ends with a newline
    if memory_usage.is_some() || !text.ends_with('\n') {
        println!();
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [--debug|-d] [--stats|-s] [--input TEXT] "<code>"
  {0} run [--debug|-d] [--stats|-s] [--input TEXT] --file <PATH>

Options:
  --file,  -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --input, -i <TEXT>  Bytes for the input queue (escapes: \xHH \n \r \t \0 \\)
  --stats, -s         Also report memory usage (final tape length)
  --debug, -d         Print a step-by-step table of operations instead of the result line
  --timeout <MS>      Wall-clock limit (env BF_TIMEOUT_MS, bf.toml [limits] timeout_ms)
  --max-steps <N>     Step limit (env BF_MAX_STEPS, bf.toml [limits] max_steps)
  --help,  -h         Show this help

Notes:
- Input (`,`) consumes one byte from --input; running out is an error.
- Moving left of cell 0 is an error.
- Any characters outside of Brainfuck's ><+-.,[] will result in an error.

Examples:
- ROT13 with a 0xFF terminator:
    {0} run --input 'ABCxyz\xFF' --file ./rot13.bf
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
