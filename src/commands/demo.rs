use clap::Args;
use std::io::{self, Write};

use crate::cli_util::print_vm_error;
use crate::commands::run::print_result;
use crate::driver;

/// Short "Hello World!\n" with nested loops.
pub const HELLO_WORLD: &str =
    "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

/// ROT13 filter; stops when it reads a 0xFF byte.
pub const ROT13: &str = "-,+[-[>>++++[>++++++++<-]<+<-[>+>+>-[>>>]<[[>+<-]>>+>]<<<<<-]]>>>[-]+>--[-[<->+++[-]]]<[++++++++++++<[>-[>+>>]>[+[<+>-]>+>>]<<<<<-]>>[<+>-]>[-[-<<[-]>>]<<[<<->>-]>>]<<[<<+>>-]]<[-]<.[-]<-,+]";

/// Input for [`ROT13`], terminated by the byte the program treats as end of input.
pub const ROT13_INPUT: &[u8] = b"ABCxyz\xFF";

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct DemoArgs {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: DemoArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    match driver::run_for_output(HELLO_WORLD, "") {
        Ok(output) => print_result("brainfuck result", &output, None),
        Err(err) => {
            print_vm_error(Some(program), HELLO_WORLD, &err);
            return 1;
        }
    }

    match driver::run_with_stats(ROT13, ROT13_INPUT) {
        Ok(stats) => print_result("brainfuck input result", &stats.output, Some(stats.memory_usage)),
        Err(err) => {
            print_vm_error(Some(program), ROT13, &err);
            return 1;
        }
    }

    let _ = io::stdout().flush();
    0
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} demo   # Run the built-in Hello World and ROT13 programs

Description:
  Prints the decoded output of Hello World, then the ROT13 of "ABCxyz"
  together with the memory the run used.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
