use bf_vm::{run_with_stats, Engine, Program};

fn main() {
    // ROT13 reads until it sees 0xFF, so the input carries that terminator
    let rot13 = "-,+[-[>>++++[>++++++++<-]<+<-[>+>+>-[>>>]<[[>+<-]>>+>]<<<<<-]]>>>[-]+>--[-[<->+++[-]]]<[++++++++++++<[>-[>+>>]>[+[<+>-]>+>>]<<<<<-]>>[<+>-]>[-[-<<[-]>>]<<[<<->>-]>>]<<[<<+>>-]]<[-]<.[-]<-,+]";

    match run_with_stats(rot13, b"Hello\xFF") {
        Ok(stats) => println!(
            "{} ({} cells touched)",
            stats.output.to_string_lossy(),
            stats.memory_usage
        ),
        Err(err) => {
            eprintln!("Brainfuck interpreter error: {err}");
            std::process::exit(1);
        }
    }

    // Stepping by hand exposes the machine state between instructions
    let program = Program::parse("++>+++[<+>-]").expect("balanced program");
    let mut engine = Engine::new(&program, "");
    while !engine.is_halted() {
        if let Err(err) = engine.step() {
            eprintln!("step failed: {err}");
            std::process::exit(1);
        }
    }
    println!("cell 0 = {}, loop depth = {}", engine.tape().get(0), engine.loop_depth());
}
