use bf_vm::brackets::{scan_forward, validate};
use bf_vm::{run_for_output, run_with_stats, Engine, Program, VmError};

const HELLO_WORLD: &str =
    "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

const ROT13: &str = "-,+[-[>>++++[>++++++++<-]<+<-[>+>+>-[>>>]<[[>+<-]>>+>]<<<<<-]]>>>[-]+>--[-[<->+++[-]]]<[++++++++++++<[>-[>+>>]>[+[<+>-]>+>>]<<<<<-]>>[<+>-]>[-[-<<[-]>>]<<[<<->>-]>>]<<[<<+>>-]]<[-]<.[-]<-,+]";

#[test]
fn hello_world_prints_expected_bytes() {
    let output = run_for_output(HELLO_WORLD, "").unwrap();
    assert_eq!(output, "Hello World!\n");
}

#[test]
fn rot13_translates_until_sentinel() {
    let stats = run_with_stats(ROT13, b"ABCxyz\xFF").unwrap();
    assert_eq!(stats.output, "NOPklm");
    assert!(stats.memory_usage > 0);
}

#[test]
fn rot13_full_alphabet() {
    let mut input = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz".to_vec();
    input.push(0xFF);
    let output = run_for_output(ROT13, input).unwrap();
    assert_eq!(output, "NOPQRSTUVWXYZABCDEFGHIJKLMnopqrstuvwxyzabcdefghijklm");
}

#[test]
fn runs_are_deterministic() {
    let first = run_with_stats(ROT13, b"Hello\xFF").unwrap();
    let second = run_with_stats(ROT13, b"Hello\xFF").unwrap();
    assert_eq!(first, second);
}

#[test]
fn jump_targets_agree_with_rescan() {
    for code in [HELLO_WORLD, ROT13] {
        let bytes = code.as_bytes();
        let table = validate(bytes).unwrap();
        for (ip, &b) in bytes.iter().enumerate() {
            match b {
                b'[' => {
                    let close = table.partner(ip).unwrap();
                    assert_eq!(bytes[close], b']');
                    assert_eq!(scan_forward(bytes, ip), Some(close + 1));
                    assert_eq!(table.partner(close), Some(ip));
                }
                b']' => assert_eq!(bytes[table.partner(ip).unwrap()], b'['),
                _ => assert_eq!(table.partner(ip), None),
            }
        }
    }
}

#[test]
fn wraparound_after_256_increments() {
    let output = run_for_output(format!("{}.", "+".repeat(256)), "").unwrap();
    assert_eq!(output, &[0u8]);
}

#[test]
fn unmatched_open_never_executes() {
    // ',' would fail on empty input if anything ran
    let err = run_for_output(",[", "").unwrap_err();
    assert!(matches!(err, VmError::UnmatchedOpenBracket { ip: 1 }));
}

#[test]
fn bare_close_is_unmatched_close() {
    let err = run_for_output("+]", "").unwrap_err();
    assert!(matches!(err, VmError::UnmatchedCloseBracket { ip: 1 }));
    assert_eq!(err.ip(), Some(1));
    assert!(err.is_structural());
}

#[test]
fn reading_empty_input_fails() {
    let program = Program::parse(",").unwrap();
    let mut engine = Engine::new(&program, "");
    assert!(matches!(engine.run(None), Err(VmError::InputExhausted { ip: 0, .. })));
    assert_eq!(engine.steps(), 0);
}

#[test]
fn write_at_k_extends_tape_to_k_plus_one() {
    for k in [0usize, 1, 7, 100] {
        let stats = run_with_stats(format!("{}+", ">".repeat(k)), "").unwrap();
        assert_eq!(stats.memory_usage, k + 1);
    }
}

#[test]
fn moving_left_of_zero_is_rejected() {
    let err = run_for_output("<", "").unwrap_err();
    assert!(matches!(err, VmError::PointerUnderflow { ip: 0 }));
}
