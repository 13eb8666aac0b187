use std::io::{self, Write};

use crate::VmError;

/// Pretty-print a [`VmError`] with caret positioning.
/// If `program` is `Some("bf")`, prefix messages with "bf: ..."
pub fn print_vm_error(program: Option<&str>, code: &str, err: &VmError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        VmError::UnmatchedOpenBracket { ip } => {
            let msg = prefix_program("Parse error: unmatched bracket '['");
            print_error_with_context(&msg, code, *ip);
        }
        VmError::UnmatchedCloseBracket { ip } => {
            let msg = prefix_program("Parse error: unmatched bracket ']'");
            print_error_with_context(&msg, code, *ip);
        }
        VmError::InvalidCharacter { ch, ip } => {
            let msg = prefix_program(&format!("Parse error: invalid character '{}'", ch.escape_default()));
            print_error_with_context(&msg, code, *ip);
        }
        VmError::InputExhausted { ip, output } => {
            let msg = prefix_program(&format!(
                "Runtime error: input exhausted after {} output byte(s)",
                output.size()
            ));
            print_error_with_context(&msg, code, *ip);
        }
        VmError::PointerUnderflow { ip } => {
            let msg = prefix_program("Runtime error: pointer moved left of cell 0");
            print_error_with_context(&msg, code, *ip);
        }
        VmError::StepLimitExceeded { .. } | VmError::Canceled => {
            eprintln!("{}", prefix_program(&err.to_string()));
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window.
/// Program text is ASCII once validated, but the window is sliced on char
/// boundaries so a bad multi-byte character still renders.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");
    let (slice, underline) = context_window(code, pos);
    eprintln!("  {}", slice);
    eprintln!("  {}", underline);
    let _ = io::stderr().flush();
}

fn context_window(code: &str, pos: usize) -> (&str, String) {
    // Show a short window around the position for context
    const WINDOW: usize = 32;

    let start = floor_char_boundary(code, pos.saturating_sub(WINDOW));
    let end = floor_char_boundary(code, (pos + WINDOW + 1).min(code.len()));
    let slice = &code[start..end.max(start)];

    // Caret under the exact position
    let caret_offset = code[start..floor_char_boundary(code, pos.min(code.len()))]
        .chars()
        .count();
    let mut underline = " ".repeat(caret_offset);
    underline.push('^');
    (slice, underline)
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Decode `--input` text: `\xHH`, `\n`, `\r`, `\t`, `\0` and `\\` escapes map to
/// single bytes; everything else is taken as UTF-8.
pub fn decode_escapes(text: &str) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => out.push(b'\n'),
            Some('r') => out.push(b'\r'),
            Some('t') => out.push(b'\t'),
            Some('0') => out.push(0),
            Some('\\') => out.push(b'\\'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 2)
                    .ok_or_else(|| format!("invalid escape '\\x{hex}'"))?;
                out.push(byte);
            }
            Some(other) => return Err(format!("unknown escape '\\{other}'")),
            None => return Err("dangling '\\' at end of input".to_string()),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hex_sentinel() {
        assert_eq!(decode_escapes("ABC\\xFF").unwrap(), b"ABC\xFF".to_vec());
    }

    #[test]
    fn decodes_named_escapes() {
        assert_eq!(decode_escapes("a\\n\\t\\\\\\0").unwrap(), b"a\n\t\\\0".to_vec());
    }

    #[test]
    fn rejects_short_hex_escape() {
        assert!(decode_escapes("\\xF").is_err());
        assert!(decode_escapes("\\xZZ").is_err());
    }

    #[test]
    fn rejects_trailing_backslash() {
        assert!(decode_escapes("abc\\").is_err());
    }

    #[test]
    fn context_window_places_caret() {
        let (slice, underline) = context_window("++]--", 2);
        assert_eq!(slice, "++]--");
        assert_eq!(underline, "  ^");
    }

    #[test]
    fn context_window_trims_long_programs() {
        let code = "+".repeat(100);
        let (slice, underline) = context_window(&code, 80);
        assert_eq!(slice.len(), 52);
        assert_eq!(underline.len(), 33);
    }
}
