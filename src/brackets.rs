//! Bracket validation and jump resolution.
//!
//! Validation is a single left-to-right pass over the program text. It fails on
//! the first `]` that has nothing to close, on the first character outside the
//! instruction set, and at the end if any `[` is still open. On success it
//! returns a [`JumpTable`] so loop skips don't rescan the program.

use crate::error::VmError;

/// Matching partner for every bracket in a validated program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    // partners[i] holds the matching index for '[' or ']' at index i.
    partners: Vec<Option<usize>>,
}

impl JumpTable {
    /// Index of the bracket matching the one at `ip`, if `ip` is a bracket.
    pub fn partner(&self, ip: usize) -> Option<usize> {
        self.partners.get(ip).copied().flatten()
    }

    /// Where execution continues when the `[` at `open_ip` is skipped: one past
    /// its matching `]`.
    pub fn skip_target(&self, open_ip: usize) -> Option<usize> {
        self.partner(open_ip).map(|close| close + 1)
    }
}

fn is_instruction(b: u8) -> bool {
    matches!(b, b'>' | b'<' | b'+' | b'-' | b'.' | b',' | b'[' | b']')
}

/// The character starting at byte `i`, decoding multi-byte UTF-8 when the
/// source holds it. Invalid sequences come back as U+FFFD.
fn char_at(code: &[u8], i: usize) -> char {
    let end = code.len().min(i + 4);
    String::from_utf8_lossy(&code[i..end])
        .chars()
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Validate `code` and resolve every bracket pair.
pub fn validate(code: &[u8]) -> Result<JumpTable, VmError> {
    let mut partners: Vec<Option<usize>> = vec![None; code.len()];
    let mut open: Vec<usize> = Vec::new();

    for (i, &b) in code.iter().enumerate() {
        match b {
            b'[' => open.push(i),
            b']' => {
                let Some(open_index) = open.pop() else {
                    return Err(VmError::UnmatchedCloseBracket { ip: i });
                };
                partners[open_index] = Some(i);
                partners[i] = Some(open_index);
            }
            _ if is_instruction(b) => {}
            _ => {
                return Err(VmError::InvalidCharacter {
                    ch: char_at(code, i),
                    ip: i,
                });
            }
        }
    }

    // Report the innermost still-open bracket.
    if let Some(&unmatched) = open.last() {
        return Err(VmError::UnmatchedOpenBracket { ip: unmatched });
    }

    Ok(JumpTable { partners })
}

/// Nested-counter scan from just after the `[` at `open_ip`: returns the index
/// one past its matching `]`, or `None` if the program ends first.
pub fn scan_forward(code: &[u8], open_ip: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in code.iter().enumerate().skip(open_ip + 1) {
        match b {
            b'[' => depth += 1,
            b']' if depth == 0 => return Some(i + 1),
            b']' => depth -= 1,
            _ => {}
        }
    }
    None
}
