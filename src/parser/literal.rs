use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("literal must start with '[' or '{{' (offset {index})")]
    InvalidStart { index: usize },
    #[error("mismatched bracket at offset {index}: expected '{expected}', found '{found}'")]
    MismatchedBrackets {
        index: usize,
        expected: char,
        found: char,
    },
    #[error("unterminated literal starting at offset {start}")]
    UnterminatedLiteral { start: usize },
}

/// Extract the balanced `[...]` / `{...}` literal starting at byte offset `start`.
///
/// Quoted strings (`'`, `"`, `` ` ``) are skipped with backslash escapes honored,
/// so brackets inside string content never affect nesting. Returns the literal
/// (closer inclusive) and the offset one past it.
pub fn extract_literal(text: &str, start: usize) -> Result<(&str, usize), LiteralError> {
    let bytes = text.as_bytes();
    let opener = match bytes.get(start) {
        Some(&b @ (b'[' | b'{')) => b,
        _ => return Err(LiteralError::InvalidStart { index: start }),
    };

    let mut stack = vec![closer_for(opener)];
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    // Every byte we branch on is ASCII, so multi-byte UTF-8 sequences pass through untouched.
    for (i, &b) in bytes.iter().enumerate().skip(start + 1) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'\'' | b'"' | b'`' => quote = Some(b),
            b'[' | b'{' => stack.push(closer_for(b)),
            b']' | b'}' => {
                let expected = stack.pop().unwrap_or(b);
                if expected != b {
                    return Err(LiteralError::MismatchedBrackets {
                        index: i,
                        expected: expected as char,
                        found: b as char,
                    });
                }
                if stack.is_empty() {
                    return Ok((&text[start..=i], i + 1));
                }
            }
            _ => {}
        }
    }

    Err(LiteralError::UnterminatedLiteral { start })
}

fn closer_for(opener: u8) -> u8 {
    if opener == b'[' {
        b']'
    } else {
        b'}'
    }
}
