use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, trace};

use super::literal::{extract_literal, LiteralError};

/// `=` with optional whitespace on both sides, anchored right after a variable name.
static ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*=\s*").unwrap());

/// How the end of a located literal is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPolicy {
    /// Slice up to the first `};` / `];` after the opener, falling back to a
    /// balanced scan only when that token is absent. Can stop early if a nested
    /// value happens to end in the same two characters.
    #[default]
    FastPath,
    /// Always run the balanced, string-aware scan.
    BalancedOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Delimited,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("literal not found")]
    NotFound,
    /// An assignment was found but its brackets never balance.
    #[error("malformed literal: {0}")]
    Malformed(#[source] LiteralError),
}

/// Find `[var|let|const] <name> = <literal>` in `block` and return the literal text.
///
/// Candidate names are tried in order; the first one that yields a literal wins.
/// When none does, the last bracket-balancing failure is returned over `NotFound`.
pub fn locate_variable<'a>(
    block: &'a str,
    names: &[&str],
    policy: ScanPolicy,
) -> Result<&'a str, LocateError> {
    let mut failure = LocateError::NotFound;
    for name in names {
        match locate_one(block, name, policy) {
            Ok(Some((literal, strategy))) => {
                debug!(variable = *name, ?strategy, len = literal.len(), "located literal");
                return Ok(literal);
            }
            Ok(None) => {}
            Err(e) => {
                trace!(variable = *name, error = %e, "balanced scan failed");
                failure = LocateError::Malformed(e);
            }
        }
    }
    Err(failure)
}

fn locate_one<'a>(
    block: &'a str,
    name: &str,
    policy: ScanPolicy,
) -> Result<Option<(&'a str, Strategy)>, LiteralError> {
    let Some(after) = assignment_end(block, name) else {
        return Ok(None);
    };
    let Some(offset) = block[after..].find(['[', '{']) else {
        return Ok(None);
    };
    let start = after + offset;

    if policy == ScanPolicy::FastPath {
        let close = if block.as_bytes()[start] == b'{' { "};" } else { "];" };
        if let Some(pos) = block[start..].find(close) {
            // keep the bracket, drop the semicolon
            return Ok(Some((&block[start..=start + pos], Strategy::Delimited)));
        }
    }

    let (literal, _) = extract_literal(block, start)?;
    Ok(Some((literal, Strategy::Balanced)))
}

/// Offset just past the `=` (and trailing whitespace) of the first `<name> =`.
fn assignment_end(block: &str, name: &str) -> Option<usize> {
    block.match_indices(name).find_map(|(pos, _)| {
        let rest = pos + name.len();
        ASSIGN_RE.find(&block[rest..]).map(|m| rest + m.end())
    })
}
