use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static TRAILING_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*([\]}])").unwrap());

/// Parse a JS literal as JSON, retrying once with trailing commas removed.
pub fn parse_lenient(literal: &str) -> serde_json::Result<Value> {
    serde_json::from_str(literal).or_else(|_| {
        let cleaned = TRAILING_COMMA_RE.replace_all(literal, "$1");
        serde_json::from_str(&cleaned)
    })
}
