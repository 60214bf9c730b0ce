pub mod blocks;
pub mod json;
pub mod literal;
pub mod locate;
pub mod subject;

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::passes;
use crate::records::{self, Record};
use literal::LiteralError;
use locate::{LocateError, ScanPolicy};

const VALUE_VARS: &[&str] = &["lpData", "lpdata"];
const META_VARS: &[&str] = &["rankData", "rankdata"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    Solo,
    Flex,
}

impl Queue {
    pub const ALL: [Queue; 2] = [Queue::Solo, Queue::Flex];

    pub fn block_id(self) -> &'static str {
        match self {
            Queue::Solo => "rankingHistory-1",
            Queue::Flex => "rankingHistory-2",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Queue::Solo => "solo",
            Queue::Flex => "flex",
        }
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QueueSelection {
    Solo,
    Flex,
    Both,
    /// Every queue whose block is present in the page
    #[default]
    Auto,
}

impl QueueSelection {
    pub fn resolve(self, html: &str) -> Vec<Queue> {
        match self {
            QueueSelection::Solo => vec![Queue::Solo],
            QueueSelection::Flex => vec![Queue::Flex],
            QueueSelection::Both => Queue::ALL.to_vec(),
            QueueSelection::Auto => Queue::ALL
                .into_iter()
                .filter(|q| blocks::has_block(html, q.block_id()))
                .collect(),
        }
    }
}

/// Why a queue produced no rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("block {0} not found")]
    BlockNotFound(&'static str),
    #[error("{variable} literal not found")]
    LiteralNotFound { variable: &'static str },
    #[error("{variable} literal malformed: {source}")]
    Malformed {
        variable: &'static str,
        source: LiteralError,
    },
    #[error("{variable} parse failed: {message}")]
    Parse {
        variable: &'static str,
        message: String,
    },
    #[error("{variable} is not an object")]
    NotAMapping { variable: &'static str },
    #[error("no valid records")]
    Empty,
}

/// Slice → locate → parse → build → clean, reporting the first stage that came up empty.
pub fn try_extract_queue(
    html: &str,
    queue: Queue,
    subject: &str,
    scan: ScanPolicy,
) -> Result<Vec<Record>, SkipReason> {
    let block = blocks::slice_block(html, queue.block_id())
        .ok_or(SkipReason::BlockNotFound(queue.block_id()))?;

    let values = load_series(block, VALUE_VARS, scan)?;
    let metadata = load_series(block, META_VARS, scan)?;

    let built = records::build_records(&values, &metadata, subject);
    let raw = built.len();
    let cleaned = passes::preprocess(built);
    debug!(%queue, raw, cleaned = cleaned.len(), "queue extracted");

    if cleaned.is_empty() {
        return Err(SkipReason::Empty);
    }
    Ok(cleaned)
}

/// Same chain as [`try_extract_queue`]; any missing piece yields an empty series.
pub fn extract_queue(html: &str, queue: Queue, subject: &str) -> Vec<Record> {
    try_extract_queue(html, queue, subject, ScanPolicy::default()).unwrap_or_default()
}

fn load_series(
    block: &str,
    names: &[&'static str],
    scan: ScanPolicy,
) -> Result<serde_json::Map<String, Value>, SkipReason> {
    let variable = names[0];
    let literal = locate::locate_variable(block, names, scan).map_err(|e| match e {
        LocateError::NotFound => SkipReason::LiteralNotFound { variable },
        LocateError::Malformed(source) => SkipReason::Malformed { variable, source },
    })?;
    match json::parse_lenient(literal) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SkipReason::NotAMapping { variable }),
        Err(e) => Err(SkipReason::Parse {
            variable,
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> String {
        std::fs::read_to_string("tests/fixtures/player.html").unwrap()
    }

    #[test]
    fn selection_resolves_queues() {
        let html = page();
        assert_eq!(QueueSelection::Auto.resolve(&html), vec![Queue::Solo, Queue::Flex]);
        assert_eq!(QueueSelection::Flex.resolve(""), vec![Queue::Flex]);
        assert_eq!(QueueSelection::Both.resolve(""), vec![Queue::Solo, Queue::Flex]);
        assert!(QueueSelection::Auto.resolve("<html></html>").is_empty());
    }

    #[test]
    fn solo_fixture() {
        let html = page();
        let recs = extract_queue(&html, Queue::Solo, "Synow#KR1");
        let rows: Vec<_> = recs
            .iter()
            .map(|r| (r.day.to_string(), r.tier.as_str(), r.lp, r.score))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("2024-03-01".to_string(), "Bronze II", 40, 6.4),
                ("2024-03-02".to_string(), "Bronze I", 12, 7.12),
                ("2024-03-04".to_string(), "Bronze I", 12, 7.12),
                ("2024-03-05".to_string(), "Silver IV", 0, 8.0),
            ]
        );
        assert!(recs.iter().all(|r| r.subject == "Synow#KR1"));
    }

    #[test]
    fn flex_fixture_with_trailing_commas() {
        let html = page();
        let recs = extract_queue(&html, Queue::Flex, "Synow#KR1");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].tier, "Gold III");
        assert_eq!(recs[0].lp, 75);
    }

    #[test]
    fn missing_block_is_a_skip() {
        let html = "<html><body>no history here</body></html>";
        for q in Queue::ALL {
            assert!(extract_queue(html, q, "x").is_empty());
            assert_eq!(
                try_extract_queue(html, q, "x", ScanPolicy::FastPath),
                Err(SkipReason::BlockNotFound(q.block_id()))
            );
        }
    }

    #[test]
    fn missing_metadata_literal() {
        let html = r#"<div id="rankingHistory-1"><script>const lpData = {"1": 5};</script></div>"#;
        assert_eq!(
            try_extract_queue(html, Queue::Solo, "x", ScanPolicy::FastPath),
            Err(SkipReason::LiteralNotFound { variable: "rankData" })
        );
    }

    #[test]
    fn non_object_and_unparsable_literals() {
        let html = r#"<div id="rankingHistory-1">const lpData = [1, 2]; const rankData = {};</div>"#;
        assert_eq!(
            try_extract_queue(html, Queue::Solo, "x", ScanPolicy::FastPath),
            Err(SkipReason::NotAMapping { variable: "lpData" })
        );

        let html = r#"<div id="rankingHistory-1">const lpData = {1: 2}; const rankData = {};</div>"#;
        assert!(matches!(
            try_extract_queue(html, Queue::Solo, "x", ScanPolicy::FastPath),
            Err(SkipReason::Parse { variable: "lpData", .. })
        ));
    }

    #[test]
    fn unbalanced_literal_is_reported_as_malformed() {
        let html = r#"<div id="rankingHistory-1">const lpData = {"1": [5};</div>"#;
        let err = try_extract_queue(html, Queue::Solo, "x", ScanPolicy::BalancedOnly).unwrap_err();
        assert!(matches!(
            err,
            SkipReason::Malformed {
                variable: "lpData",
                source: LiteralError::MismatchedBrackets { expected: ']', found: '}', .. },
            }
        ));
        assert!(err.to_string().starts_with("lpData literal malformed: mismatched bracket"));
        assert!(extract_queue(html, Queue::Solo, "x").is_empty());
    }

    #[test]
    fn no_matching_timestamps_is_empty() {
        let html = r#"<div id="rankingHistory-2">
            const lpData = {"1": 5};
            const rankData = {"2": {"tierRankString": "Gold I", "tierId": 4, "rankId": 1}};
        </div>"#;
        assert_eq!(
            try_extract_queue(html, Queue::Flex, "x", ScanPolicy::BalancedOnly),
            Err(SkipReason::Empty)
        );
    }
}
