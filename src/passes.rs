//! Cleaning pipeline over a ranking series.
//!
//! Passes run in a fixed order:
//!   1. same-day sentinel glitch (Iron IV 0LP next to real readings that day)
//!   2. consecutive duplicate states
//!   3. sandwiched sentinel (A -> Iron IV 0LP -> A)
//!   4. last record per day
//!
//! Each pass takes and returns a whole series; none of them share state.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::records::Record;

pub type Pass = fn(Vec<Record>) -> Vec<Record>;

pub const PASSES: &[(&str, Pass)] = &[
    ("pass1_same_day_glitch", pass_same_day_glitch),
    ("pass2_consecutive_duplicates", pass_consecutive_duplicates),
    ("pass3_sandwich_glitch", pass_sandwich_glitch),
    ("pass4_daily_last", pass_daily_last),
];

/// Sort by timestamp, then run every pass in order.
pub fn preprocess(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by_key(|r| r.timestamp);
    PASSES.iter().fold(records, |acc, (name, pass)| {
        let before = acc.len();
        let out = pass(acc);
        debug!(pass = *name, before, after = out.len(), "pass done");
        out
    })
}

/// Drop sentinel readings on days that also have a real reading.
pub fn pass_same_day_glitch(records: Vec<Record>) -> Vec<Record> {
    let real_days: HashSet<_> = records
        .iter()
        .filter(|r| !r.is_sentinel())
        .map(|r| r.day)
        .collect();

    records
        .into_iter()
        .filter(|r| !(r.is_sentinel() && real_days.contains(&r.day)))
        .collect()
}

/// Drop a record whose (tier, lp) equals the last kept record's.
pub fn pass_consecutive_duplicates(records: Vec<Record>) -> Vec<Record> {
    let mut out: Vec<Record> = Vec::with_capacity(records.len());
    for r in records {
        if out.last().is_some_and(|prev| prev.state() == r.state()) {
            continue;
        }
        out.push(r);
    }
    out
}

/// Drop an interior sentinel whose left (last kept) and right neighbors match.
pub fn pass_sandwich_glitch(records: Vec<Record>) -> Vec<Record> {
    if records.len() < 3 {
        return records;
    }

    let last = records.len() - 1;
    let mut out: Vec<Record> = Vec::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        if i > 0 && i < last && r.is_sentinel() {
            let sandwiched = out
                .last()
                .is_some_and(|left| left.state() == records[i + 1].state());
            if sandwiched {
                continue;
            }
        }
        out.push(r.clone());
    }
    out
}

/// Keep the chronologically last record of each day, ordered by day.
pub fn pass_daily_last(records: Vec<Record>) -> Vec<Record> {
    let mut by_day: BTreeMap<_, Record> = BTreeMap::new();
    for r in records {
        match by_day.get(&r.day) {
            Some(kept) if kept.timestamp > r.timestamp => {}
            _ => {
                by_day.insert(r.day, r);
            }
        }
    }
    by_day.into_values().collect()
}
