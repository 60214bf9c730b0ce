//! Typed ranking records built from the two embedded series.
//!
//! `lpData` maps a millisecond timestamp to league points; `rankData` maps the
//! same timestamp to tier metadata. Only timestamps present in both survive.

use std::ops::RangeInclusive;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::{Map, Value};
use tracing::debug;

/// Day boundaries are taken in UTC+9, never host local time.
pub const DAY_OFFSET_SECS: i32 = 9 * 3600;

/// The spurious lowest-rank reading the source emits.
pub const SENTINEL_TIER: &str = "Iron IV";

/// Iron (1) through Diamond-or-above (7).
pub const TIER_IDS: RangeInclusive<i64> = 1..=7;
/// Division ids as the page reports them.
pub const RANK_IDS: RangeInclusive<i64> = 1..=4;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: i64,
    pub day: NaiveDate,
    pub subject: String,
    pub tier: String,
    pub lp: i64,
    pub score: f64,
}

impl Record {
    pub fn state(&self) -> (&str, i64) {
        (&self.tier, self.lp)
    }

    pub fn is_sentinel(&self) -> bool {
        self.tier == SENTINEL_TIER && self.lp == 0
    }
}

/// One number per ladder position: 4 steps per tier, 1 per division, LP as the fraction.
///
/// Expects `tier_id` in [`TIER_IDS`] and `rank_id` in [`RANK_IDS`]; the
/// builder drops anything else before calling this. Rounded to 2 decimals.
pub fn score(tier_id: i64, rank_id: i64, lp: i64) -> f64 {
    let raw = (tier_id - 1) as f64 * 4.0 + (4 - rank_id) as f64 + lp as f64 / 100.0;
    (raw * 100.0).round() / 100.0
}

/// Calendar day of `timestamp_ms` in the fixed UTC+9 offset.
pub fn day_of(timestamp_ms: i64) -> Option<NaiveDate> {
    let offset = FixedOffset::east_opt(DAY_OFFSET_SECS)?;
    let utc = DateTime::from_timestamp_millis(timestamp_ms)?;
    Some(utc.with_timezone(&offset).date_naive())
}

/// Join the value and metadata series into records sorted by timestamp.
///
/// Entries missing from either side, with unparsable keys/values, an empty tier
/// label, or a tier/rank id outside [`TIER_IDS`]/[`RANK_IDS`] are dropped
/// individually.
pub fn build_records(
    values: &Map<String, Value>,
    metadata: &Map<String, Value>,
    subject: &str,
) -> Vec<Record> {
    let mut records = Vec::with_capacity(values.len());
    let mut unmatched = 0usize;
    let mut rejected = 0usize;

    for (key, value) in values {
        let Some(info) = metadata.get(key) else {
            unmatched += 1;
            continue;
        };
        match build_one(key, value, info, subject) {
            Some(r) => records.push(r),
            None => rejected += 1,
        }
    }

    if unmatched > 0 || rejected > 0 {
        debug!(kept = records.len(), unmatched, rejected, "built records");
    }

    records.sort_by_key(|r| r.timestamp);
    records
}

fn build_one(key: &str, value: &Value, info: &Value, subject: &str) -> Option<Record> {
    let timestamp = key.trim().parse::<i64>().ok()?;
    let lp = as_int(value)?;

    // a non-empty primary label wins even if it trims down to nothing
    let tier = ["tierRankString", "rankString"]
        .iter()
        .filter_map(|field| info.get(*field).and_then(Value::as_str))
        .find(|label| !label.is_empty())
        .map(str::trim)
        .unwrap_or_default();
    let tier_id = info.get("tierId").and_then(as_int).unwrap_or(0);
    let rank_id = info.get("rankId").and_then(as_int).unwrap_or(0);

    if tier.is_empty() || !TIER_IDS.contains(&tier_id) || !RANK_IDS.contains(&rank_id) {
        return None;
    }

    Some(Record {
        timestamp,
        day: day_of(timestamp)?,
        subject: subject.to_string(),
        tier: tier.to_string(),
        lp,
        score: score(tier_id, rank_id, lp),
    })
}

/// Integer view of a JSON number or numeric string, truncating fractions.
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}
