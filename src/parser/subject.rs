use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title>\s*(.*?)\s*-\s*LeagueOfGraphs\s*</title>").unwrap());
static SITE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*LeagueOfGraphs.*$").unwrap());
static REGION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([A-Z]{2,4}\)\s*$").unwrap());

const UNKNOWN: &str = "unknown#unknown";

/// Display name for the tracked player: page title first, then the file name.
///
/// `"Synow#KR1 (KR) - LeagueOfGraphs"` becomes `"Synow#KR1"`.
pub fn resolve_subject(html: &str, file_name: &Path) -> String {
    if let Some(caps) = TITLE_RE.captures(html) {
        let title = REGION_RE.replace(caps[1].trim(), "");
        return title.trim().to_string();
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let base = SITE_SUFFIX_RE.replace(stem.trim(), "");
    let base = REGION_RE.replace(base.trim(), "");
    let base = base.trim();
    if base.is_empty() {
        UNKNOWN.to_string()
    } else {
        base.to_string()
    }
}
