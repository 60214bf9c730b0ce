/// Marker for an element id as it appears in the saved page.
fn marker(id: &str) -> String {
    format!("id=\"{}\"", id)
}

/// Ids in one family share everything but the trailing number
/// (`rankingHistory-1`, `rankingHistory-2`, ...).
fn family_prefix(id: &str) -> &str {
    id.trim_end_matches(|c: char| c.is_ascii_digit())
}

pub fn has_block(html: &str, block_id: &str) -> bool {
    html.contains(&marker(block_id))
}

/// Slice the part of `html` owned by `block_id`: from its id marker up to the
/// next sibling marker of the same family, or to the end of the text.
pub fn slice_block<'a>(html: &'a str, block_id: &str) -> Option<&'a str> {
    let start = html.find(&marker(block_id))?;
    let sibling = format!("id=\"{}", family_prefix(block_id));
    // Skip the first byte so the block's own marker is not found again.
    let from = start + 1;
    match html[from..].find(&sibling) {
        Some(offset) => Some(&html[start..from + offset]),
        None => Some(&html[start..]),
    }
}
