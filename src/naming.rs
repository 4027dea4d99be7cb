//! Asset file naming.
//!
//! Every artifact is named after its 1-based position in the selection list:
//! selection 0 becomes `asset_1.png`, selection 1 becomes `asset_2.png`, and
//! so on. The name is derived, never stored separately from the index, so the
//! two cannot drift apart.

const PREFIX: &str = "asset_";
const EXTENSION: &str = ".png";

/// Name for the artifact at a 0-based selection index.
///
/// ```
/// # use asset_extractor::naming::asset_name;
/// assert_eq!(asset_name(0), "asset_1.png");
/// assert_eq!(asset_name(9), "asset_10.png");
/// ```
pub fn asset_name(index: usize) -> String {
    format!("{PREFIX}{}{EXTENSION}", index + 1)
}

/// Inverse of [`asset_name`]: the 0-based index encoded in a name.
///
/// Accepts the full file name (`asset_3.png`) or just the 1-based number
/// (`3`). Returns `None` for anything else, including `asset_0.png`.
pub fn parse_asset_name(name: &str) -> Option<usize> {
    let name = name.trim();
    let number = name
        .strip_prefix(PREFIX)
        .and_then(|rest| rest.strip_suffix(EXTENSION))
        .unwrap_or(name);
    // Reject signs and whitespace that `parse` would otherwise accept.
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse::<usize>().ok()?.checked_sub(1)
}
