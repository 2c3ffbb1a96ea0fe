//! Field presence: which raw fields count as populated
use std::collections::BTreeSet;

/// Text forms treated as a missing value
pub const EMPTY_SENTINELS: [&str; 3] = ["", "nan", "NaN"];

/// Whether a raw value counts as populated.
///
/// Whitespace-only text is populated; the rules decide what blank means.
pub fn is_populated(value: Option<&str>) -> bool {
    match value {
        Some(text) => !EMPTY_SENTINELS.contains(&text),
        None => false,
    }
}

/// Names of the fields whose value is populated
pub fn present_fields<'a, I>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    raw.into_iter()
        .filter(|(_, value)| is_populated(*value))
        .map(|(name, _)| name.to_string())
        .collect()
}
