use super::position::Point;
use serde::{Deserialize, Serialize};

/// A named, positioned entity surfaced to an outline or jump-to-symbol view.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    /// Display name, after prefixes and suffixes have been applied.
    pub name: String,
    /// The bare name as it appears in source, minus anything stripped.
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Sorts symbols by position, keeping emission order for ties.
pub fn sort_by_position(symbols: &mut [Symbol]) {
    symbols.sort_by_key(|symbol| symbol.position);
}
