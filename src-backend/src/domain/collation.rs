//! Name Collation
//!
//! Sort keys for display names. Chinese characters collate by their pinyin
//! reading so mixed-script lists read naturally; other characters collate
//! case-insensitively.

use std::cmp::Ordering;

use pinyin::ToPinyin;

/// Sort key for a display name
pub fn collation_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.chars() {
        match c.to_pinyin() {
            Some(p) => key.push_str(p.plain()),
            None => key.extend(c.to_lowercase()),
        }
    }
    key
}

/// Compare two names by collation key, falling back to the raw text
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}
