//! Coarser histogram buckets by truncating tile keys.
//!
//! Resolution is controlled only by the depth a caller truncates to; the
//! codecs themselves know nothing about aggregation.

use crate::chrono::PREFIX_DELIMITER;
use std::collections::BTreeMap;

/// Truncate the digits of `key` to `depth`, keeping any magnitude prefix.
pub fn truncate(key: &str, depth: usize) -> String {
    match key.split_once(PREFIX_DELIMITER) {
        Some((prefix, digits)) => {
            let digits: String = digits.chars().take(depth).collect();
            format!("{prefix}{PREFIX_DELIMITER}{digits}")
        }
        None => key.chars().take(depth).collect(),
    }
}

/// Number of digits in `key`, ignoring any magnitude prefix.
pub fn depth(key: &str) -> usize {
    match key.split_once(PREFIX_DELIMITER) {
        Some((_, digits)) => digits.len(),
        None => key.len(),
    }
}

/// Sum counts of keys sharing the same prefix at `depth`.
pub fn aggregate<'a, I>(counts: I, depth: usize) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    let mut buckets = BTreeMap::new();
    for (key, count) in counts {
        *buckets.entry(truncate(key, depth)).or_insert(0) += count;
    }
    buckets
}
