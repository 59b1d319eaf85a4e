//! Expansion of hierarchical filter values into concrete identifier paths.
//!
//! `a||b/c` with `/` as the hierarchy delimiter and `||` as the OR
//! delimiter expands to `[["a", "c"], ["b", "c"]]`. No identifiers are
//! resolved here.

use crate::error::ParseError;

/// Expansion cap applied by [`expand`].
pub const DEFAULT_MAX_ALTERNATIVES: usize = 64;

/// Expand raw values with the default cap.
pub fn expand<S: AsRef<str>>(
    raw_values: &[S],
    hierarchy_delimiter: Option<&str>,
    or_delimiter: &str,
) -> Result<Vec<Vec<String>>, ParseError> {
    expand_with_limit(
        "",
        raw_values,
        hierarchy_delimiter,
        or_delimiter,
        DEFAULT_MAX_ALTERNATIVES,
    )
}

/// Expand every raw value of `parameter` into ordered identifier paths.
///
/// Blank values yield nothing. Fails with `TooManyAlternatives` when the
/// total number of paths would exceed `max_alternatives`.
pub fn expand_with_limit<S: AsRef<str>>(
    parameter: &str,
    raw_values: &[S],
    hierarchy_delimiter: Option<&str>,
    or_delimiter: &str,
    max_alternatives: usize,
) -> Result<Vec<Vec<String>>, ParseError> {
    let mut parsed = Vec::new();
    let mut total = 0_usize;
    for raw in raw_values {
        let Some(segments) = segments(parameter, raw.as_ref(), hierarchy_delimiter, or_delimiter)?
        else {
            continue;
        };
        let count = segments
            .iter()
            .try_fold(1_usize, |acc, alternatives| acc.checked_mul(alternatives.len()))
            .unwrap_or(usize::MAX);
        total = total.saturating_add(count);
        if total > max_alternatives {
            return Err(ParseError::TooManyAlternatives {
                count: total,
                limit: max_alternatives,
            });
        }
        parsed.push(segments);
    }

    let mut paths = Vec::with_capacity(total);
    for segments in parsed {
        paths.extend(cartesian(&segments));
    }
    Ok(paths)
}

fn segments(
    parameter: &str,
    raw: &str,
    hierarchy_delimiter: Option<&str>,
    or_delimiter: &str,
) -> Result<Option<Vec<Vec<String>>>, ParseError> {
    let raw = raw.trim();
    let raw = match hierarchy_delimiter {
        Some(delimiter) => trim_delimiters(raw, delimiter),
        None => raw,
    };
    if raw.is_empty() {
        return Ok(None);
    }
    let pieces: Vec<&str> = match hierarchy_delimiter {
        Some(delimiter) => raw.split(delimiter).collect(),
        None => vec![raw],
    };

    let mut segments = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if piece.trim().is_empty() {
            return Err(ParseError::malformed(
                parameter,
                format!("empty path segment in '{raw}'"),
            ));
        }
        let mut alternatives = Vec::new();
        for alternative in piece.split(or_delimiter) {
            let alternative = alternative.trim();
            if alternative.is_empty() {
                return Err(ParseError::malformed(
                    parameter,
                    format!("empty alternative in '{piece}'"),
                ));
            }
            alternatives.push(alternative.to_string());
        }
        segments.push(alternatives);
    }
    Ok(Some(segments))
}

fn trim_delimiters<'a>(mut raw: &'a str, delimiter: &str) -> &'a str {
    while let Some(rest) = raw.strip_prefix(delimiter) {
        raw = rest;
    }
    while let Some(rest) = raw.strip_suffix(delimiter) {
        raw = rest;
    }
    raw
}

fn cartesian(segments: &[Vec<String>]) -> Vec<Vec<String>> {
    segments.iter().fold(vec![Vec::new()], |paths, alternatives| {
        paths
            .iter()
            .flat_map(|prefix| {
                alternatives.iter().map(move |alternative| {
                    let mut path = prefix.clone();
                    path.push(alternative.clone());
                    path
                })
            })
            .collect()
    })
}
