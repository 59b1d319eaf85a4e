//! Chronological tiles.
//!
//! An interval of before-present (BP) values is treated as a point
//! `(earliest, latest)` inside the square `[0, bound] x [0, bound]`. Every
//! digit bisects both axes of the current tile and records which edges
//! moved inward:
//!
//! | digit | ancient edge moves | recent edge moves |
//! |-------|--------------------|-------------------|
//! | `0`   | yes                | no                |
//! | `1`   | no                 | no                |
//! | `2`   | yes                | yes               |
//! | `3`   | no                 | yes               |
//!
//! A path may carry a magnitude prefix such as `10m-` that replaces the
//! default bound.

use crate::error::Result;
use crate::error::TileError;
use serde::Deserialize;
use serde::Serialize;

/// Bound represented by an unprefixed empty path.
pub const DEFAULT_MAX_BOUND: i64 = 10_000_000;

/// Paths never grow beyond this many digits.
pub const MAX_DEPTH: usize = 32;

/// Encoding stops once both axes are this narrow.
pub const MIN_PRECISION: i64 = 1;

/// Anchor year for BP conversions.
pub const PRESENT_YEAR: i64 = 1950;

pub const PREFIX_DELIMITER: char = '-';

const MAX_PREFIX_BOUND: f64 = 1e15;

/// Bounds reconstructed from a tile path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBounds {
    /// Most ancient BP value covered by the tile
    pub earliest: i64,
    /// Most recent BP value covered by the tile
    pub latest: i64,
    /// Bound implied by the path prefix
    pub max_bound: i64,
}

impl TileBounds {
    pub fn earliest_year(&self) -> i64 {
        bp_to_year(self.earliest)
    }

    pub fn latest_year(&self) -> i64 {
        bp_to_year(self.latest)
    }
}

#[derive(Clone, Copy, Debug)]
struct Axis {
    lo: i64,
    hi: i64,
}

impl Axis {
    fn new(bound: i64) -> Self {
        Self { lo: 0, hi: bound + 1 }
    }

    fn width(self) -> i64 {
        self.hi - self.lo
    }

    fn mid(self) -> i64 {
        self.lo + self.width() / 2
    }

    fn lower(self) -> Self {
        Self {
            lo: self.lo,
            hi: self.mid(),
        }
    }

    fn upper(self) -> Self {
        Self {
            lo: self.mid(),
            hi: self.hi,
        }
    }
}

fn digit_for(early_in: bool, late_in: bool) -> char {
    match (early_in, late_in) {
        (true, false) => '0',
        (false, false) => '1',
        (true, true) => '2',
        (false, true) => '3',
    }
}

fn moves_for(digit: char) -> Option<(bool, bool)> {
    match digit {
        '0' => Some((true, false)),
        '1' => Some((false, false)),
        '2' => Some((true, true)),
        '3' => Some((false, true)),
        _ => None,
    }
}

/// Encode a BP interval into a tile path.
///
/// `prefix` may be empty (default bound) or a magnitude such as `"10m"`;
/// a trailing `-` is accepted. The two bounds are ordered before encoding,
/// so callers may pass them either way round.
pub fn encode(earliest: i64, latest: i64, prefix: &str) -> Result<String> {
    let prefix = prefix.trim().trim_end_matches(PREFIX_DELIMITER);
    let bound = if prefix.is_empty() {
        DEFAULT_MAX_BOUND
    } else {
        parse_magnitude(prefix)?
    };
    let (earliest, latest) = if earliest >= latest {
        (earliest, latest)
    } else {
        (latest, earliest)
    };
    if latest < 0 || earliest > bound {
        return Err(TileError::OutOfRange(format!(
            "interval {earliest}..{latest} exceeds [0, {bound}]"
        )));
    }

    let mut path = String::new();
    if !prefix.is_empty() {
        path.push_str(&prefix.to_ascii_lowercase());
        path.push(PREFIX_DELIMITER);
    }

    let mut early = Axis::new(bound);
    let mut late = Axis::new(bound);
    let mut depth = 0;
    while depth < MAX_DEPTH && (early.width() > MIN_PRECISION || late.width() > MIN_PRECISION) {
        let early_in = earliest < early.mid();
        let late_in = latest >= late.mid();
        path.push(digit_for(early_in, late_in));
        early = if early_in { early.lower() } else { early.upper() };
        late = if late_in { late.upper() } else { late.lower() };
        depth += 1;
    }
    Ok(path)
}

/// Encode an interval given in calendar years (negative for BCE).
pub fn encode_years(earliest_year: i64, latest_year: i64, prefix: &str) -> Result<String> {
    encode(years_to_bp(earliest_year), years_to_bp(latest_year), prefix)
}

/// Replay a tile path into the bounds it covers.
pub fn decode(path: &str) -> Result<TileBounds> {
    let (bound, digits) = split_prefix(path)?;
    if digits.len() > MAX_DEPTH {
        return Err(TileError::InvalidPath(format!(
            "'{path}' is deeper than {MAX_DEPTH} digits"
        )));
    }
    let mut early = Axis::new(bound);
    let mut late = Axis::new(bound);
    for digit in digits.chars() {
        let Some((early_in, late_in)) = moves_for(digit) else {
            return Err(TileError::InvalidPath(format!(
                "'{path}' contains '{digit}'"
            )));
        };
        early = if early_in { early.lower() } else { early.upper() };
        late = if late_in { late.upper() } else { late.lower() };
        if early.width() < 1 || late.width() < 1 {
            return Err(TileError::InvalidPath(format!(
                "'{path}' narrows past the precision floor"
            )));
        }
    }
    Ok(TileBounds {
        earliest: early.hi - 1,
        latest: late.lo,
        max_bound: bound,
    })
}

/// Split an optional magnitude prefix from the digits of a path.
pub fn split_prefix(path: &str) -> Result<(i64, &str)> {
    let path = path.trim();
    match path.split_once(PREFIX_DELIMITER) {
        Some((prefix, digits)) => Ok((parse_magnitude(prefix)?, digits)),
        None => Ok((DEFAULT_MAX_BOUND, path)),
    }
}

/// Parse a magnitude such as `10m`, `2.5K` or `1g` into an absolute bound.
pub fn parse_magnitude(raw: &str) -> Result<i64> {
    let lowered = raw.trim().to_ascii_lowercase();
    let multiplier = match lowered.chars().last() {
        Some('k') => 1e3,
        Some('m') => 1e6,
        Some('g') => 1e9,
        _ => {
            return Err(TileError::UnrecognizedPrefix(format!(
                "'{raw}' must end with k, m or g"
            )));
        }
    };
    let number = &lowered[..lowered.len() - 1];
    let value = number
        .parse::<f64>()
        .map_err(|_| TileError::UnrecognizedPrefix(format!("'{raw}' has no usable magnitude")))?;
    let bound = (value * multiplier).round();
    if !bound.is_finite() || bound < 1.0 || bound > MAX_PREFIX_BOUND {
        return Err(TileError::UnrecognizedPrefix(format!(
            "'{raw}' is outside the supported magnitudes"
        )));
    }
    Ok(bound as i64)
}

pub fn years_to_bp(year: i64) -> i64 {
    PRESENT_YEAR - year
}

pub fn bp_to_year(bp: i64) -> i64 {
    PRESENT_YEAR - bp
}
