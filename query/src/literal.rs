//! Numeric and date literals used in range filters.
//!
//! Values are carried as `f64`: numbers as themselves, dates as seconds
//! since the Unix epoch. [`RangeKind`] decides how they are parsed and
//! rendered.

use crate::error::ParseError;
use strata_protocol::RangeKind;
use strata_protocol::StatValue;
use time::Date;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

pub const OPEN: &str = "*";
pub const RANGE_DELIMITER: char = ',';

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Client range such as `10,20`, `10,`, `,20`, `15` or `*`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralRange {
    pub kind: RangeKind,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl LiteralRange {
    pub fn open(kind: RangeKind) -> Self {
        Self {
            kind,
            low: None,
            high: None,
        }
    }

    pub fn parse(kind: RangeKind, raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim();
        if raw.is_empty() || raw == OPEN {
            return Ok(Self::open(kind));
        }
        let (low, high) = match raw.split_once(RANGE_DELIMITER) {
            Some((low, high)) => (parse_bound(kind, low)?, parse_bound(kind, high)?),
            None => {
                let value = parse_point(kind, raw)?;
                (Some(value), Some(value))
            }
        };
        if let (Some(low), Some(high)) = (low, high)
            && low > high
        {
            return Ok(Self {
                kind,
                low: Some(high),
                high: Some(low),
            });
        }
        Ok(Self { kind, low, high })
    }

    /// Both ends given by the client.
    pub fn is_closed(&self) -> bool {
        self.low.is_some() && self.high.is_some()
    }

    pub fn is_single(&self) -> bool {
        self.is_closed() && self.low == self.high
    }

    /// Fill open ends from index bounds.
    pub fn within(&self, min: f64, max: f64) -> (f64, f64) {
        (self.low.unwrap_or(min), self.high.unwrap_or(max))
    }
}

fn parse_bound(kind: RangeKind, raw: &str) -> Result<Option<f64>, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == OPEN {
        return Ok(None);
    }
    parse_point(kind, raw).map(Some)
}

pub fn parse_point(kind: RangeKind, raw: &str) -> Result<f64, ParseError> {
    match kind {
        RangeKind::Numeric => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ParseError::InvalidNumber(raw.to_string())),
        RangeKind::Date => parse_date(raw),
    }
}

/// Parse `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Result<f64, ParseError> {
    let raw = raw.trim();
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc().unix_timestamp() as f64);
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .map(|moment| moment.unix_timestamp() as f64)
        .map_err(|_| ParseError::InvalidDate(raw.to_string()))
}

pub fn render_point(kind: RangeKind, value: f64) -> String {
    match kind {
        RangeKind::Numeric => render_number(value),
        RangeKind::Date => OffsetDateTime::from_unix_timestamp(value.round() as i64)
            .ok()
            .and_then(|moment| moment.format(&Rfc3339).ok())
            .unwrap_or_else(|| render_number(value)),
    }
}

/// Render a range gap in index syntax.
pub fn render_gap(kind: RangeKind, span: f64, groups: usize) -> String {
    let groups = groups.max(1) as f64;
    match kind {
        RangeKind::Numeric => {
            let gap = round6(span / groups);
            render_number(if gap > 0.0 { gap } else { 1.0 })
        }
        RangeKind::Date => {
            let days = (span / SECONDS_PER_DAY / groups).ceil().max(1.0);
            format!("+{days}DAYS")
        }
    }
}

/// Bucket width of a rendered gap, in the numeric domain of `kind`.
pub fn parse_gap(kind: RangeKind, gap: &str) -> Option<f64> {
    let width = match kind {
        RangeKind::Numeric => gap.trim().parse::<f64>().ok()?,
        RangeKind::Date => {
            let days = gap.trim().strip_prefix('+')?.strip_suffix("DAYS")?;
            days.parse::<f64>().ok()? * SECONDS_PER_DAY
        }
    };
    (width.is_finite() && width > 0.0).then_some(width)
}

/// Read a statistic in the numeric domain of `kind`.
pub fn stat_point(kind: RangeKind, value: &StatValue) -> Option<f64> {
    match (kind, value) {
        (RangeKind::Date, StatValue::Text(text)) => parse_date(text).ok(),
        (_, value) => value.as_f64(),
    }
}

pub fn render_number(value: f64) -> String {
    round6(value).to_string()
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
