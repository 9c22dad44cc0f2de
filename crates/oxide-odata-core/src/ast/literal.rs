//! Typed literal values.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Literal {
    /// `null`.
    Null,
    /// String literal.
    String(String),
    /// `true` or `false`.
    Boolean(bool),
    /// Single-precision float (`1.5f`).
    Single(f32),
    /// Double-precision float (`1.5`, `2d`, `NaN`, `INF`).
    Double(f64),
    /// Exact decimal (`1.5m`).
    Decimal(Decimal),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer (`5L`, or any integer beyond `i32`).
    Long(i64),
    /// Binary data (`X'0A0B'`).
    Binary(Vec<u8>),
    /// Date, time of day or date-time.
    DateTime(DateTimeValue),
    /// `guid'...'`.
    Guid(Uuid),
    /// ISO 8601 duration (`duration'P1DT2H'`).
    Duration(IsoDuration),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Single(v) if v.is_finite() => write!(f, "{v:?}f"),
            Self::Single(v) => write_non_finite(f, f64::from(*v)),
            Self::Double(v) if v.is_finite() => write!(f, "{v:?}"),
            Self::Double(v) => write_non_finite(f, *v),
            Self::Decimal(d) => write!(f, "{d}m"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Long(l) => write!(f, "{l}L"),
            Self::Binary(bytes) => write!(f, "X'{}'", hex::encode_upper(bytes)),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Guid(g) => write!(f, "guid'{g}'"),
            Self::Duration(d) => write!(f, "duration'{d}'"),
        }
    }
}

fn write_non_finite(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_sign_negative() {
        f.write_str("-INF")
    } else {
        f.write_str("INF")
    }
}

/// The temporal literal forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DateTimeValue {
    /// A calendar date (`2024-05-01`).
    Date(NaiveDate),
    /// A time of day (`time'13:20:00'`).
    Time(NaiveTime),
    /// A date-time without offset.
    Local(NaiveDateTime),
    /// A date-time with an explicit offset or `Z`.
    Offset(DateTime<FixedOffset>),
}

impl DateTimeValue {
    /// Parses any of the accepted ISO 8601 forms.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Self::Offset(dt));
        }
        let normalized = text
            .strip_suffix('Z')
            .map_or_else(|| text.to_owned(), |s| format!("{s}+00:00"));
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"] {
            if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
                return Some(Self::Offset(dt));
            }
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
                return Some(Self::Local(dt));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(Self::Date(date));
        }
        for fmt in ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"] {
            if let Ok(time) = NaiveTime::parse_from_str(text, fmt) {
                return Some(Self::Time(time));
            }
        }
        None
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "date'{}'", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "time'{}'", t.format("%H:%M:%S%.f")),
            Self::Local(dt) => write!(f, "datetime'{}'", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Offset(dt) => write!(f, "datetime'{}'", dt.to_rfc3339()),
        }
    }
}

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(-)?P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("duration pattern is valid")
});

/// The body of a duration literal is not ISO 8601.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ISO 8601 duration '{0}'")]
pub struct InvalidDuration(pub String);

/// An ISO 8601 duration kept component by component.
///
/// Weeks are folded into days; nothing else is normalised, so `PT90M`
/// stays ninety minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsoDuration {
    pub negative: bool,
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: Decimal,
}

impl IsoDuration {
    /// True if every component is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds.is_zero()
    }
}

impl FromStr for IsoDuration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidDuration(s.to_owned());
        let caps = DURATION.captures(s).ok_or_else(invalid)?;
        // "P", "PT" and "P1DT" match the pattern but carry no (time) component.
        let has_date = (2..=5).any(|i| caps.get(i).is_some());
        let has_time = (6..=8).any(|i| caps.get(i).is_some());
        if (!has_date && !has_time) || s.ends_with('T') {
            return Err(invalid());
        }
        let int = |i: usize| -> Result<u32, InvalidDuration> {
            caps.get(i)
                .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| invalid()))
        };
        let weeks = int(4)?;
        let days = weeks
            .checked_mul(7)
            .and_then(|w| w.checked_add(int(5).ok()?))
            .ok_or_else(invalid)?;
        let seconds = caps
            .get(8)
            .map_or(Ok(Decimal::ZERO), |m| Decimal::from_str(m.as_str()))
            .map_err(|_| invalid())?;
        Ok(Self {
            negative: caps.get(1).is_some(),
            years: int(2)?,
            months: int(3)?,
            days,
            hours: int(6)?,
            minutes: int(7)?,
            seconds,
        })
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        if self.is_zero() {
            return f.write_str("T0S");
        }
        for (value, unit) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if value != 0 {
                write!(f, "{value}{unit}")?;
            }
        }
        if self.hours != 0 || self.minutes != 0 || !self.seconds.is_zero() {
            f.write_str("T")?;
            if self.hours != 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes != 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if !self.seconds.is_zero() {
                write!(f, "{}S", self.seconds.normalize())?;
            }
        }
        Ok(())
    }
}

impl Serialize for IsoDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
