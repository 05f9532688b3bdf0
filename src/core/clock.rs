//! Clock-Reader: every instant the engine handles is a `LocalTimestamp`,
//! i.e. a point in time expressed in the organization's fixed zone.
//!
//! Day boundaries ("today", the attendance date) are always computed in that
//! zone, never in the server or client locale.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::cell::Cell;
use std::fmt;

/// Organization time zone, a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone(FixedOffset);

impl Zone {
    pub fn utc() -> Self {
        Zone(Utc.fix())
    }

    /// Parse `+HH:MM`, `-HH:MM`, `+HHMM`, `+HH`, `Z` or `UTC`.
    pub fn parse(s: &str) -> AppResult<Self> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("z") || t.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }

        let invalid = || AppError::InvalidZone(s.to_string());

        let (sign, rest) = match t.chars().next() {
            Some('+') => (1, &t[1..]),
            Some('-') => (-1, &t[1..]),
            _ => return Err(invalid()),
        };

        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let (h, m) = match digits.len() {
            2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
            4 => (
                digits[..2].parse::<i32>().map_err(|_| invalid())?,
                digits[2..].parse::<i32>().map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };
        if h > 23 || m > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (h * 3600 + m * 60))
            .map(Zone)
            .ok_or_else(invalid)
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An instant in the organization zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTimestamp(DateTime<FixedOffset>);

impl LocalTimestamp {
    /// Interpret a wall-clock reading as a time in `zone`.
    pub fn from_naive(naive: NaiveDateTime, zone: Zone) -> AppResult<Self> {
        zone.0
            .from_local_datetime(&naive)
            .single()
            .map(LocalTimestamp)
            .ok_or_else(|| AppError::InvalidTimestamp(naive.to_string()))
    }

    pub fn from_epoch_millis(ms: i64, zone: Zone) -> AppResult<Self> {
        DateTime::<Utc>::from_timestamp_millis(ms)
            .map(|dt| LocalTimestamp(dt.with_timezone(&zone.0)))
            .ok_or_else(|| AppError::InvalidTimestamp(format!("epoch millis {ms}")))
    }

    pub fn from_utc(dt: DateTime<Utc>, zone: Zone) -> Self {
        LocalTimestamp(dt.with_timezone(&zone.0))
    }

    /// Parse a textual timestamp. Accepted shapes, tried in order:
    ///
    /// 1. RFC 3339 with an offset (`2025-03-01T09:00:00+05:30`, `...Z`);
    ///    the instant is kept and re-expressed in `zone`.
    /// 2. `YYYY-MM-DD[T| ]HH:MM:SS[.fraction]` without offset, read in `zone`.
    /// 3. `YYYY-MM-DD[T| ]HH:MM` without offset, read in `zone`.
    /// 4. A bare integer of at least 12 digits, read as epoch milliseconds.
    ///
    /// Anything else is `InvalidTimestamp`.
    pub fn parse(text: &str, zone: Zone) -> AppResult<Self> {
        let t = text.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
            return Ok(LocalTimestamp(dt.with_timezone(&zone.0)));
        }

        const NAIVE_SHAPES: [&str; 4] = [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M",
        ];
        for shape in NAIVE_SHAPES {
            if let Ok(naive) = NaiveDateTime::parse_from_str(t, shape) {
                return Self::from_naive(naive, zone);
            }
        }

        if t.len() >= 12
            && t.chars().all(|c| c.is_ascii_digit())
            && let Ok(ms) = t.parse::<i64>()
        {
            return Self::from_epoch_millis(ms, zone);
        }

        Err(AppError::InvalidTimestamp(text.to_string()))
    }

    /// Calendar day in the organization zone.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Signed number of seconds from `self` to `later`.
    pub fn seconds_until(&self, later: &LocalTimestamp) -> i64 {
        (later.0 - self.0).num_seconds()
    }

    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Storage form: RFC 3339 with the zone offset, second precision.
    pub fn to_db_string(&self) -> String {
        self.0.to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
    }

    pub fn format(&self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }
}

impl fmt::Display for LocalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl Serialize for LocalTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_db_string())
    }
}

/// Source of "now" for the engine.
pub trait Clock {
    fn zone(&self) -> Zone;
    fn now(&self) -> LocalTimestamp;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

pub struct SystemClock {
    zone: Zone,
}

impl SystemClock {
    pub fn new(zone: Zone) -> Self {
        Self { zone }
    }
}

impl Clock for SystemClock {
    fn zone(&self) -> Zone {
        self.zone
    }

    fn now(&self) -> LocalTimestamp {
        LocalTimestamp::from_utc(Utc::now(), self.zone)
    }
}

/// Manually driven clock, used by tests and replays.
pub struct FixedClock {
    zone: Zone,
    now: Cell<LocalTimestamp>,
}

impl FixedClock {
    pub fn new(now: LocalTimestamp, zone: Zone) -> Self {
        Self {
            zone,
            now: Cell::new(now),
        }
    }

    /// Build from text in the shapes accepted by [`LocalTimestamp::parse`].
    pub fn at(text: &str, zone: Zone) -> AppResult<Self> {
        Ok(Self::new(LocalTimestamp::parse(text, zone)?, zone))
    }

    pub fn set(&self, now: LocalTimestamp) {
        self.now.set(now);
    }

    pub fn set_str(&self, text: &str) -> AppResult<()> {
        self.now.set(LocalTimestamp::parse(text, self.zone)?);
        Ok(())
    }

    pub fn advance_secs(&self, secs: i64) {
        let next = self.now.get().0 + chrono::Duration::seconds(secs);
        self.now.set(LocalTimestamp(next));
    }
}

impl Clock for FixedClock {
    fn zone(&self) -> Zone {
        self.zone
    }

    fn now(&self) -> LocalTimestamp {
        self.now.get()
    }
}
