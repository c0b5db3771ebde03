use std::fmt;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use time::{macros::format_description, OffsetDateTime, UtcOffset};

use crate::error::Error;

static PERIOD_PREFIX: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^period\s*")
        .case_insensitive(true)
        .build()
        .unwrap()
});

/// A class period, the grouping key every request set is scoped to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Period(pub u32);

impl Period {
    pub fn parse(input: &str) -> Result<Self, Error> {
        let label = normalize_period(input);
        label
            .parse()
            .map(Self)
            .map_err(|_| Error::InvalidPeriod(input.to_string()))
    }

    pub fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Number(num) => num
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Self)
                .ok_or_else(|| Error::InvalidPeriod(num.to_string())),
            Value::String(s) => Self::parse(s),
            other => Err(Error::InvalidPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Strips whitespace and a leading "Period" label, so `"Period  1"`, `"period 1"`
/// and `" 1 "` all compare equal to `"1"`.
pub fn normalize_period(input: &str) -> String {
    PERIOD_PREFIX.replace(input.trim(), "").trim().to_string()
}

/// Title for the playlist of `period` created at `at`, with the date and weekday
/// taken in the school's `offset`.
pub fn playlist_title(period: Period, at: OffsetDateTime, offset: UtcOffset) -> String {
    let local = at.to_offset(offset);
    let date = local
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default();
    format!(
        "{date} - Period {period} - {weekday} Power Playlist",
        weekday = local.weekday()
    )
}
