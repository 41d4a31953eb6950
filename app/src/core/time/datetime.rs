use std::fmt::Display;

use chrono::{FixedOffset, NaiveDateTime, TimeZone};
use tokio::task_local;

task_local! {
    pub static FIXED_NOW: DateTime;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DateTime {
    delegate: chrono::DateTime<chrono::Local>,
}

impl DateTime {
    fn new<T: TimeZone>(delegate: chrono::DateTime<T>) -> Self {
        Self {
            delegate: delegate.with_timezone(&chrono::Local),
        }
    }

    pub fn now() -> Self {
        FIXED_NOW
            .try_with(|t| *t)
            .unwrap_or_else(|_| chrono::Local::now().into())
    }

    #[cfg(test)]
    pub fn from_iso(iso8601: &str) -> anyhow::Result<Self> {
        Ok(chrono::DateTime::parse_from_rfc3339(iso8601)?.into())
    }

    //None if the local time does not exist in the given zone
    pub fn from_naive_in_zone(naive: NaiveDateTime, zone: FixedOffset) -> Option<Self> {
        zone.from_local_datetime(&naive).single().map(Self::new)
    }
}

impl<T: TimeZone> From<chrono::DateTime<T>> for DateTime {
    fn from(delegate: chrono::DateTime<T>) -> Self {
        Self::new(delegate)
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.delegate.format("%Y-%m-%d %H:%M:%S %:z"))
    }
}
