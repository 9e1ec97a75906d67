use chrono::prelude::*;

// Unix timestamp in fractional seconds.
pub type Timestamp = f64;

pub trait TimestampTrait {
    fn from_millis(ms: i64) -> Self;
    fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self;
    fn floor_millis(&self) -> i64;
    fn ceil_millis(&self) -> i64;
}

// Milliseconds with sub-microsecond float noise removed, so that a timestamp
// on an exact millisecond is not pushed past it by floor/ceil.
#[inline]
fn millis(ts: Timestamp) -> f64 {
    (ts * 1e6).round() / 1e3
}

impl TimestampTrait for Timestamp {
    #[inline]
    fn from_millis(ms: i64) -> Self {
        ms as f64 / 1000.0
    }

    #[inline]
    fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9
    }

    #[inline]
    fn floor_millis(&self) -> i64 {
        millis(*self).floor() as i64
    }

    #[inline]
    fn ceil_millis(&self) -> i64 {
        millis(*self).ceil() as i64
    }
}

pub fn now() -> Timestamp {
    Timestamp::from_datetime(&Utc::now())
}
