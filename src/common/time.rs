use chrono::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Timestamp, TimestampTrait};

/// Closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
}

impl TimeRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if end < start {
            return Err("end time must not be before start time".into());
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Timestamp {
        self.end
    }
}

/// Parse an API time parameter: Unix seconds (integer or fractional) or RFC3339.
pub fn parse_time(s: &str) -> Result<Timestamp> {
    if s.is_empty() {
        return Err(Error::bad_data("empty time string"));
    }

    if let Ok(secs) = s.parse::<f64>() {
        if !secs.is_finite() {
            return Err(Error::bad_data(format!("cannot parse {:?}: not a finite number", s)));
        }
        return Ok(secs);
    }

    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(Timestamp::from_datetime(&dt)),
        Err(_) => Err(Error::bad_data(format!("cannot parse {:?}: invalid format", s))),
    }
}
