use std::convert::TryFrom;
use std::time::Duration;

use serde::Deserialize;

use super::{parse_query, ParsedQuery};
use crate::common::parser::parse_duration;
use crate::common::time::{parse_time, TimeRange};
use crate::error::{Error, Result};

/// Raw query parameters, as they arrive in the URL, a form body or a JSON body.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub query: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub step: Option<String>,
    pub time: Option<String>,
}

impl QueryParams {
    fn param(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn query(&self) -> Option<&str> {
        Self::param(&self.query)
    }
}

/// A validated query, ready to be run against the store.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub query: ParsedQuery,
    pub window: Option<TimeRange>,
    /// Validated but not used: ranged results are never step-aligned.
    pub step: Option<Duration>,
    pub ranged: bool,
}

impl TryFrom<QueryParams> for QueryRequest {
    type Error = Error;

    fn try_from(params: QueryParams) -> Result<Self> {
        let (window, step) = match (
            QueryParams::param(&params.start),
            QueryParams::param(&params.end),
            QueryParams::param(&params.step),
        ) {
            // A range query needs all of `start`, `end` and `step`.
            (Some(start), Some(end), Some(step)) => {
                let start = parse_time(start)
                    .map_err(|e| Error::bad_data(format!("invalid start time: {}", e)))?;
                let end = parse_time(end)
                    .map_err(|e| Error::bad_data(format!("invalid end time: {}", e)))?;
                let step = parse_step(step)?;
                (Some(TimeRange::new(start, end)?), Some(step))
            }
            _ => (None, None),
        };

        let text = params
            .query()
            .ok_or_else(|| Error::bad_data("empty query parameter"))?;

        Ok(QueryRequest {
            query: parse_query(text)?,
            ranged: window.is_some(),
            window,
            step,
        })
    }
}

/// Step as decimal seconds (`15`, `0.5`) or a duration literal (`1m30s`).
fn parse_step(s: &str) -> Result<Duration> {
    if let Ok(secs) = s.parse::<f64>() {
        if !secs.is_finite() {
            return Err(Error::bad_data(format!("invalid step: cannot parse {:?}", s)));
        }
        if secs <= 0.0 {
            return Err(Error::bad_data("zero or negative step"));
        }
        return Duration::try_from_secs_f64(secs)
            .map_err(|_| Error::bad_data(format!("invalid step: {:?} is too large", s)));
    }

    parse_duration(s).map_err(|e| Error::bad_data(format!("invalid step: {}", e)))
}
