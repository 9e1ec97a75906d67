use std::time::Duration;

use crate::error::{Error, Result};
use crate::model::{LabelMatcher, MetricName};

#[derive(Debug, PartialEq)]
pub struct VectorSelector {
    metric: Option<MetricName>,
    matchers: Vec<LabelMatcher>,
    range: Option<Duration>,
}

impl VectorSelector {
    pub fn new<S>(
        metric: Option<S>,
        matchers: Vec<LabelMatcher>,
        range: Option<Duration>,
    ) -> Result<Self>
    where
        S: Into<MetricName>,
    {
        let (matches_everything, has_name_matcher) =
            matchers.iter().fold((true, false), |(me, hnm), m| {
                (me && m.matches(""), hnm || m.is_name_matcher())
            });

        if metric.is_some() && has_name_matcher {
            return Err(Error::bad_data("potentially ambiguous metric name match"));
        }

        if metric.is_none() && matches_everything {
            return Err(Error::bad_data(
                "vector selector must contain at least one non-empty matcher",
            ));
        }

        Ok(Self {
            metric: metric.map(Into::into),
            matchers,
            range,
        })
    }

    /// `foo[5m]` parses, but the range has no effect on the store query.
    pub fn range(&self) -> Option<Duration> {
        self.range
    }

    pub fn into_parts(self) -> (Option<MetricName>, Vec<LabelMatcher>) {
        (self.metric, self.matchers)
    }
}
