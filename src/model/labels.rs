use std::collections::HashMap;
use std::convert::TryFrom;

use regex::Regex;

use crate::error::{Error, Result};

pub const METRIC_NAME_LABEL: &str = "__name__";

pub type LabelName = String;

pub type LabelValue = String;

/// Labels of a sample or a series, `__name__` included.
pub type Labels = HashMap<LabelName, LabelValue>;

/// Equality constraints of a query, `__name__` excluded.
/// A later matcher on the same label overwrites an earlier one.
pub type LabelSet = HashMap<LabelName, LabelValue>;

#[derive(Debug)]
pub struct LabelMatcher {
    label: LabelName,
    match_op: MatchOp,
    value: LabelValue,
    re: Option<Regex>,
}

impl LabelMatcher {
    pub fn new<N, V>(label: N, match_op: MatchOp, value: V) -> Result<Self>
    where
        N: Into<LabelName>,
        V: Into<LabelValue>,
    {
        let label = label.into();
        let value = value.into();

        if label.is_empty() {
            return Err(Error::bad_data("empty label name in matcher"));
        }

        // Only used for selector validation.
        let re = match match_op {
            MatchOp::EqlRe | MatchOp::NeqRe => Some(
                Regex::new(&format!("^(?:{})$", value))
                    .map_err(|e| Error::bad_data(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            label,
            match_op,
            value,
            re,
        })
    }

    pub fn label(&self) -> &LabelName {
        &self.label
    }

    pub fn match_op(&self) -> MatchOp {
        self.match_op
    }

    pub fn value(&self) -> &LabelValue {
        &self.value
    }

    pub fn is_name_matcher(&self) -> bool {
        self.label == METRIC_NAME_LABEL
    }

    pub fn matches(&self, v: &str) -> bool {
        match (self.match_op, &self.re) {
            (MatchOp::Eql, _) => self.value == v,
            (MatchOp::Neq, _) => self.value != v,
            (MatchOp::EqlRe, Some(re)) => re.is_match(v),
            (MatchOp::NeqRe, Some(re)) => !re.is_match(v),
            (_, None) => false,
        }
    }
}

impl PartialEq for LabelMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.match_op == other.match_op && self.value == other.value
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatchOp {
    Eql,
    Neq,
    EqlRe,
    NeqRe,
}

impl MatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOp::Eql => "=",
            MatchOp::Neq => "!=",
            MatchOp::EqlRe => "=~",
            MatchOp::NeqRe => "!~",
        }
    }
}

impl TryFrom<&str> for MatchOp {
    type Error = Error;

    fn try_from(op: &str) -> Result<Self> {
        match op {
            "=" => Ok(MatchOp::Eql),
            "!=" => Ok(MatchOp::Neq),
            "=~" => Ok(MatchOp::EqlRe),
            "!~" => Ok(MatchOp::NeqRe),
            _ => Err(Error::bad_data("unexpected match op literal")),
        }
    }
}
