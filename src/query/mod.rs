mod ast;
mod parser;
mod request;

pub use ast::VectorSelector;
pub use request::{QueryParams, QueryRequest};

use tracing::debug;

use crate::common::parser::{ParseError, Span};
use crate::error::{Error, Result};
use crate::model::{LabelSet, MatchOp, MetricName};

/// What the store layer needs out of a query: the metric name and the
/// equality constraints on the remaining labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub metric: MetricName,
    pub labels: LabelSet,
}

/// Parse a PromQL query that must be a plain vector selector with
/// equality matchers only. Everything else is rejected.
pub fn parse_query(input: &str) -> Result<ParsedQuery> {
    let (rest, selector) = match parser::vector_selector(Span::new(input.trim())) {
        Ok(v) => v,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => return Err(Error::from(e)),
        Err(nom::Err::Incomplete(_)) => return Err(Error::bad_data("incomplete query")),
    };

    if !rest.fragment().trim().is_empty() {
        return Err(Error::from(ParseError::partial(
            "vector selector",
            "end of query (only plain selectors are supported)",
            rest,
        )));
    }

    if let Some(range) = selector.range() {
        debug!(?range, "range selector has no effect on the store query");
    }

    let (metric, matchers) = selector.into_parts();
    let mut metric = metric.unwrap_or_default();
    let mut labels = LabelSet::new();

    for matcher in matchers {
        if matcher.match_op() != MatchOp::Eql {
            return Err(Error::bad_data(format!(
                "unsupported label matcher {}{}{:?}: only equality matchers are supported",
                matcher.label(),
                matcher.match_op().as_str(),
                matcher.value(),
            )));
        }

        if matcher.is_name_matcher() {
            metric = matcher.value().clone();
        } else {
            labels.insert(matcher.label().clone(), matcher.value().clone());
        }
    }

    if metric.is_empty() {
        return Err(Error::bad_data("query must select a metric name"));
    }

    Ok(ParsedQuery { metric, labels })
}
