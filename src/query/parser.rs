//! Vector selector grammar:
//!
//! ```text
//! selector := metric_identifier [ label_matchers ] [ range ]
//!           | label_matchers [ range ]
//! label_matchers := "{" [ matcher { "," matcher } [ "," ] ] "}"
//! matcher  := label_identifier match_op string_literal
//! range    := "[" duration "]"
//! ```

use std::convert::TryFrom;
use std::time::Duration;

use nom::{branch::alt, bytes::complete::tag, character::complete::char, combinator::opt};

use super::ast::VectorSelector;
use crate::common::parser::{
    duration, label_identifier, maybe_lpadded, metric_identifier, separated_list, string_literal,
    IResult, ParseError, Span,
};
use crate::model::{LabelMatcher, MatchOp};

pub(super) fn vector_selector(input: Span) -> IResult<VectorSelector> {
    let (rest, metric) = opt(metric_identifier)(input)?;

    let (rest, matchers) = if metric.is_some() {
        let (rest, matchers) = opt(maybe_lpadded(label_matchers))(rest)?;
        (rest, matchers.unwrap_or_default())
    } else {
        label_matchers(rest)?
    };

    let (rest, range) = opt(maybe_lpadded(range))(rest)?;

    VectorSelector::new(metric, matchers, range)
        .map(|selector| (rest, selector))
        .map_err(|e| nom::Err::Failure(ParseError::new(e.to_string(), input)))
}

fn label_matchers(input: Span) -> IResult<Vec<LabelMatcher>> {
    separated_list(
        '{',
        '}',
        ',',
        label_matcher,
        "label matching",
        r#"identifier or "}""#,
    )(input)
}

fn label_matcher(input: Span) -> IResult<LabelMatcher> {
    let (rest, label) = label_identifier(input)?;

    let (rest, op) = maybe_lpadded(match_op)(rest).map_err(|_| {
        nom::Err::Failure(ParseError::partial(
            "label matching",
            r#"one of "=", "!=", "=~", "!~""#,
            rest,
        ))
    })?;

    let (rest, value) = match maybe_lpadded(string_literal)(rest) {
        Err(nom::Err::Error(_)) => {
            return Err(nom::Err::Failure(ParseError::partial(
                "label matching",
                "label value as string literal",
                rest,
            )))
        }
        res => res?,
    };

    LabelMatcher::new(label, op, value)
        .map(|matcher| (rest, matcher))
        .map_err(|e| nom::Err::Failure(ParseError::new(e.to_string(), input)))
}

fn match_op(input: Span) -> IResult<MatchOp> {
    let (rest, op) = alt((tag("=~"), tag("!~"), tag("!="), tag("=")))(input)?;
    MatchOp::try_from(*op.fragment())
        .map(|op| (rest, op))
        .map_err(|e| nom::Err::Failure(ParseError::new(e.to_string(), input)))
}

/// `[5m]`. Once the bracket is open, anything but a duration and `]` fails.
fn range(input: Span) -> IResult<Duration> {
    let (rest, _) = char('[')(input)?;

    let (rest, d) = match maybe_lpadded(duration)(rest) {
        Err(nom::Err::Error(_)) => {
            return Err(nom::Err::Failure(ParseError::partial(
                "range selector",
                "duration literal",
                rest,
            )))
        }
        res => res?,
    };

    match maybe_lpadded(char(']'))(rest) {
        Err(nom::Err::Error(_)) => Err(nom::Err::Failure(ParseError::partial(
            "range selector",
            "\"]\"",
            rest,
        ))),
        res => res.map(|(rest, _)| (rest, d)),
    }
}
