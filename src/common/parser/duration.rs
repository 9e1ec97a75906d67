use std::time::Duration;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::digit1,
    combinator::map,
    multi::many1,
    sequence::pair,
};

use super::result::{IResult, ParseError, Span};
use crate::error::{Error, Result};

const SECOND: u64 = 1000;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const YEAR: u64 = 365 * DAY;

/// A whole string as a duration literal, e.g. a `step` parameter.
pub fn parse_duration(s: &str) -> Result<Duration> {
    match duration(Span::new(s)) {
        Ok((rest, d)) if rest.fragment().is_empty() => Ok(d),
        Ok((rest, _)) => Err(Error::from(ParseError::partial(
            "duration literal",
            "end of input",
            rest,
        ))),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::from(e)),
        Err(nom::Err::Incomplete(_)) => Err(Error::bad_data("incomplete duration literal")),
    }
}

/// PromQL duration literal: `15s`, `1h30m`, `1y2w3d4h5m6s7ms`.
/// Units go from longest to shortest, each at most once; the total must be
/// positive.
pub fn duration(input: Span) -> IResult<Duration> {
    let (rest, parts) = many1(pair(digit1, unit_millis))(input)?;

    let fail = |message: &str| nom::Err::Failure(ParseError::new(message.to_owned(), input));

    let mut total: u64 = 0;
    let mut previous_unit = u64::MAX;
    for (count, unit) in parts {
        if unit >= previous_unit {
            return Err(fail("invalid duration literal"));
        }
        previous_unit = unit;

        let count = count
            .fragment()
            .parse::<u64>()
            .map_err(|_| fail("duration literal is out of range"))?;
        total = count
            .checked_mul(unit)
            .and_then(|ms| total.checked_add(ms))
            .ok_or_else(|| fail("duration literal is out of range"))?;
    }

    if total == 0 {
        return Err(fail("duration must be greater than 0"));
    }
    Ok((rest, Duration::from_millis(total)))
}

fn unit_millis(input: Span) -> IResult<u64> {
    // "ms" before "m"
    alt((
        map(tag("ms"), |_| 1),
        map(tag("s"), |_| SECOND),
        map(tag("m"), |_| MINUTE),
        map(tag("h"), |_| HOUR),
        map(tag("d"), |_| DAY),
        map(tag("w"), |_| WEEK),
        map(tag("y"), |_| YEAR),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() -> Result<()> {
        #[rustfmt::skip]
        let tests = [
            ("1ms", 1),
            ("15s", 15 * SECOND),
            ("0s500ms", 500),
            ("1m30s", MINUTE + 30 * SECOND),
            ("2h", 2 * HOUR),
            ("1y2w3d4h5m6s7ms", YEAR + 2 * WEEK + 3 * DAY + 4 * HOUR + 5 * MINUTE + 6 * SECOND + 7),
        ];

        for &(input, millis) in &tests {
            assert_eq!(
                Duration::from_millis(millis),
                parse_duration(input)?,
                "while parsing {}",
                input
            );
        }
        Ok(())
    }

    #[test]
    fn test_duration_invalid() {
        #[rustfmt::skip]
        let tests = [
            "", "s", "15", "0s", "0s0ms", "1ns", "10m2h", "1m1m", "1.5s",
            "15s and more", "99999999999999999999s", "999999999999y",
        ];

        for input in &tests {
            let res = parse_duration(input);
            assert!(res.is_err(), "expected error, got {:?} while parsing {:?}", res, input);
        }
    }

    #[test]
    fn test_duration_stops_at_non_unit() -> std::result::Result<(), nom::Err<ParseError<'static>>> {
        let (rest, d) = duration(Span::new("5m]"))?;
        assert_eq!(d, Duration::from_secs(300));
        assert_eq!(*rest.fragment(), "]");
        Ok(())
    }
}
