use std::fmt;

use nom_locate::LocatedSpan;

use crate::error;

pub type Span<'a> = LocatedSpan<&'a str>;

pub type IResult<'a, O> = nom::IResult<Span<'a>, O, ParseError<'a>>;

#[derive(Debug, PartialEq)]
pub struct ParseError<'a> {
    span: Span<'a>,
    message: String,
}

impl<'a> ParseError<'a> {
    pub fn new(message: String, span: Span<'a>) -> Self {
        Self { span, message }
    }

    /// The input was recognized up to `span`, but what followed didn't fit.
    pub fn partial(wherein: &str, expected: &str, span: Span<'a>) -> Self {
        Self::new(
            format!(
                "unexpected {} in {}, expected {}",
                unexpected(*span.fragment()),
                wherein,
                expected
            ),
            span,
        )
    }

    /// `line:offset: parse error: ...`
    pub fn message(&self) -> String {
        format!(
            "{}:{}: parse error: {}",
            self.line(),
            self.offset(),
            self.message
        )
    }

    pub fn line(&self) -> u32 {
        self.span.location_line()
    }

    pub fn offset(&self) -> usize {
        self.span.location_offset()
    }
}

fn unexpected(found: &str) -> String {
    match found.split_whitespace().next() {
        None => String::from("EOF"),
        Some(token) => format!("\"{}\"", token),
    }
}

impl<'a> fmt::Display for ParseError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl<'a> nom::error::ParseError<Span<'a>> for ParseError<'a> {
    fn from_error_kind(input: Span<'a>, kind: nom::error::ErrorKind) -> Self {
        Self::new(format!("{:?}", kind), input)
    }

    fn append(_input: Span<'a>, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: Span<'a>, c: char) -> Self {
        Self::new(format!("expected '{}'", c), input)
    }
}

impl<'a> From<ParseError<'a>> for error::Error {
    fn from(err: ParseError<'a>) -> Self {
        error::Error::BadData(err.message())
    }
}

#[cfg(test)]
mod tests {
    use nom::Slice;

    use super::*;

    #[test]
    fn test_partial_error_position() {
        let input = Span::new("up{code=\n 200}");
        let err = ParseError::partial("label matching", "string literal", input.slice(10..));

        assert_eq!(err.line(), 2);
        assert_eq!(err.offset(), 10);
        assert_eq!(
            err.message(),
            r#"2:10: parse error: unexpected "200}" in label matching, expected string literal"#
        );
    }
}
