use nom::{
    bytes::complete::take_while,
    character::complete::{char, multispace0, satisfy},
    combinator::{opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair, preceded},
};

use super::result::{IResult, ParseError, Span};

/// `[a-zA-Z_][a-zA-Z0-9_]*`
pub fn label_identifier(input: Span) -> IResult<String> {
    identifier(input, false)
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn metric_identifier(input: Span) -> IResult<String> {
    identifier(input, true)
}

fn identifier(input: Span, allow_colon: bool) -> IResult<String> {
    let head = move |c: char| c.is_ascii_alphabetic() || c == '_' || (allow_colon && c == ':');
    let tail = move |c: char| head(c) || c.is_ascii_digit();

    let (rest, m) = recognize(pair(satisfy(head), take_while(tail)))(input)?;
    Ok((rest, m.fragment().to_string()))
}

/// `opener [ element { sep element } [ sep ] ] closer`, whitespace allowed
/// around every token. Once `opener` matched, a missing `closer` is a failure
/// reported as "unexpected X in `wherein`, expected `expected`".
pub fn separated_list<'a, F, O>(
    opener: char,
    closer: char,
    sep: char,
    element: F,
    wherein: &'static str,
    expected: &'static str,
) -> impl FnMut(Span<'a>) -> IResult<'a, Vec<O>>
where
    F: Copy + FnMut(Span<'a>) -> IResult<'a, O>,
{
    move |input: Span<'a>| {
        let (rest, _) = char(opener)(input)?;

        let (rest, elements) = opt(separated_list1(char(sep), maybe_padded(element)))(rest)?;
        let elements = elements.unwrap_or_default();

        let rest = if elements.is_empty() {
            rest
        } else {
            opt(maybe_lpadded(char(sep)))(rest)?.0
        };

        let (rest, _) = maybe_lpadded(char(closer))(rest).map_err(|_| {
            let (found, _) = multispace0::<Span, ParseError>(rest).unwrap_or((rest, rest));
            nom::Err::Failure(ParseError::partial(wherein, expected, found))
        })?;

        Ok((rest, elements))
    }
}

fn maybe_padded<'a, F, O>(f: F) -> impl FnMut(Span<'a>) -> IResult<'a, O>
where
    F: FnMut(Span<'a>) -> IResult<'a, O>,
{
    delimited(multispace0, f, multispace0)
}

pub fn maybe_lpadded<'a, F, O>(f: F) -> impl FnMut(Span<'a>) -> IResult<'a, O>
where
    F: FnMut(Span<'a>) -> IResult<'a, O>,
{
    preceded(multispace0, f)
}
