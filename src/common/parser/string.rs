use nom::InputTake;

use super::result::{IResult, ParseError, Span};

/// Double- or single-quoted string with the usual backslash escapes.
pub fn string_literal(input: Span) -> IResult<String> {
    let fragment = *input.fragment();

    let quote = match fragment.chars().next() {
        Some(c) if c == '"' || c == '\'' => c,
        _ => {
            return Err(nom::Err::Error(ParseError::new(
                "expected string literal".to_owned(),
                input,
            )))
        }
    };

    let mut value = String::new();
    let mut chars = fragment.char_indices().skip(1);

    while let Some((pos, c)) = chars.next() {
        match c {
            c if c == quote => {
                let (rest, _) = input.take_split(pos + c.len_utf8());
                return Ok((rest, value));
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, c)) if c == '\\' || c == '"' || c == '\'' => value.push(c),
                Some((pos, c)) => {
                    let (rest, _) = input.take_split(pos);
                    return Err(nom::Err::Failure(ParseError::new(
                        format!("unknown escape sequence '\\{}'", c),
                        rest,
                    )));
                }
                None => break,
            },
            c => value.push(c),
        }
    }

    let (rest, _) = input.take_split(fragment.len());
    Err(nom::Err::Failure(ParseError::partial(
        "string literal",
        "closing quote",
        rest,
    )))
}
