// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP attribute tokenizer using nom combinators

use fragview_model::{AttributeValue, DecodedEntity, EntityId};
use memchr::memchr_iter;
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Raw token from a STEP attribute list
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Entity reference (#123)
    EntityRef(u32),
    /// String value ('text')
    String(&'a str),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enumeration (.VALUE.)
    Enum(&'a str),
    /// List of tokens
    List(Vec<Token<'a>>),
    /// Typed value like IFCLABEL('text')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value ($)
    Null,
    /// Derived value (*)
    Derived,
}

impl<'a> Token<'a> {
    /// Convert token to an owned AttributeValue
    pub fn to_attribute_value(&self) -> AttributeValue {
        match self {
            Token::EntityRef(id) => AttributeValue::EntityRef(EntityId(*id)),
            Token::String(s) => AttributeValue::String(unescape(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(s) => AttributeValue::Enum((*s).to_string()),
            Token::List(items) => {
                AttributeValue::List(items.iter().map(|t| t.to_attribute_value()).collect())
            }
            Token::TypedValue(name, args) => AttributeValue::TypedValue(
                (*name).to_string(),
                args.iter().map(|t| t.to_attribute_value()).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }
}

/// Undo STEP string escaping ('' -> ')
fn unescape(s: &str) -> String {
    if s.contains("''") {
        s.replace("''", "'")
    } else {
        s.to_string()
    }
}

/// Find the closing quote of a string body, treating '' as an escape.
///
/// `input` starts just past the opening quote. Returns `None` when the
/// string is unterminated.
fn closing_quote(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut skip_until = 0;
    for pos in memchr_iter(b'\'', bytes) {
        if pos < skip_until {
            continue;
        }
        if bytes.get(pos + 1) == Some(&b'\'') {
            skip_until = pos + 2;
            continue;
        }
        return Some(pos);
    }
    None
}

fn ws(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    Ok((input, ()))
}

fn entity_ref(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('#')(input)?;
    let (input, digits) = take_while1(|c: char| c.is_ascii_digit())(input)?;
    let id = digits.parse::<u32>().unwrap_or(0);
    Ok((input, Token::EntityRef(id)))
}

/// Parse a STEP string ('text' with '' for escaped quotes)
fn step_string(input: &str) -> IResult<&str, Token> {
    let (body, _) = char('\'')(input)?;

    let end = closing_quote(body)
        .ok_or_else(|| nom::Err::Error(Error::new(input, ErrorKind::TakeUntil)))?;

    // past the closing quote
    Ok((&body[end + 1..], Token::String(&body[..end])))
}

fn number(input: &str) -> IResult<&str, Token> {
    let (input, num_str) = recognize((
        opt(char('-')),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    let is_float = num_str.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'));
    let token = if is_float {
        Token::Float(lexical_core::parse(num_str.as_bytes()).unwrap_or(0.0))
    } else {
        Token::Integer(lexical_core::parse(num_str.as_bytes()).unwrap_or(0))
    };
    Ok((input, token))
}

fn enumeration(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('.')(input)?;
    let (input, name) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = char('.')(input)?;
    Ok((input, Token::Enum(name)))
}

/// Comma-separated tokens inside parentheses
fn paren_list(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), token),
        pair(ws, char(')')),
    )
    .parse(input)
}

fn typed_value(input: &str) -> IResult<&str, Token> {
    let (input, type_name) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = ws(input)?;
    let (input, args) = paren_list(input)?;
    Ok((input, Token::TypedValue(type_name, args)))
}

/// Dispatch on the first byte; only typed values need a real lookahead.
fn token(input: &str) -> IResult<&str, Token> {
    match input.as_bytes().first() {
        Some(b'#') => entity_ref(input),
        Some(b'\'') => step_string(input),
        Some(b'$') => char('$').parse(input).map(|(rest, _)| (rest, Token::Null)),
        Some(b'*') => char('*')
            .parse(input)
            .map(|(rest, _)| (rest, Token::Derived)),
        Some(b'.') => enumeration(input),
        Some(b'(') => paren_list(input).map(|(rest, items)| (rest, Token::List(items))),
        Some(b) if b.is_ascii_digit() || *b == b'-' => number(input),
        _ => typed_value(input),
    }
}

/// Parse a complete entity definition
///
/// Format: `#123=IFCWALL(attr1,attr2,...);`
pub fn parse_entity(input: &str) -> Result<DecodedEntity, String> {
    let input = input.trim_start();

    let (input, _) = char::<&str, Error<&str>>('#')
        .parse(input)
        .map_err(|_| "Expected # at start of entity")?;

    let (input, id_str) =
        take_while1::<_, &str, Error<&str>>(|c: char| c.is_ascii_digit())
            .parse(input)
            .map_err(|_| "Expected entity ID")?;

    let id: u32 = id_str.parse().map_err(|_| "Invalid entity ID")?;

    let (input, _) = (ws, char('='), ws)
        .parse(input)
        .map_err(|_: nom::Err<Error<&str>>| "Expected = after entity ID")?;

    let (input, type_name) =
        take_while1::<_, &str, Error<&str>>(|c: char| c.is_alphanumeric() || c == '_')
            .parse(input)
            .map_err(|_| "Expected type name")?;

    let (input, _) = ws(input).unwrap_or((input, ()));

    let (_, tokens) =
        paren_list(input).map_err(|e| format!("Failed to parse attributes: {:?}", e))?;

    let attributes: Vec<AttributeValue> = tokens.iter().map(|t| t.to_attribute_value()).collect();

    Ok(DecodedEntity {
        id: EntityId(id),
        type_name: type_name.to_uppercase(),
        attributes,
    })
}

/// Parse entity from content at the given byte range
pub fn parse_entity_at(content: &str, start: usize, end: usize) -> Result<DecodedEntity, String> {
    parse_entity(&content[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entity_ref() {
        let (remaining, token) = entity_ref("#123").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::EntityRef(123));
    }

    #[test]
    fn parses_string_with_escaped_quote() {
        let (remaining, token) = step_string("'it''s a test'").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::String("it''s a test"));
        assert_eq!(
            token.to_attribute_value(),
            AttributeValue::String("it's a test".into())
        );
    }

    #[test]
    fn unterminated_string_is_a_parse_error() {
        assert!(step_string("'no closing quote").is_err());
        assert!(step_string("'ends in escape''").is_err());
        let err = parse_entity("#1=IFCWALL('abc);").unwrap_err();
        assert!(err.contains("attributes"));
    }

    #[test]
    fn parses_scientific_number() {
        let (_, token) = number("1.5E-3").unwrap();
        match token {
            Token::Float(f) => assert!((f - 0.0015).abs() < 1e-10),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn parses_enum() {
        let (_, token) = enumeration(".TRUE.").unwrap();
        assert_eq!(token, Token::Enum("TRUE"));
    }

    #[test]
    fn parses_nested_list() {
        let (_, token) = token("((1, 2), (3))").unwrap();
        match token {
            Token::List(items) => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn parses_full_entity() {
        let entity = parse_entity("#1=IFCWALL('abc',$,#2);").unwrap();
        assert_eq!(entity.id, EntityId(1));
        assert_eq!(entity.type_name, "IFCWALL");
        assert_eq!(entity.attributes.len(), 3);
        assert_eq!(entity.get_ref(2), Some(EntityId(2)));
    }

    #[test]
    fn parses_cartesian_point() {
        let entity = parse_entity("#7=IFCCARTESIANPOINT((0.,-100.,2.5E1));").unwrap();
        let coords = entity.attributes[0].as_list().unwrap();
        let values: Vec<f64> = coords.iter().filter_map(|v| v.as_float()).collect();
        assert_eq!(values, vec![0.0, -100.0, 25.0]);
    }
}
