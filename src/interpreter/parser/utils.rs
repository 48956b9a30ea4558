use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::core::ParseResult,
    },
};

/// Returns the position of the next token without consuming it.
///
/// Falls back to `1:1` when the stream is exhausted; the lexer always emits a
/// trailing `Eof`, so that fallback is effectively unreachable.
pub(in crate::interpreter::parser) fn peek_pos<'a, I>(tokens: &mut Peekable<I>) -> Pos
    where I: Iterator<Item = &'a (Token, Pos)>
{
    tokens.peek().map_or(Pos { line: 1, col: 1 }, |(_, pos)| *pos)
}

/// Consumes the next token, requiring it to equal `expected`.
///
/// # Parameters
/// - `tokens`: Token stream.
/// - `expected`: The exact token that must come next.
/// - `context`: Human-readable description used in the error message.
///
/// # Returns
/// The position of the consumed token.
///
/// # Errors
/// `UnexpectedToken` if a different token is found, `UnexpectedEndOfInput` if
/// the stream is exhausted.
pub(in crate::interpreter::parser) fn expect_token<'a, I>(tokens: &mut Peekable<I>,
                                                          expected: &Token,
                                                          context: &str)
                                                          -> ParseResult<Pos>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    match tokens.next() {
        Some((tok, pos)) if tok == expected => Ok(*pos),
        Some((tok, pos)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected {context}, found {tok:?}"),
                                              line:  pos.line,
                                              col:   pos.col, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0, col: 0 }),
    }
}

/// Consumes the next token, requiring a plain identifier, and returns its
/// name and position.
///
/// # Errors
/// `UnexpectedToken` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              context: &str)
                                                              -> ParseResult<(String, Pos)>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    match tokens.next() {
        Some((Token::Ident(name), pos)) => Ok((name.clone(), *pos)),
        Some((tok, pos)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected {context}, found {tok:?}"),
                                              line:  pos.line,
                                              col:   pos.col, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0, col: 0 }),
    }
}

/// Consumes the next token, requiring a type name.
///
/// Built-in types arrive as `Token::Type`; user-defined struct types arrive
/// as identifiers. When `allow_void` is set, the `void` keyword is accepted
/// as well (function return position).
///
/// # Errors
/// `UnexpectedToken` if the next token cannot denote a type.
pub(in crate::interpreter::parser) fn parse_type_name<'a, I>(tokens: &mut Peekable<I>,
                                                             allow_void: bool,
                                                             context: &str)
                                                             -> ParseResult<(String, Pos)>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    match tokens.next() {
        Some((Token::Type(name), pos)) => Ok((name.clone(), *pos)),
        Some((Token::Ident(name), pos)) => Ok((name.clone(), *pos)),
        Some((Token::FncVoid, pos)) if allow_void => Ok(("void".to_string(), *pos)),
        Some((tok, pos)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected {context}, found {tok:?}"),
                                              line:  pos.line,
                                              col:   pos.col, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0, col: 0 }),
    }
}

/// Peeks one token past the next one.
///
/// The `Clone` bound on the iterator makes the second lookahead cheap; this
/// is what lets statement dispatch distinguish `x >> ...` from a plain
/// expression without consuming anything.
pub(in crate::interpreter::parser) fn peek_second<'a, I>(tokens: &Peekable<I>) -> Option<&'a Token>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut ahead = tokens.clone();
    ahead.next();
    ahead.next().map(|(tok, _)| tok)
}
