use std::iter::Peekable;

use crate::{
    ast::{Statement, Visibility},
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            expression::parse_expression,
            statement::{
                parse_assignment, parse_assignment_from, parse_for, parse_function, parse_if,
                parse_import, parse_let, parse_log, parse_package, parse_return,
                parse_struct_decl, parse_while,
            },
            utils::peek_second,
        },
    },
};

/// Result type used by all parse functions.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a whole token stream into a statement list.
///
/// Parsing does not abort on the first failure: each error is recorded with
/// its `line:col` and the parser resynchronizes at the next statement
/// boundary, so a single malformed statement costs only itself.
///
/// # Parameters
/// - `tokens`: The `(Token, Pos)` stream produced by [`crate::interpreter::lexer::lex`].
///
/// # Returns
/// The successfully parsed statements together with every accumulated error.
#[must_use]
pub fn parse_program(tokens: &[(Token, Pos)]) -> (Vec<Statement>, Vec<ParseError>) {
    let mut iter = tokens.iter().peekable();
    let mut statements = Vec::new();
    let mut errors = Vec::new();

    loop {
        match iter.peek() {
            None | Some((Token::Eof, _)) => break,
            Some(_) => {},
        }
        match parse_top_level(&mut iter) {
            Ok(stmt) => statements.push(stmt),
            Err(e) => {
                errors.push(e);
                synchronize(&mut iter);
            },
        }
    }

    (statements, errors)
}

/// Parses one top-level statement.
///
/// Dispatches on the current token: `pub` stamps visibility onto the
/// following `fnc` or `let`; an identifier whose next token is `>>` or `[`
/// begins an assignment; otherwise an expression statement is tried.
fn parse_top_level<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let assignment_ahead = matches!(tokens.peek(), Some((Token::Ident(_), _)))
                           && matches!(peek_second(tokens),
                                       Some(Token::AssignOp | Token::LBracket));

    match tokens.peek() {
        Some((Token::Pub, pos)) => {
            let pos = *pos;
            tokens.next();
            match tokens.peek() {
                Some((Token::Fnc, _)) => parse_function(tokens, Visibility::Public),
                Some((Token::Let, _)) => parse_let(tokens, Visibility::Public),
                Some((tok, at)) => {
                    Err(ParseError::UnexpectedToken { token: format!("Unexpected token {tok:?} \
                                                                      after 'pub'"),
                                                      line:  at.line,
                                                      col:   at.col, })
                },
                None => Err(ParseError::UnexpectedEndOfInput { line: pos.line, col: pos.col }),
            }
        },
        Some((Token::Let, _)) => parse_let(tokens, Visibility::Private),
        Some((Token::Fnc, _)) => parse_function(tokens, Visibility::Private),
        Some((Token::Struct, _)) => parse_struct_decl(tokens),
        Some((Token::Package, _)) => parse_package(tokens),
        Some((Token::Import, _)) => parse_import(tokens),
        Some((Token::Log, _)) => parse_log(tokens),
        Some((Token::Return, _)) => parse_return(tokens),
        Some((Token::If, _)) => parse_if(tokens),
        Some((Token::While, _)) => parse_while(tokens),
        Some((Token::For, _)) => parse_for(tokens),
        Some((Token::Break, pos)) => {
            let pos = *pos;
            tokens.next();
            Ok(Statement::Break { line: pos.line,
                                  col:  pos.col, })
        },
        Some((Token::Continue, pos)) => {
            let pos = *pos;
            tokens.next();
            Ok(Statement::Continue { line: pos.line,
                                     col:  pos.col, })
        },
        Some((Token::Ident(_), _)) if assignment_ahead => parse_assignment(tokens),
        Some((Token::Ident(_)
              | Token::Len
              | Token::Input
              | Token::Int(_)
              | Token::Str(_)
              | Token::Bool(_)
              | Token::Nil
              | Token::LParen
              | Token::LBracket
              | Token::Minus
              | Token::Not,
              pos)) =>
        {
            let pos = *pos;
            let expr = parse_expression(tokens)?;
            if let Some((Token::AssignOp, _)) = tokens.peek() {
                return parse_assignment_from(tokens, expr, pos);
            }
            Ok(Statement::Expression { expr,
                                       line: pos.line,
                                       col: pos.col, })
        },
        Some((Token::Illegal(text), pos)) => Err(ParseError::IllegalToken { text: text.clone(),
                                                                            line: pos.line,
                                                                            col:  pos.col, }),
        Some((tok, pos)) => {
            Err(ParseError::UnexpectedToken { token: format!("Unexpected token {tok:?}"),
                                              line:  pos.line,
                                              col:   pos.col, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0, col: 0 }),
    }
}

/// Skips ahead to the next plausible statement boundary after an error.
///
/// The offending token is consumed unconditionally, then tokens are dropped
/// until a statement-starting keyword, a closing brace or the end of input
/// comes up. Progress of at least one token is guaranteed, so the driving
/// loop always terminates.
fn synchronize<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, Pos)>
{
    tokens.next();

    while let Some((tok, _)) = tokens.peek() {
        match tok {
            Token::Let
            | Token::Fnc
            | Token::Pub
            | Token::Struct
            | Token::Package
            | Token::Import
            | Token::Log
            | Token::Return
            | Token::If
            | Token::While
            | Token::For
            | Token::Break
            | Token::Continue
            | Token::RBrace
            | Token::Eof => break,
            _ => {
                tokens.next();
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::lex;

    fn parse(source: &str) -> (Vec<Statement>, Vec<ParseError>) {
        parse_program(&lex(source))
    }

    #[test]
    fn parses_every_good_statement() {
        let (stmts, errors) = parse("let x int >> 1\nlet y int >> 2");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn recovers_after_a_bad_statement() {
        let (stmts, errors) = parse("let >> oops\nlet y int >> 2");
        assert_eq!(errors.len(), 1);
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn every_error_carries_a_position() {
        let (_, errors) = parse("let x in t >> 3\n@\nfnc ( ) >> void {}");
        assert!(!errors.is_empty());
        for e in &errors {
            let (line, col) = e.position();
            assert!(line >= 1, "missing line in {e}");
            assert!(col >= 1, "missing col in {e}");
        }
    }

    #[test]
    fn illegal_characters_are_reported_not_fatal() {
        let (stmts, errors) = parse("@\nlet x int >> 1");
        assert_eq!(errors.len(), 1);
        assert_eq!(stmts.len(), 1);
    }
}
