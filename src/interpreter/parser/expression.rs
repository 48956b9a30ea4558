use std::iter::Peekable;

use crate::{
    ast::{BinaryOp, Expr, UnaryOp},
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            core::ParseResult,
            utils::{expect_token, parse_identifier, peek_pos},
        },
    },
};

/// Parses a full expression.
///
/// This is the entry point for expression parsing. Precedence from loosest to
/// tightest binding:
///
/// ```text
///     unary (- !) -> logical (&& ||) -> comparison -> additive -> multiplicative -> primary
/// ```
///
/// Every level is left-associative except the right-associative unary prefix.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Pos)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    parse_unary(tokens)
}

/// Parses a prefix unary expression (`-x`, `!x`), recursing for stacked
/// prefixes; anything else falls through to the logical level.
fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Minus, _)) => Some(UnaryOp::Neg),
        Some((Token::Not, _)) => Some(UnaryOp::Not),
        _ => None,
    };

    if let Some(op) = op {
        let pos = advance_pos(tokens);
        let right = parse_unary(tokens)?;
        return Ok(Expr::Unary { op,
                                right: Box::new(right),
                                line: pos.line,
                                col: pos.col, });
    }

    parse_logical(tokens)
}

/// Parses left-associative chains of `&&` and `||`.
fn parse_logical<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_comparison(tokens)?;

    loop {
        let op = match tokens.peek() {
            Some((Token::And, _)) => BinaryOp::And,
            Some((Token::Or, _)) => BinaryOp::Or,
            _ => break,
        };
        let pos = advance_pos(tokens);
        let right = parse_comparison(tokens)?;
        left = binary(left, op, right, pos);
    }

    Ok(left)
}

/// Parses left-associative chains of the comparison operators.
fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_additive(tokens)?;

    loop {
        let op = match tokens.peek() {
            Some((Token::Eq, _)) => BinaryOp::Eq,
            Some((Token::NotEq, _)) => BinaryOp::NotEq,
            Some((Token::Lt, _)) => BinaryOp::Lt,
            Some((Token::Lte, _)) => BinaryOp::Lte,
            Some((Token::Gt, _)) => BinaryOp::Gt,
            Some((Token::Gte, _)) => BinaryOp::Gte,
            _ => break,
        };
        let pos = advance_pos(tokens);
        let right = parse_additive(tokens)?;
        left = binary(left, op, right, pos);
    }

    Ok(left)
}

/// Parses left-associative chains of `+` and `-`.
fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_multiplicative(tokens)?;

    loop {
        let op = match tokens.peek() {
            Some((Token::Plus, _)) => BinaryOp::Add,
            Some((Token::Minus, _)) => BinaryOp::Sub,
            _ => break,
        };
        let pos = advance_pos(tokens);
        let right = parse_multiplicative(tokens)?;
        left = binary(left, op, right, pos);
    }

    Ok(left)
}

/// Parses left-associative chains of `*`, `/` and `%`.
fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_primary(tokens)?;

    loop {
        let op = match tokens.peek() {
            Some((Token::Asterisk, _)) => BinaryOp::Mul,
            Some((Token::Slash, _)) => BinaryOp::Div,
            Some((Token::Modulus, _)) => BinaryOp::Mod,
            _ => break,
        };
        let pos = advance_pos(tokens);
        let right = parse_primary(tokens)?;
        left = binary(left, op, right, pos);
    }

    Ok(left)
}

/// Consumes the (already peeked) operator token and returns its position.
fn advance_pos<'a, I>(tokens: &mut Peekable<I>) -> Pos
    where I: Iterator<Item = &'a (Token, Pos)>
{
    tokens.next().map_or(Pos { line: 1, col: 1 }, |(_, pos)| *pos)
}

fn binary(left: Expr, op: BinaryOp, right: Expr, pos: Pos) -> Expr {
    Expr::Binary { left: Box::new(left),
                   op,
                   right: Box::new(right),
                   line: pos.line,
                   col: pos.col, }
}

/// Parses a primary expression: a literal, a parenthesized expression, an
/// array literal, `nil`, or an identifier with its postfix chains.
///
/// # Errors
/// `UnexpectedToken` (or `IllegalToken` for lexer rejects) when the next
/// token cannot begin an expression.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    match tokens.next() {
        Some((Token::Str(value), pos)) => Ok(Expr::Str { value: value.clone(),
                                                         line:  pos.line,
                                                         col:   pos.col, }),
        Some((Token::Int(text), pos)) => match text.parse::<i64>() {
            Ok(value) => Ok(Expr::Int { value,
                                        line: pos.line,
                                        col: pos.col, }),
            Err(_) => Err(ParseError::InvalidIntLiteral { text: text.clone(),
                                                          line: pos.line,
                                                          col:  pos.col, }),
        },
        Some((Token::Bool(value), pos)) => Ok(Expr::Bool { value: *value,
                                                           line:  pos.line,
                                                           col:   pos.col, }),
        Some((Token::Nil, pos)) => Ok(Expr::Nil { line: pos.line,
                                                  col:  pos.col, }),
        Some((Token::LParen, _)) => {
            let expr = parse_expression(tokens)?;
            expect_token(tokens, &Token::RParen, "')' after expression")?;
            Ok(expr)
        },
        Some((Token::LBracket, pos)) => parse_array_literal(tokens, *pos),
        Some((Token::Ident(name), pos)) => parse_identifier_chain(tokens, name.clone(), *pos),
        Some((Token::Len, pos)) => parse_identifier_chain(tokens, "len".to_string(), *pos),
        Some((Token::Input, pos)) => parse_identifier_chain(tokens, "input".to_string(), *pos),
        Some((Token::Illegal(text), pos)) => Err(ParseError::IllegalToken { text: text.clone(),
                                                                            line: pos.line,
                                                                            col:  pos.col, }),
        Some((tok, pos)) => {
            Err(ParseError::UnexpectedToken { token: format!("Unexpected token {tok:?} in \
                                                              expression"),
                                              line:  pos.line,
                                              col:   pos.col, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0, col: 0 }),
    }
}

/// Parses an array literal after its opening `[`.
///
/// Grammar: `array := "[" (expression ("," expression)*)? ","? "]"`.
fn parse_array_literal<'a, I>(tokens: &mut Peekable<I>, pos: Pos) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut elements = Vec::new();

    loop {
        match tokens.peek() {
            Some((Token::RBracket, _)) => {
                tokens.next();
                break;
            },
            Some(_) => {
                elements.push(parse_expression(tokens)?);
                if let Some((Token::Comma, _)) = tokens.peek() {
                    tokens.next();
                }
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: pos.line, col: pos.col }),
        }
    }

    Ok(Expr::Array { elements,
                     line: pos.line,
                     col: pos.col, })
}

/// Parses everything that may follow an identifier.
///
/// An immediate `{` starts a struct literal stamped with the identifier as
/// its type name. Otherwise the postfix chain loops: `.name` folds into the
/// identifier text, `( args )` builds a call, `[ ... ]` builds an index or
/// slice. The operators chain in any order and repeat; dotted folding only
/// applies while the expression is still a bare identifier.
fn parse_identifier_chain<'a, I>(tokens: &mut Peekable<I>,
                                 name: String,
                                 pos: Pos)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    if let Some((Token::LBrace, _)) = tokens.peek() {
        return parse_struct_literal(tokens, name, pos);
    }

    let mut expr = Expr::Identifier { name,
                                      line: pos.line,
                                      col: pos.col, };

    loop {
        match tokens.peek() {
            Some((Token::Dot, _)) => {
                let folded = match &expr {
                    Expr::Identifier { name, .. } => name.clone(),
                    _ => break,
                };
                tokens.next();
                let (field, _) = parse_identifier(tokens, "identifier after '.'")?;
                expr = Expr::Identifier { name: format!("{folded}.{field}"),
                                          line: pos.line,
                                          col:  pos.col, };
            },
            Some((Token::LParen, _)) => {
                tokens.next();
                let args = parse_call_arguments(tokens)?;
                expr = Expr::Call { callee: Box::new(expr),
                                    args,
                                    line: pos.line,
                                    col: pos.col, };
            },
            Some((Token::LBracket, _)) => {
                tokens.next();
                expr = parse_index_or_slice(tokens, expr, pos)?;
            },
            _ => break,
        }
    }

    Ok(expr)
}

/// Parses call arguments after the opening `(`.
fn parse_call_arguments<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut args = Vec::new();

    if let Some((Token::RParen, _)) = tokens.peek() {
        tokens.next();
        return Ok(args);
    }

    args.push(parse_expression(tokens)?);
    while let Some((Token::Comma, _)) = tokens.peek() {
        tokens.next();
        args.push(parse_expression(tokens)?);
    }
    expect_token(tokens, &Token::RParen, "')' after call arguments")?;

    Ok(args)
}

/// Parses the remainder of `expr[` into an index or slice expression.
///
/// Recognized forms: `[i]`, `[a:b]`, `[:b]`, `[a:]`, `[:]`.
fn parse_index_or_slice<'a, I>(tokens: &mut Peekable<I>, left: Expr, pos: Pos) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut start = None;
    match tokens.peek() {
        Some((Token::Colon | Token::RBracket, _)) => {},
        _ => start = Some(parse_expression(tokens)?),
    }

    if let Some((Token::Colon, _)) = tokens.peek() {
        tokens.next();
        let mut end = None;
        match tokens.peek() {
            Some((Token::RBracket, _)) => {},
            _ => end = Some(parse_expression(tokens)?),
        }
        expect_token(tokens, &Token::RBracket, "']' after slice")?;
        return Ok(Expr::Slice { left:  Box::new(left),
                                start: start.map(Box::new),
                                end:   end.map(Box::new),
                                line:  pos.line,
                                col:   pos.col, });
    }

    expect_token(tokens, &Token::RBracket, "']' after index")?;
    let index = match start {
        Some(index) => index,
        None => {
            let at = peek_pos(tokens);
            return Err(ParseError::UnexpectedToken { token: "Expected index expression inside \
                                                             '[]'"
                                                                                       .to_string(),
                                                     line:  at.line,
                                                     col:   at.col, });
        },
    };

    Ok(Expr::Index { left: Box::new(left),
                     index: Box::new(index),
                     line: pos.line,
                     col: pos.col, })
}

/// Parses a struct literal after a type name, starting at its `{`.
///
/// Grammar: `struct_lit := TYPE "{" (IDENT ":" expression ",")* "}"` with an
/// optional trailing comma.
pub(in crate::interpreter::parser) fn parse_struct_literal<'a, I>(tokens: &mut Peekable<I>,
                                                                  name: String,
                                                                  pos: Pos)
                                                                  -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    expect_token(tokens, &Token::LBrace, "'{' to begin struct literal")?;

    let mut fields = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some(_) => {
                let (field, _) = parse_identifier(tokens, "field name in struct literal")?;
                expect_token(tokens, &Token::Colon, "':' after field name in struct literal")?;
                let value = parse_expression(tokens)?;
                fields.push((field, value));
                if let Some((Token::Comma, _)) = tokens.peek() {
                    tokens.next();
                }
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: pos.line, col: pos.col }),
        }
    }

    Ok(Expr::StructLit { name,
                         fields,
                         line: pos.line,
                         col: pos.col, })
}
