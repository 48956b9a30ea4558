use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Expr, FunctionDecl, LetDecl, Statement, StructDecl, StructField, Visibility},
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            core::ParseResult,
            expression::{parse_expression, parse_struct_literal},
            utils::{expect_token, parse_identifier, parse_type_name, peek_pos, peek_second},
        },
    },
};

/// Parses a single statement inside a block body.
///
/// Dispatch mirrors the top-level dispatch minus `pub`, `package`, `import`
/// and `struct`, which are only legal at the top level. Anything that does
/// not start with a statement keyword is parsed as an expression; if the
/// assignment operator follows, the expression is upgraded to an assignment
/// target.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    match tokens.peek() {
        Some((Token::Let, _)) => parse_let(tokens, Visibility::Private),
        Some((Token::Fnc, _)) => parse_function(tokens, Visibility::Private),
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
        _ => {
            let pos = peek_pos(tokens);
            let expr = parse_expression(tokens)?;
            if let Some((Token::AssignOp, _)) = tokens.peek() {
                return parse_assignment_from(tokens, expr, pos);
            }
            Ok(Statement::Expression { expr,
                                       line: pos.line,
                                       col: pos.col, })
        },
    }
}


/// Parses a block: `{` statements `}`.
///
/// # Errors
/// Propagates the first statement error; resynchronization happens at the
/// top level, so a malformed statement abandons its whole enclosing block.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let open = expect_token(tokens, &Token::LBrace, "'{'")?;

    let mut statements = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((Token::Eof, _)) | None => {
                return Err(ParseError::UnexpectedEndOfInput { line: open.line,
                                                              col:  open.col, });
            },
            Some(_) => statements.push(parse_statement(tokens)?),
        }
    }

    Ok(statements)
}

/// Parses a `let` statement.
///
/// Two recognized forms:
///
/// ```text
///     let NAME TYPE >> EXPR
///     let NAME :>> map[KEY] >> VALUE { key: val, ... }
/// ```
///
/// When the right-hand side of the plain form starts with `{`, it is parsed
/// as a struct literal stamped with the declared type.
pub fn parse_let<'a, I>(tokens: &mut Peekable<I>, visibility: Visibility) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::Let, "'let'")?;
    let (name, _) = parse_identifier(tokens, "identifier after 'let'")?;

    // The `:>>` introducer marks the map-typed form.
    if matches!(tokens.peek(), Some((Token::Colon, _)))
       && peek_second(tokens) == Some(&Token::AssignOp)
    {
        tokens.next();
        tokens.next();
        return parse_map_let(tokens, name, visibility, pos);
    }

    let (ty, _) = parse_type_name(tokens, false, "type after variable name")?;
    expect_token(tokens, &Token::AssignOp, "'>>' after type")?;

    let value = match tokens.peek() {
        Some((Token::LBrace, _)) => parse_struct_literal(tokens, ty.clone(), pos)?,
        _ => parse_expression(tokens)?,
    };

    Ok(Statement::Let(LetDecl { name,
                                ty,
                                value,
                                visibility,
                                line: pos.line,
                                col: pos.col }))
}

/// Parses the tail of the map-typed `let` form, after `:>>` was consumed:
/// `map[KEY] >> VALUE { pairs }`. The declared type string is composed as
/// `map[K]V`.
fn parse_map_let<'a, I>(tokens: &mut Peekable<I>,
                        name: String,
                        visibility: Visibility,
                        pos: Pos)
                        -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    match tokens.next() {
        Some((Token::Type(kw), _)) if kw == "map" => {},
        Some((tok, at)) => {
            return Err(ParseError::UnexpectedToken { token: format!("Expected 'map' after \
                                                                     ':>>', found {tok:?}"),
                                                     line:  at.line,
                                                     col:   at.col, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: pos.line, col: pos.col }),
    }

    expect_token(tokens, &Token::LBracket, "'[' after 'map'")?;
    let (key_type, _) = parse_type_name(tokens, false, "map key type")?;
    expect_token(tokens, &Token::RBracket, "']' after map key type")?;
    expect_token(tokens, &Token::AssignOp, "'>>' after map key type")?;
    let (value_type, _) = parse_type_name(tokens, false, "map value type")?;

    let ty = format!("map[{key_type}]{value_type}");
    let value = parse_map_literal(tokens, key_type, value_type, pos)?;

    Ok(Statement::Let(LetDecl { name,
                                ty,
                                value,
                                visibility,
                                line: pos.line,
                                col: pos.col }))
}

/// Parses a map literal: `{ key: value, ... }` with an optional trailing
/// comma. Pairs are kept in source order.
fn parse_map_literal<'a, I>(tokens: &mut Peekable<I>,
                            key_type: String,
                            value_type: String,
                            pos: Pos)
                            -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    expect_token(tokens, &Token::LBrace, "'{' for map literal")?;

    let mut pairs = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some(_) => {
                let key = parse_expression(tokens)?;
                expect_token(tokens, &Token::Colon, "':' after map key")?;
                let value = parse_expression(tokens)?;
                pairs.push((key, value));
                if let Some((Token::Comma, _)) = tokens.peek() {
                    tokens.next();
                }
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: pos.line, col: pos.col }),
        }
    }

    Ok(Expr::Map { key_type,
                   value_type,
                   pairs,
                   line: pos.line,
                   col: pos.col })
}

/// Parses a function declaration.
///
/// ```text
///     fnc NAME ( [name type, ...] ) >> RETURN_TYPE { BODY }
///     fnc TYPE.NAME ( ... ) >> ... { ... }
/// ```
///
/// The method form stores the type half as the receiver and uses the
/// combined `TYPE.NAME` as the function's lookup name.
pub fn parse_function<'a, I>(tokens: &mut Peekable<I>,
                             visibility: Visibility)
                             -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::Fnc, "'fnc'")?;
    let (mut name, _) = parse_identifier(tokens, "function name")?;

    let mut receiver = None;
    if let Some((Token::Dot, _)) = tokens.peek() {
        tokens.next();
        let (method, _) = parse_identifier(tokens, "method name after '.'")?;
        receiver = Some(name.clone());
        name = format!("{name}.{method}");
    }

    expect_token(tokens, &Token::LParen, "'(' after function name")?;

    let mut params = Vec::new();
    let mut param_types = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RParen, _)) => {
                tokens.next();
                break;
            },
            Some((Token::Ident(_), _)) => {
                let (param, _) = parse_identifier(tokens, "parameter name")?;
                let (ty, _) = parse_type_name(tokens, false, "type after parameter")?;
                params.push(param);
                param_types.push(ty);
                if let Some((Token::Comma, _)) = tokens.peek() {
                    tokens.next();
                }
            },
            Some((tok, at)) => {
                return Err(ParseError::UnexpectedToken { token: format!("Expected parameter \
                                                                         identifier, found \
                                                                         {tok:?}"),
                                                         line:  at.line,
                                                         col:   at.col, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: pos.line, col: pos.col }),
        }
    }

    expect_token(tokens, &Token::AssignOp, "'>>' after ')'")?;
    let (return_type, _) = parse_type_name(tokens, true, "return type after '>>'")?;
    let body = parse_block(tokens)?;

    Ok(Statement::Function(Rc::new(FunctionDecl { name,
                                                  params,
                                                  param_types,
                                                  return_type,
                                                  body,
                                                  visibility,
                                                  receiver,
                                                  line: pos.line,
                                                  col: pos.col })))
}

/// Parses a struct declaration:
/// `struct NAME >>? { field_name field_type, ... }`. The `>>` after the name
/// is tolerated but not required.
pub fn parse_struct_decl<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::Struct, "'struct'")?;
    let (name, _) = parse_identifier(tokens, "struct name")?;

    if let Some((Token::AssignOp, _)) = tokens.peek() {
        tokens.next();
    }

    expect_token(tokens, &Token::LBrace, "'{' after struct name")?;

    let mut fields = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some(_) => {
                let (field, _) = parse_identifier(tokens, "field name")?;
                let (ty, _) = parse_type_name(tokens, false, "type after field name")?;
                fields.push(StructField { name: field,
                                          ty });
                if let Some((Token::Comma, _)) = tokens.peek() {
                    tokens.next();
                }
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: pos.line, col: pos.col }),
        }
    }

    Ok(Statement::Struct(StructDecl { name,
                                      fields,
                                      line: pos.line,
                                      col: pos.col }))
}

/// Parses a `log(expr)` statement.
pub fn parse_log<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::Log, "'log'")?;
    expect_token(tokens, &Token::LParen, "'(' after 'log'")?;
    let value = parse_expression(tokens)?;
    expect_token(tokens, &Token::RParen, "')' after log argument")?;

    Ok(Statement::Log { value,
                        line: pos.line,
                        col: pos.col })
}

/// Parses a `return` statement. The value is optional: `return` directly
/// before a closing brace is a bare return.
pub fn parse_return<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::Return, "'return'")?;

    let value = match tokens.peek() {
        Some((Token::RBrace | Token::Eof, _)) | None => None,
        Some(_) => Some(parse_expression(tokens)?),
    };

    Ok(Statement::Return { value,
                           line: pos.line,
                           col: pos.col })
}

/// Parses an `if` statement with zero or more `elif` branches and an
/// optional `else`.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::If, "'if'")?;
    let cond = parse_expression(tokens)?;
    let body = parse_block(tokens)?;

    let mut elif_conds = Vec::new();
    let mut elif_bodies = Vec::new();
    while let Some((Token::Elif, _)) = tokens.peek() {
        tokens.next();
        elif_conds.push(parse_expression(tokens)?);
        elif_bodies.push(parse_block(tokens)?);
    }

    let mut else_body = None;
    if let Some((Token::Else, _)) = tokens.peek() {
        tokens.next();
        else_body = Some(parse_block(tokens)?);
    }

    Ok(Statement::If { cond,
                       body,
                       elif_conds,
                       elif_bodies,
                       else_body,
                       line: pos.line,
                       col: pos.col })
}

/// Parses a `while` statement.
pub fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::While, "'while'")?;
    let cond = parse_expression(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Statement::While { cond,
                          body,
                          line: pos.line,
                          col: pos.col })
}

/// Parses a three-part `for` statement:
/// `for INIT ; COND ; POST { BODY }` where `INIT` is a `let` or an
/// assignment and `POST` is an assignment.
pub fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::For, "'for'")?;

    let init = if matches!(tokens.peek(), Some((Token::Let, _))) {
        parse_let(tokens, Visibility::Private)?
    } else if assignment_ahead(tokens) {
        parse_assignment(tokens)?
    } else {
        let at = peek_pos(tokens);
        return Err(ParseError::UnexpectedToken { token: "Expected init statement in for loop"
                                                     .to_string(),
                                                 line:  at.line,
                                                 col:   at.col, });
    };
    expect_token(tokens, &Token::Semicolon, "';' after for-init")?;

    let cond = parse_expression(tokens)?;
    expect_token(tokens, &Token::Semicolon, "';' after for-condition")?;

    let post = if assignment_ahead(tokens) {
        parse_assignment(tokens)?
    } else {
        let at = peek_pos(tokens);
        return Err(ParseError::UnexpectedToken { token: "Expected post statement in for loop"
                                                     .to_string(),
                                                 line:  at.line,
                                                 col:   at.col, });
    };

    let body = parse_block(tokens)?;

    Ok(Statement::For { init: Box::new(init),
                        cond,
                        post: Box::new(post),
                        body,
                        line: pos.line,
                        col: pos.col })
}

/// Tests whether the stream is positioned at `IDENT >>`, the shape of a
/// simple assignment.
fn assignment_ahead<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    matches!(tokens.peek(), Some((Token::Ident(_), _)))
    && peek_second(tokens) == Some(&Token::AssignOp)
}

/// Parses an assignment statement from scratch: an identifier target,
/// optionally followed by index expressions, then `>>` and the value.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let (name, pos) = parse_identifier(tokens, "assignment target")?;
    let mut target = Expr::Identifier { name,
                                        line: pos.line,
                                        col:  pos.col, };

    while let Some((Token::LBracket, _)) = tokens.peek() {
        tokens.next();
        let index = parse_expression(tokens)?;
        expect_token(tokens, &Token::RBracket, "']' after index")?;
        target = Expr::Index { left: Box::new(target),
                               index: Box::new(index),
                               line: pos.line,
                               col: pos.col, };
    }

    parse_assignment_from(tokens, target, pos)
}

/// Upgrades an already-parsed target expression into an assignment once the
/// `>>` operator has been sighted.
pub fn parse_assignment_from<'a, I>(tokens: &mut Peekable<I>,
                                    target: Expr,
                                    pos: Pos)
                                    -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    expect_token(tokens, &Token::AssignOp, "'>>' after assignment target")?;
    let value = parse_expression(tokens)?;

    Ok(Statement::Assignment { target,
                               value,
                               line: pos.line,
                               col: pos.col })
}

/// Parses a `package a.b` declaration with a dot-separated name.
pub fn parse_package<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::Package, "'package'")?;
    let name = parse_dotted_path(tokens, "package name after 'package'")?;

    Ok(Statement::Package { name,
                            line: pos.line })
}

/// Parses an `import a.b.c` declaration with a dot-separated path.
pub fn parse_import<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let pos = expect_token(tokens, &Token::Import, "'import'")?;
    let path = parse_dotted_path(tokens, "import path after 'import'")?;

    Ok(Statement::Import { path,
                           line: pos.line })
}

/// Parses a dot-separated identifier path (`a`, `a.b`, `a.b.c`).
fn parse_dotted_path<'a, I>(tokens: &mut Peekable<I>, context: &str) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let (first, _) = parse_identifier(tokens, context)?;
    let mut parts = vec![first];

    while let Some((Token::Dot, _)) = tokens.peek() {
        tokens.next();
        let (part, _) = parse_identifier(tokens, "identifier after '.'")?;
        parts.push(part);
    }

    Ok(parts.join("."))
}
