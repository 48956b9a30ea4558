use logos::Logos;

/// Represents a lexical token in Tox source text.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
///
/// Keywords are matched case-insensitively. An identifier immediately
/// followed by `[]` swallows the brackets, so array type names like `int[]`
/// arrive as a single token.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// `let`
    #[token("let", ignore(ascii_case))]
    Let,
    /// `fnc`
    #[token("fnc", ignore(ascii_case))]
    Fnc,
    /// `pub`
    #[token("pub", ignore(ascii_case))]
    Pub,
    /// `log`
    #[token("log", ignore(ascii_case))]
    Log,
    /// `if`
    #[token("if", ignore(ascii_case))]
    If,
    /// `elif`
    #[token("elif", ignore(ascii_case))]
    Elif,
    /// `else`
    #[token("else", ignore(ascii_case))]
    Else,
    /// `while`
    #[token("while", ignore(ascii_case))]
    While,
    /// `for`
    #[token("for", ignore(ascii_case))]
    For,
    /// `return`
    #[token("return", ignore(ascii_case))]
    Return,
    /// `break`
    #[token("break", ignore(ascii_case))]
    Break,
    /// `continue`
    #[token("continue", ignore(ascii_case))]
    Continue,
    /// `struct`
    #[token("struct", ignore(ascii_case))]
    Struct,
    /// `package`
    #[token("package", ignore(ascii_case))]
    Package,
    /// `import`
    #[token("import", ignore(ascii_case))]
    Import,
    /// `nil`
    #[token("nil", ignore(ascii_case))]
    Nil,
    /// `len`
    #[token("len", ignore(ascii_case))]
    Len,
    /// `input`
    #[token("input", ignore(ascii_case))]
    Input,
    /// `void` as a function return type.
    #[token("void", ignore(ascii_case))]
    FncVoid,
    /// Built-in type names (`string`, `int`, `bool`, `map`) and their array
    /// forms, normalized to lower case.
    #[regex(r"(?i)(string|int|bool|map)(\[\])?", |lex| lex.slice().to_ascii_lowercase(), priority = 10)]
    Type(String),
    /// Boolean literal tokens, `true` or `false`.
    #[regex(r"(?i)(true|false)", |lex| lex.slice().eq_ignore_ascii_case("true"), priority = 10)]
    Bool(bool),
    /// Identifier tokens; variable, function or user type names such as `x`,
    /// `greet` or `User`. A directly attached `[]` is folded in.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(\[\])?", |lex| lex.slice().to_string())]
    Ident(String),
    /// Integer literal tokens, such as `42`. The text is kept; the parser
    /// performs the conversion so it can report overflow with a position.
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Int(String),
    /// String literal tokens; the quotes are stripped and no escape
    /// processing happens at this layer.
    #[regex(r#""[^"]*""#, lex_string)]
    Str(String),
    /// `>>`, the assignment operator.
    #[token(">>")]
    AssignOp,
    /// `==`
    #[token("==")]
    Eq,
    /// `!=`
    #[token("!=")]
    NotEq,
    /// `<=`
    #[token("<=")]
    Lte,
    /// `>=`
    #[token(">=")]
    Gte,
    /// `<`
    #[token("<")]
    Lt,
    /// `>`
    #[token(">")]
    Gt,
    /// `&&`
    #[token("&&")]
    And,
    /// `||`
    #[token("||")]
    Or,
    /// `!`
    #[token("!")]
    Not,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Asterisk,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Modulus,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// Spaces, tabs and carriage returns.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
    /// Newlines advance the line counter and reset the column origin.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,
    /// Any character no other pattern claims.
    #[regex(r".", |lex| lex.slice().to_string(), priority = 0)]
    Illegal(String),
    /// End of input; also emitted for an embedded NUL character.
    #[token("\0")]
    Eof,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset of the current line's
/// first character, so each token's 1-indexed column can be derived from its
/// span.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset at which the current line starts.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// A `line:col` source position attached to every token.
///
/// Both components are 1-indexed; the column resets at every newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    /// 1-indexed source line.
    pub line: usize,
    /// 1-indexed source column.
    pub col:  usize,
}

/// Extracts a string literal's contents from the current token slice.
///
/// The surrounding quotes are dropped. Literals may span lines; embedded
/// newlines update the lexer's line bookkeeping.
fn lex_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    if let Some(last) = inner.rfind('\n') {
        lex.extras.line += inner.chars().filter(|&c| c == '\n').count();
        lex.extras.line_start = lex.span().start + 1 + last + 1;
    }

    inner.to_string()
}

/// Tokenizes an entire source string.
///
/// Lexing is total: characters no pattern claims come out as
/// [`Token::Illegal`] and are reported by the parser, so this function never
/// fails. The returned stream always ends with a single [`Token::Eof`].
///
/// # Parameters
/// - `source`: The raw source text.
///
/// # Returns
/// The token stream as `(Token, Pos)` pairs.
///
/// # Example
/// ```
/// use tox::interpreter::lexer::{Token, lex};
///
/// let tokens = lex("let x int >> 3");
/// let kinds: Vec<&Token> = tokens.iter().map(|(t, _)| t).collect();
///
/// assert_eq!(kinds,
///            vec![&Token::Let,
///                 &Token::Ident("x".to_string()),
///                 &Token::Type("int".to_string()),
///                 &Token::AssignOp,
///                 &Token::Int("3".to_string()),
///                 &Token::Eof]);
/// ```
#[must_use]
pub fn lex(source: &str) -> Vec<(Token, Pos)> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(item) = lexer.next() {
        let span = lexer.span();
        let pos = Pos { line: lexer.extras.line,
                        col:  span.start.saturating_sub(lexer.extras.line_start) + 1, };
        match item {
            Ok(Token::Eof) => {
                tokens.push((Token::Eof, pos));
                return tokens;
            },
            Ok(tok) => tokens.push((tok, pos)),
            Err(()) => tokens.push((Token::Illegal(lexer.slice().to_string()), pos)),
        }
    }

    let end = Pos { line: lexer.extras.line,
                    col:  source.len().saturating_sub(lexer.extras.line_start) + 1, };
    tokens.push((Token::Eof, end));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        lex(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(kinds("LET Fnc WHILE"), vec![Token::Let, Token::Fnc, Token::While, Token::Eof]);
    }

    #[test]
    fn array_type_names_are_single_tokens() {
        assert_eq!(kinds("int[]"), vec![Token::Type("int[]".to_string()), Token::Eof]);
        assert_eq!(kinds("bytes[]"), vec![Token::Ident("bytes[]".to_string()), Token::Eof]);
    }

    #[test]
    fn two_character_operators_win_over_single() {
        assert_eq!(kinds(">> >= > =="),
                   vec![Token::AssignOp, Token::Gte, Token::Gt, Token::Eq, Token::Eof]);
    }

    #[test]
    fn lone_ampersand_is_illegal() {
        assert_eq!(kinds("&& &"),
                   vec![Token::And, Token::Illegal("&".to_string()), Token::Eof]);
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        assert_eq!(kinds("1 // two three\n2"),
                   vec![Token::Int("1".to_string()), Token::Int("2".to_string()), Token::Eof]);
    }

    #[test]
    fn line_and_column_are_tracked() {
        let tokens = lex("let x\nlet y");
        assert_eq!(tokens[0].1, Pos { line: 1, col: 1 });
        assert_eq!(tokens[1].1, Pos { line: 1, col: 5 });
        assert_eq!(tokens[2].1, Pos { line: 2, col: 1 });
        assert_eq!(tokens[3].1, Pos { line: 2, col: 5 });
    }

    #[test]
    fn string_literals_keep_their_insides() {
        assert_eq!(kinds(r#""hello, <%name%>""#),
                   vec![Token::Str("hello, <%name%>".to_string()), Token::Eof]);
    }

    #[test]
    fn every_input_terminates_with_eof() {
        for source in ["", "@#$^", "\"unterminated", "let let let"] {
            let tokens = lex(source);
            assert_eq!(tokens.last().map(|(t, _)| t), Some(&Token::Eof));
        }
    }
}
