use std::rc::Rc;

/// Visibility of a top-level declaration.
///
/// `pub` declarations are exported by the loader under a `module.name` alias;
/// everything else stays private to its package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Default visibility; reachable only inside the declaring package.
    Private,
    /// Exported; the loader re-emits the declaration as `module.name`.
    Public,
}

impl Visibility {
    /// Returns `true` for `pub` declarations.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// A single field of a struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    /// Field name.
    pub name: String,
    /// Declared field type.
    pub ty:   String,
}

/// A struct declaration (`struct User { name string, age int }`).
///
/// Structs are descriptive only: they produce no runtime effect and exist for
/// the type checker and for struct-literal validation.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    /// Struct type name.
    pub name:   String,
    /// Ordered field declarations.
    pub fields: Vec<StructField>,
    /// Line number in the source code.
    pub line:   usize,
    /// Column number in the source code.
    pub col:    usize,
}

/// A `let` declaration binding a typed name to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct LetDecl {
    /// Variable name.
    pub name:       String,
    /// Declared type string (`int`, `string[]`, `map[string]int`, ...).
    pub ty:         String,
    /// Initializer expression.
    pub value:      Expr,
    /// `pub` or private.
    pub visibility: Visibility,
    /// Line number in the source code.
    pub line:       usize,
    /// Column number in the source code.
    pub col:        usize,
}

/// A function declaration.
///
/// Methods use the `Type.method` lookup name with `receiver` holding the type
/// half. Declarations are shared between the AST and function values through
/// `Rc`, so loader aliasing clones the node rather than the body tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Lookup name; `Type.method` for methods.
    pub name:        String,
    /// Parameter names, positionally matched with `param_types`.
    pub params:      Vec<String>,
    /// Declared parameter types.
    pub param_types: Vec<String>,
    /// Declared return type (`void` allowed).
    pub return_type: String,
    /// Statements making up the function body.
    pub body:        Vec<Statement>,
    /// `pub` or private.
    pub visibility:  Visibility,
    /// Receiver type for methods (`User` in `fnc User.greet`).
    pub receiver:    Option<String>,
    /// Line number in the source code.
    pub line:        usize,
    /// Column number in the source code.
    pub col:         usize,
}

/// A statement node in the AST.
///
/// Statements are the units produced by the parser for each top-level
/// construct and for every entry of a block body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A `package a.b` declaration.
    Package {
        /// Dotted package name.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// An `import a.b.c` declaration.
    Import {
        /// Dotted import path.
        path: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A struct declaration.
    Struct(StructDecl),
    /// A `let` declaration.
    Let(LetDecl),
    /// A function declaration.
    Function(Rc<FunctionDecl>),
    /// A `log(expr)` statement.
    Log {
        /// The expression whose value is printed.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
        /// Column number in the source code.
        col:   usize,
    },
    /// A `return` statement; `value` is absent for bare returns.
    Return {
        /// The returned expression, if any.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
        /// Column number in the source code.
        col:   usize,
    },
    /// An `if`/`elif`/`else` chain.
    If {
        /// Condition of the leading `if`.
        cond:        Expr,
        /// Body of the leading `if`.
        body:        Vec<Statement>,
        /// Conditions of each `elif`, in order.
        elif_conds:  Vec<Expr>,
        /// Bodies of each `elif`, parallel to `elif_conds`.
        elif_bodies: Vec<Vec<Statement>>,
        /// Body of the `else` branch, if present.
        else_body:   Option<Vec<Statement>>,
        /// Line number in the source code.
        line:        usize,
        /// Column number in the source code.
        col:         usize,
    },
    /// A `while` loop.
    While {
        /// Loop condition.
        cond: Expr,
        /// Loop body.
        body: Vec<Statement>,
        /// Line number in the source code.
        line: usize,
        /// Column number in the source code.
        col:  usize,
    },
    /// A three-part `for` loop (`for INIT ; COND ; POST { ... }`).
    For {
        /// Init statement (a `let` or an assignment).
        init: Box<Statement>,
        /// Loop condition.
        cond: Expr,
        /// Post statement (an assignment), run after each iteration.
        post: Box<Statement>,
        /// Loop body.
        body: Vec<Statement>,
        /// Line number in the source code.
        line: usize,
        /// Column number in the source code.
        col:  usize,
    },
    /// An assignment to an identifier, field or indexed element.
    Assignment {
        /// Full target expression (identifier or index chain).
        target: Expr,
        /// The assigned expression.
        value:  Expr,
        /// Line number in the source code.
        line:   usize,
        /// Column number in the source code.
        col:    usize,
    },
    /// An expression evaluated for its side effects.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
        /// Column number in the source code.
        col:  usize,
    },
    /// A `break` statement.
    Break {
        /// Line number in the source code.
        line: usize,
        /// Column number in the source code.
        col:  usize,
    },
    /// A `continue` statement.
    Continue {
        /// Line number in the source code.
        line: usize,
        /// Column number in the source code.
        col:  usize,
    },
}

/// An expression node in the AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An integer literal.
    Int {
        /// The literal value.
        value: i64,
        /// Line number in the source code.
        line:  usize,
        /// Column number in the source code.
        col:   usize,
    },
    /// A string literal (uninterpolated; interpolation happens at eval time).
    Str {
        /// The literal text between the quotes.
        value: String,
        /// Line number in the source code.
        line:  usize,
        /// Column number in the source code.
        col:   usize,
    },
    /// A boolean literal.
    Bool {
        /// The literal value.
        value: bool,
        /// Line number in the source code.
        line:  usize,
        /// Column number in the source code.
        col:   usize,
    },
    /// The `nil` literal.
    Nil {
        /// Line number in the source code.
        line: usize,
        /// Column number in the source code.
        col:  usize,
    },
    /// A (possibly dotted) identifier such as `x` or `user.name`.
    Identifier {
        /// The folded dotted name.
        name: String,
        /// Line number in the source code.
        line: usize,
        /// Column number in the source code.
        col:  usize,
    },
    /// An array literal.
    Array {
        /// Element expressions.
        elements: Vec<Expr>,
        /// Line number in the source code.
        line:     usize,
        /// Column number in the source code.
        col:      usize,
    },
    /// A map literal with its declared key and value types.
    Map {
        /// Declared key type.
        key_type:   String,
        /// Declared value type.
        value_type: String,
        /// Key/value pairs in source order.
        pairs:      Vec<(Expr, Expr)>,
        /// Line number in the source code.
        line:       usize,
        /// Column number in the source code.
        col:        usize,
    },
    /// A struct literal (`User { name: "andy", age: 22 }`).
    StructLit {
        /// The struct type name stamped by the parser.
        name:   String,
        /// Field initializers in source order.
        fields: Vec<(String, Expr)>,
        /// Line number in the source code.
        line:   usize,
        /// Column number in the source code.
        col:    usize,
    },
    /// An index expression (`xs[0]`, `m["key"]`).
    Index {
        /// The collection being indexed.
        left:  Box<Expr>,
        /// The index expression.
        index: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
        /// Column number in the source code.
        col:   usize,
    },
    /// A slice expression (`xs[1:4]`, `xs[:4]`, `xs[1:]`, `xs[:]`).
    Slice {
        /// The collection being sliced.
        left:  Box<Expr>,
        /// Start bound, defaulting to `0`.
        start: Option<Box<Expr>>,
        /// End bound, defaulting to the length.
        end:   Option<Box<Expr>>,
        /// Line number in the source code.
        line:  usize,
        /// Column number in the source code.
        col:   usize,
    },
    /// A call expression.
    Call {
        /// The callee expression (an identifier in practice).
        callee: Box<Expr>,
        /// Argument expressions.
        args:   Vec<Expr>,
        /// Line number in the source code.
        line:   usize,
        /// Column number in the source code.
        col:    usize,
    },
    /// A prefix unary operation (`-x`, `!x`).
    Unary {
        /// The unary operator.
        op:    UnaryOp,
        /// The operand expression.
        right: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
        /// Column number in the source code.
        col:   usize,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left:  Box<Expr>,
        /// The operator.
        op:    BinaryOp,
        /// Right operand.
        right: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
        /// Column number in the source code.
        col:   usize,
    },
}

impl Expr {
    /// Gets the source position from `self`.
    ///
    /// ## Example
    /// ```
    /// use tox::ast::Expr;
    ///
    /// let expr = Expr::Identifier { name: "x".to_string(),
    ///                               line: 5,
    ///                               col:  3, };
    ///
    /// assert_eq!(expr.position(), (5, 3));
    /// ```
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::Int { line, col, .. }
            | Self::Str { line, col, .. }
            | Self::Bool { line, col, .. }
            | Self::Nil { line, col }
            | Self::Identifier { line, col, .. }
            | Self::Array { line, col, .. }
            | Self::Map { line, col, .. }
            | Self::StructLit { line, col, .. }
            | Self::Index { line, col, .. }
            | Self::Slice { line, col, .. }
            | Self::Call { line, col, .. }
            | Self::Unary { line, col, .. }
            | Self::Binary { line, col, .. } => (*line, *col),
        }
    }

    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.position().0
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition (`+`); overloaded for string concatenation.
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulus (`%`)
    Mod,
    /// Equal to (`==`)
    Eq,
    /// Not equal to (`!=`)
    NotEq,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Lte,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Gte,
    /// Logical and (`&&`), short-circuiting.
    And,
    /// Logical or (`||`), short-circuiting.
    Or,
}

/// Represents a prefix unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Neg,
    /// Logical not (`!x`).
    Not,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::And => "&&",
            Self::Or => "||",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neg => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}
