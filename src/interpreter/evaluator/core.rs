use std::collections::HashMap;

use crate::{
    ast::{Expr, LetDecl, Statement},
    error::RuntimeError,
    interpreter::{
        builtins::FileTable,
        value::{core::Value, map_key::MapKey},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure. For programs that passed the type
/// checker, errors are unreachable.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The auxiliary value returned by statement evaluation.
///
/// A non-`None` signal short-circuits the enclosing statement list: loops
/// consume `Break` and `Continue`, the call machinery consumes `Return`, and
/// everything else bubbles the signal upward. Signals never cross a function
/// invocation boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Normal completion.
    None,
    /// A `break` travelling to the nearest enclosing loop.
    Break,
    /// A `continue` travelling to the nearest enclosing loop.
    Continue,
    /// A `return` travelling to the enclosing function call.
    Return(Value),
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the chain of lexical scope
/// frames (the outermost frame is the global scope), the open-file table
/// used by the builtin registry, and the output sink.
///
/// ## Usage
///
/// A `Context` is created once per program run. Top-level statements are
/// evaluated with [`Context::eval`], after which the entry function (if any)
/// is invoked through the call machinery.
pub struct Context {
    /// Scope frames, innermost last. Index 0 is the global frame.
    pub scope_stack: Vec<HashMap<String, Value>>,
    /// Open file handles owned by the builtin registry.
    pub(crate) files: FileTable,
    capture:         Option<Vec<String>>,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a new evaluation context writing its output to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self { scope_stack: vec![HashMap::new()],
               files:       FileTable::default(),
               capture:     None, }
    }

    /// Creates a context that captures output lines instead of printing.
    ///
    /// Used by tests and by embedders that want to observe `log` output.
    #[must_use]
    pub fn with_capture() -> Self {
        Self { scope_stack: vec![HashMap::new()],
               files:       FileTable::default(),
               capture:     Some(Vec::new()), }
    }

    /// Returns the lines captured so far (empty when printing to stdout).
    #[must_use]
    pub fn captured_output(&self) -> &[String] {
        self.capture.as_deref().unwrap_or_default()
    }

    /// Emits one full output line.
    pub(crate) fn emit_line(&mut self, line: &str) {
        match &mut self.capture {
            Some(buffer) => buffer.push(line.to_string()),
            None => println!("{line}"),
        }
    }

    /// Emits output without a trailing newline (prompts, `printf`).
    pub(crate) fn emit(&mut self, text: &str) {
        match &mut self.capture {
            Some(buffer) => buffer.push(text.to_string()),
            None => {
                use std::io::Write;
                print!("{text}");
                let _ = std::io::stdout().flush();
            },
        }
    }

    /// Evaluates a statement list in order.
    ///
    /// Evaluation stops early when a statement produces a non-[`Signal::None`]
    /// signal, which is handed to the caller for the enclosing loop or call
    /// to consume.
    ///
    /// # Parameters
    /// - `statements`: The statements to execute.
    ///
    /// # Returns
    /// The first non-`None` signal, or `Signal::None` after the last
    /// statement.
    pub fn eval(&mut self, statements: &[Statement]) -> EvalResult<Signal> {
        for statement in statements {
            match self.eval_statement(statement)? {
                Signal::None => {},
                signal => return Ok(signal),
            }
        }
        Ok(Signal::None)
    }

    /// Evaluates a single statement.
    fn eval_statement(&mut self, statement: &Statement) -> EvalResult<Signal> {
        match statement {
            // Packages and imports were consumed by the loader; struct
            // declarations are descriptive only.
            Statement::Package { .. } | Statement::Import { .. } | Statement::Struct(_) => {
                Ok(Signal::None)
            },
            Statement::Let(LetDecl { name, value, .. }) => {
                let value = self.eval_expr(value)?;
                self.define_local(name, value);
                Ok(Signal::None)
            },
            Statement::Function(decl) => {
                self.define_local(&decl.name, Value::Function(decl.clone()));
                Ok(Signal::None)
            },
            Statement::Log { value, .. } => {
                let value = self.eval_expr(value)?;
                self.emit_line(&value.to_string());
                Ok(Signal::None)
            },
            Statement::Expression { expr, .. } => {
                self.eval_expr(expr)?;
                Ok(Signal::None)
            },
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Ok(Signal::Return(value))
            },
            Statement::Break { .. } => Ok(Signal::Break),
            Statement::Continue { .. } => Ok(Signal::Continue),
            Statement::If { cond,
                            body,
                            elif_conds,
                            elif_bodies,
                            else_body,
                            .. } => {
                if self.eval_expr(cond)?.is_truthy() {
                    return self.eval_scoped(body);
                }
                for (elif_cond, elif_body) in elif_conds.iter().zip(elif_bodies) {
                    if self.eval_expr(elif_cond)?.is_truthy() {
                        return self.eval_scoped(elif_body);
                    }
                }
                match else_body {
                    Some(body) => self.eval_scoped(body),
                    None => Ok(Signal::None),
                }
            },
            Statement::While { cond, body, .. } => {
                while self.eval_expr(cond)?.is_truthy() {
                    match self.eval_scoped(body)? {
                        Signal::Break => break,
                        Signal::Continue | Signal::None => {},
                        ret @ Signal::Return(_) => return Ok(ret),
                    }
                }
                Ok(Signal::None)
            },
            Statement::For { init,
                             cond,
                             post,
                             body,
                             .. } => {
                self.push_scope();
                let result = self.eval_for(init, cond, post, body);
                self.pop_scope();
                result
            },
            Statement::Assignment { target, value, .. } => {
                self.eval_assignment(target, value)?;
                Ok(Signal::None)
            },
        }
    }

    /// Evaluates a block body inside a fresh child scope.
    ///
    /// Declarations made by the block die with it; assignments to outer
    /// names keep working through the chain.
    fn eval_scoped(&mut self, body: &[Statement]) -> EvalResult<Signal> {
        self.push_scope();
        let result = self.eval(body);
        self.pop_scope();
        result
    }

    /// Runs a `for` loop after its loop scope has been entered.
    ///
    /// The induction variable declared by `init` lives in the loop scope and
    /// is visible to the condition, post statement and body. `continue`
    /// skips the rest of the body but still runs `post`.
    fn eval_for(&mut self,
                init: &Statement,
                cond: &Expr,
                post: &Statement,
                body: &[Statement])
                -> EvalResult<Signal> {
        self.eval_statement(init)?;

        while self.eval_expr(cond)?.is_truthy() {
            match self.eval_scoped(body)? {
                Signal::Break => break,
                Signal::Continue | Signal::None => {
                    self.eval_statement(post)?;
                },
                ret @ Signal::Return(_) => return Ok(ret),
            }
        }
        Ok(Signal::None)
    }

    /// Performs an assignment to an identifier, struct field or indexed
    /// element.
    ///
    /// Collection and index are evaluated before the value, matching source
    /// order. Out-of-range or mistyped element stores are silent no-ops; the
    /// type checker rejects them statically.
    fn eval_assignment(&mut self, target: &Expr, value: &Expr) -> EvalResult<()> {
        match target {
            Expr::Identifier { name, line, .. } if name.contains('.') => {
                let (base, path) = match name.split_once('.') {
                    Some(parts) => parts,
                    None => return Ok(()),
                };
                let base_value = match self.get_variable(base) {
                    Some(value) => value.clone(),
                    None => {
                        return Err(RuntimeError::UnknownVariable { name: base.to_string(),
                                                                   line: *line, });
                    },
                };

                let fields: Vec<&str> = path.split('.').collect();
                let mut current = base_value;
                for field in &fields[..fields.len() - 1] {
                    current = self.read_field(&current, base, field, *line)?;
                }

                let value = self.eval_expr(value)?;
                match &current {
                    Value::Struct(struct_fields) => {
                        struct_fields.borrow_mut()
                                     .insert((*fields[fields.len() - 1]).to_string(), value);
                        Ok(())
                    },
                    _ => Err(RuntimeError::NotAStruct { name: base.to_string(),
                                                        line: *line, }),
                }
            },
            Expr::Identifier { name, .. } => {
                let value = self.eval_expr(value)?;
                self.assign_nearest(name, value);
                Ok(())
            },
            Expr::Index { left, index, .. } => {
                let collection = self.eval_expr(left)?;
                let index = self.eval_expr(index)?;
                let value = self.eval_expr(value)?;

                match collection {
                    Value::Array(elements) => {
                        if let Value::Int(i) = index {
                            let mut elements = elements.borrow_mut();
                            let len = elements.len();
                            if let Some(index) = crate::util::num::checked_index(i, len) {
                                elements[index] = value;
                            }
                        }
                        Ok(())
                    },
                    Value::Map(pairs) => {
                        if let Some(key) = MapKey::from_value(&index) {
                            pairs.borrow_mut().insert(key, value);
                        }
                        Ok(())
                    },
                    _ => Ok(()),
                }
            },
            _ => Ok(()),
        }
    }

    /// Reads one struct field during a dotted walk, with runtime errors for
    /// the cases the type checker would have rejected.
    pub(crate) fn read_field(&self,
                             value: &Value,
                             base: &str,
                             field: &str,
                             line: usize)
                             -> EvalResult<Value> {
        match value {
            Value::Struct(fields) => match fields.borrow().get(field) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::FieldNotFound { name:  base.to_string(),
                                                          field: field.to_string(),
                                                          line, }),
            },
            _ => Err(RuntimeError::NotAStruct { name: base.to_string(),
                                                line, }),
        }
    }

    /// Adds a fresh empty scope on top of the scope stack.
    ///
    /// Used for blocks, loop scopes and function frames.
    pub fn push_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Removes the innermost scope.
    pub fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    /// Retrieves a variable from the scope chain.
    ///
    /// Lookup begins at the innermost scope and proceeds outward toward the
    /// global scope. Returns `None` if the variable is not defined in any
    /// active scope.
    ///
    /// # Example
    /// ```
    /// use tox::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let mut context = Context::new();
    /// context.define_local("x", Value::Int(5));
    ///
    /// assert_eq!(context.get_variable("x"), Some(&Value::Int(5)));
    /// assert_eq!(context.get_variable("y"), None);
    /// ```
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        for scope in self.scope_stack.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value);
            }
        }
        None
    }

    /// Defines a variable in the current (innermost) scope.
    pub fn define_local(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Assigns to the nearest scope containing the variable.
    ///
    /// Search proceeds from the innermost scope outward. A name found in no
    /// scope is inserted into the current scope; the type checker flags that
    /// case statically, so checked programs only ever hit existing bindings.
    pub fn assign_nearest(&mut self, name: &str, value: Value) {
        for scope in self.scope_stack.iter_mut().rev() {
            if scope.contains_key(name) {
                scope.insert(name.to_string(), value);
                return;
            }
        }
        self.define_local(name, value);
    }
}
