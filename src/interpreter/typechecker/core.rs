use std::collections::HashMap;

use crate::{
    ast::{Expr, FunctionDecl, LetDecl, Statement, StructDecl, StructField},
    error::TypeError,
    interpreter::typechecker::types,
};

/// A registered function signature: declared parameter types and return
/// type. Methods are registered under their `Type.method` lookup name.
pub struct FunctionSig {
    /// Declared parameter types, in order.
    pub param_types: Vec<String>,
    /// Declared return type (`void` allowed).
    pub return_type: String,
}

/// The static type checker.
///
/// Checking runs in two passes. Pass 1 registers the signatures of every
/// top-level function, the fields of every struct, and the declared type of
/// every global. Pass 2 walks statements with a scoped variable-type
/// environment, an ambient expected return type and an `in_loop` flag, and
/// collects diagnostics across the whole program.
pub struct Checker {
    pub(crate) functions: HashMap<String, FunctionSig>,
    pub(crate) structs:   HashMap<String, Vec<StructField>>,
    pub(crate) scopes:    Vec<HashMap<String, String>>,
    pub(crate) errors:    Vec<TypeError>,
}

/// Type-checks a program and returns the collected diagnostics.
///
/// The diagnostics are a pure function of the input statement list: checking
/// is deterministic and running it again on an accepted program yields no
/// errors again.
///
/// # Parameters
/// - `statements`: The combined statement list (after loading).
///
/// # Returns
/// Every semantic error found, in source order; empty for a well-typed
/// program.
#[must_use]
pub fn check(statements: &[Statement]) -> Vec<TypeError> {
    let mut checker = Checker::new();
    checker.register(statements);
    for statement in statements {
        checker.check_statement(statement, "void", false);
    }
    checker.errors
}

impl Checker {
    fn new() -> Self {
        Self { functions: HashMap::new(),
               structs:   HashMap::new(),
               scopes:    vec![HashMap::new()],
               errors:    Vec::new(), }
    }

    /// Pass 1: registers top-level functions, structs and global variable
    /// types so later statements can reference earlier and later
    /// declarations alike.
    fn register(&mut self, statements: &[Statement]) {
        for statement in statements {
            match statement {
                Statement::Function(decl) => {
                    self.functions
                        .insert(decl.name.clone(),
                                FunctionSig { param_types: decl.param_types.clone(),
                                              return_type: decl.return_type.clone(), });
                },
                Statement::Struct(decl) => {
                    self.structs.insert(decl.name.clone(), decl.fields.clone());
                },
                Statement::Let(decl) => {
                    self.scopes[0].insert(decl.name.clone(), decl.ty.clone());
                },
                _ => {},
            }
        }
    }

    /// Pass 2: checks one statement.
    ///
    /// # Parameters
    /// - `statement`: The statement to check.
    /// - `ret`: The ambient expected return type (`void` at the top level).
    /// - `in_loop`: Whether `break`/`continue` are currently legal.
    pub(crate) fn check_statement(&mut self, statement: &Statement, ret: &str, in_loop: bool) {
        match statement {
            Statement::Package { .. } | Statement::Import { .. } => {},
            Statement::Struct(decl) => self.check_struct_decl(decl),
            Statement::Let(decl) => self.check_let(decl),
            Statement::Function(decl) => self.check_function(decl),
            Statement::Log { value, .. } => {
                self.record(value);
            },
            Statement::Expression { expr, .. } => {
                self.record(expr);
            },
            Statement::Return { value, line, col } => self.check_return(value.as_ref(),
                                                                        ret,
                                                                        *line,
                                                                        *col),
            Statement::Break { line, col } => {
                if !in_loop {
                    self.errors.push(TypeError::SignalOutsideLoop { keyword: "break".to_string(),
                                                                    line:    *line,
                                                                    col:     *col, });
                }
            },
            Statement::Continue { line, col } => {
                if !in_loop {
                    self.errors
                        .push(TypeError::SignalOutsideLoop { keyword: "continue".to_string(),
                                                             line:    *line,
                                                             col:     *col, });
                }
            },
            Statement::If { cond,
                            body,
                            elif_conds,
                            elif_bodies,
                            else_body,
                            .. } => {
                // `if` conditions go through the truthiness predicate at
                // runtime, so any type is allowed here.
                self.record(cond);
                self.check_block(body, ret, in_loop);
                for (elif_cond, elif_body) in elif_conds.iter().zip(elif_bodies) {
                    self.record(elif_cond);
                    self.check_block(elif_body, ret, in_loop);
                }
                if let Some(body) = else_body {
                    self.check_block(body, ret, in_loop);
                }
            },
            Statement::While { cond, body, .. } => {
                self.check_condition(cond);
                self.check_block(body, ret, true);
            },
            Statement::For { init,
                             cond,
                             post,
                             body,
                             .. } => {
                // The induction variable lives in the for-scope, visible to
                // the condition, post statement and body.
                self.push_scope();
                self.check_statement(init, ret, false);
                self.check_condition(cond);
                self.check_statement(post, ret, false);
                self.check_block(body, ret, true);
                self.pop_scope();
            },
            Statement::Assignment { target,
                                    value,
                                    line,
                                    col, } => self.check_assignment(target, value, *line, *col),
        }
    }

    /// Checks a block body inside a child scope.
    fn check_block(&mut self, body: &[Statement], ret: &str, in_loop: bool) {
        self.push_scope();
        for statement in body {
            self.check_statement(statement, ret, in_loop);
        }
        self.pop_scope();
    }

    /// Requires a loop condition to be `bool`.
    fn check_condition(&mut self, cond: &Expr) {
        if let Some(found) = self.record(cond) {
            if found != "bool" {
                let (line, col) = cond.position();
                self.errors.push(TypeError::Mismatch { expected: "bool".to_string(),
                                                       found,
                                                       line,
                                                       col });
            }
        }
    }

    /// Checks a struct declaration's field types.
    fn check_struct_decl(&mut self, decl: &StructDecl) {
        for field in &decl.fields {
            if !self.valid_type(&field.ty) {
                self.errors.push(TypeError::UnknownType { name: field.ty.clone(),
                                                          line: decl.line,
                                                          col:  decl.col, });
            }
        }
    }

    /// Checks a `let` declaration and introduces the binding.
    fn check_let(&mut self, decl: &LetDecl) {
        if !self.valid_type(&decl.ty) {
            self.errors.push(TypeError::UnknownType { name: decl.ty.clone(),
                                                      line: decl.line,
                                                      col:  decl.col, });
        } else if let Some(found) = self.record(&decl.value) {
            if !types::assignable(&decl.ty, &found) {
                self.errors.push(TypeError::Mismatch { expected: decl.ty.clone(),
                                                       found,
                                                       line: decl.line,
                                                       col: decl.col });
            }
        }
        self.declare(&decl.name, &decl.ty);
    }

    /// Checks a function declaration: receiver, parameter and return types,
    /// then the body in a fresh scope enclosing only the globals.
    fn check_function(&mut self, decl: &FunctionDecl) {
        if let Some(receiver) = &decl.receiver {
            if !self.structs.contains_key(receiver) {
                self.errors.push(TypeError::UnknownStruct { name: receiver.clone(),
                                                            line: decl.line,
                                                            col:  decl.col, });
            }
        }
        if decl.return_type != "void" && !self.valid_type(&decl.return_type) {
            self.errors.push(TypeError::UnknownType { name: decl.return_type.clone(),
                                                      line: decl.line,
                                                      col:  decl.col, });
        }
        for ty in &decl.param_types {
            if !self.valid_type(ty) {
                self.errors.push(TypeError::UnknownType { name: ty.clone(),
                                                          line: decl.line,
                                                          col:  decl.col, });
            }
        }

        // The body sees the globals and its parameters, never the
        // surrounding block scopes (function frames statically link to the
        // outermost scope).
        let saved = self.scopes.split_off(1);
        self.push_scope();
        if let Some(receiver) = &decl.receiver {
            self.declare("this", receiver);
        }
        for (param, ty) in decl.params.iter().zip(&decl.param_types) {
            self.declare(param, ty);
        }
        for statement in &decl.body {
            self.check_statement(statement, &decl.return_type, false);
        }
        self.pop_scope();
        self.scopes.extend(saved);
    }

    /// Checks a `return` statement against the ambient return type.
    fn check_return(&mut self, value: Option<&Expr>, ret: &str, line: usize, col: usize) {
        match value {
            None => {
                if ret != "void" {
                    self.errors
                        .push(TypeError::BadReturn { details: format!("missing return value in \
                                                                       function returning {ret}"),
                                                     line,
                                                     col });
                }
            },
            Some(expr) => {
                let found = match self.record(expr) {
                    Some(found) => found,
                    None => return,
                };
                if ret == "void" {
                    if found != "nil" {
                        self.errors.push(TypeError::BadReturn { details:
                                                                    "void function cannot \
                                                                     return a value"
                                                                                    .to_string(),
                                                                line,
                                                                col, });
                    }
                } else if !types::assignable(ret, &found) {
                    self.errors.push(TypeError::Mismatch { expected: ret.to_string(),
                                                           found,
                                                           line,
                                                           col });
                }
            },
        }
    }

    /// Checks an assignment statement's target and value.
    fn check_assignment(&mut self, target: &Expr, value: &Expr, line: usize, col: usize) {
        let found = match self.record(value) {
            Some(found) => found,
            None => return,
        };

        match target {
            Expr::Identifier { name, .. } => {
                // Full-name lookup first: module-qualified globals resolve
                // verbatim.
                if let Some(declared) = self.lookup_type(name) {
                    let declared = declared.to_string();
                    if !types::assignable(&declared, &found) {
                        self.errors.push(TypeError::Mismatch { expected: declared,
                                                               found,
                                                               line,
                                                               col });
                    }
                    return;
                }
                if let Some((base, path)) = name.split_once('.') {
                    match self.field_chain_type(base, path, line, col) {
                        Ok(declared) => {
                            if !types::assignable(&declared, &found) {
                                self.errors.push(TypeError::Mismatch { expected: declared,
                                                                       found,
                                                                       line,
                                                                       col });
                            }
                        },
                        Err(e) => self.errors.push(e),
                    }
                    return;
                }
                self.errors.push(TypeError::UndeclaredAssignment { name: name.clone(),
                                                                   line,
                                                                   col });
            },
            Expr::Index { left, index, .. } => {
                let container = match self.record(left) {
                    Some(container) => container,
                    None => return,
                };
                let index_ty = match self.record(index) {
                    Some(index_ty) => index_ty,
                    None => return,
                };

                if let Some((key, value_ty)) = types::map_types(&container) {
                    if !types::assignable(key, &index_ty) {
                        self.errors.push(TypeError::Mismatch { expected: key.to_string(),
                                                               found: index_ty,
                                                               line,
                                                               col });
                    }
                    if !types::assignable(value_ty, &found) {
                        self.errors.push(TypeError::Mismatch { expected: value_ty.to_string(),
                                                               found,
                                                               line,
                                                               col });
                    }
                } else if let Some(elem) = types::elem_type(&container) {
                    if index_ty != "int" {
                        self.errors.push(TypeError::Mismatch { expected: "int".to_string(),
                                                               found: index_ty,
                                                               line,
                                                               col });
                    }
                    let elem = if container == "any[]" { "any" } else { elem };
                    if !types::assignable(elem, &found) {
                        self.errors.push(TypeError::Mismatch { expected: elem.to_string(),
                                                               found,
                                                               line,
                                                               col });
                    }
                } else {
                    self.errors.push(TypeError::NotIndexable { found: container,
                                                               line,
                                                               col });
                }
            },
            _ => self.errors.push(TypeError::InvalidAssignmentTarget { line,
                                                                       col }),
        }
    }

    /// Infers an expression's type, pushing its error (if any) and returning
    /// the type on success.
    pub(crate) fn record(&mut self, expr: &Expr) -> Option<String> {
        match self.infer(expr) {
            Ok(ty) => Some(ty),
            Err(e) => {
                self.errors.push(e);
                None
            },
        }
    }

    /// Resolves the declared type of a (possibly dotted) struct field chain.
    pub(crate) fn field_chain_type(&self,
                                   base: &str,
                                   path: &str,
                                   line: usize,
                                   col: usize)
                                   -> Result<String, TypeError> {
        let mut current = match self.lookup_type(base) {
            Some(ty) => ty.to_string(),
            None => {
                return Err(TypeError::UnknownVariable { name: base.to_string(),
                                                        line,
                                                        col });
            },
        };

        for field in path.split('.') {
            let fields = match self.structs.get(&current) {
                Some(fields) => fields,
                None => {
                    if types::is_struct_name(&current) {
                        return Err(TypeError::UnknownStruct { name: current,
                                                              line,
                                                              col });
                    }
                    return Err(TypeError::NotAStruct { name: base.to_string(),
                                                       found: current,
                                                       line,
                                                       col });
                },
            };
            current = match fields.iter().find(|f| f.name == field) {
                Some(field) => field.ty.clone(),
                None => {
                    return Err(TypeError::UnknownField { struct_name: current,
                                                         field: field.to_string(),
                                                         line,
                                                         col });
                },
            };
        }

        Ok(current)
    }

    /// Validates a type string against the grammar and registered structs.
    pub(crate) fn valid_type(&self, ty: &str) -> bool {
        types::valid_type(ty, &|name: &str| self.structs.contains_key(name))
    }

    /// Looks a variable's declared type up through the scope chain.
    pub(crate) fn lookup_type(&self, name: &str) -> Option<&str> {
        for scope in self.scopes.iter().rev() {
            if let Some(ty) = scope.get(name) {
                return Some(ty);
            }
        }
        None
    }

    /// Declares a variable's type in the innermost scope.
    pub(crate) fn declare(&mut self, name: &str, ty: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty.to_string());
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }
}
