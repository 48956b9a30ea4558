use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDecl},
    error::RuntimeError,
    interpreter::{
        builtins,
        evaluator::core::{Context, EvalResult, Signal},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a call expression.
    ///
    /// Resolution order:
    /// 1. the builtin registry, by the callee's textual name;
    /// 2. method dispatch: for `x.m`, when `x` is a struct value of type
    ///    `T`, the function `T.m` with the receiver prepended and bound to
    ///    `this`;
    /// 3. the inline builtins `len` and `input`, unless shadowed by a
    ///    function value in scope;
    /// 4. a user function found in the scope chain.
    ///
    /// A callee that is not an identifier yields `nil`, matching the rest of
    /// the runtime's no-abort policy.
    pub(crate) fn eval_call(&mut self,
                            callee: &Expr,
                            args: &[Expr],
                            line: usize)
                            -> EvalResult<Value> {
        let name = match callee {
            Expr::Identifier { name, .. } => name.clone(),
            _ => return Ok(Value::Nil),
        };

        if let Some(builtin) = builtins::lookup(&name) {
            let values = self.eval_arguments(args)?;
            return (builtin.func)(self, values, line);
        }

        if let Some(result) = self.try_method_call(&name, args, line)? {
            return Ok(result);
        }

        let shadowed = matches!(self.get_variable(&name), Some(Value::Function(_)));
        if name == "len" && !shadowed {
            let values = self.eval_arguments(args)?;
            return Ok(builtin_len(&values));
        }
        if name == "input" && !shadowed {
            let values = self.eval_arguments(args)?;
            return Ok(self.builtin_input(&values));
        }

        match self.get_variable(&name).cloned() {
            Some(Value::Function(decl)) => {
                let values = self.eval_arguments(args)?;
                self.call_function(&decl, values, None)
            },
            Some(_) => Err(RuntimeError::NotAFunction { name,
                                                        line }),
            None => Err(RuntimeError::UnknownFunction { name,
                                                        line }),
        }
    }

    /// Attempts method dispatch for a dotted callee name.
    ///
    /// Returns `Ok(None)` when the name does not resolve to a struct value
    /// with a matching `Type.method` declaration, letting the caller fall
    /// through to the remaining resolution steps.
    fn try_method_call(&mut self,
                       name: &str,
                       args: &[Expr],
                       line: usize)
                       -> EvalResult<Option<Value>> {
        let (base, method) = match name.split_once('.') {
            Some(parts) => parts,
            None => return Ok(None),
        };
        let receiver = match self.get_variable(base) {
            Some(value) => value.clone(),
            None => return Ok(None),
        };
        let struct_type = match receiver.struct_type() {
            Some(name) => name,
            None => return Ok(None),
        };

        let lookup = format!("{struct_type}.{method}");
        let decl = match self.get_variable(&lookup) {
            Some(Value::Function(decl)) => decl.clone(),
            _ => return Ok(None),
        };

        // The receiver doubles as the implicit first argument.
        let mut values = vec![receiver.clone()];
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }

        self.call_function(&decl, values, Some(receiver)).map(Some)
    }

    /// Invokes a function declaration with already-evaluated arguments.
    ///
    /// The fresh frame is enclosed over the **outermost** scope (static
    /// linkage to globals), never over the caller's frame. Parameters bind
    /// positionally; surplus arguments are ignored and missing ones bind to
    /// `nil`. A `Return` signal from the body becomes the call's value;
    /// `break`/`continue` never cross the boundary.
    pub(crate) fn call_function(&mut self,
                                decl: &Rc<FunctionDecl>,
                                args: Vec<Value>,
                                receiver: Option<Value>)
                                -> EvalResult<Value> {
        let saved = self.scope_stack.split_off(1);
        self.push_scope();

        if let Some(receiver) = receiver {
            self.define_local("this", receiver);
        }
        for (index, param) in decl.params.iter().enumerate() {
            let value = args.get(index).cloned().unwrap_or(Value::Nil);
            self.define_local(param, value);
        }

        let result = self.eval(&decl.body);

        self.scope_stack.truncate(1);
        self.scope_stack.extend(saved);

        match result? {
            Signal::Return(value) => Ok(value),
            _ => Ok(Value::Nil),
        }
    }

    /// Evaluates call arguments left to right.
    fn eval_arguments(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        Ok(values)
    }

    /// The inline `input` builtin: prints the optional prompt, then reads
    /// one line from stdin with the trailing newline trimmed.
    fn builtin_input(&mut self, args: &[Value]) -> Value {
        if let Some(Value::Str(prompt)) = args.first() {
            let prompt = prompt.clone();
            self.emit(&prompt);
        }

        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(_) => Value::Str(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(_) => Value::Str(String::new()),
        }
    }
}

/// The inline `len` builtin: the element count of an array, `0` for
/// everything else.
fn builtin_len(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Array(elements)) => Value::Int(elements.borrow().len() as i64),
        _ => Value::Int(0),
    }
}
