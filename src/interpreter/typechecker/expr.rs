use crate::{
    ast::{BinaryOp, Expr, UnaryOp},
    error::TypeError,
    interpreter::{
        builtins,
        typechecker::{core::Checker, types},
    },
};

impl Checker {
    /// Infers the static type of an expression.
    ///
    /// # Returns
    /// The inferred type string, or the first semantic error found inside
    /// the expression.
    pub(crate) fn infer(&self, expr: &Expr) -> Result<String, TypeError> {
        match expr {
            Expr::Int { .. } => Ok("int".to_string()),
            Expr::Str { .. } => Ok("string".to_string()),
            Expr::Bool { .. } => Ok("bool".to_string()),
            Expr::Nil { .. } => Ok("nil".to_string()),
            Expr::Identifier { name, line, col } => self.infer_identifier(name, *line, *col),
            Expr::Array { elements, .. } => self.infer_array(elements),
            Expr::Map { key_type,
                        value_type,
                        pairs,
                        line,
                        col, } => self.infer_map(key_type, value_type, pairs, *line, *col),
            Expr::StructLit { name,
                              fields,
                              line,
                              col, } => self.infer_struct_literal(name, fields, *line, *col),
            Expr::Index { left,
                          index,
                          line,
                          col, } => self.infer_index(left, index, *line, *col),
            Expr::Slice { left,
                          start,
                          end,
                          line,
                          col, } => self.infer_slice(left, start.as_deref(), end.as_deref(),
                                                     *line, *col),
            Expr::Call { callee,
                         args,
                         line,
                         col, } => self.infer_call(callee, args, *line, *col),
            Expr::Unary { op, right, line, col } => self.infer_unary(*op, right, *line, *col),
            Expr::Binary { left,
                           op,
                           right,
                           line,
                           col, } => self.infer_binary(*op, left, right, *line, *col),
        }
    }

    /// Infers an identifier: direct scope lookup first (which also covers
    /// module-qualified globals), then dotted struct field resolution.
    fn infer_identifier(&self,
                        name: &str,
                        line: usize,
                        col: usize)
                        -> Result<String, TypeError> {
        if let Some(ty) = self.lookup_type(name) {
            return Ok(ty.to_string());
        }
        if let Some((base, path)) = name.split_once('.') {
            return self.field_chain_type(base, path, line, col);
        }
        Err(TypeError::UnknownVariable { name: name.to_string(),
                                         line,
                                         col })
    }

    /// Infers an array literal: the first element fixes the element type and
    /// every other element must match it. The empty literal is `any[]` and
    /// fits every array type.
    fn infer_array(&self, elements: &[Expr]) -> Result<String, TypeError> {
        let first = match elements.first() {
            Some(first) => self.infer(first)?,
            None => return Ok("any[]".to_string()),
        };

        for element in &elements[1..] {
            let found = self.infer(element)?;
            if found != first {
                let (line, col) = element.position();
                return Err(TypeError::Mismatch { expected: first,
                                                 found,
                                                 line,
                                                 col });
            }
        }

        Ok(format!("{first}[]"))
    }

    /// Infers a map literal against its declared key and value types.
    fn infer_map(&self,
                 key_type: &str,
                 value_type: &str,
                 pairs: &[(Expr, Expr)],
                 line: usize,
                 col: usize)
                 -> Result<String, TypeError> {
        if !types::MAP_KEY_TYPES.contains(&key_type) {
            return Err(TypeError::UnknownType { name: key_type.to_string(),
                                                line,
                                                col });
        }
        if !self.valid_type(value_type) {
            return Err(TypeError::UnknownType { name: value_type.to_string(),
                                                line,
                                                col });
        }

        for (key, value) in pairs {
            let found = self.infer(key)?;
            if !types::assignable(key_type, &found) {
                let (line, col) = key.position();
                return Err(TypeError::Mismatch { expected: key_type.to_string(),
                                                 found,
                                                 line,
                                                 col });
            }
            let found = self.infer(value)?;
            if !types::assignable(value_type, &found) {
                let (line, col) = value.position();
                return Err(TypeError::Mismatch { expected: value_type.to_string(),
                                                 found,
                                                 line,
                                                 col });
            }
        }

        Ok(format!("map[{key_type}]{value_type}"))
    }

    /// Infers a struct literal: the struct must be registered and the
    /// literal must provide exactly the declared fields with matching types.
    fn infer_struct_literal(&self,
                            name: &str,
                            fields: &[(String, Expr)],
                            line: usize,
                            col: usize)
                            -> Result<String, TypeError> {
        let declared = match self.structs.get(name) {
            Some(declared) => declared,
            None => {
                return Err(TypeError::UnknownStruct { name: name.to_string(),
                                                      line,
                                                      col });
            },
        };

        for field in declared {
            let value = fields.iter().find(|(given, _)| given == &field.name);
            match value {
                Some((_, value)) => {
                    let found = self.infer(value)?;
                    if !types::assignable(&field.ty, &found) {
                        let (line, col) = value.position();
                        return Err(TypeError::Mismatch { expected: field.ty.clone(),
                                                         found,
                                                         line,
                                                         col });
                    }
                },
                None => {
                    return Err(TypeError::MissingField { struct_name: name.to_string(),
                                                         field: field.name.clone(),
                                                         line,
                                                         col });
                },
            }
        }
        for (given, _) in fields {
            if !declared.iter().any(|field| &field.name == given) {
                return Err(TypeError::UnknownField { struct_name: name.to_string(),
                                                     field: given.clone(),
                                                     line,
                                                     col });
            }
        }

        Ok(name.to_string())
    }

    /// Infers an index expression: `T[]` indexed by `int` yields `T`,
    /// `map[K]V` indexed by `K` yields `V`.
    fn infer_index(&self,
                   left: &Expr,
                   index: &Expr,
                   line: usize,
                   col: usize)
                   -> Result<String, TypeError> {
        let container = self.infer(left)?;
        let index_ty = self.infer(index)?;

        if let Some((key, value)) = types::map_types(&container) {
            if !types::assignable(key, &index_ty) {
                return Err(TypeError::Mismatch { expected: key.to_string(),
                                                 found: index_ty,
                                                 line,
                                                 col });
            }
            return Ok(value.to_string());
        }
        if let Some(elem) = types::elem_type(&container) {
            if index_ty != "int" {
                return Err(TypeError::Mismatch { expected: "int".to_string(),
                                                 found: index_ty,
                                                 line,
                                                 col });
            }
            let elem = if container == "any[]" { "any" } else { elem };
            return Ok(elem.to_string());
        }

        Err(TypeError::NotIndexable { found: container,
                                      line,
                                      col })
    }

    /// Infers a slice expression: slicing `T[]` yields `T[]`; bounds must be
    /// ints.
    fn infer_slice(&self,
                   left: &Expr,
                   start: Option<&Expr>,
                   end: Option<&Expr>,
                   line: usize,
                   col: usize)
                   -> Result<String, TypeError> {
        let container = self.infer(left)?;
        if !types::is_array(&container) || types::is_map(&container) {
            return Err(TypeError::NotIndexable { found: container,
                                                 line,
                                                 col });
        }

        for bound in [start, end].into_iter().flatten() {
            let found = self.infer(bound)?;
            if found != "int" {
                let (line, col) = bound.position();
                return Err(TypeError::Mismatch { expected: "int".to_string(),
                                                 found,
                                                 line,
                                                 col });
            }
        }

        Ok(container)
    }

    /// Infers a prefix unary operation.
    fn infer_unary(&self,
                   op: UnaryOp,
                   right: &Expr,
                   line: usize,
                   col: usize)
                   -> Result<String, TypeError> {
        let found = self.infer(right)?;
        match op {
            UnaryOp::Neg => {
                if found != "int" {
                    return Err(TypeError::Mismatch { expected: "int".to_string(),
                                                     found,
                                                     line,
                                                     col });
                }
                Ok("int".to_string())
            },
            UnaryOp::Not => Ok("bool".to_string()),
        }
    }

    /// Infers a binary operation.
    ///
    /// `+` is overloaded for `int`s and `string`s; the other arithmetic
    /// operators require ints; equality always yields `bool` regardless of
    /// operand types; ordering requires ints (booleans are not orderable);
    /// the logical operators accept anything truthiness does.
    fn infer_binary(&self,
                    op: BinaryOp,
                    left: &Expr,
                    right: &Expr,
                    line: usize,
                    col: usize)
                    -> Result<String, TypeError> {
        let lt = self.infer(left)?;
        let rt = self.infer(right)?;

        let invalid = || {
            Err(TypeError::InvalidOperands { operator: op.to_string(),
                                             left: lt.clone(),
                                             right: rt.clone(),
                                             line,
                                             col })
        };

        match op {
            BinaryOp::Add => match (lt.as_str(), rt.as_str()) {
                ("int", "int") => Ok("int".to_string()),
                ("string", "string") => Ok("string".to_string()),
                _ => invalid(),
            },
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                if lt == "int" && rt == "int" {
                    Ok("int".to_string())
                } else {
                    invalid()
                }
            },
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => {
                Ok("bool".to_string())
            },
            BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
                if lt == "int" && rt == "int" {
                    Ok("bool".to_string())
                } else {
                    invalid()
                }
            },
        }
    }

    /// Infers a call expression.
    ///
    /// Resolution mirrors the evaluator: the builtin registry first, then
    /// the inline `len`/`input` builtins, then registered functions (which
    /// covers module-qualified names), then method dispatch on the callee's
    /// dotted base.
    fn infer_call(&self,
                  callee: &Expr,
                  args: &[Expr],
                  line: usize,
                  col: usize)
                  -> Result<String, TypeError> {
        let name = match callee {
            Expr::Identifier { name, .. } => name.as_str(),
            _ => {
                return Err(TypeError::UnknownFunction { name: "<expression>".to_string(),
                                                        line,
                                                        col });
            },
        };

        if let Some(builtin) = builtins::lookup(name) {
            if !builtin.arity.check(args.len()) {
                return Err(TypeError::ArgumentCountMismatch { name: name.to_string(),
                                                              expected:
                                                                  builtin.param_types.len(),
                                                              found: args.len(),
                                                              line,
                                                              col });
            }
            for (arg, declared) in args.iter().zip(builtin.param_types) {
                let found = self.infer(arg)?;
                if !types::assignable(declared, &found) {
                    let (line, col) = arg.position();
                    return Err(TypeError::Mismatch { expected: (*declared).to_string(),
                                                     found,
                                                     line,
                                                     col });
                }
            }
            // Variadic builtins still get their arguments checked for
            // internal errors.
            for arg in args.iter().skip(builtin.param_types.len()) {
                self.infer(arg)?;
            }
            return Ok(builtin.returns.to_string());
        }

        if name == "len" {
            if args.len() != 1 {
                return Err(TypeError::ArgumentCountMismatch { name: name.to_string(),
                                                              expected: 1,
                                                              found: args.len(),
                                                              line,
                                                              col });
            }
            let found = self.infer(&args[0])?;
            if !types::is_array(&found) {
                return Err(TypeError::Mismatch { expected: "any[]".to_string(),
                                                 found,
                                                 line,
                                                 col });
            }
            return Ok("int".to_string());
        }
        if name == "input" {
            if args.len() > 1 {
                return Err(TypeError::ArgumentCountMismatch { name: name.to_string(),
                                                              expected: 1,
                                                              found: args.len(),
                                                              line,
                                                              col });
            }
            if let Some(prompt) = args.first() {
                let found = self.infer(prompt)?;
                if found != "string" {
                    return Err(TypeError::Mismatch { expected: "string".to_string(),
                                                     found,
                                                     line,
                                                     col });
                }
            }
            return Ok("string".to_string());
        }

        if let Some(sig) = self.functions.get(name) {
            self.check_arguments(name, args, &sig.param_types, line, col)?;
            return Ok(sig.return_type.clone());
        }

        if let Some((base, method)) = name.split_once('.') {
            if let Some(receiver_ty) = self.lookup_type(base) {
                let receiver_ty = receiver_ty.to_string();
                if !self.structs.contains_key(&receiver_ty) {
                    return Err(TypeError::ReceiverNotStruct { name: base.to_string(),
                                                              line,
                                                              col });
                }
                let lookup = format!("{receiver_ty}.{method}");
                let sig = match self.functions.get(&lookup) {
                    Some(sig) => sig,
                    None => {
                        return Err(TypeError::UnknownFunction { name: lookup,
                                                                line,
                                                                col });
                    },
                };

                // The receiver is the implicit first argument.
                if args.len() + 1 != sig.param_types.len() {
                    return Err(TypeError::ArgumentCountMismatch { name: lookup,
                                                                  expected:
                                                                      sig.param_types.len(),
                                                                  found: args.len() + 1,
                                                                  line,
                                                                  col });
                }
                if let Some(first) = sig.param_types.first() {
                    if !types::assignable(first, &receiver_ty) {
                        return Err(TypeError::Mismatch { expected: first.clone(),
                                                         found: receiver_ty,
                                                         line,
                                                         col });
                    }
                }
                for (arg, declared) in args.iter().zip(&sig.param_types[1..]) {
                    let found = self.infer(arg)?;
                    if !types::assignable(declared, &found) {
                        let (line, col) = arg.position();
                        return Err(TypeError::Mismatch { expected: declared.clone(),
                                                         found,
                                                         line,
                                                         col });
                    }
                }
                return Ok(sig.return_type.clone());
            }
        }

        Err(TypeError::UnknownFunction { name: name.to_string(),
                                         line,
                                         col })
    }

    /// Checks a plain call's arity and argument types against a signature.
    fn check_arguments(&self,
                       name: &str,
                       args: &[Expr],
                       param_types: &[String],
                       line: usize,
                       col: usize)
                       -> Result<(), TypeError> {
        if args.len() != param_types.len() {
            return Err(TypeError::ArgumentCountMismatch { name: name.to_string(),
                                                          expected: param_types.len(),
                                                          found: args.len(),
                                                          line,
                                                          col });
        }
        for (arg, declared) in args.iter().zip(param_types) {
            let found = self.infer(arg)?;
            if !types::assignable(declared, &found) {
                let (line, col) = arg.position();
                return Err(TypeError::Mismatch { expected: declared.clone(),
                                                 found,
                                                 line,
                                                 col });
            }
        }
        Ok(())
    }
}
