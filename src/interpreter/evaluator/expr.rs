use std::collections::HashMap;

use crate::{
    ast::{BinaryOp, Expr, UnaryOp},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, map_key::MapKey},
    },
    util::num::{checked_index, clamp_index},
};

impl Context {
    /// Evaluates an expression and returns the resulting value.
    ///
    /// Operands evaluate left to right. Runtime misuse that the type checker
    /// would have rejected (wrong operand types, out-of-range indexes)
    /// yields `nil` rather than aborting.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The computed value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Int { value, .. } => Ok(Value::Int(*value)),
            Expr::Bool { value, .. } => Ok(Value::Bool(*value)),
            Expr::Nil { .. } => Ok(Value::Nil),
            // Interpolation happens at every evaluation of the literal, so
            // the same literal tracks the current bindings on each pass.
            Expr::Str { value, .. } => Ok(Value::Str(self.interpolate(value))),
            Expr::Identifier { name, line, .. } => self.resolve_identifier(name, *line),
            Expr::Array { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element)?);
                }
                Ok(Value::array(values))
            },
            Expr::Map { pairs, .. } => {
                let mut map = HashMap::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let key = self.eval_expr(key)?;
                    let value = self.eval_expr(value)?;
                    if let Some(key) = MapKey::from_value(&key) {
                        map.insert(key, value);
                    }
                }
                Ok(Value::map(map))
            },
            Expr::StructLit { name, fields, .. } => {
                let mut instance = HashMap::with_capacity(fields.len() + 1);
                for (field, value) in fields {
                    let value = self.eval_expr(value)?;
                    instance.insert(field.clone(), value);
                }
                Ok(Value::struct_instance(name, instance))
            },
            Expr::Index { left, index, .. } => {
                let collection = self.eval_expr(left)?;
                let index = self.eval_expr(index)?;
                Ok(index_value(&collection, &index))
            },
            Expr::Slice { left, start, end, .. } => {
                let collection = self.eval_expr(left)?;
                let start = match start {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                let end = match end {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                Ok(slice_value(&collection, start.as_ref(), end.as_ref()))
            },
            Expr::Call { callee, args, line, .. } => self.eval_call(callee, args, *line),
            Expr::Unary { op, right, .. } => {
                let right = self.eval_expr(right)?;
                Ok(eval_unary(*op, &right))
            },
            Expr::Binary { left, op, right, .. } => self.eval_binary(*op, left, right),
        }
    }

    /// Resolves a (possibly dotted) identifier against the scope chain.
    ///
    /// The full name is tried verbatim first, which is how module-qualified
    /// globals (`mathx.pi`) resolve. Failing that, a dotted name is split at
    /// its first dot and the remainder is walked as a struct field chain.
    pub(crate) fn resolve_identifier(&self, name: &str, line: usize) -> EvalResult<Value> {
        if let Some(value) = self.get_variable(name) {
            return Ok(value.clone());
        }

        if let Some((base, path)) = name.split_once('.') {
            let mut value = match self.get_variable(base) {
                Some(value) => value.clone(),
                None => {
                    return Err(RuntimeError::UnknownVariable { name: base.to_string(),
                                                               line });
                },
            };
            for field in path.split('.') {
                value = self.read_field(&value, base, field, line)?;
            }
            return Ok(value);
        }

        Err(RuntimeError::UnknownVariable { name: name.to_string(),
                                            line })
    }

    /// Evaluates a binary operation.
    ///
    /// `&&` and `||` short-circuit on the left operand's truthiness; every
    /// other operator evaluates both operands first.
    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult<Value> {
        match op {
            BinaryOp::And => {
                let left = self.eval_expr(left)?;
                if !left.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                let right = self.eval_expr(right)?;
                Ok(Value::Bool(right.is_truthy()))
            },
            BinaryOp::Or => {
                let left = self.eval_expr(left)?;
                if left.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                let right = self.eval_expr(right)?;
                Ok(Value::Bool(right.is_truthy()))
            },
            _ => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(eval_binary_values(op, &left, &right))
            },
        }
    }
}

/// Applies a non-short-circuiting binary operator to two values.
///
/// `+` dispatches on the runtime operand types (`int + int` or
/// `string + string`); arithmetic requires two ints; comparisons of
/// mismatched types are `false`; division or modulus by zero is `nil`.
fn eval_binary_values(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => match (left, right) {
            (Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_add(*r)),
            (Value::Str(l), Value::Str(r)) => Value::Str(format!("{l}{r}")),
            _ => Value::Nil,
        },
        BinaryOp::Sub => int_op(left, right, |l, r| Some(l.wrapping_sub(r))),
        BinaryOp::Mul => int_op(left, right, |l, r| Some(l.wrapping_mul(r))),
        BinaryOp::Div => int_op(left, right, i64::checked_div),
        BinaryOp::Mod => int_op(left, right, i64::checked_rem),
        BinaryOp::Eq => Value::Bool(left == right),
        BinaryOp::NotEq => Value::Bool(left != right),
        BinaryOp::Lt => int_cmp(left, right, |l, r| l < r),
        BinaryOp::Lte => int_cmp(left, right, |l, r| l <= r),
        BinaryOp::Gt => int_cmp(left, right, |l, r| l > r),
        BinaryOp::Gte => int_cmp(left, right, |l, r| l >= r),
        // Handled with short-circuiting before operand evaluation; kept for
        // callers that already hold both values.
        BinaryOp::And => Value::Bool(left.is_truthy() && right.is_truthy()),
        BinaryOp::Or => Value::Bool(left.is_truthy() || right.is_truthy()),
    }
}

fn int_op(left: &Value, right: &Value, op: impl Fn(i64, i64) -> Option<i64>) -> Value {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => op(*l, *r).map_or(Value::Nil, Value::Int),
        _ => Value::Nil,
    }
}

fn int_cmp(left: &Value, right: &Value, cmp: impl Fn(i64, i64) -> bool) -> Value {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Value::Bool(cmp(*l, *r)),
        _ => Value::Nil,
    }
}

/// Applies a prefix unary operator.
fn eval_unary(op: UnaryOp, right: &Value) -> Value {
    match op {
        UnaryOp::Neg => match right {
            Value::Int(n) => Value::Int(n.wrapping_neg()),
            _ => Value::Nil,
        },
        UnaryOp::Not => Value::Bool(!right.is_truthy()),
    }
}

/// Indexes an array or map value.
///
/// Out-of-range array indexes, wrong index types and absent map keys all
/// yield `nil`.
fn index_value(collection: &Value, index: &Value) -> Value {
    match collection {
        Value::Array(elements) => match index {
            Value::Int(i) => {
                let elements = elements.borrow();
                match checked_index(*i, elements.len()) {
                    Some(index) => elements[index].clone(),
                    None => Value::Nil,
                }
            },
            _ => Value::Nil,
        },
        Value::Map(pairs) => match MapKey::from_value(index) {
            Some(key) => pairs.borrow().get(&key).cloned().unwrap_or(Value::Nil),
            None => Value::Nil,
        },
        _ => Value::Nil,
    }
}

/// Slices an array value into a fresh array.
///
/// `start` clamps to `[0, len]` and `end` to `[start, len]`; missing bounds
/// default to `0` and the length. Slicing a non-array is `nil`.
fn slice_value(collection: &Value, start: Option<&Value>, end: Option<&Value>) -> Value {
    let elements = match collection {
        Value::Array(elements) => elements.borrow(),
        _ => return Value::Nil,
    };
    let len = elements.len();

    let start = match start {
        Some(Value::Int(n)) => clamp_index(*n, len),
        _ => 0,
    };
    let end = match end {
        Some(Value::Int(n)) => clamp_index(*n, len),
        None => len,
        _ => len,
    };
    let end = end.max(start);

    Value::array(elements[start..end].to_vec())
}
