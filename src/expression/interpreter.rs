// Copyright 2024 The DocAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde_json::{Map, Value};

use super::parser::{BinaryOp, Expr, Literal, LogicalOp, UnaryOp};
use super::EvalError;

/// A runtime value. `Undefined` is what a missing property reads as.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl From<&Value> for Operand {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Operand::Null,
            Value::Bool(b) => Operand::Bool(*b),
            Value::Number(n) => Operand::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Operand::Str(s.clone()),
            Value::Array(items) => Operand::Array(items.clone()),
            Value::Object(map) => Operand::Object(map.clone()),
        }
    }
}

impl From<Literal> for Operand {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Undefined => Operand::Undefined,
            Literal::Null => Operand::Null,
            Literal::Bool(b) => Operand::Bool(b),
            Literal::Number(n) => Operand::Number(n),
            Literal::Str(s) => Operand::Str(s),
        }
    }
}

impl Operand {
    fn truthy(&self) -> bool {
        match self {
            Operand::Undefined | Operand::Null => false,
            Operand::Bool(b) => *b,
            Operand::Number(n) => *n != 0.0 && !n.is_nan(),
            Operand::Str(s) => !s.is_empty(),
            Operand::Array(_) | Operand::Object(_) => true,
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            Operand::Undefined | Operand::Object(_) => f64::NAN,
            Operand::Null => 0.0,
            Operand::Bool(b) => f64::from(u8::from(*b)),
            Operand::Number(n) => *n,
            Operand::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            Operand::Array(items) => match items.as_slice() {
                [] => 0.0,
                [single] => Operand::from(single).to_number(),
                _ => f64::NAN,
            },
        }
    }

    fn to_text(&self) -> String {
        match self {
            Operand::Undefined => "undefined".to_string(),
            Operand::Null => "null".to_string(),
            Operand::Bool(b) => b.to_string(),
            Operand::Number(n) => format_number(*n),
            Operand::Str(s) => s.clone(),
            Operand::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    other => Operand::from(other).to_text(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Operand::Object(_) => "[object Object]".to_string(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Operand::Undefined => "undefined",
            Operand::Bool(_) => "boolean",
            Operand::Number(_) => "number",
            Operand::Str(_) => "string",
            Operand::Null | Operand::Array(_) | Operand::Object(_) => "object",
        }
    }

    fn strict_eq(&self, other: &Operand) -> bool {
        match (self, other) {
            (Operand::Number(a), Operand::Number(b)) => a == b,
            (a, b) => a == b,
        }
    }

    fn loose_eq(&self, other: &Operand) -> bool {
        match (self, other) {
            (Operand::Undefined | Operand::Null, Operand::Undefined | Operand::Null) => true,
            (Operand::Undefined | Operand::Null, _) | (_, Operand::Undefined | Operand::Null) => {
                false
            }
            (Operand::Number(_), Operand::Str(_) | Operand::Bool(_))
            | (Operand::Str(_) | Operand::Bool(_), Operand::Number(_))
            | (Operand::Bool(_), Operand::Str(_))
            | (Operand::Str(_), Operand::Bool(_)) => self.to_number() == other.to_number(),
            _ => self.strict_eq(other),
        }
    }
}

/// Integral values print without a fraction.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub(crate) fn evaluate(expr: &Expr, subject: &Value) -> Result<Operand, EvalError> {
    match expr {
        Expr::Literal(literal) => Ok(Operand::from(literal.clone())),
        Expr::Subject => Ok(Operand::from(subject)),
        Expr::Array(items) => {
            let mut values = vec![];
            for item in items {
                values.push(to_json(evaluate(item, subject)?));
            }
            Ok(Operand::Array(values))
        }
        Expr::Unary(op, operand) => {
            let value = evaluate(operand, subject)?;
            Ok(match op {
                UnaryOp::Not => Operand::Bool(!value.truthy()),
                UnaryOp::Negate => Operand::Number(-value.to_number()),
                UnaryOp::Plus => Operand::Number(value.to_number()),
                UnaryOp::TypeOf => Operand::Str(value.type_name().to_string()),
            })
        }
        Expr::Logical(op, lhs, rhs) => {
            let lhs = evaluate(lhs, subject)?;
            match (op, lhs.truthy()) {
                (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(lhs),
                _ => evaluate(rhs, subject),
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let lhs = evaluate(lhs, subject)?;
            let rhs = evaluate(rhs, subject)?;
            Ok(binary(*op, &lhs, &rhs))
        }
        Expr::Member(target, name) => {
            let target = evaluate(target, subject)?;
            member(&target, name)
        }
        Expr::Index(target, index) => {
            let target = evaluate(target, subject)?;
            let index = evaluate(index, subject)?;
            match (&target, &index) {
                (Operand::Array(items), Operand::Number(n)) => Ok(element(items, *n)),
                (Operand::Str(s), Operand::Number(n)) => Ok(char_at(s, *n)),
                _ => member(&target, &index.to_text()),
            }
        }
        Expr::Call(target, method, args) => {
            let target = evaluate(target, subject)?;
            let mut values = vec![];
            for arg in args {
                values.push(evaluate(arg, subject)?);
            }
            call(&target, method, &values)
        }
    }
}

fn binary(op: BinaryOp, lhs: &Operand, rhs: &Operand) -> Operand {
    match op {
        BinaryOp::Add if is_primitive(lhs) && is_primitive(rhs) => {
            Operand::Number(lhs.to_number() + rhs.to_number())
        }
        BinaryOp::Add => Operand::Str(format!("{}{}", lhs.to_text(), rhs.to_text())),
        BinaryOp::Sub => Operand::Number(lhs.to_number() - rhs.to_number()),
        BinaryOp::Mul => Operand::Number(lhs.to_number() * rhs.to_number()),
        BinaryOp::Div => Operand::Number(lhs.to_number() / rhs.to_number()),
        BinaryOp::Rem => Operand::Number(lhs.to_number() % rhs.to_number()),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            Operand::Bool(relational(op, lhs, rhs))
        }
        BinaryOp::LooseEq => Operand::Bool(lhs.loose_eq(rhs)),
        BinaryOp::LooseNe => Operand::Bool(!lhs.loose_eq(rhs)),
        BinaryOp::StrictEq => Operand::Bool(lhs.strict_eq(rhs)),
        BinaryOp::StrictNe => Operand::Bool(!lhs.strict_eq(rhs)),
    }
}

/// Operands that `+` adds numerically rather than concatenating.
fn is_primitive(operand: &Operand) -> bool {
    matches!(
        operand,
        Operand::Number(_) | Operand::Bool(_) | Operand::Null | Operand::Undefined
    )
}

fn relational(op: BinaryOp, lhs: &Operand, rhs: &Operand) -> bool {
    if let (Operand::Str(a), Operand::Str(b)) = (lhs, rhs) {
        return match op {
            BinaryOp::Lt => a < b,
            BinaryOp::Le => a <= b,
            BinaryOp::Gt => a > b,
            _ => a >= b,
        };
    }

    let (a, b) = (lhs.to_number(), rhs.to_number());
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::Le => a <= b,
        BinaryOp::Gt => a > b,
        _ => a >= b,
    }
}

fn member(target: &Operand, name: &str) -> Result<Operand, EvalError> {
    match target {
        Operand::Undefined | Operand::Null => Err(EvalError::Type(format!(
            "cannot read property '{}' of {}",
            name,
            target.to_text()
        ))),
        Operand::Str(s) if name == "length" => Ok(Operand::Number(s.chars().count() as f64)),
        Operand::Array(items) if name == "length" => Ok(Operand::Number(items.len() as f64)),
        Operand::Array(items) => Ok(name
            .parse::<f64>()
            .map(|n| element(items, n))
            .unwrap_or(Operand::Undefined)),
        Operand::Object(map) => Ok(map.get(name).map(Operand::from).unwrap_or(Operand::Undefined)),
        _ => Ok(Operand::Undefined),
    }
}

fn element(items: &[Value], index: f64) -> Operand {
    if index < 0.0 || index.fract() != 0.0 {
        return Operand::Undefined;
    }
    items
        .get(index as usize)
        .map(Operand::from)
        .unwrap_or(Operand::Undefined)
}

fn char_at(s: &str, index: f64) -> Operand {
    if index < 0.0 || index.fract() != 0.0 {
        return Operand::Undefined;
    }
    s.chars()
        .nth(index as usize)
        .map(|c| Operand::Str(c.to_string()))
        .unwrap_or(Operand::Undefined)
}

fn call(target: &Operand, method: &str, args: &[Operand]) -> Result<Operand, EvalError> {
    let arg = args.first().cloned().unwrap_or(Operand::Undefined);

    match (target, method) {
        (Operand::Str(s), "includes") => Ok(Operand::Bool(s.contains(&arg.to_text()))),
        (Operand::Str(s), "startsWith") => Ok(Operand::Bool(s.starts_with(&arg.to_text()))),
        (Operand::Str(s), "endsWith") => Ok(Operand::Bool(s.ends_with(&arg.to_text()))),
        (Operand::Str(s), "indexOf") => Ok(Operand::Number(
            s.find(&arg.to_text())
                .map(|byte| s[..byte].chars().count() as f64)
                .unwrap_or(-1.0),
        )),
        (Operand::Array(items), "includes") => Ok(Operand::Bool(
            items.iter().any(|item| Operand::from(item).strict_eq(&arg)),
        )),
        (Operand::Array(items), "indexOf") => Ok(Operand::Number(
            items
                .iter()
                .position(|item| Operand::from(item).strict_eq(&arg))
                .map(|i| i as f64)
                .unwrap_or(-1.0),
        )),
        _ => Err(EvalError::Type(format!(
            "{}.{} is not a function",
            target.type_name(),
            method
        ))),
    }
}

fn to_json(operand: Operand) -> Value {
    match operand {
        Operand::Undefined | Operand::Null => Value::Null,
        Operand::Bool(b) => Value::Bool(b),
        Operand::Number(n) => serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Operand::Str(s) => Value::String(s),
        Operand::Array(items) => Value::Array(items),
        Operand::Object(map) => Value::Object(map),
    }
}
