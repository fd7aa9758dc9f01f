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

//! A small, side-effect free expression language for expected values.
//!
//! An expected string such as `$V > 10 && $V % 2 == 0` is evaluated with
//! the placeholder bound to the actual value. Only comparisons, arithmetic,
//! logical operators, member/index access and a handful of read-only string
//! and array methods are understood; there is no way to reach anything
//! except the value under test.

mod interpreter;
mod lexer;
mod parser;

use serde_json::Value;
use thiserror::Error;

use interpreter::Operand;

/// The identifier the placeholder is rewritten to before parsing.
const SUBJECT: &str = "__subject__";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("type error: {0}")]
    Type(String),
}

/// Evaluates `expression` with every occurrence of `placeholder` bound to
/// `actual`.
///
/// Only a result of exactly `true` fulfils the expression; any other
/// value, truthy or not, does not.
///
/// # Examples
///
/// ```
/// use json_expect::expression;
/// use serde_json::json;
///
/// assert_eq!(expression::evaluate("$V.length > 1", "$V", &json!([1, 2])), Ok(true));
/// assert_eq!(expression::evaluate("$V > 1", "$V", &json!(1)), Ok(false));
/// assert!(expression::evaluate("$V >", "$V", &json!(1)).is_err());
/// ```
pub fn evaluate(expression: &str, placeholder: &str, actual: &Value) -> Result<bool, EvalError> {
    let source = expression.replace(placeholder, SUBJECT);
    let tokens = lexer::tokenize(&source)?;
    let expr = parser::Parser::new(&tokens, SUBJECT).parse()?;

    Ok(interpreter::evaluate(&expr, actual)? == Operand::Bool(true))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_custom_placeholder() {
        assert_eq!(evaluate("{v} >= 3", "{v}", &json!(3)), Ok(true));
        assert_eq!(evaluate("{v}.length === 0", "{v}", &json!("")), Ok(true));
    }

    #[test]
    fn test_only_true_fulfils() {
        assert_eq!(evaluate("$V", "$V", &json!(1)), Ok(false));
        assert_eq!(evaluate("$V", "$V", &json!(true)), Ok(true));
        assert_eq!(evaluate("'true'", "$V", &json!(null)), Ok(false));
    }

    #[test]
    fn test_no_outer_scope() {
        assert_eq!(
            evaluate("$V === globalThis", "$V", &json!(1)),
            Err(EvalError::UnknownIdentifier("globalThis".to_string()))
        );
    }
}
