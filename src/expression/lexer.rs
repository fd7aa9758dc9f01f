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

use super::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    And,
    Or,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, EvalError> {
    let chars = source.chars().collect::<Vec<_>>();
    let mut tokens = vec![];
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && chars.get(pos + 1).is_some_and(|n| n.is_ascii_digit())) {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                pos += 1;
            }
            if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
                pos += 1;
                if pos < chars.len() && (chars[pos] == '+' || chars[pos] == '-') {
                    pos += 1;
                }
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            let literal = chars[start..pos].iter().collect::<String>();
            let number = literal
                .parse::<f64>()
                .map_err(|_| EvalError::Syntax(format!("invalid number '{}'", literal)))?;
            tokens.push(Token::Number(number));
            continue;
        }

        if c == '\'' || c == '"' {
            let (literal, next) = read_string(&chars, pos)?;
            tokens.push(Token::Str(literal));
            pos = next;
            continue;
        }

        if c.is_alphabetic() || c == '_' || c == '$' {
            let start = pos;
            while pos < chars.len()
                && (chars[pos].is_alphanumeric() || chars[pos] == '_' || chars[pos] == '$')
            {
                pos += 1;
            }
            tokens.push(Token::Ident(chars[start..pos].iter().collect()));
            continue;
        }

        let rest = |n: usize| chars[pos..(pos + n).min(chars.len())].iter().collect::<String>();
        let (token, width) = match rest(3).as_str() {
            "===" => (Token::EqEqEq, 3),
            "!==" => (Token::NotEqEq, 3),
            _ => match rest(2).as_str() {
                "==" => (Token::EqEq, 2),
                "!=" => (Token::NotEq, 2),
                "<=" => (Token::Le, 2),
                ">=" => (Token::Ge, 2),
                "&&" => (Token::And, 2),
                "||" => (Token::Or, 2),
                _ => match c {
                    '(' => (Token::LParen, 1),
                    ')' => (Token::RParen, 1),
                    '[' => (Token::LBracket, 1),
                    ']' => (Token::RBracket, 1),
                    '.' => (Token::Dot, 1),
                    ',' => (Token::Comma, 1),
                    '+' => (Token::Plus, 1),
                    '-' => (Token::Minus, 1),
                    '*' => (Token::Star, 1),
                    '/' => (Token::Slash, 1),
                    '%' => (Token::Percent, 1),
                    '!' => (Token::Bang, 1),
                    '<' => (Token::Lt, 1),
                    '>' => (Token::Gt, 1),
                    other => {
                        return Err(EvalError::Syntax(format!(
                            "unexpected character '{}'",
                            other
                        )))
                    }
                },
            },
        };

        tokens.push(token);
        pos += width;
    }

    Ok(tokens)
}

fn read_string(chars: &[char], start: usize) -> Result<(String, usize), EvalError> {
    let quote = chars[start];
    let mut literal = String::new();
    let mut pos = start + 1;

    while pos < chars.len() {
        match chars[pos] {
            '\\' => {
                let escaped = chars
                    .get(pos + 1)
                    .ok_or_else(|| EvalError::Syntax("unterminated string".to_string()))?;
                literal.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => *other,
                });
                pos += 2;
            }
            c if c == quote => return Ok((literal, pos + 1)),
            c => {
                literal.push(c);
                pos += 1;
            }
        }
    }

    Err(EvalError::Syntax("unterminated string".to_string()))
}
