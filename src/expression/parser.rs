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

use super::lexer::Token;
use super::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Not,
    Negate,
    Plus,
    TypeOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    LooseEq,
    LooseNe,
    StrictEq,
    StrictNe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(Literal),
    /// The only identifier in scope: the value under test.
    Subject,
    Array(Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Logical(LogicalOp, Box<Expr>, Box<Expr>),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Call(Box<Expr>, String, Vec<Expr>),
}

/// How deep groups, array literals, indexes, call arguments and unary
/// operators may nest.
const MAX_DEPTH: usize = 64;

/// Longest accepted token stream. Operator chains build trees as deep as
/// they are long, and the interpreter walks them recursively.
const MAX_TOKENS: usize = 1024;

/// Recursive descent over the token stream, lowest precedence first.
pub(crate) struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    subject: &'a str,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token], subject: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            subject,
            depth: 0,
        }
    }

    pub(crate) fn parse(mut self) -> Result<Expr, EvalError> {
        if self.tokens.len() > MAX_TOKENS {
            return Err(EvalError::Syntax(format!(
                "expression longer than {} tokens",
                MAX_TOKENS
            )));
        }

        let expr = self.or()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(EvalError::Syntax(format!("unexpected token {:?}", token))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, expected: Token) -> Result<(), EvalError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(EvalError::Syntax(format!(
                "expected {:?} but found {:?}",
                expected,
                self.peek()
            )))
        }
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, EvalError>,
    ) -> Result<T, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::Syntax("expression nested too deeply".to_string()));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn or(&mut self) -> Result<Expr, EvalError> {
        self.nested(Self::logical_or)
    }

    fn logical_or(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.and()?;
        while self.eat(&Token::Or) {
            let rhs = self.and()?;
            lhs = Expr::Logical(LogicalOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.equality()?;
        while self.eat(&Token::And) {
            let rhs = self.equality()?;
            lhs = Expr::Logical(LogicalOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.relational()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinaryOp::LooseEq,
                Some(Token::NotEq) => BinaryOp::LooseNe,
                Some(Token::EqEqEq) => BinaryOp::StrictEq,
                Some(Token::NotEqEq) => BinaryOp::StrictNe,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.relational()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn relational(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.additive()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn additive(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek() {
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Minus) => UnaryOp::Negate,
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Ident(name)) if name == "typeof" => UnaryOp::TypeOf,
            _ => return self.postfix(),
        };
        self.pos += 1;
        let operand = self.nested(Self::unary)?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn postfix(&mut self) -> Result<Expr, EvalError> {
        let mut expr = self.primary()?;
        loop {
            if self.eat(&Token::Dot) {
                let name = match self.next() {
                    Some(Token::Ident(name)) => name.clone(),
                    other => {
                        return Err(EvalError::Syntax(format!(
                            "expected property name but found {:?}",
                            other
                        )))
                    }
                };

                if self.eat(&Token::LParen) {
                    let args = self.arguments(Token::RParen)?;
                    expr = Expr::Call(Box::new(expr), name, args);
                } else {
                    expr = Expr::Member(Box::new(expr), name);
                }
            } else if self.eat(&Token::LBracket) {
                let index = self.or()?;
                self.expect(Token::RBracket)?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                return Ok(expr);
            }
        }
    }

    fn arguments(&mut self, close: Token) -> Result<Vec<Expr>, EvalError> {
        let mut args = vec![];
        if self.eat(&close) {
            return Ok(args);
        }
        loop {
            args.push(self.or()?);
            if self.eat(&close) {
                return Ok(args);
            }
            self.expect(Token::Comma)?;
        }
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let subject = self.subject;
        let token = self
            .next()
            .cloned()
            .ok_or_else(|| EvalError::Syntax("unexpected end of expression".to_string()))?;

        match token {
            Token::Number(n) => Ok(Expr::Literal(Literal::Number(n))),
            Token::Str(s) => Ok(Expr::Literal(Literal::Str(s))),
            Token::LParen => {
                let inner = self.or()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::LBracket => Ok(Expr::Array(self.arguments(Token::RBracket)?)),
            Token::Ident(name) => match name.as_str() {
                "true" => Ok(Expr::Literal(Literal::Bool(true))),
                "false" => Ok(Expr::Literal(Literal::Bool(false))),
                "null" => Ok(Expr::Literal(Literal::Null)),
                "undefined" => Ok(Expr::Literal(Literal::Undefined)),
                _ if name == subject => Ok(Expr::Subject),
                _ => Err(EvalError::UnknownIdentifier(name)),
            },
            other => Err(EvalError::Syntax(format!("unexpected token {:?}", other))),
        }
    }
}
