use std::fmt;

use super::{Block, Int, Loc};
use crate::utils::path::qualified_name;

/// Unevaluated expression tree.
#[derive(Debug, Clone)]
pub enum Expression {
  Literal(Loc, Literal),
  Ref(Loc, String),
  Unary(Loc, UnaryOperator, Box<Expression>),
  Binary(Loc, BinaryOperator, Box<Expression>, Box<Expression>),
  If(Loc, Box<Expression>, Block, Block),
  Match(Loc, Box<Expression>, Vec<MatchArm>),
  Call(Loc, Callee, Vec<Expression>),
  Field(Loc, Box<Expression>, String),
  Index(Loc, Box<Expression>, Box<Expression>),
  Record(Loc, Vec<RecordField>),
  List(Loc, Vec<Expression>),
}

impl Expression {
  pub fn get_loc(&self) -> Loc {
    *match self {
      | Expression::Literal(loc, _) => loc,
      | Expression::Ref(loc, _) => loc,
      | Expression::Unary(loc, ..) => loc,
      | Expression::Binary(loc, ..) => loc,
      | Expression::If(loc, ..) => loc,
      | Expression::Match(loc, ..) => loc,
      | Expression::Call(loc, ..) => loc,
      | Expression::Field(loc, ..) => loc,
      | Expression::Index(loc, ..) => loc,
      | Expression::Record(loc, _) => loc,
      | Expression::List(loc, _) => loc,
    }
  }
}

impl PartialEq for Expression {
  fn eq(&self, other: &Expression) -> bool {
    match (self, other) {
      | (Expression::Literal(_, lhs), Expression::Literal(_, rhs)) => lhs == rhs,
      | (Expression::Ref(_, lhs), Expression::Ref(_, rhs)) => lhs == rhs,
      | (Expression::Unary(_, lhs_op, lhs), Expression::Unary(_, rhs_op, rhs)) => {
        lhs_op == rhs_op && lhs == rhs
      },
      | (
        Expression::Binary(_, lhs_op, lhs_left, lhs_right),
        Expression::Binary(_, rhs_op, rhs_left, rhs_right),
      ) => lhs_op == rhs_op && lhs_left == rhs_left && lhs_right == rhs_right,
      | (
        Expression::If(_, lhs_cond, lhs_then, lhs_else),
        Expression::If(_, rhs_cond, rhs_then, rhs_else),
      ) => lhs_cond == rhs_cond && lhs_then == rhs_then && lhs_else == rhs_else,
      | (Expression::Match(_, lhs, lhs_arms), Expression::Match(_, rhs, rhs_arms)) => {
        lhs == rhs && lhs_arms == rhs_arms
      },
      | (Expression::Call(_, lhs, lhs_args), Expression::Call(_, rhs, rhs_args)) => {
        lhs == rhs && lhs_args == rhs_args
      },
      | (Expression::Field(_, lhs, lhs_name), Expression::Field(_, rhs, rhs_name)) => {
        lhs == rhs && lhs_name == rhs_name
      },
      | (Expression::Index(_, lhs, lhs_index), Expression::Index(_, rhs, rhs_index)) => {
        lhs == rhs && lhs_index == rhs_index
      },
      | (Expression::Record(_, lhs), Expression::Record(_, rhs)) => lhs == rhs,
      | (Expression::List(_, lhs), Expression::List(_, rhs)) => lhs == rhs,
      | _ => false,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
  Int(Int),
  String(String),
  Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
  Add,
  Sub,
  Mul,
  Div,
  Eq,
  NotEq,
  Lt,
  LtEq,
  Gt,
  GtEq,
  And,
  Or,
}

impl BinaryOperator {
  /// Binding power, higher binds tighter. All binary operators are left-associative.
  pub fn precedence(&self) -> u8 {
    match self {
      | BinaryOperator::Or => 1,
      | BinaryOperator::And => 2,
      | BinaryOperator::Eq | BinaryOperator::NotEq => 3,
      | BinaryOperator::Lt | BinaryOperator::LtEq | BinaryOperator::Gt | BinaryOperator::GtEq => 4,
      | BinaryOperator::Add | BinaryOperator::Sub => 5,
      | BinaryOperator::Mul | BinaryOperator::Div => 6,
    }
  }
}

impl fmt::Display for BinaryOperator {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let symbol = match self {
      | BinaryOperator::Add => "+",
      | BinaryOperator::Sub => "-",
      | BinaryOperator::Mul => "*",
      | BinaryOperator::Div => "/",
      | BinaryOperator::Eq => "==",
      | BinaryOperator::NotEq => "!=",
      | BinaryOperator::Lt => "<",
      | BinaryOperator::LtEq => "<=",
      | BinaryOperator::Gt => ">",
      | BinaryOperator::GtEq => ">=",
      | BinaryOperator::And => "&&",
      | BinaryOperator::Or => "||",
    };

    write!(f, "{symbol}")
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
  Neg,
  Not,
}

impl fmt::Display for UnaryOperator {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      | UnaryOperator::Neg => write!(f, "-"),
      | UnaryOperator::Not => write!(f, "!"),
    }
  }
}

/// Literal patterns only, plus the `_` wildcard.
#[derive(Debug, Clone)]
pub enum Pattern {
  Int(Loc, Int),
  String(Loc, String),
  Bool(Loc, bool),
  Wildcard(Loc),
}

impl PartialEq for Pattern {
  fn eq(&self, other: &Pattern) -> bool {
    match (self, other) {
      | (Pattern::Int(_, lhs), Pattern::Int(_, rhs)) => lhs == rhs,
      | (Pattern::String(_, lhs), Pattern::String(_, rhs)) => lhs == rhs,
      | (Pattern::Bool(_, lhs), Pattern::Bool(_, rhs)) => lhs == rhs,
      | (Pattern::Wildcard(_), Pattern::Wildcard(_)) => true,
      | _ => false,
    }
  }
}

#[derive(Debug, Clone)]
pub struct MatchArm {
  pub loc: Loc,
  pub pattern: Pattern,
  pub body: Block,
}

impl PartialEq for MatchArm {
  fn eq(&self, other: &MatchArm) -> bool {
    self.pattern == other.pattern && self.body == other.body
  }
}

#[derive(Debug, Clone)]
pub struct RecordField {
  pub loc: Loc,
  pub name: String,
  pub value: Expression,
}

impl PartialEq for RecordField {
  fn eq(&self, other: &RecordField) -> bool {
    self.name == other.name && self.value == other.value
  }
}

/// Call target: `f(...)` or `module.f(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callee {
  pub module: Option<String>,
  pub name: String,
}

impl Callee {
  pub fn local(name: &str) -> Self {
    Callee {
      module: None,
      name: name.to_string(),
    }
  }

  pub fn qualified(module: &str, name: &str) -> Self {
    Callee {
      module: Some(module.to_string()),
      name: name.to_string(),
    }
  }
}

impl fmt::Display for Callee {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", qualified_name(self.module.as_slice(), &self.name))
  }
}
