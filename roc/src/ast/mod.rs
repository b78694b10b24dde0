use std::fmt;

pub use expression::*;
pub use module::*;
pub use statement::*;

mod expression;
mod module;
mod statement;

pub type Int = i64;

/// 1-based source location of a token or node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Loc {
  pub line: u32,
  pub column: u32,
}

impl Loc {
  pub fn new(line: u32, column: u32) -> Self {
    Loc { line, column }
  }
}

impl fmt::Display for Loc {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}
