use std::rc::Rc;

use crate::ast::Loc;
use crate::lexer::{SpannedToken, Token};

/// Immutable cursor over a token stream. Advancing produces a new cursor, so parse functions
/// can backtrack by simply keeping the old one around.
#[derive(PartialEq, Debug, Clone)]
pub struct Input {
  raw: Rc<RawInput>,
  cursor: usize,
}

#[derive(PartialEq, Debug, Clone)]
struct RawInput {
  tokens: Vec<SpannedToken>,
}

impl Input {
  /// The token list must end with [Token::Eof], which the lexer guarantees.
  pub fn new(tokens: Vec<SpannedToken>) -> Self {
    Input {
      raw: Rc::new(RawInput { tokens }),
      cursor: 0,
    }
  }

  pub fn next(&self) -> Input {
    Input {
      raw: Rc::clone(&self.raw),
      cursor: (self.cursor + 1).min(self.last()),
    }
  }

  pub fn read(&self) -> Token {
    self.raw.tokens[self.cursor].token.clone()
  }

  /// Looks `n` tokens ahead without consuming anything.
  pub fn peek(&self, n: usize) -> Token {
    let cursor = (self.cursor + n).min(self.last());
    self.raw.tokens[cursor].token.clone()
  }

  pub fn loc(&self) -> Loc {
    self.raw.tokens[self.cursor].loc
  }

  pub fn at_end(&self) -> bool {
    self.read() == Token::Eof
  }

  fn last(&self) -> usize {
    self.raw.tokens.len().saturating_sub(1)
  }
}
