use thiserror::Error;

use super::helpers::report_at;
use super::{ReportBuilder, Reportable};
use crate::ast::Loc;
use crate::source::SourceCode;

#[derive(PartialEq, Debug, Clone, Error)]
pub enum LexicalError {
  #[error("Unexpected character '{found}'")]
  UnexpectedCharacter { loc: Loc, found: char },
  #[error("Unterminated string literal")]
  UnterminatedString { loc: Loc },
  #[error("Invalid string escape '\\{found}'")]
  InvalidEscape { loc: Loc, found: char },
  #[error("Integer literal {literal} is out of range")]
  IntegerOutOfRange { loc: Loc, literal: String },
}

impl LexicalError {
  pub fn loc(&self) -> Loc {
    *match self {
      | LexicalError::UnexpectedCharacter { loc, .. } => loc,
      | LexicalError::UnterminatedString { loc } => loc,
      | LexicalError::InvalidEscape { loc, .. } => loc,
      | LexicalError::IntegerOutOfRange { loc, .. } => loc,
    }
  }
}

impl<'a> Reportable<'a> for LexicalError {
  fn report(&'a self, source: &'a SourceCode) -> ReportBuilder<'a> {
    let report = report_at(source, "LexError", self.loc(), self);

    match self {
      | LexicalError::InvalidEscape { .. } => {
        report.with_note("supported escapes are \\n \\t \\r \\\\ \\\" \\0")
      },
      | LexicalError::IntegerOutOfRange { .. } => {
        report.with_note(format!("integers are 64-bit, the largest is {}", i64::MAX))
      },
      | _ => report,
    }
  }
}
