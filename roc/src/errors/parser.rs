use thiserror::Error;

use super::helpers::report_at;
use super::{ReportBuilder, Reportable};
use crate::ast::Loc;
use crate::lexer::Token;
use crate::source::SourceCode;

#[derive(PartialEq, Debug, Clone, Error)]
pub enum ParseError {
  #[error("Expected '{expected}', found '{found}'")]
  Expected {
    loc: Loc,
    expected: Token,
    found: Token,
  },
  #[error("Expected identifier, found '{found}'")]
  ExpectedIdent { loc: Loc, found: Token },
  #[error("Expected expression, found '{found}'")]
  ExpectedExpression { loc: Loc, found: Token },
  #[error("Expected pattern, found '{found}'")]
  ExpectedPattern { loc: Loc, found: Token },
  #[error("Expected '..' or '..=', found '{found}'")]
  ExpectedRange { loc: Loc, found: Token },
  #[error("Expected 'fn', 'enum', 'import' or 'export', found '{found}'")]
  ExpectedItem { loc: Loc, found: Token },
}

impl ParseError {
  pub fn loc(&self) -> Loc {
    *match self {
      | ParseError::Expected { loc, .. } => loc,
      | ParseError::ExpectedIdent { loc, .. } => loc,
      | ParseError::ExpectedExpression { loc, .. } => loc,
      | ParseError::ExpectedPattern { loc, .. } => loc,
      | ParseError::ExpectedRange { loc, .. } => loc,
      | ParseError::ExpectedItem { loc, .. } => loc,
    }
  }
}

impl<'a> Reportable<'a> for ParseError {
  fn report(&'a self, source: &'a SourceCode) -> ReportBuilder<'a> {
    let report = report_at(source, "ParseError", self.loc(), self);

    match self {
      | ParseError::Expected {
        expected: Token::Semicolon,
        ..
      } => report.with_note("statements end with ';'"),
      | ParseError::ExpectedPattern { .. } => {
        report.with_note("match patterns are integer, string or boolean literals, or '_'")
      },
      | _ => report,
    }
  }
}
