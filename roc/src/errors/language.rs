use ariadne::Source;
use indoc::formatdoc;
use thiserror::Error;

use super::*;
use crate::ast::Loc;
use crate::source::SourceCode;

#[derive(PartialEq, Debug, Clone, Error)]
pub enum LangError {
  #[error("{1}")]
  Lexer(SourceCode, LexicalError),
  #[error("{1}")]
  Parser(SourceCode, ParseError),
  #[error("{0}")]
  Loader(LoaderError),
  #[error("{1}")]
  Typechecker(SourceCode, TypeError),
  #[error("{1}")]
  Interpreter(Option<SourceCode>, InterpreterError),
  #[error("{}", first_message(.0))]
  List(Vec<LangError>),
}

fn first_message(errors: &[LangError]) -> String {
  errors
    .first()
    .map(|error| error.to_string())
    .unwrap_or_default()
}

impl LangError {
  /// Error kind label, in the order a run can hit them.
  pub fn kind(&self) -> &'static str {
    match self {
      | LangError::Lexer(..) => "LexError",
      | LangError::Parser(..) => "ParseError",
      | LangError::Loader(_) => "ImportError",
      | LangError::Typechecker(..) => "TypeError",
      | LangError::Interpreter(..) => "RuntimeError",
      | LangError::List(errors) => errors.first().map_or("ParseError", LangError::kind),
    }
  }

  pub fn loc(&self) -> Option<Loc> {
    match self {
      | LangError::Lexer(_, error) => Some(error.loc()),
      | LangError::Parser(_, error) => Some(error.loc()),
      | LangError::Loader(error) => error.site().map(|site| site.loc),
      | LangError::Typechecker(_, error) => Some(error.loc()),
      | LangError::Interpreter(_, error) => error.loc(),
      | LangError::List(errors) => errors.first().and_then(LangError::loc),
    }
  }

  pub fn source_code(&self) -> Option<&SourceCode> {
    match self {
      | LangError::Lexer(source, _) => Some(source),
      | LangError::Parser(source, _) => Some(source),
      | LangError::Loader(error) => error.site().map(|site| &site.importer),
      | LangError::Typechecker(source, _) => Some(source),
      | LangError::Interpreter(source, _) => source.as_ref(),
      | LangError::List(errors) => errors.first().and_then(LangError::source_code),
    }
  }

  /// Flattens [LangError::List] into its members.
  pub fn errors(&self) -> Vec<&LangError> {
    match self {
      | LangError::List(errors) => errors.iter().flat_map(LangError::errors).collect(),
      | error => vec![error],
    }
  }

  /// One-line rendering: `<kind>: <message> at <file>:<line>:<column>`.
  pub fn summary(&self) -> String {
    match (self.source_code(), self.loc()) {
      | (Some(source), Some(loc)) => {
        format!("{}: {} at {}:{}", self.kind(), self, source.file_path(), loc)
      },
      | _ => format!("{}: {}", self.kind(), self),
    }
  }

  /// Renders the error(s) to stderr. Without `all`, only the first of several parse errors is
  /// shown.
  pub fn eprint(&self, all: bool) {
    let errors = self.errors();
    let shown = if all { errors.len() } else { 1 };

    for error in errors.iter().take(shown) {
      error.eprint_single();
    }

    if !all && errors.len() > 1 {
      eprint!(
        "{}",
        formatdoc! {"
          ... and {hidden} more error(s)
          use --all-errors to show every error
        ", hidden = errors.len() - 1}
      );
    }
  }

  fn eprint_single(&self) {
    let report = match self {
      | LangError::Lexer(source, error) => Some((source, error.report(source))),
      | LangError::Parser(source, error) => Some((source, error.report(source))),
      | LangError::Loader(error) => {
        error
          .site()
          .map(|site| (&site.importer, error.report(&site.importer)))
      },
      | LangError::Typechecker(source, error) => Some((source, error.report(source))),
      | LangError::Interpreter(Some(source), error) if error.loc().is_some() => {
        Some((source, error.report(source)))
      },
      | _ => None,
    };

    match report {
      | Some((source, report)) => {
        let printed = report
          .finish()
          .eprint((source.file_path(), Source::from(source.as_str())));

        if printed.is_err() {
          eprintln!("{}", self.summary());
        }
      },
      | None => eprintln!("{}", self.summary()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_summary() {
    let source = SourceCode::from_string("fn main() { x; }".to_string(), "main.roc");
    let error = LangError::Typechecker(
      source,
      TypeError::UndefinedVariable {
        loc: Loc::new(1, 13),
        name: "x".to_string(),
      },
    );

    assert_eq!(error.kind(), "TypeError");
    assert_eq!(
      error.summary(),
      "TypeError: Undefined variable 'x' at main.roc:1:13"
    );
  }

  #[test]
  fn test_summary_without_location() {
    let error = LangError::Interpreter(None, InterpreterError::MissingMain);

    assert_eq!(error.summary(), "RuntimeError: No 'main' function defined");
    assert_eq!(error.loc(), None);
  }

  #[test]
  fn test_list() {
    let source = SourceCode::from_str("x y");
    let first = LangError::Parser(
      source.clone(),
      ParseError::ExpectedItem {
        loc: Loc::new(1, 1),
        found: crate::lexer::Token::Ident("x".to_string()),
      },
    );
    let second = LangError::Parser(
      source,
      ParseError::ExpectedItem {
        loc: Loc::new(1, 3),
        found: crate::lexer::Token::Ident("y".to_string()),
      },
    );
    let error = LangError::List(vec![first.clone(), second]);

    assert_eq!(error.kind(), "ParseError");
    assert_eq!(error.to_string(), first.to_string());
    assert_eq!(error.errors().len(), 2);
    assert_eq!(error.loc(), Some(Loc::new(1, 1)));
  }
}
