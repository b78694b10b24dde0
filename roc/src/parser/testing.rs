//! Testing utilities for parser(s).

use std::fmt::Debug;

use super::combinators;
use super::module;
use crate::ast::Program;
use crate::errors::*;
use crate::lexer::Lexer;
use crate::source::{Input, SourceCode};

fn create_input(code: &str) -> Input {
  let source = SourceCode::from_str(code);

  match Lexer::new(&source).lex() {
    | Ok(tokens) => Input::new(tokens),
    | Err(error) => panic!("lexing failed: {}", error.summary()),
  }
}

fn describe(code: &str, error: ParseError) -> String {
  LangError::Parser(SourceCode::from_str(code), error).summary()
}

/// Parses the whole `code` with `func` or panics with the error.
pub fn parse<F, T>(func: F, code: &str) -> T
where
  F: Fn(Input) -> Result<(T, Input), ParseError>,
{
  combinators::complete(&func, create_input(code))
    .unwrap_or_else(|error| panic!("{code:?} failed: {}", describe(code, error)))
}

/// Parses a whole module, collecting every error instead of stopping at the first.
pub fn parse_program(code: &str) -> (Program, Vec<ParseError>) {
  module::parse_program(create_input(code))
}

pub fn assert_eq<F, T: Debug + PartialEq>(func: F, code: &str, expected: T)
where
  F: Fn(Input) -> Result<(T, Input), ParseError>,
{
  assert_eq!(parse(func, code), expected, "parsing {code:?}");
}

pub fn is_ok<F, T: Debug>(func: F, code: &str)
where
  F: Fn(Input) -> Result<(T, Input), ParseError>,
{
  parse(func, code);
}

pub fn is_err<F, T: Debug>(func: F, code: &str)
where
  F: Fn(Input) -> Result<(T, Input), ParseError>,
{
  if let Ok(result) = combinators::complete(&func, create_input(code)) {
    panic!("{code:?} unexpectedly parsed as {result:?}");
  }
}
