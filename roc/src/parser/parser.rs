use super::module;
use crate::ast::*;
use crate::errors::*;
use crate::lexer::Lexer;
use crate::source::{Input, SourceCode};

pub struct Parser {
  code: SourceCode,
  lexer: Lexer,
}

/// The `clone`s below are cheap since `SourceCode` is wrapped into an `Arc`.
impl Parser {
  pub fn new(lexer: Lexer) -> Self {
    Parser {
      code: lexer.source(),
      lexer,
    }
  }

  pub fn from_source(code: &SourceCode) -> Self {
    Parser::new(Lexer::new(code))
  }

  /// Parses a whole module. With several parse errors the result is a [LangError::List].
  pub fn parse_program(&mut self) -> Result<Program, LangError> {
    let (program, errors) = module::parse_program(self.fresh_input()?);

    let mut errors = errors
      .into_iter()
      .map(|error| LangError::Parser(self.code.clone(), error))
      .collect::<Vec<_>>();

    match errors.len() {
      | 0 => Ok(program),
      | 1 => Err(errors.remove(0)),
      | _ => Err(LangError::List(errors)),
    }
  }

  fn fresh_input(&mut self) -> Result<Input, LangError> {
    let input = Input::new(self.lexer.lex()?);

    Ok(input)
  }
}
