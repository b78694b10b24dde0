use super::combinators;
use super::statement;
use super::types;
use crate::ast::*;
use crate::errors::ParseError;
use crate::lexer::Token;
use crate::source::Input;

/// Parses a whole module. Errors inside a top-level item are collected and parsing resumes
/// at the next item, so every broken item gets reported.
pub fn parse_program(input: Input) -> (Program, Vec<ParseError>) {
  let mut program = Program::default();
  let mut errors = vec![];
  let mut input = input;

  if let Token::ModuleKw = input.read() {
    match parse_module_header(input.clone()) {
      | Ok((name, rest)) => {
        program.module_name = Some(name);
        input = rest;
      },
      | Err(error) => {
        errors.push(error);
        input = recover(input.next());
      },
    }
  }

  while !input.at_end() {
    let result = match input.read() {
      | Token::ImportKw => {
        parse_import(input.clone()).map(|(import, rest)| {
          program.imports.push(import);
          rest
        })
      },
      | Token::ExportKw => {
        parse_exports(input.clone()).map(|(exports, rest)| {
          program.exports.extend(exports);
          rest
        })
      },
      | Token::EnumKw => {
        parse_enum(input.clone()).map(|(enum_def, rest)| {
          program.enums.push(enum_def);
          rest
        })
      },
      | Token::FnKw => {
        parse_function(input.clone()).map(|(function, rest)| {
          program.functions.push(function);
          rest
        })
      },
      | found => {
        Err(ParseError::ExpectedItem {
          loc: input.loc(),
          found,
        })
      },
    };

    match result {
      | Ok(rest) => input = rest,
      | Err(error) => {
        errors.push(error);
        input = recover(input.next());
      },
    }
  }

  (program, errors)
}

/// Skips tokens until something that can start a top-level item.
fn recover(mut input: Input) -> Input {
  while !matches!(
    input.read(),
    Token::FnKw | Token::EnumKw | Token::ImportKw | Token::ExportKw | Token::Eof
  ) {
    input = input.next();
  }

  input
}

/// `module name`, with an optional trailing semicolon.
fn parse_module_header(input: Input) -> Result<(String, Input), ParseError> {
  let input = combinators::expect(Token::ModuleKw, input)?;
  let (name, input) = combinators::expect_ident(input)?;
  let (_, input) = combinators::accept(Token::Semicolon, input);

  Ok((name, input))
}

/// `import name;` or `import name as alias;`
fn parse_import(input: Input) -> Result<(Import, Input), ParseError> {
  let loc = input.loc();
  let input = combinators::expect(Token::ImportKw, input)?;
  let (module, input) = combinators::expect_ident(input)?;

  let (alias, input) = match input.read() {
    | Token::AsKw => {
      let (alias, input) = combinators::expect_ident(input.next())?;
      (Some(alias), input)
    },
    | _ => (None, input),
  };

  let input = combinators::expect(Token::Semicolon, input)?;

  Ok((Import { loc, module, alias }, input))
}

/// `export { a, B, C };`
fn parse_exports(input: Input) -> Result<(Vec<Export>, Input), ParseError> {
  let input = combinators::expect(Token::ExportKw, input)?;
  let input = combinators::expect(Token::LeftBrace, input)?;

  let (exports, input) = combinators::comma0(&parse_export, Token::RightBrace, input)?;
  let (_, input) = combinators::accept(Token::Semicolon, input);

  Ok((exports, input))
}

fn parse_export(input: Input) -> Result<(Export, Input), ParseError> {
  let loc = input.loc();
  let (name, input) = combinators::expect_ident(input)?;

  Ok((Export { loc, name }, input))
}

/// `enum Color { Red, Green }`
fn parse_enum(input: Input) -> Result<(EnumDef, Input), ParseError> {
  let loc = input.loc();
  let input = combinators::expect(Token::EnumKw, input)?;
  let (name, input) = combinators::expect_ident(input)?;
  let input = combinators::expect(Token::LeftBrace, input)?;

  let (variants, input) =
    combinators::comma0(&combinators::expect_ident, Token::RightBrace, input)?;

  Ok((
    EnumDef {
      loc,
      name,
      variants,
    },
    input,
  ))
}

fn parse_function(input: Input) -> Result<(FunctionDef, Input), ParseError> {
  let loc = input.loc();
  let input = combinators::expect(Token::FnKw, input)?;
  let (name, input) = combinators::expect_ident(input)?;
  let input = combinators::expect(Token::LeftParen, input)?;
  let (params, input) = combinators::comma0(&parse_param, Token::RightParen, input)?;

  let (return_type, input) = match input.read() {
    | Token::RightArrow => {
      let (return_type, input) = types::parse_type(input.next())?;
      (Some(return_type), input)
    },
    | _ => (None, input),
  };

  let (body, input) = statement::parse_block(input)?;

  Ok((
    FunctionDef {
      loc,
      name,
      params,
      return_type,
      body,
    },
    input,
  ))
}

fn parse_param(input: Input) -> Result<(Param, Input), ParseError> {
  let loc = input.loc();
  let (name, input) = combinators::expect_ident(input)?;
  let (type_ann, input) = combinators::optional(&parse_param_annotation, input);

  Ok((
    Param {
      loc,
      name,
      type_ann,
    },
    input,
  ))
}

fn parse_param_annotation(input: Input) -> Result<(TypeRef, Input), ParseError> {
  let input = combinators::expect(Token::Colon, input)?;
  types::parse_type(input)
}
