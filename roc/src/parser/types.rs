use super::combinators;
use crate::ast::TypeRef;
use crate::errors::*;
use crate::lexer::Token;
use crate::source::Input;

/// Type annotation: `Name` or `module.Name`.
pub fn parse_type(input: Input) -> Result<(TypeRef, Input), ParseError> {
  let loc = input.loc();
  let (first, input) = combinators::expect_ident(input)?;

  if let Token::Dot = input.read() {
    let (name, input) = combinators::expect_ident(input.next())?;

    return Ok((
      TypeRef {
        loc,
        module: Some(first),
        name,
      },
      input,
    ));
  }

  Ok((
    TypeRef {
      loc,
      module: None,
      name: first,
    },
    input,
  ))
}

/// Optional `: Type` suffix.
pub fn parse_annotation(input: Input) -> Result<(Option<TypeRef>, Input), ParseError> {
  match input.read() {
    | Token::Colon => {
      let (type_ref, input) = parse_type(input.next())?;
      Ok((Some(type_ref), input))
    },
    | _ => Ok((None, input)),
  }
}
