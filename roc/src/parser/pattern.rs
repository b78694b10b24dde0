use crate::ast::Pattern;
use crate::errors::*;
use crate::lexer::Token;
use crate::source::Input;

pub fn parse_pattern(input: Input) -> Result<(Pattern, Input), ParseError> {
  let loc = input.loc();

  let pattern = match input.read() {
    | Token::Underscore => Pattern::Wildcard(loc),
    | Token::LitInt(value) => Pattern::Int(loc, value),
    | Token::LitString(value) => Pattern::String(loc, value),
    | Token::LitBool(value) => Pattern::Bool(loc, value),
    | Token::Minus => {
      let input = input.next();

      return match input.read() {
        | Token::LitInt(value) => Ok((Pattern::Int(loc, -value), input.next())),
        | found => {
          Err(ParseError::ExpectedPattern {
            loc: input.loc(),
            found,
          })
        },
      };
    },
    | found => return Err(ParseError::ExpectedPattern { loc, found }),
  };

  Ok((pattern, input.next()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::Loc;
  use crate::parser::testing;

  #[test]
  fn test_literal_patterns() {
    let loc = Loc::default();

    testing::assert_eq(parse_pattern, "_", Pattern::Wildcard(loc));
    testing::assert_eq(parse_pattern, "42", Pattern::Int(loc, 42));
    testing::assert_eq(parse_pattern, "-3", Pattern::Int(loc, -3));
    testing::assert_eq(parse_pattern, "\"one\"", Pattern::String(loc, "one".to_string()));
    testing::assert_eq(parse_pattern, "false", Pattern::Bool(loc, false));
  }

  #[test]
  fn test_invalid_patterns() {
    testing::is_err(parse_pattern, "x");
    testing::is_err(parse_pattern, "- x");
    testing::is_err(parse_pattern, "[1]");
  }
}
