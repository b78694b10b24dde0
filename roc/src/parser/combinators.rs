use crate::errors::*;
use crate::lexer::Token;
use crate::source::Input;

pub fn expect(expected: Token, input: Input) -> Result<Input, ParseError> {
  if expected == input.read() {
    Ok(input.next())
  } else {
    Err(ParseError::Expected {
      loc: input.loc(),
      expected,
      found: input.read(),
    })
  }
}

pub fn expect_ident(input: Input) -> Result<(String, Input), ParseError> {
  if let Token::Ident(name) = input.read() {
    Ok((name, input.next()))
  } else {
    Err(ParseError::ExpectedIdent {
      loc: input.loc(),
      found: input.read(),
    })
  }
}

/// Consumes `token` if it is next, reporting whether it did.
pub fn accept(token: Token, input: Input) -> (bool, Input) {
  if token == input.read() {
    (true, input.next())
  } else {
    (false, input)
  }
}

/// Comma separated items up to (and including) the `close` token. A trailing comma is
/// allowed.
pub fn comma0<T, F>(func: &F, close: Token, input: Input) -> Result<(Vec<T>, Input), ParseError>
where
  F: Fn(Input) -> Result<(T, Input), ParseError>,
{
  let mut acc: Vec<T> = vec![];
  let mut input = input;

  loop {
    if input.read() == close {
      return Ok((acc, input.next()));
    }

    let (item, rest) = func(input)?;
    acc.push(item);

    match rest.read() {
      | Token::Comma => input = rest.next(),
      | _ => {
        let input = expect(close, rest)?;
        return Ok((acc, input));
      },
    }
  }
}

pub fn many0<T, F>(func: &F, mut input: Input) -> Result<(Vec<T>, Input), ParseError>
where
  F: Fn(Input) -> Result<(T, Input), ParseError>,
{
  let mut acc: Vec<T> = vec![];

  while let Ok(pair) = func(input.clone()) {
    let (result, input_next) = pair;
    input = input_next;

    acc.push(result);
  }

  Ok((acc, input))
}

pub fn optional<T, F>(func: &F, input: Input) -> (Option<T>, Input)
where
  F: Fn(Input) -> Result<(T, Input), ParseError>,
{
  match func(input.clone()) {
    | Ok((result, input)) => (Some(result), input),
    | Err(_) => (None, input),
  }
}

pub fn complete<T, F>(func: &F, input: Input) -> Result<T, ParseError>
where
  F: Fn(Input) -> Result<(T, Input), ParseError>,
{
  let (result, input): (T, Input) = func(input)?;

  expect(Token::Eof, input)?;

  Ok(result)
}
