use super::combinators;
use super::expression;
use super::types;
use crate::ast::*;
use crate::errors::*;
use crate::lexer::Token;
use crate::source::Input;

pub fn parse_block(input: Input) -> Result<(Block, Input), ParseError> {
  let loc = input.loc();
  let mut input = combinators::expect(Token::LeftBrace, input)?;
  let mut statements = vec![];

  loop {
    match input.read() {
      | Token::RightBrace => break,
      | Token::Eof => {
        return Err(ParseError::Expected {
          loc: input.loc(),
          expected: Token::RightBrace,
          found: Token::Eof,
        });
      },
      | _ => {
        let (statement, rest) = parse_statement(input)?;

        statements.push(statement);
        input = rest;
      },
    }
  }

  Ok((Block::new(loc, statements), input.next()))
}

pub fn parse_statement(input: Input) -> Result<(Statement, Input), ParseError> {
  let loc = input.loc();

  match input.read() {
    | Token::LetKw => parse_let(input),
    | Token::SetKw => parse_set(input),
    | Token::ForKw => parse_for(input),
    | Token::WhileKw => parse_while(input),
    | Token::BreakKw => {
      let input = combinators::expect(Token::Semicolon, input.next())?;
      Ok((Statement::Break(loc), input))
    },
    | Token::ContinueKw => {
      let input = combinators::expect(Token::Semicolon, input.next())?;
      Ok((Statement::Continue(loc), input))
    },
    | Token::ReturnKw => {
      let (expr, input) = expression::parse_expr(input.next())?;
      let input = combinators::expect(Token::Semicolon, input)?;

      Ok((Statement::Return(loc, expr), input))
    },
    | _ => {
      let (expr, input) = expression::parse_expr(input)?;
      let input = combinators::expect(Token::Semicolon, input)?;

      Ok((Statement::Expression(loc, expr), input))
    },
  }
}

fn parse_let(input: Input) -> Result<(Statement, Input), ParseError> {
  let loc = input.loc();
  let input = combinators::expect(Token::LetKw, input)?;

  let (name, input) = combinators::expect_ident(input)?;
  let (type_ann, input) = types::parse_annotation(input)?;
  let input = combinators::expect(Token::Equals, input)?;
  let (expr, input) = expression::parse_expr(input)?;
  let input = combinators::expect(Token::Semicolon, input)?;

  Ok((Statement::Let(loc, name, type_ann, expr), input))
}

fn parse_set(input: Input) -> Result<(Statement, Input), ParseError> {
  let loc = input.loc();
  let input = combinators::expect(Token::SetKw, input)?;

  let (name, input) = combinators::expect_ident(input)?;
  let input = combinators::expect(Token::Equals, input)?;
  let (expr, input) = expression::parse_expr(input)?;
  let input = combinators::expect(Token::Semicolon, input)?;

  Ok((Statement::Set(loc, name, expr), input))
}

fn parse_for(input: Input) -> Result<(Statement, Input), ParseError> {
  let loc = input.loc();
  let input = combinators::expect(Token::ForKw, input)?;

  let (variable, input) = combinators::expect_ident(input)?;
  let input = combinators::expect(Token::InKw, input)?;
  let (start, input) = expression::parse_expr(input)?;

  let inclusive = match input.read() {
    | Token::DoubleDot => false,
    | Token::DoubleDotEquals => true,
    | found => {
      return Err(ParseError::ExpectedRange {
        loc: input.loc(),
        found,
      })
    },
  };

  let (end, input) = expression::parse_expr(input.next())?;

  let (step, input) = match input.read() {
    | Token::ByKw => {
      let (step, input) = expression::parse_expr(input.next())?;
      (Some(step), input)
    },
    | _ => (None, input),
  };

  let (body, input) = parse_block(input)?;

  let for_loop = ForLoop {
    variable,
    start,
    end,
    inclusive,
    step,
    body,
  };

  Ok((Statement::For(loc, Box::new(for_loop)), input))
}

fn parse_while(input: Input) -> Result<(Statement, Input), ParseError> {
  let loc = input.loc();
  let input = combinators::expect(Token::WhileKw, input)?;

  let (cond, input) = expression::parse_expr(input)?;
  let (body, input) = parse_block(input)?;

  Ok((Statement::While(loc, cond, body), input))
}
