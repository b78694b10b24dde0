use super::combinators;
use super::pattern;
use super::statement;
use crate::ast::*;
use crate::errors::*;
use crate::lexer::Token;
use crate::source::Input;

pub fn parse_expr(input: Input) -> Result<(Expression, Input), ParseError> {
  match input.read() {
    | Token::IfKw => parse_if(input),
    | Token::MatchKw => parse_match(input),
    | _ => parse_binary(input, 1),
  }
}

/// `if cond { .. } else { .. }`, where `else if ..` nests another conditional in the else
/// block.
fn parse_if(input: Input) -> Result<(Expression, Input), ParseError> {
  let loc = input.loc();
  let input = combinators::expect(Token::IfKw, input)?;

  let (cond, input) = parse_expr(input)?;
  let (then_block, input) = statement::parse_block(input)?;
  let input = combinators::expect(Token::ElseKw, input)?;

  let (else_block, input) = match input.read() {
    | Token::IfKw => {
      let (nested, input) = parse_if(input)?;
      let nested_loc = nested.get_loc();

      (
        Block::new(nested_loc, vec![Statement::Expression(nested_loc, nested)]),
        input,
      )
    },
    | _ => statement::parse_block(input)?,
  };

  Ok((
    Expression::If(loc, Box::new(cond), then_block, else_block),
    input,
  ))
}

fn parse_match(input: Input) -> Result<(Expression, Input), ParseError> {
  let loc = input.loc();
  let input = combinators::expect(Token::MatchKw, input)?;

  let (subject, input) = parse_expr(input)?;
  let mut input = combinators::expect(Token::LeftBrace, input)?;
  let mut arms = vec![];

  while !matches!(input.read(), Token::RightBrace | Token::Eof) {
    let arm_loc = input.loc();
    let (pattern, rest) = pattern::parse_pattern(input)?;
    let rest = combinators::expect(Token::FatRightArrow, rest)?;
    let (body, rest) = statement::parse_block(rest)?;
    let (_, rest) = combinators::accept(Token::Comma, rest);

    arms.push(MatchArm {
      loc: arm_loc,
      pattern,
      body,
    });

    input = rest;
  }

  let input = combinators::expect(Token::RightBrace, input)?;

  Ok((Expression::Match(loc, Box::new(subject), arms), input))
}

fn binary_operator(token: &Token) -> Option<BinaryOperator> {
  let operator = match token {
    | Token::Plus => BinaryOperator::Add,
    | Token::Minus => BinaryOperator::Sub,
    | Token::Star => BinaryOperator::Mul,
    | Token::Slash => BinaryOperator::Div,
    | Token::DoubleEquals => BinaryOperator::Eq,
    | Token::BangEquals => BinaryOperator::NotEq,
    | Token::Less => BinaryOperator::Lt,
    | Token::LessEquals => BinaryOperator::LtEq,
    | Token::Greater => BinaryOperator::Gt,
    | Token::GreaterEquals => BinaryOperator::GtEq,
    | Token::DoubleAmpersand => BinaryOperator::And,
    | Token::DoublePipe => BinaryOperator::Or,
    | _ => return None,
  };

  Some(operator)
}

/// Precedence climbing over left-associative operators.
fn parse_binary(input: Input, min_precedence: u8) -> Result<(Expression, Input), ParseError> {
  let (mut left, mut input) = parse_unary(input)?;

  while let Some(operator) = binary_operator(&input.read()) {
    if operator.precedence() < min_precedence {
      break;
    }

    let loc = input.loc();
    let (right, rest) = parse_binary(input.next(), operator.precedence() + 1)?;

    left = Expression::Binary(loc, operator, Box::new(left), Box::new(right));
    input = rest;
  }

  Ok((left, input))
}

fn parse_unary(input: Input) -> Result<(Expression, Input), ParseError> {
  let operator = match input.read() {
    | Token::Minus => UnaryOperator::Neg,
    | Token::Bang => UnaryOperator::Not,
    | _ => return parse_postfix(input),
  };

  let loc = input.loc();
  let (operand, input) = parse_unary(input.next())?;

  Ok((Expression::Unary(loc, operator, Box::new(operand)), input))
}

fn parse_postfix(input: Input) -> Result<(Expression, Input), ParseError> {
  let (mut expr, mut input) = parse_primary(input)?;

  loop {
    match input.read() {
      | Token::Dot => {
        let loc = input.next().loc();
        let (field, rest) = combinators::expect_ident(input.next())?;

        expr = Expression::Field(loc, Box::new(expr), field);
        input = rest;
      },
      | Token::LeftBracket => {
        let loc = input.loc();
        let (index, rest) = parse_expr(input.next())?;
        let rest = combinators::expect(Token::RightBracket, rest)?;

        expr = Expression::Index(loc, Box::new(expr), Box::new(index));
        input = rest;
      },
      | _ => break,
    }
  }

  Ok((expr, input))
}

fn parse_primary(input: Input) -> Result<(Expression, Input), ParseError> {
  let loc = input.loc();

  match input.read() {
    | Token::LitInt(value) => Ok((Expression::Literal(loc, Literal::Int(value)), input.next())),
    | Token::LitString(value) => {
      Ok((
        Expression::Literal(loc, Literal::String(value)),
        input.next(),
      ))
    },
    | Token::LitBool(value) => Ok((Expression::Literal(loc, Literal::Bool(value)), input.next())),
    | Token::Ident(name) => {
      // Parsed: module.function(
      if let (Token::Dot, Token::Ident(function), Token::LeftParen) =
        (input.peek(1), input.peek(2), input.peek(3))
      {
        let (args, input) = parse_args(input.next().next().next())?;
        let callee = Callee::qualified(&name, &function);

        return Ok((Expression::Call(loc, callee, args), input));
      }

      let input = input.next();

      match input.read() {
        | Token::LeftParen => {
          let (args, input) = parse_args(input)?;
          Ok((Expression::Call(loc, Callee::local(&name), args), input))
        },
        | _ => Ok((Expression::Ref(loc, name), input)),
      }
    },
    | Token::LeftParen => {
      let (expr, input) = parse_expr(input.next())?;
      let input = combinators::expect(Token::RightParen, input)?;

      Ok((expr, input))
    },
    | Token::LeftBracket => {
      let (items, input) = combinators::comma0(&parse_expr, Token::RightBracket, input.next())?;
      Ok((Expression::List(loc, items), input))
    },
    | Token::LeftBrace => {
      let (fields, input) =
        combinators::comma0(&parse_record_field, Token::RightBrace, input.next())?;

      Ok((Expression::Record(loc, fields), input))
    },
    | found => Err(ParseError::ExpectedExpression { loc, found }),
  }
}

fn parse_args(input: Input) -> Result<(Vec<Expression>, Input), ParseError> {
  let input = combinators::expect(Token::LeftParen, input)?;
  combinators::comma0(&parse_expr, Token::RightParen, input)
}

fn parse_record_field(input: Input) -> Result<(RecordField, Input), ParseError> {
  let loc = input.loc();
  let (name, input) = combinators::expect_ident(input)?;
  let input = combinators::expect(Token::Colon, input)?;
  let (value, input) = parse_expr(input)?;

  Ok((RecordField { loc, name, value }, input))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::testing;

  fn loc() -> Loc {
    Loc::default()
  }

  fn int(value: Int) -> Expression {
    Expression::Literal(loc(), Literal::Int(value))
  }

  fn var(name: &str) -> Expression {
    Expression::Ref(loc(), name.to_string())
  }

  fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::Binary(loc(), operator, Box::new(left), Box::new(right))
  }

  fn block(exprs: Vec<Expression>) -> Block {
    Block::new(
      loc(),
      exprs
        .into_iter()
        .map(|expr| Statement::Expression(loc(), expr))
        .collect(),
    )
  }

  #[test]
  fn test_literals() {
    testing::assert_eq(parse_expr, "42", int(42));
    testing::assert_eq(
      parse_expr,
      "\"hi\"",
      Expression::Literal(loc(), Literal::String("hi".to_string())),
    );
    testing::assert_eq(parse_expr, "true", Expression::Literal(loc(), Literal::Bool(true)));
  }

  #[test]
  fn test_precedence() {
    testing::assert_eq(
      parse_expr,
      "1 + 2 * 3",
      binary(
        BinaryOperator::Add,
        int(1),
        binary(BinaryOperator::Mul, int(2), int(3)),
      ),
    );

    testing::assert_eq(
      parse_expr,
      "a || b && c == d",
      binary(
        BinaryOperator::Or,
        var("a"),
        binary(
          BinaryOperator::And,
          var("b"),
          binary(BinaryOperator::Eq, var("c"), var("d")),
        ),
      ),
    );
  }

  #[test]
  fn test_left_associativity() {
    testing::assert_eq(
      parse_expr,
      "10 - 4 - 3",
      binary(
        BinaryOperator::Sub,
        binary(BinaryOperator::Sub, int(10), int(4)),
        int(3),
      ),
    );
  }

  #[test]
  fn test_parentheses_and_unary() {
    testing::assert_eq(
      parse_expr,
      "-(1 + 2) * 3",
      binary(
        BinaryOperator::Mul,
        Expression::Unary(
          loc(),
          UnaryOperator::Neg,
          Box::new(binary(BinaryOperator::Add, int(1), int(2))),
        ),
        int(3),
      ),
    );

    testing::assert_eq(
      parse_expr,
      "!!done",
      Expression::Unary(
        loc(),
        UnaryOperator::Not,
        Box::new(Expression::Unary(loc(), UnaryOperator::Not, Box::new(var("done")))),
      ),
    );
  }

  #[test]
  fn test_calls() {
    testing::assert_eq(
      parse_expr,
      "add(1, x)",
      Expression::Call(loc(), Callee::local("add"), vec![int(1), var("x")]),
    );

    testing::assert_eq(
      parse_expr,
      "math.add(2, 3)",
      Expression::Call(loc(), Callee::qualified("math", "add"), vec![int(2), int(3)]),
    );

    testing::assert_eq(
      parse_expr,
      "main()",
      Expression::Call(loc(), Callee::local("main"), vec![]),
    );
  }

  #[test]
  fn test_postfix_chain() {
    testing::assert_eq(
      parse_expr,
      "p.items[0].name",
      Expression::Field(
        loc(),
        Box::new(Expression::Index(
          loc(),
          Box::new(Expression::Field(loc(), Box::new(var("p")), "items".to_string())),
          Box::new(int(0)),
        )),
        "name".to_string(),
      ),
    );

    testing::assert_eq(
      parse_expr,
      "colors.Red",
      Expression::Field(loc(), Box::new(var("colors")), "Red".to_string()),
    );
  }

  #[test]
  fn test_records_and_lists() {
    testing::assert_eq(
      parse_expr,
      "{x: 1, y: [2, 3]}",
      Expression::Record(
        loc(),
        vec![
          RecordField {
            loc: loc(),
            name: "x".to_string(),
            value: int(1),
          },
          RecordField {
            loc: loc(),
            name: "y".to_string(),
            value: Expression::List(loc(), vec![int(2), int(3)]),
          },
        ],
      ),
    );

    testing::assert_eq(parse_expr, "[]", Expression::List(loc(), vec![]));
    testing::assert_eq(parse_expr, "{}", Expression::Record(loc(), vec![]));
  }

  #[test]
  fn test_if_else_if() {
    testing::assert_eq(
      parse_expr,
      "if a { 1; } else if b { 2; } else { 3; }",
      Expression::If(
        loc(),
        Box::new(var("a")),
        block(vec![int(1)]),
        block(vec![Expression::If(
          loc(),
          Box::new(var("b")),
          block(vec![int(2)]),
          block(vec![int(3)]),
        )]),
      ),
    );
  }

  #[test]
  fn test_match() {
    testing::assert_eq(
      parse_expr,
      "match n { 1 => { \"one\"; } _ => { \"many\"; } }",
      Expression::Match(
        loc(),
        Box::new(var("n")),
        vec![
          MatchArm {
            loc: loc(),
            pattern: Pattern::Int(loc(), 1),
            body: block(vec![Expression::Literal(loc(), Literal::String("one".to_string()))]),
          },
          MatchArm {
            loc: loc(),
            pattern: Pattern::Wildcard(loc()),
            body: block(vec![Expression::Literal(loc(), Literal::String("many".to_string()))]),
          },
        ],
      ),
    );
  }

  #[test]
  fn test_locations() {
    let expr = testing::parse(parse_expr, "a +\n  b");

    match expr {
      | Expression::Binary(loc, _, left, right) => {
        assert_eq!(loc, Loc::new(1, 3));
        assert_eq!(left.get_loc(), Loc::new(1, 1));
        assert_eq!(right.get_loc(), Loc::new(2, 3));
      },
      | other => panic!("unexpected expression {other:?}"),
    }
  }

  #[test]
  fn test_invalid_expressions() {
    testing::is_err(parse_expr, "1 +");
    testing::is_err(parse_expr, "if a { 1; }");
    testing::is_err(parse_expr, "f(1 2)");
    testing::is_err(parse_expr, "{x 1}");
    testing::is_err(parse_expr, "xs[0");
    testing::is_err(parse_expr, ";");
  }
}
