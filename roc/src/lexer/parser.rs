use nom::branch::*;
use nom::bytes::complete::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::multi::*;
use nom::sequence::*;
use nom::IResult;

use super::Token;
use crate::ast::Int;

pub type ParseResult<'a, T> = IResult<&'a str, T>;

// Trivia.

/// Whitespace and `//` line comments between tokens.
pub fn trivia(input: &str) -> ParseResult<'_, &str> {
  recognize(many0(alt((multispace1, line_comment))))(input)
}

fn line_comment(input: &str) -> ParseResult<'_, &str> {
  recognize(pair(tag("//"), not_line_ending))(input)
}

// Non-terminals.

pub fn token(input: &str) -> ParseResult<'_, Token> {
  alt((operator, punctuation, literal, identifier))(input)
}

fn identifier(input: &str) -> ParseResult<'_, Token> {
  map(
    recognize(pair(
      satisfy(|ch| ch.is_ascii_alphabetic() || ch == '_'),
      take_while(|ch: char| ch.is_ascii_alphanumeric() || ch == '_'),
    )),
    |ident: &str| match ident {
      | "_" => Token::Underscore,
      | "true" => Token::LitBool(true),
      | "false" => Token::LitBool(false),
      | "module" => Token::ModuleKw,
      | "import" => Token::ImportKw,
      | "export" => Token::ExportKw,
      | "as" => Token::AsKw,
      | "enum" => Token::EnumKw,
      | "fn" => Token::FnKw,
      | "let" => Token::LetKw,
      | "set" => Token::SetKw,
      | "for" => Token::ForKw,
      | "in" => Token::InKw,
      | "by" => Token::ByKw,
      | "while" => Token::WhileKw,
      | "break" => Token::BreakKw,
      | "continue" => Token::ContinueKw,
      | "return" => Token::ReturnKw,
      | "if" => Token::IfKw,
      | "else" => Token::ElseKw,
      | "match" => Token::MatchKw,
      | _ => Token::Ident(ident.to_string()),
    },
  )(input)
}

fn literal(input: &str) -> ParseResult<'_, Token> {
  alt((int_literal, string_literal))(input)
}

fn int_literal(input: &str) -> ParseResult<'_, Token> {
  map_res(digit1, |digits: &str| digits.parse::<Int>().map(Token::LitInt))(input)
}

fn string_literal(input: &str) -> ParseResult<'_, Token> {
  let contents = many0(alt((none_of("\\\"\n"), preceded(char('\\'), escape))));

  map(
    delimited(char('"'), contents, char('"')),
    |chars: Vec<char>| Token::LitString(chars.into_iter().collect::<String>()),
  )(input)
}

/// Escape sequence after a backslash.
pub fn escape(input: &str) -> ParseResult<'_, char> {
  alt((
    value('\n', char('n')),
    value('\t', char('t')),
    value('\r', char('r')),
    value('\\', char('\\')),
    value('"', char('"')),
    value('\0', char('0')),
  ))(input)
}

// Terminals.

fn operator(input: &str) -> ParseResult<'_, Token> {
  alt((
    value(Token::DoubleDotEquals, tag("..=")),
    value(Token::DoubleDot, tag("..")),
    value(Token::DoubleEquals, tag("==")),
    value(Token::BangEquals, tag("!=")),
    value(Token::LessEquals, tag("<=")),
    value(Token::GreaterEquals, tag(">=")),
    value(Token::DoubleAmpersand, tag("&&")),
    value(Token::DoublePipe, tag("||")),
    value(Token::FatRightArrow, tag("=>")),
    value(Token::RightArrow, tag("->")),
    single_char_operator,
  ))(input)
}

fn single_char_operator(input: &str) -> ParseResult<'_, Token> {
  alt((
    value(Token::Plus, char('+')),
    value(Token::Minus, char('-')),
    value(Token::Star, char('*')),
    value(Token::Slash, char('/')),
    value(Token::Less, char('<')),
    value(Token::Greater, char('>')),
    value(Token::Bang, char('!')),
    value(Token::Equals, char('=')),
    value(Token::Dot, char('.')),
    value(Token::Colon, char(':')),
  ))(input)
}

fn punctuation(input: &str) -> ParseResult<'_, Token> {
  alt((
    value(Token::Semicolon, char(';')),
    value(Token::Comma, char(',')),
    value(Token::LeftParen, char('(')),
    value(Token::RightParen, char(')')),
    value(Token::LeftBracket, char('[')),
    value(Token::RightBracket, char(']')),
    value(Token::LeftBrace, char('{')),
    value(Token::RightBrace, char('}')),
  ))(input)
}
