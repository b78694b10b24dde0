use std::fmt;

use crate::ast::{Int, Loc};

#[derive(PartialEq, Debug, Clone)]
pub struct SpannedToken {
  pub loc: Loc,
  pub token: Token,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Token {
  // Terminals.
  Plus,
  Minus,
  Star,
  Slash,
  DoubleEquals,
  BangEquals,
  Less,
  LessEquals,
  Greater,
  GreaterEquals,
  DoubleAmpersand,
  DoublePipe,
  Bang,
  Equals,
  Dot,
  DoubleDot,
  DoubleDotEquals,
  Colon,
  Semicolon,
  Comma,
  LeftParen,
  RightParen,
  LeftBracket,
  RightBracket,
  LeftBrace,
  RightBrace,
  RightArrow,
  FatRightArrow,
  Underscore,
  Eof,

  // Non-terminals.
  Ident(String),
  LitInt(Int),
  LitBool(bool),
  LitString(String),

  // Keywords.
  ModuleKw,
  ImportKw,
  ExportKw,
  AsKw,
  EnumKw,
  FnKw,
  LetKw,
  SetKw,
  ForKw,
  InKw,
  ByKw,
  WhileKw,
  BreakKw,
  ContinueKw,
  ReturnKw,
  IfKw,
  ElseKw,
  MatchKw,
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let text = match self {
      | Token::Plus => "+",
      | Token::Minus => "-",
      | Token::Star => "*",
      | Token::Slash => "/",
      | Token::DoubleEquals => "==",
      | Token::BangEquals => "!=",
      | Token::Less => "<",
      | Token::LessEquals => "<=",
      | Token::Greater => ">",
      | Token::GreaterEquals => ">=",
      | Token::DoubleAmpersand => "&&",
      | Token::DoublePipe => "||",
      | Token::Bang => "!",
      | Token::Equals => "=",
      | Token::Dot => ".",
      | Token::DoubleDot => "..",
      | Token::DoubleDotEquals => "..=",
      | Token::Colon => ":",
      | Token::Semicolon => ";",
      | Token::Comma => ",",
      | Token::LeftParen => "(",
      | Token::RightParen => ")",
      | Token::LeftBracket => "[",
      | Token::RightBracket => "]",
      | Token::LeftBrace => "{",
      | Token::RightBrace => "}",
      | Token::RightArrow => "->",
      | Token::FatRightArrow => "=>",
      | Token::Underscore => "_",
      | Token::Eof => "end of file",
      | Token::Ident(name) => name,
      | Token::LitInt(value) => return write!(f, "{value}"),
      | Token::LitBool(value) => return write!(f, "{value}"),
      | Token::LitString(value) => return write!(f, "{value:?}"),
      | Token::ModuleKw => "module",
      | Token::ImportKw => "import",
      | Token::ExportKw => "export",
      | Token::AsKw => "as",
      | Token::EnumKw => "enum",
      | Token::FnKw => "fn",
      | Token::LetKw => "let",
      | Token::SetKw => "set",
      | Token::ForKw => "for",
      | Token::InKw => "in",
      | Token::ByKw => "by",
      | Token::WhileKw => "while",
      | Token::BreakKw => "break",
      | Token::ContinueKw => "continue",
      | Token::ReturnKw => "return",
      | Token::IfKw => "if",
      | Token::ElseKw => "else",
      | Token::MatchKw => "match",
    };

    write!(f, "{text}")
  }
}
