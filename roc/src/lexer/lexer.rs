use log::trace;

use super::parser;
use super::{SpannedToken, Token};
use crate::ast::Loc;
use crate::errors::*;
use crate::source::SourceCode;

pub struct Lexer {
  code: SourceCode,
}

/// Line/column tracking over the consumed part of the code.
#[derive(Clone, Copy, Debug)]
struct Cursor {
  pos: usize,
  loc: Loc,
}

impl Cursor {
  fn advance(&mut self, consumed: &str) {
    for ch in consumed.chars() {
      if ch == '\n' {
        self.loc.line += 1;
        self.loc.column = 1;
      } else {
        self.loc.column += 1;
      }
    }

    self.pos += consumed.len();
  }
}

impl Lexer {
  pub fn new(code: &SourceCode) -> Self {
    Lexer { code: code.clone() }
  }

  pub fn source(&self) -> SourceCode {
    self.code.clone()
  }

  /// Splits the whole code into tokens, always terminated by [Token::Eof]. Stops at the first
  /// lexical error.
  pub fn lex(&mut self) -> Result<Vec<SpannedToken>, LangError> {
    let code = self.code.as_str();
    let mut cursor = Cursor {
      pos: 0,
      loc: Loc::new(1, 1),
    };
    let mut tokens = Vec::new();

    loop {
      let rest = &code[cursor.pos..];
      let (after_trivia, skipped) = parser::trivia(rest).unwrap_or((rest, ""));
      cursor.advance(skipped);

      if after_trivia.is_empty() {
        tokens.push(SpannedToken {
          loc: cursor.loc,
          token: Token::Eof,
        });

        break;
      }

      match parser::token(after_trivia) {
        | Ok((remaining, token)) => {
          let consumed = &after_trivia[..after_trivia.len() - remaining.len()];

          tokens.push(SpannedToken {
            loc: cursor.loc,
            token,
          });

          cursor.advance(consumed);
        },
        | Err(_) => {
          return Err(LangError::Lexer(
            self.code.clone(),
            diagnose(after_trivia, cursor.loc),
          ));
        },
      }
    }

    trace!("lexed {} tokens from '{}'", tokens.len(), self.code.file_path());

    Ok(tokens)
  }
}

/// Works out why no token could be read at the start of `rest`.
fn diagnose(rest: &str, loc: Loc) -> LexicalError {
  let mut chars = rest.chars();

  match chars.next() {
    | Some('"') => {
      while let Some(ch) = chars.next() {
        match ch {
          | '"' | '\n' => break,
          | '\\' => {
            let escaped = chars.as_str();

            if let Some(found) = escaped.chars().next() {
              if parser::escape(escaped).is_err() {
                return LexicalError::InvalidEscape { loc, found };
              }
            }

            chars.next();
          },
          | _ => {},
        }
      }

      LexicalError::UnterminatedString { loc }
    },
    | Some(ch) if ch.is_ascii_digit() => {
      LexicalError::IntegerOutOfRange {
        loc,
        literal: rest.chars().take_while(char::is_ascii_digit).collect(),
      }
    },
    | Some(found) => LexicalError::UnexpectedCharacter { loc, found },
    | None => LexicalError::UnexpectedCharacter { loc, found: '\0' },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lex(code: &str) -> Result<Vec<SpannedToken>, LangError> {
    Lexer::new(&SourceCode::from_str(code)).lex()
  }

  fn kinds(code: &str) -> Vec<Token> {
    lex(code)
      .unwrap()
      .into_iter()
      .map(|spanned| spanned.token)
      .collect()
  }

  fn lexical_error(code: &str) -> LexicalError {
    match lex(code) {
      | Err(LangError::Lexer(_, error)) => error,
      | other => panic!("expected lexical error, got {other:?}"),
    }
  }

  #[test]
  fn test_function_tokens() {
    assert_eq!(
      kinds("fn add(a: Int) -> Int { return a; }"),
      vec![
        Token::FnKw,
        Token::Ident("add".to_string()),
        Token::LeftParen,
        Token::Ident("a".to_string()),
        Token::Colon,
        Token::Ident("Int".to_string()),
        Token::RightParen,
        Token::RightArrow,
        Token::Ident("Int".to_string()),
        Token::LeftBrace,
        Token::ReturnKw,
        Token::Ident("a".to_string()),
        Token::Semicolon,
        Token::RightBrace,
        Token::Eof,
      ]
    );
  }

  #[test]
  fn test_logical_tokens() {
    let tokens = kinds("fn main() { return true && !false || false; }");

    assert!(tokens.contains(&Token::DoubleAmpersand));
    assert!(tokens.contains(&Token::DoublePipe));
    assert!(tokens.contains(&Token::Bang));
  }

  #[test]
  fn test_range_tokens() {
    let tokens = kinds("for i in 0..=3 by 2 { break; } 0..n");

    assert!(tokens.contains(&Token::DoubleDotEquals));
    assert!(tokens.contains(&Token::DoubleDot));
    assert!(tokens.contains(&Token::ByKw));
  }

  #[test]
  fn test_locations() {
    let tokens = lex("fn main() {\n  // comment\n  print(1);\n}").unwrap();

    assert_eq!(tokens[0].loc, Loc::new(1, 1));
    assert_eq!(tokens[1].loc, Loc::new(1, 4));
    assert_eq!(tokens[5].token, Token::Ident("print".to_string()));
    assert_eq!(tokens[5].loc, Loc::new(3, 3));
    assert_eq!(tokens.last().map(|token| token.loc), Some(Loc::new(4, 2)));
  }

  #[test]
  fn test_crlf_normalization() {
    let tokens = kinds("fn main() {\r\n  print(\"hi\");\r\n}\r\n");

    assert_eq!(tokens.first(), Some(&Token::FnKw));
    assert!(tokens.contains(&Token::LitString("hi".to_string())));
  }

  #[test]
  fn test_empty_code() {
    assert_eq!(kinds("  // nothing\n"), vec![Token::Eof]);
  }

  #[test]
  fn test_invalid_character() {
    let error = lexical_error("fn main() { @ }");

    assert_eq!(
      error,
      LexicalError::UnexpectedCharacter {
        loc: Loc::new(1, 13),
        found: '@'
      }
    );
    assert!(error.to_string().contains("Unexpected character"));
  }

  #[test]
  fn test_string_errors() {
    assert_eq!(
      lexical_error("let s = \"open"),
      LexicalError::UnterminatedString { loc: Loc::new(1, 9) }
    );
    assert_eq!(
      lexical_error("\"a\\qb\""),
      LexicalError::InvalidEscape {
        loc: Loc::new(1, 1),
        found: 'q'
      }
    );
  }

  #[test]
  fn test_integer_out_of_range() {
    assert_eq!(
      lexical_error("99999999999999999999"),
      LexicalError::IntegerOutOfRange {
        loc: Loc::new(1, 1),
        literal: "99999999999999999999".to_string()
      }
    );
  }
}
