use super::{Expression, Loc, TypeRef};

#[derive(Clone, Debug)]
pub struct Block {
  pub loc: Loc,
  pub statements: Vec<Statement>,
}

impl Block {
  pub fn new(loc: Loc, statements: Vec<Statement>) -> Self {
    Block { loc, statements }
  }
}

#[derive(Clone, Debug)]
pub enum Statement {
  Let(Loc, String, Option<TypeRef>, Expression),
  Set(Loc, String, Expression),
  For(Loc, Box<ForLoop>),
  While(Loc, Expression, Block),
  Break(Loc),
  Continue(Loc),
  Return(Loc, Expression),
  Expression(Loc, Expression),
}

/// `for <variable> in <start>..<end> [by <step>] { ... }`, with `..=` for inclusive ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
  pub variable: String,
  pub start: Expression,
  pub end: Expression,
  pub inclusive: bool,
  pub step: Option<Expression>,
  pub body: Block,
}

impl Statement {
  pub fn get_loc(&self) -> Loc {
    *match self {
      | Statement::Let(loc, ..) => loc,
      | Statement::Set(loc, ..) => loc,
      | Statement::For(loc, _) => loc,
      | Statement::While(loc, ..) => loc,
      | Statement::Break(loc) => loc,
      | Statement::Continue(loc) => loc,
      | Statement::Return(loc, _) => loc,
      | Statement::Expression(loc, _) => loc,
    }
  }
}

/// Locations are ignored, so that trees built by hand compare equal to parsed ones.
impl PartialEq for Block {
  fn eq(&self, other: &Block) -> bool {
    self.statements == other.statements
  }
}

impl PartialEq for Statement {
  fn eq(&self, other: &Statement) -> bool {
    match (self, other) {
      | (Statement::Let(_, lhs_name, lhs_ann, lhs), Statement::Let(_, rhs_name, rhs_ann, rhs)) => {
        lhs_name == rhs_name
          && lhs_ann.as_ref().map(|ann| &ann.name) == rhs_ann.as_ref().map(|ann| &ann.name)
          && lhs == rhs
      },
      | (Statement::Set(_, lhs_name, lhs), Statement::Set(_, rhs_name, rhs)) => {
        lhs_name == rhs_name && lhs == rhs
      },
      | (Statement::For(_, lhs), Statement::For(_, rhs)) => lhs == rhs,
      | (Statement::While(_, lhs_cond, lhs_body), Statement::While(_, rhs_cond, rhs_body)) => {
        lhs_cond == rhs_cond && lhs_body == rhs_body
      },
      | (Statement::Break(_), Statement::Break(_)) => true,
      | (Statement::Continue(_), Statement::Continue(_)) => true,
      | (Statement::Return(_, lhs), Statement::Return(_, rhs)) => lhs == rhs,
      | (Statement::Expression(_, lhs), Statement::Expression(_, rhs)) => lhs == rhs,
      | _ => false,
    }
  }
}
