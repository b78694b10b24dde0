use std::fmt;

use super::{Block, Loc};
use crate::utils::path::qualified_name;

/// A parsed module, or the merged program produced by the loader.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
  pub module_name: Option<String>,
  pub imports: Vec<Import>,
  pub exports: Vec<Export>,
  pub enums: Vec<EnumDef>,
  pub functions: Vec<FunctionDef>,
}

impl Program {
  pub fn function(&self, name: &str) -> Option<&FunctionDef> {
    self.functions.iter().find(|function| function.name == name)
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Import {
  pub loc: Loc,
  pub module: String,
  pub alias: Option<String>,
}

impl Import {
  /// Name the imported module is referred to by inside the importing module.
  pub fn name(&self) -> &str {
    self.alias.as_deref().unwrap_or(&self.module)
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Export {
  pub loc: Loc,
  pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDef {
  pub loc: Loc,
  pub name: String,
  pub variants: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
  pub loc: Loc,
  pub name: String,
  pub params: Vec<Param>,
  pub return_type: Option<TypeRef>,
  pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
  pub loc: Loc,
  pub name: String,
  pub type_ann: Option<TypeRef>,
}

/// Type annotation as written: `Int`, `Color` or `colors.Color`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeRef {
  pub loc: Loc,
  pub module: Option<String>,
  pub name: String,
}

impl fmt::Display for TypeRef {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", qualified_name(self.module.as_slice(), &self.name))
  }
}
