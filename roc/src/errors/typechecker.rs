use thiserror::Error;

use super::helpers::report_at;
use super::{ReportBuilder, Reportable};
use crate::ast::Loc;
use crate::source::SourceCode;

#[derive(PartialEq, Debug, Clone, Error)]
pub enum TypeError {
  #[error("Type mismatch: {left} vs {right} ({context})")]
  TypeMismatch {
    loc: Loc,
    left: String,
    right: String,
    context: String,
  },
  #[error("Record fields mismatch: {left} vs {right} ({context})")]
  RecordFieldsMismatch {
    loc: Loc,
    left: String,
    right: String,
    context: String,
  },
  #[error("Recursive type: {var} occurs in {ty} ({context})")]
  RecursiveType {
    loc: Loc,
    var: String,
    ty: String,
    context: String,
  },
  #[error("Variable '{name}' already defined in this scope")]
  VariableAlreadyDefined { loc: Loc, name: String },
  #[error("Undefined variable '{name}'")]
  UndefinedVariable { loc: Loc, name: String },
  #[error("Function '{name}' already defined")]
  FunctionAlreadyDefined { loc: Loc, name: String },
  #[error("Enum '{name}' already defined")]
  EnumAlreadyDefined { loc: Loc, name: String },
  #[error("Enum variant '{name}' already defined")]
  VariantAlreadyDefined { loc: Loc, name: String },
  #[error("Unknown type '{name}'")]
  UnknownType { loc: Loc, name: String },
  #[error("break used outside of a loop")]
  BreakOutsideLoop { loc: Loc },
  #[error("continue used outside of a loop")]
  ContinueOutsideLoop { loc: Loc },
  #[error("return is not allowed inside expression block")]
  ReturnInExpressionBlock { loc: Loc },
  #[error("Duplicate field '{name}' in record literal")]
  DuplicateField { loc: Loc, name: String },
  #[error("Function '{name}' is not a value")]
  FunctionNotAValue { loc: Loc, name: String },
  #[error("Field access expects a record")]
  NotARecord { loc: Loc, found: String },
  #[error("Unknown field '{field}' (available: {})", .available.join(", "))]
  UnknownField {
    loc: Loc,
    field: String,
    available: Vec<String>,
  },
  #[error("Indexing expects a list")]
  NotAList { loc: Loc, found: String },
  #[error("Operator '+' expects integers or a string operand")]
  InvalidAddOperands { loc: Loc, left: String, right: String },
  #[error("match expression requires at least one arm")]
  EmptyMatch { loc: Loc },
  #[error("'{name}' is not callable")]
  NotCallable { loc: Loc, name: String },
  #[error("Unknown function '{name}'")]
  UnknownFunction { loc: Loc, name: String },
  #[error("Function '{name}' expects {expected} args, got {found}")]
  ArityMismatch {
    loc: Loc,
    name: String,
    expected: usize,
    found: usize,
  },
  #[error("Unknown module '{name}'")]
  UnknownModule { loc: Loc, name: String },
  #[error("{module} has no export '{name}'")]
  MissingExport {
    loc: Loc,
    module: String,
    name: String,
  },
  #[error("Cannot export unknown name '{name}'")]
  UnknownExport { loc: Loc, name: String },
}

impl TypeError {
  pub fn loc(&self) -> Loc {
    *match self {
      | TypeError::TypeMismatch { loc, .. } => loc,
      | TypeError::RecordFieldsMismatch { loc, .. } => loc,
      | TypeError::RecursiveType { loc, .. } => loc,
      | TypeError::VariableAlreadyDefined { loc, .. } => loc,
      | TypeError::UndefinedVariable { loc, .. } => loc,
      | TypeError::FunctionAlreadyDefined { loc, .. } => loc,
      | TypeError::EnumAlreadyDefined { loc, .. } => loc,
      | TypeError::VariantAlreadyDefined { loc, .. } => loc,
      | TypeError::UnknownType { loc, .. } => loc,
      | TypeError::BreakOutsideLoop { loc } => loc,
      | TypeError::ContinueOutsideLoop { loc } => loc,
      | TypeError::ReturnInExpressionBlock { loc } => loc,
      | TypeError::DuplicateField { loc, .. } => loc,
      | TypeError::FunctionNotAValue { loc, .. } => loc,
      | TypeError::NotARecord { loc, .. } => loc,
      | TypeError::UnknownField { loc, .. } => loc,
      | TypeError::NotAList { loc, .. } => loc,
      | TypeError::InvalidAddOperands { loc, .. } => loc,
      | TypeError::EmptyMatch { loc } => loc,
      | TypeError::NotCallable { loc, .. } => loc,
      | TypeError::UnknownFunction { loc, .. } => loc,
      | TypeError::ArityMismatch { loc, .. } => loc,
      | TypeError::UnknownModule { loc, .. } => loc,
      | TypeError::MissingExport { loc, .. } => loc,
      | TypeError::UnknownExport { loc, .. } => loc,
    }
  }
}

impl<'a> Reportable<'a> for TypeError {
  fn report(&'a self, source: &'a SourceCode) -> ReportBuilder<'a> {
    let report = report_at(source, "TypeError", self.loc(), self);

    match self {
      | TypeError::NotARecord { found, .. } | TypeError::NotAList { found, .. } => {
        report.with_note(format!("found `{found}`"))
      },
      | TypeError::InvalidAddOperands { left, right, .. } => {
        report.with_note(format!("found `{left}` and `{right}`"))
      },
      | TypeError::NotCallable { name, .. } => {
        report.with_note(format!("'{name}' is a local variable, which shadows the function"))
      },
      | TypeError::UnknownFunction { .. } => {
        report.with_note("functions of other modules are called as `module.function(..)`")
      },
      | TypeError::MissingExport { module, name, .. } => {
        report.with_note(format!("add '{name}' to the export list of {module}"))
      },
      | _ => report,
    }
  }
}
