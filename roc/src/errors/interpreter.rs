use thiserror::Error;

use super::helpers::report_at;
use super::{ReportBuilder, Reportable};
use crate::ast::Loc;
use crate::source::SourceCode;

#[derive(PartialEq, Debug, Clone, Error)]
pub enum InterpreterError {
  #[error("No 'main' function defined")]
  MissingMain,
  #[error("Function '{name}' already defined")]
  FunctionAlreadyDefined { loc: Loc, name: String },
  #[error("Variable '{name}' already defined in this scope")]
  VariableAlreadyDefined { loc: Loc, name: String },
  #[error("Undefined variable '{name}'")]
  UndefinedVariable { loc: Loc, name: String },
  #[error("Function '{name}' expected {expected} args, got {found}")]
  ArityMismatch {
    loc: Loc,
    name: String,
    expected: usize,
    found: usize,
  },
  #[error("'{name}' is not callable")]
  NotCallable { loc: Loc, name: String },
  #[error("Unknown function '{name}'")]
  UnknownFunction { loc: Loc, name: String },
  #[error("Unknown module '{name}'")]
  UnknownModule { loc: Loc, name: String },
  #[error("{module} has no export '{name}'")]
  MissingExport {
    loc: Loc,
    module: String,
    name: String,
  },
  #[error("for range expects integers")]
  RangeExpectsIntegers { loc: Loc },
  #[error("for step expects integer")]
  StepExpectsInteger { loc: Loc },
  #[error("for step cannot be zero")]
  ZeroStep { loc: Loc },
  #[error("break used outside of a loop")]
  BreakOutsideLoop { loc: Loc },
  #[error("continue used outside of a loop")]
  ContinueOutsideLoop { loc: Loc },
  #[error("return inside loop is not allowed in expression block")]
  ReturnInsideLoopInExpressionBlock { loc: Loc },
  #[error("return is not allowed inside expression block")]
  ReturnInExpressionBlock { loc: Loc },
  #[error("Operator '{op}' expects integers")]
  ExpectedIntegers { loc: Loc, op: String },
  #[error("Operator '{op}' expects booleans")]
  ExpectedBooleans { loc: Loc, op: String },
  #[error("Operator '{op}' expects matching types")]
  MismatchedTypes { loc: Loc, op: String },
  #[error("Condition expects a boolean, integer or string, found {found}")]
  InvalidCondition { loc: Loc, found: String },
  #[error("Division by zero")]
  DivisionByZero { loc: Loc },
  #[error("Integer overflow")]
  IntegerOverflow { loc: Loc },
  #[error("Field access expects a record")]
  ExpectedRecord { loc: Loc },
  #[error("Record has no field '{name}'")]
  MissingField { loc: Loc, name: String },
  #[error("Indexing expects a list")]
  ExpectedList { loc: Loc },
  #[error("List index must be an integer")]
  ExpectedIndex { loc: Loc },
  #[error("List index {index} out of bounds (length {len})")]
  IndexOutOfBounds { loc: Loc, index: i64, len: usize },
  #[error("Non-exhaustive match")]
  NonExhaustiveMatch { loc: Loc },
  #[error("Unable to write output: {message}")]
  Output { loc: Loc, message: String },
}

impl InterpreterError {
  pub fn loc(&self) -> Option<Loc> {
    let loc = match self {
      | InterpreterError::MissingMain => return None,
      | InterpreterError::FunctionAlreadyDefined { loc, .. } => loc,
      | InterpreterError::VariableAlreadyDefined { loc, .. } => loc,
      | InterpreterError::UndefinedVariable { loc, .. } => loc,
      | InterpreterError::ArityMismatch { loc, .. } => loc,
      | InterpreterError::NotCallable { loc, .. } => loc,
      | InterpreterError::UnknownFunction { loc, .. } => loc,
      | InterpreterError::UnknownModule { loc, .. } => loc,
      | InterpreterError::MissingExport { loc, .. } => loc,
      | InterpreterError::RangeExpectsIntegers { loc } => loc,
      | InterpreterError::StepExpectsInteger { loc } => loc,
      | InterpreterError::ZeroStep { loc } => loc,
      | InterpreterError::BreakOutsideLoop { loc } => loc,
      | InterpreterError::ContinueOutsideLoop { loc } => loc,
      | InterpreterError::ReturnInsideLoopInExpressionBlock { loc } => loc,
      | InterpreterError::ReturnInExpressionBlock { loc } => loc,
      | InterpreterError::ExpectedIntegers { loc, .. } => loc,
      | InterpreterError::ExpectedBooleans { loc, .. } => loc,
      | InterpreterError::MismatchedTypes { loc, .. } => loc,
      | InterpreterError::InvalidCondition { loc, .. } => loc,
      | InterpreterError::DivisionByZero { loc } => loc,
      | InterpreterError::IntegerOverflow { loc } => loc,
      | InterpreterError::ExpectedRecord { loc } => loc,
      | InterpreterError::MissingField { loc, .. } => loc,
      | InterpreterError::ExpectedList { loc } => loc,
      | InterpreterError::ExpectedIndex { loc } => loc,
      | InterpreterError::IndexOutOfBounds { loc, .. } => loc,
      | InterpreterError::NonExhaustiveMatch { loc } => loc,
      | InterpreterError::Output { loc, .. } => loc,
    };

    Some(*loc)
  }
}

impl<'a> Reportable<'a> for InterpreterError {
  fn report(&'a self, source: &'a SourceCode) -> ReportBuilder<'a> {
    let report = report_at(source, "RuntimeError", self.loc().unwrap_or_default(), self);

    match self {
      | InterpreterError::NonExhaustiveMatch { .. } => {
        report.with_note("add a `_ => { .. }` arm to handle the remaining values")
      },
      | InterpreterError::IntegerOverflow { .. } => {
        report.with_note("integers are 64-bit and never wrap around")
      },
      | _ => report,
    }
  }
}
