use std::collections::HashMap;
use std::io::Write;
use std::mem;

use log::{debug, trace};

use super::{ScopeId, Scopes, Value, GLOBAL};
use crate::ast::*;
use crate::errors::{InterpreterError, LangError};
use crate::loader::{LoadedProgram, ModuleId, ModuleTable};

/// How a statement finished.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
  Normal,
  Break(Loc),
  Continue(Loc),
  Return(Value),
}

/// Ways out of an expression. Loop signals raised inside an `if` or `match` block travel up to
/// the enclosing loop this way.
#[derive(Debug)]
enum Unwind {
  Error(InterpreterError),
  Break(Loc),
  Continue(Loc),
}

impl Unwind {
  /// Loop signals that reach a function body have no loop to go to.
  fn settle(self) -> InterpreterError {
    match self {
      | Unwind::Error(error) => error,
      | Unwind::Break(loc) => InterpreterError::BreakOutsideLoop { loc },
      | Unwind::Continue(loc) => InterpreterError::ContinueOutsideLoop { loc },
    }
  }
}

impl From<InterpreterError> for Unwind {
  fn from(error: InterpreterError) -> Self {
    Unwind::Error(error)
  }
}

type Eval<T> = Result<T, Unwind>;

/// Tree-walking evaluator of a checked program.
pub struct Interpreter<'a> {
  program: &'a Program,
  modules: &'a ModuleTable,
  functions: HashMap<&'a str, (&'a FunctionDef, ModuleId)>,
  /// Variant name to its enum name.
  variants: HashMap<&'a str, &'a str>,
  scopes: Scopes,
  /// Module of the function being executed.
  module: ModuleId,
  /// Module of the innermost function that failed.
  failed_in: Option<ModuleId>,
  out: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
  pub fn new(loaded: &'a LoadedProgram, out: &'a mut dyn Write) -> Self {
    Interpreter {
      program: &loaded.program,
      modules: &loaded.modules,
      functions: HashMap::new(),
      variants: HashMap::new(),
      scopes: Scopes::new(),
      module: loaded.modules.root(),
      failed_in: None,
      out,
    }
  }

  /// Runs `main` and returns its value.
  pub fn execute(&mut self) -> Result<Value, LangError> {
    let result = self.execute_main();

    result.map_err(|error| {
      let source = match error {
        | InterpreterError::MissingMain => None,
        | _ => {
          let module = self.failed_in.unwrap_or(self.module);
          self.modules.get(module).map(|module| module.source.clone())
        },
      };

      LangError::Interpreter(source, error)
    })
  }

  fn execute_main(&mut self) -> Result<Value, InterpreterError> {
    self.register()?;

    let (main, owner) = match self.functions.get("main") {
      | Some(&(main, owner)) => (main, owner),
      | None => return Err(InterpreterError::MissingMain),
    };

    debug!("executing 'main' with {} function(s)", self.functions.len());

    self.call(main.loc, "main", main, owner, vec![])
  }

  fn register(&mut self) -> Result<(), InterpreterError> {
    let program = self.program;

    for function in &program.functions {
      let owner = self
        .modules
        .function_owner(&function.name)
        .unwrap_or_else(|| self.modules.root());

      // `print` is built in.
      if function.name == "print"
        || self
          .functions
          .insert(function.name.as_str(), (function, owner))
          .is_some()
      {
        self.failed_in = Some(owner);

        return Err(InterpreterError::FunctionAlreadyDefined {
          loc: function.loc,
          name: function.name.clone(),
        });
      }
    }

    for enum_def in &program.enums {
      for variant in &enum_def.variants {
        self
          .variants
          .insert(variant.as_str(), enum_def.name.as_str());
      }
    }

    Ok(())
  }

  // Calls.

  fn call(
    &mut self,
    loc: Loc,
    name: &str,
    function: &'a FunctionDef,
    owner: ModuleId,
    args: Vec<Value>,
  ) -> Result<Value, InterpreterError> {
    if args.len() != function.params.len() {
      return Err(InterpreterError::ArityMismatch {
        loc,
        name: name.to_string(),
        expected: function.params.len(),
        found: args.len(),
      });
    }

    trace!("calling '{name}'");

    let scope = self.scopes.push(GLOBAL);
    let caller = mem::replace(&mut self.module, owner);

    let result = self.run_function(function, scope, args);

    if result.is_err() && self.failed_in.is_none() {
      self.failed_in = Some(owner);
    }

    self.module = caller;
    self.scopes.release(scope);

    result
  }

  fn run_function(
    &mut self,
    function: &'a FunctionDef,
    scope: ScopeId,
    args: Vec<Value>,
  ) -> Result<Value, InterpreterError> {
    for (param, value) in function.params.iter().zip(args) {
      if !self.scopes.define(scope, &param.name, value) {
        return Err(InterpreterError::VariableAlreadyDefined {
          loc: param.loc,
          name: param.name.clone(),
        });
      }
    }

    for statement in &function.body.statements {
      let flow = self
        .execute_statement(statement, scope)
        .map_err(Unwind::settle)?;

      match flow {
        | Flow::Normal => {},
        | Flow::Return(value) => return Ok(value),
        | Flow::Break(loc) => return Err(InterpreterError::BreakOutsideLoop { loc }),
        | Flow::Continue(loc) => return Err(InterpreterError::ContinueOutsideLoop { loc }),
      }
    }

    Ok(Value::Unit)
  }

  fn resolve_callee(&self, loc: Loc, callee: &Callee) -> Result<(&'a FunctionDef, ModuleId), InterpreterError> {
    let owner = match &callee.module {
      | None => self.module,
      | Some(alias) => {
        let target = self.resolve_module(loc, alias)?;
        self.require_export(loc, alias, target, &callee.name)?;

        target
      },
    };

    match self.functions.get(callee.name.as_str()) {
      | Some(&(function, module)) if module == owner => Ok((function, module)),
      | _ => {
        Err(InterpreterError::UnknownFunction {
          loc,
          name: callee.to_string(),
        })
      },
    }
  }

  fn resolve_module(&self, loc: Loc, alias: &str) -> Result<ModuleId, InterpreterError> {
    self
      .modules
      .resolve_alias(self.module, alias)
      .ok_or_else(|| {
        InterpreterError::UnknownModule {
          loc,
          name: alias.to_string(),
        }
      })
  }

  fn require_export(
    &self,
    loc: Loc,
    alias: &str,
    target: ModuleId,
    name: &str,
  ) -> Result<(), InterpreterError> {
    if self.modules.is_exported(target, name) {
      Ok(())
    } else {
      Err(InterpreterError::MissingExport {
        loc,
        module: alias.to_string(),
        name: name.to_string(),
      })
    }
  }

  /// Value of `variant` if its enum is defined by module `owner`.
  fn variant(&self, name: &str, owner: ModuleId) -> Option<Value> {
    let enum_name = self.variants.get(name)?;

    if self.modules.enum_owner(enum_name).unwrap_or_else(|| self.modules.root()) == owner {
      Some(Value::Variant {
        enum_name: enum_name.to_string(),
        name: name.to_string(),
      })
    } else {
      None
    }
  }

  fn print(&mut self, loc: Loc, values: &[Value]) -> Result<Value, InterpreterError> {
    let line = values
      .iter()
      .map(Value::to_string)
      .collect::<Vec<_>>()
      .join(" ");

    writeln!(self.out, "{line}").map_err(|error| {
      InterpreterError::Output {
        loc,
        message: error.to_string(),
      }
    })?;

    Ok(Value::Unit)
  }

  // Scopes.

  fn in_scope<T, F>(&mut self, parent: ScopeId, func: F) -> Eval<T>
  where
    F: FnOnce(&mut Self, ScopeId) -> Eval<T>,
  {
    let scope = self.scopes.push(parent);
    let result = func(self, scope);
    self.scopes.release(scope);

    result
  }

  fn truthy(&self, loc: Loc, value: &Value) -> Result<bool, InterpreterError> {
    value.truthy().ok_or_else(|| {
      InterpreterError::InvalidCondition {
        loc,
        found: value.kind().to_string(),
      }
    })
  }

  // Statements.

  fn execute_statement(&mut self, statement: &'a Statement, scope: ScopeId) -> Eval<Flow> {
    match statement {
      | Statement::Let(loc, name, _, expr) => {
        let value = self.eval(expr, scope)?;

        if !self.scopes.define(scope, name, value) {
          return Err(
            InterpreterError::VariableAlreadyDefined {
              loc: *loc,
              name: name.clone(),
            }
            .into(),
          );
        }
      },
      | Statement::Set(loc, name, expr) => {
        let value = self.eval(expr, scope)?;

        if !self.scopes.assign(scope, name, value) {
          return Err(
            InterpreterError::UndefinedVariable {
              loc: *loc,
              name: name.clone(),
            }
            .into(),
          );
        }
      },
      | Statement::For(loc, for_loop) => return self.execute_for(*loc, for_loop, scope),
      | Statement::While(_, condition, body) => {
        loop {
          let value = self.eval(condition, scope)?;

          if !self.truthy(condition.get_loc(), &value)? {
            break;
          }

          // The body runs in the enclosing scope.
          match self.execute_loop_body(body, scope)? {
            | Flow::Break(_) => break,
            | Flow::Return(value) => return Ok(Flow::Return(value)),
            | Flow::Normal | Flow::Continue(_) => {},
          }
        }
      },
      | Statement::Break(loc) => return Ok(Flow::Break(*loc)),
      | Statement::Continue(loc) => return Ok(Flow::Continue(*loc)),
      | Statement::Return(_, expr) => return Ok(Flow::Return(self.eval(expr, scope)?)),
      | Statement::Expression(_, expr) => {
        self.eval(expr, scope)?;
      },
    }

    Ok(Flow::Normal)
  }

  fn execute_for(&mut self, loc: Loc, for_loop: &'a ForLoop, scope: ScopeId) -> Eval<Flow> {
    let start = self.eval_bound(&for_loop.start, scope)?;
    let end = self.eval_bound(&for_loop.end, scope)?;

    let step = match &for_loop.step {
      | Some(step) => {
        let step_loc = step.get_loc();

        match self.eval(step, scope)? {
          | Value::Int(0) => return Err(InterpreterError::ZeroStep { loc: step_loc }.into()),
          | Value::Int(step) => step,
          | _ => return Err(InterpreterError::StepExpectsInteger { loc: step_loc }.into()),
        }
      },
      | None if start <= end => 1,
      | None => -1,
    };

    let in_range = |current: Int| {
      match (step > 0, for_loop.inclusive) {
        | (true, true) => current <= end,
        | (true, false) => current < end,
        | (false, true) => current >= end,
        | (false, false) => current > end,
      }
    };

    trace!("for loop at {loc}: {start}..{end} by {step}");

    let mut current = start;

    while in_range(current) {
      let flow = self.in_scope(scope, |this, iteration| {
        this.scopes.define(iteration, &for_loop.variable, Value::Int(current));
        this.execute_loop_body(&for_loop.body, iteration)
      })?;

      match flow {
        | Flow::Break(_) => break,
        | Flow::Return(value) => return Ok(Flow::Return(value)),
        | Flow::Normal | Flow::Continue(_) => {},
      }

      current = match current.checked_add(step) {
        | Some(next) => next,
        | None => break,
      };
    }

    Ok(Flow::Normal)
  }

  fn eval_bound(&mut self, expr: &'a Expression, scope: ScopeId) -> Eval<Int> {
    match self.eval(expr, scope)? {
      | Value::Int(value) => Ok(value),
      | _ => {
        Err(
          InterpreterError::RangeExpectsIntegers {
            loc: expr.get_loc(),
          }
          .into(),
        )
      },
    }
  }

  /// Runs one iteration of a loop body. Loop signals raised from nested expression blocks are
  /// turned back into flows here.
  fn execute_loop_body(&mut self, body: &'a Block, scope: ScopeId) -> Eval<Flow> {
    for statement in &body.statements {
      match self.execute_statement(statement, scope) {
        | Ok(Flow::Normal) => {},
        | Ok(flow) => return Ok(flow),
        | Err(Unwind::Break(loc)) => return Ok(Flow::Break(loc)),
        | Err(Unwind::Continue(loc)) => return Ok(Flow::Continue(loc)),
        | Err(error) => return Err(error),
      }
    }

    Ok(Flow::Normal)
  }

  /// Evaluates an `if` branch or `match` arm. Its value is the value of the last bare
  /// expression, or unit.
  fn eval_block(&mut self, block: &'a Block, scope: ScopeId) -> Eval<Value> {
    let mut last = Value::Unit;

    for statement in &block.statements {
      match statement {
        | Statement::Expression(_, expr) => last = self.eval(expr, scope)?,
        | Statement::Return(loc, _) => {
          return Err(InterpreterError::ReturnInExpressionBlock { loc: *loc }.into());
        },
        | statement => {
          match self.execute_statement(statement, scope)? {
            | Flow::Normal => {},
            | Flow::Break(loc) => return Err(Unwind::Break(loc)),
            | Flow::Continue(loc) => return Err(Unwind::Continue(loc)),
            | Flow::Return(_) => {
              return Err(
                InterpreterError::ReturnInsideLoopInExpressionBlock {
                  loc: statement.get_loc(),
                }
                .into(),
              );
            },
          }
        },
      }
    }

    Ok(last)
  }

  // Expressions.

  fn eval(&mut self, expr: &'a Expression, scope: ScopeId) -> Eval<Value> {
    match expr {
      | Expression::Literal(_, literal) => Ok(Value::from(literal)),
      | Expression::Ref(loc, name) => {
        if let Some(value) = self.scopes.get(scope, name) {
          return Ok(value.clone());
        }

        self.variant(name, self.module).ok_or_else(|| {
          InterpreterError::UndefinedVariable {
            loc: *loc,
            name: name.clone(),
          }
          .into()
        })
      },
      | Expression::Unary(loc, op, operand) => {
        let value = self.eval(operand, scope)?;

        let result = match (op, value) {
          | (UnaryOperator::Neg, Value::Int(value)) => {
            Value::Int(
              value
                .checked_neg()
                .ok_or(InterpreterError::IntegerOverflow { loc: *loc })?,
            )
          },
          | (UnaryOperator::Not, Value::Bool(value)) => Value::Bool(!value),
          | (UnaryOperator::Neg, _) => {
            return Err(
              InterpreterError::ExpectedIntegers {
                loc: *loc,
                op: op.to_string(),
              }
              .into(),
            )
          },
          | (UnaryOperator::Not, _) => {
            return Err(
              InterpreterError::ExpectedBooleans {
                loc: *loc,
                op: op.to_string(),
              }
              .into(),
            )
          },
        };

        Ok(result)
      },
      | Expression::Binary(loc, op @ (BinaryOperator::And | BinaryOperator::Or), left, right) => {
        let expect_bool = |value: Value| {
          match value {
            | Value::Bool(value) => Ok(value),
            | _ => {
              Err(InterpreterError::ExpectedBooleans {
                loc: *loc,
                op: op.to_string(),
              })
            },
          }
        };

        let left = expect_bool(self.eval(left, scope)?)?;

        // The right operand only runs when it decides the result.
        let decided = match op {
          | BinaryOperator::And => !left,
          | _ => left,
        };

        if decided {
          return Ok(Value::Bool(left));
        }

        Ok(Value::Bool(expect_bool(self.eval(right, scope)?)?))
      },
      | Expression::Binary(loc, op, left, right) => {
        let left = self.eval(left, scope)?;
        let right = self.eval(right, scope)?;

        Ok(binary(*loc, *op, left, right)?)
      },
      | Expression::If(_, condition, then_block, else_block) => {
        let value = self.eval(condition, scope)?;

        let block = if self.truthy(condition.get_loc(), &value)? {
          then_block
        } else {
          else_block
        };

        self.in_scope(scope, |this, inner| this.eval_block(block, inner))
      },
      | Expression::Match(loc, subject, arms) => {
        let subject = self.eval(subject, scope)?;

        for arm in arms {
          if matches_pattern(&arm.pattern, &subject) {
            return self.in_scope(scope, |this, inner| this.eval_block(&arm.body, inner));
          }
        }

        Err(InterpreterError::NonExhaustiveMatch { loc: *loc }.into())
      },
      | Expression::Call(loc, callee, args) => {
        if callee.module.is_none() && self.scopes.contains(scope, &callee.name) {
          return Err(
            InterpreterError::NotCallable {
              loc: *loc,
              name: callee.name.clone(),
            }
            .into(),
          );
        }

        let is_print = callee.module.is_none() && callee.name == "print";
        let target = if is_print {
          None
        } else {
          Some(self.resolve_callee(*loc, callee)?)
        };

        let mut values = vec![];

        for arg in args {
          values.push(self.eval(arg, scope)?);
        }

        match target {
          | Some((function, owner)) => Ok(self.call(*loc, &callee.to_string(), function, owner, values)?),
          | None => Ok(self.print(*loc, &values)?),
        }
      },
      | Expression::Field(loc, base, field) => {
        if let Some(value) = self.eval_qualified_variant(*loc, base, field, scope)? {
          return Ok(value);
        }

        match self.eval(base, scope)? {
          | record @ Value::Record(_) => {
            record.field(field).cloned().ok_or_else(|| {
              InterpreterError::MissingField {
                loc: *loc,
                name: field.clone(),
              }
              .into()
            })
          },
          | _ => Err(InterpreterError::ExpectedRecord { loc: *loc }.into()),
        }
      },
      | Expression::Index(loc, base, index) => {
        let base = self.eval(base, scope)?;
        let index = self.eval(index, scope)?;

        let values = match base {
          | Value::List(values) => values,
          | _ => return Err(InterpreterError::ExpectedList { loc: *loc }.into()),
        };

        let index = match index {
          | Value::Int(index) => index,
          | _ => return Err(InterpreterError::ExpectedIndex { loc: *loc }.into()),
        };

        usize::try_from(index)
          .ok()
          .and_then(|position| values.get(position))
          .cloned()
          .ok_or_else(|| {
            InterpreterError::IndexOutOfBounds {
              loc: *loc,
              index,
              len: values.len(),
            }
            .into()
          })
      },
      | Expression::Record(_, fields) => {
        let mut values = vec![];

        for field in fields {
          values.push((field.name.clone(), self.eval(&field.value, scope)?));
        }

        Ok(Value::Record(values))
      },
      | Expression::List(_, elements) => {
        let mut values = vec![];

        for element in elements {
          values.push(self.eval(element, scope)?);
        }

        Ok(Value::List(values))
      },
    }
  }

  /// `alias.Variant`, where `alias` is an import of the current module rather than a local.
  fn eval_qualified_variant(
    &self,
    loc: Loc,
    base: &Expression,
    variant: &str,
    scope: ScopeId,
  ) -> Result<Option<Value>, InterpreterError> {
    let alias = match base {
      | Expression::Ref(_, alias) if !self.scopes.contains(scope, alias) => alias,
      | _ => return Ok(None),
    };

    let target = match self.modules.resolve_alias(self.module, alias) {
      | Some(target) => target,
      | None => return Ok(None),
    };

    self.require_export(loc, alias, target, variant)?;

    self
      .variant(variant, target)
      .map(Some)
      .ok_or_else(|| {
        InterpreterError::UndefinedVariable {
          loc,
          name: format!("{alias}.{variant}"),
        }
      })
  }
}

fn binary(loc: Loc, op: BinaryOperator, left: Value, right: Value) -> Result<Value, InterpreterError> {
  let overflow = || InterpreterError::IntegerOverflow { loc };

  if op == BinaryOperator::Add
    && (matches!(left, Value::String(_)) || matches!(right, Value::String(_)))
  {
    return Ok(Value::String(format!("{left}{right}")));
  }

  match op {
    | BinaryOperator::Eq | BinaryOperator::NotEq => {
      if !left.same_kind(&right) {
        return Err(InterpreterError::MismatchedTypes {
          loc,
          op: op.to_string(),
        });
      }

      Ok(Value::Bool((left == right) == (op == BinaryOperator::Eq)))
    },
    | _ => {
      let (left, right) = match (left, right) {
        | (Value::Int(left), Value::Int(right)) => (left, right),
        | _ => {
          return Err(InterpreterError::ExpectedIntegers {
            loc,
            op: op.to_string(),
          })
        },
      };

      let value = match op {
        | BinaryOperator::Add => Value::Int(left.checked_add(right).ok_or_else(overflow)?),
        | BinaryOperator::Sub => Value::Int(left.checked_sub(right).ok_or_else(overflow)?),
        | BinaryOperator::Mul => Value::Int(left.checked_mul(right).ok_or_else(overflow)?),
        | BinaryOperator::Div => {
          if right == 0 {
            return Err(InterpreterError::DivisionByZero { loc });
          }

          // Rust division already truncates toward zero.
          Value::Int(left.checked_div(right).ok_or_else(overflow)?)
        },
        | BinaryOperator::Lt => Value::Bool(left < right),
        | BinaryOperator::LtEq => Value::Bool(left <= right),
        | BinaryOperator::Gt => Value::Bool(left > right),
        | BinaryOperator::GtEq => Value::Bool(left >= right),
        | BinaryOperator::Eq | BinaryOperator::NotEq | BinaryOperator::And | BinaryOperator::Or => {
          return Err(InterpreterError::ExpectedIntegers {
            loc,
            op: op.to_string(),
          })
        },
      };

      Ok(value)
    },
  }
}

fn matches_pattern(pattern: &Pattern, value: &Value) -> bool {
  match (pattern, value) {
    | (Pattern::Wildcard(_), _) => true,
    | (Pattern::Int(_, expected), Value::Int(value)) => expected == value,
    | (Pattern::String(_, expected), Value::String(value)) => expected == value,
    | (Pattern::Bool(_, expected), Value::Bool(value)) => expected == value,
    | _ => false,
  }
}

#[cfg(test)]
mod tests {
  use std::fs;
  use std::path::Path;

  use indoc::{formatdoc, indoc};
  use tempfile::TempDir;

  use super::*;
  use crate::loader::ModuleLoader;
  use crate::runtime::testing::*;
  use crate::runtime::Runtime;

  fn int(code: &str) -> Int {
    match value(code) {
      | Value::Int(value) => value,
      | other => panic!("expected an integer, got {other}"),
    }
  }

  // Loops.

  #[test]
  fn test_for_ranges() {
    let sum = |range: &str| {
      int(&format!(
        "fn main() -> Int {{ let s = 0; for i in {range} {{ set s = s + i; }} return s; }}"
      ))
    };

    assert_eq!(sum("0..4"), 6);
    assert_eq!(sum("0..=3"), 6);
    assert_eq!(sum("3..0"), 6);
    assert_eq!(sum("3..=0"), 6);
    assert_eq!(sum("0..10 by 2"), 20);
    assert_eq!(sum("10..0 by -3"), 22);
    assert_eq!(sum("0..0"), 0);
    assert_eq!(sum("0..5 by -1"), 0);
  }

  #[test]
  fn test_for_zero_step() {
    let error = runtime_error("fn main() { for i in 0..3 by 0 { } }");

    assert!(matches!(error, InterpreterError::ZeroStep { .. }));
    assert_eq!(error.to_string(), "for step cannot be zero");
  }

  #[test]
  fn test_for_variable_is_scoped_to_the_body() {
    let code = indoc! {"
      fn main() -> Int {
        let i = 100;
        for i in 0..3 { }
        return i;
      }
    "};

    assert_eq!(int(code), 100);
  }

  #[test]
  fn test_while_body_shares_enclosing_scope() {
    let code = indoc! {"
      fn main() {
        let n = 0;
        while n < 2 {
          let y = n;
          set n = n + 1;
        }
      }
    "};

    assert_eq!(
      runtime_error(code),
      InterpreterError::VariableAlreadyDefined {
        loc: Loc::new(4, 5),
        name: "y".to_string(),
      }
    );
  }

  #[test]
  fn test_break_and_continue_through_if_blocks() {
    let code = indoc! {"
      fn main() -> Int {
        let n = 0;
        let odd = 0;
        while true {
          set n = n + 1;
          if n > 9 { break; } else { };
          if n / 2 * 2 == n { continue; } else { };
          set odd = odd + n;
        }
        return odd;
      }
    "};

    assert_eq!(int(code), 25);
  }

  #[test]
  fn test_continue_in_for_advances_by_step() {
    let code = |range: &str, skip: Int| {
      int(&format!(
        "fn main() -> Int {{ let s = 0; for i in {range} {{ if i == {skip} {{ continue; }} else {{ }}; set s = s + i; }} return s; }}"
      ))
    };

    assert_eq!(code("0..=3", 2), 4);
    assert_eq!(code("0..10 by 3", 6), 12);
    assert_eq!(code("10..0 by -4", 6), 12);
  }

  #[test]
  fn test_break_only_leaves_innermost_loop() {
    let code = indoc! {"
      fn main() -> Int {
        let count = 0;
        for i in 0..3 {
          for j in 0..10 {
            if j == 2 { break; } else { };
            set count = count + 1;
          }
        }
        return count;
      }
    "};

    assert_eq!(int(code), 6);
  }

  #[test]
  fn test_return_from_nested_loops() {
    let code = indoc! {"
      fn find() -> Int {
        for i in 1..10 {
          while true {
            return i * 10;
          }
        }
        return -1;
      }
      fn main() -> Int { return find(); }
    "};

    assert_eq!(int(code), 10);
  }

  #[test]
  fn test_loop_signals_outside_loops() {
    assert!(matches!(
      unchecked_error("fn main() { break; }"),
      InterpreterError::BreakOutsideLoop { .. }
    ));

    assert!(matches!(
      unchecked_error("fn main() { if true { continue; } else { }; }"),
      InterpreterError::ContinueOutsideLoop { .. }
    ));

    assert_eq!(
      unchecked_error("fn main() { break; }").to_string(),
      "break used outside of a loop"
    );
  }

  #[test]
  fn test_return_in_expression_blocks() {
    assert!(matches!(
      unchecked_error("fn main() { if true { return 1; } else { }; }"),
      InterpreterError::ReturnInExpressionBlock { .. }
    ));

    assert!(matches!(
      unchecked_error("fn main() { if true { while true { return 1; } } else { }; }"),
      InterpreterError::ReturnInsideLoopInExpressionBlock { .. }
    ));
  }

  // Expressions.

  #[test]
  fn test_arithmetic() {
    assert_eq!(int("fn main() -> Int { return 1 + 2 * 3 - 4; }"), 3);
    assert_eq!(int("fn main() -> Int { return 7 / 2; }"), 3);
    assert_eq!(int("fn main() -> Int { return -7 / 2; }"), -3);
    assert_eq!(int("fn main() -> Int { return 7 / -2; }"), -3);
  }

  #[test]
  fn test_arithmetic_errors() {
    assert!(matches!(
      runtime_error("fn main() -> Int { return 1 / 0; }"),
      InterpreterError::DivisionByZero { .. }
    ));

    assert!(matches!(
      runtime_error("fn main() -> Int { let x = 9223372036854775807; return x + 1; }"),
      InterpreterError::IntegerOverflow { .. }
    ));

    assert!(matches!(
      runtime_error("fn main() -> Int { let x = 9223372036854775807; return -x - 2; }"),
      InterpreterError::IntegerOverflow { .. }
    ));
  }

  #[test]
  fn test_string_concatenation() {
    assert_eq!(
      value("fn main() -> String { return \"n=\" + 1 + \"!\"; }"),
      Value::String("n=1!".to_string())
    );
  }

  #[test]
  fn test_short_circuit() {
    let code = |op: &str| {
      format!(
        "fn boom() -> Bool {{ return 1 / 0 == 0; }} fn main() -> Bool {{ return {op}; }}"
      )
    };

    assert_eq!(value(&code("false && boom()")), Value::Bool(false));
    assert_eq!(value(&code("true || boom()")), Value::Bool(true));
    assert!(matches!(
      runtime_error(&code("true && boom()")),
      InterpreterError::DivisionByZero { .. }
    ));
  }

  #[test]
  fn test_equality() {
    assert_eq!(value("fn main() -> Bool { return [1, 2] == [1, 2]; }"), Value::Bool(true));
    assert_eq!(
      value("fn main() -> Bool { return {x: 1, y: 2} != {y: 2, x: 1}; }"),
      Value::Bool(false)
    );

    assert_eq!(
      unchecked_error("fn main() { return 1 == \"1\"; }").to_string(),
      "Operator '==' expects matching types"
    );
  }

  #[test]
  fn test_conditions() {
    let pick = |condition: &str| {
      let (result, _) = run_unchecked(&format!(
        "fn main() {{ return if {condition} {{ 1; }} else {{ 2; }}; }}"
      ));

      result.unwrap()
    };

    assert_eq!(pick("true"), Value::Int(1));
    assert_eq!(pick("0"), Value::Int(2));
    assert_eq!(pick("-1"), Value::Int(1));
    assert_eq!(pick("\"\""), Value::Int(2));
    assert_eq!(pick("\"a\""), Value::Int(1));

    assert_eq!(
      unchecked_error("fn main() { let l = [1]; while l { } }"),
      InterpreterError::InvalidCondition {
        loc: Loc::new(1, 32),
        found: "List".to_string(),
      }
    );
  }

  #[test]
  fn test_if_value_is_last_expression() {
    let code = indoc! {"
      fn main() -> Int {
        return if true {
          let x = 2;
          x * 21;
        } else {
          0;
        };
      }
    "};

    assert_eq!(int(code), 42);

    let (result, _) = run_unchecked("fn main() { return if true { let x = 1; } else { 2; }; }");
    assert_eq!(result.unwrap(), Value::Unit);
  }

  #[test]
  fn test_records_and_lists() {
    assert_eq!(
      int("fn main() -> Int { let p = {x: 3, y: 4}; return p.x * p.y; }"),
      12
    );

    assert_eq!(int("fn main() -> Int { let l = [10, 20, 30]; return l[1]; }"), 20);

    assert_eq!(
      runtime_error("fn main() -> Int { let l = [1, 2]; return l[5]; }").to_string(),
      "List index 5 out of bounds (length 2)"
    );

    assert_eq!(
      runtime_error("fn main() -> Int { let l = [1, 2]; return l[-1]; }").to_string(),
      "List index -1 out of bounds (length 2)"
    );

    assert_eq!(
      unchecked_error("fn main() { let r = {x: 1}; return r.y; }").to_string(),
      "Record has no field 'y'"
    );
  }

  #[test]
  fn test_match() {
    let describe = |n: Int| {
      value(&formatdoc!(
        "
        fn describe(n: Int) -> String {{
          return match n {{
            0 => {{ \"zero\"; }},
            1 => {{ \"one\"; }},
            _ => {{ \"many\"; }}
          }};
        }}
        fn main() -> String {{ return describe({}); }}
      ",
        n
      ))
    };

    assert_eq!(describe(0), Value::String("zero".to_string()));
    assert_eq!(describe(1), Value::String("one".to_string()));
    assert_eq!(describe(7), Value::String("many".to_string()));
  }

  #[test]
  fn test_non_exhaustive_match() {
    let error = runtime_error("fn main() { match 3 { 1 => { }, 2 => { } }; }");

    assert_eq!(error, InterpreterError::NonExhaustiveMatch { loc: Loc::new(1, 13) });
  }

  #[test]
  fn test_variants() {
    let code = indoc! {"
      enum Color { Red, Blue }
      fn main() -> Bool {
        let c = Red;
        print(c);
        return c == Blue;
      }
    "};

    let (result, output) = run(code);

    assert_eq!(result.unwrap(), Value::Bool(false));
    assert_eq!(output, "Red\n");
  }

  // Functions.

  #[test]
  fn test_recursion() {
    let code = indoc! {"
      fn fib(n: Int) -> Int {
        return if n < 2 { n; } else { fib(n - 1) + fib(n - 2); };
      }
      fn main() -> Int { return fib(15); }
    "};

    assert_eq!(int(code), 610);
  }

  #[test]
  fn test_functions_do_not_capture_callers() {
    let code = indoc! {"
      fn f() { return x; }
      fn main() { let x = 1; return f(); }
    "};

    assert_eq!(
      unchecked_error(code),
      InterpreterError::UndefinedVariable {
        loc: Loc::new(1, 17),
        name: "x".to_string(),
      }
    );
  }

  #[test]
  fn test_call_errors() {
    assert_eq!(
      unchecked_error("fn f(a) { return a; } fn main() { return f(1, 2); }").to_string(),
      "Function 'f' expected 1 args, got 2"
    );

    assert!(matches!(
      unchecked_error("fn main() { let f = 1; f(); }"),
      InterpreterError::NotCallable { .. }
    ));

    assert!(matches!(
      unchecked_error("fn main() { g(); }"),
      InterpreterError::UnknownFunction { .. }
    ));
  }

  #[test]
  fn test_print_is_builtin() {
    assert_eq!(
      unchecked_error("fn print(x) { } fn main() { print(1, 2); }"),
      InterpreterError::FunctionAlreadyDefined {
        loc: Loc::new(1, 1),
        name: "print".to_string(),
      }
    );
  }

  #[test]
  fn test_missing_main() {
    let (result, _) = run_unchecked("fn helper() { }");

    match result {
      | Err(error @ LangError::Interpreter(None, InterpreterError::MissingMain)) => {
        assert_eq!(error.summary(), "RuntimeError: No 'main' function defined");
      },
      | other => panic!("expected missing main, got {other:?}"),
    }
  }

  #[test]
  fn test_print() {
    let code = indoc! {"
      fn main() {
        print(\"sum\", 1 + 2, true);
        print({x: 1, name: \"roc\"}, [1, 2]);
        print();
      }
    "};

    assert_eq!(output(code), "sum 3 true\n{x: 1, name: \"roc\"} [1, 2]\n\n");
  }

  #[test]
  fn test_main_value() {
    assert_eq!(value("fn main() { }"), Value::Unit);
    assert_eq!(
      value("fn main() -> Int { return 1; }"),
      Value::Int(1)
    );
  }

  // Modules.

  const MATH: &str = indoc! {"
    module math
    export { div, Color, Red };
    enum Color { Red, Blue }
    fn div(a: Int, b: Int) -> Int { return a / b; }
    fn secret() -> Int { return 7; }
  "};

  fn write_files(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();

    for (name, code) in files {
      fs::write(dir.path().join(name), code).unwrap();
    }

    dir
  }

  fn run_file(path: &Path) -> (Result<Value, LangError>, String) {
    let mut runtime = Runtime::with_output(vec![]);
    let result = runtime.run(path);

    (result, String::from_utf8(runtime.into_output()).unwrap())
  }

  #[test]
  fn test_cross_module_calls_and_variants() {
    let main = indoc! {"
      import math as m;
      fn main() -> Int {
        print(m.Red);
        print(m.Red == m.Red);
        return m.div(9, 2);
      }
    "};

    let dir = write_files(&[("math.roc", MATH), ("main.roc", main)]);
    let (result, output) = run_file(&dir.path().join("main.roc"));

    assert_eq!(result.unwrap(), Value::Int(4));
    assert_eq!(output, "Red\ntrue\n");
  }

  #[test]
  fn test_runtime_missing_export() {
    let main = indoc! {"
      import math;
      fn main() { return math.secret(); }
    "};

    let dir = write_files(&[("math.roc", MATH), ("main.roc", main)]);
    let loaded = ModuleLoader::load_file(&dir.path().join("main.roc")).unwrap();
    let mut output = vec![];

    let error = Interpreter::new(&loaded, &mut output).execute().unwrap_err();

    assert_eq!(error.to_string(), "math has no export 'secret'");
  }

  #[test]
  fn test_error_carries_module_source() {
    let main = indoc! {"
      import math;
      fn main() { return math.div(1, 0); }
    "};

    let dir = write_files(&[("math.roc", MATH), ("main.roc", main)]);
    let (result, output) = run_file(&dir.path().join("main.roc"));

    match result {
      | Err(LangError::Interpreter(Some(source), error)) => {
        assert_eq!(source.file_name(), "math.roc");
        assert_eq!(error, InterpreterError::DivisionByZero { loc: Loc::new(4, 42) });
      },
      | other => panic!("expected runtime error, got {other:?}"),
    }

    assert_eq!(output, "");
  }

  #[test]
  fn test_nothing_runs_when_check_fails() {
    let (result, output) = run("fn main() { print(\"hi\"); let x: Int = true; }");

    assert!(matches!(result, Err(LangError::Typechecker(..))));
    assert_eq!(output, "");
  }
}
