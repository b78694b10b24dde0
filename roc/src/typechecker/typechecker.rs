use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use super::{Context, Type, TypeVars};
use crate::ast::*;
use crate::errors::{LangError, TypeError};
use crate::loader::{LoadedProgram, ModuleId, ModuleTable};
use crate::source::SourceCode;

#[derive(Debug, Clone)]
struct FunctionType {
  module: ModuleId,
  params: Vec<Type>,
  ret: Type,
}

/// Infers and validates the types of a loaded program. Stops at the first error.
#[derive(Debug)]
pub struct Typechecker<'a> {
  program: &'a Program,
  modules: &'a ModuleTable,
  vars: TypeVars,
  context: Context,
  functions: HashMap<String, FunctionType>,
  /// Enum name to the module defining it.
  enums: HashMap<String, ModuleId>,
  /// Variant name to its enum.
  variants: HashMap<String, String>,
  /// Module whose code is being checked.
  module: ModuleId,
}

impl<'a> Typechecker<'a> {
  pub fn new(loaded: &'a LoadedProgram) -> Self {
    Typechecker {
      program: &loaded.program,
      modules: &loaded.modules,
      vars: TypeVars::new(),
      context: Context::new(),
      functions: HashMap::new(),
      enums: HashMap::new(),
      variants: HashMap::new(),
      module: loaded.modules.root(),
    }
  }

  pub fn check(&mut self) -> Result<(), LangError> {
    let result = self.check_program();
    result.map_err(|error| LangError::Typechecker(self.source(), error))
  }

  /// Signature of a checked function, such as `(Int, t3) -> Bool`.
  pub fn signature(&self, name: &str) -> Option<String> {
    self.functions.get(name).map(|function| {
      let params = function
        .params
        .iter()
        .map(|param| self.vars.render(param))
        .collect::<Vec<_>>();

      format!("({}) -> {}", params.join(", "), self.vars.render(&function.ret))
    })
  }

  fn source(&self) -> SourceCode {
    self
      .modules
      .get(self.module)
      .map(|module| module.source.clone())
      .unwrap_or_else(|| SourceCode::from_str(""))
  }

  fn check_program(&mut self) -> Result<(), TypeError> {
    let program = self.program;

    for enum_def in &program.enums {
      self.collect_enum(enum_def)?;
    }

    // Signatures first, so bodies can call functions defined after them.
    for function in &program.functions {
      self.collect_function(function)?;
    }

    self.check_exports()?;

    for function in &program.functions {
      self.check_function(function)?;
    }

    debug!(
      "checked {} function(s) using {} type variable(s)",
      program.functions.len(),
      self.vars.len()
    );

    Ok(())
  }

  fn owner(&self, owner: Option<ModuleId>) -> ModuleId {
    owner.unwrap_or_else(|| self.modules.root())
  }

  fn collect_enum(&mut self, enum_def: &EnumDef) -> Result<(), TypeError> {
    self.module = self.owner(self.modules.enum_owner(&enum_def.name));

    if self.enums.contains_key(&enum_def.name) {
      return Err(TypeError::EnumAlreadyDefined {
        loc: enum_def.loc,
        name: enum_def.name.clone(),
      });
    }

    self.enums.insert(enum_def.name.clone(), self.module);

    for variant in &enum_def.variants {
      if self.variants.contains_key(variant) {
        return Err(TypeError::VariantAlreadyDefined {
          loc: enum_def.loc,
          name: variant.clone(),
        });
      }

      self.variants.insert(variant.clone(), enum_def.name.clone());
    }

    Ok(())
  }

  fn collect_function(&mut self, function: &FunctionDef) -> Result<(), TypeError> {
    self.module = self.owner(self.modules.function_owner(&function.name));

    // `print` is built in.
    if function.name == "print" || self.functions.contains_key(&function.name) {
      return Err(TypeError::FunctionAlreadyDefined {
        loc: function.loc,
        name: function.name.clone(),
      });
    }

    let mut params = vec![];

    for param in &function.params {
      params.push(self.annotation_or_fresh(param.type_ann.as_ref())?);
    }

    let ret = self.annotation_or_fresh(function.return_type.as_ref())?;

    self.functions.insert(
      function.name.clone(),
      FunctionType {
        module: self.module,
        params,
        ret,
      },
    );

    Ok(())
  }

  /// Every exported name must be a function, enum or variant defined by the exporting module.
  fn check_exports(&mut self) -> Result<(), TypeError> {
    let modules = self.modules;

    for module in modules.iter() {
      self.module = module.id;

      for export in &module.exports {
        let defined = self
          .functions
          .get(&export.name)
          .map(|function| function.module == module.id)
          .or_else(|| self.enums.get(&export.name).map(|owner| *owner == module.id))
          .or_else(|| {
            self
              .variants
              .get(&export.name)
              .and_then(|enum_name| self.enums.get(enum_name))
              .map(|owner| *owner == module.id)
          })
          .unwrap_or(false);

        if !defined {
          return Err(TypeError::UnknownExport {
            loc: export.loc,
            name: export.name.clone(),
          });
        }
      }
    }

    Ok(())
  }

  fn check_function(&mut self, function: &FunctionDef) -> Result<(), TypeError> {
    let signature = match self.functions.get(&function.name) {
      | Some(signature) => signature.clone(),
      | None => {
        return Err(TypeError::UnknownFunction {
          loc: function.loc,
          name: function.name.clone(),
        })
      },
    };

    trace!("checking function '{}'", function.name);

    self.module = signature.module;
    self.context = Context::new();

    for (param, ty) in function.params.iter().zip(&signature.params) {
      self.define(param.loc, &param.name, ty.clone())?;
    }

    let mut returns = false;

    for statement in &function.body.statements {
      returns |= self.check_statement(statement, &signature.ret, false, true)?;
    }

    if !returns {
      self.vars.unify(
        &signature.ret,
        &Type::Unit,
        &format!("implicit return in '{}'", function.name),
        function.loc,
      )?;
    }

    Ok(())
  }

  // Names and annotations.

  fn define(&mut self, loc: Loc, name: &str, ty: Type) -> Result<(), TypeError> {
    if self.context.define(name, ty) {
      Ok(())
    } else {
      Err(TypeError::VariableAlreadyDefined {
        loc,
        name: name.to_string(),
      })
    }
  }

  fn annotation_or_fresh(&mut self, type_ref: Option<&TypeRef>) -> Result<Type, TypeError> {
    match type_ref {
      | Some(type_ref) => self.resolve_type_ref(type_ref),
      | None => Ok(self.vars.fresh()),
    }
  }

  fn resolve_type_ref(&self, type_ref: &TypeRef) -> Result<Type, TypeError> {
    let unknown = || {
      TypeError::UnknownType {
        loc: type_ref.loc,
        name: type_ref.to_string(),
      }
    };

    match &type_ref.module {
      | None => {
        match type_ref.name.as_str() {
          | "Int" => Ok(Type::Int),
          | "Bool" => Ok(Type::Bool),
          | "String" => Ok(Type::String),
          | "Unit" => Ok(Type::Unit),
          | name if self.enums.get(name) == Some(&self.module) => Ok(Type::Enum(name.to_string())),
          | _ => Err(unknown()),
        }
      },
      | Some(alias) => {
        let target = self.resolve_module(type_ref.loc, alias)?;
        self.require_export(type_ref.loc, alias, target, &type_ref.name)?;

        match self.enums.get(&type_ref.name) {
          | Some(owner) if *owner == target => Ok(Type::Enum(type_ref.name.clone())),
          | _ => Err(unknown()),
        }
      },
    }
  }

  fn resolve_module(&self, loc: Loc, alias: &str) -> Result<ModuleId, TypeError> {
    self
      .modules
      .resolve_alias(self.module, alias)
      .ok_or_else(|| {
        TypeError::UnknownModule {
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
  ) -> Result<(), TypeError> {
    if self.modules.is_exported(target, name) {
      Ok(())
    } else {
      Err(TypeError::MissingExport {
        loc,
        module: alias.to_string(),
        name: name.to_string(),
      })
    }
  }

  /// Enum type of `variant` if it is defined by module `owner`.
  fn variant_type(&self, variant: &str, owner: ModuleId) -> Option<Type> {
    let enum_name = self.variants.get(variant)?;

    match self.enums.get(enum_name) {
      | Some(module) if *module == owner => Some(Type::Enum(enum_name.clone())),
      | _ => None,
    }
  }

  fn in_block<T, F>(&mut self, func: F) -> Result<T, TypeError>
  where
    F: FnOnce(&mut Self) -> Result<T, TypeError>,
  {
    self.context.enter_block();
    let result = func(self);
    self.context.exit_block();

    result
  }

  // Statements.

  /// Checks a statement of a function body or loop body. Returns whether it is a `return`.
  fn check_statement(
    &mut self,
    statement: &Statement,
    ret: &Type,
    in_loop: bool,
    allow_return: bool,
  ) -> Result<bool, TypeError> {
    match statement {
      | Statement::Let(loc, name, type_ann, expr) => {
        let ty = self.check_expression(expr, in_loop)?;

        let ty = match type_ann {
          | Some(type_ann) => {
            let annotated = self.resolve_type_ref(type_ann)?;
            self.vars.unify(&annotated, &ty, &format!("let '{name}'"), *loc)?;
            annotated
          },
          | None => ty,
        };

        self.define(*loc, name, ty)?;
      },
      | Statement::Set(loc, name, expr) => {
        let ty = self.check_expression(expr, in_loop)?;

        let existing = match self.context.get(name) {
          | Some(existing) => existing.clone(),
          | None => {
            return Err(TypeError::UndefinedVariable {
              loc: *loc,
              name: name.clone(),
            })
          },
        };

        self
          .vars
          .unify(&existing, &ty, &format!("assignment to '{name}'"), *loc)?;
      },
      | Statement::For(loc, for_loop) => {
        let start = self.check_expression(&for_loop.start, in_loop)?;
        let end = self.check_expression(&for_loop.end, in_loop)?;

        self
          .vars
          .unify(&start, &Type::Int, "for range start", for_loop.start.get_loc())?;
        self
          .vars
          .unify(&end, &Type::Int, "for range end", for_loop.end.get_loc())?;

        if let Some(step) = &for_loop.step {
          let ty = self.check_expression(step, in_loop)?;
          self
            .vars
            .unify(&ty, &Type::Int, "for range step", step.get_loc())?;
        }

        self.in_block(|this| {
          this.define(*loc, &for_loop.variable, Type::Int)?;

          for inner in &for_loop.body.statements {
            this.check_statement(inner, ret, true, allow_return)?;
          }

          Ok(())
        })?;
      },
      | Statement::While(_, condition, body) => {
        let ty = self.check_expression(condition, in_loop)?;
        self
          .vars
          .unify(&ty, &Type::Bool, "while condition", condition.get_loc())?;

        // The body shares the enclosing block.
        for inner in &body.statements {
          self.check_statement(inner, ret, true, allow_return)?;
        }
      },
      | Statement::Break(loc) => {
        if !in_loop {
          return Err(TypeError::BreakOutsideLoop { loc: *loc });
        }
      },
      | Statement::Continue(loc) => {
        if !in_loop {
          return Err(TypeError::ContinueOutsideLoop { loc: *loc });
        }
      },
      | Statement::Return(loc, expr) => {
        if !allow_return {
          return Err(TypeError::ReturnInExpressionBlock { loc: *loc });
        }

        let ty = self.check_expression(expr, in_loop)?;
        self.vars.unify(ret, &ty, "return", *loc)?;

        return Ok(true);
      },
      | Statement::Expression(_, expr) => {
        self.check_expression(expr, in_loop)?;
      },
    }

    Ok(false)
  }

  /// Checks the body of an `if` branch or `match` arm. Its type is the type of the last bare
  /// expression, or `Unit`.
  fn check_expression_block(&mut self, block: &Block, in_loop: bool) -> Result<Type, TypeError> {
    let mut last = Type::Unit;

    for statement in &block.statements {
      match statement {
        | Statement::Expression(_, expr) => last = self.check_expression(expr, in_loop)?,
        | Statement::Return(loc, _) => {
          return Err(TypeError::ReturnInExpressionBlock { loc: *loc });
        },
        | statement => {
          self.check_statement(statement, &Type::Unit, in_loop, false)?;
        },
      }
    }

    Ok(last)
  }

  // Expressions.

  fn check_expression(&mut self, expr: &Expression, in_loop: bool) -> Result<Type, TypeError> {
    match expr {
      | Expression::Literal(_, literal) => {
        Ok(match literal {
          | Literal::Int(_) => Type::Int,
          | Literal::String(_) => Type::String,
          | Literal::Bool(_) => Type::Bool,
        })
      },
      | Expression::Ref(loc, name) => self.check_ref(*loc, name),
      | Expression::Unary(loc, op, operand) => {
        let ty = self.check_expression(operand, in_loop)?;

        let expected = match op {
          | UnaryOperator::Neg => Type::Int,
          | UnaryOperator::Not => Type::Bool,
        };

        self
          .vars
          .unify(&ty, &expected, &format!("unary {op}"), *loc)?;

        Ok(expected)
      },
      | Expression::Binary(loc, op, left, right) => {
        // Both operands are checked even where evaluation short-circuits.
        let left = self.check_expression(left, in_loop)?;
        let right = self.check_expression(right, in_loop)?;

        self.check_binary(*loc, *op, &left, &right)
      },
      | Expression::If(loc, condition, then_block, else_block) => {
        let ty = self.check_expression(condition, in_loop)?;
        self
          .vars
          .unify(&ty, &Type::Bool, "if condition", condition.get_loc())?;

        let then_ty = self.in_block(|this| this.check_expression_block(then_block, in_loop))?;
        let else_ty = self.in_block(|this| this.check_expression_block(else_block, in_loop))?;

        self.vars.unify(&then_ty, &else_ty, "if expression", *loc)
      },
      | Expression::Match(loc, subject, arms) => {
        let subject = self.check_expression(subject, in_loop)?;

        if arms.is_empty() {
          return Err(TypeError::EmptyMatch { loc: *loc });
        }

        let mut result: Option<Type> = None;

        for arm in arms {
          let implied = match arm.pattern {
            | Pattern::Int(..) => Some(Type::Int),
            | Pattern::String(..) => Some(Type::String),
            | Pattern::Bool(..) => Some(Type::Bool),
            | Pattern::Wildcard(_) => None,
          };

          if let Some(implied) = implied {
            self
              .vars
              .unify(&subject, &implied, "match pattern", arm.loc)?;
          }

          let ty = self.in_block(|this| this.check_expression_block(&arm.body, in_loop))?;

          result = Some(match result {
            | Some(result) => self.vars.unify(&result, &ty, "match expression", arm.loc)?,
            | None => ty,
          });
        }

        Ok(result.unwrap_or(Type::Unit))
      },
      | Expression::Call(loc, callee, args) => self.check_call(*loc, callee, args, in_loop),
      | Expression::Field(loc, base, field) => {
        if let Some(ty) = self.check_qualified_variant(*loc, base, field)? {
          return Ok(ty);
        }

        let base = self.check_expression(base, in_loop)?;

        match self.vars.resolve(&base) {
          | Type::Var(_) => {
            let field_ty = self.vars.fresh();
            let record = Type::Record(vec![(field.clone(), field_ty.clone())]);

            self.vars.unify(&base, &record, "field access", *loc)?;

            Ok(field_ty)
          },
          | Type::Record(fields) => {
            match fields.iter().find(|(name, _)| name == field) {
              | Some((_, ty)) => Ok(ty.clone()),
              | None => {
                Err(TypeError::UnknownField {
                  loc: *loc,
                  field: field.clone(),
                  available: fields.iter().map(|(name, _)| name.clone()).collect(),
                })
              },
            }
          },
          | other => {
            Err(TypeError::NotARecord {
              loc: *loc,
              found: self.vars.render(&other),
            })
          },
        }
      },
      | Expression::Index(loc, base, index) => {
        let base = self.check_expression(base, in_loop)?;
        let index_ty = self.check_expression(index, in_loop)?;

        self
          .vars
          .unify(&index_ty, &Type::Int, "list index", index.get_loc())?;

        match self.vars.resolve(&base) {
          | Type::Var(_) => {
            let element = self.vars.fresh();
            self
              .vars
              .unify(&base, &Type::list(element.clone()), "list index", *loc)?;

            Ok(element)
          },
          | Type::List(element) => Ok(*element),
          | other => {
            Err(TypeError::NotAList {
              loc: *loc,
              found: self.vars.render(&other),
            })
          },
        }
      },
      | Expression::Record(_, fields) => {
        let mut seen = HashSet::new();
        let mut types = vec![];

        for field in fields {
          if !seen.insert(field.name.as_str()) {
            return Err(TypeError::DuplicateField {
              loc: field.loc,
              name: field.name.clone(),
            });
          }

          types.push((field.name.clone(), self.check_expression(&field.value, in_loop)?));
        }

        Ok(Type::Record(types))
      },
      | Expression::List(_, elements) => {
        let element = match elements.first() {
          | Some(first) => self.check_expression(first, in_loop)?,
          | None => return Ok(Type::list(self.vars.fresh())),
        };

        for other in elements.iter().skip(1) {
          let ty = self.check_expression(other, in_loop)?;
          self
            .vars
            .unify(&element, &ty, "list literal", other.get_loc())?;
        }

        Ok(Type::list(element))
      },
    }
  }

  /// Function names are never values, even when a local of the same name is in scope.
  fn check_ref(&mut self, loc: Loc, name: &str) -> Result<Type, TypeError> {
    if self.functions.contains_key(name) {
      return Err(TypeError::FunctionNotAValue {
        loc,
        name: name.to_string(),
      });
    }

    if let Some(ty) = self.context.get(name) {
      return Ok(ty.clone());
    }

    self
      .variant_type(name, self.module)
      .ok_or_else(|| {
        TypeError::UndefinedVariable {
          loc,
          name: name.to_string(),
        }
      })
  }

  /// `alias.Variant`, where `alias` is an import of the current module rather than a local.
  fn check_qualified_variant(
    &self,
    loc: Loc,
    base: &Expression,
    variant: &str,
  ) -> Result<Option<Type>, TypeError> {
    let alias = match base {
      | Expression::Ref(_, alias) if !self.context.contains(alias) => alias,
      | _ => return Ok(None),
    };

    let target = match self.modules.resolve_alias(self.module, alias) {
      | Some(target) => target,
      | None => return Ok(None),
    };

    self.require_export(loc, alias, target, variant)?;

    match self.variant_type(variant, target) {
      | Some(ty) => Ok(Some(ty)),
      | None => {
        Err(TypeError::UndefinedVariable {
          loc,
          name: format!("{alias}.{variant}"),
        })
      },
    }
  }

  fn check_binary(
    &mut self,
    loc: Loc,
    op: BinaryOperator,
    left: &Type,
    right: &Type,
  ) -> Result<Type, TypeError> {
    let context = format!("binary {op}");

    match op {
      | BinaryOperator::Add => {
        let left_resolved = self.vars.resolve(left);
        let right_resolved = self.vars.resolve(right);
        let is = |ty: &Type| left_resolved == *ty || right_resolved == *ty;

        if is(&Type::Bool) || is(&Type::Unit) {
          return Err(TypeError::InvalidAddOperands {
            loc,
            left: self.vars.render(&left_resolved),
            right: self.vars.render(&right_resolved),
          });
        }

        if is(&Type::String) {
          return Ok(Type::String);
        }

        self.vars.unify(left, &Type::Int, &context, loc)?;
        self.vars.unify(right, &Type::Int, &context, loc)?;

        Ok(Type::Int)
      },
      | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div => {
        self.vars.unify(left, &Type::Int, &context, loc)?;
        self.vars.unify(right, &Type::Int, &context, loc)?;

        Ok(Type::Int)
      },
      | BinaryOperator::Lt | BinaryOperator::LtEq | BinaryOperator::Gt | BinaryOperator::GtEq => {
        self.vars.unify(left, &Type::Int, &context, loc)?;
        self.vars.unify(right, &Type::Int, &context, loc)?;

        Ok(Type::Bool)
      },
      | BinaryOperator::Eq | BinaryOperator::NotEq => {
        self.vars.unify(left, right, &context, loc)?;

        Ok(Type::Bool)
      },
      | BinaryOperator::And | BinaryOperator::Or => {
        self.vars.unify(left, &Type::Bool, &context, loc)?;
        self.vars.unify(right, &Type::Bool, &context, loc)?;

        Ok(Type::Bool)
      },
    }
  }

  fn check_call(
    &mut self,
    loc: Loc,
    callee: &Callee,
    args: &[Expression],
    in_loop: bool,
  ) -> Result<Type, TypeError> {
    let owner = match &callee.module {
      | None => {
        if self.context.contains(&callee.name) {
          return Err(TypeError::NotCallable {
            loc,
            name: callee.name.clone(),
          });
        }

        if callee.name == "print" {
          for arg in args {
            self.check_expression(arg, in_loop)?;
          }

          return Ok(Type::Unit);
        }

        self.module
      },
      | Some(alias) => {
        let target = self.resolve_module(loc, alias)?;
        self.require_export(loc, alias, target, &callee.name)?;

        target
      },
    };

    let function = match self.functions.get(&callee.name) {
      | Some(function) if function.module == owner => function.clone(),
      | _ => {
        return Err(TypeError::UnknownFunction {
          loc,
          name: callee.to_string(),
        })
      },
    };

    if args.len() != function.params.len() {
      return Err(TypeError::ArityMismatch {
        loc,
        name: callee.to_string(),
        expected: function.params.len(),
        found: args.len(),
      });
    }

    for (arg, param) in args.iter().zip(&function.params) {
      let ty = self.check_expression(arg, in_loop)?;
      self
        .vars
        .unify(&ty, param, &format!("call to '{callee}'"), arg.get_loc())?;
    }

    Ok(function.ret)
  }
}

/// Type checks a loaded program.
pub fn check_program(loaded: &LoadedProgram) -> Result<(), LangError> {
  Typechecker::new(loaded).check()
}
