use crate::ast::Loc;
use crate::errors::TypeError;

/// Index of a type variable in its [TypeVars] arena.
pub type TypeVarId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
  Int,
  Bool,
  String,
  Unit,
  Var(TypeVarId),
  /// Fields in declaration order. Two records are the same type when they have the same field
  /// names, whatever the order.
  Record(Vec<(String, Type)>),
  List(Box<Type>),
  Enum(String),
}

impl Type {
  pub fn record(fields: &[(&str, Type)]) -> Type {
    Type::Record(
      fields
        .iter()
        .map(|(name, ty)| (name.to_string(), ty.clone()))
        .collect(),
    )
  }

  pub fn list(element: Type) -> Type {
    Type::List(Box::new(element))
  }

  fn field(&self, name: &str) -> Option<&Type> {
    match self {
      | Type::Record(fields) => {
        fields
          .iter()
          .find(|(field, _)| field == name)
          .map(|(_, ty)| ty)
      },
      | _ => None,
    }
  }
}

/// Arena of type variables owned by a single check pass. Each slot holds the type the variable
/// was bound to, if any.
#[derive(Clone, Debug, Default)]
pub struct TypeVars {
  instances: Vec<Option<Type>>,
}

impl TypeVars {
  pub fn new() -> Self {
    TypeVars::default()
  }

  pub fn fresh(&mut self) -> Type {
    self.instances.push(None);
    Type::Var(self.instances.len() - 1)
  }

  pub fn len(&self) -> usize {
    self.instances.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instances.is_empty()
  }

  /// Follows the chain of bound variables starting at `ty`, compressing it on the way back.
  /// Only the outermost type is resolved.
  pub fn resolve(&mut self, ty: &Type) -> Type {
    let id = match ty {
      | Type::Var(id) => *id,
      | _ => return ty.clone(),
    };

    match self.instance(id).cloned() {
      | Some(instance) => {
        let resolved = self.resolve(&instance);
        self.instances[id] = Some(resolved.clone());
        resolved
      },
      | None => ty.clone(),
    }
  }

  /// Makes `left` and `right` denote the same type, binding free variables as needed.
  pub fn unify(
    &mut self,
    left: &Type,
    right: &Type,
    context: &str,
    loc: Loc,
  ) -> Result<Type, TypeError> {
    let left = self.resolve(left);
    let right = self.resolve(right);

    if left == right {
      return Ok(left);
    }

    match (&left, &right) {
      | (Type::Var(id), _) => self.bind(*id, right.clone(), context, loc),
      | (_, Type::Var(id)) => self.bind(*id, left.clone(), context, loc),
      | (Type::Record(fields), Type::Record(others)) => {
        let same_fields = fields.len() == others.len()
          && fields.iter().all(|(name, _)| right.field(name).is_some());

        if !same_fields {
          return Err(TypeError::RecordFieldsMismatch {
            loc,
            left: field_names(fields),
            right: field_names(others),
            context: context.to_string(),
          });
        }

        for (name, ty) in fields {
          if let Some(other) = right.field(name) {
            self.unify(ty, other, &format!("record field '{name}'"), loc)?;
          }
        }

        Ok(left)
      },
      | (Type::List(element), Type::List(other)) => {
        self.unify(element, other, "list element", loc)?;
        Ok(left)
      },
      | _ => {
        Err(TypeError::TypeMismatch {
          loc,
          left: self.render(&left),
          right: self.render(&right),
          context: context.to_string(),
        })
      },
    }
  }

  /// Human readable form of `ty` with every bound variable substituted.
  pub fn render(&self, ty: &Type) -> String {
    match ty {
      | Type::Int => "Int".to_string(),
      | Type::Bool => "Bool".to_string(),
      | Type::String => "String".to_string(),
      | Type::Unit => "Unit".to_string(),
      | Type::Enum(name) => name.clone(),
      | Type::Var(id) => {
        match self.instance(*id) {
          | Some(instance) => self.render(instance),
          | None => format!("t{id}"),
        }
      },
      | Type::Record(fields) => {
        let fields = fields
          .iter()
          .map(|(name, ty)| format!("{name}: {}", self.render(ty)))
          .collect::<Vec<_>>();

        format!("{{{}}}", fields.join(", "))
      },
      | Type::List(element) => format!("[{}]", self.render(element)),
    }
  }

  fn instance(&self, id: TypeVarId) -> Option<&Type> {
    self.instances.get(id).and_then(Option::as_ref)
  }

  fn bind(&mut self, id: TypeVarId, ty: Type, context: &str, loc: Loc) -> Result<Type, TypeError> {
    if self.occurs(id, &ty) {
      return Err(TypeError::RecursiveType {
        loc,
        var: format!("t{id}"),
        ty: self.render(&ty),
        context: context.to_string(),
      });
    }

    self.instances[id] = Some(ty.clone());

    Ok(ty)
  }

  fn occurs(&self, id: TypeVarId, ty: &Type) -> bool {
    match ty {
      | Type::Var(other) if *other == id => true,
      | Type::Var(other) => {
        self
          .instance(*other)
          .map_or(false, |instance| self.occurs(id, instance))
      },
      | Type::Record(fields) => fields.iter().any(|(_, field)| self.occurs(id, field)),
      | Type::List(element) => self.occurs(id, element),
      | _ => false,
    }
  }
}

fn field_names(fields: &[(String, Type)]) -> String {
  let names = fields
    .iter()
    .map(|(name, _)| name.as_str())
    .collect::<Vec<_>>();

  format!("{{{}}}", names.join(", "))
}
