use std::fmt;
use std::mem;

use crate::ast::{Int, Literal};

#[derive(Clone, Debug)]
pub enum Value {
  Int(Int),
  Bool(bool),
  String(String),
  Unit,
  /// Fields in the order they were written.
  Record(Vec<(String, Value)>),
  List(Vec<Value>),
  Variant { enum_name: String, name: String },
}

impl Value {
  pub fn kind(&self) -> &'static str {
    match self {
      | Value::Int(_) => "Int",
      | Value::Bool(_) => "Bool",
      | Value::String(_) => "String",
      | Value::Unit => "Unit",
      | Value::Record(_) => "Record",
      | Value::List(_) => "List",
      | Value::Variant { .. } => "Variant",
    }
  }

  pub fn same_kind(&self, other: &Value) -> bool {
    mem::discriminant(self) == mem::discriminant(other)
  }

  /// Truthiness of values allowed in conditions. Other kinds yield `None`.
  pub fn truthy(&self) -> Option<bool> {
    match self {
      | Value::Bool(value) => Some(*value),
      | Value::Int(value) => Some(*value != 0),
      | Value::String(value) => Some(!value.is_empty()),
      | _ => None,
    }
  }

  pub fn field(&self, name: &str) -> Option<&Value> {
    match self {
      | Value::Record(fields) => {
        fields
          .iter()
          .find(|(field, _)| field == name)
          .map(|(_, value)| value)
      },
      | _ => None,
    }
  }

  /// Form used for values nested in records and lists, where strings are quoted.
  fn nested(&self) -> String {
    match self {
      | Value::String(value) => format!("\"{value}\""),
      | value => value.to_string(),
    }
  }
}

impl From<&Literal> for Value {
  fn from(literal: &Literal) -> Self {
    match literal {
      | Literal::Int(value) => Value::Int(*value),
      | Literal::String(value) => Value::String(value.clone()),
      | Literal::Bool(value) => Value::Bool(*value),
    }
  }
}

/// Records compare equal regardless of field order.
impl PartialEq for Value {
  fn eq(&self, other: &Value) -> bool {
    match (self, other) {
      | (Value::Int(lhs), Value::Int(rhs)) => lhs == rhs,
      | (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
      | (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
      | (Value::Unit, Value::Unit) => true,
      | (Value::Record(fields), Value::Record(others)) => {
        fields.len() == others.len()
          && fields
            .iter()
            .all(|(name, value)| other.field(name) == Some(value))
      },
      | (Value::List(lhs), Value::List(rhs)) => lhs == rhs,
      | (
        Value::Variant {
          enum_name: enum0,
          name: name0,
        },
        Value::Variant {
          enum_name: enum1,
          name: name1,
        },
      ) => enum0 == enum1 && name0 == name1,
      | _ => false,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      | Value::Int(value) => write!(f, "{value}"),
      | Value::Bool(value) => write!(f, "{value}"),
      | Value::String(value) => write!(f, "{value}"),
      | Value::Unit => write!(f, "()"),
      | Value::Record(fields) => {
        let fields = fields
          .iter()
          .map(|(name, value)| format!("{name}: {}", value.nested()))
          .collect::<Vec<_>>();

        write!(f, "{{{}}}", fields.join(", "))
      },
      | Value::List(values) => {
        let values = values.iter().map(Value::nested).collect::<Vec<_>>();

        write!(f, "[{}]", values.join(", "))
      },
      | Value::Variant { name, .. } => write!(f, "{name}"),
    }
  }
}
