use std::collections::HashMap;

use super::Value;

/// Handle of a scope in a [Scopes] arena.
pub type ScopeId = usize;

/// Scope every call frame is parented to.
pub const GLOBAL: ScopeId = 0;

#[derive(Debug, Clone)]
struct Scope {
  parent: Option<ScopeId>,
  values: HashMap<String, Value>,
}

/// Arena of runtime scopes. Scopes form a tree through parent handles and are released in
/// reverse order of creation.
#[derive(Debug, Clone)]
pub struct Scopes {
  scopes: Vec<Scope>,
}

impl Scopes {
  pub fn new() -> Self {
    Scopes {
      scopes: vec![Scope {
        parent: None,
        values: HashMap::new(),
      }],
    }
  }

  pub fn push(&mut self, parent: ScopeId) -> ScopeId {
    self.scopes.push(Scope {
      parent: Some(parent),
      values: HashMap::new(),
    });

    self.scopes.len() - 1
  }

  /// Drops `scope` together with every scope created after it. The global scope is never
  /// released.
  pub fn release(&mut self, scope: ScopeId) {
    self.scopes.truncate(scope.max(GLOBAL + 1));
  }

  /// Binds `name` in `scope` itself. Returns `false` if it is already bound there.
  pub fn define(&mut self, scope: ScopeId, name: &str, value: Value) -> bool {
    match self.scopes.get_mut(scope) {
      | Some(scope) if !scope.values.contains_key(name) => {
        scope.values.insert(name.to_string(), value);
        true
      },
      | _ => false,
    }
  }

  pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Value> {
    let id = self.find(scope, name)?;
    self.scopes[id].values.get(name)
  }

  pub fn contains(&self, scope: ScopeId, name: &str) -> bool {
    self.find(scope, name).is_some()
  }

  /// Rebinds `name` in the nearest scope that binds it. Returns `false` if none does.
  pub fn assign(&mut self, scope: ScopeId, name: &str, value: Value) -> bool {
    match self.find(scope, name) {
      | Some(id) => {
        self.scopes[id].values.insert(name.to_string(), value);
        true
      },
      | None => false,
    }
  }

  pub fn len(&self) -> usize {
    self.scopes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.scopes.is_empty()
  }

  fn find(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
    let mut current = Some(scope);

    while let Some(id) = current {
      let scope = self.scopes.get(id)?;

      if scope.values.contains_key(name) {
        return Some(id);
      }

      current = scope.parent;
    }

    None
  }
}

impl Default for Scopes {
  fn default() -> Self {
    Self::new()
  }
}
