use std::collections::HashMap;

use super::Type;

/// Stack of lexical blocks mapping local names to their types. The bottom block holds the
/// parameters of the function being checked.
#[derive(Debug, Clone)]
pub struct Context {
  blocks: Vec<HashMap<String, Type>>,
}

impl Context {
  pub fn new() -> Self {
    Context {
      blocks: vec![HashMap::new()],
    }
  }

  pub fn get(&self, name: &str) -> Option<&Type> {
    for block in self.blocks.iter().rev() {
      if let Some(ty) = block.get(name) {
        return Some(ty);
      }
    }

    None
  }

  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  /// Binds `name` in the innermost block. Returns `false` if the block already binds it.
  pub fn define(&mut self, name: &str, ty: Type) -> bool {
    match self.blocks.last_mut() {
      | Some(block) if !block.contains_key(name) => {
        block.insert(name.to_string(), ty);
        true
      },
      | _ => false,
    }
  }

  // Blocks.

  pub fn enter_block(&mut self) {
    self.blocks.push(HashMap::new());
  }

  pub fn exit_block(&mut self) {
    if self.blocks.len() > 1 {
      self.blocks.pop();
    }
  }
}

impl Default for Context {
  fn default() -> Self {
    Self::new()
  }
}
