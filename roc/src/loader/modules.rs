use std::collections::HashMap;
use std::path::PathBuf;

use crate::ast::Export;
use crate::source::SourceCode;

/// Index of a module in load (dependency-first) order.
pub type ModuleId = usize;

/// Per-module namespace data kept next to the merged program.
#[derive(Clone, Debug)]
pub struct ModuleInfo {
  pub id: ModuleId,
  /// Declared module name, or the name it was imported under.
  pub name: Option<String>,
  pub path: PathBuf,
  pub source: SourceCode,
  pub exports: Vec<Export>,
  /// Import alias (or module name) to the imported module.
  pub aliases: HashMap<String, ModuleId>,
  pub functions: Vec<String>,
  pub enums: Vec<String>,
  pub variants: Vec<String>,
}

impl ModuleInfo {
  pub fn display_name(&self) -> String {
    match &self.name {
      | Some(name) => name.clone(),
      | None => {
        self
          .path
          .file_stem()
          .map(|stem| stem.to_string_lossy().to_string())
          .unwrap_or_else(|| self.source.file_name().to_string())
      },
    }
  }

  pub fn exports(&self, name: &str) -> bool {
    self.exports.iter().any(|export| export.name == name)
  }
}

#[derive(Clone, Debug, Default)]
pub struct ModuleTable {
  modules: Vec<ModuleInfo>,
  function_owners: HashMap<String, ModuleId>,
  enum_owners: HashMap<String, ModuleId>,
  variant_owners: HashMap<String, ModuleId>,
}

impl ModuleTable {
  pub fn new() -> Self {
    ModuleTable::default()
  }

  /// Appends a module, assigning it the next id. Owner lookups keep the first definition of a
  /// name.
  pub fn insert(&mut self, mut info: ModuleInfo) -> ModuleId {
    let id = self.modules.len();
    info.id = id;

    for name in &info.functions {
      self.function_owners.entry(name.clone()).or_insert(id);
    }

    for name in &info.enums {
      self.enum_owners.entry(name.clone()).or_insert(id);
    }

    for name in &info.variants {
      self.variant_owners.entry(name.clone()).or_insert(id);
    }

    self.modules.push(info);

    id
  }

  /// Entry module, which is always loaded last.
  pub fn root(&self) -> ModuleId {
    self.modules.len().saturating_sub(1)
  }

  /// Panics on ids that were not produced by this table.
  pub fn module(&self, id: ModuleId) -> &ModuleInfo {
    &self.modules[id]
  }

  pub fn get(&self, id: ModuleId) -> Option<&ModuleInfo> {
    self.modules.get(id)
  }

  pub fn iter(&self) -> impl Iterator<Item = &ModuleInfo> {
    self.modules.iter()
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  pub fn function_owner(&self, name: &str) -> Option<ModuleId> {
    self.function_owners.get(name).copied()
  }

  pub fn enum_owner(&self, name: &str) -> Option<ModuleId> {
    self.enum_owners.get(name).copied()
  }

  pub fn variant_owner(&self, name: &str) -> Option<ModuleId> {
    self.variant_owners.get(name).copied()
  }

  /// Module that `alias` refers to inside module `from`.
  pub fn resolve_alias(&self, from: ModuleId, alias: &str) -> Option<ModuleId> {
    self
      .get(from)
      .and_then(|module| module.aliases.get(alias))
      .copied()
  }

  pub fn is_exported(&self, id: ModuleId, name: &str) -> bool {
    self.get(id).map_or(false, |module| module.exports(name))
  }
}
