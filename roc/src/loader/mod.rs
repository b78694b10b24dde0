use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

pub use modules::*;

mod modules;

use crate::ast::{Import, Loc, Program};
use crate::errors::{ImportSite, LangError, LoaderError, Wrappable};
use crate::parser::Parser;
use crate::source::SourceCode;
use crate::utils::path::{absolute_path, module_path};

/// Extension of module files.
pub const EXTENSION: &str = ".roc";

/// Merged program plus the per-module namespaces needed to resolve qualified names.
#[derive(Clone, Debug)]
pub struct LoadedProgram {
  pub program: Program,
  pub modules: ModuleTable,
}

/// Depth-first loader of a module and everything it imports.
#[derive(Debug, Default)]
pub struct ModuleLoader {
  loaded: HashMap<PathBuf, ModuleId>,
  modules: ModuleTable,
  programs: Vec<Program>,
}

impl ModuleLoader {
  /// Loads the entry file at `path` and its imports.
  pub fn load_file(path: &Path) -> Result<LoadedProgram, LangError> {
    let path = absolute_path(path).map_err(|error| {
      LoaderError::Unreadable {
        path: path.to_path_buf(),
        error: Arc::new(error),
        site: None,
      }
      .wrap()
    })?;

    let source = read_source(&path, None)?;
    let mut loader = ModuleLoader::default();

    loader.load_module(path, source, None, &mut vec![])?;
    loader.finish()
  }

  /// Loads an entry module from memory. Its imports are looked up next to the path the code
  /// claims to come from.
  pub fn load_code(code: &SourceCode) -> Result<LoadedProgram, LangError> {
    let path = absolute_path(Path::new(code.file_path())).map_err(|error| {
      LoaderError::Unreadable {
        path: PathBuf::from(code.file_path()),
        error: Arc::new(error),
        site: None,
      }
      .wrap()
    })?;

    let mut loader = ModuleLoader::default();

    loader.load_module(path, code.clone(), None, &mut vec![])?;
    loader.finish()
  }

  fn load_import(
    &mut self,
    importer: &Path,
    importer_source: &SourceCode,
    import: &Import,
    ancestry: &mut Vec<PathBuf>,
  ) -> Result<ModuleId, LangError> {
    let path = module_path(importer, &import.module);
    let site = ImportSite {
      loc: import.loc,
      importer: importer_source.clone(),
    };

    if ancestry.contains(&path) {
      let mut cycle = ancestry.clone();
      cycle.push(path);

      return Err(LoaderError::CyclicDependency { cycle, site }.wrap());
    }

    if let Some(&id) = self.loaded.get(&path) {
      check_module_name(self.modules.module(id).name.as_deref(), import, &site)?;
      return Ok(id);
    }

    if !path.is_file() {
      return Err(
        LoaderError::MissingModule {
          module: import.module.clone(),
          expected: path,
          site,
        }
        .wrap(),
      );
    }

    let source = read_source(&path, Some(site.clone()))?;

    self.load_module(path, source, Some((import, site)), ancestry)
  }

  fn load_module(
    &mut self,
    path: PathBuf,
    source: SourceCode,
    expected: Option<(&Import, ImportSite)>,
    ancestry: &mut Vec<PathBuf>,
  ) -> Result<ModuleId, LangError> {
    debug!("loading module '{}'", path.display());

    let program = Parser::from_source(&source).parse_program()?;

    if let Some((import, site)) = &expected {
      check_module_name(program.module_name.as_deref(), import, site)?;
    }

    ancestry.push(path.clone());

    let mut aliases = HashMap::new();

    for import in &program.imports {
      let id = self.load_import(&path, &source, import, ancestry)?;
      aliases.insert(import.name().to_string(), id);
    }

    ancestry.pop();

    let name = program
      .module_name
      .clone()
      .or_else(|| expected.map(|(import, _)| import.module.clone()));

    let id = self.modules.insert(ModuleInfo {
      id: 0,
      name,
      path: path.clone(),
      source,
      exports: program.exports.clone(),
      aliases,
      functions: program
        .functions
        .iter()
        .map(|function| function.name.clone())
        .collect(),
      enums: program
        .enums
        .iter()
        .map(|enum_def| enum_def.name.clone())
        .collect(),
      variants: program
        .enums
        .iter()
        .flat_map(|enum_def| enum_def.variants.iter().cloned())
        .collect(),
    });

    debug!("loaded module '{}' as #{id}", path.display());

    self.loaded.insert(path, id);
    self.programs.push(program);

    Ok(id)
  }

  /// Concatenates every module's definitions in load order, rejecting names defined twice.
  fn finish(self) -> Result<LoadedProgram, LangError> {
    let ModuleLoader {
      modules, programs, ..
    } = self;

    let mut program = Program::default();
    // Enums live in the type namespace, functions and variants share the value namespace.
    let mut seen: HashSet<(bool, String)> = HashSet::new();

    for (id, module_program) in programs.into_iter().enumerate() {
      let source = &modules.module(id).source;

      let mut claim = |kind: &'static str, name: &str, loc: Loc| -> Result<(), LangError> {
        if !seen.insert((kind == "Enum", name.to_string())) {
          return Err(
            LoaderError::DuplicateDefinition {
              kind,
              name: name.to_string(),
              site: ImportSite {
                loc,
                importer: source.clone(),
              },
            }
            .wrap(),
          );
        }

        Ok(())
      };

      for enum_def in &module_program.enums {
        claim("Enum", &enum_def.name, enum_def.loc)?;

        for variant in &enum_def.variants {
          claim("Enum variant", variant, enum_def.loc)?;
        }
      }

      for function in &module_program.functions {
        claim("Function", &function.name, function.loc)?;
      }

      if id == modules.root() {
        program.module_name = module_program.module_name;
        program.imports = module_program.imports;
        program.exports = module_program.exports;
      }

      program.enums.extend(module_program.enums);
      program.functions.extend(module_program.functions);
    }

    debug!(
      "loaded {} module(s) with {} function(s)",
      modules.len(),
      program.functions.len()
    );

    Ok(LoadedProgram { program, modules })
  }
}

fn read_source(path: &Path, site: Option<ImportSite>) -> Result<SourceCode, LangError> {
  let code = fs::read_to_string(path).map_err(|error| {
    LoaderError::Unreadable {
      path: path.to_path_buf(),
      error: Arc::new(error),
      site,
    }
    .wrap()
  })?;

  Ok(SourceCode::from_string(code, &path.to_string_lossy()))
}

/// A module that declares a name must declare the one it is imported by.
fn check_module_name(
  declared: Option<&str>,
  import: &Import,
  site: &ImportSite,
) -> Result<(), LangError> {
  match declared {
    | Some(declared) if declared != import.module => {
      Err(
        LoaderError::NameMismatch {
          declared: declared.to_string(),
          expected: import.module.clone(),
          site: site.clone(),
        }
        .wrap(),
      )
    },
    | _ => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use tempfile::TempDir;

  use super::*;

  fn write(dir: &TempDir, name: &str, code: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, code).unwrap();
    path
  }

  fn loader_error(path: &Path) -> LoaderError {
    match ModuleLoader::load_file(path) {
      | Err(LangError::Loader(error)) => error,
      | other => panic!("expected loader error, got {other:?}"),
    }
  }

  fn function_names(program: &Program) -> Vec<&str> {
    program
      .functions
      .iter()
      .map(|function| function.name.as_str())
      .collect()
  }

  #[test]
  fn test_loads_in_dependency_order() {
    let dir = TempDir::new().unwrap();

    write(&dir, "math_utils.roc", indoc! {"
      module math_utils
      export { add };
      fn add(a: Int, b: Int) -> Int { return a + b; }
    "});

    write(&dir, "colors.roc", indoc! {"
      module colors
      import math_utils;
      export { Color, Red };
      enum Color { Red, Green }
      fn brightness() -> Int { return math_utils.add(1, 2); }
    "});

    let main = write(&dir, "main.roc", indoc! {"
      import math_utils as m;
      import colors;
      fn main() { print(m.add(2, 3)); }
    "});

    let loaded = ModuleLoader::load_file(&main).unwrap();
    let modules = &loaded.modules;

    assert_eq!(function_names(&loaded.program), vec!["add", "brightness", "main"]);
    assert_eq!(loaded.program.enums.len(), 1);
    assert_eq!(loaded.program.imports.len(), 2);
    assert_eq!(modules.len(), 3);

    let root = modules.module(modules.root());
    assert_eq!(root.path, main);
    assert_eq!(root.display_name(), "main");
    assert_eq!(modules.resolve_alias(root.id, "m"), Some(0));
    assert_eq!(modules.resolve_alias(root.id, "colors"), Some(1));
    assert_eq!(modules.resolve_alias(root.id, "math_utils"), None);

    assert_eq!(modules.function_owner("add"), Some(0));
    assert_eq!(modules.enum_owner("Color"), Some(1));
    assert_eq!(modules.variant_owner("Green"), Some(1));
    assert!(modules.is_exported(1, "Red"));
    assert!(!modules.is_exported(1, "Green"));
  }

  #[test]
  fn test_shared_import_is_loaded_once() {
    let dir = TempDir::new().unwrap();

    write(&dir, "c.roc", "module c\nfn shared() { }\n");
    write(&dir, "b.roc", "module b\nimport c;\nfn from_b() { }\n");
    let main = write(&dir, "a.roc", "import b;\nimport c;\nfn main() { }\n");

    let loaded = ModuleLoader::load_file(&main).unwrap();

    assert_eq!(loaded.modules.len(), 3);
    assert_eq!(function_names(&loaded.program), vec!["shared", "from_b", "main"]);
  }

  #[test]
  fn test_unnamed_module_takes_import_name() {
    let dir = TempDir::new().unwrap();

    write(&dir, "helpers.roc", "fn help() { }\n");
    let main = write(&dir, "main.roc", "import helpers;\nfn main() { }\n");

    let loaded = ModuleLoader::load_file(&main).unwrap();

    assert_eq!(loaded.modules.module(0).name.as_deref(), Some("helpers"));
  }

  #[test]
  fn test_missing_module() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "main.roc", "fn main() { }\nimport nope;\n");

    let error = loader_error(&main);

    match &error {
      | LoaderError::MissingModule {
        module,
        expected,
        site,
      } => {
        assert_eq!(module, "nope");
        assert_eq!(expected, &dir.path().join("nope.roc"));
        assert_eq!(site.loc, Loc::new(2, 1));
        assert_eq!(site.importer.file_path(), main.to_string_lossy());
      },
      | other => panic!("unexpected error {other:?}"),
    }

    assert!(error.to_string().starts_with("Module 'nope' not found (expected "));
  }

  #[test]
  fn test_name_mismatch() {
    let dir = TempDir::new().unwrap();

    write(&dir, "other.roc", "module different\nfn f() { }\n");
    let main = write(&dir, "main.roc", "import other;\nfn main() { }\n");

    let error = loader_error(&main);

    assert_eq!(
      error.to_string(),
      "Module name 'different' does not match import 'other'"
    );
  }

  #[test]
  fn test_cycle() {
    let dir = TempDir::new().unwrap();

    let a = write(&dir, "a.roc", "module a\nimport b;\nfn main() { }\n");
    let b = write(&dir, "b.roc", "module b\nimport a;\nfn g() { }\n");

    match loader_error(&a) {
      | LoaderError::CyclicDependency { cycle, site } => {
        assert_eq!(cycle, vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(site.importer.file_path(), b.to_string_lossy());
      },
      | other => panic!("unexpected error {other:?}"),
    }
  }

  #[test]
  fn test_self_import() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.roc", "module a\nimport a;\nfn main() { }\n");

    let error = loader_error(&a);

    assert_eq!(
      error,
      LoaderError::CyclicDependency {
        cycle: vec![a.clone(), a.clone()],
        site: ImportSite {
          loc: Loc::new(2, 1),
          importer: SourceCode::from_string(
            "module a\nimport a;\nfn main() { }\n".to_string(),
            &a.to_string_lossy()
          ),
        },
      }
    );
  }

  #[test]
  fn test_duplicate_definitions() {
    let dir = TempDir::new().unwrap();

    write(&dir, "b.roc", "module b\nfn helper() { }\n");
    let main = write(&dir, "a.roc", "import b;\nfn helper() { }\nfn main() { }\n");

    let error = loader_error(&main);

    assert_eq!(error.to_string(), "Function 'helper' already defined");
    assert_eq!(error.site().map(|site| site.loc), Some(Loc::new(2, 1)));
  }

  #[test]
  fn test_duplicate_variants() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "a.roc", "enum A { X }\nenum B { Y, X }\nfn main() { }\n");

    assert_eq!(
      loader_error(&main).to_string(),
      "Enum variant 'X' already defined"
    );
  }

  #[test]
  fn test_variants_and_functions_share_names() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "a.roc", "enum C { Red }\nfn Red() { }\nfn main() { }\n");

    let error = loader_error(&main);

    assert_eq!(error.to_string(), "Function 'Red' already defined");
    assert_eq!(error.site().map(|site| site.loc), Some(Loc::new(2, 1)));

    let other = write(&dir, "b.roc", "enum Red { A }\nfn Red() { }\nfn main() { }\n");
    assert!(ModuleLoader::load_file(&other).is_ok());
  }

  #[test]
  fn test_parse_error_in_import() {
    let dir = TempDir::new().unwrap();

    let broken = write(&dir, "broken.roc", "module broken\nfn f( { }\n");
    let main = write(&dir, "main.roc", "import broken;\nfn main() { }\n");

    match ModuleLoader::load_file(&main) {
      | Err(LangError::Parser(source, _)) => {
        assert_eq!(source.file_path(), broken.to_string_lossy());
      },
      | other => panic!("unexpected result {other:?}"),
    }
  }

  #[test]
  fn test_unreadable_entry() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.roc");

    match loader_error(&missing) {
      | LoaderError::Unreadable { path, site, .. } => {
        assert_eq!(path, missing);
        assert!(site.is_none());
      },
      | other => panic!("unexpected error {other:?}"),
    }
  }

  #[test]
  fn test_load_code() {
    let code = SourceCode::from_str("fn main() { print(1); }");
    let loaded = ModuleLoader::load_code(&code).unwrap();

    assert_eq!(loaded.modules.len(), 1);
    assert_eq!(loaded.modules.module(0).source, code);
    assert!(loaded.program.function("main").is_some());
  }
}
