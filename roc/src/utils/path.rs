use std::env;
use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

use crate::loader::EXTENSION;

/// Makes a path absolute against the current directory, without touching the file system
/// otherwise, so modules are identified by a single canonical key.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
  if path.is_absolute() {
    Ok(path.to_path_buf())
  } else {
    Ok(env::current_dir()?.join(path))
  }
}

/// Path of the module file `name` living next to `importer`.
pub fn module_path(importer: &Path, name: &str) -> PathBuf {
  let directory = importer.parent().unwrap_or_else(|| Path::new("."));
  directory.join(format!("{name}{EXTENSION}"))
}

/// Renders a chain of module paths as `a.roc -> b.roc -> a.roc`.
pub fn path_chain(paths: &[PathBuf]) -> String {
  paths
    .iter()
    .map(|path| path.display().to_string())
    .collect::<Vec<_>>()
    .join(" -> ")
}

/// Builds a dotted name from path components.
pub fn qualified_name<S>(path: &[S], name: &str) -> String
where
  S: Into<String> + Display,
{
  path
    .iter()
    .fold(String::new(), |acc, segment| format!("{acc}{segment}."))
    + name
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_qualified_name() {
    assert_eq!(qualified_name(&["colors"], "Color"), "colors.Color");
    assert_eq!(qualified_name(&["a", "b"], "c"), "a.b.c");
    assert_eq!(qualified_name::<String>(&[], "print"), "print");
  }

  #[test]
  fn test_module_path() {
    assert_eq!(
      module_path(Path::new("/work/app/main.roc"), "math_utils"),
      PathBuf::from("/work/app/math_utils.roc")
    );
  }

  #[test]
  fn test_path_chain() {
    let chain = vec![PathBuf::from("a.roc"), PathBuf::from("b.roc"), PathBuf::from("a.roc")];

    assert_eq!(path_chain(&chain), "a.roc -> b.roc -> a.roc");
  }

  #[test]
  fn test_absolute_path() {
    let path = absolute_path(Path::new("main.roc")).unwrap();

    assert!(path.is_absolute());
    assert!(path.ends_with("main.roc"));
  }
}
