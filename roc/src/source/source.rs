use std::path::Path;
use std::str::Chars;
use std::sync::Arc;

use crate::ast::Loc;

/// Source code container to avoid large files duplication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceCode(pub Arc<SourceContainer>);

/// Internal source code container, used for ergonomics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceContainer {
  /// File path or 'inline'.
  pub source: String,
  /// Source code with `\n` line endings.
  pub code: String,
}

impl SourceCode {
  /// Creates a [SourceContainer] instance wrapping a string.
  pub fn from_string(code: String, path: &str) -> Self {
    let code = if code.contains('\r') {
      code.replace("\r\n", "\n").replace('\r', "\n")
    } else {
      code
    };

    SourceCode(Arc::new(SourceContainer {
      code,
      source: path.to_string(),
    }))
  }

  /// Creates a [SourceContainer] instance *cloning* a string slice.
  #[allow(clippy::should_implement_trait)]
  pub fn from_str(code: &str) -> Self {
    Self::from_string(code.to_string(), "inline")
  }

  pub fn len(&self) -> usize {
    self.0.code.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns an iterator over the characters of the `code`.
  pub fn chars(&self) -> Chars {
    self.0.code.chars()
  }

  /// Returns a string slice of the `code`.
  pub fn as_str(&self) -> &str {
    self.0.code.as_str()
  }

  /// Returns the file name of source.
  pub fn file_name(&self) -> &str {
    let path = self.0.source.as_str();

    Path::new(path)
      .file_name()
      .and_then(|filename| filename.to_str())
      .unwrap_or(path)
  }

  /// Returns the file path of source.
  pub fn file_path(&self) -> &str {
    self.0.source.as_str()
  }

  /// Converts a 1-based line/column location into a character offset, which is what error
  /// reports are indexed by. Locations past the end are clamped to the end of the code.
  pub fn char_offset(&self, loc: Loc) -> usize {
    let mut offset = 0;

    for (index, line) in self.as_str().split('\n').enumerate() {
      let length = line.chars().count();

      if index + 1 == loc.line as usize {
        return offset + (loc.column.max(1) as usize - 1).min(length);
      }

      offset += length + 1;
    }

    self.chars().count()
  }
}
