use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use super::helpers::report_at;
use super::{LangError, ReportBuilder, Reportable, Wrappable};
use crate::ast::Loc;
use crate::source::SourceCode;
use crate::utils::path::path_chain;

/// The import statement (or definition) an error points at, with the source it lives in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSite {
  pub loc: Loc,
  pub importer: SourceCode,
}

#[derive(Clone, Debug, Error)]
pub enum LoaderError {
  #[error("Module '{module}' not found (expected {})", .expected.display())]
  MissingModule {
    module: String,
    expected: PathBuf,
    site: ImportSite,
  },
  #[error("Unable to read module '{}': {error}", .path.display())]
  Unreadable {
    path: PathBuf,
    error: Arc<io::Error>,
    site: Option<ImportSite>,
  },
  #[error("Module name '{declared}' does not match import '{expected}'")]
  NameMismatch {
    declared: String,
    expected: String,
    site: ImportSite,
  },
  #[error("Import cycle detected: {}", path_chain(.cycle))]
  CyclicDependency { cycle: Vec<PathBuf>, site: ImportSite },
  #[error("{kind} '{name}' already defined")]
  DuplicateDefinition {
    kind: &'static str,
    name: String,
    site: ImportSite,
  },
}

impl LoaderError {
  /// Import statement or definition the error is attributed to, if any.
  pub fn site(&self) -> Option<&ImportSite> {
    match self {
      | LoaderError::MissingModule { site, .. } => Some(site),
      | LoaderError::Unreadable { site, .. } => site.as_ref(),
      | LoaderError::NameMismatch { site, .. } => Some(site),
      | LoaderError::CyclicDependency { site, .. } => Some(site),
      | LoaderError::DuplicateDefinition { site, .. } => Some(site),
    }
  }
}

impl Wrappable for LoaderError {
  type Wrapper = LangError;

  fn wrap(self) -> Self::Wrapper {
    LangError::Loader(self)
  }
}

impl<'a> Reportable<'a> for LoaderError {
  fn report(&'a self, source: &'a SourceCode) -> ReportBuilder<'a> {
    let loc = self.site().map(|site| site.loc).unwrap_or_default();
    let report = report_at(source, "ImportError", loc, self);

    match self {
      | LoaderError::MissingModule { module, .. } => {
        report.with_note(format!(
          "modules are looked up next to the importing file as '{module}.roc'"
        ))
      },
      | LoaderError::CyclicDependency { .. } => {
        report.with_note("modules cannot import each other, directly or transitively")
      },
      | _ => report,
    }
  }
}

/// Custom [PartialEq] implementation because of [Arc] used in the `Unreadable` variant.
impl PartialEq for LoaderError {
  fn eq(&self, other: &LoaderError) -> bool {
    match (self, other) {
      // std::io::Error cannot be compared, so only the paths are.
      | (LoaderError::Unreadable { path: this, .. }, LoaderError::Unreadable { path: that, .. }) => {
        this == that
      },
      | (
        LoaderError::MissingModule {
          module: this,
          site: site0,
          ..
        },
        LoaderError::MissingModule {
          module: that,
          site: site1,
          ..
        },
      ) => this == that && site0 == site1,
      | (
        LoaderError::NameMismatch {
          declared: declared0,
          expected: expected0,
          ..
        },
        LoaderError::NameMismatch {
          declared: declared1,
          expected: expected1,
          ..
        },
      ) => declared0 == declared1 && expected0 == expected1,
      | (
        LoaderError::CyclicDependency { cycle: this, .. },
        LoaderError::CyclicDependency { cycle: that, .. },
      ) => this == that,
      | (
        LoaderError::DuplicateDefinition {
          kind: kind0,
          name: name0,
          ..
        },
        LoaderError::DuplicateDefinition {
          kind: kind1,
          name: name1,
          ..
        },
      ) => kind0 == kind1 && name0 == name1,
      | _ => false,
    }
  }
}
