use std::io::{self, Stdout, Write};
use std::path::Path;

use log::{debug, info};

use super::{Interpreter, Value};
use crate::errors::{InterpreterError, LangError};
use crate::loader::{LoadedProgram, ModuleLoader};
use crate::source::SourceCode;
use crate::typechecker::check_program;

/// Load, check and run pipeline. Everything `print` writes goes to `output`.
#[derive(Debug)]
pub struct Runtime<W: Write = Stdout> {
  output: W,
}

impl Runtime {
  pub fn new() -> Runtime {
    Runtime {
      output: io::stdout(),
    }
  }
}

impl<W: Write> Runtime<W> {
  pub fn with_output(output: W) -> Runtime<W> {
    Runtime { output }
  }

  pub fn output(&self) -> &W {
    &self.output
  }

  pub fn into_output(self) -> W {
    self.output
  }

  /// Loads the entry file and every module it imports.
  pub fn load(&self, path: &Path) -> Result<LoadedProgram, LangError> {
    info!("loading {}", path.display());

    let loaded = ModuleLoader::load_file(path)?;

    debug!(
      "loaded {} module(s), {} function(s)",
      loaded.modules.len(),
      loaded.program.functions.len()
    );

    Ok(loaded)
  }

  pub fn check(&self, loaded: &LoadedProgram) -> Result<(), LangError> {
    check_program(loaded)?;
    debug!("type check passed");

    Ok(())
  }

  /// Runs `main` of an already checked program.
  pub fn execute(&mut self, loaded: &LoadedProgram) -> Result<Value, LangError> {
    let value = Interpreter::new(loaded, &mut self.output).execute()?;

    self.output.flush().map_err(|error| {
      LangError::Interpreter(
        None,
        InterpreterError::Output {
          loc: Default::default(),
          message: error.to_string(),
        },
      )
    })?;

    Ok(value)
  }

  /// Loads, checks and runs the program at `path`. Nothing runs unless the whole program checks.
  pub fn run(&mut self, path: &Path) -> Result<Value, LangError> {
    let loaded = self.load(path)?;

    self.check(&loaded)?;
    self.execute(&loaded)
  }

  /// Loads and checks the program at `path` without running it.
  pub fn check_file(&self, path: &Path) -> Result<(), LangError> {
    let loaded = self.load(path)?;

    self.check(&loaded)
  }

  /// Same as [Runtime::run] for code held in memory. Imports resolve relative to the path the
  /// source claims to come from.
  pub fn run_source(&mut self, code: &SourceCode) -> Result<Value, LangError> {
    let loaded = ModuleLoader::load_code(code)?;

    self.check(&loaded)?;
    self.execute(&loaded)
  }

  pub fn check_source(&self, code: &SourceCode) -> Result<(), LangError> {
    let loaded = ModuleLoader::load_code(code)?;

    self.check(&loaded)
  }
}

impl Default for Runtime {
  fn default() -> Self {
    Self::new()
  }
}
