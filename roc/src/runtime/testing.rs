use super::{Interpreter, Runtime, Value};
use crate::errors::{InterpreterError, LangError};
use crate::loader::ModuleLoader;
use crate::source::SourceCode;

/// Checks and runs `code`, returning the result and everything printed.
pub fn run(code: &str) -> (Result<Value, LangError>, String) {
  let mut runtime = Runtime::with_output(vec![]);
  let result = runtime.run_source(&SourceCode::from_str(code));
  let output = String::from_utf8(runtime.into_output()).unwrap();

  (result, output)
}

/// Runs `code` without type checking it first.
pub fn run_unchecked(code: &str) -> (Result<Value, LangError>, String) {
  let loaded = ModuleLoader::load_code(&SourceCode::from_str(code)).unwrap();
  let mut output = vec![];
  let result = Interpreter::new(&loaded, &mut output).execute();

  (result, String::from_utf8(output).unwrap())
}

pub fn value(code: &str) -> Value {
  match run(code) {
    | (Ok(value), _) => value,
    | (Err(error), _) => panic!("unexpected error: {}", error.summary()),
  }
}

pub fn output(code: &str) -> String {
  match run(code) {
    | (Ok(_), output) => output,
    | (Err(error), _) => panic!("unexpected error: {}", error.summary()),
  }
}

fn expect_runtime_error(result: Result<Value, LangError>) -> InterpreterError {
  match result {
    | Err(LangError::Interpreter(_, error)) => error,
    | other => panic!("expected runtime error, got {other:?}"),
  }
}

/// Runtime error of a program that passes the type checker.
pub fn runtime_error(code: &str) -> InterpreterError {
  expect_runtime_error(run(code).0)
}

/// Runtime error of a program the type checker would reject.
pub fn unchecked_error(code: &str) -> InterpreterError {
  expect_runtime_error(run_unchecked(code).0)
}
