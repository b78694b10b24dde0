use std::path::Path;

use log::debug;

use crate::runtime::Runtime;

/// Loads, checks and runs the program at `path`. Returns the process exit code.
pub fn run(path: &Path, all_errors: bool) -> i32 {
  let mut runtime = Runtime::new();

  match runtime.run(path) {
    | Ok(value) => {
      debug!("main returned {value}");
      0
    },
    | Err(err) => {
      err.eprint(all_errors);
      1
    },
  }
}

/// Loads and checks the program at `path` without running it.
pub fn check(path: &Path, all_errors: bool) -> i32 {
  let runtime = Runtime::new();

  match runtime.check_file(path) {
    | Ok(()) => {
      println!("{}: ok", path.display());
      0
    },
    | Err(err) => {
      err.eprint(all_errors);
      1
    },
  }
}
