use std::path::PathBuf;

use clap::{Parser, Subcommand};
use roc::cli;

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
pub struct Cli {
  #[clap(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Type check and run a program.
  Run {
    /// Entry file.
    #[clap(name = "file")]
    file: PathBuf,
    /// Report every parse error instead of the first one.
    #[clap(long)]
    all_errors: bool,
  },
  /// Type check a program without running it.
  Check {
    /// Entry file.
    #[clap(name = "file")]
    file: PathBuf,
    /// Report every parse error instead of the first one.
    #[clap(long)]
    all_errors: bool,
  },
}

fn main() {
  env_logger::init();

  let options = Cli::parse();

  let code = match options.command {
    | Command::Run { file, all_errors } => cli::run(&file, all_errors),
    | Command::Check { file, all_errors } => cli::check(&file, all_errors),
  };

  std::process::exit(code);
}
