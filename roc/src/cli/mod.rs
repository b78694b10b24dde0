pub use commands::*;

mod commands;
