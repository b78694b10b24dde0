#![allow(clippy::module_inception)]

pub mod ast;
pub mod cli;
pub mod errors;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod runtime;
pub mod source;
pub mod typechecker;
pub(crate) mod utils;
