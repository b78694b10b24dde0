pub use parser::*;

mod combinators;
mod expression;
mod module;
mod parser;
mod pattern;
mod statement;
mod types;

#[cfg(test)]
mod testing;
