pub use interpreter::*;
pub use runtime::*;
pub use scope::*;
pub use value::*;

mod interpreter;
mod runtime;
mod scope;
mod value;

#[cfg(test)]
pub mod testing;
