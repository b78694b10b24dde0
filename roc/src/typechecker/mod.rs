pub use context::*;
pub use typechecker::*;
pub use types::*;

mod context;
mod typechecker;
mod types;
