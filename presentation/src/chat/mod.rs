//! Interactive chat mode

mod repl;

pub use repl::ChatRepl;
