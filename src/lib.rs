//! A bounded stack of integers with FORTH style manipulation words.

pub mod error;
pub mod repl;
pub mod stack;
pub mod word;

pub use error::{RunError, StackError, WordError};
pub use stack::{Snapshot, Stack};
