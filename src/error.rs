//! Failures reported by the stack and the word evaluator

use std::io;

use thiserror::Error;

/// Why a stack operation was refused. The stack is untouched whenever one of
/// these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("stack overflow: capacity is {capacity}")]
    Overflow { capacity: usize },

    #[error("stack underflow: needs {required} element(s), has {size}")]
    Underflow { required: usize, size: usize },

    #[error("unable to allocate stack storage")]
    Allocation,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("unknown word `{0}`")]
    Unknown(String),

    #[error("{word}: {source}")]
    Stack {
        word: String,
        #[source]
        source: StackError,
    },
}

/// Failures that end a command line run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Word(#[from] WordError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unable to serialize stack: {0}")]
    Json(#[from] serde_json::Error),
}
