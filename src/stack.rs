use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StackError;

/// A last-in-first-out stack of `i32` that never holds more than `capacity`
/// values.
///
/// The top of the stack is the end of `inner`. Every operation either applies
/// completely or returns an error and leaves the stack as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    inner: Vec<i32>,
    capacity: usize,
}

/// Owned copy of a stack's contents, bottom first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub capacity: usize,
    pub elements: Vec<i32>,
}

impl Stack {
    pub fn new(capacity: usize) -> Stack {
        debug!(capacity, "initialized stack");
        Stack {
            inner: Vec::new(),
            capacity,
        }
    }

    /// Builds a stack from `values` given bottom first.
    pub fn from_values(capacity: usize, values: &[i32]) -> Result<Stack, StackError> {
        let mut stack = Stack::new(capacity);
        stack.reserve(values.len())?;
        stack.inner.extend_from_slice(values);
        Ok(stack)
    }

    pub fn size(&self) -> usize {
        self.inner.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.len() >= self.capacity
    }

    /// Values from the top of the stack down.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.inner.iter().rev().copied()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            capacity: self.capacity,
            elements: self.inner.clone(),
        }
    }

    pub fn push(&mut self, value: i32) -> Result<(), StackError> {
        self.reserve(1)?;
        self.inner.push(value);
        debug!(value, size = self.inner.len(), "pushed");
        Ok(())
    }

    pub fn pop(&mut self) -> Result<i32, StackError> {
        let len = self.require(1)?;
        let value = self.inner[len - 1];
        self.inner.truncate(len - 1);
        debug!(value, size = self.inner.len(), "popped");
        Ok(value)
    }

    pub fn top(&self) -> Result<i32, StackError> {
        self.require(1)?;
        let value = self.peek_at(0);
        debug!(value, "read top");
        Ok(value)
    }

    /// `( a -- a a )`
    pub fn dup(&mut self) -> Result<(), StackError> {
        self.require(1)?;
        self.reserve(1)?;
        let value = self.peek_at(0);
        self.inner.push(value);
        debug!(value, "duplicated the top value");
        Ok(())
    }

    /// `( b a -- a b )`
    pub fn swap(&mut self) -> Result<(), StackError> {
        let len = self.require(2)?;
        self.inner.swap(len - 1, len - 2);
        debug!("swapped the top two values");
        Ok(())
    }

    /// `( b a -- b a b )`
    pub fn over(&mut self) -> Result<(), StackError> {
        self.copy_second("over")
    }

    /// Brings the third value to the top: pushing 1 2 3 and rotating leaves
    /// 2 3 1, so the pops come out as 1 3 2.
    pub fn rot(&mut self) -> Result<(), StackError> {
        let len = self.require(3)?;
        self.inner[len - 3..].rotate_left(1);
        debug!("rotated the top three values");
        Ok(())
    }

    /// `( a -- )`
    pub fn drop(&mut self) -> Result<(), StackError> {
        let value = self.pop()?;
        debug!(value, "dropped the top value");
        Ok(())
    }

    /// Exchanges the top two pairs, each pair keeping its own order:
    /// `( d c b a -- b a d c )`
    pub fn two_swap(&mut self) -> Result<(), StackError> {
        let len = self.require(4)?;
        self.inner[len - 4..].rotate_left(2);
        debug!("swapped the top two pairs");
        Ok(())
    }

    /// `( b a -- b a b a )`
    pub fn two_dup(&mut self) -> Result<(), StackError> {
        let len = self.require(2)?;
        self.reserve(2)?;
        self.inner.extend_from_within(len - 2..);
        debug!("duplicated the top pair");
        Ok(())
    }

    /// Copies the second value to the top, same as `over`.
    pub fn two_over(&mut self) -> Result<(), StackError> {
        self.copy_second("2over")
    }

    /// `( b a -- )`
    pub fn two_drop(&mut self) -> Result<(), StackError> {
        let len = self.require(2)?;
        self.inner.truncate(len - 2);
        debug!(size = self.inner.len(), "dropped the top pair");
        Ok(())
    }

    /// Replaces the top two values with their wrapping sum.
    pub fn add(&mut self) -> Result<(), StackError> {
        let len = self.require(2)?;
        let sum = self.inner[len - 2].wrapping_add(self.inner[len - 1]);
        self.inner.truncate(len - 1);
        self.inner[len - 2] = sum;
        debug!(sum, "added the top two values");
        Ok(())
    }

    /// Value `depth` places below the top; 0 is the top itself. Callers
    /// check the depth with `require` first.
    pub(crate) fn peek_at(&self, depth: usize) -> i32 {
        self.inner[self.inner.len() - 1 - depth]
    }

    fn copy_second(&mut self, op: &str) -> Result<(), StackError> {
        self.require(2)?;
        self.reserve(1)?;
        let value = self.peek_at(1);
        self.inner.push(value);
        debug!(op, value, "copied the second value to the top");
        Ok(())
    }

    /// Returns the current size if at least `required` values are present.
    fn require(&self, required: usize) -> Result<usize, StackError> {
        let size = self.inner.len();
        if size < required {
            let err = StackError::Underflow { required, size };
            debug!(%err, "refused");
            return Err(err);
        }
        Ok(size)
    }

    /// Makes room for `additional` values without going over capacity.
    fn reserve(&mut self, additional: usize) -> Result<(), StackError> {
        let fits = self
            .inner
            .len()
            .checked_add(additional)
            .is_some_and(|size| size <= self.capacity);
        if !fits {
            let err = StackError::Overflow {
                capacity: self.capacity,
            };
            debug!(%err, additional, "refused");
            return Err(err);
        }

        self.inner.try_reserve(additional).map_err(|_| {
            debug!(additional, "allocation failed");
            StackError::Allocation
        })
    }
}

/// Prints like FORTH's `.s`: the depth, then the values bottom first.
impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", self.inner.len())?;
        for value in &self.inner {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}
