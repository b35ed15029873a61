use std::str::FromStr;

use tracing::debug;

use crate::error::{StackError, WordError};
use crate::stack::Stack;

/// A single token of a word line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word {
    Literal(i32),
    Dup,
    Swap,
    Over,
    Rot,
    Drop,
    TwoSwap,
    TwoDup,
    TwoOver,
    TwoDrop,
    Add,
    /// `.` pops and prints the top value
    Print,
    /// `.s` prints the whole stack
    Show,
    Bye,
}

/// Something a word produced besides changing the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Printed(i32),
    Shown(String),
    Quit,
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(token: &str) -> Result<Word, WordError> {
        if let Ok(value) = token.parse::<i32>() {
            return Ok(Word::Literal(value));
        }

        match token.to_lowercase().as_str() {
            "dup" => Ok(Word::Dup),
            "swap" => Ok(Word::Swap),
            "over" => Ok(Word::Over),
            "rot" => Ok(Word::Rot),
            "drop" => Ok(Word::Drop),
            "2swap" => Ok(Word::TwoSwap),
            "2dup" => Ok(Word::TwoDup),
            "2over" => Ok(Word::TwoOver),
            "2drop" => Ok(Word::TwoDrop),
            "+" | "add" => Ok(Word::Add),
            "." => Ok(Word::Print),
            ".s" => Ok(Word::Show),
            "bye" | "quit" => Ok(Word::Bye),
            _ => Err(WordError::Unknown(token.to_string())),
        }
    }
}

impl Word {
    pub fn apply(self, stack: &mut Stack) -> Result<Option<Effect>, StackError> {
        match self {
            Word::Literal(value) => stack.push(value).map(|_| None),
            Word::Dup => stack.dup().map(|_| None),
            Word::Swap => stack.swap().map(|_| None),
            Word::Over => stack.over().map(|_| None),
            Word::Rot => stack.rot().map(|_| None),
            Word::Drop => stack.drop().map(|_| None),
            Word::TwoSwap => stack.two_swap().map(|_| None),
            Word::TwoDup => stack.two_dup().map(|_| None),
            Word::TwoOver => stack.two_over().map(|_| None),
            Word::TwoDrop => stack.two_drop().map(|_| None),
            Word::Add => stack.add().map(|_| None),
            Word::Print => stack.pop().map(|value| Some(Effect::Printed(value))),
            Word::Show => Ok(Some(Effect::Shown(stack.to_string()))),
            Word::Bye => Ok(Some(Effect::Quit)),
        }
    }
}

/// Evaluates whitespace separated words left to right, handing every effect
/// to `emit`. Stops at the first failing word or at `bye`; words before that
/// stay applied.
pub fn eval_line(
    stack: &mut Stack,
    line: &str,
    mut emit: impl FnMut(Effect),
) -> Result<(), WordError> {
    for token in line.split_whitespace() {
        let word: Word = token.parse()?;
        let effect = word.apply(stack).map_err(|source| WordError::Stack {
            word: token.to_string(),
            source,
        })?;
        debug!(?word, size = stack.size(), "evaluated");

        match effect {
            Some(Effect::Quit) => {
                emit(Effect::Quit);
                return Ok(());
            }
            Some(effect) => emit(effect),
            None => (),
        }
    }
    Ok(())
}
