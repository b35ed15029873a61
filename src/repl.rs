use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crate::error::RunError;
use crate::stack::Stack;
use crate::word::{eval_line, Effect};

#[derive(Debug, Parser)]
#[command(name = "forth-stack", version, about = "Evaluate FORTH stack words")]
pub struct Cli {
    /// Maximum number of values the stack may hold
    #[arg(long, short, default_value_t = 16)]
    pub capacity: usize,

    /// Print the final stack as JSON
    #[arg(long)]
    pub json: bool,

    /// Words to evaluate; starts an interactive session when empty
    #[arg(allow_negative_numbers = true)]
    pub words: Vec<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    let stdin = io::stdin();
    let stdout = io::stdout();

    match run_with(&cli, stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "run failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Evaluates the command line words, or every line of `input` when there are
/// none, writing results to `output`. The final stack is written as JSON
/// afterwards when asked for, even if evaluation failed.
pub fn run_with(cli: &Cli, input: impl BufRead, output: &mut impl Write) -> Result<(), RunError> {
    let mut stack = Stack::new(cli.capacity);

    let outcome = if cli.words.is_empty() {
        run_interactive(&mut stack, input, output)
    } else {
        run_batch(&mut stack, &cli.words.join(" "), output)
    };

    if cli.json {
        let json = serde_json::to_string(&stack.snapshot())?;
        writeln!(output, "{json}")?;
    }

    outcome
}

fn run_batch(stack: &mut Stack, line: &str, output: &mut impl Write) -> Result<(), RunError> {
    let mut effects = Vec::new();
    let result = eval_line(stack, line, |effect| effects.push(effect));

    if write_effects(output, &effects)? {
        writeln!(output)?;
    }
    result.map_err(RunError::from)
}

fn run_interactive(
    stack: &mut Stack,
    input: impl BufRead,
    output: &mut impl Write,
) -> Result<(), RunError> {
    info!(capacity = stack.capacity(), "starting interactive session");
    writeln!(output, "forth-stack, capacity {}. Type bye to leave.", stack.capacity())?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        let mut effects = Vec::new();
        let result = eval_line(stack, &line, |effect| effects.push(effect));
        write_effects(output, &effects)?;

        match result {
            Ok(()) if effects.contains(&Effect::Quit) => return Ok(()),
            Ok(()) => writeln!(output, " ok")?,
            Err(err) => writeln!(output, " {err}")?,
        }
    }
}

/// Returns whether anything was written.
fn write_effects(output: &mut impl Write, effects: &[Effect]) -> io::Result<bool> {
    let mut written = false;
    for effect in effects {
        match effect {
            Effect::Printed(value) => write!(output, "{value} ")?,
            Effect::Shown(stack) => write!(output, "{stack} ")?,
            Effect::Quit => continue,
        }
        written = true;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StackError, WordError};

    fn run_capture(args: &[&str], input: &str) -> (Result<(), RunError>, String) {
        let cli = Cli::parse_from(std::iter::once("forth-stack").chain(args.iter().copied()));
        let mut output = Vec::new();
        let result = run_with(&cli, input.as_bytes(), &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_cli_parses_words_and_flags() {
        let cli = Cli::parse_from(["forth-stack", "-c", "4", "--json", "1", "2", "+", "."]);
        assert_eq!(cli.capacity, 4);
        assert!(cli.json);
        assert_eq!(cli.words, vec!["1", "2", "+", "."]);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["forth-stack"]);
        assert_eq!(cli.capacity, 16);
        assert!(!cli.json);
        assert!(cli.words.is_empty());
    }

    #[test]
    fn test_batch_keeps_applied_words() {
        let mut stack = Stack::new(4);
        let mut output = Vec::new();
        assert!(run_batch(&mut stack, "1 2 swap", &mut output).is_ok());
        assert_eq!(stack.snapshot().elements, vec![2, 1]);
        assert!(run_batch(&mut stack, "2drop drop", &mut output).is_err());
        assert!(stack.is_empty());
        assert!(output.is_empty());
    }

    #[test]
    fn test_batch_prints_results() {
        let (result, output) = run_capture(&["1", "2", "+", "."], "");
        assert!(result.is_ok());
        assert_eq!(output, "3 \n");
    }

    #[test]
    fn test_batch_failure_still_prints_json() {
        let (result, output) = run_capture(&["--json", "-c", "4", "1", "+"], "");
        assert!(matches!(
            result,
            Err(RunError::Word(WordError::Stack {
                source: StackError::Underflow { required: 2, size: 1 },
                ..
            }))
        ));
        assert_eq!(output, "{\"capacity\":4,\"elements\":[1]}\n");
    }

    #[test]
    fn test_interactive_continues_after_error_and_quits() {
        let (result, output) = run_capture(&["--json"], "1 2\n+ +\n.\nquit\n9\n");
        assert!(result.is_ok());
        assert_eq!(
            output,
            "forth-stack, capacity 16. Type bye to leave.\n\
             >  ok\n\
             >  +: stack underflow: needs 2 element(s), has 1\n\
             > 3  ok\n\
             > {\"capacity\":16,\"elements\":[]}\n"
        );
    }

    #[test]
    fn test_interactive_ends_at_eof() {
        let (result, output) = run_capture(&["--json", "-c", "3"], "1 2\n.s\n");
        assert!(result.is_ok());
        assert!(output.contains("<2> 1 2  ok\n"));
        assert!(output.ends_with("> {\"capacity\":3,\"elements\":[1,2]}\n"));
    }

    #[test]
    fn test_interactive_bye_skips_rest_of_line() {
        let (result, output) = run_capture(&["--json"], "7 bye 8\n9\n");
        assert!(result.is_ok());
        assert!(output.ends_with("{\"capacity\":16,\"elements\":[7]}\n"));
    }
}
