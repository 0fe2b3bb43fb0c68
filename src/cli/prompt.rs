//! Yes/no confirmation prompts.
//!
//! Only an answer starting with `y` or `Y` is affirmative. Anything else,
//! including an empty line or end of input, takes the skip path.

use std::io::{BufRead, Write};

/// Source of yes/no answers for the pipeline's confirmation gates
pub trait Confirm {
    /// Ask `prompt` and return whether the user agreed
    fn confirm(&self, prompt: &str) -> std::io::Result<bool>;
}

/// Whether `input` counts as a yes
pub fn is_affirmative(input: &str) -> bool {
    matches!(input.trim_start().chars().next(), Some('y' | 'Y'))
}

/// Prompts on the controlling terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    /// With `assume_yes`, every prompt is answered yes without reading stdin
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> std::io::Result<bool> {
        if self.assume_yes {
            println!("{} [y/N]: y", prompt);
            return Ok(true);
        }

        print!("{} [y/N]: ", prompt);
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().lock().read_line(&mut input)?;
        Ok(is_affirmative(&input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        for answer in ["y", "Y\n", "yes", " y"] {
            assert!(is_affirmative(answer), "{:?}", answer);
        }
    }

    #[test]
    fn test_everything_else_skips() {
        for answer in ["", "\n", "n", "N", "no", "sure", "1"] {
            assert!(!is_affirmative(answer), "{:?}", answer);
        }
    }

    #[test]
    fn test_assume_yes_does_not_read() {
        assert!(TerminalPrompt::new(true).confirm("Proceed?").unwrap());
    }
}
