// 🙋 Operator - the human in the loop
//
// Merge confirmation and section classification both block on a person.
// They only talk to this trait, so tests can swap in a script.

use anyhow::{anyhow, bail, Context, Result};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Interactive capability injected into the resolver and classifier
pub trait Operator {
    /// Pick exactly one of `choices` (non-empty, in display order)
    fn choose(&mut self, prompt: &str, choices: &[String]) -> Result<String>;

    /// Free-text answer, trimmed
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Side display that expects no answer
    fn show(&mut self, text: &str) -> Result<()>;
}

// ============================================================================
// STDIO OPERATOR
// ============================================================================

/// Line-based prompts: numbered choices, answers read line by line
pub struct StdioOperator<R, W> {
    input: R,
    output: W,
}

impl StdioOperator<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        StdioOperator::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> StdioOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        StdioOperator { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read operator input")?;
        if read == 0 {
            bail!("Operator input closed");
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Operator for StdioOperator<R, W> {
    fn choose(&mut self, prompt: &str, choices: &[String]) -> Result<String> {
        if choices.is_empty() {
            bail!("Nothing to choose from for: {}", prompt);
        }

        writeln!(self.output, "{}", prompt)?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, choice)?;
        }

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let answer = self.read_line()?;

            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(choices[n - 1].clone()),
                _ => writeln!(self.output, "Please enter a number between 1 and {}", choices.len())?,
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.read_line()
    }

    fn show(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
}

// ============================================================================
// SCRIPTED OPERATOR
// ============================================================================

/// Everything the scripted operator was asked, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Choose { prompt: String, choices: Vec<String> },
    Ask { prompt: String },
    Show { text: String },
}

/// Replays canned answers; fails once the script runs out
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub transcript: Vec<Interaction>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedOperator {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Number of prompts that waited for an answer
    pub fn prompt_count(&self) -> usize {
        self.transcript
            .iter()
            .filter(|i| !matches!(i, Interaction::Show { .. }))
            .count()
    }

    fn next_answer(&mut self) -> Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow!("Operator script exhausted"))
    }
}

impl Operator for ScriptedOperator {
    fn choose(&mut self, prompt: &str, choices: &[String]) -> Result<String> {
        self.transcript.push(Interaction::Choose {
            prompt: prompt.to_string(),
            choices: choices.to_vec(),
        });
        let answer = self.next_answer()?;
        if !choices.contains(&answer) {
            bail!("Scripted answer {:?} is not one of {:?}", answer, choices);
        }
        Ok(answer)
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.transcript.push(Interaction::Ask {
            prompt: prompt.to_string(),
        });
        Ok(self.next_answer()?.trim().to_string())
    }

    fn show(&mut self, text: &str) -> Result<()> {
        self.transcript.push(Interaction::Show {
            text: text.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdio_choose_by_number() {
        let input = "7\nabc\n2\n".as_bytes();
        let mut output = Vec::new();
        let mut operator = StdioOperator::new(input, &mut output);

        let choices = vec!["Tomaten".to_string(), "Do not merge.".to_string()];
        let picked = operator.choose("Merge?", &choices).unwrap();

        assert_eq!(picked, "Do not merge.");
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("1) Tomaten"));
        assert!(shown.contains("between 1 and 2"));
    }

    #[test]
    fn test_stdio_ask_trims() {
        let mut output = Vec::new();
        let mut operator = StdioOperator::new("  GE \n".as_bytes(), &mut output);

        assert_eq!(operator.ask("Section? ").unwrap(), "GE");
    }

    #[test]
    fn test_stdio_closed_input_is_error() {
        let mut output = Vec::new();
        let mut operator = StdioOperator::new("".as_bytes(), &mut output);

        let err = operator.ask("Section? ").unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn test_scripted_records_transcript() {
        let mut operator = ScriptedOperator::new(["b", "x"]);
        let choices = vec!["a".to_string(), "b".to_string()];

        assert_eq!(operator.choose("pick", &choices).unwrap(), "b");
        operator.show("info").unwrap();
        assert_eq!(operator.ask("free").unwrap(), "x");

        assert_eq!(operator.prompt_count(), 2);
        assert_eq!(operator.transcript.len(), 3);
        assert_eq!(operator.remaining(), 0);
        assert!(operator.ask("again").is_err());
    }

    #[test]
    fn test_scripted_rejects_invalid_choice() {
        let mut operator = ScriptedOperator::new(["zzz"]);
        let choices = vec!["a".to_string()];

        assert!(operator.choose("pick", &choices).is_err());
    }
}
