//! Interactive prompts
//!
//! [`Prompter`] owns the user dialogue: every line it writes carries the
//! `> ` prefix, and every answer is read through one of three typed
//! variants ([`Prompter::text`], [`Prompter::index`],
//! [`Prompter::confirm`]). Input and output are generic so tests can
//! drive the dialogue from an in-memory buffer.

use crate::error::{Error, Result};
use crate::style::Palette;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Prefix of every line shown to the user.
pub const PREFIX: &str = "> ";

/// The single affirmative answer accepted by [`Prompter::confirm`].
pub const AFFIRMATIVE: &str = "Y";

pub struct Prompter<R, W> {
    input: R,
    output: W,
    palette: Palette,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the process's stdin and stdout.
    #[must_use]
    pub fn stdio(palette: Palette) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), palette)
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub const fn new(input: R, output: W, palette: Palette) -> Self {
        Self {
            input,
            output,
            palette,
        }
    }

    #[must_use]
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// Write one prefixed line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the output cannot be written.
    pub fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{PREFIX}{message}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Write a line without the prefix (listing rows, sequence dumps).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the output cannot be written.
    pub fn raw(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{line}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Ask for a free-form answer. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] when the input ends before a non-empty
    /// line arrives.
    pub fn text(&mut self, message: impl Display) -> Result<String> {
        self.say(message)?;
        loop {
            let Some(line) = self.read_line()? else {
                return Err(Error::Input("input closed".into()));
            };
            if !line.is_empty() {
                return Ok(line);
            }
        }
    }

    /// Ask for a 1-based position in a list of `len` entries and return
    /// it zero-based.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the answer is not a number or
    /// falls outside `1..=len`, and [`Error::Input`] when input ends.
    pub fn index(&mut self, message: impl Display, len: usize) -> Result<usize> {
        let answer = self.text(message)?;
        let choice: i64 = answer
            .trim()
            .parse()
            .map_err(|e| Error::Validation(format!("Please enter a valid number : {e}")))?;

        match usize::try_from(choice) {
            Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
            _ => Err(Error::Validation(
                "Number should be within listed mailboxes".into(),
            )),
        }
    }

    /// Ask a yes/no question. Only the exact answer `Y` counts as yes;
    /// anything else, an empty line included, is a no.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] when input ends before an answer.
    pub fn confirm(&mut self, message: impl Display) -> Result<bool> {
        self.say(message)?;
        self.read_line()?.map_or_else(
            || Err(Error::Input("input closed".into())),
            |line| Ok(line == AFFIRMATIVE),
        )
    }

    /// One line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(Some(trimmed.to_string()))
    }

    /// Consume the prompter, handing back its output (used by tests).
    pub fn into_output(self) -> W {
        self.output
    }
}
