//! Whitespace-separated console input with prompts.
//!
//! Tokens may arrive several per line or one per line; a prompt is written
//! and flushed before each value is read.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::HarnessError;

/// Reads typed tokens from `input`, writing prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Write `prompt`, then read and parse the next token.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] on a read or write failure,
    /// [`HarnessError::UnexpectedEof`] if input ends, and
    /// [`HarnessError::Parse`] if the token is not a `T`.
    pub fn ask<T: FromStr>(
        &mut self,
        prompt: &str,
        expected: &'static str,
    ) -> Result<T, HarnessError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let token = self.next_token(expected)?;
        token
            .parse()
            .map_err(|_| HarnessError::Parse { expected, token })
    }

    fn next_token(&mut self, expected: &'static str) -> Result<String, HarnessError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(HarnessError::UnexpectedEof { expected });
            }
            self.pending.extend(line.split_whitespace().map(str::to_owned));
        }
    }

    /// The output stream, for writing the report.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}
