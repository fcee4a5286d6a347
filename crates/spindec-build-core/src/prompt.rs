//! Line-driven yes/no confirmation
//!
//! Accepts `y`, `Y`, `n`, `N`, or an empty line (yes). Anything else
//! re-prompts. End of input declines.

use std::io::{self, BufRead, Write};
use tracing::debug;

/// State of a yes/no exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    Prompting,
    Confirmed,
    Declined,
}

impl PromptState {
    /// Advance on one line of input; `None` is end of input
    pub fn next(self, line: Option<&str>) -> PromptState {
        if self != PromptState::Prompting {
            return self;
        }
        match line.map(str::trim) {
            None => PromptState::Declined,
            Some("" | "y" | "Y") => PromptState::Confirmed,
            Some("n" | "N") => PromptState::Declined,
            Some(_) => PromptState::Prompting,
        }
    }
}

/// Ask `question` until a yes/no answer arrives; `true` on yes
pub fn ask_yes_no<R, W>(input: &mut R, out: &mut W, question: &str) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    let mut state = PromptState::Prompting;
    let mut line = String::new();

    loop {
        write!(out, "{} [Y/n] ", question)?;
        out.flush()?;

        line.clear();
        let read = input.read_line(&mut line)?;
        let answer = if read == 0 { None } else { Some(line.as_str()) };

        state = state.next(answer);
        match state {
            PromptState::Confirmed => return Ok(true),
            PromptState::Declined => {
                if answer.is_none() {
                    writeln!(out)?;
                    debug!("End of input at prompt, treating as no");
                }
                return Ok(false);
            }
            PromptState::Prompting => {
                writeln!(out, "Please answer y or n.")?;
            }
        }
    }
}
