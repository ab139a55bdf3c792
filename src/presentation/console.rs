//! Terminal Console
//!
//! Prints previews to stderr and asks questions with `dialoguer` when stdin
//! is a terminal. Otherwise answers are read line by line from stdin
//! (`y`/`n`); end of input means no.

use std::io::{self, BufRead, Write};

use dialoguer::Confirm;
use is_terminal::IsTerminal;
use tracing::warn;

use crate::domain::entities::Action;
use crate::domain::ports::Console;

use super::preview::render_lines;

pub struct TerminalConsole {
    interactive: bool,
    color: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
            color: io::stderr().is_terminal(),
        }
    }

    fn ask_line(&self, question: &str, input: &mut impl BufRead) -> bool {
        loop {
            eprint!("{} [Y/N] ", question);
            let _ = io::stderr().flush();

            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    eprintln!();
                    return false;
                }
                Ok(_) => {}
            }

            match line.trim() {
                "y" | "Y" => return true,
                "n" | "N" => return false,
                other => warn!("Invalid answer '{}'", other),
            }
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn preview(&self, location: &str, actions: &[Action]) {
        let mut stderr = io::stderr().lock();
        for line in render_lines(location, actions, self.color) {
            let _ = writeln!(stderr, "{}", line);
        }
    }

    fn confirm(&self, question: &str) -> bool {
        if self.interactive {
            return Confirm::new()
                .with_prompt(question)
                .default(false)
                .interact()
                .unwrap_or(false);
        }

        self.ask_line(question, &mut io::stdin().lock())
    }
}
