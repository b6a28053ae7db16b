//! Yes/no prompts.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Unrecognized answers are asked again this many times in total.
pub const MAX_ATTEMPTS: usize = 3;

/// Ask `question` on `output` and read the answer from `input`.
///
/// Accepts `y`/`yes` and `n`/`no` in any case. End of input, a read error or
/// running out of attempts counts as "no".
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> bool {
    for _ in 0..MAX_ATTEMPTS {
        if write!(output, "{question} [y/n]: ").and_then(|_| output.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => {}
        }
    }

    false
}

/// [`ask`] on the terminal.
pub fn confirm(question: &str) -> bool {
    ask(&mut io::stdin().lock(), &mut io::stderr(), question)
}

/// Decides confirmations for a command, either by asking or because
/// `--yes` was given.
///
/// Clones share one cancellation flag. Once [`Prompt::cancel`] is called
/// every question is declined, including one already waiting for an answer.
#[derive(Debug, Clone, Default)]
pub struct Prompt {
    assume_yes: bool,
    cancelled: Arc<AtomicBool>,
}

impl Prompt {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            cancelled: Arc::default(),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn ask(&self, question: &str) -> bool {
        if self.is_cancelled() {
            tracing::debug!(question, "cancelled, declining");
            return false;
        }

        let answer = if self.assume_yes {
            tracing::debug!(question, "assuming yes");
            true
        } else {
            confirm(question)
        };

        // An answer typed after cancellation must not go through.
        answer && !self.is_cancelled()
    }
}
