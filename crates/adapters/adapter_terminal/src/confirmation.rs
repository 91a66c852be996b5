//! Yes/no prompt over a line channel.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};
use vmdash_app::ports::Confirmation;

use crate::input::SharedLines;

/// Asks the question on `out` and accepts `y` / `yes` (any case) as consent.
///
/// Any other answer, or the end of input, declines.
pub struct PromptConfirmation<W> {
    lines: SharedLines,
    out: Mutex<W>,
    assume_yes: bool,
}

impl<W: Write + Send> PromptConfirmation<W> {
    pub fn new(lines: SharedLines, out: W) -> Self {
        Self {
            lines,
            out: Mutex::new(out),
            assume_yes: false,
        }
    }

    /// Accept every prompt without asking.
    #[must_use]
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    fn ask(&self, prompt: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = write!(out, "{prompt} [y/N] ").and_then(|()| out.flush()) {
            warn!(error = %err, "failed to write confirmation prompt");
        }
    }
}

impl<W: Write + Send> Confirmation for PromptConfirmation<W> {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            debug!(prompt, "confirmation assumed");
            return true;
        }
        self.ask(prompt);
        let answer = self.lines.lock().await.recv().await;
        answer.is_some_and(|line| is_yes(&line))
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
