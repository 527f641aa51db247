//! Interactive confirmation for mutating commands.

use std::io::{self, BufRead, Write};

/// Decides whether a mutating action may proceed.
pub trait Approver {
    /// Presents `summary` and returns `true` when the action is approved.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the prompt cannot be written or the answer
    /// cannot be read.
    fn approve(&mut self, summary: &str) -> io::Result<bool>;
}

/// Approves everything; used when approval is disabled in configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl Approver for AutoApprove {
    fn approve(&mut self, _summary: &str) -> io::Result<bool> {
        Ok(true)
    }
}

/// Asks on `output` and reads a `y`/`yes` answer from `input`.
#[derive(Debug)]
pub struct PromptApprover<R, W> {
    input: R,
    output: W,
}

impl<R, W> PromptApprover<R, W> {
    /// Creates a prompt reading from `input` and writing to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Approver for PromptApprover<R, W> {
    fn approve(&mut self, summary: &str) -> io::Result<bool> {
        writeln!(self.output, "{summary}")?;
        write!(self.output, "Proceed? [y/N]: ")?;
        self.output.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// Returns `true` for `y` or `yes`, ignoring case and surrounding space.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let normalized = answer.trim().to_ascii_lowercase();
    normalized == "y" || normalized == "yes"
}

#[cfg(test)]
mod tests {
    use super::{Approver, AutoApprove, PromptApprover, is_affirmative};
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    #[case("y\n", true)]
    #[case("YES\n", true)]
    #[case("  yes  ", true)]
    #[case("n\n", false)]
    #[case("\n", false)]
    #[case("yep\n", false)]
    fn only_yes_approves(#[case] answer: &str, #[case] expected: bool) {
        assert_eq!(is_affirmative(answer), expected);
    }

    #[rstest]
    fn prompt_shows_summary_and_reads_answer() {
        let mut shown = Vec::new();
        let mut approver = PromptApprover::new(Cursor::new("y\n"), &mut shown);

        let approved = approver
            .approve("Send message to channel 42")
            .expect("prompt should succeed");

        assert!(approved);
        let text = String::from_utf8(shown).expect("UTF-8 prompt");
        assert!(text.starts_with("Send message to channel 42\n"));
        assert!(text.ends_with("Proceed? [y/N]: "));
    }

    #[rstest]
    fn closed_input_declines() {
        let mut approver = PromptApprover::new(Cursor::new(""), Vec::new());

        assert!(!approver.approve("anything").expect("prompt should succeed"));
    }

    #[rstest]
    fn auto_approval_never_prompts() {
        assert!(AutoApprove.approve("anything").expect("always approves"));
    }
}
