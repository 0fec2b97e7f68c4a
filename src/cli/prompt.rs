//! Yes/no confirmation prompts.

use console::style;
use std::io::{self, BufRead, Write};

/// A source of yes/no answers.
///
/// The finalizer asks through this trait so it can be driven without a
/// terminal.
pub trait Confirm {
    /// Ask `question`; `Ok(true)` means the user agreed.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Returns true for `y` or `yes`, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

/// Prompts on a writer and reads the answer from a line reader.
pub struct LineConfirm<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl LineConfirm<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.writer, "{} {} ", style("?").cyan(), question)?;
        self.writer.flush()?;

        let mut input = String::new();
        // EOF reads as an empty answer, i.e. "no"
        self.reader.read_line(&mut input)?;

        Ok(is_affirmative(&input))
    }
}

/// Agrees to everything (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _question: &str) -> io::Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        for yes in ["y", "Y", "yes", "YES", " Yes \n"] {
            assert!(is_affirmative(yes), "{:?}", yes);
        }
        for no in ["", "n", "no", "yeah", "yess", "\n"] {
            assert!(!is_affirmative(no), "{:?}", no);
        }
    }

    #[test]
    fn test_line_confirm_reads_one_line() {
        let mut out = Vec::new();
        let mut confirm = LineConfirm::new("yes\nn\n".as_bytes(), &mut out);

        assert!(confirm.confirm("Overwrite?").unwrap());
        assert!(!confirm.confirm("Overwrite?").unwrap());
        assert!(!confirm.confirm("Overwrite?").unwrap(), "EOF must mean no");

        drop(confirm);
        assert!(String::from_utf8_lossy(&out).contains("Overwrite?"));
    }

    #[test]
    fn test_assume_yes() {
        assert!(AssumeYes.confirm("anything").unwrap());
    }
}
