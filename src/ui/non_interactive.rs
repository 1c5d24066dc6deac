//! Non-interactive UI for CI/headless environments.

use super::{OutputMode, Prompt, SpinnerHandle, SummaryLine, UserInterface};
use crate::error::Result;

/// UI implementation for non-interactive mode.
///
/// Prompts are never shown: a confirm question is answered "no", so a
/// headless run never takes an action that needs a human's consent.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        tracing::debug!("Non-interactive; answering no to '{}'", prompt.key);
        Ok(false)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner {
            quiet: !self.mode.shows_status(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn show_summary(&mut self, lines: &[SummaryLine]) {
        if !self.mode.shows_summary() {
            return;
        }
        println!();
        println!("Summary:");
        for line in lines {
            match &line.detail {
                Some(detail) => println!(
                    "  {} {}",
                    line.status.format_plain(&line.label),
                    detail
                ),
                None => println!("  {}", line.status.format_plain(&line.label)),
            }
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints one line when finished.
struct NoopSpinner {
    quiet: bool,
}

impl SpinnerHandle for NoopSpinner {
    fn finish_success(&mut self, msg: &str) {
        if !self.quiet {
            println!("  ✓ {}", msg);
        }
    }

    fn finish_warning(&mut self, msg: &str) {
        if !self.quiet {
            eprintln!("  ⚠ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        if !self.quiet {
            println!("  ○ {}", msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_is_not_interactive() {
        let ui = NonInteractiveUI::new(OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn confirm_answers_no_even_with_yes_default() {
        let mut ui = NonInteractiveUI::new(OutputMode::Silent);
        let prompt = Prompt::new("launch", "Launch now?", true);
        assert!(!ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn output_mode_preserved() {
        let ui = NonInteractiveUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn noop_spinner_methods() {
        let mut spinner = NoopSpinner { quiet: true };
        spinner.finish_success("Done");
        spinner.finish_warning("Careful");
        spinner.finish_skipped("Skipped");
    }
}
