//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. Confirm prompts are answered from
//! pre-configured responses.
//!
//! # Example
//!
//! ```
//! use limpeza_installer::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_interactive(true);
//! ui.set_confirm_response("launch", false);
//!
//! ui.warning("No menu directory");
//! assert!(!ui.confirm(&Prompt::new("launch", "Launch now?", true)).unwrap());
//!
//! assert!(ui.has_warning("menu"));
//! assert_eq!(ui.prompts_shown(), ["launch".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;

use super::{OutputMode, Prompt, SpinnerHandle, SummaryLine, UserInterface};

/// Mock UI implementation for testing.
///
/// Unconfigured prompts take their default answer.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    hints: Vec<String>,
    spinners: Rc<RefCell<Vec<SpinnerRecord>>>,
    summaries: Vec<Vec<SummaryLine>>,
    confirm_responses: HashMap<String, bool>,
    prompts_shown: Vec<String>,
}

/// What happened to one spinner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerRecord {
    pub started: String,
    pub finished: Option<(SpinnerOutcome, String)>,
}

/// How a spinner was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerOutcome {
    Success,
    Warning,
    Error,
    Skipped,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Set the answer for a confirm prompt key.
    pub fn set_confirm_response(&mut self, key: &str, response: bool) {
        self.confirm_responses.insert(key.to_string(), response);
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all captured hints.
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Get every spinner started so far.
    pub fn spinners(&self) -> Vec<SpinnerRecord> {
        self.spinners.borrow().clone()
    }

    /// Get all captured summaries.
    pub fn summaries(&self) -> &[Vec<SummaryLine>] {
        &self.summaries
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific hint was shown.
    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }

    /// Check if any spinner finished with an error containing `msg`.
    pub fn has_spinner_error(&self, msg: &str) -> bool {
        self.spinners.borrow().iter().any(|s| {
            matches!(&s.finished, Some((SpinnerOutcome::Error, m)) if m.contains(msg))
        })
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        self.prompts_shown.push(prompt.key.clone());
        Ok(self
            .confirm_responses
            .get(&prompt.key)
            .copied()
            .unwrap_or(prompt.default))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let mut records = self.spinners.borrow_mut();
        records.push(SpinnerRecord {
            started: message.to_string(),
            finished: None,
        });
        Box::new(MockSpinner {
            index: records.len() - 1,
            records: Rc::clone(&self.spinners),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn show_summary(&mut self, lines: &[SummaryLine]) {
        self.summaries.push(lines.to_vec());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner handle that records how it was finished.
pub struct MockSpinner {
    index: usize,
    records: Rc<RefCell<Vec<SpinnerRecord>>>,
}

impl MockSpinner {
    fn finish(&mut self, outcome: SpinnerOutcome, msg: &str) {
        if let Some(record) = self.records.borrow_mut().get_mut(self.index) {
            record.finished = Some((outcome, msg.to_string()));
        }
    }
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerOutcome::Success, msg);
    }

    fn finish_warning(&mut self, msg: &str) {
        self.finish(SpinnerOutcome::Warning, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerOutcome::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerOutcome::Skipped, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::StatusKind;

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();
        ui.success("two");
        ui.warning("three");
        ui.error("four");
        assert!(ui.has_success("two"));
        assert!(ui.has_warning("three"));
        assert!(ui.has_error("four"));
    }

    #[test]
    fn unconfigured_confirm_uses_default() {
        let mut ui = MockUI::new();
        assert!(ui.confirm(&Prompt::new("a", "A?", true)).unwrap());
        assert!(!ui.confirm(&Prompt::new("b", "B?", false)).unwrap());
        assert_eq!(ui.prompts_shown(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn spinners_record_outcome() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Cloning");
        spinner.finish_error("clone failed");
        let mut other = ui.start_spinner("Checking git");
        other.finish_success("git");

        let records = ui.spinners();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].started, "Cloning");
        assert_eq!(
            records[1].finished,
            Some((SpinnerOutcome::Success, "git".to_string()))
        );
        assert!(ui.has_spinner_error("clone failed"));
    }

    #[test]
    fn captures_summaries() {
        let mut ui = MockUI::new();
        ui.show_summary(&[SummaryLine::new(StatusKind::Success, "launcher")]);
        assert_eq!(ui.summaries().len(), 1);
        assert_eq!(ui.summaries()[0][0].label, "launcher");
    }
}
