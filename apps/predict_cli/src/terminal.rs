//! Line-oriented terminal rendering of the prediction form.

use std::{collections::BTreeSet, fmt, io::Write};

use form_controller::{FormView, Panel, RenderedResult};
use shared::domain::{FieldSpec, FormState};
use tracing::warn;

pub struct TerminalView<W: Write> {
    out: W,
    values: FormState,
    flagged: BTreeSet<String>,
    focused: Option<String>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self::with_values(out, FormState::new())
    }

    pub fn with_values(out: W, values: FormState) -> Self {
        Self {
            out,
            values,
            flagged: BTreeSet::new(),
            focused: None,
        }
    }

    pub fn set_value(&mut self, field: &str, value: &str) {
        self.values.set(field, value);
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn is_flagged(&self, field: &str) -> bool {
        self.flagged.contains(field)
    }

    pub fn prompt(&mut self, field: &FieldSpec) {
        let current = self.values.get(&field.name).unwrap_or_default().to_string();
        let marker = if self.flagged.contains(&field.name) {
            "!"
        } else {
            " "
        };
        let hint = field
            .hint
            .as_deref()
            .map(|hint| format!(" ({hint})"))
            .unwrap_or_default();
        let line = format!("{marker} {}{hint} [{current}]: ", field.label);
        if let Err(error) = self
            .out
            .write_all(line.as_bytes())
            .and_then(|()| self.out.flush())
        {
            warn!(%error, "failed to write prompt");
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if let Err(error) = writeln!(self.out, "{line}") {
            warn!(%error, "failed to write to terminal");
        }
    }
}

impl<W: Write> FormView for TerminalView<W> {
    fn field_values(&self) -> FormState {
        self.values.clone()
    }

    fn set_field_error(&mut self, field: &str, flagged: bool) {
        if flagged {
            if self.flagged.insert(field.to_string()) {
                self.emit(format_args!("  ! check '{field}'"));
            }
        } else {
            self.flagged.remove(field);
        }
    }

    fn clear_field_errors(&mut self) {
        self.flagged.clear();
    }

    fn show_result(&mut self, result: &RenderedResult) {
        self.emit(format_args!(
            "Prediction: {} [{}]",
            result.prediction, result.category
        ));
        self.emit(format_args!("Confidence: {}", result.confidence));
    }

    fn show_error(&mut self, message: &str) {
        self.emit(format_args!("Error: {message}"));
    }

    fn hide_panels(&mut self) {}

    fn clear_fields(&mut self) {
        self.values.clear();
        self.emit(format_args!("Form cleared."));
    }

    fn set_submitting(&mut self, submitting: bool) {
        if submitting {
            self.emit(format_args!("Predicting..."));
        }
    }

    fn focus_field(&mut self, field: &str) {
        self.focused = Some(field.to_string());
    }

    // Output is append-only; the latest panel is always the last thing printed.
    fn scroll_into_view(&mut self, _panel: Panel) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(view: &TerminalView<Vec<u8>>) -> String {
        String::from_utf8_lossy(view.output()).to_string()
    }

    #[test]
    fn prompt_marks_flagged_field_and_shows_current_value() {
        let mut view = TerminalView::new(Vec::new());
        let field = FieldSpec::required("bmi", "BMI").with_hint("Normal BMI range is 18.5-24.9");
        view.set_value("bmi", "31");
        view.set_field_error("bmi", true);
        view.prompt(&field);
        assert!(printed(&view).ends_with("! BMI (Normal BMI range is 18.5-24.9) [31]: "));
    }

    #[test]
    fn repeated_flag_is_reported_once() {
        let mut view = TerminalView::new(Vec::new());
        view.set_field_error("age", true);
        view.set_field_error("age", true);
        assert_eq!(printed(&view).matches("check 'age'").count(), 1);
        view.set_field_error("age", false);
        assert!(!view.is_flagged("age"));
    }
}
