//! Presentation surface the workflow drives, plus an in-memory implementation.

use std::collections::BTreeSet;

use shared::{domain::FormState, protocol::PredictionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Result,
    Error,
}

/// Display-ready projection of a [`PredictionResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub prediction: String,
    pub confidence: String,
    pub category: String,
}

impl From<&PredictionResult> for RenderedResult {
    fn from(result: &PredictionResult) -> Self {
        Self {
            prediction: result.prediction.clone(),
            confidence: result.confidence.to_string(),
            category: result.category_token(),
        }
    }
}

/// Capabilities the controller needs from a form.
///
/// `show_result` and `show_error` replace whatever panel was visible before:
/// after either call exactly one panel is shown.
pub trait FormView {
    fn field_values(&self) -> FormState;
    fn set_field_error(&mut self, field: &str, flagged: bool);
    /// Removes every flag, including ones on fields the schema does not name.
    fn clear_field_errors(&mut self);
    fn show_result(&mut self, result: &RenderedResult);
    fn show_error(&mut self, message: &str);
    fn hide_panels(&mut self);
    fn clear_fields(&mut self);
    /// Disables the submit control and shows the loading indicator, or the reverse.
    fn set_submitting(&mut self, submitting: bool);
    fn focus_field(&mut self, field: &str);
    fn scroll_into_view(&mut self, panel: Panel);
}

pub enum RenderContent<'a> {
    Result(&'a PredictionResult),
    Error(&'a str),
}

pub fn render<V: FormView + ?Sized>(view: &mut V, content: RenderContent<'_>) {
    match content {
        RenderContent::Result(result) => {
            view.show_result(&RenderedResult::from(result));
            view.scroll_into_view(Panel::Result);
        }
        RenderContent::Error(message) => {
            view.show_error(message);
            view.scroll_into_view(Panel::Error);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Hidden,
    Result(RenderedResult),
    Error(String),
}

impl PanelState {
    pub fn is_visible(&self, panel: Panel) -> bool {
        matches!(
            (self, panel),
            (Self::Result(_), Panel::Result) | (Self::Error(_), Panel::Error)
        )
    }
}

/// Form with no real display, used by tests and batch submissions.
#[derive(Debug, Default)]
pub struct HeadlessView {
    values: FormState,
    flagged: BTreeSet<String>,
    panel: PanelState,
    submitting: bool,
    submitting_history: Vec<bool>,
    focused: Option<String>,
    scrolled_to: Option<Panel>,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: FormState) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Stands in for a keystroke landing in `field`.
    pub fn type_value(&mut self, field: &str, value: &str) {
        self.values.set(field, value);
    }

    pub fn values(&self) -> &FormState {
        &self.values
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn is_flagged(&self, field: &str) -> bool {
        self.flagged.contains(field)
    }

    pub fn flagged_fields(&self) -> Vec<&str> {
        self.flagged.iter().map(String::as_str).collect()
    }

    pub fn submit_enabled(&self) -> bool {
        !self.submitting
    }

    pub fn loading_visible(&self) -> bool {
        self.submitting
    }

    pub fn submitting_history(&self) -> &[bool] {
        &self.submitting_history
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn scrolled_to(&self) -> Option<Panel> {
        self.scrolled_to
    }
}

impl FormView for HeadlessView {
    fn field_values(&self) -> FormState {
        self.values.clone()
    }

    fn set_field_error(&mut self, field: &str, flagged: bool) {
        if flagged {
            self.flagged.insert(field.to_string());
        } else {
            self.flagged.remove(field);
        }
    }

    fn clear_field_errors(&mut self) {
        self.flagged.clear();
    }

    fn show_result(&mut self, result: &RenderedResult) {
        self.panel = PanelState::Result(result.clone());
    }

    fn show_error(&mut self, message: &str) {
        self.panel = PanelState::Error(message.to_string());
    }

    fn hide_panels(&mut self) {
        self.panel = PanelState::Hidden;
    }

    fn clear_fields(&mut self) {
        self.values.clear();
    }

    fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
        self.submitting_history.push(submitting);
    }

    fn focus_field(&mut self, field: &str) {
        self.focused = Some(field.to_string());
    }

    fn scroll_into_view(&mut self, panel: Panel) {
        self.scrolled_to = Some(panel);
    }
}
